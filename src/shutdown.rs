// Best-effort "we're leaving" ping to the companion process.
// The window closes once the request settles, whatever the outcome.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use log::{info, warn};
use reqwest::blocking::Client;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// The companion answered; carries the HTTP status.
    Delivered(u16),
    /// Unreachable, timed out, or the task died. Treated like success.
    Failed(String),
}

/// Handle to an in-flight notification.
pub struct ShutdownTask {
    done: Receiver<NotifyOutcome>,
    outcome: Option<NotifyOutcome>,
}

impl ShutdownTask {
    /// Task whose result is known up front.
    pub fn completed(outcome: NotifyOutcome) -> Self {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(outcome);
        Self { done: rx, outcome: None }
    }

    /// Non-blocking check. Returns the outcome once settled.
    pub fn poll(&mut self) -> Option<&NotifyOutcome> {
        if self.outcome.is_none() {
            match self.done.try_recv() {
                Ok(outcome) => self.outcome = Some(outcome),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    self.outcome = Some(NotifyOutcome::Failed("notifier thread exited".into()))
                }
            }
        }
        self.outcome.as_ref()
    }

    /// Block until the notification settles.
    pub fn wait(mut self) -> NotifyOutcome {
        if let Some(outcome) = self.outcome.take() {
            return outcome;
        }
        self.done
            .recv()
            .unwrap_or_else(|_| NotifyOutcome::Failed("notifier thread exited".into()))
    }
}

/// Sends the shutdown notification.
pub trait Notifier {
    fn notify(&self, endpoint: &str) -> ShutdownTask;
}

/// `GET <endpoint>` on a background thread, bounded by `timeout`.
pub struct HttpNotifier {
    timeout: Duration,
}

impl HttpNotifier {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Notifier for HttpNotifier {
    fn notify(&self, endpoint: &str) -> ShutdownTask {
        let (tx, rx) = mpsc::channel();
        let url = endpoint.to_string();
        let timeout = self.timeout;

        let spawned = thread::Builder::new()
            .name("shutdown-notify".into())
            .spawn(move || {
                let outcome = send_shutdown(&url, timeout);
                match &outcome {
                    NotifyOutcome::Delivered(status) => {
                        info!("shutdown notification delivered ({status})")
                    }
                    NotifyOutcome::Failed(reason) => {
                        warn!("shutdown notification failed: {reason}")
                    }
                }
                let _ = tx.send(outcome);
            });

        match spawned {
            Ok(_) => ShutdownTask { done: rx, outcome: None },
            Err(e) => {
                warn!("could not start shutdown notifier: {e}");
                ShutdownTask::completed(NotifyOutcome::Failed(e.to_string()))
            }
        }
    }
}

fn send_shutdown(url: &str, timeout: Duration) -> NotifyOutcome {
    // The companion runs on this machine; never route through a proxy.
    let client = match Client::builder().timeout(timeout).no_proxy().build() {
        Ok(client) => client,
        Err(e) => return NotifyOutcome::Failed(e.to_string()),
    };
    match client.get(url).send() {
        Ok(response) => NotifyOutcome::Delivered(response.status().as_u16()),
        Err(e) => NotifyOutcome::Failed(e.to_string()),
    }
}
