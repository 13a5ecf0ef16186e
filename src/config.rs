use std::path::PathBuf;
use std::time::Duration;

use directories_next::UserDirs;

use crate::error::Error;
use crate::types::CanvasSize;

pub const DEFAULT_WIDTH: usize = 800;
pub const DEFAULT_HEIGHT: usize = 600;
pub const DEFAULT_SHUTDOWN_URL: &str = "http://localhost:8000/shutdown";
pub const OUTPUT_BASENAME: &str = "pixelsynth_output";

/// Everything the host fixes at startup.
#[derive(Clone, Debug)]
pub struct HostConfig {
    pub width: usize,
    pub height: usize,
    pub title: String,
    pub camera_index: u32,
    pub target_fps: usize,
    pub shutdown_url: String,
    pub shutdown_timeout: Duration,
    pub output_basename: String,
    pub output_dir: PathBuf,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            title: String::from("PixelSynth"),
            camera_index: 0,
            target_fps: 60,
            shutdown_url: DEFAULT_SHUTDOWN_URL.to_string(),
            shutdown_timeout: Duration::from_secs(3),
            output_basename: OUTPUT_BASENAME.to_string(),
            output_dir: default_output_dir(),
        }
    }
}

impl HostConfig {
    pub fn size(&self) -> CanvasSize {
        CanvasSize { width: self.width, height: self.height }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.png", self.output_basename))
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.target_fps == 0 {
            return Err(Error::Config("target_fps must be positive".into()));
        }
        if self.output_basename.trim().is_empty() {
            return Err(Error::Config("output basename must not be empty".into()));
        }
        if self.shutdown_url.trim().is_empty() {
            return Err(Error::Config("shutdown url must not be empty".into()));
        }
        Ok(())
    }
}

/// The user's download folder, or the working directory when the
/// platform doesn't report one.
pub fn default_output_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|ud| ud.download_dir().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_configuration() {
        let config = HostConfig::default();
        assert_eq!(config.size(), CanvasSize { width: 800, height: 600 });
        assert_eq!(config.shutdown_url, "http://localhost:8000/shutdown");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn output_path_uses_png_extension() {
        let config = HostConfig { output_dir: PathBuf::from("/tmp/out"), ..Default::default() };
        assert_eq!(config.output_path(), PathBuf::from("/tmp/out/pixelsynth_output.png"));
    }

    #[test]
    fn validate_rejects_empty_canvas() {
        let config = HostConfig { width: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
