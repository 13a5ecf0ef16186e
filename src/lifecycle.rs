// Which user input does what. One table, one lookup.

/// The three on-screen buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Save,
    Help,
    Exit,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Save, Button::Help, Button::Exit];

    pub fn label(self) -> &'static str {
        match self {
            Button::Save => "Save",
            Button::Help => "Help",
            Button::Exit => "Exit",
        }
    }
}

/// A raw user input that may map to an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Key(char),
    Button(Button),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Save,
    ToggleHelp,
    Exit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Running,
    /// Terminal: nothing moves the host back to `Running`.
    ShuttingDown,
}

/// Keys are stored lowercase; lookups fold case first.
pub const BINDINGS: [(Trigger, Action); 6] = [
    (Trigger::Button(Button::Save), Action::Save),
    (Trigger::Key('s'), Action::Save),
    (Trigger::Button(Button::Help), Action::ToggleHelp),
    (Trigger::Key('h'), Action::ToggleHelp),
    (Trigger::Button(Button::Exit), Action::Exit),
    (Trigger::Key('e'), Action::Exit),
];

pub fn resolve(trigger: Trigger) -> Option<Action> {
    let trigger = match trigger {
        Trigger::Key(c) => Trigger::Key(c.to_ascii_lowercase()),
        other => other,
    };
    BINDINGS
        .iter()
        .find(|(t, _)| *t == trigger)
        .map(|&(_, action)| action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_resolve_case_insensitively() {
        for (lower, upper, action) in [
            ('s', 'S', Action::Save),
            ('h', 'H', Action::ToggleHelp),
            ('e', 'E', Action::Exit),
        ] {
            assert_eq!(resolve(Trigger::Key(lower)), Some(action));
            assert_eq!(resolve(Trigger::Key(upper)), Some(action));
        }
    }

    #[test]
    fn every_button_is_bound() {
        assert_eq!(resolve(Trigger::Button(Button::Save)), Some(Action::Save));
        assert_eq!(resolve(Trigger::Button(Button::Help)), Some(Action::ToggleHelp));
        assert_eq!(resolve(Trigger::Button(Button::Exit)), Some(Action::Exit));
    }

    #[test]
    fn unbound_keys_resolve_to_nothing() {
        for c in ['x', 'q', ' ', '1', 'é'] {
            assert_eq!(resolve(Trigger::Key(c)), None);
        }
    }

    #[test]
    fn run_state_starts_running() {
        assert_eq!(RunState::default(), RunState::Running);
    }
}
