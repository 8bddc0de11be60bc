// THEORY:
// The quiz reads every consumed gesture the same way: one to four fingers pick answer
// A to D, an open hand (five fingers) pauses or resumes. This module is that mapping
// and nothing more; what "select" or "pause" does is up to the consumer.

use crate::core_modules::stability::GestureEvent;

/// Number of answer options a finger count can select.
pub const OPTION_COUNT: usize = 4;

/// A quiz input decoded from a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureCommand {
    /// Zero-based answer index (0 = A).
    SelectOption(usize),
    TogglePause,
}

impl GestureCommand {
    pub fn from_event(event: GestureEvent) -> Option<Self> {
        match event.finger_count {
            n @ 1..=4 => Some(GestureCommand::SelectOption(n as usize - 1)),
            5 => Some(GestureCommand::TogglePause),
            _ => None,
        }
    }

    /// Letter label of a selected option, for display.
    pub fn option_label(&self) -> Option<char> {
        match *self {
            GestureCommand::SelectOption(index) if index < OPTION_COUNT => {
                Some((b'A' + index as u8) as char)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(finger_count: u8) -> GestureEvent {
        GestureEvent { finger_count }
    }

    #[test]
    fn one_to_four_fingers_select_answers() {
        assert_eq!(GestureCommand::from_event(event(1)), Some(GestureCommand::SelectOption(0)));
        assert_eq!(GestureCommand::from_event(event(4)), Some(GestureCommand::SelectOption(3)));
        assert_eq!(
            GestureCommand::from_event(event(3)).and_then(|c| c.option_label()),
            Some('C')
        );
    }

    #[test]
    fn an_open_hand_toggles_pause() {
        let command = GestureCommand::from_event(event(5)).unwrap();
        assert_eq!(command, GestureCommand::TogglePause);
        assert_eq!(command.option_label(), None);
    }

    #[test]
    fn other_counts_map_to_nothing() {
        assert_eq!(GestureCommand::from_event(event(0)), None);
        assert_eq!(GestureCommand::from_event(event(6)), None);
    }
}
