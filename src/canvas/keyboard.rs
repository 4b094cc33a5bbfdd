//! Keyboard navigation and the leader-key chord.
//!
//! The leader (Tab) must be held: pressing `r` while it is down is the
//! rename chord, releasing it alone adds a child, and any other key while it
//! is held cancels both without side effects.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Tab,
    Enter,
    Esc,
    Delete,
    Backspace,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Press,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub phase: KeyPhase,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn press(key: Key) -> Self {
        Self {
            key,
            phase: KeyPhase::Press,
            ctrl: false,
        }
    }

    pub fn release(key: Key) -> Self {
        Self {
            key,
            phase: KeyPhase::Release,
            ctrl: false,
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            phase: KeyPhase::Press,
            ctrl: true,
        }
    }
}

pub const LEADER: Key = Key::Tab;
pub const CHORD_RENAME: Key = Key::Char('r');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordState {
    Idle,
    LeaderHeld,
    /// Chord resolved or cancelled; the leader's release is swallowed.
    AwaitingRelease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordOutcome {
    /// Second key pressed while the leader was held.
    Chord,
    /// Leader released on its own.
    HoldRelease,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Parent,
    FirstChild,
    PrevSibling,
    NextSibling,
}

/// Key bindings resolved against the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Navigate(NavDirection),
    InsertSibling,
    Delete,
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    ResetView,
    Chord(ChordOutcome),
}

#[derive(Debug, Clone, Copy)]
pub struct KeyboardMachine {
    chord: ChordState,
}

impl Default for KeyboardMachine {
    fn default() -> Self {
        Self {
            chord: ChordState::Idle,
        }
    }
}

impl KeyboardMachine {
    pub fn chord_state(&self) -> ChordState {
        self.chord
    }

    pub fn reset(&mut self) {
        self.chord = ChordState::Idle;
    }

    pub fn handle(&mut self, input: KeyInput) -> Option<KeyCommand> {
        match (self.chord, input.phase) {
            (ChordState::LeaderHeld, KeyPhase::Press) if input.key == LEADER => None,
            (ChordState::LeaderHeld, KeyPhase::Press) => {
                self.chord = ChordState::AwaitingRelease;
                let outcome = if input.key == CHORD_RENAME && !input.ctrl {
                    ChordOutcome::Chord
                } else {
                    ChordOutcome::Cancelled
                };
                Some(KeyCommand::Chord(outcome))
            }
            (ChordState::LeaderHeld, KeyPhase::Release) if input.key == LEADER => {
                self.chord = ChordState::Idle;
                Some(KeyCommand::Chord(ChordOutcome::HoldRelease))
            }
            (ChordState::AwaitingRelease, KeyPhase::Release) if input.key == LEADER => {
                self.chord = ChordState::Idle;
                None
            }
            (ChordState::AwaitingRelease, KeyPhase::Press) if input.key == LEADER => {
                self.chord = ChordState::LeaderHeld;
                None
            }
            (ChordState::AwaitingRelease, _) | (_, KeyPhase::Release) => None,
            (ChordState::Idle, KeyPhase::Press) => self.idle_press(input),
        }
    }

    fn idle_press(&mut self, input: KeyInput) -> Option<KeyCommand> {
        if input.ctrl {
            return match input.key {
                Key::Char('z') => Some(KeyCommand::Undo),
                Key::Char('y') => Some(KeyCommand::Redo),
                _ => None,
            };
        }
        match input.key {
            LEADER => {
                self.chord = ChordState::LeaderHeld;
                None
            }
            Key::Left => Some(KeyCommand::Navigate(NavDirection::Parent)),
            Key::Right => Some(KeyCommand::Navigate(NavDirection::FirstChild)),
            Key::Up => Some(KeyCommand::Navigate(NavDirection::PrevSibling)),
            Key::Down => Some(KeyCommand::Navigate(NavDirection::NextSibling)),
            Key::Enter => Some(KeyCommand::InsertSibling),
            Key::Delete | Key::Backspace => Some(KeyCommand::Delete),
            Key::Char('+') | Key::Char('=') => Some(KeyCommand::ZoomIn),
            Key::Char('-') => Some(KeyCommand::ZoomOut),
            Key::Char('0') => Some(KeyCommand::ResetView),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leader_then_r_is_chord() {
        let mut kb = KeyboardMachine::default();
        assert_eq!(kb.handle(KeyInput::press(Key::Tab)), None);
        assert_eq!(kb.chord_state(), ChordState::LeaderHeld);
        assert_eq!(
            kb.handle(KeyInput::press(Key::Char('r'))),
            Some(KeyCommand::Chord(ChordOutcome::Chord))
        );
        // Releasing the leader afterwards must not also add a child
        assert_eq!(kb.handle(KeyInput::release(Key::Tab)), None);
        assert_eq!(kb.chord_state(), ChordState::Idle);
    }

    #[test]
    fn test_leader_release_alone() {
        let mut kb = KeyboardMachine::default();
        kb.handle(KeyInput::press(Key::Tab));
        // Auto-repeat of the held leader is ignored
        assert_eq!(kb.handle(KeyInput::press(Key::Tab)), None);
        assert_eq!(
            kb.handle(KeyInput::release(Key::Tab)),
            Some(KeyCommand::Chord(ChordOutcome::HoldRelease))
        );
    }

    #[test]
    fn test_other_key_cancels() {
        let mut kb = KeyboardMachine::default();
        kb.handle(KeyInput::press(Key::Tab));
        assert_eq!(
            kb.handle(KeyInput::press(Key::Down)),
            Some(KeyCommand::Chord(ChordOutcome::Cancelled))
        );
        assert_eq!(kb.handle(KeyInput::release(Key::Tab)), None);
        // Back to normal bindings
        assert_eq!(
            kb.handle(KeyInput::press(Key::Down)),
            Some(KeyCommand::Navigate(NavDirection::NextSibling))
        );
    }

    #[test]
    fn test_bindings() {
        let mut kb = KeyboardMachine::default();
        assert_eq!(kb.handle(KeyInput::press(Key::Enter)), Some(KeyCommand::InsertSibling));
        assert_eq!(kb.handle(KeyInput::press(Key::Backspace)), Some(KeyCommand::Delete));
        assert_eq!(kb.handle(KeyInput::ctrl(Key::Char('z'))), Some(KeyCommand::Undo));
        assert_eq!(kb.handle(KeyInput::ctrl(Key::Char('y'))), Some(KeyCommand::Redo));
        assert_eq!(kb.handle(KeyInput::press(Key::Char('0'))), Some(KeyCommand::ResetView));
        assert_eq!(kb.handle(KeyInput::release(Key::Enter)), None);
        assert_eq!(kb.handle(KeyInput::press(Key::Char('q'))), None);
    }
}
