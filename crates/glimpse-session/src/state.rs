//! Session phase state machine.
//!
//! Enforces valid phase transitions for a conversion:
//! - Idle -> Loading (first trigger)
//! - Loading -> Success (fields extracted)
//! - Loading -> NoMatch (text recognized, pattern missed)
//! - Loading -> Error (OCR failed)
//! - Loading -> Loading (re-trigger while a conversion is in flight)
//! - Success / NoMatch / Error -> Loading (next trigger)

use std::fmt;

use glimpse_core::error::GlimpseError;

/// Phase of the extraction session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Nothing has been converted yet.
    #[default]
    Idle,
    /// Waiting for the OCR collaborator.
    Loading,
    /// The last conversion extracted fields.
    Success,
    /// The last conversion recognized text that did not match.
    NoMatch,
    /// The last conversion failed in the OCR collaborator.
    Error,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "Idle"),
            SessionPhase::Loading => write!(f, "Loading"),
            SessionPhase::Success => write!(f, "Success"),
            SessionPhase::NoMatch => write!(f, "NoMatch"),
            SessionPhase::Error => write!(f, "Error"),
        }
    }
}

impl SessionPhase {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &SessionPhase) -> bool {
        match (self, target) {
            (SessionPhase::Idle, SessionPhase::Loading) => true,
            (SessionPhase::Loading, next) => *next == SessionPhase::Loading || next.is_settled(),
            (current, SessionPhase::Loading) => current.is_settled(),
            _ => false,
        }
    }

    /// Whether this phase ends a conversion.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            SessionPhase::Success | SessionPhase::NoMatch | SessionPhase::Error
        )
    }
}

/// Validating holder of the current phase.
///
/// Not synchronized on its own; the session keeps it under the same lock as
/// the rest of its state so phase and data always change together.
#[derive(Debug, Clone, Default)]
pub struct PhaseMachine {
    phase: SessionPhase,
}

impl PhaseMachine {
    /// Create a new machine in `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current phase.
    pub fn current(&self) -> SessionPhase {
        self.phase
    }

    /// Attempt to transition to the target phase.
    ///
    /// Returns a `GlimpseError::Session` and leaves the phase unchanged if the
    /// transition is not allowed from the current phase.
    pub fn transition(&mut self, target: SessionPhase) -> Result<(), GlimpseError> {
        if self.phase.can_transition_to(&target) {
            tracing::debug!("Session phase: {} -> {}", self.phase, target);
            self.phase = target;
            Ok(())
        } else {
            Err(GlimpseError::Session(format!(
                "Invalid phase transition: {} -> {}",
                self.phase, target
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(SessionPhase::Idle.to_string(), "Idle");
        assert_eq!(SessionPhase::Loading.to_string(), "Loading");
        assert_eq!(SessionPhase::Success.to_string(), "Success");
        assert_eq!(SessionPhase::NoMatch.to_string(), "NoMatch");
        assert_eq!(SessionPhase::Error.to_string(), "Error");
    }

    #[test]
    fn test_valid_transitions() {
        assert!(SessionPhase::Idle.can_transition_to(&SessionPhase::Loading));
        assert!(SessionPhase::Loading.can_transition_to(&SessionPhase::Success));
        assert!(SessionPhase::Loading.can_transition_to(&SessionPhase::NoMatch));
        assert!(SessionPhase::Loading.can_transition_to(&SessionPhase::Error));
        assert!(SessionPhase::Loading.can_transition_to(&SessionPhase::Loading));
        for settled in [SessionPhase::Success, SessionPhase::NoMatch, SessionPhase::Error] {
            assert!(settled.can_transition_to(&SessionPhase::Loading));
        }
    }

    #[test]
    fn test_invalid_transitions() {
        // Outcomes only come out of Loading
        assert!(!SessionPhase::Idle.can_transition_to(&SessionPhase::Success));
        assert!(!SessionPhase::Idle.can_transition_to(&SessionPhase::Error));
        assert!(!SessionPhase::Success.can_transition_to(&SessionPhase::NoMatch));
        assert!(!SessionPhase::Error.can_transition_to(&SessionPhase::Success));

        // Nothing returns to Idle
        for phase in [
            SessionPhase::Idle,
            SessionPhase::Loading,
            SessionPhase::Success,
            SessionPhase::NoMatch,
            SessionPhase::Error,
        ] {
            assert!(!phase.can_transition_to(&SessionPhase::Idle));
        }
    }

    #[test]
    fn test_settled_phases() {
        assert!(!SessionPhase::Idle.is_settled());
        assert!(!SessionPhase::Loading.is_settled());
        assert!(SessionPhase::Success.is_settled());
        assert!(SessionPhase::NoMatch.is_settled());
        assert!(SessionPhase::Error.is_settled());
    }

    #[test]
    fn test_machine_happy_path() {
        let mut machine = PhaseMachine::new();
        assert_eq!(machine.current(), SessionPhase::Idle);

        machine.transition(SessionPhase::Loading).unwrap();
        machine.transition(SessionPhase::Success).unwrap();
        assert_eq!(machine.current(), SessionPhase::Success);

        machine.transition(SessionPhase::Loading).unwrap();
        machine.transition(SessionPhase::Error).unwrap();
        assert_eq!(machine.current(), SessionPhase::Error);
    }

    #[test]
    fn test_machine_invalid_transition_keeps_phase() {
        let mut machine = PhaseMachine::new();
        let result = machine.transition(SessionPhase::Success);
        match result {
            Err(GlimpseError::Session(msg)) => {
                assert!(msg.contains("Idle"));
                assert!(msg.contains("Success"));
            }
            _ => panic!("Expected Session error variant"),
        }
        assert_eq!(machine.current(), SessionPhase::Idle);
    }
}
