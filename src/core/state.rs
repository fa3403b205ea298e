//! Core State trait for enumerated attribute values.
//!
//! A state is an opaque identifier drawn from a fixed set declared once per
//! attribute. The engine only ever compares states and renders their names.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for values of a stateful attribute.
///
/// # Required Traits
///
/// - `Clone`: the engine writes a copy of the target state into the record
/// - `PartialEq`: transition lookup compares the current value to sources
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: the attribute lives on a persisted record
///
/// # Example
///
/// ```rust
/// use stateful_enum::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Ticket {
///     Opened,
///     Closed,
/// }
///
/// impl State for Ticket {
///     fn name(&self) -> &str {
///         match self {
///             Self::Opened => "opened",
///             Self::Closed => "closed",
///         }
///     }
/// }
///
/// assert_eq!(Ticket::Closed.name(), "closed");
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name as used in definitions and error messages.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Zero,
        One,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Zero => "zero",
                Self::One => "one",
            }
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Zero.name(), "zero");
        assert_eq!(TestState::One.name(), "one");
    }

    #[test]
    fn state_serializes_correctly() {
        let state = TestState::One;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }

    #[test]
    fn state_is_comparable() {
        assert_eq!(TestState::Zero, TestState::Zero.clone());
        assert_ne!(TestState::Zero, TestState::One);
    }
}
