//! Error taxonomy for machine definition and event execution.
//!
//! Definition errors are raised while a machine is being built and are always
//! fatal. Workflow errors are raised only when an event is invoked in danger
//! mode; otherwise the same conditions downgrade to a plain `false`.

use std::fmt;
use thiserror::Error;

/// Errors raised while building a machine or one of its events.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DefinitionError {
    #[error("undefined state {state}")]
    UndefinedState { state: String },

    #[error("duplicate entry: transition from {from} to {to} has already been defined")]
    DuplicateTransition { from: String, to: String },

    #[error("event {name} has already been defined")]
    DuplicateEvent { name: String },

    #[error("one of the {name}, {name}! or can_{name}? methods already defined")]
    MethodCollision { name: String },

    #[error(transparent)]
    Argument(#[from] ArgumentError),
}

/// Malformed guard or callback specifications.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ArgumentError {
    #[error("`{keyword}` condition can be nil, a method name or callable, but {found} given")]
    InvalidCondition {
        keyword: ConditionKeyword,
        found: String,
    },

    #[error("use a method name or closure for `{phase}` callback")]
    InvalidCallback { phase: CallbackPhase },
}

/// Which side of a guard a condition was declared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKeyword {
    If,
    Unless,
}

impl fmt::Display for ConditionKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::If => f.write_str("if"),
            Self::Unless => f.write_str("unless"),
        }
    }
}

/// When a callback runs relative to the attribute mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackPhase {
    Before,
    After,
}

impl fmt::Display for CallbackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => f.write_str("before"),
            Self::After => f.write_str("after"),
        }
    }
}

/// The attribute value an event was invoked from, as rendered in errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentValue {
    /// A declared state with no transition for the event.
    Known(String),
    /// A value outside the declared set.
    Unknown(String),
    /// No value at all.
    Absent,
}

impl fmt::Display for CurrentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(name) => write!(f, "state {name}"),
            Self::Unknown(name) => write!(f, "unknown state {name}"),
            Self::Absent => f.write_str("unknown state nil"),
        }
    }
}

/// Runtime failures of an event's probe.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    #[error("can't fire {event} event from {from}")]
    State { event: String, from: CurrentValue },

    #[error("conditions for {event} event does not met")]
    Condition { event: String },

    #[error("undefined method {name} for record")]
    UndefinedMethod { name: String },
}

/// Everything that can go wrong while firing an event.
///
/// `E` is the record's strict-save error, forwarded unchanged.
#[derive(Debug, Error)]
pub enum FireError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Save(E),

    #[error("undefined event {name}")]
    UnknownEvent { name: String },
}

impl<E: std::error::Error + 'static> FireError<E> {
    /// The workflow error, if this failure is one.
    pub fn as_workflow(&self) -> Option<&WorkflowError> {
        match self {
            Self::Workflow(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the strict save failed.
    pub fn is_save(&self) -> bool {
        matches!(self, Self::Save(_))
    }
}
