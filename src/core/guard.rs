//! Guard predicates for controlling state transitions.
//!
//! A guard combines an optional positive (`if`) and an optional negative
//! (`unless`) condition into one predicate over the host record:
//! `(if ? if() : true) && (unless ? !unless() : true)`.

use crate::error::WorkflowError;
use crate::record::Record;
use std::fmt;
use std::sync::Arc;

/// Uniform zero-argument predicate, evaluated with the record passed in.
type Predicate<R> = Arc<dyn Fn(&R) -> Result<bool, WorkflowError> + Send + Sync>;

/// One side of a guard: a named record method or an inline closure.
pub enum Condition<R> {
    Named(String),
    Inline(Arc<dyn Fn(&R) -> bool + Send + Sync>),
}

impl<R: Record + 'static> Condition<R> {
    /// Condition dispatched to [`Record::predicate`] by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Condition evaluated by a closure over the record.
    pub fn inline<F>(predicate: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        Self::Inline(Arc::new(predicate))
    }

    /// Normalize to a predicate that dispatches by name at evaluation time.
    fn into_predicate(self) -> Predicate<R> {
        match self {
            Self::Named(name) => Arc::new(move |record: &R| {
                record
                    .predicate(&name)
                    .ok_or_else(|| WorkflowError::UndefinedMethod { name: name.clone() })
            }),
            Self::Inline(predicate) => Arc::new(move |record: &R| Ok(predicate(record))),
        }
    }
}

impl<R> Clone for Condition<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Named(name) => Self::Named(name.clone()),
            Self::Inline(predicate) => Self::Inline(Arc::clone(predicate)),
        }
    }
}

impl<R> fmt::Debug for Condition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Inline(_) => f.write_str("Inline(..)"),
        }
    }
}

impl<R> From<&str> for Condition<R> {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl<R> From<String> for Condition<R> {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

/// Composed transition guard, evaluated lazily once per probe.
///
/// # Example
///
/// ```rust
/// use stateful_enum::core::{Condition, Guard};
/// use stateful_enum::record::{Record, SaveOutcome};
///
/// struct Order { paid: bool, flagged: bool }
///
/// impl Record for Order {
///     type SaveError = std::io::Error;
///     fn save(&mut self) -> SaveOutcome { SaveOutcome::Saved }
///     fn save_strict(&mut self) -> Result<(), std::io::Error> { Ok(()) }
/// }
///
/// let guard = Guard::compose(
///     Some(Condition::inline(|o: &Order| o.paid)),
///     Some(Condition::inline(|o: &Order| o.flagged)),
/// )
/// .unwrap();
///
/// assert!(guard.check(&Order { paid: true, flagged: false }).unwrap());
/// assert!(!guard.check(&Order { paid: true, flagged: true }).unwrap());
/// ```
pub struct Guard<R> {
    predicate: Predicate<R>,
}

impl<R: Record + 'static> Guard<R> {
    /// Create a guard from an inline predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Condition::inline(predicate).into_predicate(),
        }
    }

    /// Combine `if` and `unless` conditions.
    ///
    /// Returns `None` when both are absent: the transition is then always
    /// eligible once its source matches.
    pub fn compose(when: Option<Condition<R>>, unless: Option<Condition<R>>) -> Option<Self> {
        let predicate: Predicate<R> = match (when, unless) {
            (None, None) => return None,
            (Some(when), None) => when.into_predicate(),
            (None, Some(unless)) => {
                let unless = unless.into_predicate();
                Arc::new(move |record: &R| Ok(!unless(record)?))
            }
            (Some(when), Some(unless)) => {
                let when = when.into_predicate();
                let unless = unless.into_predicate();
                Arc::new(move |record: &R| Ok(when(record)? && !unless(record)?))
            }
        };
        Some(Self { predicate })
    }
}

impl<R> Guard<R> {
    /// Evaluate the guard against a record.
    ///
    /// Fails only when a named condition is not dispatched by the record.
    pub fn check(&self, record: &R) -> Result<bool, WorkflowError> {
        (self.predicate)(record)
    }
}

impl<R> Clone for Guard<R> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<R> fmt::Debug for Guard<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
