//! Callbacks run around an event's attribute mutation.

use crate::error::{ArgumentError, CallbackPhase, WorkflowError};
use crate::record::Record;
use std::fmt;
use std::sync::Arc;

/// Boxed inline callback, as accepted by [`Callback::from_parts`].
pub type InlineAction<R> = Box<dyn Fn(&mut R) + Send + Sync>;

/// A zero-argument action invoked with the record: a named record method or
/// an inline closure.
pub enum Callback<R> {
    Named(String),
    Inline(Arc<dyn Fn(&mut R) + Send + Sync>),
}

impl<R: Record> Callback<R> {
    /// Callback dispatched to [`Record::action`] by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Callback running a closure on the record.
    pub fn inline<F>(action: F) -> Self
    where
        F: Fn(&mut R) + Send + Sync + 'static,
    {
        Self::Inline(Arc::new(action))
    }

    /// Build a callback from exactly one of a method name or a closure.
    ///
    /// Supplying both, or neither, is an argument error for `phase`.
    pub fn from_parts(
        phase: CallbackPhase,
        name: Option<String>,
        action: Option<InlineAction<R>>,
    ) -> Result<Self, ArgumentError> {
        match (name, action) {
            (Some(name), None) => Ok(Self::Named(name)),
            (None, Some(action)) => Ok(Self::Inline(Arc::from(action))),
            _ => Err(ArgumentError::InvalidCallback { phase }),
        }
    }

    /// Invoke the callback. Fails when a named action is not dispatched.
    pub fn run(&self, record: &mut R) -> Result<(), WorkflowError> {
        match self {
            Self::Named(name) => {
                if record.action(name) {
                    Ok(())
                } else {
                    Err(WorkflowError::UndefinedMethod { name: name.clone() })
                }
            }
            Self::Inline(action) => {
                action(record);
                Ok(())
            }
        }
    }
}

impl<R> Clone for Callback<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Named(name) => Self::Named(name.clone()),
            Self::Inline(action) => Self::Inline(Arc::clone(action)),
        }
    }
}

impl<R> fmt::Debug for Callback<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Inline(_) => f.write_str("Inline(..)"),
        }
    }
}

impl<R> From<&str> for Callback<R> {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl<R> From<String> for Callback<R> {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

/// The before/after callback sequences of one event.
///
/// Registration order is execution order; repeats run repeatedly.
pub struct Callbacks<R> {
    before: Vec<Callback<R>>,
    after: Vec<Callback<R>>,
}

impl<R: Record> Callbacks<R> {
    /// Create empty before and after sequences.
    pub fn new() -> Self {
        Self {
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Append a callback to `phase`.
    pub fn push(&mut self, phase: CallbackPhase, callback: Callback<R>) {
        match phase {
            CallbackPhase::Before => self.before.push(callback),
            CallbackPhase::After => self.after.push(callback),
        }
    }

    /// Callbacks of `phase`, in registration order.
    pub fn get(&self, phase: CallbackPhase) -> &[Callback<R>] {
        match phase {
            CallbackPhase::Before => &self.before,
            CallbackPhase::After => &self.after,
        }
    }

    /// Run every callback of `phase` in registration order.
    pub fn run(&self, phase: CallbackPhase, record: &mut R) -> Result<(), WorkflowError> {
        self.get(phase)
            .iter()
            .try_for_each(|callback| callback.run(record))
    }
}

impl<R: Record> Default for Callbacks<R> {
    fn default() -> Self {
        Self::new()
    }
}
