//! Compiled events and their runtime operations.
//!
//! Every event exposes three operations over a record:
//!
//! - [`Event::can`]: probe whether the event may fire from the current value
//! - [`Event::fire`]: run callbacks, mutate the attribute and optionally save
//! - [`Event::fire_strict`]: `fire` in danger mode
//!
//! The current attribute value is read fresh on every call; an event keeps
//! no per-record state between calls.

mod builder;
mod options;
mod transition;

pub use builder::{EventBuilder, Transitions};
pub use options::FireOptions;
pub use transition::{Transition, TransitionTable};

use crate::core::{Callback, Callbacks, State, StateSet};
use crate::error::{CallbackPhase, CurrentValue, FireError, WorkflowError};
use crate::record::{Attribute, Record, SaveOutcome};
use tracing::{debug, warn};

/// An event bound to one attribute of `R`.
///
/// Immutable once built; safe to share across threads and records.
pub struct Event<R, S: State> {
    name: String,
    attribute: Attribute<R, S>,
    states: StateSet<S>,
    table: TransitionTable<R, S>,
    callbacks: Callbacks<R>,
}

impl<R: Record, S: State> Event<R, S> {
    pub(crate) fn new(
        name: String,
        attribute: Attribute<R, S>,
        states: StateSet<S>,
        table: TransitionTable<R, S>,
        callbacks: Callbacks<R>,
    ) -> Self {
        Self {
            name,
            attribute,
            states,
            table,
            callbacks,
        }
    }

    /// Event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the attribute the event drives.
    pub fn attribute(&self) -> &str {
        self.attribute.name()
    }

    /// The event's transition table.
    pub fn transitions(&self) -> &TransitionTable<R, S> {
        &self.table
    }

    /// Callbacks registered for `phase`.
    pub fn callbacks(&self, phase: CallbackPhase) -> &[Callback<R>] {
        self.callbacks.get(phase)
    }

    /// Target state for `from`, ignoring guards.
    pub fn target_for(&self, from: &S) -> Option<&S> {
        self.table.get(from).map(|t| &t.to)
    }

    /// Find the eligible transition for the record's current value.
    ///
    /// In danger mode a missing transition or a failing guard is an error;
    /// otherwise both yield `None`.
    fn resolve(&self, record: &R, danger: bool) -> Result<Option<&Transition<R, S>>, WorkflowError> {
        let current = self.attribute.read(record);
        let Some(transition) = current.as_ref().and_then(|state| self.table.get(state)) else {
            let from = match &current {
                Some(state) if self.states.contains(state) => {
                    CurrentValue::Known(state.name().to_string())
                }
                Some(state) => CurrentValue::Unknown(state.name().to_string()),
                None => CurrentValue::Absent,
            };
            debug!(event = %self.name, %from, "no transition for current value");
            if danger {
                return Err(WorkflowError::State {
                    event: self.name.clone(),
                    from,
                });
            }
            return Ok(None);
        };

        if transition.can_execute(record)? {
            return Ok(Some(transition));
        }

        debug!(event = %self.name, from = transition.from.name(), "transition guard rejected");
        if danger {
            return Err(WorkflowError::Condition {
                event: self.name.clone(),
            });
        }
        Ok(None)
    }

    /// Probe whether the event can fire. Never mutates or saves.
    pub fn can(&self, record: &R, danger: bool) -> Result<bool, WorkflowError> {
        Ok(self.resolve(record, danger)?.is_some())
    }

    /// Fire the event.
    ///
    /// Returns `Ok(false)` without side effects when the probe fails outside
    /// danger mode. On success the before-callbacks run, the attribute is set
    /// to the target, and the record is saved when `options.save` is set. The
    /// after-callbacks run unless the save reported [`SaveOutcome::Failed`],
    /// in which case `Ok(false)` is returned. A strict save error propagates as
    /// [`FireError::Save`]. The attribute change is never rolled back.
    pub fn fire(&self, record: &mut R, options: FireOptions) -> Result<bool, FireError<R::SaveError>> {
        let Some(transition) = self.resolve(record, options.danger)? else {
            return Ok(false);
        };
        let from = transition.from.clone();
        let to = transition.to.clone();

        self.callbacks.run(CallbackPhase::Before, record)?;
        self.attribute.write(record, to.clone());
        debug!(
            event = %self.name,
            attribute = self.attribute.name(),
            from = from.name(),
            to = to.name(),
            save = options.save,
            danger = options.danger,
            "event fired"
        );

        let committed = if !options.save {
            true
        } else if options.danger {
            record.save_strict().map_err(FireError::Save)?;
            true
        } else {
            match record.save() {
                SaveOutcome::Saved => true,
                SaveOutcome::Failed => {
                    warn!(event = %self.name, to = to.name(), "record save failed after transition");
                    false
                }
            }
        };

        if committed {
            self.callbacks.run(CallbackPhase::After, record)?;
        }
        Ok(committed)
    }

    /// Fire in danger mode.
    pub fn fire_strict(&self, record: &mut R, save: bool) -> Result<bool, FireError<R::SaveError>> {
        self.fire(record, FireOptions::strict(save))
    }
}

impl<R, S: State> std::fmt::Debug for Event<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("attribute", &self.attribute)
            .field("transitions", &self.table.iter().collect::<Vec<_>>())
            .finish()
    }
}
