//! Declaring an event: transition statements and callbacks.

use crate::core::{Callback, Callbacks, Condition, Guard, InlineAction, State, StateSet};
use crate::error::{CallbackPhase, DefinitionError};
use crate::event::transition::{Transition, TransitionTable};
use crate::event::Event;
use crate::record::{Attribute, Record};

/// One `transition` statement: source-to-target mappings sharing a guard.
pub struct Transitions<R, S> {
    mappings: Vec<(Vec<S>, S)>,
    when: Option<Condition<R>>,
    unless: Option<Condition<R>>,
}

impl<R: Record + 'static, S: State> Transitions<R, S> {
    /// Create an empty statement.
    pub fn new() -> Self {
        Self {
            mappings: Vec::new(),
            when: None,
            unless: None,
        }
    }

    /// Map a single source to `to`.
    pub fn map(mut self, from: S, to: S) -> Self {
        self.mappings.push((vec![from], to));
        self
    }

    /// Map every listed source to the same `to`.
    pub fn map_many<I>(mut self, from: I, to: S) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        self.mappings.push((from.into_iter().collect(), to));
        self
    }

    /// Positive (`if`) condition.
    pub fn when(mut self, condition: impl Into<Condition<R>>) -> Self {
        self.when = Some(condition.into());
        self
    }

    /// Positive condition given as a closure.
    pub fn when_fn<F>(self, predicate: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.when(Condition::inline(predicate))
    }

    /// Negative (`unless`) condition.
    pub fn unless(mut self, condition: impl Into<Condition<R>>) -> Self {
        self.unless = Some(condition.into());
        self
    }

    /// Negative condition given as a closure.
    pub fn unless_fn<F>(self, predicate: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.unless(Condition::inline(predicate))
    }
}

impl<R: Record + 'static, S: State> Default for Transitions<R, S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder handed to an event's definition body.
pub struct EventBuilder<R, S: State> {
    name: String,
    states: StateSet<S>,
    table: TransitionTable<R, S>,
    callbacks: Callbacks<R>,
}

impl<R: Record + 'static, S: State> EventBuilder<R, S> {
    pub(crate) fn new(name: impl Into<String>, states: StateSet<S>) -> Self {
        Self {
            name: name.into(),
            states,
            table: TransitionTable::new(),
            callbacks: Callbacks::new(),
        }
    }

    /// Name of the event being declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every state declared for the attribute.
    pub fn all(&self) -> Vec<S> {
        self.states.all()
    }

    /// Every declared state except `excluded`.
    pub fn all_except(&self, excluded: &[S]) -> Vec<S> {
        self.states.except(excluded)
    }

    /// Look up a declared state by name.
    pub fn state_named(&self, name: &str) -> Result<S, DefinitionError> {
        self.states
            .find(name)
            .cloned()
            .ok_or_else(|| DefinitionError::UndefinedState {
                state: name.to_string(),
            })
    }

    /// Add a transition statement to the event's table.
    ///
    /// Each target is checked before its sources, and sources are checked in
    /// declaration order; the first undeclared state or already-mapped source
    /// fails the definition.
    pub fn transition(&mut self, statement: Transitions<R, S>) -> Result<&mut Self, DefinitionError> {
        let guard = Guard::compose(statement.when, statement.unless);

        for (sources, to) in statement.mappings {
            self.states.require(&to)?;
            for from in sources {
                self.states.require(&from)?;
                self.table.insert(Transition {
                    from,
                    to: to.clone(),
                    guard: guard.clone(),
                })?;
            }
        }
        Ok(self)
    }

    /// Add a before-callback.
    pub fn before(&mut self, callback: impl Into<Callback<R>>) -> &mut Self {
        self.callbacks.push(CallbackPhase::Before, callback.into());
        self
    }

    /// Add a before-callback given as a closure.
    pub fn before_fn<F>(&mut self, action: F) -> &mut Self
    where
        F: Fn(&mut R) + Send + Sync + 'static,
    {
        self.before(Callback::inline(action))
    }

    /// Add an after-callback.
    pub fn after(&mut self, callback: impl Into<Callback<R>>) -> &mut Self {
        self.callbacks.push(CallbackPhase::After, callback.into());
        self
    }

    /// Add an after-callback given as a closure.
    pub fn after_fn<F>(&mut self, action: F) -> &mut Self
    where
        F: Fn(&mut R) + Send + Sync + 'static,
    {
        self.after(Callback::inline(action))
    }

    /// Register a callback given as an optional name and an optional closure.
    ///
    /// Exactly one of the two must be present.
    pub fn callback(
        &mut self,
        phase: CallbackPhase,
        name: Option<&str>,
        action: Option<InlineAction<R>>,
    ) -> Result<&mut Self, DefinitionError> {
        let callback = Callback::from_parts(phase, name.map(str::to_string), action)?;
        self.callbacks.push(phase, callback);
        Ok(self)
    }

    pub(crate) fn build(self, attribute: Attribute<R, S>) -> Event<R, S> {
        Event::new(self.name, attribute, self.states, self.table, self.callbacks)
    }
}
