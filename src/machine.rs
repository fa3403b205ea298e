//! Machines: the states and events declared for one attribute.

use crate::core::{State, StateSet};
use crate::error::DefinitionError;
use crate::event::{Event, EventBuilder};
use crate::record::{Attribute, Record};
use std::collections::BTreeSet;

/// The three operation names generated for an event.
pub fn generated_names(event: &str) -> [String; 3] {
    [
        event.to_string(),
        format!("{event}!"),
        format!("can_{event}?"),
    ]
}

/// Accessor names the attribute itself occupies on the record type.
pub fn attribute_names(attribute: &str) -> [String; 2] {
    [attribute.to_string(), format!("{attribute}=")]
}

/// Builder handed to a machine's definition body.
pub struct MachineBuilder<'a, R, S: State> {
    attribute: Attribute<R, S>,
    states: StateSet<S>,
    reserved: &'a BTreeSet<String>,
    events: Vec<Event<R, S>>,
}

impl<'a, R: Record + 'static, S: State> MachineBuilder<'a, R, S> {
    fn new(attribute: Attribute<R, S>, states: StateSet<S>, reserved: &'a BTreeSet<String>) -> Self {
        Self {
            attribute,
            states,
            reserved,
            events: Vec::new(),
        }
    }

    /// States declared for the attribute.
    pub fn states(&self) -> &StateSet<S> {
        &self.states
    }

    /// Declare an event.
    ///
    /// Fails when the name was already declared in this machine, or when
    /// any of its generated operation names is already taken on the record
    /// type.
    pub fn event<F>(&mut self, name: &str, body: F) -> Result<&mut Self, DefinitionError>
    where
        F: FnOnce(&mut EventBuilder<R, S>) -> Result<(), DefinitionError>,
    {
        if self.events.iter().any(|event| event.name() == name) {
            return Err(DefinitionError::DuplicateEvent {
                name: name.to_string(),
            });
        }
        let taken = generated_names(name).iter().any(|candidate| {
            self.reserved.contains(candidate)
                || self
                    .events
                    .iter()
                    .any(|event| generated_names(event.name()).contains(candidate))
        });
        if taken {
            return Err(DefinitionError::MethodCollision {
                name: name.to_string(),
            });
        }

        let mut builder = EventBuilder::new(name, self.states.clone());
        body(&mut builder)?;
        self.events.push(builder.build(self.attribute.clone()));
        Ok(self)
    }
}

/// Immutable set of events for one attribute of `R`.
pub struct Machine<R, S: State> {
    attribute: String,
    states: StateSet<S>,
    events: Vec<Event<R, S>>,
}

impl<R: Record + 'static, S: State> Machine<R, S> {
    /// Define a machine for `attribute` over `states`.
    ///
    /// Event names are checked against [`Record::method_names`] and the
    /// attribute's own accessor names.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stateful_enum::event::{FireOptions, Transitions};
    /// use stateful_enum::machine::Machine;
    /// use stateful_enum::record::{Attribute, Record, SaveOutcome};
    /// use stateful_enum::state_enum;
    ///
    /// state_enum! {
    ///     enum Status { Opened, Closed }
    /// }
    ///
    /// struct Issue { status: Option<Status> }
    ///
    /// impl Record for Issue {
    ///     type SaveError = std::io::Error;
    ///     fn save(&mut self) -> SaveOutcome { SaveOutcome::Saved }
    ///     fn save_strict(&mut self) -> Result<(), std::io::Error> { Ok(()) }
    /// }
    ///
    /// let machine = Machine::define(
    ///     Attribute::new("status", |i: &Issue| i.status, |i: &mut Issue, s| i.status = Some(s)),
    ///     Status::variants(),
    ///     |m| {
    ///         m.event("close", |e| {
    ///             e.transition(Transitions::new().map(Status::Opened, Status::Closed))?;
    ///             Ok(())
    ///         })?;
    ///         Ok(())
    ///     },
    /// )
    /// .unwrap();
    ///
    /// let mut issue = Issue { status: Some(Status::Opened) };
    /// let close = machine.event("close").unwrap();
    /// assert!(close.fire(&mut issue, FireOptions::default()).unwrap());
    /// assert_eq!(issue.status, Some(Status::Closed));
    /// ```
    pub fn define<I, F>(attribute: Attribute<R, S>, states: I, body: F) -> Result<Self, DefinitionError>
    where
        I: IntoIterator<Item = S>,
        F: FnOnce(&mut MachineBuilder<'_, R, S>) -> Result<(), DefinitionError>,
    {
        let reserved: BTreeSet<String> = R::method_names().iter().map(|name| name.to_string()).collect();
        Self::define_with_reserved(attribute, StateSet::new(states), &reserved, body)
    }

    pub(crate) fn define_with_reserved<F>(
        attribute: Attribute<R, S>,
        states: StateSet<S>,
        reserved: &BTreeSet<String>,
        body: F,
    ) -> Result<Self, DefinitionError>
    where
        F: FnOnce(&mut MachineBuilder<'_, R, S>) -> Result<(), DefinitionError>,
    {
        let name = attribute.name().to_string();
        let mut reserved = reserved.clone();
        reserved.extend(attribute_names(&name));
        let mut builder = MachineBuilder::new(attribute, states, &reserved);
        body(&mut builder)?;
        Ok(Self {
            attribute: name,
            states: builder.states,
            events: builder.events,
        })
    }

    /// Name of the attribute this machine drives.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Declared states, in declaration order.
    pub fn all_states(&self) -> &StateSet<S> {
        &self.states
    }

    /// Look up an event by name.
    pub fn event(&self, name: &str) -> Option<&Event<R, S>> {
        self.events.iter().find(|event| event.name() == name)
    }

    /// Events in declaration order.
    pub fn events(&self) -> impl Iterator<Item = &Event<R, S>> {
        self.events.iter()
    }

    pub(crate) fn into_events(self) -> Vec<Event<R, S>> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Transitions;
    use crate::record::SaveOutcome;
    use crate::state_enum;

    state_enum! {
        enum Level {
            Zero,
            One,
            Two,
        }
    }

    struct Widget {
        level: Option<Level>,
    }

    impl Record for Widget {
        type SaveError = std::io::Error;

        fn save(&mut self) -> SaveOutcome {
            SaveOutcome::Saved
        }

        fn save_strict(&mut self) -> Result<(), Self::SaveError> {
            Ok(())
        }

        fn method_names() -> &'static [&'static str] {
            &["reset", "can_refresh?"]
        }
    }

    fn attribute() -> Attribute<Widget, Level> {
        Attribute::new("level", |w: &Widget| w.level, |w: &mut Widget, l| {
            w.level = Some(l)
        })
    }

    fn zero_to_one(e: &mut EventBuilder<Widget, Level>) -> Result<(), DefinitionError> {
        e.transition(Transitions::new().map(Level::Zero, Level::One))?;
        Ok(())
    }

    #[test]
    fn generated_names_cover_three_operations() {
        assert_eq!(generated_names("close"), ["close", "close!", "can_close?"]);
    }

    #[test]
    fn defines_events_in_order() {
        let machine = Machine::define(attribute(), Level::variants(), |m| {
            m.event("zero_to_one", zero_to_one)?
                .event("one_to_two", |e| {
                    e.transition(Transitions::new().map(Level::One, Level::Two))?;
                    Ok(())
                })?;
            Ok(())
        })
        .unwrap();

        let names: Vec<_> = machine.events().map(|e| e.name()).collect();
        assert_eq!(names, vec!["zero_to_one", "one_to_two"]);
        assert_eq!(machine.attribute(), "level");
        assert_eq!(machine.all_states().len(), 3);
        assert!(machine.event("missing").is_none());
    }

    #[test]
    fn duplicate_event_fails_at_definition() {
        let result = Machine::define(attribute(), Level::variants(), |m| {
            m.event("some_event", zero_to_one)?;
            m.event("some_event", |e| {
                e.transition(Transitions::new().map(Level::One, Level::Two))?;
                Ok(())
            })?;
            Ok(())
        });

        assert_eq!(
            result.err().unwrap().to_string(),
            "event some_event has already been defined"
        );
    }

    #[test]
    fn existing_record_methods_block_event_names() {
        for name in ["reset", "refresh"] {
            let result = Machine::define(attribute(), Level::variants(), |m| {
                m.event(name, zero_to_one)?;
                Ok(())
            });
            assert_eq!(
                result.err(),
                Some(DefinitionError::MethodCollision { name: name.into() })
            );
        }
    }

    #[test]
    fn event_named_after_its_attribute_collides() {
        for name in ["level", "level="] {
            let result = Machine::define(attribute(), Level::variants(), |m| {
                m.event(name, zero_to_one)?;
                Ok(())
            });
            assert_eq!(
                result.err(),
                Some(DefinitionError::MethodCollision { name: name.into() })
            );
        }
    }

    #[test]
    fn generated_names_of_sibling_events_collide() {
        // "go!" is already the strict form of "go".
        let result = Machine::define(attribute(), Level::variants(), |m| {
            m.event("go", zero_to_one)?;
            m.event("go!", zero_to_one)?;
            Ok(())
        });
        assert!(matches!(
            result,
            Err(DefinitionError::MethodCollision { .. })
        ));
    }

    #[test]
    fn undefined_state_inside_event_fails_definition() {
        let result = Machine::define(attribute(), vec![Level::Zero, Level::One], |m| {
            m.event("bad_event", |e| {
                e.transition(Transitions::new().map(Level::Zero, Level::Two))?;
                Ok(())
            })?;
            Ok(())
        });

        assert_eq!(result.err().unwrap().to_string(), "undefined state Two");
    }
}
