//! Per-record-type registry of compiled events.
//!
//! A record type may carry several stateful attributes, each with its own
//! machine and state type. The schema erases the state type so every event
//! of the record can be looked up and invoked by name.

use crate::core::{State, StateSet};
use crate::definition::MachineDefinition;
use crate::error::{DefinitionError, FireError, WorkflowError};
use crate::event::{Event, FireOptions};
use crate::machine::{attribute_names, generated_names, Machine, MachineBuilder};
use crate::record::{Attribute, Record};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::trace;

/// Type-erased event entry.
///
/// Lets the schema store events of different state types in one map while
/// keeping typed execution.
trait EventEntry<R: Record>: Send + Sync {
    fn attribute(&self) -> &str;

    fn can(&self, record: &R, danger: bool) -> Result<bool, WorkflowError>;

    fn fire(&self, record: &mut R, options: FireOptions) -> Result<bool, FireError<R::SaveError>>;
}

impl<R, S> EventEntry<R> for Event<R, S>
where
    R: Record + 'static,
    S: State,
{
    fn attribute(&self) -> &str {
        Event::attribute(self)
    }

    fn can(&self, record: &R, danger: bool) -> Result<bool, WorkflowError> {
        Event::can(self, record, danger)
    }

    fn fire(&self, record: &mut R, options: FireOptions) -> Result<bool, FireError<R::SaveError>> {
        Event::fire(self, record, options)
    }
}

/// Every event declared for record type `R`, keyed by event name.
///
/// Built once while setting up the record type, then shared read-only.
pub struct Schema<R: Record> {
    reserved: BTreeSet<String>,
    attributes: Vec<String>,
    events: HashMap<String, Arc<dyn EventEntry<R>>>,
}

impl<R: Record + 'static> Schema<R> {
    /// Start a schema, reserving the record's own method names.
    pub fn new() -> Self {
        Self {
            reserved: R::method_names().iter().map(|name| name.to_string()).collect(),
            attributes: Vec::new(),
            events: HashMap::new(),
        }
    }

    /// Declare a machine for one attribute.
    ///
    /// Event names may not shadow the record's methods, the accessors of
    /// any attribute with a machine, or another event's operations.
    /// Nothing is registered unless the whole definition succeeds.
    pub fn define<S, I, F>(
        &mut self,
        attribute: Attribute<R, S>,
        states: I,
        body: F,
    ) -> Result<&mut Self, DefinitionError>
    where
        S: State + 'static,
        I: IntoIterator<Item = S>,
        F: FnOnce(&mut MachineBuilder<'_, R, S>) -> Result<(), DefinitionError>,
    {
        let machine =
            Machine::define_with_reserved(attribute, StateSet::new(states), &self.reserved, body)?;
        self.register(machine);
        Ok(self)
    }

    /// Declare a machine for one attribute from a declarative definition.
    ///
    /// `universe` lists every value of `S`; definition state names are
    /// resolved against it.
    pub fn load<S, I>(
        &mut self,
        attribute: Attribute<R, S>,
        universe: I,
        definition: &MachineDefinition,
    ) -> Result<&mut Self, DefinitionError>
    where
        S: State + 'static,
        I: IntoIterator<Item = S>,
    {
        let universe = StateSet::new(universe);
        let states = definition.resolve_states(&universe)?;
        let machine = Machine::define_with_reserved(attribute, states, &self.reserved, |m| {
            definition.apply(m)
        })?;
        self.register(machine);
        Ok(self)
    }

    fn register<S: State + 'static>(&mut self, machine: Machine<R, S>) {
        let attribute = machine.attribute().to_string();
        self.reserved.extend(attribute_names(&attribute));
        let mut count = 0;
        for event in machine.into_events() {
            self.reserved.extend(generated_names(event.name()));
            self.events
                .insert(event.name().to_string(), Arc::new(event) as Arc<dyn EventEntry<R>>);
            count += 1;
        }
        trace!(attribute = %attribute, events = count, "registered state machine");
        self.attributes.push(attribute);
    }

    fn entry(&self, event: &str) -> Result<&Arc<dyn EventEntry<R>>, FireError<R::SaveError>> {
        self.events.get(event).ok_or_else(|| FireError::UnknownEvent {
            name: event.to_string(),
        })
    }

    /// `can_<event>?`
    pub fn can(&self, record: &R, event: &str, danger: bool) -> Result<bool, FireError<R::SaveError>> {
        Ok(self.entry(event)?.can(record, danger)?)
    }

    /// `<event>(save, danger)`
    pub fn fire(
        &self,
        record: &mut R,
        event: &str,
        options: FireOptions,
    ) -> Result<bool, FireError<R::SaveError>> {
        self.entry(event)?.fire(record, options)
    }

    /// `<event>!(save)`
    pub fn fire_strict(
        &self,
        record: &mut R,
        event: &str,
        save: bool,
    ) -> Result<bool, FireError<R::SaveError>> {
        self.fire(record, event, FireOptions::strict(save))
    }

    /// Whether an event with this name is registered.
    pub fn has_event(&self, event: &str) -> bool {
        self.events.contains_key(event)
    }

    /// Attribute an event belongs to.
    pub fn attribute_of(&self, event: &str) -> Option<&str> {
        self.events.get(event).map(|entry| entry.attribute())
    }

    /// Registered event names, sorted.
    pub fn event_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.events.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Every operation name taken on the record type, sorted.
    pub fn generated_names(&self) -> Vec<&str> {
        self.reserved.iter().map(String::as_str).collect()
    }

    /// Attributes with a declared machine, in declaration order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }
}

impl<R: Record + 'static> Default for Schema<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Transitions;
    use crate::record::SaveOutcome;
    use crate::state_enum;

    state_enum! {
        enum Phase {
            Draft,
            Live,
        }
    }

    state_enum! {
        enum Visibility {
            Hidden,
            Shown,
        }
    }

    struct Page {
        phase: Option<Phase>,
        visibility: Option<Visibility>,
    }

    impl Record for Page {
        type SaveError = std::io::Error;

        fn save(&mut self) -> SaveOutcome {
            SaveOutcome::Saved
        }

        fn save_strict(&mut self) -> Result<(), Self::SaveError> {
            Ok(())
        }

        fn method_names() -> &'static [&'static str] {
            &["save", "save!"]
        }
    }

    fn phase() -> Attribute<Page, Phase> {
        Attribute::new("phase", |p: &Page| p.phase, |p: &mut Page, v| p.phase = Some(v))
    }

    fn visibility() -> Attribute<Page, Visibility> {
        Attribute::new("visibility", |p: &Page| p.visibility, |p: &mut Page, v| {
            p.visibility = Some(v)
        })
    }

    fn schema() -> Schema<Page> {
        let mut schema = Schema::new();
        schema
            .define(phase(), Phase::variants(), |m| {
                m.event("publish", |e| {
                    e.transition(Transitions::new().map(Phase::Draft, Phase::Live))?;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap()
            .define(visibility(), Visibility::variants(), |m| {
                m.event("show", |e| {
                    e.transition(Transitions::new().map(Visibility::Hidden, Visibility::Shown))?;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();
        schema
    }

    #[test]
    fn dispatches_events_across_attributes() {
        let schema = schema();
        let mut page = Page {
            phase: Some(Phase::Draft),
            visibility: Some(Visibility::Hidden),
        };

        assert!(schema.fire(&mut page, "publish", FireOptions::default()).unwrap());
        assert!(schema.fire_strict(&mut page, "show", true).unwrap());
        assert_eq!(page.phase, Some(Phase::Live));
        assert_eq!(page.visibility, Some(Visibility::Shown));
        assert_eq!(schema.attribute_of("show"), Some("visibility"));
        assert_eq!(schema.attributes(), ["phase", "visibility"]);
        assert_eq!(schema.event_names(), vec!["publish", "show"]);
    }

    #[test]
    fn unknown_event_is_an_error() {
        let schema = schema();
        let page = Page {
            phase: None,
            visibility: None,
        };

        let err = schema.can(&page, "archive", false).unwrap_err();
        assert_eq!(err.to_string(), "undefined event archive");
    }

    #[test]
    fn second_machine_cannot_reuse_event_names() {
        let mut schema = schema();
        let result = schema.define(visibility(), Visibility::variants(), |m| {
            m.event("publish", |e| {
                e.transition(Transitions::new().map(Visibility::Shown, Visibility::Hidden))?;
                Ok(())
            })?;
            Ok(())
        });

        assert_eq!(
            result.err(),
            Some(DefinitionError::MethodCollision {
                name: "publish".into()
            })
        );
        assert_eq!(schema.attribute_of("publish"), Some("phase"));
        assert_eq!(schema.attributes().len(), 2);
    }

    #[test]
    fn attribute_accessors_are_reserved() {
        let mut empty = Schema::<Page>::new();
        let result = empty.define(phase(), Phase::variants(), |m| {
            m.event("phase", |e| {
                e.transition(Transitions::new().map(Phase::Draft, Phase::Live))?;
                Ok(())
            })?;
            Ok(())
        });
        assert_eq!(
            result.err(),
            Some(DefinitionError::MethodCollision {
                name: "phase".into()
            })
        );
        assert!(!empty.generated_names().contains(&"phase"));

        let mut full = schema();
        let result = full.define(visibility(), Visibility::variants(), |m| {
            m.event("phase=", |e| {
                e.transition(Transitions::new().map(Visibility::Shown, Visibility::Hidden))?;
                Ok(())
            })?;
            Ok(())
        });
        assert!(matches!(
            result,
            Err(DefinitionError::MethodCollision { .. })
        ));
        assert!(full.generated_names().contains(&"phase="));
        assert!(!full.generated_names().contains(&"visibility="));
    }

    #[test]
    fn record_methods_are_reserved() {
        let mut schema = Schema::<Page>::new();
        let result = schema.define(phase(), Phase::variants(), |m| {
            m.event("save", |_| Ok(()))?;
            Ok(())
        });

        assert!(matches!(
            result,
            Err(DefinitionError::MethodCollision { .. })
        ));
        assert!(schema.generated_names().contains(&"save!"));
    }

    #[test]
    fn failed_definition_registers_nothing() {
        let mut schema = Schema::<Page>::new();
        let result = schema.define(phase(), vec![Phase::Draft], |m| {
            m.event("publish", |e| {
                e.transition(Transitions::new().map(Phase::Draft, Phase::Live))?;
                Ok(())
            })?;
            Ok(())
        });

        assert!(result.is_err());
        assert!(!schema.has_event("publish"));
        assert!(schema.attributes().is_empty());
    }
}
