//! Declarative machine definitions.
//!
//! A machine can be described as data (typically JSON) instead of Rust
//! closures. Conditions and callbacks are then always named record methods;
//! their raw values are shape-checked while the definition is applied.
//!
//! ```json
//! {
//!   "states": ["zero", "one", "two"],
//!   "events": [
//!     {
//!       "name": "advance",
//!       "before": ["touch"],
//!       "transitions": [
//!         { "map": [{ "from": ["zero", "one"], "to": "two" }], "if": "ready?" }
//!       ]
//!     }
//!   ]
//! }
//! ```

use crate::core::{Callback, Condition, State, StateSet};
use crate::error::{ArgumentError, CallbackPhase, ConditionKeyword, DefinitionError};
use crate::event::{EventBuilder, Transitions};
use crate::machine::{generated_names, MachineBuilder};
use crate::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Source side of a mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sources {
    One(String),
    Many(Vec<String>),
    /// Every declared state except the listed ones.
    AllExcept { all_except: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingDefinition {
    pub from: Sources,
    pub to: String,
}

/// One transition statement: mappings sharing an `if`/`unless` guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionDefinition {
    pub map: Vec<MappingDefinition>,
    #[serde(rename = "if", default, skip_serializing_if = "Value::is_null")]
    pub when: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub unless: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub name: String,
    #[serde(default)]
    pub transitions: Vec<TransitionDefinition>,
    #[serde(default)]
    pub before: Vec<Value>,
    #[serde(default)]
    pub after: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineDefinition {
    pub states: Vec<String>,
    #[serde(default)]
    pub events: Vec<EventDefinition>,
}

/// Name of a JSON value's type as reported in argument errors.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "Null",
        Value::Bool(_) => "Boolean",
        Value::Number(n) if n.is_f64() => "Float",
        Value::Number(_) => "Integer",
        Value::String(_) => "String",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
    }
}

fn condition<R: Record + 'static>(
    keyword: ConditionKeyword,
    value: &Value,
) -> Result<Option<Condition<R>>, ArgumentError> {
    match value {
        Value::Null => Ok(None),
        Value::String(name) => Ok(Some(Condition::named(name.as_str()))),
        other => Err(ArgumentError::InvalidCondition {
            keyword,
            found: type_name(other).to_string(),
        }),
    }
}

fn callback<R: Record>(phase: CallbackPhase, value: &Value) -> Result<Callback<R>, ArgumentError> {
    match value {
        Value::String(name) => Ok(Callback::named(name.as_str())),
        _ => Err(ArgumentError::InvalidCallback { phase }),
    }
}

impl Sources {
    /// Source names in order, expanding `all_except` against `declared`.
    fn names<'a>(&'a self, declared: &'a [String]) -> Vec<&'a str> {
        match self {
            Self::One(name) => vec![name.as_str()],
            Self::Many(names) => names.iter().map(String::as_str).collect(),
            Self::AllExcept { all_except } => declared
                .iter()
                .filter(|state| !all_except.contains(state))
                .map(String::as_str)
                .collect(),
        }
    }
}

impl MachineDefinition {
    /// Parse a definition from a JSON string.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Convert an already-parsed JSON value into a definition.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Resolve the declared state names against every value of `S`.
    pub fn resolve_states<S: State>(
        &self,
        universe: &StateSet<S>,
    ) -> Result<StateSet<S>, DefinitionError> {
        self.states
            .iter()
            .map(|name| {
                universe
                    .find(name)
                    .cloned()
                    .ok_or_else(|| DefinitionError::UndefinedState { state: name.clone() })
            })
            .collect()
    }

    /// Declare every event of this definition on `machine`.
    pub fn apply<R, S>(&self, machine: &mut MachineBuilder<'_, R, S>) -> Result<(), DefinitionError>
    where
        R: Record + 'static,
        S: State,
    {
        for event in &self.events {
            machine.event(&event.name, |builder| event.apply(builder))?;
        }
        Ok(())
    }

    /// Check the whole definition, reporting every structural problem at
    /// once instead of stopping at the first.
    ///
    /// Events whose generated operation names overlap an earlier event's are
    /// reported here. Collisions with record methods depend on the record
    /// type and surface when the definition is loaded.
    pub fn check(&self) -> Validation<(), NonEmptyVec<DefinitionError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<DefinitionError>>> = Vec::new();
        let mut fail = |error: DefinitionError| checks.push(Validation::fail(error));
        let declared: BTreeSet<&str> = self.states.iter().map(String::as_str).collect();
        let mut seen_events: BTreeSet<&str> = BTreeSet::new();
        let mut taken: BTreeSet<String> = BTreeSet::new();

        for event in &self.events {
            let names = generated_names(&event.name);
            if !seen_events.insert(event.name.as_str()) {
                fail(DefinitionError::DuplicateEvent {
                    name: event.name.clone(),
                });
            } else if names.iter().any(|name| taken.contains(name)) {
                fail(DefinitionError::MethodCollision {
                    name: event.name.clone(),
                });
            }
            taken.extend(names);

            for (phase, values) in [
                (CallbackPhase::Before, &event.before),
                (CallbackPhase::After, &event.after),
            ] {
                for value in values {
                    if let Err(err) = callback::<NoRecord>(phase, value) {
                        fail(err.into());
                    }
                }
            }

            let mut mapped: HashMap<&str, &str> = HashMap::new();
            for statement in &event.transitions {
                for (keyword, value) in [
                    (ConditionKeyword::If, &statement.when),
                    (ConditionKeyword::Unless, &statement.unless),
                ] {
                    if let Err(err) = condition::<NoRecord>(keyword, value) {
                        fail(err.into());
                    }
                }

                for mapping in &statement.map {
                    if !declared.contains(mapping.to.as_str()) {
                        fail(DefinitionError::UndefinedState {
                            state: mapping.to.clone(),
                        });
                    }
                    if let Sources::AllExcept { all_except } = &mapping.from {
                        for name in all_except {
                            if !declared.contains(name.as_str()) {
                                fail(DefinitionError::UndefinedState { state: name.clone() });
                            }
                        }
                    }
                    for from in mapping.from.names(&self.states) {
                        if !declared.contains(from) {
                            fail(DefinitionError::UndefinedState {
                                state: from.to_string(),
                            });
                        } else if let Some(to) = mapped.get(from) {
                            fail(DefinitionError::DuplicateTransition {
                                from: from.to_string(),
                                to: to.to_string(),
                            });
                        } else {
                            mapped.insert(from, mapping.to.as_str());
                        }
                    }
                }
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

impl EventDefinition {
    /// Declare this event's callbacks and transitions on `builder`.
    pub fn apply<R, S>(&self, builder: &mut EventBuilder<R, S>) -> Result<(), DefinitionError>
    where
        R: Record + 'static,
        S: State,
    {
        for value in &self.before {
            builder.before(callback::<R>(CallbackPhase::Before, value)?);
        }

        let declared: Vec<String> = builder.all().iter().map(|s| s.name().to_string()).collect();
        for statement in &self.transitions {
            let mut transitions = Transitions::new();
            if let Some(when) = condition::<R>(ConditionKeyword::If, &statement.when)? {
                transitions = transitions.when(when);
            }
            if let Some(unless) = condition::<R>(ConditionKeyword::Unless, &statement.unless)? {
                transitions = transitions.unless(unless);
            }
            for mapping in &statement.map {
                let to = builder.state_named(&mapping.to)?;
                if let Sources::AllExcept { all_except } = &mapping.from {
                    for name in all_except {
                        builder.state_named(name)?;
                    }
                }
                let sources = mapping
                    .from
                    .names(&declared)
                    .into_iter()
                    .map(|name| builder.state_named(name))
                    .collect::<Result<Vec<S>, _>>()?;
                transitions = transitions.map_many(sources, to);
            }
            builder.transition(transitions)?;
        }

        for value in &self.after {
            builder.after(callback::<R>(CallbackPhase::After, value)?);
        }
        Ok(())
    }
}

/// Stand-in record for shape checks that never dispatch.
struct NoRecord;

impl Record for NoRecord {
    type SaveError = std::convert::Infallible;

    fn save(&mut self) -> crate::record::SaveOutcome {
        crate::record::SaveOutcome::Saved
    }

    fn save_strict(&mut self) -> Result<(), Self::SaveError> {
        Ok(())
    }
}
