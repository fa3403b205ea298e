//! Transition edges and the per-event transition table.

use crate::core::{Guard, State};
use crate::error::{DefinitionError, WorkflowError};

/// A directed edge from one source state to a target, with an optional guard.
pub struct Transition<R, S: State> {
    pub from: S,
    pub to: S,
    pub guard: Option<Guard<R>>,
}

impl<R, S: State> Transition<R, S> {
    /// Check the guard against the record.
    ///
    /// The source has already matched by the time this is called, so an
    /// unguarded transition is always eligible.
    pub fn can_execute(&self, record: &R) -> Result<bool, WorkflowError> {
        match &self.guard {
            Some(guard) => guard.check(record),
            None => Ok(true),
        }
    }

    /// Whether the transition carries a guard.
    pub fn is_guarded(&self) -> bool {
        self.guard.is_some()
    }
}

impl<R, S: State> Clone for Transition<R, S> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            to: self.to.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<R, S: State> std::fmt::Debug for Transition<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("guarded", &self.is_guarded())
            .finish()
    }
}

/// Mapping from source state to transition for a single event.
///
/// Each source appears at most once. Entries keep insertion order.
pub struct TransitionTable<R, S: State> {
    entries: Vec<Transition<R, S>>,
}

impl<R, S: State> TransitionTable<R, S> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Transition leaving `from`, if any.
    pub fn get(&self, from: &S) -> Option<&Transition<R, S>> {
        self.entries.iter().find(|t| t.from == *from)
    }

    /// Add a transition, rejecting a source that is already mapped.
    pub fn insert(&mut self, transition: Transition<R, S>) -> Result<(), DefinitionError> {
        if let Some(existing) = self.get(&transition.from) {
            return Err(DefinitionError::DuplicateTransition {
                from: existing.from.name().to_string(),
                to: existing.to.name().to_string(),
            });
        }
        self.entries.push(transition);
        Ok(())
    }

    /// Transitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Transition<R, S>> {
        self.entries.iter()
    }

    /// Mapped source states.
    pub fn sources(&self) -> impl Iterator<Item = &S> {
        self.entries.iter().map(|t| &t.from)
    }

    /// Number of mapped sources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no source is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R, S: State> Default for TransitionTable<R, S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, SaveOutcome};
    use crate::state_enum;

    state_enum! {
        enum Step {
            Start,
            Middle,
            End,
        }
    }

    struct Gate {
        open: bool,
    }

    impl Record for Gate {
        type SaveError = std::io::Error;

        fn save(&mut self) -> SaveOutcome {
            SaveOutcome::Saved
        }

        fn save_strict(&mut self) -> Result<(), Self::SaveError> {
            Ok(())
        }
    }

    fn edge(from: Step, to: Step) -> Transition<Gate, Step> {
        Transition {
            from,
            to,
            guard: None,
        }
    }

    #[test]
    fn can_execute_without_guard() {
        let transition = edge(Step::Start, Step::Middle);
        assert!(transition.can_execute(&Gate { open: false }).unwrap());
    }

    #[test]
    fn can_execute_respects_guard() {
        let transition = Transition {
            from: Step::Start,
            to: Step::Middle,
            guard: Some(Guard::new(|g: &Gate| g.open)),
        };

        assert!(transition.can_execute(&Gate { open: true }).unwrap());
        assert!(!transition.can_execute(&Gate { open: false }).unwrap());
    }

    #[test]
    fn table_looks_up_by_source() {
        let mut table = TransitionTable::new();
        table.insert(edge(Step::Start, Step::Middle)).unwrap();
        table.insert(edge(Step::Middle, Step::End)).unwrap();

        assert_eq!(table.get(&Step::Middle).map(|t| t.to), Some(Step::End));
        assert!(table.get(&Step::End).is_none());
        assert_eq!(
            table.sources().copied().collect::<Vec<_>>(),
            vec![Step::Start, Step::Middle]
        );
    }

    #[test]
    fn table_rejects_duplicate_source_naming_existing_target() {
        let mut table = TransitionTable::new();
        table.insert(edge(Step::Start, Step::Middle)).unwrap();

        let err = table.insert(edge(Step::Start, Step::End)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "duplicate entry: transition from Start to Middle has already been defined"
        );
        assert_eq!(table.len(), 1);
    }
}
