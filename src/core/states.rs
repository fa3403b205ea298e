//! The ordered set of states declared for one attribute.

use super::state::State;
use crate::error::DefinitionError;

/// Fixed, ordered, duplicate-free set of states a machine may reference.
///
/// Declaration order is preserved so that `all()` and `except()` yield
/// states in the order they were declared.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSet<S: State> {
    states: Vec<S>,
}

impl<S: State> StateSet<S> {
    /// Build a set from declared states, dropping repeated entries.
    pub fn new<I>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut unique: Vec<S> = Vec::new();
        for state in states {
            if !unique.contains(&state) {
                unique.push(state);
            }
        }
        Self { states: unique }
    }

    /// Whether `state` was declared.
    pub fn contains(&self, state: &S) -> bool {
        self.states.contains(state)
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.states.iter()
    }

    /// Number of declared states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no state was declared.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Every declared state, in declaration order.
    pub fn all(&self) -> Vec<S> {
        self.states.clone()
    }

    /// Every declared state except the given ones.
    ///
    /// ```rust
    /// use stateful_enum::core::StateSet;
    /// use stateful_enum::state_enum;
    ///
    /// state_enum! {
    ///     enum Level { Zero, One, Two }
    /// }
    ///
    /// let states = StateSet::new(Level::variants());
    /// assert_eq!(states.except(&[Level::One]), vec![Level::Zero, Level::Two]);
    /// ```
    pub fn except(&self, excluded: &[S]) -> Vec<S> {
        self.states
            .iter()
            .filter(|state| !excluded.contains(state))
            .cloned()
            .collect()
    }

    /// Look up a declared state by its name.
    pub fn find(&self, name: &str) -> Option<&S> {
        self.states.iter().find(|state| state.name() == name)
    }

    /// Fail with `UndefinedState` unless `state` was declared.
    pub(crate) fn require(&self, state: &S) -> Result<(), DefinitionError> {
        if self.contains(state) {
            Ok(())
        } else {
            Err(DefinitionError::UndefinedState {
                state: state.name().to_string(),
            })
        }
    }
}

impl<S: State> FromIterator<S> for StateSet<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
