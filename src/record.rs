//! The host record contract.
//!
//! The engine never stores or persists anything itself. Everything it needs
//! from the record that owns a stateful attribute goes through [`Record`] and
//! an [`Attribute`] accessor pair.

use crate::core::State;
use std::fmt;

/// Result of a best-effort save.
///
/// `Failed` is the only failure indicator: firing an event whose soft save
/// reports it returns `false` and skips after-callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed,
}

impl SaveOutcome {
    /// Whether the save went through.
    pub fn is_saved(self) -> bool {
        matches!(self, Self::Saved)
    }
}

impl From<bool> for SaveOutcome {
    fn from(saved: bool) -> Self {
        if saved {
            Self::Saved
        } else {
            Self::Failed
        }
    }
}

/// A persisted record that owns one or more stateful attributes.
pub trait Record {
    /// Error reported by [`Record::save_strict`].
    type SaveError: std::error::Error + Send + Sync + 'static;

    /// Persist the record, reporting failure instead of raising it.
    fn save(&mut self) -> SaveOutcome;

    /// Persist the record, propagating any failure.
    fn save_strict(&mut self) -> Result<(), Self::SaveError>;

    /// Dispatch a named boolean method used by `if`/`unless` conditions.
    ///
    /// Returns `None` when the record has no method with that name.
    fn predicate(&self, _name: &str) -> Option<bool> {
        None
    }

    /// Dispatch a named zero-argument method used by callbacks.
    ///
    /// Returns `false` when the record has no method with that name.
    fn action(&mut self, _name: &str) -> bool {
        false
    }

    /// Names of methods the record type already exposes.
    ///
    /// Events whose generated operations would shadow one of these are
    /// rejected at definition time.
    fn method_names() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }
}

/// Accessor pair for one stateful attribute of `R`.
pub struct Attribute<R, S> {
    name: String,
    read: fn(&R) -> Option<S>,
    write: fn(&mut R, S),
}

impl<R, S: State> Attribute<R, S> {
    /// `read` returns `None` when the stored value is absent or could not be
    /// decoded into a state. `write` only mutates the record locally.
    pub fn new(name: impl Into<String>, read: fn(&R) -> Option<S>, write: fn(&mut R, S)) -> Self {
        Self {
            name: name.into(),
            read,
            write,
        }
    }

    /// Attribute name, used in logs and for name reservation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the current value from the record.
    pub fn read(&self, record: &R) -> Option<S> {
        (self.read)(record)
    }

    /// Set the value on the record without saving.
    pub fn write(&self, record: &mut R, state: S) {
        (self.write)(record, state)
    }
}

impl<R, S> Clone for Attribute<R, S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            read: self.read,
            write: self.write,
        }
    }
}

impl<R, S> fmt::Debug for Attribute<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute").field("name", &self.name).finish()
    }
}
