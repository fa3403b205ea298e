//! Invocation options for firing an event.

use serde::{Deserialize, Serialize};

/// How an event is fired.
///
/// - `save`: persist the record after mutating the attribute
/// - `danger`: raise workflow errors instead of returning `false`, and use
///   the record's strict save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireOptions {
    pub save: bool,
    pub danger: bool,
}

impl FireOptions {
    /// Default options: save, no danger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options used by the strict (`name!`) form.
    pub fn strict(save: bool) -> Self {
        Self { save, danger: true }
    }

    /// Set whether to save.
    pub fn with_save(mut self, save: bool) -> Self {
        self.save = save;
        self
    }

    /// Set danger mode.
    pub fn with_danger(mut self, danger: bool) -> Self {
        self.danger = danger;
        self
    }
}

impl Default for FireOptions {
    fn default() -> Self {
        Self {
            save: true,
            danger: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_save_without_danger() {
        let options = FireOptions::default();
        assert!(options.save);
        assert!(!options.danger);
    }

    #[test]
    fn strict_forces_danger() {
        assert_eq!(
            FireOptions::strict(false),
            FireOptions::new().with_save(false).with_danger(true)
        );
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let options: FireOptions = serde_json::from_str(r#"{"danger": true}"#).unwrap();
        assert_eq!(options, FireOptions::strict(true));
    }
}
