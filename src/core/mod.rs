//! Core building blocks shared by every machine.
//!
//! This module contains the definition-time data of a state machine:
//! - State identity via the `State` trait and the declared `StateSet`
//! - Guard composition from `if`/`unless` conditions
//! - Before/after callback sequences
//!
//! Nothing here reads or writes a record's attribute; that happens in
//! [`crate::event`].

mod callback;
mod guard;
mod state;
mod states;

pub use callback::{Callback, Callbacks, InlineAction};
pub use guard::{Condition, Guard};
pub use state::State;
pub use states::StateSet;
