//! Stateful Enum: declarative guarded state machines over record attributes
//!
//! A machine attaches named events to one enumerated attribute of a persisted
//! record. Each event is a transition table plus optional guards and
//! callbacks, and exposes three operations:
//!
//! - `can` (`can_<event>?`): probe whether the event may fire right now
//! - `fire` (`<event>`): run callbacks, move the attribute, optionally save
//! - `fire_strict` (`<event>!`): `fire` in danger mode
//!
//! Outside danger mode an impossible event just returns `false`. In danger
//! mode it fails with a [`WorkflowError`], and saving uses the record's
//! strict save whose error propagates unchanged.
//!
//! # Core Concepts
//!
//! - **State**: attribute values via the `State` trait and `state_enum!`
//! - **Record**: the host collaborator that reads, writes and saves
//! - **Machine**: the events declared for one attribute
//! - **Schema**: every machine of one record type, invoked by event name
//!
//! # Example
//!
//! ```rust
//! use stateful_enum::event::{FireOptions, Transitions};
//! use stateful_enum::record::{Attribute, Record, SaveOutcome};
//! use stateful_enum::schema::Schema;
//! use stateful_enum::state_enum;
//!
//! state_enum! {
//!     enum Status { Opened, Closed }
//! }
//!
//! struct Ticket { status: Option<Status>, assignee: Option<String> }
//!
//! impl Record for Ticket {
//!     type SaveError = std::io::Error;
//!     fn save(&mut self) -> SaveOutcome { SaveOutcome::Saved }
//!     fn save_strict(&mut self) -> Result<(), std::io::Error> { Ok(()) }
//! }
//!
//! let mut schema = Schema::new();
//! schema
//!     .define(
//!         Attribute::new("status", |t: &Ticket| t.status, |t: &mut Ticket, s| t.status = Some(s)),
//!         Status::variants(),
//!         |m| {
//!             m.event("close", |e| {
//!                 e.transition(
//!                     Transitions::new()
//!                         .map(Status::Opened, Status::Closed)
//!                         .when_fn(|t: &Ticket| t.assignee.is_some()),
//!                 )?;
//!                 Ok(())
//!             })?;
//!             Ok(())
//!         },
//!     )
//!     .unwrap();
//!
//! let mut ticket = Ticket { status: Some(Status::Opened), assignee: None };
//! assert!(!schema.can(&ticket, "close", false).unwrap());
//!
//! ticket.assignee = Some("kim".into());
//! assert!(schema.fire(&mut ticket, "close", FireOptions::default()).unwrap());
//! assert_eq!(ticket.status, Some(Status::Closed));
//! ```

pub mod core;
pub mod definition;
pub mod error;
pub mod event;
pub mod machine;
mod macros;
pub mod record;
pub mod schema;

// Re-export commonly used types
pub use core::{Callback, Condition, Guard, State, StateSet};
pub use definition::MachineDefinition;
pub use error::{ArgumentError, DefinitionError, FireError, WorkflowError};
pub use event::{Event, FireOptions, Transitions};
pub use machine::Machine;
pub use record::{Attribute, Record, SaveOutcome};
pub use schema::Schema;
