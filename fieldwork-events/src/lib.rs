//! Observer support for Fieldwork
//!
//! This crate provides named, in-process events with synchronous listeners.
//!
//! ## Features
//!
//! - **Event Emitter** - Register listeners per event name and fire events
//! - **Observable** - Expose an emitter's surface on any owning type
//! - **Pausable** - Stop and resume notification without losing listeners
//!
//! ## Quick Start
//!
//! ```
//! use fieldwork_events::{EventEmitter, Observable};
//!
//! struct Document {
//!     events: EventEmitter<String>,
//! }
//!
//! impl Observable for Document {
//!     type Payload = String;
//!
//!     fn emitter(&self) -> &EventEmitter<String> {
//!         &self.events
//!     }
//! }
//!
//! let doc = Document { events: EventEmitter::new() };
//! let id = doc.add_listener("save", |title: &String| title.len() < 20);
//!
//! assert!(doc.fire_event("save", &"Quarterly".to_string()));
//! doc.remove_listener(&id)?;
//! # Ok::<(), fieldwork_events::EventError>(())
//! ```

pub mod emitter;
pub mod error;

pub use emitter::{EventEmitter, Listener, ListenerId, Observable};
pub use error::{EventError, Result};
