//! Event loop around the session coordinator.
//!
//! One driver thread owns the `Coordinator` and is the only place its state
//! changes. Everything slow happens elsewhere and reports back through the
//! driver's channel as a `SessionEvent`:
//!
//! - hotkey presses come from the forwarder thread, with the target window
//!   already captured
//! - model calls and deliveries each run on a short-lived worker thread
//! - dialogs are answered by the `SessionView`
//!
//! Every event except a hotkey press carries the token of the session it
//! belongs to, so late answers from a session that was closed are ignored.

mod driver;
mod view;


pub use driver::{Driver, DriverEvent, capture_hotkey_target, spawn_hotkey_forwarder};
pub use view::{EventSender, SessionView};
