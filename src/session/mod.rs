//! Hotkey session coordination
//!
//! A session is one hotkey-to-paste cycle:
//!
//! ```text
//! Idle -> AwaitingPrompt -> Generating -> AwaitingConfirmation -> Delivering -> Closed
//! ```
//!
//! `Closed` is reachable from every active state (cancel, toggle hotkey).
//! Only one session exists at a time; pressing the hotkey again closes it.

mod coordinator;
mod types;


pub use coordinator::{Coordinator, CoordinatorOptions};
pub use types::{Effect, Session, SessionEvent, SessionState, SessionToken};
