//! Shorthand - plain language in, shell command out
//!
//! Press a global hotkey over a terminal, describe what you want, and the
//! command generated by a local Ollama model is pasted back into that
//! terminal using the paste method its profile asks for.
//!
//! ## Flow
//!
//! 1. The hotkey forwarder captures the foreground window (`window`) and
//!    resolves its terminal profile (`profile`).
//! 2. The session coordinator (`session`) opens a prompt through the view.
//! 3. The prompt goes to the model (`generation`); the answer is cleaned up
//!    into a single command (`sanitize`).
//! 4. The command is pasted into the captured window (`delivery`).
//!
//! `runtime` wires these together on threads; `platform` provides the native
//! window, input and dialog backends.

pub mod config;
pub mod delivery;
pub mod generation;
pub mod hotkey;
pub mod platform;
pub mod profile;
pub mod runtime;
pub mod sanitize;
pub mod session;
pub mod window;

#[cfg(test)]
pub(crate) mod test_support;
