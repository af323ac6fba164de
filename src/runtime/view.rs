use std::sync::mpsc::Sender;

use super::DriverEvent;
use crate::session::SessionToken;

pub type EventSender = Sender<DriverEvent>;

/// The user-facing side of a session.
///
/// Calls never block the driver. Answers (submit, cancel, confirm, reject)
/// are sent back through `events`, tagged with the token they were asked for.
pub trait SessionView: Send + Sync {
    /// Ask for a prompt, prefilled with `prompt`
    fn show_prompt(
        &self,
        token: SessionToken,
        prompt: &str,
        status: Option<&str>,
        events: &EventSender,
    );

    fn show_status(&self, token: SessionToken, message: &str);

    /// Show the generated command; no answer expected
    fn show_preview(&self, token: SessionToken, command: &str);

    /// Ask whether `command` should be used
    fn request_confirmation(&self, token: SessionToken, command: &str, events: &EventSender);

    /// Dismiss whatever is still open for `token`
    fn close(&self, token: SessionToken);

    fn notify(&self, message: &str);
}
