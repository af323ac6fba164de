//! Session state, events and effects

use std::fmt;

use crate::delivery::DeliveryOutcome;
use crate::window::WindowIdentity;

/// Identifies one session. Events carrying an older token are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken(pub u64);

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a session is in the hotkey-to-paste flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session open
    #[default]
    Idle,
    /// Prompt dialog is open
    AwaitingPrompt,
    /// Waiting for the model
    Generating,
    /// Command ready, waiting for the user to accept it
    AwaitingConfirmation,
    /// Pasting into the target window
    Delivering,
    /// Finished, cancelled or toggled closed
    Closed,
}

impl SessionState {
    /// True for every state in which the session holds the single active slot
    pub fn is_active(&self) -> bool {
        !matches!(self, SessionState::Idle | SessionState::Closed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::AwaitingPrompt => write!(f, "Awaiting prompt"),
            SessionState::Generating => write!(f, "Generating"),
            SessionState::AwaitingConfirmation => write!(f, "Awaiting confirmation"),
            SessionState::Delivering => write!(f, "Delivering"),
            SessionState::Closed => write!(f, "Closed"),
        }
    }
}

/// One hotkey-to-delivery cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    /// Window captured when the hotkey fired
    pub target: WindowIdentity,
    pub prompt: String,
    pub allow_unsafe: bool,
    pub raw_output: Option<String>,
    pub command: Option<String>,
    pub state: SessionState,
}

impl Session {
    pub(super) fn new(token: SessionToken, target: WindowIdentity) -> Self {
        Self {
            token,
            target,
            prompt: String::new(),
            allow_unsafe: false,
            raw_output: None,
            command: None,
            state: SessionState::AwaitingPrompt,
        }
    }
}

/// Inputs to the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Hotkey edge. `target` was captured at the instant of the press;
    /// `profile` is the terminal profile it resolved to, if any.
    HotkeyPressed {
        target: WindowIdentity,
        profile: Option<String>,
    },
    Submit {
        token: SessionToken,
        prompt: String,
        allow_unsafe: bool,
    },
    /// Raw model text, or the error message of a failed call
    GenerationFinished {
        token: SessionToken,
        result: Result<String, String>,
    },
    Confirm {
        token: SessionToken,
    },
    Reject {
        token: SessionToken,
    },
    /// Escape, dialog dismissed or window closed
    Cancel {
        token: SessionToken,
    },
    DeliveryFinished {
        token: SessionToken,
        outcome: Result<DeliveryOutcome, String>,
    },
}

impl SessionEvent {
    pub fn token(&self) -> Option<SessionToken> {
        match self {
            SessionEvent::HotkeyPressed { .. } => None,
            SessionEvent::Submit { token, .. }
            | SessionEvent::GenerationFinished { token, .. }
            | SessionEvent::Confirm { token }
            | SessionEvent::Reject { token }
            | SessionEvent::Cancel { token }
            | SessionEvent::DeliveryFinished { token, .. } => Some(*token),
        }
    }
}

/// Side effects requested by the coordinator, performed by the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show (or re-show) the prompt input, prefilled with `prompt`
    ShowPrompt {
        token: SessionToken,
        prompt: String,
        status: Option<String>,
    },
    /// Update the status line of the open session
    Status {
        token: SessionToken,
        message: String,
    },
    /// Run the model call off the event thread
    StartGeneration {
        token: SessionToken,
        prompt: String,
        allow_unsafe: bool,
    },
    /// Show the generated command without waiting for an answer
    Preview {
        token: SessionToken,
        command: String,
    },
    /// Ask the user to accept or reject the command
    RequestConfirmation {
        token: SessionToken,
        command: String,
    },
    Deliver {
        token: SessionToken,
        command: String,
        target: WindowIdentity,
    },
    /// Tear down any UI belonging to the session
    ClosePrompt {
        token: SessionToken,
    },
    /// Session-independent notification (tray balloon, desktop notification)
    Notify {
        message: String,
    },
}
