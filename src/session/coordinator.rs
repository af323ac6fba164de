//! Session state machine
//!
//! `Coordinator::handle` maps (current session, event) to a new session and a
//! list of effects. It never performs I/O, so every transition can be driven
//! and inspected without a window system or a model server.

use super::types::{Effect, Session, SessionEvent, SessionState, SessionToken};
use crate::delivery::DeliveryOutcome;
use crate::sanitize::{LinePolicy, sanitize_with};
use crate::window::WindowIdentity;

/// Behaviour switches read from configuration at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorOptions {
    /// Require an explicit yes before pasting
    pub require_confirmation: bool,
    /// Show the command before pasting it
    pub show_preview: bool,
    /// Only open sessions over windows that match a terminal profile
    pub terminals_only: bool,
    pub line_policy: LinePolicy,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            require_confirmation: false,
            show_preview: true,
            terminals_only: false,
            line_policy: LinePolicy::FirstLine,
        }
    }
}

/// Owner of the single active session
#[derive(Debug)]
pub struct Coordinator {
    options: CoordinatorOptions,
    active: Option<Session>,
    next_token: u64,
}

impl Coordinator {
    pub fn new(options: CoordinatorOptions) -> Self {
        Self {
            options,
            active: None,
            next_token: 1,
        }
    }

    pub fn options(&self) -> &CoordinatorOptions {
        &self.options
    }

    /// The open session, if any
    pub fn current(&self) -> Option<&Session> {
        self.active.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.active
            .as_ref()
            .map(|s| s.state)
            .unwrap_or(SessionState::Idle)
    }

    /// Apply one event and return the effects to perform, in order
    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        if let SessionEvent::HotkeyPressed { target, profile } = event {
            return self.hotkey(target, profile);
        }

        let Some(token) = event.token() else {
            return Vec::new();
        };
        let Some(session) = self.active.as_mut().filter(|s| s.token == token) else {
            tracing::debug!("Discarding stale event for session {}", token);
            return Vec::new();
        };

        match (session.state, event) {
            (_, SessionEvent::Cancel { token }) => {
                tracing::info!("Session {} cancelled", token);
                self.close()
            }

            (
                SessionState::AwaitingPrompt,
                SessionEvent::Submit {
                    token,
                    prompt,
                    allow_unsafe,
                },
            ) => {
                let prompt = prompt.trim().to_string();
                if prompt.is_empty() {
                    return vec![Effect::ShowPrompt {
                        token,
                        prompt: String::new(),
                        status: Some("Please enter a prompt".to_string()),
                    }];
                }
                session.prompt = prompt.clone();
                session.allow_unsafe = allow_unsafe;
                session.raw_output = None;
                session.command = None;
                session.state = SessionState::Generating;
                vec![
                    Effect::Status {
                        token,
                        message: "Generating command...".to_string(),
                    },
                    Effect::StartGeneration {
                        token,
                        prompt,
                        allow_unsafe,
                    },
                ]
            }

            (SessionState::Generating, SessionEvent::GenerationFinished { token, result }) => {
                match result {
                    Ok(raw) => {
                        let command = sanitize_with(&raw, self.options.line_policy);
                        session.raw_output = Some(raw);
                        if command.is_empty() {
                            session.state = SessionState::AwaitingPrompt;
                            return vec![Effect::ShowPrompt {
                                token,
                                prompt: session.prompt.clone(),
                                status: Some("No command generated".to_string()),
                            }];
                        }
                        tracing::info!("Session {} generated: {}", token, command);
                        session.command = Some(command.clone());
                        session.state = SessionState::AwaitingConfirmation;

                        if self.options.require_confirmation {
                            return vec![Effect::RequestConfirmation { token, command }];
                        }
                        let mut effects = Vec::new();
                        if self.options.show_preview {
                            effects.push(Effect::Preview { token, command });
                        }
                        effects.extend(self.start_delivery());
                        effects
                    }
                    Err(message) => {
                        tracing::warn!("Session {} generation failed: {}", token, message);
                        session.state = SessionState::AwaitingPrompt;
                        vec![Effect::ShowPrompt {
                            token,
                            prompt: session.prompt.clone(),
                            status: Some(format!("Error: {}", message)),
                        }]
                    }
                }
            }

            (SessionState::AwaitingConfirmation, SessionEvent::Confirm { .. }) => {
                self.start_delivery()
            }

            (SessionState::AwaitingConfirmation, SessionEvent::Reject { token }) => {
                session.state = SessionState::AwaitingPrompt;
                vec![Effect::ShowPrompt {
                    token,
                    prompt: session.prompt.clone(),
                    status: Some("Command not used".to_string()),
                }]
            }

            (SessionState::Delivering, SessionEvent::DeliveryFinished { token, outcome }) => {
                let message = match outcome {
                    Ok(DeliveryOutcome::Delivered) => "Command sent to terminal".to_string(),
                    Ok(DeliveryOutcome::CopiedToClipboard) => {
                        "Command copied to clipboard. Please paste manually.".to_string()
                    }
                    Err(e) => {
                        tracing::warn!("Session {} delivery failed: {}", token, e);
                        format!("Failed to send command: {} (command is on the clipboard)", e)
                    }
                };
                let mut effects = self.close();
                effects.push(Effect::Notify { message });
                effects
            }

            (state, event) => {
                tracing::debug!("Ignoring {:?} in state {}", event, state);
                Vec::new()
            }
        }
    }

    fn hotkey(&mut self, target: WindowIdentity, profile: Option<String>) -> Vec<Effect> {
        if let Some(session) = &self.active {
            // The paste is already under way; its outcome still has to be reported
            if session.state == SessionState::Delivering {
                tracing::info!("Hotkey pressed while session {} delivers, ignoring", session.token);
                return Vec::new();
            }
            tracing::info!("Hotkey pressed during session {}, closing it", session.token);
            return self.close();
        }

        if self.options.terminals_only && profile.is_none() {
            tracing::info!("Hotkey pressed over non-terminal window {}", target);
            return vec![Effect::Notify {
                message: "No terminal window detected. Please focus a terminal application first."
                    .to_string(),
            }];
        }

        let token = SessionToken(self.next_token);
        self.next_token += 1;

        tracing::info!(
            "Session {} opened for {} (profile {})",
            token,
            target,
            profile.as_deref().unwrap_or("<none>")
        );
        self.active = Some(Session::new(token, target));

        vec![Effect::ShowPrompt {
            token,
            prompt: String::new(),
            status: Some("Ready to generate commands".to_string()),
        }]
    }

    /// AwaitingConfirmation -> Delivering
    fn start_delivery(&mut self) -> Vec<Effect> {
        let Some(session) = self.active.as_mut() else {
            return Vec::new();
        };
        let Some(command) = session.command.clone() else {
            return Vec::new();
        };
        session.state = SessionState::Delivering;
        vec![
            Effect::ClosePrompt {
                token: session.token,
            },
            Effect::Deliver {
                token: session.token,
                command,
                target: session.target.clone(),
            },
        ]
    }

    /// Any state -> Closed. Always succeeds.
    fn close(&mut self) -> Vec<Effect> {
        match self.active.take() {
            Some(mut session) => {
                session.state = SessionState::Closed;
                tracing::debug!("Session {} closed", session.token);
                vec![Effect::ClosePrompt {
                    token: session.token,
                }]
            }
            None => Vec::new(),
        }
    }
}
