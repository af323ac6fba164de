use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use global_hotkey::{GlobalHotKeyEvent, HotKeyState};

use super::view::SessionView;
use crate::delivery::DeliveryEngine;
use crate::generation::CommandGenerator;
use crate::profile::ProfileRegistry;
use crate::session::{Coordinator, Effect, SessionEvent, SessionState};
use crate::window::{WindowSystem, capture_foreground};

/// Messages on the driver channel
#[derive(Debug)]
pub enum DriverEvent {
    Session(SessionEvent),
    Shutdown,
}

impl From<SessionEvent> for DriverEvent {
    fn from(event: SessionEvent) -> Self {
        DriverEvent::Session(event)
    }
}

/// Owns the coordinator and carries out its effects
pub struct Driver {
    coordinator: Coordinator,
    generator: Arc<dyn CommandGenerator>,
    delivery: Arc<DeliveryEngine>,
    view: Arc<dyn SessionView>,
    event_tx: Sender<DriverEvent>,
    event_rx: Receiver<DriverEvent>,
}

impl Driver {
    pub fn new(
        coordinator: Coordinator,
        generator: Arc<dyn CommandGenerator>,
        delivery: Arc<DeliveryEngine>,
        view: Arc<dyn SessionView>,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        Self {
            coordinator,
            generator,
            delivery,
            view,
            event_tx,
            event_rx,
        }
    }

    /// Sender for hotkey forwarders and anything else feeding the driver
    pub fn sender(&self) -> Sender<DriverEvent> {
        self.event_tx.clone()
    }

    pub fn state(&self) -> SessionState {
        self.coordinator.state()
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// Feed one event to the coordinator and perform the resulting effects
    pub fn dispatch(&mut self, event: SessionEvent) {
        for effect in self.coordinator.handle(event) {
            self.perform(effect);
        }
    }

    /// Process events until `DriverEvent::Shutdown`
    pub fn run(mut self) {
        tracing::info!("Session driver started");
        while let Ok(event) = self.event_rx.recv() {
            match event {
                DriverEvent::Session(event) => self.dispatch(event),
                DriverEvent::Shutdown => break,
            }
        }
        tracing::info!("Session driver stopped");
    }

    /// Process at most one event. Returns false on timeout or shutdown.
    pub fn step(&mut self, timeout: Duration) -> bool {
        match self.event_rx.recv_timeout(timeout) {
            Ok(DriverEvent::Session(event)) => {
                self.dispatch(event);
                true
            }
            Ok(DriverEvent::Shutdown) | Err(_) => false,
        }
    }

    fn perform(&self, effect: Effect) {
        match effect {
            Effect::ShowPrompt {
                token,
                prompt,
                status,
            } => self
                .view
                .show_prompt(token, &prompt, status.as_deref(), &self.event_tx),
            Effect::Status { token, message } => self.view.show_status(token, &message),
            Effect::StartGeneration {
                token,
                prompt,
                allow_unsafe,
            } => {
                let generator = self.generator.clone();
                let event_tx = self.event_tx.clone();
                thread::spawn(move || {
                    let result = generator
                        .generate(&prompt, allow_unsafe)
                        .map_err(|e| e.to_string());
                    let _ = event_tx.send(SessionEvent::GenerationFinished { token, result }.into());
                });
            }
            Effect::Preview { token, command } => self.view.show_preview(token, &command),
            Effect::RequestConfirmation { token, command } => {
                self.view
                    .request_confirmation(token, &command, &self.event_tx)
            }
            Effect::Deliver {
                token,
                command,
                target,
            } => {
                let delivery = self.delivery.clone();
                let event_tx = self.event_tx.clone();
                thread::spawn(move || {
                    let outcome = delivery.deliver(&command, &target).map_err(|e| {
                        tracing::warn!("Delivery to {} failed: {}", target, e);
                        e.to_string()
                    });
                    let _ = event_tx.send(SessionEvent::DeliveryFinished { token, outcome }.into());
                });
            }
            Effect::ClosePrompt { token } => self.view.close(token),
            Effect::Notify { message } => self.view.notify(&message),
        }
    }
}

/// Build the hotkey event for the window that is in front right now
pub fn capture_hotkey_target(
    windows: &dyn WindowSystem,
    registry: &ProfileRegistry,
) -> SessionEvent {
    let target = capture_foreground(windows);
    let profile = registry.resolve(&target).map(|p| p.name);
    tracing::debug!(
        "Hotkey pressed over {} (profile {})",
        target,
        profile.as_deref().unwrap_or("<none>")
    );
    SessionEvent::HotkeyPressed { target, profile }
}

/// Forward presses of hotkey `hotkey_id` to the driver.
///
/// The foreground window is captured on this thread, as soon as the press
/// arrives, before any dialog can take focus.
pub fn spawn_hotkey_forwarder(
    hotkey_id: u32,
    windows: Arc<dyn WindowSystem>,
    registry: Arc<ProfileRegistry>,
    event_tx: Sender<DriverEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let receiver = GlobalHotKeyEvent::receiver();
        while let Ok(event) = receiver.recv() {
            if event.id != hotkey_id || event.state != HotKeyState::Pressed {
                continue;
            }
            let pressed = capture_hotkey_target(windows.as_ref(), &registry);
            if event_tx.send(pressed.into()).is_err() {
                break;
            }
        }
    })
}
