//! Command delivery: focus restore, clipboard write, synthetic paste
//!
//! The engine is platform-neutral. Window focus, input synthesis and the
//! clipboard come in through `WindowSystem`, `InputSynth` and `ClipboardSink`.

mod clipboard;
mod engine;

#[cfg(test)]
mod tests;

pub use clipboard::{ClipboardSink, SystemClipboard};
pub use engine::{
    DeliveryEngine, DeliveryError, DeliveryOutcome, DeliveryTiming, InputSynth, KeyChord,
};
