//! Global hotkey parsing and registration

use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::GlobalHotKeyManager;

#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[error("Invalid hotkey '{0}'")]
    Invalid(String),

    #[error("Failed to create global hotkey manager: {0}")]
    Manager(String),

    #[error("Failed to register hotkey '{binding}': {message}")]
    Register { binding: String, message: String },
}

/// Parse a hotkey string like "ctrl+g" or "Ctrl+Shift+Space".
/// Returns None if the string is invalid or has no key.
pub fn parse_hotkey_string(hotkey_str: &str) -> Option<(Modifiers, Code)> {
    let hotkey_lower = hotkey_str.trim().to_lowercase();
    let parts: Vec<&str> = hotkey_lower.split('+').map(str::trim).collect();

    let mut modifiers = Modifiers::empty();
    let (key_part, modifier_parts) = parts.split_last()?;

    for part in modifier_parts {
        match *part {
            "cmd" | "command" | "super" | "win" => modifiers |= Modifiers::SUPER,
            "ctrl" | "control" => modifiers |= Modifiers::CONTROL,
            "alt" | "option" => modifiers |= Modifiers::ALT,
            "shift" => modifiers |= Modifiers::SHIFT,
            _ => return None,
        }
    }

    let code = match *key_part {
        "a" => Code::KeyA,
        "b" => Code::KeyB,
        "c" => Code::KeyC,
        "d" => Code::KeyD,
        "e" => Code::KeyE,
        "f" => Code::KeyF,
        "g" => Code::KeyG,
        "h" => Code::KeyH,
        "i" => Code::KeyI,
        "j" => Code::KeyJ,
        "k" => Code::KeyK,
        "l" => Code::KeyL,
        "m" => Code::KeyM,
        "n" => Code::KeyN,
        "o" => Code::KeyO,
        "p" => Code::KeyP,
        "q" => Code::KeyQ,
        "r" => Code::KeyR,
        "s" => Code::KeyS,
        "t" => Code::KeyT,
        "u" => Code::KeyU,
        "v" => Code::KeyV,
        "w" => Code::KeyW,
        "x" => Code::KeyX,
        "y" => Code::KeyY,
        "z" => Code::KeyZ,
        "0" => Code::Digit0,
        "1" => Code::Digit1,
        "2" => Code::Digit2,
        "3" => Code::Digit3,
        "4" => Code::Digit4,
        "5" => Code::Digit5,
        "6" => Code::Digit6,
        "7" => Code::Digit7,
        "8" => Code::Digit8,
        "9" => Code::Digit9,
        "space" => Code::Space,
        "enter" | "return" => Code::Enter,
        "tab" => Code::Tab,
        "backquote" | "`" => Code::Backquote,
        "f1" => Code::F1,
        "f2" => Code::F2,
        "f3" => Code::F3,
        "f4" => Code::F4,
        "f5" => Code::F5,
        "f6" => Code::F6,
        "f7" => Code::F7,
        "f8" => Code::F8,
        "f9" => Code::F9,
        "f10" => Code::F10,
        "f11" => Code::F11,
        "f12" => Code::F12,
        _ => return None,
    };

    Some((modifiers, code))
}

/// A registered global hotkey. Unregistered on drop.
pub struct HotkeyRegistration {
    manager: GlobalHotKeyManager,
    hotkey: HotKey,
    binding: String,
}

impl HotkeyRegistration {
    pub fn register(binding: &str) -> Result<Self, HotkeyError> {
        let (modifiers, code) =
            parse_hotkey_string(binding).ok_or_else(|| HotkeyError::Invalid(binding.to_string()))?;

        let manager = GlobalHotKeyManager::new().map_err(|e| HotkeyError::Manager(e.to_string()))?;

        let modifiers = (!modifiers.is_empty()).then_some(modifiers);
        let hotkey = HotKey::new(modifiers, code);
        manager.register(hotkey).map_err(|e| HotkeyError::Register {
            binding: binding.to_string(),
            message: e.to_string(),
        })?;

        tracing::info!("Global hotkey registered: {}", binding);
        Ok(Self {
            manager,
            hotkey,
            binding: binding.to_string(),
        })
    }

    /// Id carried by `GlobalHotKeyEvent`s for this hotkey
    pub fn id(&self) -> u32 {
        self.hotkey.id()
    }

    pub fn binding(&self) -> &str {
        &self.binding
    }
}

impl Drop for HotkeyRegistration {
    fn drop(&mut self) {
        if let Err(e) = self.manager.unregister(self.hotkey) {
            tracing::warn!("Failed to unregister hotkey {}: {}", self.binding, e);
        }
    }
}
