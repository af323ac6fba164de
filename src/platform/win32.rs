//! Win32 backend

use windows::Win32::Foundation::{CloseHandle, HWND};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
    QueryFullProcessImageNameW,
};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBD_EVENT_FLAGS, KEYBDINPUT, KEYEVENTF_KEYUP,
    MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEINPUT, SendInput, VIRTUAL_KEY, VK_CONTROL,
    VK_ESCAPE, VK_INSERT, VK_LWIN, VK_MENU, VK_RETURN, VK_SHIFT, VK_SPACE, VK_TAB,
};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetForegroundWindow, GetMessageW, GetWindowTextW,
    GetWindowThreadProcessId, MSG, SetForegroundWindow, TranslateMessage,
};
use windows::core::PWSTR;

use crate::delivery::{InputSynth, KeyChord};
use crate::window::{WindowHandle, WindowLookupError, WindowSystem};

#[derive(Debug, Default)]
pub struct NativePlatform;

impl NativePlatform {
    pub fn new() -> Self {
        Self
    }
}

fn hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.0 as usize as *mut core::ffi::c_void)
}

fn key_input(vk: VIRTUAL_KEY, up: bool) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: 0,
                dwFlags: if up { KEYEVENTF_KEYUP } else { KEYBD_EVENT_FLAGS(0) },
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn send_inputs(inputs: &[INPUT]) -> Result<(), String> {
    let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
    if sent as usize != inputs.len() {
        return Err(format!(
            "SendInput injected {} of {} events: {}",
            sent,
            inputs.len(),
            std::io::Error::last_os_error()
        ));
    }
    Ok(())
}

/// Press `keys` in order, release them in reverse
fn send_keys(keys: &[VIRTUAL_KEY]) -> Result<(), String> {
    let mut inputs: Vec<INPUT> = keys.iter().map(|vk| key_input(*vk, false)).collect();
    inputs.extend(keys.iter().rev().map(|vk| key_input(*vk, true)));
    send_inputs(&inputs)
}

fn virtual_key(name: &str) -> Option<VIRTUAL_KEY> {
    let lower = name.to_lowercase();
    let vk = match lower.as_str() {
        "ctrl" | "control" => VK_CONTROL,
        "shift" => VK_SHIFT,
        "alt" => VK_MENU,
        "win" | "super" => VK_LWIN,
        "insert" | "ins" => VK_INSERT,
        "enter" | "return" => VK_RETURN,
        "esc" | "escape" => VK_ESCAPE,
        "tab" => VK_TAB,
        "space" => VK_SPACE,
        _ => {
            let mut chars = lower.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphanumeric() => {
                    VIRTUAL_KEY(c.to_ascii_uppercase() as u16)
                }
                _ => return None,
            }
        }
    };
    Some(vk)
}

/// Parse a whitespace-separated list of chords such as "ctrl+shift+v"
fn parse_sequence(sequence: &str) -> Result<Vec<Vec<VIRTUAL_KEY>>, String> {
    let chords: Vec<Vec<VIRTUAL_KEY>> = sequence
        .split_whitespace()
        .map(|chord| {
            chord
                .split('+')
                .map(|key| virtual_key(key).ok_or_else(|| format!("Unknown key '{}'", key)))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<_, _>>()?;

    if chords.is_empty() {
        return Err("Empty paste sequence".to_string());
    }
    Ok(chords)
}

impl WindowSystem for NativePlatform {
    fn foreground_window(&self) -> WindowHandle {
        let hwnd = unsafe { GetForegroundWindow() };
        WindowHandle(hwnd.0 as usize as u64)
    }

    fn process_name(&self, handle: WindowHandle) -> Result<String, WindowLookupError> {
        let mut pid = 0u32;
        unsafe { GetWindowThreadProcessId(hwnd(handle), Some(&mut pid as *mut u32)) };
        if pid == 0 {
            return Err(WindowLookupError::NoWindow(handle));
        }

        let process = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) }
            .map_err(|e| WindowLookupError::Process(format!("pid {}: {}", pid, e)))?;

        let mut buffer = [0u16; 1024];
        let mut len = buffer.len() as u32;
        let result = unsafe {
            QueryFullProcessImageNameW(
                process,
                PROCESS_NAME_WIN32,
                PWSTR(buffer.as_mut_ptr()),
                &mut len,
            )
        };
        let _ = unsafe { CloseHandle(process) };
        result.map_err(|e| WindowLookupError::Process(format!("pid {}: {}", pid, e)))?;

        Ok(String::from_utf16_lossy(&buffer[..len as usize]))
    }

    fn window_title(&self, handle: WindowHandle) -> Result<String, WindowLookupError> {
        let mut buffer = [0u16; 512];
        let len = unsafe { GetWindowTextW(hwnd(handle), &mut buffer) };
        if len < 0 {
            return Err(WindowLookupError::Title(
                std::io::Error::last_os_error().to_string(),
            ));
        }
        Ok(String::from_utf16_lossy(&buffer[..len as usize]))
    }

    fn focus(&self, handle: WindowHandle) -> Result<(), WindowLookupError> {
        if unsafe { SetForegroundWindow(hwnd(handle)) }.as_bool() {
            Ok(())
        } else {
            Err(WindowLookupError::Focus(format!(
                "SetForegroundWindow({}) was refused",
                handle
            )))
        }
    }
}

impl InputSynth for NativePlatform {
    fn send_chord(&self, chord: KeyChord) -> Result<(), String> {
        match chord {
            KeyChord::Paste => send_keys(&[VK_CONTROL, VIRTUAL_KEY(b'V' as u16)]),
            KeyChord::ShiftInsert => send_keys(&[VK_SHIFT, VK_INSERT]),
        }
    }

    fn right_click(&self) -> Result<(), String> {
        let click = |flags| INPUT {
            r#type: INPUT_MOUSE,
            Anonymous: INPUT_0 {
                mi: MOUSEINPUT {
                    dx: 0,
                    dy: 0,
                    mouseData: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };
        send_inputs(&[click(MOUSEEVENTF_RIGHTDOWN), click(MOUSEEVENTF_RIGHTUP)])
    }

    fn send_sequence(&self, sequence: &str) -> Result<(), String> {
        for chord in parse_sequence(sequence)? {
            send_keys(&chord)?;
        }
        Ok(())
    }
}

/// Run the Win32 message loop on the calling thread until WM_QUIT.
/// Global hotkeys are delivered through this thread's queue.
pub(super) fn pump_messages() {
    let mut msg = MSG::default();
    loop {
        let result = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };
        if result.0 <= 0 {
            break;
        }
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}
