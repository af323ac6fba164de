//! Session UI built from native dialog helpers run as child processes.
//!
//! At most one dialog is open at a time. A reader thread waits for it and
//! posts the answer with the session token; a dialog killed by `close` posts
//! nothing.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use crate::runtime::{EventSender, SessionView};
use crate::session::{SessionEvent, SessionToken};

const TITLE: &str = "Shorthand";
const PROMPT_LABEL: &str = "Describe the command you need:";
const UNSAFE_LABEL: &str = "Allow unsafe commands";

struct OpenDialog {
    token: SessionToken,
    child: Child,
}

pub struct DialogView {
    unsafe_default: bool,
    open: Arc<Mutex<Option<OpenDialog>>>,
}

fn lock(open: &Mutex<Option<OpenDialog>>) -> MutexGuard<'_, Option<OpenDialog>> {
    open.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn kill(mut dialog: OpenDialog) {
    let _ = dialog.child.kill();
    let _ = dialog.child.wait();
}

impl DialogView {
    /// `unsafe_default` is the initial state of the prompt's unsafe toggle
    pub fn new(unsafe_default: bool) -> Self {
        Self {
            unsafe_default,
            open: Arc::new(Mutex::new(None)),
        }
    }

    fn spawn_dialog<F>(
        &self,
        token: SessionToken,
        command: Option<Command>,
        events: &EventSender,
        answer: F,
    ) where
        F: FnOnce(bool, String) -> SessionEvent + Send + 'static,
    {
        let Some(mut command) = command else {
            tracing::warn!("No dialog helper available on this platform");
            let _ = events.send(SessionEvent::Cancel { token }.into());
            return;
        };

        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(
                    "Failed to open {} dialog: {}",
                    command.get_program().to_string_lossy(),
                    e
                );
                let _ = events.send(SessionEvent::Cancel { token }.into());
                return;
            }
        };
        let stdout = child.stdout.take();

        if let Some(previous) = lock(&self.open).replace(OpenDialog { token, child }) {
            kill(previous);
        }

        let open = self.open.clone();
        let events = events.clone();
        thread::spawn(move || {
            let mut output = String::new();
            if let Some(mut stdout) = stdout {
                let _ = stdout.read_to_string(&mut output);
            }

            let Some(mut dialog) = lock(&open).take_if(|d| d.token == token) else {
                return;
            };
            let success = dialog
                .child
                .wait()
                .map(|status| status.success())
                .unwrap_or(false);

            let output = output.trim_end_matches(['\r', '\n']).to_string();
            let _ = events.send(answer(success, output).into());
        });
    }
}

impl SessionView for DialogView {
    fn show_prompt(
        &self,
        token: SessionToken,
        prompt: &str,
        status: Option<&str>,
        events: &EventSender,
    ) {
        let unsafe_default = self.unsafe_default;
        self.spawn_dialog(
            token,
            backend::prompt_command(prompt, status, unsafe_default),
            events,
            move |success, output| prompt_event(token, success, output, unsafe_default),
        );
    }

    fn show_status(&self, token: SessionToken, message: &str) {
        tracing::info!("{} {}", token, message);
    }

    fn show_preview(&self, token: SessionToken, command: &str) {
        tracing::info!("{} generated: {}", token, command);
        self.notify(command);
    }

    fn request_confirmation(&self, token: SessionToken, command: &str, events: &EventSender) {
        self.spawn_dialog(
            token,
            backend::confirm_command(command),
            events,
            move |success, output| {
                if backend::confirmed(success, &output) {
                    SessionEvent::Confirm { token }
                } else {
                    SessionEvent::Reject { token }
                }
            },
        );
    }

    fn close(&self, token: SessionToken) {
        let dialog = lock(&self.open).take_if(|d| d.token == token);
        if let Some(dialog) = dialog {
            kill(dialog);
        }
    }

    fn notify(&self, message: &str) {
        let Some(mut command) = backend::notify_command(message) else {
            tracing::info!("{}", message);
            return;
        };
        command.stdout(Stdio::null()).stderr(Stdio::null());
        match command.spawn() {
            Ok(mut child) => {
                thread::spawn(move || {
                    let _ = child.wait();
                });
            }
            Err(e) => tracing::debug!("Notification failed ({}): {}", e, message),
        }
    }
}

fn prompt_text(status: Option<&str>) -> String {
    match status {
        Some(status) if !status.is_empty() => format!("{}\n\n{}", status, PROMPT_LABEL),
        _ => PROMPT_LABEL.to_string(),
    }
}

/// Submit with the toggle state the dialog reported, or Cancel
fn prompt_event(
    token: SessionToken,
    success: bool,
    output: String,
    unsafe_default: bool,
) -> SessionEvent {
    match backend::prompt_answer(success, output, unsafe_default) {
        Some((prompt, allow_unsafe)) => SessionEvent::Submit {
            token,
            prompt,
            allow_unsafe,
        },
        None => SessionEvent::Cancel { token },
    }
}

fn confirm_text(command: &str) -> String {
    format!("Use this command?\n\n{}", command)
}

#[cfg(target_os = "linux")]
mod backend {
    use super::*;

    /// zenity renders --text as Pango markup
    pub(super) fn markup_escape(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    /// A form with the prompt entry and a Yes/No unsafe combo. Form fields
    /// cannot be prefilled, so the previous prompt goes into the text.
    pub(super) fn prompt_command(
        prompt: &str,
        status: Option<&str>,
        unsafe_default: bool,
    ) -> Option<Command> {
        let mut text = prompt_text(status);
        if !prompt.is_empty() {
            text = format!("{}\n\nLast prompt: {}", text, prompt);
        }
        let choices = if unsafe_default { "Yes|No" } else { "No|Yes" };

        let mut command = Command::new("zenity");
        command.args([
            "--forms".to_string(),
            format!("--title={}", TITLE),
            format!("--text={}", markup_escape(&text)),
            "--separator=\n".to_string(),
            "--add-entry=Prompt".to_string(),
            format!("--add-combo={}", UNSAFE_LABEL),
            format!("--combo-values={}", choices),
        ]);
        Some(command)
    }

    pub(super) fn confirm_command(command_text: &str) -> Option<Command> {
        let mut command = Command::new("zenity");
        command.args([
            "--question".to_string(),
            format!("--title={}", TITLE),
            "--ok-label=Use command".to_string(),
            "--cancel-label=Back".to_string(),
            format!("--text={}", markup_escape(&confirm_text(command_text))),
        ]);
        Some(command)
    }

    pub(super) fn notify_command(message: &str) -> Option<Command> {
        let mut command = Command::new("notify-send");
        command.args([TITLE, message]);
        Some(command)
    }

    /// `output` is the entry, then the combo choice on its own line. An
    /// untouched combo prints nothing and keeps the default.
    pub(super) fn prompt_answer(
        success: bool,
        output: String,
        unsafe_default: bool,
    ) -> Option<(String, bool)> {
        if !success {
            return None;
        }
        let Some((prompt, choice)) = output.rsplit_once('\n') else {
            return Some((output, unsafe_default));
        };
        let allow_unsafe = match choice.trim() {
            "Yes" => true,
            "No" => false,
            _ => unsafe_default,
        };
        Some((prompt.to_string(), allow_unsafe))
    }

    pub(super) fn confirmed(success: bool, _output: &str) -> bool {
        success
    }
}

#[cfg(target_os = "macos")]
mod backend {
    use super::*;

    /// Quote `text` as an AppleScript string literal
    pub(super) fn applescript_quote(text: &str) -> String {
        format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
    }

    fn osascript(script: String) -> Command {
        let mut command = Command::new("osascript");
        command.args(["-e", &script]);
        command
    }

    const GENERATE: &str = "Generate";
    const GENERATE_UNSAFE: &str = "Generate (unsafe)";

    /// The unsafe toggle is a second submit button; the default button
    /// follows the configured default
    pub(super) fn prompt_command(
        prompt: &str,
        status: Option<&str>,
        unsafe_default: bool,
    ) -> Option<Command> {
        let default_button = if unsafe_default { GENERATE_UNSAFE } else { GENERATE };
        let dialog = format!(
            "set answer to display dialog {} default answer {} buttons {{\"Cancel\", {}, {}}} default button {} cancel button \"Cancel\" with title {}",
            applescript_quote(&prompt_text(status)),
            applescript_quote(prompt),
            applescript_quote(GENERATE_UNSAFE),
            applescript_quote(GENERATE),
            applescript_quote(default_button),
            applescript_quote(TITLE)
        );
        let mut command = Command::new("osascript");
        command.args([
            "-e",
            &dialog,
            "-e",
            "return (button returned of answer) & linefeed & (text returned of answer)",
        ]);
        Some(command)
    }

    pub(super) fn confirm_command(command_text: &str) -> Option<Command> {
        Some(osascript(format!(
            "display dialog {} buttons {{\"Back\", \"Use Command\"}} default button \"Use Command\" cancel button \"Back\" with title {}",
            applescript_quote(&confirm_text(command_text)),
            applescript_quote(TITLE)
        )))
    }

    pub(super) fn notify_command(message: &str) -> Option<Command> {
        Some(osascript(format!(
            "display notification {} with title {}",
            applescript_quote(message),
            applescript_quote(TITLE)
        )))
    }

    /// `output` is the button pressed, then the prompt text
    pub(super) fn prompt_answer(
        success: bool,
        output: String,
        _unsafe_default: bool,
    ) -> Option<(String, bool)> {
        if !success {
            return None;
        }
        let (button, prompt) = output.split_once('\n').unwrap_or((output.as_str(), ""));
        Some((prompt.to_string(), button == GENERATE_UNSAFE))
    }

    pub(super) fn confirmed(success: bool, _output: &str) -> bool {
        success
    }
}

#[cfg(target_os = "windows")]
mod backend {
    use super::*;

    /// Quote `text` as a PowerShell single-quoted string
    pub(super) fn powershell_quote(text: &str) -> String {
        format!("'{}'", text.replace('\'', "''"))
    }

    fn powershell(script: String) -> Command {
        let mut command = Command::new("powershell");
        command.args(["-NoProfile", "-NonInteractive", "-Command", &script]);
        command
    }

    /// A small WinForms form: label, prompt box, unsafe checkbox
    pub(super) fn prompt_command(
        prompt: &str,
        status: Option<&str>,
        unsafe_default: bool,
    ) -> Option<Command> {
        let script = [
            "Add-Type -AssemblyName System.Windows.Forms, System.Drawing".to_string(),
            "$f = New-Object System.Windows.Forms.Form".to_string(),
            format!("$f.Text = {}", powershell_quote(TITLE)),
            "$f.ClientSize = New-Object System.Drawing.Size(440, 170)".to_string(),
            "$f.StartPosition = 'CenterScreen'; $f.TopMost = $true".to_string(),
            "$l = New-Object System.Windows.Forms.Label; $l.SetBounds(10, 10, 420, 60)".to_string(),
            format!("$l.Text = {}", powershell_quote(&prompt_text(status))),
            "$t = New-Object System.Windows.Forms.TextBox; $t.SetBounds(10, 75, 420, 20)".to_string(),
            format!("$t.Text = {}", powershell_quote(prompt)),
            "$c = New-Object System.Windows.Forms.CheckBox; $c.SetBounds(10, 105, 300, 20)".to_string(),
            format!(
                "$c.Text = {}; $c.Checked = ${}",
                powershell_quote(UNSAFE_LABEL),
                unsafe_default
            ),
            "$ok = New-Object System.Windows.Forms.Button; $ok.Text = 'Generate'; $ok.DialogResult = 'OK'; $ok.SetBounds(270, 135, 75, 25)".to_string(),
            "$no = New-Object System.Windows.Forms.Button; $no.Text = 'Cancel'; $no.DialogResult = 'Cancel'; $no.SetBounds(355, 135, 75, 25)".to_string(),
            "$f.Controls.AddRange(@($l, $t, $c, $ok, $no)); $f.AcceptButton = $ok; $f.CancelButton = $no".to_string(),
            "if ($f.ShowDialog() -ne 'OK') { exit 1 }".to_string(),
            "Write-Output ([int]$c.Checked); Write-Output $t.Text".to_string(),
        ]
        .join("; ");
        Some(powershell(script))
    }

    pub(super) fn confirm_command(command_text: &str) -> Option<Command> {
        Some(powershell(format!(
            "Add-Type -AssemblyName System.Windows.Forms; [System.Windows.Forms.MessageBox]::Show({}, {}, 'YesNo')",
            powershell_quote(&confirm_text(command_text)),
            powershell_quote(TITLE)
        )))
    }

    pub(super) fn notify_command(_message: &str) -> Option<Command> {
        None
    }

    /// `output` is the checkbox state (1 or 0), then the prompt text
    pub(super) fn prompt_answer(
        success: bool,
        output: String,
        unsafe_default: bool,
    ) -> Option<(String, bool)> {
        if !success {
            return None;
        }
        let (checked, prompt) = output.split_once('\n').unwrap_or((output.as_str(), ""));
        let allow_unsafe = match checked.trim() {
            "1" => true,
            "0" => false,
            _ => unsafe_default,
        };
        Some((prompt.trim_end_matches('\r').to_string(), allow_unsafe))
    }

    pub(super) fn confirmed(success: bool, output: &str) -> bool {
        success && output.trim() == "Yes"
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
mod backend {
    use super::*;

    pub(super) fn prompt_command(
        _prompt: &str,
        _status: Option<&str>,
        _unsafe_default: bool,
    ) -> Option<Command> {
        None
    }

    pub(super) fn confirm_command(_command_text: &str) -> Option<Command> {
        None
    }

    pub(super) fn notify_command(_message: &str) -> Option<Command> {
        None
    }

    pub(super) fn prompt_answer(
        _success: bool,
        _output: String,
        _unsafe_default: bool,
    ) -> Option<(String, bool)> {
        None
    }

    pub(super) fn confirmed(_success: bool, _output: &str) -> bool {
        false
    }
}
