//! Model output cleanup
//!
//! Language models like to wrap commands in Markdown fences or echo a shell
//! prompt in front of them. This turns whatever came back into text that can
//! be pasted into a terminal as-is.

/// Prompt markers stripped from the start of a command, longest first
const PROMPT_PREFIXES: &[&str] = &["PS>", "$", "❯", ">", "%", " "];

const FENCE: &str = "```";

/// What to do with multi-line output after cleanup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinePolicy {
    /// Keep every line the model returned
    Preserve,
    /// Keep only the first non-empty line
    #[default]
    FirstLine,
}

/// Clean raw model text into a command. Empty input yields empty output.
pub fn sanitize(raw: &str) -> String {
    let mut text = raw.trim().to_string();

    if text.starts_with(FENCE) {
        let lines: Vec<&str> = text.split('\n').collect();
        if lines.len() > 2 {
            text = lines[1..lines.len() - 1].join("\n");
        }
    }

    text = text.replace('`', "");

    let mut rest = text.as_str();
    while let Some(stripped) = PROMPT_PREFIXES.iter().find_map(|p| rest.strip_prefix(p)) {
        rest = stripped;
    }

    rest.trim().to_string()
}

/// `sanitize`, then apply `policy`
pub fn sanitize_with(raw: &str, policy: LinePolicy) -> String {
    let cleaned = sanitize(raw);
    match policy {
        LinePolicy::Preserve => cleaned,
        LinePolicy::FirstLine => cleaned
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or_default()
            .to_string(),
    }
}
