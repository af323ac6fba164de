//! Tests for the delivery engine

use std::sync::Arc;

use super::*;
use crate::profile::{MemoryProfileStore, PasteMethod, ProfileRegistry, TerminalProfile};
use crate::test_support::{FakeClipboard, FakeInput, FakeWindows, Journal};
use crate::window::{WindowHandle, WindowIdentity};

fn target(handle: u64, process: &str) -> WindowIdentity {
    WindowIdentity {
        handle: WindowHandle(handle),
        process_name: process.to_string(),
        title: String::new(),
    }
}

fn engine_with(journal: &Journal, windows: FakeWindows, input_fails: bool) -> DeliveryEngine {
    let registry = ProfileRegistry::new(
        vec![
            TerminalProfile::new("putty", PasteMethod::RightClick, &["putty"]),
            TerminalProfile::new("moba", PasteMethod::ShiftInsert, &["mobaxterm"]),
            TerminalProfile::new("wt", PasteMethod::CtrlV, &["WindowsTerminal"]),
            TerminalProfile::new("kitty", PasteMethod::Custom, &["kitty"])
                .with_sequence("ctrl+shift+v"),
        ],
        Arc::new(MemoryProfileStore::new()),
    );

    DeliveryEngine::new(
        Arc::new(windows),
        Arc::new(FakeInput {
            journal: journal.clone(),
            fail: input_fails,
        }),
        Arc::new(FakeClipboard {
            journal: journal.clone(),
        }),
        Arc::new(registry),
        DeliveryTiming::from_millis(0, 0),
    )
}

fn engine(journal: &Journal) -> DeliveryEngine {
    engine_with(journal, FakeWindows::new(journal.clone()), false)
}

#[test]
fn test_unknown_target_copies_to_clipboard() {
    let journal = Journal::default();
    let outcome = engine(&journal)
        .deliver("ls -la", &WindowIdentity::unknown())
        .unwrap();

    assert_eq!(outcome, DeliveryOutcome::CopiedToClipboard);
    assert_eq!(journal.entries(), vec!["clipboard ls -la"]);
}

#[test]
fn test_unnamed_process_pastes_with_default_method() {
    let journal = Journal::default();
    let outcome = engine(&journal).deliver("ls", &target(5, "")).unwrap();
    assert_eq!(outcome, DeliveryOutcome::Delivered);
    assert_eq!(journal.entries(), vec!["focus 5", "clipboard ls", "chord Paste"]);
}

#[test]
fn test_paste_method_per_profile() {
    let cases = [
        ("putty", "right_click"),
        ("MobaXterm", "chord ShiftInsert"),
        ("WindowsTerminal", "chord Paste"),
        ("kitty", "sequence ctrl+shift+v"),
        ("firefox", "chord Paste"),
    ];

    for (process, expected) in cases {
        let journal = Journal::default();
        let outcome = engine(&journal).deliver("whoami", &target(3, process)).unwrap();
        assert_eq!(outcome, DeliveryOutcome::Delivered);
        assert_eq!(
            journal.entries(),
            vec![
                "focus 3".to_string(),
                "clipboard whoami".to_string(),
                expected.to_string()
            ],
            "process {process}"
        );
    }
}

#[test]
fn test_focus_failure_still_copies_command() {
    let journal = Journal::default();
    let mut windows = FakeWindows::new(journal.clone());
    windows.refuse_focus = true;

    let err = engine_with(&journal, windows, false)
        .deliver("ls", &target(3, "putty"))
        .unwrap_err();
    assert!(matches!(err, DeliveryError::Focus(_)));
    assert_eq!(journal.entries(), vec!["clipboard ls"]);
}

#[test]
fn test_input_failure_leaves_command_on_clipboard() {
    let journal = Journal::default();
    let err = engine_with(&journal, FakeWindows::new(journal.clone()), true)
        .deliver("ls", &target(3, "putty"))
        .unwrap_err();

    assert!(matches!(err, DeliveryError::Input(_)));
    assert_eq!(journal.entries(), vec!["focus 3", "clipboard ls"]);
}
