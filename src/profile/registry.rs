//! Terminal profile registry
//!
//! Ordered, thread-safe set of profiles. Lookups walk the profiles in
//! insertion order and the first match wins. Edits are validated so that new
//! overlaps cannot be introduced, and are persisted before they return.

use std::sync::{Arc, Mutex, RwLock};

use super::types::{PasteMethod, TerminalProfile, process_key};
use crate::window::WindowIdentity;

/// Errors from registry edits
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile name must not be empty")]
    EmptyName,

    #[error("Profile '{0}' has no process names")]
    NoProcessNames(String),

    #[error("Profile '{0}' uses a custom paste method but has no paste sequence")]
    MissingCustomSequence(String),

    #[error("Process '{process}' is already claimed by profile '{existing}'")]
    Overlap { process: String, existing: String },

    #[error("No profile named '{0}'")]
    NotFound(String),

    #[error("Failed to persist profiles: {0}")]
    Persist(String),

    #[error("Profile registry lock poisoned")]
    Poisoned,
}

/// Durable storage for the profile list
pub trait ProfileStore: Send + Sync {
    fn persist(&self, profiles: &[TerminalProfile]) -> Result<(), ProfileError>;
}

/// In-memory store that records every persisted snapshot
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    snapshots: Mutex<Vec<Vec<TerminalProfile>>>,
    fail: Mutex<bool>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `persist` calls fail
    pub fn set_failing(&self, fail: bool) {
        if let Ok(mut guard) = self.fail.lock() {
            *guard = fail;
        }
    }

    pub fn last_snapshot(&self) -> Option<Vec<TerminalProfile>> {
        self.snapshots.lock().ok()?.last().cloned()
    }

    pub fn persist_count(&self) -> usize {
        self.snapshots.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl ProfileStore for MemoryProfileStore {
    fn persist(&self, profiles: &[TerminalProfile]) -> Result<(), ProfileError> {
        if self.fail.lock().map(|f| *f).unwrap_or(false) {
            return Err(ProfileError::Persist("store unavailable".to_string()));
        }
        self.snapshots
            .lock()
            .map_err(|_| ProfileError::Poisoned)?
            .push(profiles.to_vec());
        Ok(())
    }
}

/// A process name claimed by more than one profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileOverlap {
    pub process: String,
    /// Profile that wins on lookup
    pub winner: String,
    /// Profile that never matches this process
    pub shadowed: String,
}

pub struct ProfileRegistry {
    profiles: RwLock<Vec<TerminalProfile>>,
    store: Arc<dyn ProfileStore>,
}

impl ProfileRegistry {
    /// Build a registry from a loaded profile list.
    ///
    /// Loaded lists are accepted as-is, even when they overlap; lookups then
    /// resolve to the first profile in list order.
    pub fn new(profiles: Vec<TerminalProfile>, store: Arc<dyn ProfileStore>) -> Self {
        let registry = Self {
            profiles: RwLock::new(profiles),
            store,
        };
        for overlap in registry.overlaps() {
            tracing::warn!(
                "Process '{}' matches profiles '{}' and '{}'; '{}' wins",
                overlap.process,
                overlap.winner,
                overlap.shadowed,
                overlap.winner
            );
        }
        registry
    }

    /// First profile whose process names contain `identity.process_name`
    pub fn resolve(&self, identity: &WindowIdentity) -> Option<TerminalProfile> {
        self.resolve_process(&identity.process_name)
    }

    pub fn resolve_process(&self, process_name: &str) -> Option<TerminalProfile> {
        if process_name.trim().is_empty() {
            return None;
        }
        let profiles = self.profiles.read().ok()?;
        profiles.iter().find(|p| p.matches(process_name)).cloned()
    }

    pub fn get(&self, name: &str) -> Option<TerminalProfile> {
        let profiles = self.profiles.read().ok()?;
        profiles.iter().find(|p| p.name == name).cloned()
    }

    /// Snapshot of all profiles in lookup order
    pub fn list(&self) -> Vec<TerminalProfile> {
        self.profiles.read().map(|p| p.clone()).unwrap_or_default()
    }

    /// Insert or replace the profile with `profile.name`.
    ///
    /// A replaced profile keeps its position. The change is persisted before
    /// returning and rolled back if persisting fails.
    pub fn upsert(&self, profile: TerminalProfile) -> Result<(), ProfileError> {
        validate(&profile)?;

        let mut profiles = self.profiles.write().map_err(|_| ProfileError::Poisoned)?;

        for other in profiles.iter().filter(|p| p.name != profile.name) {
            if let Some(process) = profile.process_names.iter().find(|n| other.matches(n)) {
                return Err(ProfileError::Overlap {
                    process: process.clone(),
                    existing: other.name.clone(),
                });
            }
        }

        let previous = profiles.clone();
        match profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => *existing = profile.clone(),
            None => profiles.push(profile.clone()),
        }

        if let Err(e) = self.store.persist(&profiles) {
            *profiles = previous;
            return Err(e);
        }

        tracing::info!("Saved terminal profile '{}' ({})", profile.name, profile.paste_method);
        Ok(())
    }

    /// Remove the profile named `name`, persisting the change
    pub fn remove(&self, name: &str) -> Result<TerminalProfile, ProfileError> {
        let mut profiles = self.profiles.write().map_err(|_| ProfileError::Poisoned)?;

        let index = profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;

        let removed = profiles.remove(index);
        if let Err(e) = self.store.persist(&profiles) {
            profiles.insert(index, removed);
            return Err(e);
        }

        tracing::info!("Removed terminal profile '{}'", name);
        Ok(removed)
    }

    /// Process names claimed by more than one profile
    pub fn overlaps(&self) -> Vec<ProfileOverlap> {
        let Ok(profiles) = self.profiles.read() else {
            return Vec::new();
        };

        let mut found = Vec::new();
        for (i, winner) in profiles.iter().enumerate() {
            for shadowed in profiles.iter().skip(i + 1) {
                for process in &shadowed.process_names {
                    if winner.matches(process)
                        && !found.iter().any(|o: &ProfileOverlap| {
                            o.shadowed == shadowed.name && process_key(&o.process) == process_key(process)
                        })
                    {
                        found.push(ProfileOverlap {
                            process: process.clone(),
                            winner: winner.name.clone(),
                            shadowed: shadowed.name.clone(),
                        });
                    }
                }
            }
        }
        found
    }
}

fn validate(profile: &TerminalProfile) -> Result<(), ProfileError> {
    if profile.name.trim().is_empty() {
        return Err(ProfileError::EmptyName);
    }
    if profile.process_names.iter().all(|p| p.trim().is_empty()) {
        return Err(ProfileError::NoProcessNames(profile.name.clone()));
    }
    if profile.paste_method == PasteMethod::Custom
        && profile
            .custom_paste_sequence
            .as_deref()
            .is_none_or(|s| s.trim().is_empty())
    {
        return Err(ProfileError::MissingCustomSequence(profile.name.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowHandle;

    fn identity(process: &str) -> WindowIdentity {
        WindowIdentity {
            handle: WindowHandle(42),
            process_name: process.to_string(),
            title: String::new(),
        }
    }

    fn registry_with(profiles: Vec<TerminalProfile>) -> (ProfileRegistry, Arc<MemoryProfileStore>) {
        let store = Arc::new(MemoryProfileStore::new());
        (ProfileRegistry::new(profiles, store.clone()), store)
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let (registry, _) = registry_with(vec![TerminalProfile::new(
            "putty",
            PasteMethod::RightClick,
            &["putty"],
        )]);

        let profile = registry.resolve(&identity("PUTTY")).unwrap();
        assert_eq!(profile.name, "putty");
        assert_eq!(profile.paste_method, PasteMethod::RightClick);
    }

    #[test]
    fn test_resolve_unknown_and_empty() {
        let (registry, _) = registry_with(vec![TerminalProfile::new(
            "putty",
            PasteMethod::RightClick,
            &["putty"],
        )]);
        assert!(registry.resolve(&identity("firefox")).is_none());
        assert!(registry.resolve(&identity("")).is_none());
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let (registry, _) = registry_with(super::super::default_profiles());
        let first = registry.resolve(&identity("pwsh"));
        for _ in 0..10 {
            assert_eq!(registry.resolve(&identity("pwsh")), first);
        }
        assert_eq!(first.unwrap().name, "powershell");
    }

    #[test]
    fn test_loaded_overlap_resolves_first_registered() {
        let (registry, _) = registry_with(vec![
            TerminalProfile::new("first", PasteMethod::ShiftInsert, &["xterm"]),
            TerminalProfile::new("second", PasteMethod::CtrlV, &["XTERM", "uxterm"]),
        ]);

        assert_eq!(registry.resolve(&identity("xterm")).unwrap().name, "first");
        assert_eq!(registry.resolve(&identity("uxterm")).unwrap().name, "second");
        assert_eq!(
            registry.overlaps(),
            vec![ProfileOverlap {
                process: "XTERM".to_string(),
                winner: "first".to_string(),
                shadowed: "second".to_string(),
            }]
        );
    }

    #[test]
    fn test_upsert_rejects_overlap() {
        let (registry, store) = registry_with(vec![TerminalProfile::new(
            "putty",
            PasteMethod::RightClick,
            &["putty"],
        )]);

        let err = registry
            .upsert(TerminalProfile::new("kitty", PasteMethod::CtrlV, &["kitty", "Putty"]))
            .unwrap_err();
        assert!(matches!(err, ProfileError::Overlap { ref existing, .. } if existing == "putty"));
        assert_eq!(registry.list().len(), 1);
        assert_eq!(store.persist_count(), 0);
    }

    #[test]
    fn test_upsert_appends_and_persists() {
        let (registry, store) = registry_with(Vec::new());
        registry
            .upsert(TerminalProfile::new("kitty", PasteMethod::CtrlV, &["kitty"]))
            .unwrap();

        assert_eq!(registry.resolve(&identity("kitty")).unwrap().name, "kitty");
        assert_eq!(store.last_snapshot().unwrap().len(), 1);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let (registry, _) = registry_with(vec![
            TerminalProfile::new("a", PasteMethod::CtrlV, &["a"]),
            TerminalProfile::new("b", PasteMethod::CtrlV, &["b"]),
        ]);

        registry
            .upsert(TerminalProfile::new("a", PasteMethod::ShiftInsert, &["a", "aa"]))
            .unwrap();

        let names: Vec<String> = registry.list().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(
            registry.resolve(&identity("aa")).unwrap().paste_method,
            PasteMethod::ShiftInsert
        );
    }

    #[test]
    fn test_upsert_validation() {
        let (registry, _) = registry_with(Vec::new());
        assert!(matches!(
            registry.upsert(TerminalProfile::new(" ", PasteMethod::CtrlV, &["x"])),
            Err(ProfileError::EmptyName)
        ));
        assert!(matches!(
            registry.upsert(TerminalProfile::new("x", PasteMethod::CtrlV, &[])),
            Err(ProfileError::NoProcessNames(_))
        ));
        assert!(matches!(
            registry.upsert(TerminalProfile::new("x", PasteMethod::Custom, &["x"])),
            Err(ProfileError::MissingCustomSequence(_))
        ));
    }

    #[test]
    fn test_persist_failure_rolls_back() {
        let (registry, store) = registry_with(vec![TerminalProfile::new(
            "putty",
            PasteMethod::RightClick,
            &["putty"],
        )]);
        store.set_failing(true);

        assert!(matches!(
            registry.upsert(TerminalProfile::new("kitty", PasteMethod::CtrlV, &["kitty"])),
            Err(ProfileError::Persist(_))
        ));
        assert!(registry.resolve(&identity("kitty")).is_none());

        assert!(registry.remove("putty").is_err());
        assert!(registry.resolve(&identity("putty")).is_some());
    }

    #[test]
    fn test_remove() {
        let (registry, store) = registry_with(vec![TerminalProfile::new(
            "putty",
            PasteMethod::RightClick,
            &["putty"],
        )]);

        let removed = registry.remove("putty").unwrap();
        assert_eq!(removed.name, "putty");
        assert!(registry.resolve(&identity("putty")).is_none());
        assert_eq!(store.last_snapshot(), Some(Vec::new()));
        assert!(matches!(registry.remove("putty"), Err(ProfileError::NotFound(_))));
    }
}
