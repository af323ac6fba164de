//! Terminal profiles: which paste strategy a given terminal needs

mod registry;
mod types;

pub use registry::{MemoryProfileStore, ProfileError, ProfileOverlap, ProfileRegistry, ProfileStore};
pub use types::{PasteMethod, TerminalProfile, default_profiles};
