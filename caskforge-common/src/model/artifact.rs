// caskforge-common/src/model/artifact.rs
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Represents an item installed or managed by caskforge, recorded in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InstalledArtifact {
    /// The main application bundle (e.g., in /Applications).
    AppBundle { path: PathBuf },
    /// A command-line binary symlinked into the prefix's bin dir.
    BinaryLink {
        link_path: PathBuf,
        target_path: PathBuf,
    },
    /// A symlink created within the Caskroom pointing to the installed app.
    /// Kept for reference and for manifest-driven cleanup.
    CaskroomLink {
        link_path: PathBuf,
        target_path: PathBuf,
    },
}
