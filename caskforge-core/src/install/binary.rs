// caskforge-core/src/install/binary.rs
use std::fs;
use std::path::Path;

use caskforge_common::error::Result;
use caskforge_common::model::artifact::InstalledArtifact;
use caskforge_common::model::cask::Cask;
use tracing::debug;

/// Symlink declared executables from inside the installed app bundle into the
/// prefix bin dir. Stanza sources are relative to the applications dir.
pub fn install_binary_links(
    cask: &Cask,
    applications_dir: &Path,
    bin_dir: &Path,
) -> Result<Vec<InstalledArtifact>> {
    let mut installed = Vec::new();
    if cask.artifacts.binary.is_empty() {
        return Ok(installed);
    }

    fs::create_dir_all(bin_dir)?;

    for stanza in &cask.artifacts.binary {
        let target_path = applications_dir.join(&stanza.source);
        if !target_path.exists() {
            debug!(
                "Binary source '{}' not found, skipping",
                target_path.display()
            );
            continue;
        }

        let link_path = bin_dir.join(&stanza.target);
        let _ = fs::remove_file(&link_path);
        debug!(
            "Linking binary '{}' -> '{}'",
            target_path.display(),
            link_path.display()
        );
        #[cfg(unix)]
        std::os::unix::fs::symlink(&target_path, &link_path)?;

        installed.push(InstalledArtifact::BinaryLink {
            link_path,
            target_path,
        });
    }

    Ok(installed)
}
