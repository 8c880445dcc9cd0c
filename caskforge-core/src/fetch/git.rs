// caskforge-core/src/fetch/git.rs
//! Source checkout via git. Source-build casks have no downloadable payload;
//! the checkout itself is the install input. Contains blocking network and
//! filesystem I/O.

use std::path::Path;

use caskforge_common::error::{ForgeError, Result};
use caskforge_common::model::cask::SourceSpec;
use git2::build::RepoBuilder;
use tracing::debug;

/// Clone the cask's source into `dest`. An existing checkout is reused as-is;
/// a stale stage is the caller's to discard.
pub fn ensure_checkout(source: &SourceSpec, dest: &Path) -> Result<()> {
    if dest.join(".git").is_dir() {
        debug!("Reusing existing checkout at {}", dest.display());
        return Ok(());
    }

    debug!("Cloning {} into {}", source.url, dest.display());
    let mut builder = RepoBuilder::new();
    if let Some(branch) = &source.branch {
        builder.branch(branch);
    }
    builder.clone(&source.url, dest).map_err(|e| {
        ForgeError::Generic(format!(
            "Failed to clone {} into {}: {e}",
            source.url,
            dest.display()
        ))
    })?;
    debug!("Clone complete for {}", source.url);
    Ok(())
}
