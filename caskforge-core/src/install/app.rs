// caskforge-core/src/install/app.rs
use std::fs;
use std::path::Path;

use caskforge_common::error::{ForgeError, Result};
use caskforge_common::model::artifact::InstalledArtifact;
use caskforge_common::model::cask::Cask;
use fs_extra::dir::CopyOptions;
use tracing::{debug, warn};

/// Move the staged app bundle into the applications dir and leave a symlink
/// to it in the Caskroom version dir. The destination is re-checked after
/// placement; the move can fail independently of everything before it.
pub fn install_app_from_staged(
    cask: &Cask,
    staged_app_path: &Path,
    cask_version_install_path: &Path,
    applications_dir: &Path,
) -> Result<Vec<InstalledArtifact>> {
    if !staged_app_path.exists() || !staged_app_path.is_dir() {
        return Err(ForgeError::NotFound(format!(
            "Staged app bundle for {} not found or is not a directory: {}",
            cask.token,
            staged_app_path.display()
        )));
    }

    let app_name = staged_app_path
        .file_name()
        .ok_or_else(|| {
            ForgeError::Generic(format!(
                "Invalid staged app path (no filename): {}",
                staged_app_path.display()
            ))
        })?
        .to_string_lossy();

    let final_app_destination = applications_dir.join(app_name.as_ref());
    debug!(
        "Installing app '{}': {} -> {}",
        app_name,
        staged_app_path.display(),
        final_app_destination.display()
    );

    if !applications_dir.exists() {
        fs::create_dir_all(applications_dir)?;
    }

    // Clear out a leftover from a failed prior attempt.
    if final_app_destination.exists() || final_app_destination.symlink_metadata().is_ok() {
        debug!(
            "Removing existing item at {}",
            final_app_destination.display()
        );
        if final_app_destination.is_dir() && !final_app_destination.symlink_metadata()?.is_symlink()
        {
            fs::remove_dir_all(&final_app_destination)?;
        } else {
            fs::remove_file(&final_app_destination)?;
        }
    }

    // Prefer a rename; fall back to a recursive copy when the stage lives on
    // a different filesystem.
    if let Err(rename_err) = fs::rename(staged_app_path, &final_app_destination) {
        debug!(
            "Rename {} -> {} failed ({}), falling back to copy",
            staged_app_path.display(),
            final_app_destination.display(),
            rename_err
        );
        let mut options = CopyOptions::new();
        options.overwrite = true;
        fs_extra::dir::copy(staged_app_path, applications_dir, &options).map_err(|e| {
            ForgeError::InstallError(format!(
                "Failed to copy {} to {}: {e}",
                staged_app_path.display(),
                applications_dir.display()
            ))
        })?;
    }

    if !final_app_destination.exists() {
        return Err(ForgeError::InstallError(format!(
            "Failed to place {} at {}: missing after copy",
            app_name,
            final_app_destination.display()
        )));
    }

    // Caskroom symlink back to the installed app, for reference and cleanup.
    let caskroom_link = cask_version_install_path.join(app_name.as_ref());
    if caskroom_link.symlink_metadata().is_ok() {
        if let Err(e) = fs::remove_file(&caskroom_link) {
            warn!(
                "Failed to remove existing item at Caskroom symlink path {}: {}. Proceeding.",
                caskroom_link.display(),
                e
            );
        }
    }

    #[cfg(unix)]
    std::os::unix::fs::symlink(&final_app_destination, &caskroom_link)?;
    #[cfg(not(unix))]
    warn!(
        "Symlink creation not supported on this platform. Skipping link for {}.",
        caskroom_link.display()
    );

    debug!(
        "Successfully installed app artifact: {} (Cask: {})",
        app_name, cask.token
    );

    Ok(vec![
        InstalledArtifact::AppBundle {
            path: final_app_destination.clone(),
        },
        InstalledArtifact::CaskroomLink {
            link_path: caskroom_link,
            target_path: final_app_destination,
        },
    ])
}
