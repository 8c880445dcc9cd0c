// caskforge-core/src/uninstall/mod.rs
//! Manifest-driven removal. Plain uninstall removes what the install
//! manifest recorded; `zap` additionally trashes the cask's declared user
//! data paths.

use std::fs;
use std::path::{Path, PathBuf};

use caskforge_common::config::Config;
use caskforge_common::error::{ForgeError, Result};
use caskforge_common::model::artifact::InstalledArtifact;
use caskforge_common::model::cask::Cask;
use tracing::{debug, warn};

use crate::install;

/// Remove every artifact recorded in the cask's install manifest, then the
/// Caskroom entry itself.
pub fn uninstall_cask(cask: &Cask, config: &Config) -> Result<()> {
    let cask_version_path = config.cask_room_version_path(&cask.token, &cask.version_str());
    if !cask_version_path.exists() {
        return Err(ForgeError::NotFound(format!(
            "Cask '{}' does not appear to be installed (no {} entry)",
            cask.token,
            cask_version_path.display()
        )));
    }

    let manifest = install::read_cask_manifest(&cask_version_path)?;
    debug!(
        "Uninstalling {} ({} recorded artifacts)",
        cask.token,
        manifest.artifacts.len()
    );

    for artifact in &manifest.artifacts {
        match artifact {
            InstalledArtifact::AppBundle { path } => remove_path(path),
            InstalledArtifact::BinaryLink { link_path, .. }
            | InstalledArtifact::CaskroomLink { link_path, .. } => remove_path(link_path),
        }
    }

    let token_path = config.cask_room_token_path(&cask.token);
    fs::remove_dir_all(&token_path).map_err(|e| {
        ForgeError::InstallError(format!(
            "Failed to remove Caskroom entry {}: {e}",
            token_path.display()
        ))
    })?;
    debug!("Removed Caskroom entry {}", token_path.display());
    Ok(())
}

/// The absolute paths the cask's zap stanza declares, tilde-expanded.
pub fn zap_targets(cask: &Cask, home: &Path) -> Vec<PathBuf> {
    cask.zap
        .trash
        .iter()
        .map(|raw| expand_tilde(raw, home))
        .collect()
}

/// Move every declared zap path to the trash. Best-effort per path: a path
/// that is absent or refuses to move does not fail the others.
pub fn zap(cask: &Cask, home: &Path) {
    for target in zap_targets(cask, home) {
        if !target.exists() {
            debug!("Zap target {} not present, skipping", target.display());
            continue;
        }
        debug!("Trashing {}...", target.display());
        if let Err(e) = trash::delete(&target) {
            warn!("Failed to trash {}: {}", target.display(), e);
        }
    }
}

fn remove_path(path: &Path) {
    if path.symlink_metadata().is_err() {
        debug!("Path {} not found for removal.", path.display());
        return;
    }
    let is_dir = path.is_dir()
        && !path
            .symlink_metadata()
            .is_ok_and(|m| m.file_type().is_symlink());
    let result = if is_dir {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match result {
        Ok(()) => debug!("Removed {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
    }
}

/// Expand a path that may start with '~' to the user's home directory.
fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        home.join(stripped)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::install::write_cask_manifest;

    fn trackweight() -> Cask {
        serde_json::from_str(include_str!("../../../casks/trackweight.json")).unwrap()
    }

    #[test]
    fn zap_targets_are_exactly_the_declared_three() {
        let home = Path::new("/Users/example");
        let targets = zap_targets(&trackweight(), home);
        assert_eq!(
            targets,
            vec![
                PathBuf::from("/Users/example/Library/Application Support/TrackWeight"),
                PathBuf::from(
                    "/Users/example/Library/Preferences/com.krishkrosh.TrackWeight.plist"
                ),
                PathBuf::from(
                    "/Users/example/Library/Saved Application State/com.krishkrosh.TrackWeight.savedState"
                ),
            ]
        );
    }

    #[test]
    fn absolute_paths_pass_through_tilde_expansion() {
        let home = Path::new("/Users/example");
        assert_eq!(
            expand_tilde("/Library/Global", home),
            PathBuf::from("/Library/Global")
        );
    }

    #[test]
    fn uninstall_removes_recorded_artifacts_and_caskroom_entry() {
        let root = TempDir::new().unwrap();
        let config = Config::with_root(root.path());
        let cask = trackweight();

        let cask_version_path = config.cask_room_version_path(&cask.token, &cask.version_str());
        fs::create_dir_all(&cask_version_path).unwrap();

        // A fake installed layout: app bundle, caskroom link, binary link.
        let applications = root.path().join("Applications");
        let app = applications.join("TrackWeight.app");
        fs::create_dir_all(app.join("Contents/MacOS")).unwrap();
        fs::write(app.join("Contents/MacOS/TrackWeight"), b"binary").unwrap();
        let caskroom_link = cask_version_path.join("TrackWeight.app");
        std::os::unix::fs::symlink(&app, &caskroom_link).unwrap();
        fs::create_dir_all(config.bin_dir()).unwrap();
        let bin_link = config.bin_dir().join("trackweight");
        std::os::unix::fs::symlink(app.join("Contents/MacOS/TrackWeight"), &bin_link).unwrap();

        let artifacts = vec![
            InstalledArtifact::AppBundle { path: app.clone() },
            InstalledArtifact::CaskroomLink {
                link_path: caskroom_link,
                target_path: app.clone(),
            },
            InstalledArtifact::BinaryLink {
                link_path: bin_link.clone(),
                target_path: app.join("Contents/MacOS/TrackWeight"),
            },
        ];
        write_cask_manifest(&cask, &cask_version_path, artifacts).unwrap();

        uninstall_cask(&cask, &config).unwrap();

        assert!(!app.exists());
        assert!(bin_link.symlink_metadata().is_err());
        assert!(!config.cask_room_token_path(&cask.token).exists());
    }

    #[test]
    fn uninstall_of_absent_cask_is_not_found() {
        let root = TempDir::new().unwrap();
        let config = Config::with_root(root.path());
        let err = uninstall_cask(&trackweight(), &config).unwrap_err();
        assert!(matches!(err, ForgeError::NotFound(_)));
    }
}
