// caskforge-core/src/install/mod.rs
pub mod app;
pub mod binary;
pub mod postflight;

use std::fs;
use std::path::Path;
use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

use caskforge_common::config::Config;
use caskforge_common::error::{ForgeError, Result};
use caskforge_common::model::artifact::InstalledArtifact;
use caskforge_common::model::cask::Cask;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

pub const CASK_MANIFEST_FILE: &str = "CASK_INSTALL_MANIFEST.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaskInstallManifest {
    pub manifest_format_version: String,
    pub token: String,
    pub version: String,
    pub installed_at: u64,
    pub artifacts: Vec<InstalledArtifact>,
    pub primary_app_file_name: Option<String>,
}

/// Place a staged, already-built app into its final locations and record a
/// manifest in the Caskroom. The stage is consumed: the bundle is moved out
/// of it.
pub fn install_cask(cask: &Cask, staged_app_path: &Path, config: &Config) -> Result<()> {
    debug!("Installing cask: {}", cask.token);
    let cask_version_path = config.cask_room_version_path(&cask.token, &cask.version_str());

    if !cask_version_path.exists() {
        fs::create_dir_all(&cask_version_path).map_err(|e| {
            ForgeError::Io(std::sync::Arc::new(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed create cask dir {}: {}",
                    cask_version_path.display(),
                    e
                ),
            )))
        })?;
        debug!(
            "Created caskroom version directory: {}",
            cask_version_path.display()
        );
    }

    let applications_dir = config.applications_dir();
    let mut all_artifacts: Vec<InstalledArtifact> = Vec::new();

    match app::install_app_from_staged(
        cask,
        staged_app_path,
        &cask_version_path,
        &applications_dir,
    ) {
        Ok(mut artifacts) => all_artifacts.append(&mut artifacts),
        Err(e) => {
            error!("App artifact installation failed: {}", e);
            let _ = fs::remove_dir_all(&cask_version_path);
            return Err(e);
        }
    }

    let mut binary_artifacts =
        binary::install_binary_links(cask, &applications_dir, &config.bin_dir())?;
    all_artifacts.append(&mut binary_artifacts);

    debug!("Writing cask installation manifest");
    write_cask_manifest(cask, &cask_version_path, all_artifacts)?;
    debug!("Successfully installed cask: {}", cask.token);
    Ok(())
}

pub fn write_cask_manifest(
    cask: &Cask,
    cask_version_install_path: &Path,
    artifacts: Vec<InstalledArtifact>,
) -> Result<()> {
    let manifest_path = cask_version_install_path.join(CASK_MANIFEST_FILE);
    debug!("Writing cask manifest: {}", manifest_path.display());
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e: SystemTimeError| ForgeError::Generic(format!("System time error: {e}")))?
        .as_secs();

    let primary_app_file_name = artifacts.iter().find_map(|artifact| {
        if let InstalledArtifact::AppBundle { path } = artifact {
            path.file_name()
                .map(|name| name.to_string_lossy().to_string())
        } else {
            None
        }
    });

    let manifest_data = CaskInstallManifest {
        manifest_format_version: "1.0".to_string(),
        token: cask.token.clone(),
        version: cask.version_str(),
        installed_at: timestamp,
        artifacts,
        primary_app_file_name,
    };

    let file = fs::File::create(&manifest_path).map_err(|e| {
        ForgeError::Io(std::sync::Arc::new(std::io::Error::new(
            e.kind(),
            format!("Failed create manifest {}: {}", manifest_path.display(), e),
        )))
    })?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &manifest_data).map_err(|e| {
        error!(
            "Failed to serialize cask manifest JSON for {}: {}",
            cask.token, e
        );
        ForgeError::Json(std::sync::Arc::new(e))
    })?;
    debug!(
        "Successfully wrote cask manifest with {} artifact entries.",
        manifest_data.artifacts.len()
    );
    Ok(())
}

pub fn read_cask_manifest(cask_version_install_path: &Path) -> Result<CaskInstallManifest> {
    let manifest_path = cask_version_install_path.join(CASK_MANIFEST_FILE);
    let data = fs::read_to_string(&manifest_path).map_err(|e| {
        ForgeError::NotFound(format!(
            "Install manifest {} could not be read: {}",
            manifest_path.display(),
            e
        ))
    })?;
    let manifest: CaskInstallManifest = serde_json::from_str(&data)?;
    Ok(manifest)
}
