// caskforge-common/src/model/cask.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ForgeError, Result};

/// Where the cask's source checkout comes from. caskforge builds casks from
/// source, so this is always a git URL pinned to a branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    pub url: String,
    #[serde(default)]
    pub branch: Option<String>,
}

/// The `sha256` field: a hex digest, or `no_check` for casks whose payload is
/// produced by the build itself and cannot be pinned ahead of time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sha256Field {
    Hex(String),
    NoCheck { no_check: bool },
}

impl Sha256Field {
    pub fn is_no_check(&self) -> bool {
        matches!(self, Sha256Field::NoCheck { no_check: true })
    }
}

/// Install-time platform preconditions.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DependsOn {
    /// Minimum macOS version, as a comparison string like ">= 13".
    #[serde(default)]
    pub macos: Option<String>,
    /// Required CPU architecture, e.g. "arm64".
    #[serde(default)]
    pub arch: Option<String>,
}

/// Parameters handed to the external build tool. The expected product path is
/// derived from these rather than stored, so the two can never disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSpec {
    pub project: String,
    pub scheme: String,
    pub configuration: String,
    /// Derived-data directory, relative to the source checkout.
    pub derived_data_dir: String,
    /// Name of the produced application bundle, e.g. "TrackWeight.app".
    pub app_name: String,
}

impl BuildSpec {
    /// Path of the built product relative to the source checkout.
    pub fn built_product_rel_path(&self) -> PathBuf {
        PathBuf::from(&self.derived_data_dir)
            .join("Build/Products")
            .join(&self.configuration)
            .join(&self.app_name)
    }

    /// Name of the entitlements file written next to the project, e.g.
    /// "TrackWeight.entitlements".
    pub fn entitlements_file_name(&self) -> String {
        format!("{}.entitlements", self.scheme)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryStanza {
    /// Path of the executable relative to the stage root after install.
    pub source: String,
    /// Link name created in the prefix bin dir.
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArtifactSet {
    /// The application bundle to place in the applications dir.
    #[serde(default)]
    pub app: Option<String>,
    #[serde(default)]
    pub binary: Vec<BinaryStanza>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Postflight {
    /// Refresh Launch Services after install so the app icon registers.
    #[serde(default)]
    pub launch_services_refresh: bool,
}

/// The `zap` stanza: paths removed only on full uninstall.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ZapStanza {
    #[serde(default)]
    pub trash: Vec<String>,
}

/// A source-build cask definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cask {
    pub token: String,

    #[serde(default)]
    pub name: Option<Vec<String>>,
    pub version: Option<String>,
    pub desc: Option<String>,
    pub homepage: Option<String>,

    pub source: SourceSpec,

    #[serde(default)]
    pub sha256: Option<Sha256Field>,

    #[serde(default)]
    pub depends_on: Option<DependsOn>,

    pub build: BuildSpec,

    #[serde(default)]
    pub artifacts: ArtifactSet,

    #[serde(default)]
    pub postflight: Postflight,

    #[serde(default)]
    pub zap: ZapStanza,
}

impl Cask {
    /// Load a cask definition from a JSON file on disk.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| {
            ForgeError::NotFound(format!(
                "Cask definition {} could not be read: {}",
                path.display(),
                e
            ))
        })?;
        let cask: Cask = serde_json::from_str(&data)?;
        Ok(cask)
    }

    pub fn version_str(&self) -> String {
        self.version.clone().unwrap_or_else(|| "latest".to_string())
    }

    /// Get a friendly name for display purposes.
    pub fn display_name(&self) -> String {
        self.name
            .as_ref()
            .and_then(|names| names.first().cloned())
            .unwrap_or_else(|| self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACKWEIGHT_JSON: &str = include_str!("../../../casks/trackweight.json");

    #[test]
    fn trackweight_definition_parses() {
        let cask: Cask = serde_json::from_str(TRACKWEIGHT_JSON).unwrap();
        assert_eq!(cask.token, "trackweight");
        assert_eq!(cask.version.as_deref(), Some("1.0.3"));
        assert_eq!(cask.display_name(), "TrackWeight");
        assert!(cask.sha256.unwrap().is_no_check());
        assert_eq!(cask.source.branch.as_deref(), Some("main"));

        let depends = cask.depends_on.unwrap();
        assert_eq!(depends.macos.as_deref(), Some(">= 13"));
        assert_eq!(depends.arch.as_deref(), Some("arm64"));

        assert_eq!(cask.artifacts.app.as_deref(), Some("TrackWeight.app"));
        assert_eq!(cask.artifacts.binary.len(), 1);
        assert_eq!(cask.artifacts.binary[0].target, "trackweight");
        assert!(cask.postflight.launch_services_refresh);
    }

    #[test]
    fn built_product_path_derives_from_build_spec() {
        let cask: Cask = serde_json::from_str(TRACKWEIGHT_JSON).unwrap();
        assert_eq!(
            cask.build.built_product_rel_path(),
            PathBuf::from("build/Build/Products/Release/TrackWeight.app")
        );
        assert_eq!(
            cask.build.entitlements_file_name(),
            "TrackWeight.entitlements"
        );
    }

    #[test]
    fn definition_loads_from_a_file_on_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("trackweight.json");
        fs::write(&path, TRACKWEIGHT_JSON).unwrap();

        let cask = Cask::load_from_file(&path).unwrap();
        assert_eq!(cask.token, "trackweight");
        assert_eq!(cask.version_str(), "1.0.3");
    }

    #[test]
    fn missing_definition_file_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Cask::load_from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ForgeError::NotFound(_)));
    }

    #[test]
    fn zap_stanza_lists_exactly_the_declared_paths() {
        let cask: Cask = serde_json::from_str(TRACKWEIGHT_JSON).unwrap();
        assert_eq!(
            cask.zap.trash,
            vec![
                "~/Library/Application Support/TrackWeight",
                "~/Library/Preferences/com.krishkrosh.TrackWeight.plist",
                "~/Library/Saved Application State/com.krishkrosh.TrackWeight.savedState",
            ]
        );
    }
}
