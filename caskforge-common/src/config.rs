// caskforge-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};

use directories::UserDirs;
use tracing::debug;

use super::error::Result;

// Fallback if CASKFORGE_ROOT is not set or is empty.
const DEFAULT_FALLBACK_FORGE_ROOT: &str = "/opt/caskforge";

#[derive(Debug, Clone)]
pub struct Config {
    pub forge_root: PathBuf, // Public for direct construction in tests
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading caskforge configuration");

        let forge_root_str = env::var("CASKFORGE_ROOT")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                debug!(
                    "CASKFORGE_ROOT environment variable not set or empty, falling back to default: {}",
                    DEFAULT_FALLBACK_FORGE_ROOT
                );
                DEFAULT_FALLBACK_FORGE_ROOT.to_string()
            });

        let forge_root = PathBuf::from(&forge_root_str);
        debug!("Effective CASKFORGE_ROOT set to: {}", forge_root.display());

        Ok(Self { forge_root })
    }

    /// A Config rooted at an explicit path, bypassing the environment.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            forge_root: root.into(),
        }
    }

    pub fn forge_root(&self) -> &Path {
        &self.forge_root
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.forge_root.join("bin")
    }

    pub fn cask_room_dir(&self) -> PathBuf {
        self.forge_root.join("Caskroom")
    }

    pub fn stage_dir(&self) -> PathBuf {
        self.forge_root.join("stage")
    }

    pub fn cask_room_token_path(&self, cask_token: &str) -> PathBuf {
        self.cask_room_dir().join(cask_token)
    }

    pub fn cask_room_version_path(&self, cask_token: &str, version_str: &str) -> PathBuf {
        self.cask_room_token_path(cask_token).join(version_str)
    }

    pub fn cask_stage_path(&self, cask_token: &str) -> PathBuf {
        self.stage_dir().join(cask_token)
    }

    pub fn applications_dir(&self) -> PathBuf {
        if cfg!(target_os = "macos") {
            PathBuf::from("/Applications")
        } else {
            self.home_dir().join("Applications")
        }
    }

    pub fn home_dir(&self) -> PathBuf {
        UserDirs::new().map_or_else(|| PathBuf::from("/"), |ud| ud.home_dir().to_path_buf())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::load().expect("Failed to load default configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths_hang_off_root() {
        let config = Config::with_root("/tmp/forge-test-root");
        assert_eq!(
            config.cask_room_version_path("trackweight", "1.0.3"),
            PathBuf::from("/tmp/forge-test-root/Caskroom/trackweight/1.0.3")
        );
        assert_eq!(config.bin_dir(), PathBuf::from("/tmp/forge-test-root/bin"));
        assert_eq!(
            config.cask_stage_path("trackweight"),
            PathBuf::from("/tmp/forge-test-root/stage/trackweight")
        );
    }
}
