// caskforge-core/src/build/devtools.rs
//! Probes for the host build environment: the active Xcode developer
//! directory, the xcodebuild executable beneath it, the macOS product
//! version, and the CPU architecture.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use caskforge_common::error::{ForgeError, Result};
use tracing::debug;
use which;

/// Query the active developer directory via `xcode-select -p`.
pub fn find_developer_dir() -> Result<PathBuf> {
    debug!("Querying active developer directory via xcode-select -p");
    let output = Command::new("/usr/bin/xcode-select")
        .arg("-p")
        .stderr(Stdio::piped())
        .output();

    match output {
        Ok(out) if out.status.success() => {
            let path_str = String::from_utf8_lossy(&out.stdout).trim().to_string();
            if path_str.is_empty() {
                return Err(ForgeError::BuildEnvError(
                    "xcode-select returned an empty developer directory. Is Xcode installed?"
                        .to_string(),
                ));
            }
            let path = PathBuf::from(path_str);
            debug!("Active developer directory: {}", path.display());
            Ok(path)
        }
        Ok(out) => {
            let stderr = String::from_utf8_lossy(&out.stderr);
            Err(ForgeError::BuildEnvError(format!(
                "xcode-select failed to report a developer directory: {}",
                stderr.trim()
            )))
        }
        Err(e) => Err(ForgeError::BuildEnvError(format!(
            "Failed to execute 'xcode-select -p': {e}. Is Xcode or Command Line Tools installed?"
        ))),
    }
}

/// Locate xcodebuild beneath a developer directory. A Command Line Tools
/// install has a developer dir but no xcodebuild, which is exactly the
/// condition this check exists to catch.
pub fn find_xcodebuild_in(developer_dir: &Path) -> Result<PathBuf> {
    let candidate = developer_dir.join("usr/bin/xcodebuild");
    if candidate.is_file() {
        debug!("Found xcodebuild: {}", candidate.display());
        return Ok(candidate);
    }
    Err(ForgeError::BuildEnvError(format!(
        "Building from source requires Xcode (not just Command Line Tools), but no xcodebuild \
         was found under {}.\n\nPlease install Xcode from the Mac App Store, then run:\n  sudo \
         xcode-select -s /Applications/Xcode.app/Contents/Developer",
        developer_dir.display()
    )))
}

/// Resolve the full xcodebuild path, starting from the active developer dir
/// and falling back to a PATH search.
pub fn find_xcodebuild() -> Result<PathBuf> {
    let developer_dir = find_developer_dir()?;
    match find_xcodebuild_in(&developer_dir) {
        Ok(path) => Ok(path),
        Err(e) => {
            debug!(
                "No xcodebuild under {}, falling back to PATH search",
                developer_dir.display()
            );
            which::which("xcodebuild").map_err(|_| e)
        }
    }
}

/// The host macOS product version, via `sw_vers -productVersion`.
pub fn get_macos_version() -> Result<String> {
    if cfg!(target_os = "macos") {
        debug!("Attempting to get macOS version using sw_vers");
        let output = Command::new("sw_vers")
            .arg("-productVersion")
            .stderr(Stdio::piped())
            .output();

        match output {
            Ok(out) if out.status.success() => {
                let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
                debug!("Found macOS version: {version}");
                Ok(version)
            }
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr);
                Err(ForgeError::BuildEnvError(format!(
                    "sw_vers failed to get product version: {}",
                    stderr.trim()
                )))
            }
            Err(e) => Err(ForgeError::BuildEnvError(format!(
                "Failed to execute 'sw_vers -productVersion': {e}"
            ))),
        }
    } else {
        debug!("Not on macOS, returning '0.0' as version placeholder");
        Ok(String::from("0.0"))
    }
}

/// The host CPU architecture in Rust's spelling ("aarch64", "x86_64").
pub fn get_host_arch() -> &'static str {
    env::consts::ARCH
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn xcodebuild_is_found_beneath_a_developer_dir() {
        let dev_dir = TempDir::new().unwrap();
        let bin_dir = dev_dir.path().join("usr/bin");
        fs::create_dir_all(&bin_dir).unwrap();
        fs::write(bin_dir.join("xcodebuild"), b"").unwrap();

        let found = find_xcodebuild_in(dev_dir.path()).unwrap();
        assert_eq!(found, bin_dir.join("xcodebuild"));
    }

    #[test]
    fn command_line_tools_only_is_rejected_with_guidance() {
        let dev_dir = TempDir::new().unwrap();
        let err = find_xcodebuild_in(dev_dir.path()).unwrap_err();
        assert!(matches!(err, ForgeError::BuildEnvError(_)));
        assert!(err.to_string().contains("xcode-select -s"));
    }
}
