// caskforge-common/src/requirement.rs
//! Install-time platform precondition checks. These run before the build is
//! allowed to start; there is no point building on unsupported hardware.

use semver::Version;
use tracing::debug;

use crate::error::{ForgeError, Result};
use crate::model::cask::DependsOn;

/// Parse a macOS product version leniently: "13" and "13.5" are padded out to
/// full semver form before parsing.
pub fn parse_macos_version(raw: &str) -> Result<Version> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ForgeError::Generic(
            "Empty macOS version string".to_string(),
        ));
    }
    let dots = trimmed.matches('.').count();
    let padded = match dots {
        0 => format!("{trimmed}.0.0"),
        1 => format!("{trimmed}.0"),
        _ => trimmed.to_string(),
    };
    Ok(Version::parse(&padded)?)
}

/// Parse a minimum-version requirement like ">= 13" or "13.0".
fn parse_minimum(req: &str) -> Result<Version> {
    let stripped = req.trim().strip_prefix(">=").unwrap_or(req.trim());
    parse_macos_version(stripped)
}

/// `std::env::consts::ARCH` says "aarch64" where cask definitions say "arm64".
fn normalize_arch(arch: &str) -> &str {
    match arch {
        "aarch64" => "arm64",
        other => other,
    }
}

/// Check the cask's platform preconditions against observed host values.
/// Pure so it can be exercised without a macOS host; callers obtain the
/// host version and architecture from the build environment probes.
pub fn check_platform(
    depends_on: &DependsOn,
    host_macos_version: &str,
    host_arch: &str,
) -> Result<()> {
    if let Some(req) = &depends_on.macos {
        let minimum = parse_minimum(req)?;
        let host = parse_macos_version(host_macos_version)?;
        debug!("Host macOS {host} vs required minimum {minimum}");
        if host < minimum {
            return Err(ForgeError::RequirementUnmet(format!(
                "macOS {minimum} or newer is required, but this host runs {host}"
            )));
        }
    }

    if let Some(required_arch) = &depends_on.arch {
        let host = normalize_arch(host_arch);
        let required = normalize_arch(required_arch);
        debug!("Host arch {host} vs required arch {required}");
        if host != required {
            return Err(ForgeError::RequirementUnmet(format!(
                "CPU architecture '{required}' is required, but this host is '{host}'"
            )));
        }
    }

    Ok(())
}
