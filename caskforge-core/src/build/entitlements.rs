// caskforge-core/src/build/entitlements.rs
//! The ad-hoc entitlements document handed to the code-signing step of the
//! build. Fixed content: it declares exactly one capability, disabling the
//! macOS App Sandbox so the built app can read raw trackpad data.

use std::fs;
use std::path::{Path, PathBuf};

use caskforge_common::error::Result;
use caskforge_common::model::cask::BuildSpec;
use tracing::debug;

pub const ENTITLEMENTS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>com.apple.security.app-sandbox</key>
  <false/>
</dict>
</plist>
"#;

/// Write the entitlements plist into the source checkout and return its path.
/// Must happen before the build invocation that references it.
pub fn write_entitlements(stage_path: &Path, build: &BuildSpec) -> Result<PathBuf> {
    let entitlements_path = stage_path.join(build.entitlements_file_name());
    debug!("Writing entitlements plist: {}", entitlements_path.display());
    fs::write(&entitlements_path, ENTITLEMENTS_XML)?;
    Ok(entitlements_path)
}
