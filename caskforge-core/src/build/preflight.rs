// caskforge-core/src/build/preflight.rs
//! The build-from-source procedure: a linear chain of hard gates run inside
//! the stage before any artifact is placed. Each external interaction
//! (toolchain, build tool, filesystem copy) is re-verified by observing the
//! filesystem rather than trusting the reported exit status alone.

use std::path::{Path, PathBuf};

use caskforge_common::error::{ForgeError, Result};
use caskforge_common::model::cask::Cask;
use fs_extra::dir::CopyOptions;
use tracing::debug;

use crate::build::{entitlements, xcode};

/// Turn a source checkout at `stage_path` into a built app bundle at the
/// stage root, failing fast at each unmet precondition. Returns the staged
/// bundle path. No retries; any failure aborts the whole install.
///
/// `xcodebuild` is the resolved build tool path (see
/// `devtools::find_xcodebuild`); it is re-checked here so nothing is
/// written or spawned when the tool has gone missing since resolution.
pub fn build_from_source(cask: &Cask, stage_path: &Path, xcodebuild: &Path) -> Result<PathBuf> {
    let display_name = cask.display_name();

    // Gate 1: toolchain. Checked before anything is written or spawned.
    if !xcodebuild.is_file() {
        return Err(ForgeError::BuildEnvError(format!(
            "Building from source requires Xcode, but no build tool was found at {}.\n\nPlease \
             install Xcode from the Mac App Store, then run:\n  sudo xcode-select -s \
             /Applications/Xcode.app/Contents/Developer",
            xcodebuild.display()
        )));
    }
    let tool = xcodebuild.to_path_buf();

    // Gate 2: the entitlements document the signing step will reference.
    let entitlements_path = entitlements::write_entitlements(stage_path, &cask.build)?;

    // Gate 3: the build itself.
    let invocation = xcode::XcodeBuild {
        tool,
        working_dir: stage_path.to_path_buf(),
        spec: cask.build.clone(),
        entitlements_path,
    };
    invocation.run(&display_name)?;

    // Gate 4: the product must be observable, whatever the tool reported.
    let product_path = invocation.expected_product_path();
    xcode::verify_built_product(&product_path, &cask.build.app_name)?;

    // Gate 5: copy the bundle out of derived data to the stage root.
    let staged_app_path = stage_path.join(&cask.build.app_name);
    debug!(
        "Copying built product {} to stage root {}",
        product_path.display(),
        stage_path.display()
    );
    let mut options = CopyOptions::new();
    options.overwrite = true;
    fs_extra::dir::copy(&product_path, stage_path, &options).map_err(|e| {
        ForgeError::InstallError(format!(
            "Failed to copy {} to the staging directory: {e}",
            cask.build.app_name
        ))
    })?;

    // Gate 6: the copy can fail independently of the build.
    if !staged_app_path.exists() {
        return Err(ForgeError::InstallError(format!(
            "Failed to copy {} to the staging directory: {} is missing after copy",
            cask.build.app_name,
            staged_app_path.display()
        )));
    }

    debug!("Staged built app at {}", staged_app_path.display());
    Ok(staged_app_path)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    use tempfile::TempDir;

    use super::*;

    fn trackweight() -> Cask {
        serde_json::from_str(include_str!("../../../casks/trackweight.json")).unwrap()
    }

    /// An executable stub standing in for xcodebuild.
    fn stub_tool(script: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let tool = dir.path().join("xcodebuild");
        fs::write(&tool, script).unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        (dir, tool)
    }

    const PRODUCING_TOOL: &str = "#!/bin/sh\n\
        mkdir -p build/Build/Products/Release/TrackWeight.app/Contents/MacOS\n\
        echo binary > build/Build/Products/Release/TrackWeight.app/Contents/MacOS/TrackWeight\n\
        exit 0\n";

    #[test]
    fn missing_toolchain_halts_before_any_side_effect() {
        let stage = TempDir::new().unwrap();
        let cask = trackweight();

        let err = build_from_source(&cask, stage.path(), Path::new("/nonexistent/xcodebuild"))
            .unwrap_err();
        assert!(matches!(err, ForgeError::BuildEnvError(_)));
        assert!(err.to_string().contains("Xcode"));
        // Nothing was written into the stage.
        assert_eq!(fs::read_dir(stage.path()).unwrap().count(), 0);
    }

    #[test]
    fn failing_build_halts_without_copying() {
        let stage = TempDir::new().unwrap();
        let (_dir, tool) = stub_tool("#!/bin/sh\nexit 1\n");
        let cask = trackweight();

        let err = build_from_source(&cask, stage.path(), &tool).unwrap_err();
        assert!(matches!(err, ForgeError::InstallError(_)));
        assert!(err.to_string().contains("Failed to build TrackWeight"));
        assert!(!stage.path().join("TrackWeight.app").exists());
    }

    #[test]
    fn zero_exit_without_product_is_still_a_failure() {
        let stage = TempDir::new().unwrap();
        let (_dir, tool) = stub_tool("#!/bin/sh\nexit 0\n");
        let cask = trackweight();

        let err = build_from_source(&cask, stage.path(), &tool).unwrap_err();
        assert!(matches!(err, ForgeError::InstallError(_)));
        assert!(err
            .to_string()
            .contains("build/Build/Products/Release/TrackWeight.app"));
        assert!(!stage.path().join("TrackWeight.app").exists());
    }

    #[test]
    fn unreadable_product_content_fails_the_copy_gate() {
        // The product exists, so gate 4 passes, but its content cannot be
        // copied: a dangling symlink makes the recursive copy error out.
        let stage = TempDir::new().unwrap();
        let sabotaged = "#!/bin/sh\n\
            mkdir -p build/Build/Products/Release/TrackWeight.app\n\
            ln -s /nonexistent-copy-source \
            build/Build/Products/Release/TrackWeight.app/Resources\n\
            exit 0\n";
        let (_dir, tool) = stub_tool(sabotaged);
        let cask = trackweight();

        let err = build_from_source(&cask, stage.path(), &tool).unwrap_err();
        assert!(matches!(err, ForgeError::InstallError(_)));
        assert!(err
            .to_string()
            .contains("Failed to copy TrackWeight.app to the staging directory"));
    }

    #[test]
    fn successful_build_stages_the_bundle() {
        let stage = TempDir::new().unwrap();
        let (_dir, tool) = stub_tool(PRODUCING_TOOL);
        let cask = trackweight();

        let staged = build_from_source(&cask, stage.path(), &tool).unwrap();
        assert_eq!(staged, stage.path().join("TrackWeight.app"));
        assert!(staged.join("Contents/MacOS/TrackWeight").is_file());
        // The entitlements document was written where the build expects it.
        let entitlements = stage.path().join("TrackWeight.entitlements");
        assert_eq!(
            fs::read(&entitlements).unwrap(),
            crate::build::entitlements::ENTITLEMENTS_XML.as_bytes()
        );
    }

    #[test]
    fn build_tool_receives_the_fixed_argument_list() {
        // The stub records its argv; the invocation must carry the
        // signing-off and sandbox-off settings and the entitlements flag.
        let stage = TempDir::new().unwrap();
        let recorder = "#!/bin/sh\n\
            printf '%s\\n' \"$@\" > argv.txt\n\
            mkdir -p build/Build/Products/Release/TrackWeight.app\n\
            exit 0\n";
        let (_dir, tool) = stub_tool(recorder);
        let cask = trackweight();

        build_from_source(&cask, stage.path(), &tool).unwrap();
        let argv = fs::read_to_string(stage.path().join("argv.txt")).unwrap();
        let lines: Vec<&str> = argv.lines().collect();
        assert!(lines.contains(&"-project"));
        assert!(lines.contains(&"TrackWeight.xcodeproj"));
        assert!(lines.contains(&"-scheme"));
        assert!(lines.contains(&"CODE_SIGNING_ALLOWED=NO"));
        assert!(lines.contains(&"CODE_SIGN_IDENTITY=-"));
        assert!(lines.contains(&"-IDEPackageSupportDisableManifestSandbox=YES"));
        assert!(lines
            .iter()
            .any(|l| l.starts_with("OTHER_CODE_SIGN_FLAGS=--entitlements=")
                && l.ends_with("TrackWeight.entitlements")));
        assert_eq!(lines.last(), Some(&"build"));
    }
}
