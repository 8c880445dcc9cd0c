// caskforge-core/src/install/postflight.rs
//! Post-install hook: refresh Launch Services so the installed app's icon
//! registers immediately. Best-effort; a failure here never fails the
//! install and nothing is verified afterwards.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

const LSREGISTER: &str = "/System/Library/Frameworks/CoreServices.framework/Frameworks/LaunchServices.framework/Support/lsregister";

pub fn refresh_launch_services(installed_app_path: &Path) {
    if !cfg!(target_os = "macos") {
        debug!("Not on macOS, skipping Launch Services refresh");
        return;
    }
    debug!(
        "Refreshing Launch Services for {}",
        installed_app_path.display()
    );
    match Command::new(LSREGISTER)
        .arg("-f")
        .arg(installed_app_path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(status) if status.success() => {
            debug!("Launch Services refresh completed");
        }
        Ok(status) => {
            warn!("lsregister exited with {status}; app icon may not appear until next login");
        }
        Err(e) => {
            warn!("Failed to execute lsregister: {e}");
        }
    }
}
