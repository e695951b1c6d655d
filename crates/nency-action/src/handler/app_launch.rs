//! Desktop application launching.
//!
//! Maps friendly names ("calculator", "chrome") to the platform's executable
//! or bundle name, then spawns it without waiting.

use std::process::{Command, Stdio};
use std::thread::JoinHandle;

use crate::error::ActionError;
use crate::handler::AppLauncher;
use crate::types::Collaborator;

const WINDOWS_APPS: &[(&str, &str)] = &[
    ("notepad", "notepad.exe"),
    ("calculator", "calc.exe"),
    ("paint", "mspaint.exe"),
    ("word", "winword.exe"),
    ("excel", "excel.exe"),
    ("chrome", "chrome.exe"),
    ("firefox", "firefox.exe"),
    ("spotify", "spotify.exe"),
];

const MACOS_APPS: &[(&str, &str)] = &[
    ("safari", "Safari"),
    ("chrome", "Google Chrome"),
    ("firefox", "Firefox"),
    ("terminal", "Terminal"),
    ("notes", "Notes"),
    ("spotify", "Spotify"),
];

const LINUX_APPS: &[(&str, &str)] = &[
    ("firefox", "firefox"),
    ("chrome", "google-chrome"),
    ("terminal", "gnome-terminal"),
    ("gedit", "gedit"),
    ("spotify", "spotify"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            "linux" => Platform::Linux,
            _ => Platform::Other,
        }
    }
}

/// Resolve a friendly name to what the platform launches.
///
/// Lookup is case-insensitive. Unknown names pass through unchanged, with
/// `.exe` appended on Windows. `None` on unsupported platforms.
pub fn resolve_app(platform: Platform, name: &str) -> Option<String> {
    let table = match platform {
        Platform::Windows => WINDOWS_APPS,
        Platform::MacOs => MACOS_APPS,
        Platform::Linux => LINUX_APPS,
        Platform::Other => return None,
    };

    let key = name.to_lowercase();
    let known = table
        .iter()
        .find(|(friendly, _)| *friendly == key)
        .map(|(_, target)| target.to_string());

    Some(known.unwrap_or_else(|| match platform {
        Platform::Windows => format!("{}.exe", name),
        _ => name.to_string(),
    }))
}

fn launch_command(platform: Platform, target: &str) -> Command {
    match platform {
        Platform::Windows => {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", target]);
            cmd
        }
        Platform::MacOs => {
            let mut cmd = Command::new("open");
            cmd.args(["-a", target]);
            cmd
        }
        _ => Command::new(target),
    }
}

/// Spawn `cmd` with null stdio and reap it on a background thread.
///
/// The launched app outlives the request; the returned handle finishes
/// once the child exits and may be dropped.
fn spawn_detached(mut cmd: Command) -> std::io::Result<JoinHandle<()>> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let pid = child.id();
    std::thread::Builder::new()
        .name(format!("app-reaper-{}", pid))
        .spawn(move || match child.wait() {
            Ok(status) => tracing::debug!(pid, %status, "Launched application exited"),
            Err(e) => tracing::warn!(pid, error = %e, "Failed to reap launched application"),
        })
}

/// Launches applications through the host OS.
pub struct SystemAppLauncher {
    platform: Platform,
}

impl SystemAppLauncher {
    pub fn new() -> Self {
        Self {
            platform: Platform::current(),
        }
    }
}

impl Default for SystemAppLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl AppLauncher for SystemAppLauncher {
    fn launch(&self, name: &str) -> Result<(), ActionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ActionError::InvalidPayload(
                "application name must not be empty".to_string(),
            ));
        }

        let target = resolve_app(self.platform, name)
            .ok_or(ActionError::Unavailable(Collaborator::AppLauncher))?;

        spawn_detached(launch_command(self.platform, &target))
            .map_err(|e| ActionError::external(Collaborator::AppLauncher, e))?;

        tracing::info!(app = %name, target = %target, "Application launched");
        Ok(())
    }
}
