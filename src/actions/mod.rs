//! Actions module - launches the configured application on button events
//!
//! Path resolution is entirely this dispatcher's concern: shortcuts
//! and URLs go through the OS default handler, batch files through a
//! command interpreter, and plain executables are spawned directly.

use std::io;
use std::path::Path;
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info};

/// Action dispatch errors.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("failed to launch {path}: {source}")]
    Launch {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Launches a configured application in response to a device button
/// event.
pub trait ActionDispatcher: Send {
    fn launch(&self, path: &Path) -> Result<(), ActionError>;
}

/// How a target path should be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LaunchKind {
    /// Shortcut, URL, or anything that is not a plain file on disk:
    /// hand to the OS default handler, which knows how to resolve it
    Shell,
    /// Batch scripts need a command interpreter
    Batch,
    /// Plain executables are spawned directly
    Direct,
}

fn classify(path: &Path) -> LaunchKind {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    if matches!(ext.as_deref(), Some("lnk") | Some("url")) || !path.exists() {
        return LaunchKind::Shell;
    }
    if matches!(ext.as_deref(), Some("bat") | Some("cmd")) {
        return LaunchKind::Batch;
    }
    LaunchKind::Direct
}

/// Default dispatcher backed by the OS shell and process spawning.
pub struct AppLauncher;

impl AppLauncher {
    fn launch_err(path: &Path, source: io::Error) -> ActionError {
        ActionError::Launch {
            path: path.display().to_string(),
            source,
        }
    }
}

impl ActionDispatcher for AppLauncher {
    fn launch(&self, path: &Path) -> Result<(), ActionError> {
        match classify(path) {
            LaunchKind::Shell => {
                open::that_detached(path).map_err(|e| Self::launch_err(path, e))?;
            }
            LaunchKind::Batch => {
                #[cfg(windows)]
                Command::new("cmd")
                    .arg("/C")
                    .arg(path)
                    .spawn()
                    .map_err(|e| Self::launch_err(path, e))?;

                #[cfg(not(windows))]
                open::that_detached(path).map_err(|e| Self::launch_err(path, e))?;
            }
            LaunchKind::Direct => {
                if let Err(e) = Command::new(path).spawn() {
                    debug!("Direct spawn failed ({}), trying default handler", e);
                    open::that_detached(path).map_err(|e| Self::launch_err(path, e))?;
                }
            }
        }

        info!("Launched: {}", path.display());
        Ok(())
    }
}
