//! Best-effort "open this file" post-step.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

pub trait Viewer: Send + Sync {
    fn open(&self, path: &Path) -> io::Result<()>;
}

/// Hands the file to the platform's default application without waiting for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemViewer;

impl SystemViewer {
    fn command(path: &Path) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(path);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]).arg(path);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(path);
            cmd
        }
    }
}

impl Viewer for SystemViewer {
    fn open(&self, path: &Path) -> io::Result<()> {
        Self::command(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopViewer;

impl Viewer for NoopViewer {
    fn open(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

/// Opens `path`, logging instead of returning any failure.
pub fn open_best_effort(viewer: &dyn Viewer, path: &Path) {
    match viewer.open(path) {
        Ok(()) => log::debug!("Opened {} in the default viewer", path.display()),
        Err(e) => log::warn!("Could not open {}: {}", path.display(), e),
    }
}
