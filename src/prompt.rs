use crate::error::Result;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOrigin {
    Argument,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPrompt {
    pub text: String,
    pub origin: PromptOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Ready(RawPrompt),
    /// No argument and no prompt file; an empty file was created at this path.
    Missing(PathBuf),
    /// A prompt file exists but holds only whitespace.
    Empty,
}

/// Resolves the raw prompt from the command line or a sidecar text file.
#[derive(Debug, Clone)]
pub struct PromptSource {
    path: PathBuf,
}

impl PromptSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn obtain(&self, cli_arg: Option<&str>) -> Result<PromptOutcome> {
        if let Some(arg) = cli_arg.filter(|a| !a.trim().is_empty()) {
            return Ok(PromptOutcome::Ready(RawPrompt {
                text: arg.to_string(),
                origin: PromptOrigin::Argument,
            }));
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(false)
                    .open(&self.path)?;
                log::info!("Created empty prompt file at {}", self.path.display());
                return Ok(PromptOutcome::Missing(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let text = contents.trim();
        if text.is_empty() {
            return Ok(PromptOutcome::Empty);
        }

        Ok(PromptOutcome::Ready(RawPrompt {
            text: text.to_string(),
            origin: PromptOrigin::File(self.path.clone()),
        }))
    }
}
