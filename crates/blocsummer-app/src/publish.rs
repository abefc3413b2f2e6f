//! External publish hook run after the charts are written.

use async_trait::async_trait;
use blocsummer_config::StorageConfig;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Makes a finished output directory public.
///
/// Publishing never fails a run; implementations log their own problems.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish the contents of `output_dir`.
    async fn publish(&self, output_dir: &Path);
}

/// Runs an executable with no arguments, e.g. a script committing and
/// pushing the output directory.
#[derive(Debug, Clone)]
pub struct PublishHook {
    program: Option<PathBuf>,
}

impl PublishHook {
    /// A hook running `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: Some(program.into()),
        }
    }

    /// A hook that does nothing.
    pub const fn disabled() -> Self {
        Self { program: None }
    }

    /// The configured hook; disabled when turned off or left empty.
    pub fn from_config(storage: &StorageConfig) -> Self {
        if storage.publish_enabled && !storage.publish_hook.as_os_str().is_empty() {
            Self::new(&storage.publish_hook)
        } else {
            Self::disabled()
        }
    }

    /// Program run by the hook, if enabled.
    pub fn program(&self) -> Option<&Path> {
        self.program.as_deref()
    }
}

#[async_trait]
impl Publisher for PublishHook {
    async fn publish(&self, output_dir: &Path) {
        let Some(program) = &self.program else {
            debug!("Publish hook disabled, leaving {} as is", output_dir.display());
            return;
        };

        info!("Running publish hook {} for {}", program.display(), output_dir.display());
        match Command::new(program).status().await {
            Ok(status) if status.success() => info!("Publish hook finished"),
            Ok(status) => warn!("Publish hook {} exited with {}", program.display(), status),
            Err(e) => warn!("Failed to run publish hook {}: {}", program.display(), e),
        }
    }
}
