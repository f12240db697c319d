//! Regeneration of the artifacts by an external computation.
//!
//! The server only depends on the [`Regenerator`] trait. The production
//! implementation, [`NotebookRegenerator`], shells out to a configured
//! program (by default `python run_notebook.py`) and judges the run purely by
//! its exit status.

use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use crate::config::NotebookConfig;
use crate::error::RegenerationError;

/// Something that (re)produces the artifact files.
///
/// Implementations report success or failure only. They do not say which
/// artifacts, if any, were rewritten.
#[async_trait]
pub trait Regenerator: Send + Sync {
    async fn regenerate(&self) -> Result<(), RegenerationError>;
}

/// Runs the external notebook program and waits for it to exit.
///
/// Dropping the `regenerate` future does not stop the program; only the
/// configured timeout does. On unix the program leads its own process group
/// so a timeout also takes down anything it started, such as a notebook
/// kernel.
#[derive(Debug, Clone)]
pub struct NotebookRegenerator {
    config: NotebookConfig,
}

impl NotebookRegenerator {
    pub fn new(config: NotebookConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Regenerator for NotebookRegenerator {
    async fn regenerate(&self) -> Result<(), RegenerationError> {
        let program = &self.config.program;

        let mut command = Command::new(program);
        command
            .args(&self.config.args)
            .current_dir(&self.config.working_dir)
            .stdin(Stdio::null());
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(|source| RegenerationError::Spawn {
            program: program.clone(),
            source,
        })?;

        let waited = match self.config.timeout {
            Some(after) => match tokio::time::timeout(after, child.wait()).await {
                Ok(waited) => waited,
                Err(_) => {
                    kill_process_group(&mut child, program).await;
                    return Err(RegenerationError::TimedOut {
                        program: program.clone(),
                        after,
                    });
                }
            },
            None => child.wait().await,
        };

        let status = waited.map_err(|source| RegenerationError::Wait {
            program: program.clone(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(RegenerationError::Unsuccessful {
                program: program.clone(),
                status,
            })
        }
    }
}

/// Kill `child` together with every process in its group, then reap it.
async fn kill_process_group(child: &mut Child, program: &str) {
    #[cfg(unix)]
    if let Some(pgid) = child.id().and_then(|pid| libc::pid_t::try_from(pid).ok()) {
        // SAFETY: plain syscall; the group was created at spawn with the child as leader.
        if unsafe { libc::killpg(pgid, libc::SIGKILL) } != 0 {
            tracing::warn!(
                "Failed to signal process group of `{}`: {}",
                program,
                std::io::Error::last_os_error()
            );
        }
    }

    if let Err(e) = child.kill().await {
        tracing::debug!("Kill of timed out `{}` after group signal: {}", program, e);
    }
}

/// Never runs anything; serves whatever is already on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipRegeneration;

#[async_trait]
impl Regenerator for SkipRegeneration {
    async fn regenerate(&self) -> Result<(), RegenerationError> {
        Ok(())
    }
}

/// Allows at most one regeneration of `R` in flight.
///
/// Callers that arrive while a run is active wait for it to finish and then
/// start their own run, so every request still regenerates before reading.
#[derive(Debug)]
pub struct Serialized<R> {
    inner: R,
    lock: Mutex<()>,
}

impl<R> Serialized<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl<R: Regenerator> Regenerator for Serialized<R> {
    async fn regenerate(&self) -> Result<(), RegenerationError> {
        let _guard = self.lock.lock().await;
        self.inner.regenerate().await
    }
}

/// Run `regenerator` and log how it went.
///
/// The outcome is advisory: it is returned for callers that care (the
/// `regenerate` command) but the artifact routes ignore it.
pub async fn regenerate_logged(regenerator: &dyn Regenerator) -> Result<(), RegenerationError> {
    let started = Instant::now();
    let outcome = regenerator.regenerate().await;
    let elapsed = started.elapsed();

    match &outcome {
        Ok(()) => tracing::info!(?elapsed, "Regeneration finished"),
        Err(e) => tracing::warn!(?elapsed, "Regeneration failed: {}", e),
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn skip_regeneration_always_succeeds() {
        assert!(SkipRegeneration.regenerate().await.is_ok());
    }

    #[tokio::test]
    async fn serialized_passes_through_the_inner_outcome() {
        let regenerator = Serialized::new(SkipRegeneration);
        assert!(regenerate_logged(&regenerator).await.is_ok());
    }
}
