use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::Duration;
use std::{io, thread};

use log::info;
use thiserror::Error;

use crate::WorkerArg;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("unable to launch: {0}")]
    Launch(#[source] io::Error),
    #[error("exited with status {0}")]
    Exit(i32),
    #[error("terminated by signal")]
    Terminated,
}

/// Delivers one notification about a door event.
pub trait Notifier: Send + Sync {
    fn notify(&self, label: &str, secs: u64) -> Result<(), NotifyError>;
}

/// Runs `<script> <label> <secs>`, exit status zero meaning delivered.
pub struct ScriptNotifier {
    script: PathBuf,
}

impl ScriptNotifier {
    pub fn new<P: Into<PathBuf>>(script: P) -> Self {
        ScriptNotifier {
            script: script.into(),
        }
    }
}

impl Notifier for ScriptNotifier {
    fn notify(&self, label: &str, secs: u64) -> Result<(), NotifyError> {
        let status = Command::new(&self.script)
            .arg(label)
            .arg(secs.to_string())
            .stdin(Stdio::null())
            .status()
            .map_err(NotifyError::Launch)?;
        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(NotifyError::Exit(code)),
            None => Err(NotifyError::Terminated),
        }
    }
}

/// Tries to deliver a notification up to `attempts` times, waiting `backoff`
/// between failures. Returns the last error once attempts run out; with zero
/// attempts the notifier is never called and `Ok` is returned.
pub fn send(
    notifier: &dyn Notifier,
    arg: WorkerArg,
    attempts: u32,
    backoff: Duration,
) -> Result<(), NotifyError> {
    let secs = arg.at.log_secs();
    let label = arg.event.as_str();
    if attempts == 0 {
        return Ok(());
    }
    let mut attempt = 1;
    loop {
        match notifier.notify(label, secs) {
            Ok(()) => {
                info!("{}: Notification sent ({})", secs, label);
                return Ok(());
            }
            Err(err) => {
                info!(
                    "{}: Notification attempt #{}/{} failed: {}",
                    secs, attempt, attempts, err
                );
                if attempt >= attempts {
                    return Err(err);
                }
            }
        }
        attempt += 1;
        thread::yield_now();
        thread::sleep(backoff);
    }
}

/// Starts a detached notification worker. Its outcome is only logged.
pub fn spawn(
    notifier: Arc<dyn Notifier>,
    arg: WorkerArg,
    attempts: u32,
    backoff: Duration,
) -> io::Result<()> {
    thread::Builder::new()
        .name(format!("notify-{}", arg.event.as_str()))
        .spawn(move || {
            let _ = send(notifier.as_ref(), arg, attempts, backoff);
        })
        .map(drop)
}
