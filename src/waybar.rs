//! [`BarControl`] implementation that signals the bar process directly.
//!
//! waybar toggles its visibility on `SIGUSR1`.  Matching processes are
//! found by scanning `/proc/<pid>/comm`, the same name `pkill` matches
//! against, so no child process is spawned.

use crate::traits::BarControl;
use log::debug;
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::path::{Path, PathBuf};

/// The kernel truncates `comm` to 15 bytes.
const COMM_LEN: usize = 15;

/// Toggles the bar by sending it a signal.
#[derive(Debug, Clone)]
pub struct SignalBar {
    process_name: String,
    signal: Signal,
    proc_root: PathBuf,
}

/// Errors produced while locating or signalling the bar.
#[derive(Debug, thiserror::Error)]
pub enum BarError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("signal error: {0}")]
    Signal(#[from] nix::Error),
    #[error("no process named {0:?} is running")]
    NotRunning(String),
}

impl SignalBar {
    /// Signal every process called `process_name` with `SIGUSR1`.
    pub fn new(process_name: impl Into<String>) -> Self {
        Self {
            process_name: process_name.into(),
            signal: Signal::SIGUSR1,
            proc_root: PathBuf::from("/proc"),
        }
    }

    /// Scan `proc_root` instead of `/proc`.
    pub fn with_proc_root(mut self, root: impl AsRef<Path>) -> Self {
        self.proc_root = root.as_ref().to_path_buf();
        self
    }

    /// PIDs of all processes whose `comm` matches the bar's name.
    pub fn pids(&self) -> Result<Vec<Pid>, BarError> {
        let mut pids = Vec::new();
        for entry in std::fs::read_dir(&self.proc_root)? {
            let entry = entry?;
            let Some(pid) = entry
                .file_name()
                .to_str()
                .and_then(|s| s.parse::<i32>().ok())
            else {
                continue;
            };
            // Processes may exit while we scan.
            let Ok(comm) = std::fs::read_to_string(entry.path().join("comm")) else {
                continue;
            };
            if comm_matches(comm.trim_end_matches('\n'), &self.process_name) {
                pids.push(Pid::from_raw(pid));
            }
        }
        Ok(pids)
    }
}

/// Whether a `comm` value names `process_name`, accounting for the
/// kernel's truncation of long names.
fn comm_matches(comm: &str, process_name: &str) -> bool {
    let (comm, name) = (comm.as_bytes(), process_name.as_bytes());
    comm == name || (name.len() > COMM_LEN && comm == &name[..COMM_LEN])
}

impl BarControl for SignalBar {
    type Error = BarError;

    fn is_running(&self) -> Result<bool, BarError> {
        Ok(!self.pids()?.is_empty())
    }

    fn toggle(&self) -> Result<(), BarError> {
        let pids = self.pids()?;
        if pids.is_empty() {
            return Err(BarError::NotRunning(self.process_name.clone()));
        }
        for pid in pids {
            match kill(pid, self.signal) {
                Ok(()) => debug!("sent {} to {} ({})", self.signal, self.process_name, pid),
                // Exited between scan and signal.
                Err(Errno::ESRCH) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
