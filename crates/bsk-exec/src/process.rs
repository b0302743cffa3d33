//! External process orchestration: spawn, redirect, wait, kill.
//!
//! Every process walks a strict state machine:
//!
//! ```text
//! NotLaunched --launch--> Launched --wait|kill--> CompletedSuccess
//!                                                 CompletedFailed
//! ```
//!
//! Batch operations process their input slice in index order and never let
//! one element's failure stop the rest; the returned [`BatchSummary`] says
//! whether every element reached its expected state. Waiting on or killing
//! a process that was never launched is a caller bug and panics.

use crate::error::{BatchSummary, ExecError};
use crate::platform::ExecPlatform;
use bsk_text::platform::Native;
use bsk_text::{tokens, Find};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use tracing::{debug, warn};

/// Where a child's output stream goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Redirect {
    /// Inherit the parent's stream.
    #[default]
    Inherit,
    /// Discard into the platform null device.
    Null,
    /// Truncate and write the given file.
    File(PathBuf),
}

impl Redirect {
    /// The filesystem target this redirect opens, if any.
    fn target(&self) -> Option<&Path> {
        match self {
            Redirect::Inherit => None,
            Redirect::Null => Some(Path::new(Native::NULL_DEVICE)),
            Redirect::File(path) => Some(path),
        }
    }
}

/// Launch-time options for one process.
#[derive(Debug, Clone, Default)]
pub struct ProcessSpec {
    pub stdout: Redirect,
    pub stderr: Redirect,
    /// Space-separated `KEY=VALUE` tokens overlaid on the inherited
    /// environment. Same-name keys override; everything else passes
    /// through. A token without `=` is a contract violation.
    pub extra_env: Option<String>,
}

/// Lifecycle state of a [`Process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    NotLaunched,
    Launched,
    CompletedSuccess,
    CompletedFailed,
}

impl ProcessStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ProcessStatus::CompletedSuccess | ProcessStatus::CompletedFailed
        )
    }
}

/// Synchronous or asynchronous batch launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Wait for each process right after spawning it, in array order.
    Foreground,
    /// Spawn everything, wait later.
    Background,
}

/// One external process: a command string, its spec, and its state.
#[derive(Debug)]
pub struct Process {
    command: String,
    spec: ProcessSpec,
    status: ProcessStatus,
    child: Option<Child>,
    error: Option<ExecError>,
}

impl Process {
    /// An inert process for `command`. The command string is split into an
    /// argument vector at launch by treating runs of spaces as separators;
    /// there is no quoting.
    pub fn new(command: impl Into<String>) -> Process {
        Process::with_spec(command, ProcessSpec::default())
    }

    pub fn with_spec(command: impl Into<String>, spec: ProcessSpec) -> Process {
        Process {
            command: command.into(),
            spec,
            status: ProcessStatus::NotLaunched,
            child: None,
            error: None,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn status(&self) -> ProcessStatus {
        self.status
    }

    /// The environmental failure behind a `CompletedFailed` status, when
    /// the failure happened on our side of the exec boundary.
    pub fn error(&self) -> Option<&ExecError> {
        self.error.as_ref()
    }

    /// OS process id while launched.
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    #[track_caller]
    fn spawn(&mut self) {
        debug_assert_eq!(self.status, ProcessStatus::NotLaunched);
        let argv = split_command(&self.command);
        let mut cmd = Command::new(argv[0]);
        cmd.args(&argv[1..]);
        if let Some(extra) = &self.spec.extra_env {
            // `Command` inherits the parent environment by default, so an
            // `env` call per token is exactly the overlay semantics.
            for (key, value) in split_env(extra) {
                cmd.env(key, value);
            }
        }
        match resolve_redirects(&self.spec) {
            Ok((stdout, stderr)) => {
                cmd.stdout(stdout);
                cmd.stderr(stderr);
            }
            Err(err) => {
                warn!(command = %self.command, error = %err, "redirect resolution failed");
                self.error = Some(err);
                self.status = ProcessStatus::CompletedFailed;
                return;
            }
        }
        match cmd.spawn() {
            Ok(child) => {
                debug!(command = %self.command, pid = child.id(), "spawned");
                self.child = Some(child);
                self.status = ProcessStatus::Launched;
            }
            Err(source) => {
                warn!(command = %self.command, error = %source, "spawn failed");
                self.error = Some(ExecError::Spawn {
                    command: self.command.clone(),
                    source,
                });
                self.status = ProcessStatus::CompletedFailed;
            }
        }
    }

    fn wait_one(&mut self) {
        debug_assert_eq!(self.status, ProcessStatus::Launched);
        let mut child = self
            .child
            .take()
            .expect("launched process has a child handle");
        match child.wait() {
            // Success is exactly exit code zero; every other exit,
            // including death by signal, is a failure.
            Ok(status) if status.success() => {
                debug!(command = %self.command, "completed");
                self.status = ProcessStatus::CompletedSuccess;
            }
            Ok(status) => {
                debug!(command = %self.command, %status, "completed with failure");
                self.status = ProcessStatus::CompletedFailed;
            }
            Err(source) => {
                warn!(command = %self.command, error = %source, "wait failed");
                self.error = Some(ExecError::Wait {
                    command: self.command.clone(),
                    source,
                });
                self.status = ProcessStatus::CompletedFailed;
            }
        }
    }
}

/// Split a command string into its argument vector.
///
/// # Panics
///
/// Panics on an empty (or all-spaces) command string.
#[track_caller]
fn split_command(command: &str) -> Vec<&str> {
    let argv = tokens(command, " ");
    assert!(!argv.is_empty(), "empty command string");
    argv
}

/// Split a space-separated `KEY=VALUE` block.
///
/// # Panics
///
/// Panics on a token without `=` or with an empty key.
#[track_caller]
fn split_env(extra: &str) -> Vec<(&str, &str)> {
    tokens(extra, " ")
        .into_iter()
        .map(|token| {
            let found = Find::exact("=")
                .apply(token)
                .unwrap_or_else(|| panic!("malformed environment token `{token}`: missing `=`"));
            assert!(
                !found.before.is_empty(),
                "malformed environment token `{token}`: empty key"
            );
            (found.before, found.after)
        })
        .collect()
}

fn open_redirect(path: &Path) -> Result<File, ExecError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|source| ExecError::Redirect {
            path: path.to_path_buf(),
            source,
        })
}

/// Resolve the spec's redirects into handles for the spawn call.
///
/// When both streams point at the identical target the file is opened once
/// and the handle duplicated, never opened twice.
fn resolve_redirects(spec: &ProcessSpec) -> Result<(Stdio, Stdio), ExecError> {
    match (spec.stdout.target(), spec.stderr.target()) {
        (Some(out), Some(err)) if out == err => {
            let file = open_redirect(out)?;
            let dup = file.try_clone().map_err(|source| ExecError::Redirect {
                path: out.to_path_buf(),
                source,
            })?;
            debug!(path = %out.display(), "sharing one handle for stdout and stderr");
            Ok((Stdio::from(file), Stdio::from(dup)))
        }
        (out, err) => {
            let stdout = match out {
                Some(path) => Stdio::from(open_redirect(path)?),
                None => Stdio::inherit(),
            };
            let stderr = match err {
                Some(path) => Stdio::from(open_redirect(path)?),
                None => Stdio::inherit(),
            };
            Ok((stdout, stderr))
        }
    }
}

/// Launch every not-yet-launched process in the slice, in index order.
///
/// A spawn failure marks that element `CompletedFailed` and moves on. In
/// [`LaunchMode::Foreground`] each successfully spawned process is waited
/// for before the next entry is touched. The summary counts an element as
/// succeeded when it reached the mode-appropriate status: `Launched` for
/// background, `CompletedSuccess` for foreground.
#[track_caller]
pub fn launch(processes: &mut [Process], mode: LaunchMode) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for process in processes.iter_mut() {
        if process.status != ProcessStatus::NotLaunched {
            continue;
        }
        process.spawn();
        if mode == LaunchMode::Foreground && process.status == ProcessStatus::Launched {
            process.wait_one();
        }
        let expected = match mode {
            LaunchMode::Background => process.status == ProcessStatus::Launched,
            LaunchMode::Foreground => process.status == ProcessStatus::CompletedSuccess,
        };
        summary.record(expected);
    }
    summary
}

/// Block until every launched process in the slice completes.
///
/// Already-terminal entries are left untouched but still count toward the
/// aggregate, so a batch with any failed element reports failure.
///
/// # Panics
///
/// Panics if the slice contains a process that was never launched.
#[track_caller]
pub fn wait(processes: &mut [Process]) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for process in processes.iter_mut() {
        match process.status {
            ProcessStatus::NotLaunched => {
                panic!(
                    "waiting on a process that was never launched: `{}`",
                    process.command
                );
            }
            ProcessStatus::Launched => process.wait_one(),
            ProcessStatus::CompletedSuccess | ProcessStatus::CompletedFailed => {}
        }
        summary.record(process.status == ProcessStatus::CompletedSuccess);
    }
    summary
}

/// Forcefully terminate every launched process in the slice.
///
/// There is no graceful-shutdown signal and killing is never a success
/// outcome: each killed process ends `CompletedFailed`. The summary counts
/// kill delivery, not process success. Already-terminal entries are left
/// untouched; a failed delivery leaves the entry `Launched` with its handle
/// intact so it can still be waited on or killed again.
///
/// # Panics
///
/// Panics if the slice contains a process that was never launched.
#[track_caller]
pub fn kill(processes: &mut [Process]) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for process in processes.iter_mut() {
        match process.status {
            ProcessStatus::NotLaunched => {
                panic!(
                    "killing a process that was never launched: `{}`",
                    process.command
                );
            }
            ProcessStatus::Launched => {
                let child = process
                    .child
                    .as_mut()
                    .expect("launched process has a child handle");
                match child.kill() {
                    Ok(()) => {
                        // Reap so the child doesn't linger as a zombie.
                        let _ = child.wait();
                        process.child = None;
                        process.status = ProcessStatus::CompletedFailed;
                        debug!(command = %process.command, "killed");
                        summary.record(true);
                    }
                    Err(source) => {
                        // The child may still be running; keep the handle
                        // and the `Launched` status so the caller can wait
                        // on it or kill it again.
                        warn!(command = %process.command, error = %source, "kill failed");
                        process.error = Some(ExecError::Io(source));
                        summary.record(false);
                    }
                }
            }
            ProcessStatus::CompletedSuccess | ProcessStatus::CompletedFailed => {}
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_command_tokenizes_on_spaces() {
        assert_eq!(split_command("cc -c main.c"), vec!["cc", "-c", "main.c"]);
        assert_eq!(split_command("  cc   -O2  "), vec!["cc", "-O2"]);
    }

    #[test]
    #[should_panic(expected = "empty command")]
    fn empty_command_panics() {
        split_command("   ");
    }

    #[test]
    fn split_env_tokenizes_pairs() {
        assert_eq!(
            split_env("CC=clang LANG=C"),
            vec![("CC", "clang"), ("LANG", "C")]
        );
        // The value may itself contain `=`; only the first one splits.
        assert_eq!(split_env("FLAGS=-Dx=1"), vec![("FLAGS", "-Dx=1")]);
    }

    #[test]
    #[should_panic(expected = "missing `=`")]
    fn env_token_without_equals_panics() {
        split_env("CC clang");
    }

    #[test]
    #[should_panic(expected = "empty key")]
    fn env_token_with_empty_key_panics() {
        split_env("=value");
    }

    #[test]
    fn new_process_is_inert() {
        let p = Process::new("cc -c main.c");
        assert_eq!(p.status(), ProcessStatus::NotLaunched);
        assert!(p.id().is_none());
        assert!(p.error().is_none());
    }

    #[test]
    fn redirect_targets() {
        assert!(Redirect::Inherit.target().is_none());
        assert_eq!(
            Redirect::Null.target(),
            Some(Path::new(Native::NULL_DEVICE))
        );
        assert_eq!(
            Redirect::File(PathBuf::from("out.log")).target(),
            Some(Path::new("out.log"))
        );
    }

    #[test]
    #[should_panic(expected = "never launched")]
    fn waiting_on_not_launched_panics() {
        let mut procs = [Process::new("true")];
        wait(&mut procs);
    }

    #[test]
    #[should_panic(expected = "never launched")]
    fn killing_not_launched_panics() {
        let mut procs = [Process::new("true")];
        kill(&mut procs);
    }

    #[test]
    #[cfg(unix)]
    fn failed_kill_keeps_the_handle_and_status() {
        let mut procs = [Process::new("true")];
        assert!(launch(&mut procs, LaunchMode::Background).ok());
        // Reap the child directly so the signal delivery below fails.
        procs[0]
            .child
            .as_mut()
            .expect("launched")
            .wait()
            .expect("reap");
        let summary = kill(&mut procs);
        assert!(!summary.ok());
        assert_eq!(procs[0].status(), ProcessStatus::Launched);
        assert!(procs[0].child.is_some());
        assert!(matches!(procs[0].error(), Some(ExecError::Io(_))));
    }

    #[test]
    fn status_terminality() {
        assert!(!ProcessStatus::NotLaunched.is_terminal());
        assert!(!ProcessStatus::Launched.is_terminal());
        assert!(ProcessStatus::CompletedSuccess.is_terminal());
        assert!(ProcessStatus::CompletedFailed.is_terminal());
    }
}
