//! Process and job orchestration for build scripts.
//!
//! This crate is the OS-facing layer of the toolkit:
//! - [`process`] — spawn, redirect, wait for and kill one-or-many external
//!   processes, with partial-failure aggregation across a batch
//! - [`job`] — the in-process analogue: run a callback inline or on a
//!   dedicated thread, each with its own carved-out sub-arena
//! - [`fs`] — recursive directory walking
//! - [`logging`] — opt-in `tracing` subscriber setup
//!
//! Environmental failures (spawn errors, non-zero exits, unreadable
//! redirect targets) come back as statuses and [`ExecError`] values; caller
//! bugs (waiting on a process that was never launched, malformed
//! environment tokens) panic.

pub mod error;
pub mod fs;
pub mod job;
pub mod logging;
pub mod platform;
pub mod process;

pub use error::{BatchSummary, ExecError, Result};
pub use job::{launch_jobs, wait_jobs, Job, JobStatus};
pub use process::{
    kill, launch, wait, LaunchMode, Process, ProcessSpec, ProcessStatus, Redirect,
};
