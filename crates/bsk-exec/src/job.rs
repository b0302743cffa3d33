//! In-process jobs: callbacks with private sub-arenas.
//!
//! A job is the thread analogue of a process: the same launch/wait shape,
//! but the unit of work is a callback and there is no success/failure
//! distinction in the terminal state. Every job exclusively owns a
//! sub-arena carved from a parent arena at creation time — carving happens
//! single-threaded, before any thread starts, which is what makes handing
//! unsynchronized arenas to threads sound.

use crate::process::LaunchMode;
use bsk_arena::Arena;
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Lifecycle state of a [`Job`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    NotLaunched,
    Launched,
    Completed,
}

type JobFn = Box<dyn FnOnce(&mut Arena) + Send + 'static>;

/// One unit of in-process work with its own carved-out arena.
///
/// The callback receives only the job's private arena; captured state
/// replaces the opaque data pointer of a C-style job. Nothing the callback
/// can reach is shared with sibling jobs unless the caller shares it
/// explicitly (and then synchronization is the caller's problem).
pub struct Job {
    arena: Option<Arena>,
    task: Option<JobFn>,
    status: JobStatus,
    handle: Option<JoinHandle<Arena>>,
}

impl Job {
    /// Create an inert job, carving `arena_bytes` out of `parent` for its
    /// exclusive use.
    ///
    /// # Panics
    ///
    /// Panics when the parent arena cannot fit the carve.
    #[track_caller]
    pub fn new(
        parent: &mut Arena,
        arena_bytes: usize,
        task: impl FnOnce(&mut Arena) + Send + 'static,
    ) -> Job {
        Job {
            arena: Some(parent.carve(arena_bytes)),
            task: Some(Box::new(task)),
            status: JobStatus::NotLaunched,
            handle: None,
        }
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// The job's arena — available before launch and again after
    /// completion, absent while a background thread owns it.
    pub fn arena(&self) -> Option<&Arena> {
        self.arena.as_ref()
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job").field("status", &self.status).finish()
    }
}

/// Launch every not-yet-launched job in the slice, in index order.
///
/// [`LaunchMode::Foreground`] runs each callback synchronously on the
/// calling thread, leaving the job `Completed`. [`LaunchMode::Background`]
/// spawns exactly one OS thread per job and returns immediately; completion
/// order is then up to the scheduler.
pub fn launch_jobs(jobs: &mut [Job], mode: LaunchMode) {
    for (index, job) in jobs.iter_mut().enumerate() {
        if job.status != JobStatus::NotLaunched {
            continue;
        }
        let task = job.task.take().expect("job not launched twice");
        let mut arena = job.arena.take().expect("job arena present before launch");
        match mode {
            LaunchMode::Foreground => {
                debug!(job = index, "running job inline");
                task(&mut arena);
                job.arena = Some(arena);
                job.status = JobStatus::Completed;
            }
            LaunchMode::Background => {
                debug!(job = index, "launching job thread");
                job.handle = Some(thread::spawn(move || {
                    task(&mut arena);
                    arena
                }));
                job.status = JobStatus::Launched;
            }
        }
    }
}

/// Join every launched job's thread, re-owning its arena.
///
/// A panic inside a background job is resumed here on the waiting thread.
///
/// # Panics
///
/// Panics if the slice contains a job that was never launched.
#[track_caller]
pub fn wait_jobs(jobs: &mut [Job]) {
    for (index, job) in jobs.iter_mut().enumerate() {
        match job.status {
            JobStatus::NotLaunched => {
                panic!("waiting on a job that was never launched");
            }
            JobStatus::Launched => {
                let handle = job.handle.take().expect("launched job has a thread handle");
                match handle.join() {
                    Ok(arena) => {
                        debug!(job = index, "job completed");
                        job.arena = Some(arena);
                        job.status = JobStatus::Completed;
                    }
                    Err(payload) => {
                        job.status = JobStatus::Completed;
                        std::panic::resume_unwind(payload);
                    }
                }
            }
            JobStatus::Completed => {}
        }
    }
}
