//! Arena memory for build scripts.
//!
//! This crate provides the transient memory model the rest of the toolkit
//! allocates through:
//! - A bump [`Arena`] over one owned memory region
//! - Scoped checkpoints ([`TempScope`]) that roll the cursor back on drop
//! - An in-place growing-string builder ([`StrBuilder`])
//!
//! Arenas are deliberately dumb: allocation only moves a cursor forward,
//! nothing is freed individually, and the whole region is released when the
//! last arena sharing it is dropped. Caller bugs (exhaustion, allocating
//! while a string builder is open, mismatched checkpoint nesting) are
//! contract violations and panic with the caller's location; they are never
//! surfaced as recoverable errors.

pub mod arena;
pub mod builder;
pub mod temp;

pub use arena::Arena;
pub use builder::{join, StrBuilder};
pub use temp::TempScope;
