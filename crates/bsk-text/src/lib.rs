//! String find/scan engine and path iteration for build scripts.
//!
//! Everything here is a pure function over borrowed string views:
//! - [`find`] — bidirectional exact / any-character / line-break matching,
//!   returning a three-way before/match/after partition
//! - [`utf8`] — forward and backward UTF-8 decoding over raw bytes
//! - [`scan`] — a scanner that repeatedly advances the partition to
//!   tokenize a string into records
//! - [`path`] — path component iteration and the operations built on it
//! - [`platform`] — the separator convention trait with its two impls
//!
//! Path operations that synthesize new strings allocate through a
//! [`bsk_arena::Arena`]; nothing else allocates at all.

pub mod find;
pub mod path;
pub mod platform;
pub mod scan;
pub mod utf8;

pub use find::{Direction, Find, Found, Pattern};
pub use scan::{tokens, Scanner};
