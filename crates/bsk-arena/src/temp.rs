//! Scoped checkpoints: temp memory that rolls back on drop.

use crate::Arena;
use std::ops::Deref;

impl Arena {
    /// Open a scoped checkpoint.
    ///
    /// While the scope is alive the arena binding is mutably borrowed, so
    /// every allocation has to flow through the returned guard (it derefs to
    /// [`Arena`]). Dropping the guard rolls the cursor back to where it was
    /// at the call, reclaiming everything allocated inside the scope without
    /// per-allocation bookkeeping. Views handed out inside the scope cannot
    /// outlive it; the borrow checker rejects the attempt.
    pub fn begin_temp(&mut self) -> TempScope<'_> {
        let depth = self.temp_depth.get() + 1;
        self.temp_depth.set(depth);
        TempScope {
            saved_used: self.used.get(),
            depth,
            arena: self,
        }
    }
}

/// RAII restore point for an [`Arena`]'s cursor.
///
/// Scopes nest: [`TempScope::begin_temp`] opens an inner scope that must be
/// dropped before the outer one is touched again. The out-of-order-end
/// hazard of a manual begin/end pair is unconstructible here; the depth
/// counter is kept as a cross-check on that reasoning.
pub struct TempScope<'a> {
    arena: &'a Arena,
    saved_used: usize,
    depth: u32,
}

impl TempScope<'_> {
    /// Open a nested checkpoint inside this one.
    pub fn begin_temp(&mut self) -> TempScope<'_> {
        let depth = self.arena.temp_depth.get() + 1;
        self.arena.temp_depth.set(depth);
        TempScope {
            saved_used: self.arena.used.get(),
            depth,
            arena: self.arena,
        }
    }

    /// The arena this scope checkpoints.
    pub fn arena(&self) -> &Arena {
        self.arena
    }
}

impl Deref for TempScope<'_> {
    type Target = Arena;

    fn deref(&self) -> &Arena {
        self.arena
    }
}

impl Drop for TempScope<'_> {
    fn drop(&mut self) {
        debug_assert_eq!(
            self.arena.temp_depth.get(),
            self.depth,
            "temp scopes dropped out of nesting order"
        );
        debug_assert!(
            !self.arena.str_locked.get(),
            "temp scope dropped while a string builder is open"
        );
        self.arena.used.set(self.saved_used);
        self.arena.temp_depth.set(self.depth - 1);
    }
}
