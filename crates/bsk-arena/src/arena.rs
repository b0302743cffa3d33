//! Bump arena over a single owned memory region.

use std::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};
use std::cell::Cell;
use std::ptr::NonNull;
use std::sync::Arc;

/// Alignment of the backing region and of carved child arenas.
const REGION_ALIGN: usize = 16;

/// Heap region shared by an arena and every child carved from it.
///
/// The region is released when the last arena referencing it is dropped.
struct Region {
    ptr: NonNull<u8>,
    layout: Layout,
}

// The raw pointer is only ever dereferenced through an `Arena`, and each
// arena owns a disjoint sub-range of the region.
unsafe impl Send for Region {}
unsafe impl Sync for Region {}

impl Drop for Region {
    fn drop(&mut self) {
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

/// A bump allocator drawing from one pre-reserved memory region.
///
/// An `Arena` hands out zero-initialized blocks by advancing a cursor; the
/// only ways to move the cursor backward are dropping a [`TempScope`]
/// obtained from [`Arena::begin_temp`] or abandoning an unfinished
/// [`StrBuilder`]. Carving a child arena permanently claims a slice of the
/// parent's region.
///
/// An arena has no internal synchronization. It is `Send` (a job may own
/// one) but not `Sync`; sharing one arena between threads is a caller error
/// the type system rejects.
///
/// [`TempScope`]: crate::TempScope
/// [`StrBuilder`]: crate::StrBuilder
pub struct Arena {
    region: Arc<Region>,
    /// Offset of this arena's range within the backing region.
    base: usize,
    size: usize,
    pub(crate) used: Cell<usize>,
    pub(crate) temp_depth: Cell<u32>,
    pub(crate) str_locked: Cell<bool>,
}

impl Arena {
    /// Reserve a region of `size` bytes and create an arena over all of it.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero or the reservation fails.
    pub fn with_capacity(size: usize) -> Arena {
        assert!(size > 0, "arena capacity must be non-zero");
        let layout = Layout::from_size_align(size, REGION_ALIGN)
            .unwrap_or_else(|_| panic!("arena capacity {size} is not a valid allocation size"));
        let ptr = unsafe { alloc_zeroed(layout) };
        let ptr = match NonNull::new(ptr) {
            Some(p) => p,
            None => handle_alloc_error(layout),
        };
        Arena {
            region: Arc::new(Region { ptr, layout }),
            base: 0,
            size,
            used: Cell::new(0),
            temp_depth: Cell::new(0),
            str_locked: Cell::new(false),
        }
    }

    /// Bytes allocated so far (including alignment padding).
    pub fn used(&self) -> usize {
        self.used.get()
    }

    /// Total capacity of this arena's range.
    pub fn capacity(&self) -> usize {
        self.size
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.size - self.used.get()
    }

    /// Current nesting depth of open temp scopes.
    pub fn temp_depth(&self) -> u32 {
        self.temp_depth.get()
    }

    pub(crate) fn base_ptr(&self) -> *mut u8 {
        unsafe { self.region.ptr.as_ptr().add(self.base) }
    }

    /// Allocate a zero-filled block of `len` bytes aligned to `align`.
    ///
    /// # Panics
    ///
    /// Panics when the arena has insufficient remaining space, when `align`
    /// is not a power of two, or when a string builder is open on this
    /// arena. All are caller bugs, not environmental conditions.
    #[track_caller]
    pub fn alloc_bytes(&self, len: usize, align: usize) -> &mut [u8] {
        assert!(align.is_power_of_two(), "alignment {align} is not a power of two");
        assert!(
            !self.str_locked.get(),
            "arena allocation while a string builder is open"
        );
        let used = self.used.get();
        // Padding is computed from the block's actual address, not the bump
        // offset: the region itself is only REGION_ALIGN-aligned, so offset
        // arithmetic alone cannot satisfy larger alignments.
        let addr = self.base_ptr() as usize + used;
        let pad = addr.wrapping_neg() & (align - 1);
        let start = used + pad;
        let end = start
            .checked_add(len)
            .unwrap_or_else(|| panic!("arena allocation of {len} bytes overflows the cursor"));
        assert!(
            end <= self.size,
            "arena out of capacity: need {} bytes, {} remaining",
            len + pad,
            self.size - used
        );
        self.used.set(end);
        // SAFETY: [start, end) lies within this arena's exclusive range of
        // the region, and the bump cursor never hands the same range out
        // twice. Rolling the cursor back requires `&mut Arena` (via
        // `begin_temp`), so no borrow of a rolled-back block can survive.
        unsafe {
            let ptr = self.base_ptr().add(start);
            std::ptr::write_bytes(ptr, 0, len);
            std::slice::from_raw_parts_mut(ptr, len)
        }
    }

    /// Copy `bytes` into the arena.
    #[track_caller]
    pub fn alloc_copy(&self, bytes: &[u8]) -> &[u8] {
        let block = self.alloc_bytes(bytes.len(), 1);
        block.copy_from_slice(bytes);
        block
    }

    /// Copy `s` into the arena, returning a view over the copied bytes.
    #[track_caller]
    pub fn alloc_str(&self, s: &str) -> &str {
        let block = self.alloc_copy(s.as_bytes());
        // SAFETY: `block` is a byte-for-byte copy of a valid `&str`.
        unsafe { std::str::from_utf8_unchecked(block) }
    }

    /// Carve a child arena of `size` bytes out of this arena.
    ///
    /// This is an allocation, not a borrow: the parent's cursor permanently
    /// advances past the child's full range, and the child becomes an
    /// independent arena with its own cursor, temp depth and string lock.
    /// The backing region stays alive until both are dropped, so a child may
    /// be moved to another thread (each job gets one this way).
    ///
    /// # Panics
    ///
    /// Panics when the parent lacks `size` remaining bytes.
    #[track_caller]
    pub fn carve(&mut self, size: usize) -> Arena {
        assert!(size > 0, "carved arena capacity must be non-zero");
        let used = self.used.get();
        let addr = self.base_ptr() as usize + used;
        let pad = addr.wrapping_neg() & (REGION_ALIGN - 1);
        let start = used + pad;
        let end = start
            .checked_add(size)
            .unwrap_or_else(|| panic!("carving {size} bytes overflows the cursor"));
        assert!(
            end <= self.size,
            "arena out of capacity: carving {} bytes, {} remaining",
            size,
            self.size - used
        );
        self.used.set(end);
        Arena {
            region: Arc::clone(&self.region),
            base: self.base + start,
            size,
            used: Cell::new(0),
            temp_depth: Cell::new(0),
            str_locked: Cell::new(false),
        }
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.size)
            .field("used", &self.used.get())
            .field("temp_depth", &self.temp_depth.get())
            .finish()
    }
}
