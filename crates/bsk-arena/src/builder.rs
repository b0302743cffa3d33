//! Growing string built in place at the arena's free pointer.

use crate::Arena;
use std::ffi::CStr;
use std::fmt;

impl Arena {
    /// Begin building a string at the current free pointer.
    ///
    /// The arena is locked while the builder is alive: any ordinary
    /// allocation would interleave foreign bytes into the growing string,
    /// so it panics instead. [`StrBuilder::finish`] unlocks; dropping an
    /// unfinished builder unlocks and rolls the cursor back to the
    /// builder's start.
    ///
    /// # Panics
    ///
    /// Panics if a builder is already open on this arena.
    #[track_caller]
    pub fn begin_str(&self) -> StrBuilder<'_> {
        assert!(
            !self.str_locked.get(),
            "a string builder is already open on this arena"
        );
        self.str_locked.set(true);
        StrBuilder {
            start: self.used.get(),
            len: 0,
            arena: self,
        }
    }
}

/// In-place string builder; see [`Arena::begin_str`].
///
/// Segments are rendered directly into the arena's free bytes, extending
/// the string contiguously. Formatted segments go through `fmt::Write`, so
/// `write!(builder, ...)` works. The finished view stays valid for the
/// arena's lifetime; a single NUL byte is placed after the content so the
/// result can double as a C string via [`StrBuilder::finish_cstr`].
pub struct StrBuilder<'a> {
    arena: &'a Arena,
    start: usize,
    len: usize,
}

impl<'a> StrBuilder<'a> {
    /// Content length so far, in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The content built so far.
    pub fn as_str(&self) -> &str {
        // SAFETY: [start, start + len) was filled exclusively from `&str`
        // and `char` data by `push_bytes` callers.
        unsafe {
            std::str::from_utf8_unchecked(std::slice::from_raw_parts(
                self.arena.base_ptr().add(self.start),
                self.len,
            ))
        }
    }

    #[track_caller]
    fn push_bytes(&mut self, bytes: &[u8]) {
        debug_assert_eq!(
            self.arena.used.get(),
            self.start + self.len,
            "arena cursor moved while a string builder was open"
        );
        let at = self.start + self.len;
        let end = at
            .checked_add(bytes.len())
            .unwrap_or_else(|| panic!("string segment of {} bytes overflows the cursor", bytes.len()));
        assert!(
            end <= self.arena.capacity(),
            "arena out of capacity while growing a string: need {} bytes, {} remaining",
            bytes.len(),
            self.arena.capacity() - at
        );
        // SAFETY: the lock flag keeps all other allocation off this arena,
        // so [at, end) is untouched free space directly after the string.
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), self.arena.base_ptr().add(at), bytes.len());
        }
        self.len += bytes.len();
        self.arena.used.set(end);
    }

    /// Append a literal segment.
    #[track_caller]
    pub fn push_str(&mut self, s: &str) {
        self.push_bytes(s.as_bytes());
    }

    /// Append a single character.
    #[track_caller]
    pub fn push_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.push_bytes(c.encode_utf8(&mut buf).as_bytes());
    }

    /// Append a formatted segment, rendered directly into the arena.
    #[track_caller]
    pub fn push_fmt(&mut self, args: fmt::Arguments<'_>) {
        fmt::Write::write_fmt(self, args).expect("a Display impl returned an error");
    }

    fn finish_raw(mut self) -> (&'a Arena, usize, usize) {
        self.push_bytes(&[0]);
        let (arena, start, len) = (self.arena, self.start, self.len - 1);
        arena.str_locked.set(false);
        std::mem::forget(self);
        (arena, start, len)
    }

    /// Unlock the arena and return the finalized view.
    ///
    /// The NUL terminator sits just past the returned content and is not
    /// part of its length.
    pub fn finish(self) -> &'a str {
        let (arena, start, len) = self.finish_raw();
        // SAFETY: same invariant as `as_str`; the trailing NUL is excluded.
        unsafe {
            std::str::from_utf8_unchecked(std::slice::from_raw_parts(
                arena.base_ptr().add(start),
                len,
            ))
        }
    }

    /// Like [`finish`](Self::finish), but expose the NUL-terminated form.
    ///
    /// # Panics
    ///
    /// Panics if an appended segment contained an interior NUL byte.
    pub fn finish_cstr(self) -> &'a CStr {
        let (arena, start, len) = self.finish_raw();
        let bytes =
            unsafe { std::slice::from_raw_parts(arena.base_ptr().add(start), len + 1) };
        CStr::from_bytes_with_nul(bytes).expect("string contains an interior NUL byte")
    }
}

impl Drop for StrBuilder<'_> {
    fn drop(&mut self) {
        // Abandoned build: reclaim the partial string and unlock.
        self.arena.used.set(self.start);
        self.arena.str_locked.set(false);
    }
}

impl fmt::Write for StrBuilder<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl fmt::Debug for StrBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrBuilder").field("len", &self.len).finish()
    }
}

/// Join string views with a separator, allocating the result in `arena`.
pub fn join<'a, I, S>(arena: &'a Arena, parts: I, sep: &str) -> &'a str
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut b = arena.begin_str();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            b.push_str(sep);
        }
        b.push_str(part.as_ref());
    }
    b.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn segments_concatenate() {
        let arena = Arena::with_capacity(1024);
        let mut b = arena.begin_str();
        b.push_str("a");
        b.push_str("b");
        b.push_str("c");
        assert_eq!(b.len(), 3);
        assert_eq!(b.finish(), "abc");
    }

    #[test]
    fn finish_places_nul_after_content() {
        let arena = Arena::with_capacity(1024);
        let mut b = arena.begin_str();
        b.push_str("abc");
        let c = b.finish_cstr();
        assert_eq!(c.to_bytes(), b"abc");
        assert_eq!(c.to_bytes_with_nul(), b"abc\0");
    }

    #[test]
    fn formatted_segments_render_in_place() {
        let arena = Arena::with_capacity(1024);
        let mut b = arena.begin_str();
        b.push_str("-o ");
        write!(b, "{}/{}", "out", 42).unwrap();
        assert_eq!(b.finish(), "-o out/42");
    }

    #[test]
    fn finished_string_survives_later_allocation() {
        let arena = Arena::with_capacity(1024);
        let mut b = arena.begin_str();
        b.push_str("keep");
        let s = b.finish();
        arena.alloc_str("other");
        assert_eq!(s, "keep");
    }

    #[test]
    #[should_panic(expected = "string builder is open")]
    fn alloc_while_locked_panics() {
        let arena = Arena::with_capacity(1024);
        let _b = arena.begin_str();
        arena.alloc_bytes(1, 1);
    }

    #[test]
    #[should_panic(expected = "already open")]
    fn second_builder_panics() {
        let arena = Arena::with_capacity(1024);
        let _a = arena.begin_str();
        let _b = arena.begin_str();
    }

    #[test]
    fn dropped_builder_rolls_back_and_unlocks() {
        let arena = Arena::with_capacity(1024);
        let used_before = arena.used();
        {
            let mut b = arena.begin_str();
            b.push_str("abandoned");
        }
        assert_eq!(arena.used(), used_before);
        let s = arena.alloc_str("fine");
        assert_eq!(s, "fine");
    }

    #[test]
    fn join_views() {
        let arena = Arena::with_capacity(1024);
        assert_eq!(join(&arena, ["a", "b", "c"], ", "), "a, b, c");
        assert_eq!(join(&arena, ["solo"], "/"), "solo");
        assert_eq!(join(&arena, std::iter::empty::<&str>(), "/"), "");
    }
}
