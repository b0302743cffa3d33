//! Bidirectional string find.
//!
//! A [`Find`] describes what to look for (exact substring, any character of
//! a set, or a line break) and from which end of the haystack to look. A
//! successful [`Find::apply`] partitions the haystack into three disjoint
//! views — before, match, after — whose concatenation reconstructs it
//! exactly.

use crate::utf8;
use std::ops::Range;

/// Which end of the haystack the search starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    FromStart,
    FromEnd,
}

/// What a [`Find`] matches.
#[derive(Debug, Clone, Copy)]
pub enum Pattern<'p> {
    /// The pattern bytes, exactly. An empty pattern never matches.
    Exact(&'p str),
    /// Any single codepoint of the set. Matching is by decoded codepoint,
    /// not by byte, so a multi-byte set member matches regardless of its
    /// encoded length.
    AnyChar(&'p str),
    /// `\n` or `\r`, with a text-order `\r\n` pair taken as one two-byte
    /// terminator from either search direction. Text-order `\n\r` is two
    /// separate terminators.
    LineBreak,
}

/// A match specification: pattern, direction and end-of-string behavior.
#[derive(Debug, Clone, Copy)]
pub struct Find<'p> {
    pattern: Pattern<'p>,
    direction: Direction,
    always_match_end: bool,
}

impl<'p> Find<'p> {
    pub fn exact(pattern: &'p str) -> Find<'p> {
        Find {
            pattern: Pattern::Exact(pattern),
            direction: Direction::FromStart,
            always_match_end: false,
        }
    }

    pub fn any_char(set: &'p str) -> Find<'p> {
        Find {
            pattern: Pattern::AnyChar(set),
            direction: Direction::FromStart,
            always_match_end: false,
        }
    }

    pub fn line_break() -> Find<'static> {
        Find {
            pattern: Pattern::LineBreak,
            direction: Direction::FromStart,
            always_match_end: false,
        }
    }

    /// Search from the end of the haystack instead of the start.
    pub fn from_end(mut self) -> Find<'p> {
        self.direction = Direction::FromEnd;
        self
    }

    /// For [`Pattern::AnyChar`]: when no set member occurs, return a
    /// zero-length match at the terminal boundary of the scan instead of
    /// failing. This is what lets a tokenizer pick up the final record of
    /// a string that has no trailing delimiter.
    pub fn always_match_end(mut self) -> Find<'p> {
        self.always_match_end = true;
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Run the search, partitioning `haystack` on success.
    pub fn apply<'h>(&self, haystack: &'h str) -> Option<Found<'h>> {
        let bytes = haystack.as_bytes();
        let range = match self.pattern {
            Pattern::Exact(pat) => find_exact(bytes, pat.as_bytes(), self.direction)?,
            Pattern::AnyChar(set) => match find_any_char(bytes, set, self.direction) {
                Some(range) => range,
                None if self.always_match_end => match self.direction {
                    Direction::FromStart => bytes.len()..bytes.len(),
                    Direction::FromEnd => 0..0,
                },
                None => return None,
            },
            Pattern::LineBreak => find_line_break(bytes, self.direction)?,
        };
        Some(Found {
            before: &haystack[..range.start],
            matched: &haystack[range.start..range.end],
            after: &haystack[range.end..],
        })
    }
}

/// Three-way partition produced by a successful find.
///
/// `before`, `matched` and `after` are disjoint subslices of the haystack;
/// concatenated in order they reconstruct it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Found<'h> {
    pub before: &'h str,
    pub matched: &'h str,
    pub after: &'h str,
}

impl Found<'_> {
    /// Byte offset of the match within the haystack.
    pub fn start(&self) -> usize {
        self.before.len()
    }

    /// Byte length of the match.
    pub fn len(&self) -> usize {
        self.matched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }
}

/// Exact substring search: Horspool skip table with first/middle/last byte
/// early rejects, degrading to a plain byte scan for one-byte patterns.
fn find_exact(hay: &[u8], pat: &[u8], direction: Direction) -> Option<Range<usize>> {
    let m = pat.len();
    let n = hay.len();
    if m == 0 || m > n {
        return None;
    }
    if m == 1 {
        let i = match direction {
            Direction::FromStart => hay.iter().position(|&b| b == pat[0])?,
            Direction::FromEnd => hay.iter().rposition(|&b| b == pat[0])?,
        };
        return Some(i..i + 1);
    }

    let (first, mid, last) = (pat[0], pat[m / 2], pat[m - 1]);
    match direction {
        Direction::FromStart => {
            // Skip distance for the byte under the window's last position;
            // later occurrences overwrite earlier ones, so the rightmost
            // occurrence wins.
            let mut skip = [m; 256];
            for (i, &b) in pat[..m - 1].iter().enumerate() {
                skip[b as usize] = m - 1 - i;
            }
            let mut pos = 0;
            while pos + m <= n {
                let window = &hay[pos..pos + m];
                if window[m - 1] == last
                    && window[0] == first
                    && window[m / 2] == mid
                    && window == pat
                {
                    return Some(pos..pos + m);
                }
                pos += skip[hay[pos + m - 1] as usize];
            }
            None
        }
        Direction::FromEnd => {
            // Mirror image: shift on the window's first byte, leftmost
            // occurrence (excluding index 0) wins.
            let mut skip = [m; 256];
            for i in (1..m).rev() {
                skip[pat[i] as usize] = i;
            }
            let mut pos = n - m;
            loop {
                let window = &hay[pos..pos + m];
                if window[0] == first
                    && window[m - 1] == last
                    && window[m / 2] == mid
                    && window == pat
                {
                    return Some(pos..pos + m);
                }
                let shift = skip[hay[pos] as usize];
                if pos < shift {
                    return None;
                }
                pos -= shift;
            }
        }
    }
}

/// Any-of-set search by decoded codepoint, in the requested direction.
fn find_any_char(hay: &[u8], set: &str, direction: Direction) -> Option<Range<usize>> {
    match direction {
        Direction::FromStart => {
            let mut i = 0;
            while i < hay.len() {
                let (c, adv) = utf8::decode_forward(&hay[i..]);
                if let Some(c) = c {
                    if set.chars().any(|s| s == c) {
                        return Some(i..i + adv);
                    }
                }
                i += adv;
            }
            None
        }
        Direction::FromEnd => {
            let mut end = hay.len();
            while end > 0 {
                let (c, adv) = utf8::decode_backward(&hay[..end]);
                if let Some(c) = c {
                    if set.chars().any(|s| s == c) {
                        return Some(end - adv..end);
                    }
                }
                end -= adv;
            }
            None
        }
    }
}

/// Line terminator search; a directional `\r\n` pair is one terminator.
fn find_line_break(hay: &[u8], direction: Direction) -> Option<Range<usize>> {
    let is_break = |b: u8| b == b'\n' || b == b'\r';
    match direction {
        Direction::FromStart => {
            let i = hay.iter().position(|&b| is_break(b))?;
            if hay[i] == b'\r' && hay.get(i + 1) == Some(&b'\n') {
                Some(i..i + 2)
            } else {
                Some(i..i + 1)
            }
        }
        Direction::FromEnd => {
            let i = hay.iter().rposition(|&b| is_break(b))?;
            if hay[i] == b'\n' && i > 0 && hay[i - 1] == b'\r' {
                Some(i - 1..i + 1)
            } else {
                Some(i..i + 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_reconstructs(s: &str, f: &Found<'_>) {
        assert_eq!(f.before.len() + f.matched.len() + f.after.len(), s.len());
        assert_eq!(format!("{}{}{}", f.before, f.matched, f.after), s);
    }

    #[test]
    fn exact_forward_finds_first_occurrence() {
        let s = "p1at4pattern1 pattern2 pattern3p2a.t";
        let f = Find::exact("pattern").apply(s).unwrap();
        assert_eq!(f.start(), 5);
        assert_eq!(f.len(), 7);
        assert_reconstructs(s, &f);
    }

    #[test]
    fn exact_backward_finds_last_occurrence() {
        let s = "p1at4pattern1 pattern2 pattern3p2a.t";
        let f = Find::exact("pattern").from_end().apply(s).unwrap();
        assert_eq!(f.start(), 23);
        assert_eq!(f.len(), 7);
        assert_reconstructs(s, &f);
    }

    #[test]
    fn exact_single_byte_degrades_to_byte_scan() {
        let f = Find::exact(":").apply("a:b:c").unwrap();
        assert_eq!(f.start(), 1);
        let f = Find::exact(":").from_end().apply("a:b:c").unwrap();
        assert_eq!(f.start(), 3);
    }

    #[test]
    fn exact_no_match() {
        assert!(Find::exact("xyz").apply("abcabc").is_none());
        assert!(Find::exact("xyz").from_end().apply("abcabc").is_none());
    }

    #[test]
    fn exact_empty_pattern_never_matches() {
        assert!(Find::exact("").apply("abc").is_none());
    }

    #[test]
    fn exact_pattern_longer_than_haystack() {
        assert!(Find::exact("abcd").apply("abc").is_none());
    }

    #[test]
    fn exact_match_at_boundaries() {
        let f = Find::exact("ab").apply("abxx").unwrap();
        assert_eq!((f.start(), f.len()), (0, 2));
        let f = Find::exact("xx").apply("abxx").unwrap();
        assert_eq!((f.start(), f.len()), (2, 2));
        let f = Find::exact("ab").from_end().apply("abxxab").unwrap();
        assert_eq!(f.start(), 4);
    }

    #[test]
    fn exact_multibyte_pattern_matches_byte_offsets() {
        let s = "中华人民共和国";
        let f = Find::exact("民共和国").apply(s).unwrap();
        assert_eq!(f.start(), 9);
        assert_eq!(f.len(), 12);
        assert_reconstructs(s, &f);
    }

    #[test]
    fn any_char_matches_one_codepoint_of_the_set() {
        let s = "中华人民共和国";
        let f = Find::any_char("民共和国").apply(s).unwrap();
        assert_eq!(f.start(), 9);
        assert_eq!(f.len(), 3);
        assert_eq!(f.matched, "民");
    }

    #[test]
    fn any_char_backward() {
        let f = Find::any_char("aeiou").from_end().apply("hello world").unwrap();
        assert_eq!(f.matched, "o");
        assert_eq!(f.start(), 7);
    }

    #[test]
    fn any_char_set_order_does_not_matter() {
        let f = Find::any_char("ba").apply("xyab").unwrap();
        assert_eq!(f.matched, "a");
    }

    #[test]
    fn any_char_terminal_match() {
        let f = Find::any_char(":").always_match_end().apply("abc").unwrap();
        assert_eq!(f.before, "abc");
        assert!(f.is_empty());
        assert_eq!(f.after, "");

        let f = Find::any_char(":")
            .from_end()
            .always_match_end()
            .apply("abc")
            .unwrap();
        assert_eq!(f.before, "");
        assert!(f.is_empty());
        assert_eq!(f.after, "abc");
    }

    #[test]
    fn any_char_without_terminal_flag_fails() {
        assert!(Find::any_char(":").apply("abc").is_none());
    }

    #[test]
    fn line_break_forward() {
        let f = Find::line_break().apply("one\ntwo").unwrap();
        assert_eq!((f.start(), f.len()), (3, 1));
        let f = Find::line_break().apply("one\r\ntwo").unwrap();
        assert_eq!((f.start(), f.len()), (3, 2));
        // A lone \r is a one-byte terminator.
        let f = Find::line_break().apply("one\rtwo").unwrap();
        assert_eq!((f.start(), f.len()), (3, 1));
        // \n\r is two separate terminators; forward sees the \n first.
        let f = Find::line_break().apply("one\n\rtwo").unwrap();
        assert_eq!((f.start(), f.len()), (3, 1));
    }

    #[test]
    fn line_break_backward() {
        let f = Find::line_break().from_end().apply("one\ntwo\r\nx").unwrap();
        assert_eq!((f.start(), f.len()), (7, 2));
        let f = Find::line_break().from_end().apply("a\n\rb").unwrap();
        assert_eq!((f.start(), f.len()), (2, 1));
    }

    #[test]
    fn line_break_no_match() {
        assert!(Find::line_break().apply("no breaks here").is_none());
    }
}
