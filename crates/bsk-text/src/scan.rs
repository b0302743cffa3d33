//! Scanner: repeated finds that tokenize a string into records.

use crate::find::{Direction, Find};

/// Advances a [`Find`] partition across one original string.
///
/// Each successful [`step`](Scanner::step) re-runs the find against the
/// region left open by the previous match — the after-region when searching
/// from the start, the before-region when searching from the end — and then
/// re-slices all views relative to the *original* string, so byte offsets
/// stay globally meaningful.
#[derive(Debug, Clone)]
pub struct Scanner<'h> {
    original: &'h str,
    match_start: usize,
    match_end: usize,
    between: (usize, usize),
    match_count: usize,
}

impl<'h> Scanner<'h> {
    pub fn new(original: &'h str) -> Scanner<'h> {
        Scanner {
            original,
            match_start: 0,
            match_end: 0,
            between: (0, 0),
            match_count: 0,
        }
    }

    /// A scanner positioned past the end of `original`, for scans that
    /// walk backward with [`Find::from_end`] specs.
    pub fn new_at_end(original: &'h str) -> Scanner<'h> {
        Scanner {
            original,
            match_start: original.len(),
            match_end: original.len(),
            between: (original.len(), original.len()),
            match_count: 0,
        }
    }

    pub fn original(&self) -> &'h str {
        self.original
    }

    /// Everything before the current match.
    pub fn before(&self) -> &'h str {
        &self.original[..self.match_start]
    }

    /// The current match. Empty until the first successful step.
    pub fn matched(&self) -> &'h str {
        &self.original[self.match_start..self.match_end]
    }

    /// Everything after the current match.
    pub fn after(&self) -> &'h str {
        &self.original[self.match_end..]
    }

    /// The region between the previous match and the current one — the
    /// record a tokenizer wants.
    pub fn between_last(&self) -> &'h str {
        &self.original[self.between.0..self.between.1]
    }

    /// Successful steps so far. Increases by exactly one per successful
    /// step and never decreases.
    pub fn match_count(&self) -> usize {
        self.match_count
    }

    /// Advance to the next match of `find`. A failed step returns `false`
    /// and leaves the scanner unchanged.
    pub fn step(&mut self, find: &Find<'_>) -> bool {
        match find.direction() {
            Direction::FromStart => {
                let region = &self.original[self.match_end..];
                let Some(found) = find.apply(region) else {
                    return false;
                };
                // A terminal zero-length match on an exhausted region would
                // repeat forever; treat it as no further match.
                if found.is_empty() && region.is_empty() {
                    return false;
                }
                let start = self.match_end + found.start();
                self.between = (self.match_end, start);
                self.match_start = start;
                self.match_end = start + found.len();
            }
            Direction::FromEnd => {
                let region = &self.original[..self.match_start];
                let Some(found) = find.apply(region) else {
                    return false;
                };
                if found.is_empty() && region.is_empty() {
                    return false;
                }
                let start = found.start();
                let end = start + found.len();
                self.between = (end, self.match_start);
                self.match_start = start;
                self.match_end = end;
            }
        }
        self.match_count += 1;
        true
    }
}

/// Split `s` into the non-empty records between any-of-`delims` matches.
///
/// Runs of delimiters collapse; a final record without a trailing delimiter
/// is picked up by the terminal zero-length match.
pub fn tokens<'h>(s: &'h str, delims: &str) -> Vec<&'h str> {
    let find = Find::any_char(delims).always_match_end();
    let mut scanner = Scanner::new(s);
    let mut out = Vec::new();
    while scanner.step(&find) {
        let record = scanner.between_last();
        if !record.is_empty() {
            out.push(record);
        }
    }
    out
}
