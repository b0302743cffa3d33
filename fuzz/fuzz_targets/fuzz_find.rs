//! Fuzz target for the find engine.
//!
//! Checks that every successful find partitions the haystack exactly, in
//! both directions and for all three pattern kinds.

#![no_main]

use arbitrary::Arbitrary;
use bsk_text::Find;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    haystack: &'a str,
    needle: &'a str,
    kind: u8,
    from_end: bool,
    always_match_end: bool,
}

fuzz_target!(|input: Input<'_>| {
    let mut find = match input.kind % 3 {
        0 => Find::exact(input.needle),
        1 => Find::any_char(input.needle),
        _ => Find::line_break(),
    };
    if input.from_end {
        find = find.from_end();
    }
    if input.always_match_end {
        find = find.always_match_end();
    }
    if let Some(found) = find.apply(input.haystack) {
        // The three views must reconstruct the haystack exactly.
        assert_eq!(found.before.len() + found.matched.len() + found.after.len(),
            input.haystack.len());
        assert_eq!(
            format!("{}{}{}", found.before, found.matched, found.after),
            input.haystack
        );
    }
});
