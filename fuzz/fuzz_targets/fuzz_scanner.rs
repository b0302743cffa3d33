//! Fuzz target for the scanner.
//!
//! A scan over arbitrary input must terminate, keep its match count
//! monotonic, and keep all views inside the original string.

#![no_main]

use arbitrary::Arbitrary;
use bsk_text::{Find, Scanner};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    haystack: &'a str,
    delims: &'a str,
    from_end: bool,
}

fuzz_target!(|input: Input<'_>| {
    let mut find = Find::any_char(input.delims).always_match_end();
    let mut scanner = if input.from_end {
        find = find.from_end();
        Scanner::new_at_end(input.haystack)
    } else {
        Scanner::new(input.haystack)
    };

    // Terminal zero-length matches are refused on an empty region, so the
    // step count is bounded by the haystack length plus one.
    let mut steps = 0;
    while scanner.step(&find) {
        steps += 1;
        assert_eq!(scanner.match_count(), steps);
        assert!(steps <= input.haystack.len() + 1);
        let total = scanner.before().len() + scanner.matched().len() + scanner.after().len();
        assert_eq!(total, input.haystack.len());
        assert!(scanner.between_last().len() <= input.haystack.len());
    }
});
