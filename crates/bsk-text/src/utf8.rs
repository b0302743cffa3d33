//! Bidirectional UTF-8 decoding over raw bytes.
//!
//! The forward direction is the textbook one: the leading byte's high bits
//! declare the sequence length, continuation bytes contribute six bits
//! each. The backward direction has to work without knowing where the
//! character starts: it scans backward over continuation bytes until it
//! finds a byte in the valid leading range, then checks that the declared
//! length matches the number of continuation bytes it walked over.
//!
//! Any malformed sequence decodes as `(None, 1)`: the character is invalid
//! and exactly one byte is consumed, including the case of a buffer that
//! begins mid-sequence. Overlong encodings, surrogates and values past
//! U+10FFFF are malformed.

/// Decode one character from the front of `bytes`.
///
/// Returns the character (or `None` if malformed) and the number of bytes
/// consumed from the front. Consumes zero bytes only on empty input.
pub fn decode_forward(bytes: &[u8]) -> (Option<char>, usize) {
    let Some(&b0) = bytes.first() else {
        return (None, 0);
    };
    let (len, init) = match b0 {
        0x00..=0x7F => return (Some(b0 as char), 1),
        0xC2..=0xDF => (2, u32::from(b0 & 0x1F)),
        0xE0..=0xEF => (3, u32::from(b0 & 0x0F)),
        0xF0..=0xF4 => (4, u32::from(b0 & 0x07)),
        // Stray continuation byte, overlong lead (C0/C1) or out-of-range
        // lead (F5..FF).
        _ => return (None, 1),
    };
    if bytes.len() < len {
        return (None, 1);
    }
    let mut cp = init;
    for &b in &bytes[1..len] {
        if b & 0xC0 != 0x80 {
            return (None, 1);
        }
        cp = (cp << 6) | u32::from(b & 0x3F);
    }
    let valid = match len {
        2 => cp >= 0x80,
        3 => cp >= 0x800 && !(0xD800..=0xDFFF).contains(&cp),
        _ => (0x10000..=0x10_FFFF).contains(&cp),
    };
    if !valid {
        return (None, 1);
    }
    (char::from_u32(cp), len)
}

/// Decode one character from the back of `bytes`.
///
/// Returns the character (or `None` if malformed) and the number of bytes
/// consumed from the back. Consumes zero bytes only on empty input.
pub fn decode_backward(bytes: &[u8]) -> (Option<char>, usize) {
    let Some(&last) = bytes.last() else {
        return (None, 0);
    };
    if last < 0x80 {
        return (Some(last as char), 1);
    }
    // Walk backward over continuation bytes looking for the lead.
    let mut i = bytes.len() - 1;
    let mut cont = 0usize;
    while bytes[i] & 0xC0 == 0x80 {
        cont += 1;
        if cont > 3 || i == 0 {
            // Either no lead within reach or the buffer starts
            // mid-sequence; the trailing byte is invalid on its own.
            return (None, 1);
        }
        i -= 1;
    }
    let declared = match bytes[i] {
        0xC2..=0xDF => 1,
        0xE0..=0xEF => 2,
        0xF0..=0xF4 => 3,
        _ => return (None, 1),
    };
    if declared != cont {
        return (None, 1);
    }
    match decode_forward(&bytes[i..]) {
        (Some(c), len) => {
            debug_assert_eq!(len, cont + 1);
            (Some(c), cont + 1)
        }
        // Structurally plausible but overlong / surrogate / out of range.
        (None, _) => (None, 1),
    }
}
