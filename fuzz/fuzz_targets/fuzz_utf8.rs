//! Fuzz target for the UTF-8 decoders.
//!
//! Both decoders must make progress on arbitrary bytes, never panic, and
//! agree with the standard library on what decodes to a scalar value.

#![no_main]

use bsk_text::utf8::{decode_backward, decode_forward};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut offset = 0;
    while offset < data.len() {
        let (ch, consumed) = decode_forward(&data[offset..]);
        assert!(consumed >= 1 && consumed <= 4);
        assert!(offset + consumed <= data.len());
        if let Some(c) = ch {
            // A decoded char must round-trip through std's encoder.
            let mut buf = [0u8; 4];
            let encoded = c.encode_utf8(&mut buf);
            assert_eq!(encoded.as_bytes(), &data[offset..offset + consumed]);
        }
        offset += consumed;
    }

    let mut end = data.len();
    while end > 0 {
        let (ch, consumed) = decode_backward(&data[..end]);
        assert!(consumed >= 1 && consumed <= 4);
        assert!(consumed <= end);
        if let Some(c) = ch {
            let mut buf = [0u8; 4];
            let encoded = c.encode_utf8(&mut buf);
            assert_eq!(encoded.as_bytes(), &data[end - consumed..end]);
        }
        end -= consumed;
    }
});
