//! OS-facing platform constants, extending the separator trait.

use bsk_text::platform::{Platform, Posix, Windows};

/// Process-level platform facts on top of [`Platform`].
pub trait ExecPlatform: Platform {
    /// Path of the bit-bucket device, the default redirect target.
    const NULL_DEVICE: &'static str;
}

impl ExecPlatform for Posix {
    const NULL_DEVICE: &'static str = "/dev/null";
}

impl ExecPlatform for Windows {
    const NULL_DEVICE: &'static str = "NUL";
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsk_text::platform::Native;

    #[test]
    fn native_has_a_null_device() {
        assert!(!Native::NULL_DEVICE.is_empty());
    }
}
