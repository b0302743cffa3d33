//! Path separator conventions.
//!
//! All path logic is written once against [`Platform`]; the two impls are
//! the only place the OS difference lives. `/` is canonical everywhere,
//! `\` is accepted as an alias only on [`Windows`].

/// Separator convention for one platform family.
pub trait Platform {
    /// Accepted separator characters, canonical one first.
    const SEPARATORS: &'static str;

    /// Whether `\` is accepted as a separator alias.
    const ACCEPTS_BACKSLASH: bool;

    fn is_separator(c: char) -> bool {
        Self::SEPARATORS.contains(c)
    }
}

/// `/` only.
pub struct Posix;

impl Platform for Posix {
    const SEPARATORS: &'static str = "/";
    const ACCEPTS_BACKSLASH: bool = false;
}

/// `/` and `\`, with double-leading network paths.
pub struct Windows;

impl Platform for Windows {
    const SEPARATORS: &'static str = "/\\";
    const ACCEPTS_BACKSLASH: bool = true;
}

/// The convention of the build host.
#[cfg(windows)]
pub type Native = Windows;

/// The convention of the build host.
#[cfg(not(windows))]
pub type Native = Posix;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posix_accepts_only_slash() {
        assert!(Posix::is_separator('/'));
        assert!(!Posix::is_separator('\\'));
    }

    #[test]
    fn windows_accepts_both() {
        assert!(Windows::is_separator('/'));
        assert!(Windows::is_separator('\\'));
    }
}
