//! Path component iteration and the operations built on it.
//!
//! Paths are plain strings here; conversion to `std::path` types happens at
//! the OS boundary. All logic is generic over [`Platform`], with `/` as the
//! canonical separator when new paths are synthesized.

use crate::find::Find;
use crate::platform::Platform;
use bsk_arena::Arena;
use std::marker::PhantomData;

/// Iterator over the components of a path.
///
/// Repeated separators collapse. A leading root separator is yielded as its
/// own component. On a platform that accepts backslashes, a double-leading
/// separator (network path) is one atomic two-character component.
pub struct Components<'a, P: Platform> {
    rest: &'a str,
    at_start: bool,
    _platform: PhantomData<P>,
}

/// Walk the components of `path`.
pub fn components<P: Platform>(path: &str) -> Components<'_, P> {
    Components {
        rest: path,
        at_start: true,
        _platform: PhantomData,
    }
}

fn trim_leading<P: Platform>(s: &str) -> &str {
    s.trim_start_matches(|c| P::is_separator(c))
}

fn trim_trailing<P: Platform>(s: &str) -> &str {
    s.trim_end_matches(|c| P::is_separator(c))
}

impl<'a, P: Platform> Components<'a, P> {
    fn take_root(&mut self) -> Option<&'a str> {
        let mut chars = self.rest.chars();
        let c0 = chars.next()?;
        if !P::is_separator(c0) {
            return None;
        }
        let c1 = chars.next();
        let c2 = chars.next();
        let root_len = match (c1, c2) {
            // Exactly two leading separators followed by a name: a network
            // path, kept atomic. Three or more collapse to a plain root.
            (Some(c1), next) if P::ACCEPTS_BACKSLASH
                && P::is_separator(c1)
                && !next.is_some_and(|c| P::is_separator(c)) =>
            {
                c0.len_utf8() + c1.len_utf8()
            }
            _ => c0.len_utf8(),
        };
        let root = &self.rest[..root_len];
        self.rest = trim_leading::<P>(&self.rest[root_len..]);
        Some(root)
    }
}

impl<'a, P: Platform> Iterator for Components<'a, P> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.at_start {
            self.at_start = false;
            if let Some(root) = self.take_root() {
                return Some(root);
            }
        }
        if self.rest.is_empty() {
            return None;
        }
        let found = Find::any_char(P::SEPARATORS)
            .always_match_end()
            .apply(self.rest)
            .expect("terminal match on a non-empty region");
        let component = found.before;
        self.rest = trim_leading::<P>(found.after);
        debug_assert!(!component.is_empty());
        Some(component)
    }
}

/// The last path component, if any. Trailing separators are ignored; a bare
/// root has no last entry.
pub fn last_entry<P: Platform>(path: &str) -> Option<&str> {
    let trimmed = trim_trailing::<P>(path);
    if trimmed.is_empty() {
        return None;
    }
    match Find::any_char(P::SEPARATORS).from_end().apply(trimmed) {
        Some(found) => {
            if found.after.is_empty() {
                None
            } else {
                Some(found.after)
            }
        }
        None => Some(trimmed),
    }
}

/// The path without its last component. Keeps the root separator; `None`
/// when there is no parent (bare root, single relative component, empty).
pub fn parent_dir<P: Platform>(path: &str) -> Option<&str> {
    let trimmed = trim_trailing::<P>(path);
    if trimmed.is_empty() {
        return None;
    }
    let found = Find::any_char(P::SEPARATORS).from_end().apply(trimmed)?;
    let parent = trim_trailing::<P>(found.before);
    if parent.is_empty() {
        // The entry hangs directly off the root; the parent is the root
        // itself, separators included.
        Some(&trimmed[..found.before.len() + found.matched.len()])
    } else {
        Some(parent)
    }
}

/// Join `base` and `entry` with the canonical separator, allocating the
/// result in `arena`. No separator is doubled or inserted after a base that
/// already ends in one.
pub fn join<'a, P: Platform>(arena: &'a Arena, base: &str, entry: &str) -> &'a str {
    let mut b = arena.begin_str();
    b.push_str(base);
    let base_ends_sep = base.chars().next_back().is_some_and(|c| P::is_separator(c));
    let entry = if base_ends_sep {
        trim_leading::<P>(entry)
    } else {
        entry
    };
    if !base.is_empty() && !base_ends_sep && !entry.chars().next().is_some_and(|c| P::is_separator(c))
    {
        b.push_str("/");
    }
    b.push_str(entry);
    b.finish()
}

/// Resolve `path` against the absolute directory `base`, eliminating `.`
/// and `..` components. An already-absolute `path` ignores `base`.
pub fn absolutize<'a, P: Platform>(arena: &'a Arena, base: &str, path: &str) -> &'a str {
    let mut root: Option<&str> = None;
    let mut stack: Vec<&str> = Vec::new();

    let path_is_absolute = path.chars().next().is_some_and(|c| P::is_separator(c));
    if !path_is_absolute {
        push_components::<P>(&mut root, &mut stack, base);
    }
    push_components::<P>(&mut root, &mut stack, path);

    let mut b = arena.begin_str();
    if let Some(root) = root {
        b.push_str(root);
    }
    for (i, component) in stack.iter().enumerate() {
        if i > 0 {
            b.push_str("/");
        }
        b.push_str(component);
    }
    b.finish()
}

fn push_components<'s, P: Platform>(
    root: &mut Option<&'s str>,
    stack: &mut Vec<&'s str>,
    path: &'s str,
) {
    for (i, component) in components::<P>(path).enumerate() {
        let is_root = i == 0
            && component
                .chars()
                .next()
                .is_some_and(|c| P::is_separator(c));
        if is_root {
            *root = Some(component);
            stack.clear();
        } else if component == "." {
            // current directory, nothing to do
        } else if component == ".." {
            if stack.last().is_some_and(|c| *c != "..") {
                stack.pop();
            } else if root.is_none() {
                // No anchor to climb above; keep the component.
                stack.push(component);
            }
            // `..` above the root clamps at the root.
        } else {
            stack.push(component);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Posix, Windows};

    fn comps_posix(p: &str) -> Vec<&str> {
        components::<Posix>(p).collect()
    }

    fn comps_win(p: &str) -> Vec<&str> {
        components::<Windows>(p).collect()
    }

    #[test]
    fn relative_components() {
        assert_eq!(comps_posix("a/b/c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn leading_root_is_its_own_component() {
        assert_eq!(comps_posix("/a/b"), vec!["/", "a", "b"]);
    }

    #[test]
    fn repeated_separators_collapse() {
        assert_eq!(comps_posix("a//b///c"), vec!["a", "b", "c"]);
        assert_eq!(comps_posix("///a"), vec!["/", "a"]);
    }

    #[test]
    fn trailing_separators_are_ignored() {
        assert_eq!(comps_posix("a/b/"), vec!["a", "b"]);
    }

    #[test]
    fn windows_accepts_backslash_components() {
        assert_eq!(comps_win(r"a\b/c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn windows_network_path_root_is_atomic() {
        assert_eq!(comps_win(r"\\server\share"), vec![r"\\", "server", "share"]);
        assert_eq!(comps_win("//server/share"), vec!["//", "server", "share"]);
        // Three leading separators are a collapsed plain root.
        assert_eq!(comps_win(r"\\\a"), vec![r"\", "a"]);
    }

    #[test]
    fn posix_double_leading_collapses() {
        assert_eq!(comps_posix("//a"), vec!["/", "a"]);
    }

    #[test]
    fn last_entry_cases() {
        assert_eq!(last_entry::<Posix>("/a/b/c.txt"), Some("c.txt"));
        assert_eq!(last_entry::<Posix>("c.txt"), Some("c.txt"));
        assert_eq!(last_entry::<Posix>("/a/b/"), Some("b"));
        assert_eq!(last_entry::<Posix>("/"), None);
        assert_eq!(last_entry::<Posix>(""), None);
    }

    #[test]
    fn parent_dir_cases() {
        assert_eq!(parent_dir::<Posix>("/a/b/c"), Some("/a/b"));
        assert_eq!(parent_dir::<Posix>("/a"), Some("/"));
        assert_eq!(parent_dir::<Posix>("a/b"), Some("a"));
        assert_eq!(parent_dir::<Posix>("a"), None);
        assert_eq!(parent_dir::<Posix>("/"), None);
        assert_eq!(parent_dir::<Posix>("a//b"), Some("a"));
        assert_eq!(parent_dir::<Windows>(r"\\server\share"), Some(r"\\server"));
    }

    #[test]
    fn join_inserts_single_separator() {
        let arena = Arena::with_capacity(4096);
        assert_eq!(join::<Posix>(&arena, "/a/b", "c"), "/a/b/c");
        assert_eq!(join::<Posix>(&arena, "/", "a"), "/a");
        assert_eq!(join::<Posix>(&arena, "/a/", "/b"), "/a/b");
        assert_eq!(join::<Posix>(&arena, "", "b"), "b");
    }

    #[test]
    fn parent_and_last_entry_round_trip() {
        let arena = Arena::with_capacity(4096);
        for p in ["/a", "/a/b", "/a/b/c.txt", "/usr/local/bin/cc"] {
            let parent = parent_dir::<Posix>(p).unwrap();
            let entry = last_entry::<Posix>(p).unwrap();
            assert_eq!(join::<Posix>(&arena, parent, entry), p);
        }
    }

    #[test]
    fn absolutize_relative_path() {
        let arena = Arena::with_capacity(4096);
        assert_eq!(
            absolutize::<Posix>(&arena, "/home/build", "src/main.c"),
            "/home/build/src/main.c"
        );
    }

    #[test]
    fn absolutize_eliminates_dot_and_dotdot() {
        let arena = Arena::with_capacity(4096);
        assert_eq!(
            absolutize::<Posix>(&arena, "/home/build", "../other/./x"),
            "/home/other/x"
        );
        assert_eq!(absolutize::<Posix>(&arena, "/", "a/b/../../c"), "/c");
    }

    #[test]
    fn absolutize_clamps_at_root() {
        let arena = Arena::with_capacity(4096);
        assert_eq!(absolutize::<Posix>(&arena, "/", "../../a"), "/a");
    }

    #[test]
    fn absolutize_ignores_base_for_absolute_paths() {
        let arena = Arena::with_capacity(4096);
        assert_eq!(
            absolutize::<Posix>(&arena, "/home/build", "/etc/hosts"),
            "/etc/hosts"
        );
    }

    #[test]
    fn absolutize_preserves_windows_network_root() {
        let arena = Arena::with_capacity(4096);
        assert_eq!(
            absolutize::<Windows>(&arena, r"\\server\share", "x/../y"),
            r"\\server/share/y"
        );
    }
}
