//! Recursive directory walking.

use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Walk `root` depth-first, calling `visit` for every entry.
///
/// Entries within a directory are visited in name order so walks are
/// deterministic across platforms. Directories are visited before their
/// contents. Environmental errors (unreadable directories, races with
/// concurrent deletion) propagate to the caller.
pub fn walk_dir(
    root: &Path,
    visit: &mut dyn FnMut(&Path, &fs::Metadata) -> io::Result<()>,
) -> io::Result<()> {
    debug!(dir = %root.display(), "walking directory");
    let mut entries: Vec<_> = fs::read_dir(root)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        let path = entry.path();
        let meta = entry.metadata()?;
        visit(&path, &meta)?;
        if meta.is_dir() {
            walk_dir(&path, visit)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn walks_nested_tree_in_name_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("b.txt")).unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        File::create(dir.path().join("sub").join("c.txt")).unwrap();

        let mut seen = Vec::new();
        walk_dir(dir.path(), &mut |path, _| {
            seen.push(
                path.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/"),
            );
            Ok(())
        })
        .expect("walk");

        assert_eq!(seen, vec!["a.txt", "b.txt", "sub", "sub/c.txt"]);
    }

    #[test]
    fn visitor_errors_propagate() {
        let dir = tempfile::tempdir().expect("tempdir");
        File::create(dir.path().join("x")).unwrap();
        let err = walk_dir(dir.path(), &mut |_, _| {
            Err(io::Error::new(io::ErrorKind::Other, "stop"))
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "stop");
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope");
        assert!(walk_dir(&missing, &mut |_, _| Ok(())).is_err());
    }
}
