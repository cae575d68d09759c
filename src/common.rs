//! Common utility functions shared across command modules

use std::path::{Path, PathBuf};

/// Safely extract a byte slice with bounds checking
///
/// Returns None if the slice range is invalid or exceeds source length.
///
/// # Example
/// ```
/// use flowmap::common::safe_slice;
/// let source = b"hello world";
/// assert_eq!(safe_slice(source, 0, 5), Some(&b"hello"[..]));
/// assert_eq!(safe_slice(source, 10, 20), None);
/// ```
pub fn safe_slice(source: &[u8], start: usize, end: usize) -> Option<&[u8]> {
    if start <= end && end <= source.len() {
        Some(&source[start..end])
    } else {
        None
    }
}

/// Render a path relative to a root directory when it sits inside it.
///
/// Falls back to the path as given when it is outside the root or the
/// prefix does not strip. Used to keep fact file paths stable regardless
/// of how the caller spelled them.
pub fn relative_to_root(path: &Path, root: Option<&Path>) -> String {
    if let Some(root) = root {
        if let Ok(rel) = path.strip_prefix(root) {
            return rel.to_string_lossy().to_string();
        }
    }
    path.to_string_lossy().to_string()
}

/// Resolve a possibly-relative file path against an optional root.
pub fn resolve_path(file_path: &Path, root: Option<&Path>) -> PathBuf {
    if file_path.is_absolute() {
        file_path.to_path_buf()
    } else if let Some(root) = root {
        root.join(file_path)
    } else {
        file_path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_slice_in_bounds() {
        assert_eq!(safe_slice(b"abcdef", 2, 4), Some(&b"cd"[..]));
    }

    #[test]
    fn test_safe_slice_out_of_bounds() {
        assert_eq!(safe_slice(b"abc", 1, 10), None);
        assert_eq!(safe_slice(b"abc", 3, 1), None);
    }

    #[test]
    fn test_relative_to_root_inside() {
        let root = PathBuf::from("/repo");
        let path = PathBuf::from("/repo/src/app.py");
        assert_eq!(relative_to_root(&path, Some(&root)), "src/app.py");
    }

    #[test]
    fn test_relative_to_root_outside() {
        let root = PathBuf::from("/repo");
        let path = PathBuf::from("/elsewhere/app.py");
        assert_eq!(relative_to_root(&path, Some(&root)), "/elsewhere/app.py");
    }

    #[test]
    fn test_resolve_path_relative_with_root() {
        let root = PathBuf::from("/repo");
        assert_eq!(
            resolve_path(&PathBuf::from("src/app.py"), Some(&root)),
            PathBuf::from("/repo/src/app.py")
        );
    }
}
