//! Path Resolver Module
//!
//! Maps logical keys to document files under the cache root and back.

use std::path::{Component, Path, PathBuf};

use crate::cache::DOCUMENT_EXTENSION;
use crate::error::{CacheError, Result};

// == Path Resolver ==
/// Resolves logical keys (`group/sub/name`) against a fixed cache root.
///
/// Keys accept either `/` or `\` as separators and are trimmed. Empty
/// segments are dropped; `.` and `..` segments and control characters are
/// rejected so that no key can point outside the root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    // == Constructor ==
    /// Creates a resolver rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // == Normalize ==
    /// Returns the canonical `/`-separated form of `key`.
    ///
    /// An empty result is allowed here; callers decide whether it is valid.
    pub fn normalize(key: &str) -> Result<String> {
        Ok(Self::segments(key)?.join("/"))
    }

    /// Returns true if `key` names a single document.
    pub fn is_valid_key(key: &str) -> bool {
        matches!(Self::segments(key), Ok(segments) if !segments.is_empty())
    }

    fn segments(key: &str) -> Result<Vec<&str>> {
        let trimmed = key.trim();
        if trimmed.chars().any(char::is_control) {
            return Err(CacheError::InvalidKey(key.to_string()));
        }

        let mut segments = Vec::new();
        for segment in trimmed.split(['/', '\\']) {
            match segment {
                "" => continue,
                "." | ".." => return Err(CacheError::InvalidKey(key.to_string())),
                _ => segments.push(segment),
            }
        }
        Ok(segments)
    }

    // == Resolve ==
    /// Resolves a document key to `root/<segments>.json`.
    ///
    /// # Errors
    /// `InvalidKey` if the key is empty or unsafe.
    pub fn resolve(&self, key: &str) -> Result<PathBuf> {
        let segments = Self::segments(key)?;
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| CacheError::InvalidKey(key.to_string()))?;

        let mut path = self.root.clone();
        path.extend(parents);
        path.push(format!("{last}.{DOCUMENT_EXTENSION}"));
        Ok(path)
    }

    // == Resolve Directory ==
    /// Resolves a subtree key to `root/<segments>`; an empty key is the root itself.
    pub fn resolve_dir(&self, key: &str) -> Result<PathBuf> {
        let mut path = self.root.clone();
        path.extend(Self::segments(key)?);
        Ok(path)
    }

    // == To Logical Key ==
    /// Converts a document path under the root back into its `/`-separated key.
    ///
    /// Returns None for paths outside the root, files without the document
    /// extension, or anything that reduces to an empty key.
    pub fn to_logical_key(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;

        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_str()?.to_string()),
                _ => return None,
            }
        }

        let last = parts.pop()?;
        let stem = last.strip_suffix(&format!(".{DOCUMENT_EXTENSION}"))?;
        if stem.is_empty() {
            return None;
        }
        parts.push(stem.to_string());
        Some(parts.join("/"))
    }

    /// Returns `path` relative to the root for diagnostics.
    pub fn display_relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PathResolver {
        PathResolver::new("/cache")
    }

    #[test]
    fn test_resolve_simple_key() {
        let path = resolver().resolve("group/x").unwrap();
        assert_eq!(path, PathBuf::from("/cache/group/x.json"));
    }

    #[test]
    fn test_resolve_accepts_both_separators() {
        let r = resolver();
        assert_eq!(
            r.resolve("a\\b\\c").unwrap(),
            r.resolve("a/b/c").unwrap()
        );
        assert_eq!(r.resolve("a\\b/c").unwrap(), PathBuf::from("/cache/a/b/c.json"));
    }

    #[test]
    fn test_resolve_trims_and_drops_empty_segments() {
        let path = resolver().resolve("  /group//x/  ").unwrap();
        assert_eq!(path, PathBuf::from("/cache/group/x.json"));
    }

    #[test]
    fn test_resolve_rejects_empty_key() {
        let r = resolver();
        assert!(matches!(r.resolve(""), Err(CacheError::InvalidKey(_))));
        assert!(matches!(r.resolve("   "), Err(CacheError::InvalidKey(_))));
        assert!(matches!(r.resolve("//"), Err(CacheError::InvalidKey(_))));
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let r = resolver();
        assert!(r.resolve("../etc/passwd").is_err());
        assert!(r.resolve("group/./x").is_err());
        assert!(r.resolve("a\\..\\..\\b").is_err());
    }

    #[test]
    fn test_resolve_rejects_control_characters() {
        assert!(resolver().resolve("bad\0key").is_err());
        assert!(resolver().resolve("line\nbreak").is_err());
    }

    #[test]
    fn test_resolve_dir_empty_is_root() {
        assert_eq!(resolver().resolve_dir("").unwrap(), PathBuf::from("/cache"));
        assert_eq!(
            resolver().resolve_dir("group\\sub").unwrap(),
            PathBuf::from("/cache/group/sub")
        );
    }

    #[test]
    fn test_to_logical_key_inverts_resolve() {
        let r = resolver();
        let path = r.resolve("group\\sub\\z").unwrap();
        assert_eq!(r.to_logical_key(&path).as_deref(), Some("group/sub/z"));
    }

    #[test]
    fn test_to_logical_key_skips_invalid_paths() {
        let r = resolver();
        assert!(r.to_logical_key(Path::new("/elsewhere/x.json")).is_none());
        assert!(r.to_logical_key(Path::new("/cache/x.txt")).is_none());
        assert!(r.to_logical_key(Path::new("/cache/.json")).is_none());
        assert!(r.to_logical_key(Path::new("/cache")).is_none());
    }

    #[test]
    fn test_is_valid_key() {
        assert!(PathResolver::is_valid_key("a/b"));
        assert!(!PathResolver::is_valid_key(" "));
        assert!(!PathResolver::is_valid_key("a/../b"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(PathResolver::normalize(" a\\b/ ").unwrap(), "a/b");
        assert_eq!(PathResolver::normalize("").unwrap(), "");
    }

    #[test]
    fn test_display_relative() {
        let r = resolver();
        let path = r.resolve("group/x").unwrap();
        assert_eq!(r.display_relative(&path), "group/x.json");
    }
}
