//! Slash-delimited tree paths. These are display paths rooted at the picked
//! folder, not host filesystem paths.

pub const SEPARATOR: char = '/';
pub const ROOT: &str = "/";

/// Appends `name` to `base` with exactly one separator between them.
pub fn join(base: &str, name: &str) -> String {
    let mut joined = String::with_capacity(base.len() + name.len() + 1);
    joined.push_str(base);
    if !base.ends_with(SEPARATOR) {
        joined.push(SEPARATOR);
    }
    joined.push_str(name);
    joined
}

/// True when `path` is `ancestor` itself or lies underneath it.
pub fn is_ancestor_or_self(ancestor: &str, path: &str) -> bool {
    path == ancestor || is_strict_ancestor(ancestor, path)
}

pub fn is_strict_ancestor(ancestor: &str, path: &str) -> bool {
    if ancestor.ends_with(SEPARATOR) {
        return path.len() > ancestor.len() && path.starts_with(ancestor);
    }
    path.len() > ancestor.len() + 1
        && path.starts_with(ancestor)
        && path[ancestor.len()..].starts_with(SEPARATOR)
}

/// Number of non-empty segments. Only used for indentation.
pub fn depth(path: &str) -> usize {
    path.split(SEPARATOR).filter(|s| !s.is_empty()).count()
}

/// Lowercased text after the last `.` of a file name, if any.
pub fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_inserts_single_separator() {
        assert_eq!(join("/", "a"), "/a");
        assert_eq!(join("/a", "b.xlsx"), "/a/b.xlsx");
        assert_eq!(join("/a/", "b"), "/a/b");
        assert_eq!(join("/", ""), "/");
    }

    #[test]
    fn ancestor_checks_respect_segment_boundaries() {
        assert!(is_ancestor_or_self("/a", "/a"));
        assert!(is_ancestor_or_self("/a", "/a/b"));
        assert!(!is_ancestor_or_self("/a", "/ab"));
        assert!(!is_ancestor_or_self("/a/b", "/a"));
        assert!(is_ancestor_or_self("/", "/a"));
        assert!(!is_strict_ancestor("/a", "/a"));
        assert!(!is_strict_ancestor("/a", "/a/"));
    }

    #[test]
    fn depth_counts_non_empty_segments() {
        assert_eq!(depth("/"), 0);
        assert_eq!(depth("/a"), 1);
        assert_eq!(depth("/a/b.xlsx"), 2);
        assert_eq!(depth("//a//b/"), 2);
    }

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(extension("Report.XLSX").as_deref(), Some("xlsx"));
        assert_eq!(extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension("README"), None);
    }
}
