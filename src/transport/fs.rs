use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use walkdir::WalkDir;

use crate::constants::corpus::TRANSCRIPT_EXTENSION;
use crate::errors::CorpusError;

/// A directory without subdirectories, with its transcript candidates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeafDirectory {
    /// Directory path as produced by the walk (rooted at the walk root).
    pub path: PathBuf,
    /// Files with a transcript extension, in listing order.
    pub transcripts: Vec<PathBuf>,
}

#[derive(Default)]
struct DirectoryScan {
    has_subdirectories: bool,
    transcripts: Vec<PathBuf>,
}

/// Filesystem walker that yields leaf directories in a deterministic order.
///
/// Entries are visited pre-order with siblings sorted by file name, so the
/// order does not depend on the platform's directory listing.
pub struct LeafDirectoryWalk {
    root: PathBuf,
    follow_links: bool,
}

impl LeafDirectoryWalk {
    /// Create a walk rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: false,
        }
    }

    /// Configure symlink traversal.
    pub fn with_follow_symlinks(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Collect every leaf directory under the root, in pre-order.
    ///
    /// The root itself is a leaf when it has no subdirectories. Walk errors
    /// (permissions, broken links, loops) abort the walk.
    pub fn collect(&self) -> Result<Vec<LeafDirectory>, CorpusError> {
        let mut directories: IndexMap<PathBuf, DirectoryScan> = IndexMap::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(self.follow_links)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            let parent_scan = if entry.depth() > 0 {
                path.parent().and_then(|parent| directories.get_mut(parent))
            } else {
                None
            };
            if entry.file_type().is_dir() {
                if let Some(scan) = parent_scan {
                    scan.has_subdirectories = true;
                }
                directories.insert(path.to_path_buf(), DirectoryScan::default());
            } else if is_text_file(path)
                && let Some(scan) = parent_scan
            {
                scan.transcripts.push(path.to_path_buf());
            }
        }
        Ok(directories
            .into_iter()
            .filter(|(_, scan)| !scan.has_subdirectories)
            .map(|(path, scan)| LeafDirectory {
                path,
                transcripts: scan.transcripts,
            })
            .collect())
    }
}

/// True if the path has a `.txt` extension (case-insensitive).
pub fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(TRANSCRIPT_EXTENSION))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn leaves_are_reported_in_sorted_preorder() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        for dir in ["20/5", "19/227", "19/198"] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        fs::write(root.join("19/198/19-198.trans.txt"), "").unwrap();
        fs::write(root.join("19/198/19-198-0001.flac"), "").unwrap();
        fs::write(root.join("19/227/19-227.trans.txt"), "").unwrap();
        fs::write(root.join("README.TXT"), "").unwrap();

        let leaves = LeafDirectoryWalk::new(root).collect().unwrap();
        let paths: Vec<PathBuf> = leaves.iter().map(|leaf| leaf.path.clone()).collect();
        assert_eq!(
            paths,
            vec![root.join("19/198"), root.join("19/227"), root.join("20/5")]
        );
        assert_eq!(
            leaves[0].transcripts,
            vec![root.join("19/198/19-198.trans.txt")]
        );
        assert!(leaves[2].transcripts.is_empty());
    }

    #[test]
    fn root_without_subdirectories_is_a_leaf() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("only.trans.txt"), "").unwrap();

        let leaves = LeafDirectoryWalk::new(temp.path()).collect().unwrap();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].path, temp.path());
        assert_eq!(leaves[0].transcripts.len(), 1);
    }

    #[test]
    fn missing_root_surfaces_walk_error() {
        let temp = tempdir().unwrap();
        let err = LeafDirectoryWalk::new(temp.path().join("absent"))
            .collect()
            .unwrap_err();
        assert!(matches!(err, CorpusError::Walk(_)));
    }

    #[test]
    fn text_detection_is_case_insensitive() {
        assert!(is_text_file(Path::new("19-198.trans.txt")));
        assert!(is_text_file(Path::new("NOTES.TXT")));
        assert!(!is_text_file(Path::new("19-198-0001.flac")));
        assert!(!is_text_file(Path::new("txt")));
    }
}
