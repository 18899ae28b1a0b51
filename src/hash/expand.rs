// Selection expansion module
// Turns the user's selection into the ordered list of files to hash

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use jwalk::WalkDir;
use tracing::{debug, warn};

/// How the selected paths should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Every path is a file to hash
    #[default]
    Files,
    /// Every path is a folder whose files are hashed
    Folders,
}

/// Case-insensitive set of file extensions, stored lowercase with a leading dot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionFilter {
    extensions: BTreeSet<String>,
}

impl ExtensionFilter {
    /// Parse a comma-separated list such as `.txt, .PY,md`
    ///
    /// Entries are trimmed and lowercased, a missing leading dot is added and
    /// blank entries are ignored. Returns `None` when nothing usable remains.
    pub fn parse(text: &str) -> Option<Self> {
        Self::from_extensions(text.split(','))
    }

    /// Build a filter from individual extensions
    pub fn from_extensions<I, S>(extensions: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions: BTreeSet<String> = extensions
            .into_iter()
            .filter_map(|ext| {
                let ext = ext.as_ref().trim().to_lowercase();
                if ext.is_empty() {
                    None
                } else if ext.starts_with('.') {
                    Some(ext)
                } else {
                    Some(format!(".{}", ext))
                }
            })
            .collect();

        if extensions.is_empty() {
            None
        } else {
            Some(Self { extensions })
        }
    }

    /// Check whether a file name's extension is in the set
    pub fn matches(&self, path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let ext = format!(".{}", ext.to_string_lossy().to_lowercase());
                self.extensions.contains(&ext)
            }
            None => false,
        }
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

/// The user's selection, as supplied by the front end
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub paths: Vec<PathBuf>,
    pub mode: SelectionMode,
    pub recurse: bool,
    pub filter: Option<ExtensionFilter>,
}

impl Selection {
    /// Select individual files
    pub fn files<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            mode: SelectionMode::Files,
            recurse: false,
            filter: None,
        }
    }

    /// Select folders
    pub fn folders<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            mode: SelectionMode::Folders,
            recurse: false,
            filter: None,
        }
    }

    pub fn with_recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    pub fn with_filter(mut self, filter: Option<ExtensionFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Resolve the selection into the files to hash
    pub fn expand(&self) -> Vec<PathBuf> {
        expand(&self.paths, self.mode, self.recurse, self.filter.as_ref())
    }
}

/// Expand a selection into an ordered list of files
///
/// In `Files` mode the paths are returned unchanged. In `Folders` mode each
/// folder contributes its regular files (the whole subtree when `recurse` is
/// set), in directory-walk order. Overlapping folders are not de-duplicated.
/// Folders that cannot be read contribute nothing.
pub fn expand(
    paths: &[PathBuf],
    mode: SelectionMode,
    recurse: bool,
    filter: Option<&ExtensionFilter>,
) -> Vec<PathBuf> {
    match mode {
        SelectionMode::Files => paths.to_vec(),
        SelectionMode::Folders => {
            let mut files = Vec::new();
            for folder in paths {
                let before = files.len();
                if recurse {
                    walk_folder(folder, filter, &mut files);
                } else {
                    list_folder(folder, filter, &mut files);
                }
                debug!(folder = %folder.display(), found = files.len() - before, "expanded folder");
            }
            files
        }
    }
}

fn keep(path: &Path, filter: Option<&ExtensionFilter>) -> bool {
    filter.map_or(true, |f| f.matches(path))
}

/// Immediate children that are regular files
fn list_folder(folder: &Path, filter: Option<&ExtensionFilter>, files: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read directory {}: {}", folder.display(), e);
            return;
        }
    };

    for entry_result in entries {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cannot read directory entry in {}: {}", folder.display(), e);
                continue;
            }
        };

        let path = entry.path();
        // Path::is_file follows symlinks, so a link to a file counts
        if path.is_file() && keep(&path, filter) {
            files.push(path);
        }
    }
}

/// Every file in the subtree, tolerating unreadable directories
fn walk_folder(folder: &Path, filter: Option<&ExtensionFilter>, files: &mut Vec<PathBuf>) {
    for entry_result in WalkDir::new(folder)
        .parallelism(jwalk::Parallelism::Serial)
        .skip_hidden(false)
        .follow_links(false)
    {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error walking directory {}: {}", folder.display(), e);
                continue;
            }
        };

        // The root itself is never a result; a file given as a folder yields nothing
        if entry.depth == 0 {
            continue;
        }

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }

        let path = entry.path();
        // Links to directories are listed but never descended into
        if file_type.is_symlink() && path.is_dir() {
            continue;
        }

        if keep(&path, filter) {
            files.push(path);
        }
    }
}
