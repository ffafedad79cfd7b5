use crate::config::PageMode;
use std::path::{Component, Path};

const INDEX_FILE: &str = "index.html";

/// Whether a file name counts as a page under `mode`.
pub fn is_page_file(name: &str, mode: PageMode) -> bool {
    match mode {
        PageMode::Index => name == INDEX_FILE,
        PageMode::All => name.ends_with(".html"),
    }
}

/// Canonical site path of a page file.
///
/// `index.html` maps to its directory (`/` for the root, never `/.`), any
/// other `.html` file maps to its path with the suffix removed. Returns
/// `None` for files outside `root` or names that are not valid UTF-8.
pub fn canonical_path(root: &Path, file: &Path) -> Option<String> {
    let rel = file.strip_prefix(root).ok()?;
    let name = rel.file_name()?.to_str()?;

    let mut segments = Vec::new();
    if let Some(parent) = rel.parent() {
        for component in parent.components() {
            match component {
                Component::Normal(s) => segments.push(s.to_str()?.to_string()),
                Component::CurDir => {}
                _ => return None,
            }
        }
    }

    if name != INDEX_FILE {
        segments.push(name.strip_suffix(".html")?.to_string());
    }

    Some(format!("/{}", segments.join("/")))
}
