/*!
 * Finding game files and game directories
 */

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;
use crate::types::GameFile;

/// List the game files (`.gdi`, `.bin`, `.raw`) directly inside `dir`.
///
/// Not recursive. Order follows the directory listing and is not sorted.
pub fn list_game_files(dir: &Path) -> Result<Vec<GameFile>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(file) = GameFile::from_path(entry.into_path()) {
            files.push(file);
        }
    }
    Ok(files)
}

/// List the directories below `dir`, depth first, parents before children.
///
/// `max_depth` is the number of extra levels to descend below the immediate
/// children: `Some(0)` lists only the children, `None` has no limit.
pub fn list_subdirectories(dir: &Path, max_depth: Option<usize>) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth + 1);
    }

    let mut dirs = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}
