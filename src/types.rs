/*!
 * Core types and data structures for gdipak
 */

use std::path::{Path, PathBuf};

use strum::{Display, EnumString};

/// Extension of the descriptor file, without the dot
pub const DESCRIPTOR_EXTENSION: &str = "gdi";

/// Extensions a track file may carry, without the dot
pub const TRACK_EXTENSIONS: [&str; 2] = ["bin", "raw"];

/// Name GDEMU expects for the descriptor file
pub const DESCRIPTOR_NAME: &str = "disc.gdi";

/// Role a file plays inside a game dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FileRole {
    /// The `.gdi` table of contents
    Descriptor,
    /// A `.bin` or `.raw` payload
    Track,
}

impl FileRole {
    /// Classify a file by its (case-insensitive) extension
    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(path.extension()?.to_str()?)
    }

    /// Classify a bare extension (no dot), ignoring case
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        if ext == DESCRIPTOR_EXTENSION {
            Some(FileRole::Descriptor)
        } else if TRACK_EXTENSIONS.contains(&ext.as_str()) {
            Some(FileRole::Track)
        } else {
            None
        }
    }
}

/// A file that belongs to a game dump
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameFile {
    /// Path to the file
    pub path: PathBuf,
    /// What the file is
    pub role: FileRole,
}

impl GameFile {
    /// Wrap a path if its extension marks it as a game file
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let role = FileRole::from_path(&path)?;
        Some(Self { path, role })
    }

    /// Whether this is the descriptor
    pub fn is_descriptor(&self) -> bool {
        self.role == FileRole::Descriptor
    }

    /// File name as a lossy string
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// How nested game directories are laid out in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum RecursionMode {
    /// Output mirrors the input tree: `in/a/b` becomes `out/a/b`
    PreserveStructure,
    /// Every game lands directly in the output root: `in/a/b` becomes `out/b`
    FlattenStructure,
    /// Only the input directory itself is packaged
    #[default]
    None,
}

impl RecursionMode {
    /// Map the numeric `--recursive` value to a mode
    pub fn from_level(level: Option<u8>) -> Option<Self> {
        match level {
            None => Some(RecursionMode::None),
            Some(0) => Some(RecursionMode::PreserveStructure),
            Some(1) => Some(RecursionMode::FlattenStructure),
            Some(_) => None,
        }
    }

    /// Whether descendant directories are processed
    pub fn is_recursive(&self) -> bool {
        !matches!(self, RecursionMode::None)
    }
}

/// What happens to the source files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PackingAction {
    /// Leave the sources untouched and write new files
    Copy,
    /// Relocate the sources
    Move,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_file_role_from_path() {
        assert_eq!(
            FileRole::from_path(Path::new("Game.GDI")),
            Some(FileRole::Descriptor)
        );
        assert_eq!(
            FileRole::from_path(Path::new("dir/Game (Track 1).Bin")),
            Some(FileRole::Track)
        );
        assert_eq!(FileRole::from_path(Path::new("notes.txt")), None);
        assert_eq!(FileRole::from_path(Path::new("gdi")), None);
    }

    #[test]
    fn test_recursion_levels() {
        assert_eq!(RecursionMode::from_level(None), Some(RecursionMode::None));
        assert_eq!(
            RecursionMode::from_level(Some(0)),
            Some(RecursionMode::PreserveStructure)
        );
        assert_eq!(
            RecursionMode::from_level(Some(1)),
            Some(RecursionMode::FlattenStructure)
        );
        assert_eq!(RecursionMode::from_level(Some(2)), None);
        assert!(!RecursionMode::None.is_recursive());
    }

    #[test]
    fn test_packing_action_strings() {
        assert_eq!(PackingAction::Copy.to_string(), "copy");
        assert_eq!(PackingAction::from_str("MOVE").unwrap(), PackingAction::Move);
    }
}
