/*!
 * Utility functions for gdipak
 */

use std::path::Path;

use crate::discovery::list_game_files;
use crate::error::Result;

/// Whether `dir` directly holds at least one game file
pub fn has_game_files(dir: &Path) -> Result<bool> {
    Ok(!list_game_files(dir)?.is_empty())
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs::File;
    use tempfile::tempdir;

    #[rstest]
    #[case(0, "0 bytes")]
    #[case(1023, "1023 bytes")]
    #[case(1024, "1.00 KB")]
    #[case(1_153_433_600, "1.07 GB")]
    #[case(734_003_200, "700.00 MB")]
    fn test_format_file_size(#[case] size: u64, #[case] expected: &str) {
        assert_eq!(format_file_size(size), expected);
    }

    #[test]
    fn test_has_game_files() -> Result<()> {
        let dir = tempdir()?;
        assert!(!has_game_files(dir.path())?);
        File::create(dir.path().join("readme.txt"))?;
        assert!(!has_game_files(dir.path())?);
        File::create(dir.path().join("track01.raw"))?;
        assert!(has_game_files(dir.path())?);
        Ok(())
    }
}
