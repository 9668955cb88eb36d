/*!
 * Canonical file names for GDEMU
 *
 * Maps whatever a dump tool called a file (`Game (USA) (Track 02).bin`) to
 * the name GDEMU wants (`track02.bin`). Pure string work, no I/O.
 */

use std::path::{is_separator, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{GdipakError, Result};
use crate::types::{FileRole, DESCRIPTOR_NAME};

// First "track" (any case), then the first run of ASCII digits after it.
static TRACK_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)track.*?([0-9]+)").unwrap());

/// Map a file name or path to its canonical GDEMU name.
///
/// Only the last path segment is inspected; any directory prefix is kept
/// as-is. Descriptors always become `disc.gdi`, tracks become
/// `track<NN><ext>` with at least two digits and a lower-case extension.
///
/// # Errors
/// [`GdipakError::UnsupportedType`] for anything that is not `.gdi`, `.bin` or
/// `.raw`, and [`GdipakError::AmbiguousName`] for a track whose name carries
/// no track number.
pub fn canonical_name(input: &str) -> Result<String> {
    let (dir, file_name) = match input.rfind(is_separator) {
        Some(pos) => input.split_at(pos + 1),
        None => ("", input),
    };
    Ok(format!("{}{}", dir, map_file_name(file_name)?))
}

/// [`canonical_name`] for paths: replaces the file name, keeps the parent.
pub fn canonical_path(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| GdipakError::UnsupportedType(path.display().to_string()))?;
    Ok(path.with_file_name(map_file_name(file_name)?))
}

fn map_file_name(file_name: &str) -> Result<String> {
    let path = Path::new(file_name);
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| GdipakError::UnsupportedType(file_name.to_string()))?;

    match FileRole::from_extension(&ext) {
        Some(FileRole::Descriptor) => Ok(DESCRIPTOR_NAME.to_string()),
        Some(FileRole::Track) => {
            let stem = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default();
            let index = track_index(stem)
                .ok_or_else(|| GdipakError::AmbiguousName(file_name.to_string()))?;
            Ok(format!("track{:0>2}.{}", index, ext))
        }
        None => Err(GdipakError::UnsupportedType(file_name.to_string())),
    }
}

/// Track number as written in `stem`, with leading zeros removed.
///
/// Works on the digit string so arbitrarily long runs never overflow.
fn track_index(stem: &str) -> Option<&str> {
    let digits = TRACK_NUMBER_REGEX.captures(stem)?.get(1)?.as_str();
    match digits.trim_start_matches('0') {
        "" => Some("0"),
        trimmed => Some(trimmed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("mygame.gdi")]
    #[case("Some Game (USA) (Track 1).GDI")]
    #[case("disc.gdi")]
    fn test_descriptor_names(#[case] input: &str) {
        assert_eq!(canonical_name(input).unwrap(), "disc.gdi");
    }

    #[rstest]
    #[case("mygame(track1).bin", "track01.bin")]
    #[case("mygame(track3).raw", "track03.raw")]
    #[case("Game (USA) (Track 02).BIN", "track02.bin")]
    #[case("TRACK007.Raw", "track07.raw")]
    #[case("track 123.bin", "track123.bin")]
    #[case("track0.bin", "track00.bin")]
    #[case("track000.bin", "track00.bin")]
    #[case("10 Pin (Disc 2) Track - 4.bin", "track04.bin")]
    #[case("Track one, session 2.bin", "track02.bin")]
    #[case("track01.bin", "track01.bin")]
    #[case("track 99999999999999999999999.bin", "track99999999999999999999999.bin")]
    fn test_track_names(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(canonical_name(input).unwrap(), expected);
    }

    #[test]
    fn test_first_track_marker_wins() {
        assert_eq!(
            canonical_name("Track 3 of backtrack 9.bin").unwrap(),
            "track03.bin"
        );
    }

    #[rstest]
    #[case("mygame.bin")]
    #[case("12345.raw")]
    #[case("tracks.bin")]
    #[case("Game 1 (tr4ck 1).bin")]
    fn test_ambiguous_names(#[case] input: &str) {
        assert!(matches!(
            canonical_name(input),
            Err(GdipakError::AmbiguousName(_))
        ));
    }

    #[rstest]
    #[case("track1.txt")]
    #[case("track1")]
    #[case("track1.iso")]
    #[case(".gdi")]
    fn test_unsupported_types(#[case] input: &str) {
        assert!(matches!(
            canonical_name(input),
            Err(GdipakError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_directory_prefix_is_kept() {
        assert_eq!(
            canonical_name("/games/Track Game/Game (Track 2).bin").unwrap(),
            "/games/Track Game/track02.bin"
        );
        assert_eq!(
            canonical_name("games/Game.gdi").unwrap(),
            "games/disc.gdi"
        );
    }

    #[test]
    fn test_canonical_path() {
        let mapped = canonical_path(Path::new("/games/mygame/mygame(track3).raw")).unwrap();
        assert_eq!(mapped, PathBuf::from("/games/mygame/track03.raw"));
    }

    #[test]
    fn test_mapping_is_stable() {
        let once = canonical_name("Game (Track 5).bin").unwrap();
        assert_eq!(canonical_name(&once).unwrap(), once);
    }
}
