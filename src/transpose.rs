/*!
 * Output locations for nested game directories
 */

use std::path::{Path, PathBuf};

use crate::error::{GdipakError, Result};
use crate::types::RecursionMode;

/// Work out where a game directory found under `in_base` is written to.
///
/// Given `game_path = /in/fighting/game`, `in_base = /in` and
/// `out_base = /out`:
/// - [`RecursionMode::PreserveStructure`] gives `/out/fighting/game`
/// - [`RecursionMode::FlattenStructure`] gives `/out/game`
/// - [`RecursionMode::None`] gives `/out`
///
/// Nothing is created on disk.
pub fn transpose(
    game_path: &Path,
    in_base: &Path,
    out_base: &Path,
    mode: RecursionMode,
) -> Result<PathBuf> {
    let local = game_path
        .strip_prefix(in_base)
        .map_err(|_| GdipakError::NotUnderBase {
            path: game_path.to_path_buf(),
            base: in_base.to_path_buf(),
        })?;

    Ok(match mode {
        RecursionMode::PreserveStructure => out_base.join(local),
        RecursionMode::FlattenStructure => match local.file_name() {
            Some(name) => out_base.join(name),
            None => out_base.to_path_buf(),
        },
        RecursionMode::None => out_base.to_path_buf(),
    })
}
