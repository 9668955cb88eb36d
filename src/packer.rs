/*!
 * Packaging a single game directory
 *
 * A [`Packer`] is built for one game directory, checks that it holds exactly
 * one descriptor, then copies or moves every game file to its canonical name
 * in the output directory and rewrites the descriptor there.
 */

use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::descriptor::{Descriptor, DescriptorRewriter};
use crate::discovery::list_game_files;
use crate::error::{GdipakError, Result, ResultExt};
use crate::naming::canonical_name;
use crate::report::{PackReport, PackedFile};
use crate::types::{FileRole, GameFile, PackingAction};

/// What to do with a source file once its output path is known
pub trait FileAction {
    /// Short verb used in logs and errors
    fn name(&self) -> &'static str;

    /// Produce `to` from `from`
    fn apply(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// Whether `from` and `to` name the same file on disk, however they are
/// spelled. A missing `to` is never the same file.
fn is_same_file(from: &Path, to: &Path) -> io::Result<bool> {
    if from == to {
        return Ok(true);
    }
    match fs::canonicalize(to) {
        Ok(target) => Ok(fs::canonicalize(from)? == target),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Copies files, leaving the sources in place
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyAction;

impl FileAction for CopyAction {
    fn name(&self) -> &'static str {
        "copy"
    }

    fn apply(&self, from: &Path, to: &Path) -> io::Result<()> {
        // fs::copy truncates the target before reading the source
        if is_same_file(from, to)? {
            return Ok(());
        }
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(from, to)?;
        Ok(())
    }
}

/// Moves files; a move inside one directory is a plain rename
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveAction;

impl FileAction for MoveAction {
    fn name(&self) -> &'static str {
        "move"
    }

    fn apply(&self, from: &Path, to: &Path) -> io::Result<()> {
        if is_same_file(from, to)? {
            return Ok(());
        }
        let same_dir = from.parent() == to.parent();
        if !same_dir {
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent)?;
            }
        }
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            // most likely a different file system
            Err(err) if !same_dir => {
                debug!(error = %err, from = %from.display(), "rename failed, copying instead");
                fs::copy(from, to)?;
                fs::remove_file(from)
            }
            Err(err) => Err(err),
        }
    }
}

impl FileAction for PackingAction {
    fn name(&self) -> &'static str {
        match self {
            PackingAction::Copy => CopyAction.name(),
            PackingAction::Move => MoveAction.name(),
        }
    }

    fn apply(&self, from: &Path, to: &Path) -> io::Result<()> {
        match self {
            PackingAction::Copy => CopyAction.apply(from, to),
            PackingAction::Move => MoveAction.apply(from, to),
        }
    }
}

/// Lifecycle of a [`Packer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackerState {
    /// Game directory checked, nothing written yet
    Validated,
    /// [`Packer::package_game`] has run to completion
    Packaged,
}

/// Packages the files of one game directory
#[derive(Debug)]
pub struct Packer<A = PackingAction> {
    game_dir: PathBuf,
    out_dir: PathBuf,
    files: Vec<GameFile>,
    descriptor: GameFile,
    action: A,
    state: PackerState,
}

impl<A: FileAction> Packer<A> {
    /// Discover the game files in `game_dir` and check there is exactly one
    /// descriptor among them.
    ///
    /// # Errors
    /// [`GdipakError::MissingDescriptor`] or
    /// [`GdipakError::MultipleDescriptors`], or an I/O error while listing.
    pub fn new(game_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>, action: A) -> Result<Self> {
        let game_dir = game_dir.into();
        let files = list_game_files(&game_dir)?;

        let mut descriptors = files.iter().filter(|file| file.is_descriptor());
        let descriptor = match (descriptors.next(), descriptors.next()) {
            (None, _) => return Err(GdipakError::MissingDescriptor(game_dir)),
            (Some(_), Some(_)) => return Err(GdipakError::MultipleDescriptors(game_dir)),
            (Some(descriptor), None) => descriptor.clone(),
        };

        Ok(Self {
            game_dir,
            out_dir: out_dir.into(),
            files,
            descriptor,
            action,
            state: PackerState::Validated,
        })
    }

    /// Directory the game files were found in
    pub fn game_dir(&self) -> &Path {
        &self.game_dir
    }

    /// Directory the canonical files are written to
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Every game file found at construction
    pub fn files(&self) -> &[GameFile] {
        &self.files
    }

    /// The descriptor found at construction
    pub fn descriptor(&self) -> &GameFile {
        &self.descriptor
    }

    /// Current lifecycle state
    pub fn state(&self) -> PackerState {
        self.state
    }

    /// Copy or move every game file to its canonical name and rewrite the
    /// descriptor in the output directory.
    ///
    /// With `create_name_file` an empty file named after the original
    /// descriptor (without extension) is written to the output directory.
    ///
    /// Not transactional: when a file fails, the files handled before it stay
    /// where they were put.
    pub fn package_game(&mut self, create_name_file: bool) -> Result<PackReport> {
        info!(
            game = %self.game_dir.display(),
            out = %self.out_dir.display(),
            action = self.action.name(),
            files = self.files.len(),
            "packaging game"
        );

        let mut packed = Vec::with_capacity(self.files.len());
        let mut outputs = HashSet::new();
        for file in &self.files {
            let output = self.out_dir.join(canonical_name(&file.file_name())?);
            if !outputs.insert(output.clone()) {
                warn!(output = %output.display(), "several files map to the same output name");
            }

            self.action
                .apply(&file.path, &output)
                .map_err(|source| GdipakError::FileAction {
                    action: self.action.name(),
                    from: file.path.clone(),
                    to: output.clone(),
                    source,
                })?;
            debug!(from = %file.path.display(), to = %output.display(), "{}", self.action.name());

            if FileRole::from_path(&output) == Some(FileRole::Descriptor) {
                DescriptorRewriter::new(&output).rewrite_file()?;
                self.check_references(&output, &outputs);
            }

            packed.push(PackedFile {
                source: file.path.clone(),
                output: output.clone(),
                role: file.role,
                bytes: fs::metadata(&output)?.len(),
            });
        }

        let name_file = if create_name_file {
            Some(self.write_name_file()?)
        } else {
            None
        };

        self.state = PackerState::Packaged;
        Ok(PackReport {
            game_dir: self.game_dir.clone(),
            output_dir: self.out_dir.clone(),
            action: self.action.name(),
            files: packed,
            name_file,
        })
    }

    /// Warn about descriptor entries that point at files this game does not
    /// produce. Only files known by name are considered.
    fn check_references(&self, descriptor: &Path, outputs: &HashSet<PathBuf>) {
        let expected: HashSet<PathBuf> = self
            .files
            .iter()
            .filter_map(|file| canonical_name(&file.file_name()).ok())
            .map(|name| self.out_dir.join(name))
            .chain(outputs.iter().cloned())
            .collect();

        match Descriptor::read(descriptor) {
            Ok(parsed) => {
                for entry in parsed.entries {
                    if !expected.contains(&self.out_dir.join(&entry.file_name)) {
                        warn!(
                            descriptor = %descriptor.display(),
                            track = entry.track,
                            file = %entry.file_name,
                            "descriptor references a file that is not part of the game"
                        );
                    }
                }
            }
            Err(err) => warn!(descriptor = %descriptor.display(), error = %err, "could not parse rewritten descriptor"),
        }
    }

    fn write_name_file(&self) -> Result<PathBuf> {
        let stem = self.descriptor.path.file_stem().unwrap_or_default();
        let path = self.out_dir.join(stem);
        fs::create_dir_all(&self.out_dir)?;
        File::create(&path).with_context(|| format!("writing name file {}", path.display()))?;
        debug!(path = %path.display(), "wrote name file");
        Ok(path)
    }
}
