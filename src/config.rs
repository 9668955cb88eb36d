/*!
 * Configuration handling for gdipak
 */

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_complete::Shell;

use crate::error::Result;
use crate::types::{PackingAction, RecursionMode};

/// Value of `--out-dir` meaning "same as the input directory"
pub const SAME_AS_INPUT: &str = "in-dir";

/// Mode of operation as written on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Leave the input files untouched and write new ones
    Copy,
    /// Move the input files to the output directory and edit them there
    Modify,
}

impl From<Mode> for PackingAction {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Copy => PackingAction::Copy,
            Mode::Modify => PackingAction::Move,
        }
    }
}

/// Command-line arguments for gdipak
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "gdipak",
    version = env!("CARGO_PKG_VERSION"),
    about = "Repackage GDI disc dumps into the file layout expected by GDEMU",
    long_about = "Scans a directory, and optionally its subdirectories, for a *.gdi file and the \
        *.bin/*.raw tracks it references, and writes them under the names GDEMU expects \
        (disc.gdi, track01.bin, ...).\n\n\
        Without --recursive the input directory holds the files of one game and the output \
        files are written directly to the output directory. With --recursive every \
        subdirectory holding game files is treated as a game of its own."
)]
pub struct Args {
    /// The directory to scan for *.gdi files
    #[clap(
        short,
        long,
        value_name = "ROOT_SEARCH_DIRECTORY",
        required_unless_present = "generate"
    )]
    pub in_dir: Option<PathBuf>,

    /// The directory to write results to, or 'in-dir' to use the input directory
    #[clap(
        short,
        long,
        value_name = "OUTPUT_DIRECTORY",
        required_unless_present = "generate"
    )]
    pub out_dir: Option<String>,

    /// 'copy' keeps the original files, 'modify' moves them and edits them in place
    #[clap(short, long, value_enum, ignore_case = true, required_unless_present = "generate")]
    pub mode: Option<Mode>,

    /// Search subdirectories: 0 (or no value) mirrors the input tree, 1 puts
    /// every game directly under the output directory
    #[clap(
        short,
        long,
        value_name = "MODE",
        num_args = 0..=1,
        default_missing_value = "0",
        value_parser = clap::value_parser!(u8).range(0..=1)
    )]
    pub recursive: Option<u8>,

    /// Create an empty file named after the original *.gdi file
    #[clap(short, long)]
    pub name_file: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding the game, or the games when recursive
    pub in_dir: PathBuf,

    /// Directory the canonical files are written to
    pub out_dir: PathBuf,

    /// Copy or move
    pub action: PackingAction,

    /// How nested game directories map to output directories
    pub recursion: RecursionMode,

    /// Write a name file next to each packaged game
    pub name_file: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let in_dir = args
            .in_dir
            .ok_or_else(|| crate::error!(Config, "missing --in-dir"))?;
        let out_dir = match args.out_dir.as_deref() {
            Some(SAME_AS_INPUT) => in_dir.clone(),
            Some(dir) => PathBuf::from(dir),
            None => crate::bail!(Config, "missing --out-dir"),
        };
        let mode = args
            .mode
            .ok_or_else(|| crate::error!(Config, "missing --mode"))?;
        let recursion = RecursionMode::from_level(args.recursive)
            .ok_or_else(|| crate::error!(Config, "invalid recursion mode {:?}", args.recursive))?;

        Ok(Self {
            in_dir,
            out_dir,
            action: mode.into(),
            recursion,
            name_file: args.name_file,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        crate::ensure!(
            self.in_dir.is_dir(),
            Config,
            "Input directory is not a directory: {}",
            self.in_dir.display()
        );
        crate::ensure!(
            self.out_dir.is_dir(),
            Config,
            "Output directory is not a directory: {}",
            self.out_dir.display()
        );
        Ok(())
    }
}
