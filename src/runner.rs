/*!
 * Driving the packer over one game or a tree of games
 */

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use indicatif::ProgressBar;
use tracing::info;

use crate::config::Config;
use crate::discovery::list_subdirectories;
use crate::error::Result;
use crate::packer::Packer;
use crate::report::RunReport;
use crate::transpose::transpose;
use crate::utils::has_game_files;

/// A game directory and the directory its files are written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameJob {
    /// Directory holding the game files
    pub game_dir: PathBuf,
    /// Output directory for the canonical files
    pub out_dir: PathBuf,
}

/// Packages every game a [`Config`] points at, one after the other
pub struct Runner {
    config: Config,
    /// Progress bar, advanced once per game
    pub progress: Arc<ProgressBar>,
}

impl Runner {
    /// Create a new runner
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Self {
        Self { config, progress }
    }

    /// Work out which directories are packaged and where they go.
    ///
    /// Without recursion the input directory is the game and is written
    /// straight to the output directory. With recursion the input directory
    /// and every descendant directory that holds game files is a game, parents
    /// before children.
    ///
    /// The whole tree is listed before anything is written, so output
    /// directories created inside the input tree are never picked up.
    pub fn plan(&self) -> Result<Vec<GameJob>> {
        let Config {
            in_dir,
            out_dir,
            recursion,
            ..
        } = &self.config;

        if !recursion.is_recursive() {
            return Ok(vec![GameJob {
                game_dir: in_dir.clone(),
                out_dir: out_dir.clone(),
            }]);
        }

        let mut jobs = Vec::new();
        if has_game_files(in_dir)? {
            jobs.push(GameJob {
                game_dir: in_dir.clone(),
                out_dir: transpose(in_dir, in_dir, out_dir, *recursion)?,
            });
        }
        for dir in list_subdirectories(in_dir, None)? {
            if !has_game_files(&dir)? {
                continue;
            }
            let target = transpose(&dir, in_dir, out_dir, *recursion)?;
            jobs.push(GameJob {
                game_dir: dir,
                out_dir: target,
            });
        }
        Ok(jobs)
    }

    /// Package every planned game, stopping at the first failure
    pub fn run(&self) -> Result<RunReport> {
        let start = Instant::now();
        let jobs = self.plan()?;
        info!(games = jobs.len(), recursion = %self.config.recursion, "starting run");
        self.progress.set_length(jobs.len() as u64);

        let mut games = Vec::with_capacity(jobs.len());
        for job in &jobs {
            self.progress
                .set_message(format!("💿 {}", job.game_dir.display()));
            let mut packer = Packer::new(&job.game_dir, &job.out_dir, self.config.action)?;
            games.push(packer.package_game(self.config.name_file)?);
            self.progress.inc(1);
        }

        Ok(RunReport {
            duration: start.elapsed(),
            games,
        })
    }
}

/// Package everything `config` points at without progress output
pub fn run(config: &Config) -> Result<RunReport> {
    Runner::new(config.clone(), Arc::new(ProgressBar::hidden())).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GdipakError;
    use crate::types::{PackingAction, RecursionMode};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn config(in_dir: &Path, out_dir: &Path, recursion: RecursionMode) -> Config {
        Config {
            in_dir: in_dir.to_path_buf(),
            out_dir: out_dir.to_path_buf(),
            action: PackingAction::Copy,
            recursion,
            name_file: false,
        }
    }

    fn make_game(dir: &Path) -> std::io::Result<()> {
        fs::create_dir_all(dir)?;
        fs::write(dir.join("game.gdi"), "1\n1 0 4 2352 \"game (track 1).bin\" 0\n")?;
        fs::write(dir.join("game (track 1).bin"), b"data")
    }

    #[test]
    fn test_plan_without_recursion() -> Result<()> {
        let dir = tempdir()?;
        let runner = Runner::new(
            config(dir.path(), Path::new("/out"), RecursionMode::None),
            Arc::new(ProgressBar::hidden()),
        );
        assert_eq!(
            runner.plan()?,
            [GameJob {
                game_dir: dir.path().to_path_buf(),
                out_dir: PathBuf::from("/out"),
            }]
        );
        Ok(())
    }

    #[test]
    fn test_plan_skips_directories_without_games() -> Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("in");
        make_game(&input.join("fighting").join("game a"))?;
        make_game(&input.join("racing").join("game b"))?;
        fs::create_dir_all(input.join("empty"))?;
        fs::write(input.join("racing").join("notes.txt"), "")?;

        let runner = Runner::new(
            config(&input, Path::new("/out"), RecursionMode::FlattenStructure),
            Arc::new(ProgressBar::hidden()),
        );
        let jobs = runner.plan()?;
        let targets: Vec<_> = jobs.iter().map(|job| job.out_dir.clone()).collect();
        assert_eq!(
            targets,
            [PathBuf::from("/out/game a"), PathBuf::from("/out/game b")]
        );
        Ok(())
    }

    #[test]
    fn test_plan_includes_root_game() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().join("some game");
        make_game(&root)?;
        make_game(&root.join("some other game"))?;

        for recursion in [RecursionMode::PreserveStructure, RecursionMode::FlattenStructure] {
            let runner = Runner::new(
                config(&root, Path::new("/out"), recursion),
                Arc::new(ProgressBar::hidden()),
            );
            assert_eq!(
                runner.plan()?,
                [
                    GameJob {
                        game_dir: root.clone(),
                        out_dir: PathBuf::from("/out"),
                    },
                    GameJob {
                        game_dir: root.join("some other game"),
                        out_dir: PathBuf::from("/out/some other game"),
                    },
                ]
            );
        }
        Ok(())
    }

    #[test]
    fn test_run_preserves_structure() -> Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        make_game(&input.join("gameA").join("gameB"))?;
        fs::create_dir(&output)?;

        let report = run(&config(&input, &output, RecursionMode::PreserveStructure))?;

        assert_eq!(report.games.len(), 1);
        let game = output.join("gameA").join("gameB");
        assert!(game.join("disc.gdi").is_file());
        assert!(game.join("track01.bin").is_file());
        assert!(!output.join("gameB").exists());
        Ok(())
    }

    #[test]
    fn test_run_stops_at_first_failure() -> Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        make_game(&input.join("a"))?;
        fs::create_dir_all(input.join("b"))?;
        fs::write(input.join("b").join("orphan (track 1).bin"), b"")?;
        make_game(&input.join("c"))?;
        fs::create_dir(&output)?;

        let result = run(&config(&input, &output, RecursionMode::FlattenStructure));

        assert!(matches!(result, Err(GdipakError::MissingDescriptor(_))));
        assert!(output.join("a").join("disc.gdi").is_file());
        assert!(!output.join("c").exists());
        Ok(())
    }

    #[test]
    fn test_run_without_recursion_needs_descriptor() -> Result<()> {
        let dir = tempdir()?;
        let result = run(&config(dir.path(), dir.path(), RecursionMode::None));
        assert!(matches!(result, Err(GdipakError::MissingDescriptor(_))));
        Ok(())
    }
}
