/*!
 * Reporting functionality for gdipak
 *
 * Collects what each packaged game produced and renders a summary with the
 * tabled library.
 */

use std::path::PathBuf;
use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::FileRole;
use crate::utils::format_file_size;

/// One game file written to the output directory
#[derive(Debug, Clone)]
pub struct PackedFile {
    /// Original file
    pub source: PathBuf,
    /// File under its canonical name
    pub output: PathBuf,
    /// Descriptor or track
    pub role: FileRole,
    /// Size of the output file
    pub bytes: u64,
}

/// Result of packaging one game directory
#[derive(Debug, Clone)]
pub struct PackReport {
    /// Game directory that was packaged
    pub game_dir: PathBuf,
    /// Directory the canonical files were written to
    pub output_dir: PathBuf,
    /// Name of the action applied to each file
    pub action: &'static str,
    /// Files in the order they were handled
    pub files: Vec<PackedFile>,
    /// Name file, when one was requested
    pub name_file: Option<PathBuf>,
}

impl PackReport {
    /// Number of track files written
    pub fn track_count(&self) -> usize {
        self.files
            .iter()
            .filter(|file| file.role == FileRole::Track)
            .count()
    }

    /// Total size of the written files
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|file| file.bytes).sum()
    }
}

/// Statistics for a whole run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Time taken
    pub duration: Duration,
    /// One entry per packaged game
    pub games: Vec<PackReport>,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for packaging results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string for a run
    pub fn generate_report(&self, report: &RunReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &RunReport) {
        println!("\n{}", self.generate_report(report));
    }

    fn style(table: &mut Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }

    fn create_summary_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let files: usize = report.games.iter().map(|game| game.files.len()).sum();
        let bytes: u64 = report.games.iter().map(PackReport::total_bytes).sum();

        let rows = vec![
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "💿 Games Packaged".to_string(),
                value: report.games.len().to_string(),
            },
            SummaryRow {
                key: "📄 Files Written".to_string(),
                value: files.to_string(),
            },
            SummaryRow {
                key: "📦 Total Size".to_string(),
                value: format_file_size(bytes),
            },
        ];

        Self::style(&mut Table::new(rows))
    }

    fn create_games_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct GameRow {
            #[tabled(rename = "Game")]
            game: String,

            #[tabled(rename = "Output")]
            output: String,

            #[tabled(rename = "Action")]
            action: String,

            #[tabled(rename = "Tracks")]
            tracks: usize,

            #[tabled(rename = "Size")]
            size: String,
        }

        let rows: Vec<GameRow> = report
            .games
            .iter()
            .map(|game| GameRow {
                game: game.game_dir.display().to_string(),
                output: game.output_dir.display().to_string(),
                action: game.action.to_string(),
                tracks: game.track_count(),
                size: format_file_size(game.total_bytes()),
            })
            .collect();

        Self::style(&mut Table::new(rows))
    }

    fn generate_console_report(&self, report: &RunReport) -> String {
        if report.games.is_empty() {
            return format!(
                "⚠️  NO GAMES FOUND\n{}",
                self.create_summary_table(report)
            );
        }
        format!(
            "📋  PACKAGED GAMES\n{}\n\n✅  PACKAGING COMPLETE\n{}",
            self.create_games_table(report),
            self.create_summary_table(report)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(name: &str, sizes: &[u64]) -> PackReport {
        let mut files = vec![PackedFile {
            source: PathBuf::from(format!("/in/{name}/{name}.gdi")),
            output: PathBuf::from(format!("/out/{name}/disc.gdi")),
            role: FileRole::Descriptor,
            bytes: 100,
        }];
        for (index, size) in sizes.iter().enumerate() {
            files.push(PackedFile {
                source: PathBuf::from(format!("/in/{name}/{name}(track{}).bin", index + 1)),
                output: PathBuf::from(format!("/out/{name}/track{:02}.bin", index + 1)),
                role: FileRole::Track,
                bytes: *size,
            });
        }
        PackReport {
            game_dir: PathBuf::from(format!("/in/{name}")),
            output_dir: PathBuf::from(format!("/out/{name}")),
            action: "copy",
            files,
            name_file: None,
        }
    }

    #[test]
    fn test_pack_report_totals() {
        let report = game("mygame", &[1024, 2048]);
        assert_eq!(report.track_count(), 2);
        assert_eq!(report.total_bytes(), 3172);
    }

    #[test]
    fn test_console_report_lists_games() {
        let report = RunReport {
            duration: Duration::from_millis(12),
            games: vec![game("first", &[1024]), game("second", &[2048, 2048])],
        };
        let text = Reporter::new(ReportFormat::ConsoleTable).generate_report(&report);

        assert!(text.contains("PACKAGED GAMES"));
        assert!(text.contains("/in/first"));
        assert!(text.contains("/out/second"));
        assert!(text.contains("Games Packaged"));
        assert!(text.contains(&format_file_size(100 + 1024 + 100 + 4096)));
    }

    #[test]
    fn test_console_report_without_games() {
        let text = Reporter::new(ReportFormat::ConsoleTable).generate_report(&RunReport::default());
        assert!(text.contains("NO GAMES FOUND"));
        assert!(!text.contains("PACKAGED GAMES"));
    }
}
