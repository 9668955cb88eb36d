/*!
 * GDI descriptor parsing and rewriting
 *
 * A descriptor looks like this:
 *
 * ```text
 * 3
 *  1     0 4 2352 "Game (Track 1).bin" 0
 *  2   756 0 2352 "Game (Track 2).raw" 0
 *  3 45000 4 2352 "Game (Track 3).bin" 0
 * ```
 *
 * GDEMU wants single spaces, no leading padding and file names that match the
 * canonical track names, so the table is rewritten after the files are
 * renamed.
 */

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{GdipakError, Result};
use crate::naming::canonical_name;

static TABS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\t+").unwrap());

static SPACES_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").unwrap());

static LEADING_SPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^ ").unwrap());

/// Rewrite descriptor text so it can be consumed by GDEMU.
///
/// Every quoted file name after the first line is replaced with its
/// canonical name, then horizontal whitespace is normalized. Line endings,
/// mixed `\n`/`\r\n` included, come out exactly as they went in.
pub fn rewrite_content(raw: &str) -> Result<String> {
    let replaced = replace_file_names(raw)?;
    Ok(normalize_whitespace(&replaced))
}

/// Collapse runs of tabs and spaces to a single space and drop one leading
/// space per line.
pub fn normalize_whitespace(text: &str) -> String {
    let text = TABS_REGEX.replace_all(text, " ");
    let text = SPACES_REGEX.replace_all(&text, " ");
    LEADING_SPACE_REGEX.replace_all(&text, "").into_owned()
}

fn replace_file_names(raw: &str) -> Result<String> {
    let mut output = String::with_capacity(raw.len());
    for (index, line) in raw.split_inclusive('\n').enumerate() {
        // track count
        if index == 0 {
            output.push_str(line);
            continue;
        }
        let (body, terminator) = split_terminator(line);
        output.push_str(&replace_file_name(body, index + 1)?);
        output.push_str(terminator);
    }
    Ok(output)
}

fn replace_file_name(body: &str, line: usize) -> Result<String> {
    let (start, end) = quote_span(body, line)?;
    let file_name = &body[start + 1..end];
    let mapped = canonical_name(file_name)?;
    if !body.contains(file_name) {
        return Err(GdipakError::MissingFileNameReference { line });
    }
    Ok(body.replacen(file_name, &mapped, 1))
}

/// Byte positions of the first and last double quote in a line.
fn quote_span(body: &str, line: usize) -> Result<(usize, usize)> {
    match (body.find('"'), body.rfind('"')) {
        (Some(start), Some(end)) if start != end => Ok((start, end)),
        (Some(_), Some(_)) => Err(GdipakError::UnterminatedFileNameReference { line }),
        _ => Err(GdipakError::MissingFileNameReference { line }),
    }
}

fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// One track line of a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorEntry {
    /// Track number as written in the table
    pub track: u32,
    /// Starting sector of the track
    pub offset: u64,
    /// Track type flag (0 audio, 4 data)
    pub mode: u8,
    /// Sector size, sometimes called the game number
    pub sector_size: u32,
    /// Referenced file name, without the quotes
    pub file_name: String,
    /// Trailing field after the file name
    pub trailing: String,
}

impl DescriptorEntry {
    /// Parse a single track line. `line` is the 1-based line number used in
    /// errors.
    pub fn parse(body: &str, line: usize) -> Result<Self> {
        let (start, end) = quote_span(body, line)?;
        let mut fields = body[..start].split_whitespace();
        let mut next = |field: &'static str| {
            fields
                .next()
                .ok_or(GdipakError::InvalidDescriptorEntry { line, field })
        };
        let track = parse_field(next("track")?, line, "track")?;
        let offset = parse_field(next("offset")?, line, "offset")?;
        let mode = parse_field(next("mode")?, line, "mode")?;
        let sector_size = parse_field(next("sector size")?, line, "sector size")?;

        Ok(Self {
            track,
            offset,
            mode,
            sector_size,
            file_name: body[start + 1..end].to_string(),
            trailing: body[end + 1..].trim().to_string(),
        })
    }
}

fn parse_field<T: std::str::FromStr>(value: &str, line: usize, field: &'static str) -> Result<T> {
    value
        .parse()
        .map_err(|_| GdipakError::InvalidDescriptorEntry { line, field })
}

/// A parsed descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Track count from the first line, if it is a number
    pub track_count: Option<usize>,
    /// Track table
    pub entries: Vec<DescriptorEntry>,
}

impl Descriptor {
    /// Parse descriptor text
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines();
        let track_count = lines.next().and_then(|l| l.trim().parse().ok());
        let entries = lines
            .enumerate()
            .map(|(index, body)| DescriptorEntry::parse(body, index + 2))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            track_count,
            entries,
        })
    }

    /// Read and parse a descriptor file
    pub fn read(path: &Path) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }
}

/// Rewrites a descriptor file in place, keeping a `.bak` copy of the original
/// until the new content is on disk.
#[derive(Debug, Clone)]
pub struct DescriptorRewriter {
    path: PathBuf,
    backup_path: PathBuf,
}

impl DescriptorRewriter {
    /// Create a rewriter for the descriptor at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut backup = OsString::from(path.as_os_str());
        backup.push(".bak");
        Self {
            path,
            backup_path: PathBuf::from(backup),
        }
    }

    /// Descriptor being rewritten
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the backup lives while a rewrite is in progress
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Rewrite the descriptor on disk.
    ///
    /// On success the file holds the rewritten text and the backup is gone.
    /// On failure the file holds its original bytes and the backup is gone.
    pub fn rewrite_file(&self) -> Result<()> {
        self.rewrite_with(|path, contents| fs::write(path, contents))
    }

    fn rewrite_with<W>(&self, write: W) -> Result<()>
    where
        W: FnOnce(&Path, &str) -> io::Result<()>,
    {
        let original = fs::read_to_string(&self.path)?;
        let mut backup = Backup::create(&self.backup_path, &original)?;

        let rewritten = match rewrite_content(&original) {
            Ok(rewritten) => rewritten,
            Err(err) => {
                // original was never touched
                backup.discard()?;
                return Err(err);
            }
        };

        if let Err(err) = write(&self.path, &rewritten) {
            backup.restore(&self.path)?;
            return Err(err.into());
        }

        backup.discard()?;
        debug!(path = %self.path.display(), "rewrote descriptor");
        Ok(())
    }
}

/// Copy of a descriptor's original content on disk.
///
/// `exists` is true exactly while the backup file is on disk.
struct Backup {
    path: PathBuf,
    exists: bool,
}

impl Backup {
    fn create(path: &Path, contents: &str) -> io::Result<Self> {
        if let Err(err) = fs::write(path, contents) {
            // don't leave a half-written backup behind
            let _ = fs::remove_file(path);
            return Err(err);
        }
        Ok(Self {
            path: path.to_path_buf(),
            exists: true,
        })
    }

    /// Delete the backup
    fn discard(&mut self) -> io::Result<()> {
        if self.exists {
            fs::remove_file(&self.path)?;
            self.exists = false;
        }
        Ok(())
    }

    /// Move the backup back over `original`
    fn restore(&mut self, original: &Path) -> io::Result<()> {
        if self.exists {
            fs::rename(&self.path, original)?;
            self.exists = false;
        }
        Ok(())
    }
}

impl Drop for Backup {
    fn drop(&mut self) {
        if self.exists {
            warn!(path = %self.path.display(), "descriptor backup left on disk");
        }
    }
}
