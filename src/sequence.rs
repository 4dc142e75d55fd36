//! Image-sequence discovery and ordering.
//!
//! A time-lapse is a directory of files named `image_0001.png`,
//! `image_0002.png`, and so on. [`FramePattern`] describes that naming
//! scheme and [`ImageSequence`] lists a directory, keeps the matching files
//! and orders them by their sequence number.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use timelapse::{FramePattern, ImageSequence, TimelapseError};
//!
//! let pattern = FramePattern::numbered("image_", 4, "png")?;
//! let sequence = ImageSequence::discover(Path::new("renders"), &pattern)?;
//! for entry in sequence.entries() {
//!     println!("{} -> {}", entry.number, entry.path.display());
//! }
//! # Ok::<(), TimelapseError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::TimelapseError;

/// Filename pattern for a numbered frame sequence.
///
/// A name matches when it consists of exactly `prefix`, a run of decimal
/// digits, a dot and `extension`. The digit run is either a fixed width
/// (zero-padded numbering) or any non-empty width.
#[derive(Debug, Clone)]
pub struct FramePattern {
    prefix: String,
    digits: Option<usize>,
    extension: String,
    regex: Regex,
}

impl FramePattern {
    /// Create a pattern.
    ///
    /// `digits` of `None` accepts sequence numbers of any width.
    ///
    /// # Errors
    ///
    /// [`TimelapseError::InvalidConfiguration`] if the extension is empty,
    /// the digit width is zero, or the resulting expression cannot compile.
    pub fn new(
        prefix: impl Into<String>,
        digits: Option<usize>,
        extension: impl Into<String>,
    ) -> Result<Self, TimelapseError> {
        let prefix = prefix.into();
        let extension = extension.into().trim_start_matches('.').to_string();

        if extension.is_empty() {
            return Err(TimelapseError::InvalidConfiguration(
                "frame extension cannot be empty".to_string(),
            ));
        }
        if digits == Some(0) {
            return Err(TimelapseError::InvalidConfiguration(
                "sequence number width must be at least 1".to_string(),
            ));
        }

        let number = match digits {
            Some(width) => format!(r"(\d{{{width}}})"),
            None => r"(\d+)".to_string(),
        };
        let expression = format!(
            r"^{}{number}\.{}$",
            regex::escape(&prefix),
            regex::escape(&extension),
        );
        let regex = Regex::new(&expression).map_err(|e| {
            TimelapseError::InvalidConfiguration(format!("bad frame pattern {expression}: {e}"))
        })?;

        Ok(Self {
            prefix,
            digits,
            extension,
            regex,
        })
    }

    /// Fixed-width pattern, e.g. `numbered("image_", 4, "bmp")` for
    /// `image_0001.bmp`.
    pub fn numbered(
        prefix: impl Into<String>,
        digits: usize,
        extension: impl Into<String>,
    ) -> Result<Self, TimelapseError> {
        Self::new(prefix, Some(digits), extension)
    }

    /// The literal filename prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Width of the sequence number, or `None` for any width.
    pub fn digits(&self) -> Option<usize> {
        self.digits
    }

    /// File extension without the leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Whether `file_name` belongs to the sequence.
    pub fn is_match(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    /// Parse the sequence number out of a matching file name.
    ///
    /// Returns `None` when the name does not match or the number does not
    /// fit in a `u64`.
    pub fn sequence_number(&self, file_name: &str) -> Option<u64> {
        self.regex
            .captures(file_name)
            .and_then(|captures| captures.get(1))
            .and_then(|digits| digits.as_str().parse().ok())
    }
}

impl Display for FramePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let placeholder = match self.digits {
            Some(width) => "N".repeat(width),
            None => "N+".to_string(),
        };
        write!(f, "{}{placeholder}.{}", self.prefix, self.extension)
    }
}

/// One frame file of a discovered sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceEntry {
    /// Sequence number parsed from the file name.
    pub number: u64,
    /// Bare file name, e.g. `image_0007.png`.
    pub file_name: String,
    /// Full path to the file.
    pub path: PathBuf,
}

/// An ordered list of frame files from one directory.
///
/// Entries are ordered by sequence number, with the file name as a
/// tie-break (`image_7.png` and `image_007.png` parse to the same number).
#[derive(Debug, Clone)]
pub struct ImageSequence {
    directory: PathBuf,
    entries: Vec<SequenceEntry>,
}

impl ImageSequence {
    /// List `directory` (non-recursively) and collect the files matching
    /// `pattern`.
    ///
    /// # Errors
    ///
    /// - [`TimelapseError::DirectoryNotFound`] if the directory is missing
    ///   or unreadable.
    /// - [`TimelapseError::NoMatchingFiles`] if nothing matches.
    /// - [`TimelapseError::IoError`] if an entry cannot be read mid-listing.
    pub fn discover(directory: &Path, pattern: &FramePattern) -> Result<Self, TimelapseError> {
        let listing =
            fs::read_dir(directory).map_err(|e| TimelapseError::DirectoryNotFound {
                path: directory.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut names = Vec::new();
        for entry in listing {
            let entry = entry?;
            // Symlinks are kept unresolved; a dangling one fails at decode.
            if entry.file_type()?.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => log::debug!("Skipping non UTF-8 file name {name:?}"),
            }
        }

        let sequence = Self::from_file_names(directory, names, pattern);
        if sequence.is_empty() {
            return Err(TimelapseError::NoMatchingFiles {
                directory: directory.to_path_buf(),
                pattern: pattern.to_string(),
            });
        }

        log::info!(
            "Discovered {} frames matching {} in {:?}",
            sequence.len(), pattern, directory,
        );
        Ok(sequence)
    }

    /// Build a sequence from already-listed file names.
    ///
    /// Names that do not match `pattern` are dropped. The result may be
    /// empty.
    pub fn from_file_names<I, S>(directory: &Path, names: I, pattern: &FramePattern) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<SequenceEntry> = names
            .into_iter()
            .map(Into::<String>::into)
            .filter_map(|file_name| {
                if !pattern.is_match(&file_name) {
                    return None;
                }
                let Some(number) = pattern.sequence_number(&file_name) else {
                    log::warn!("Skipping {file_name}: sequence number out of range");
                    return None;
                };
                Some(SequenceEntry {
                    number,
                    path: directory.join(&file_name),
                    file_name,
                })
            })
            .collect();

        entries.sort_by(|a, b| {
            a.number
                .cmp(&b.number)
                .then_with(|| a.file_name.cmp(&b.file_name))
        });

        Self {
            directory: directory.to_path_buf(),
            entries,
        }
    }

    /// The directory the sequence was read from.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Entries in playback order.
    pub fn entries(&self) -> &[SequenceEntry] {
        &self.entries
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no file matched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First frame in playback order.
    pub fn first(&self) -> Option<&SequenceEntry> {
        self.entries.first()
    }

    /// Last frame in playback order.
    pub fn last(&self) -> Option<&SequenceEntry> {
        self.entries.last()
    }

    /// File names in playback order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.file_name.as_str())
    }
}
