/*!
 * Catalog reading.
 *
 * A catalog is read into an ordered list of [`Entry`] values by one of two
 * interchangeable strategies:
 *
 * - `structured`: delegates to the polib crate (cargo feature `structured-parser`)
 * - `fallback`: a tolerant line-oriented scanner
 *
 * [`parse_catalog`] tries the structured strategy first and falls back to the
 * line-oriented one on a recoverable [`ParseError`].
 */

use log::{debug, warn};
use std::fs;
use std::path::Path;

use crate::errors::ParseError;

pub mod fallback;
pub mod structured;

pub use self::fallback::FallbackParser;
pub use self::structured::StructuredParser;

/// One translatable message of a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// 0-based position among the kept entries, in file order
    pub index: usize,

    /// The msgid
    pub source_text: String,

    /// The msgctxt, if any
    pub context: Option<String>,

    /// `#:` source reference, informational only
    pub location: Option<String>,
}

impl Entry {
    pub fn new(index: usize, source_text: impl Into<String>) -> Self {
        Self {
            index,
            source_text: source_text.into(),
            context: None,
            location: None,
        }
    }

    /// Entries without text are passed through and never sent to the service
    pub fn is_empty(&self) -> bool {
        self.source_text.is_empty()
    }
}

/// Builds a dense index sequence out of raw messages in file order
#[derive(Debug, Default)]
pub(crate) struct EntryBuilder {
    entries: Vec<Entry>,
}

impl EntryBuilder {
    /// Record a message; empty msgids (the catalog header) are dropped
    pub(crate) fn push(&mut self, source_text: String, context: Option<String>, location: Option<String>) {
        if source_text.is_empty() {
            return;
        }
        let index = self.entries.len();
        self.entries.push(Entry {
            index,
            source_text,
            context: context.filter(|c| !c.is_empty()),
            location: location.filter(|l| !l.is_empty()),
        });
    }

    pub(crate) fn finish(self) -> Vec<Entry> {
        self.entries
    }
}

/// A strategy that turns a catalog file into entries
pub trait CatalogParser: Send + Sync {
    /// Name used in log messages
    fn name(&self) -> &'static str;

    /// Parse the file at `path`
    fn parse(&self, path: &Path) -> Result<Vec<Entry>, ParseError>;
}

/// Parse a catalog with the structured parser, falling back to the line scanner
pub fn parse_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<Entry>, ParseError> {
    parse_with(path.as_ref(), &StructuredParser, &FallbackParser)
}

/// Parse with an explicit primary and secondary strategy
pub fn parse_with(
    path: &Path,
    primary: &dyn CatalogParser,
    secondary: &dyn CatalogParser,
) -> Result<Vec<Entry>, ParseError> {
    // An unreadable file is fatal no matter which strategy runs
    fs::metadata(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match primary.parse(path) {
        Ok(entries) if !entries.is_empty() => {
            debug!("{} parser found {} entries", primary.name(), entries.len());
            return Ok(entries);
        }
        Ok(_) => {
            warn!("{} parser found no entries, trying {} parser", primary.name(), secondary.name());
        }
        Err(e) if e.allows_fallback() => {
            warn!("{} parser failed ({}), trying {} parser", primary.name(), e, secondary.name());
        }
        Err(e) => return Err(e),
    }

    let entries = secondary.parse(path)?;
    if entries.is_empty() {
        return Err(ParseError::NoEntries(path.to_path_buf()));
    }
    debug!("{} parser found {} entries", secondary.name(), entries.len());
    Ok(entries)
}

/// Read a catalog as UTF-8 text
pub(crate) fn read_catalog(path: &Path) -> Result<String, ParseError> {
    let bytes = fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|e| ParseError::Encoding(e.to_string()))
}
