use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use super::{read_catalog, CatalogParser, Entry, EntryBuilder};
use crate::errors::ParseError;

// @module: Line-oriented catalog scanner

// @const: Start of a message id
static MSGID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^msgid\s+"(.*)"\s*$"#).unwrap()
});

// @const: Start of a message context
static MSGCTXT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^msgctxt\s+"(.*)"\s*$"#).unwrap()
});

// @const: Quoted continuation line
static CONTINUATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^"(.*)"\s*$"#).unwrap()
});

/// Which keyword the current quoted continuation lines belong to
#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Context,
    Id,
    /// msgstr, msgid_plural and friends, whose content is ignored
    Other,
}

/// Tolerant parser that scans a catalog line by line
///
/// Used when the structured parser is unavailable or rejects the file. It
/// concatenates multi-line strings, decodes the usual escapes and ignores
/// comment lines, including obsolete `#~` entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackParser;

impl CatalogParser for FallbackParser {
    fn name(&self) -> &'static str {
        "line-oriented"
    }

    fn parse(&self, path: &Path) -> Result<Vec<Entry>, ParseError> {
        let content = read_catalog(path)?;
        Ok(parse_catalog_str(&content))
    }
}

/// Scanner state for one message block
#[derive(Default)]
struct Scanner {
    builder: EntryBuilder,
    field: Option<Field>,
    context: Option<String>,
    msgid: Option<String>,
    location: Option<String>,
}

impl Scanner {
    /// Emit the pending msgid together with the context and location seen before it
    fn finish_message(&mut self) {
        if let Some(msgid) = self.msgid.take() {
            self.builder.push(msgid, self.context.take(), self.location.take());
        }
    }

    /// Blank line: nothing of the current block carries over
    fn finish_block(&mut self) {
        self.finish_message();
        self.context = None;
        self.location = None;
        self.field = None;
    }

    fn add_location(&mut self, reference: &str) {
        let reference = reference.trim();
        if reference.is_empty() {
            return;
        }
        match &mut self.location {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(reference);
            }
            None => self.location = Some(reference.to_string()),
        }
    }

    fn line(&mut self, line: &str) {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            self.finish_block();
            return;
        }

        if let Some(comment) = trimmed.strip_prefix('#') {
            self.finish_message();
            self.field = None;
            if let Some(reference) = comment.strip_prefix(':') {
                self.add_location(reference);
            }
            return;
        }

        if let Some(caps) = CONTINUATION_REGEX.captures(trimmed) {
            let part = unescape(&caps[1]);
            match self.field {
                Some(Field::Id) => {
                    if let Some(msgid) = &mut self.msgid {
                        msgid.push_str(&part);
                    }
                }
                Some(Field::Context) => {
                    if let Some(context) = &mut self.context {
                        context.push_str(&part);
                    }
                }
                Some(Field::Other) | None => {}
            }
            return;
        }

        self.finish_message();

        if let Some(caps) = MSGCTXT_REGEX.captures(trimmed) {
            self.context = Some(unescape(&caps[1]));
            self.field = Some(Field::Context);
        } else if let Some(caps) = MSGID_REGEX.captures(trimmed) {
            self.msgid = Some(unescape(&caps[1]));
            self.field = Some(Field::Id);
        } else {
            self.field = Some(Field::Other);
        }
    }
}

/// Parse catalog text into entries
pub fn parse_catalog_str(content: &str) -> Vec<Entry> {
    let mut scanner = Scanner::default();
    for line in content.lines() {
        scanner.line(line);
    }
    scanner.finish_block();
    scanner.builder.finish()
}

/// Decode the C-style escapes used inside catalog strings
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
