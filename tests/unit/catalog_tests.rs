/*!
 * Tests for catalog parsing
 */

use anyhow::Result;
use std::fs;
use std::path::Path;
use potrad::catalog::{self, fallback, CatalogParser, Entry, FallbackParser};
use potrad::errors::{AppError, ParseError};
use crate::common;

/// Parser that rejects every catalog as malformed
struct RejectingParser;

impl CatalogParser for RejectingParser {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    fn parse(&self, _path: &Path) -> Result<Vec<Entry>, ParseError> {
        Err(ParseError::Malformed("unexpected token".to_string()))
    }
}

/// Test that the sample catalog yields its entries in file order
#[test]
fn test_parse_catalog_withSampleCatalog_shouldKeepFileOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "messages.po", common::SAMPLE_CATALOG)?;

    let entries = catalog::parse_catalog(&path)?;

    let texts: Vec<_> = entries.iter().map(|e| e.source_text.as_str()).collect();
    assert_eq!(texts, common::SAMPLE_TEXTS);
    assert_eq!(entries.iter().map(|e| e.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(entries[1].context.as_deref(), Some("menu"));
    assert_eq!(entries[0].context, None);

    Ok(())
}

/// Test that the header entry never becomes a translatable entry
#[test]
fn test_parse_catalog_withHeaderOnly_shouldReportNoEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_catalog(temp_dir.path(), "empty.po", &[])?;

    let err = catalog::parse_catalog(&path).unwrap_err();

    assert!(matches!(err, ParseError::NoEntries(_)), "unexpected error: {}", err);
    Ok(())
}

/// Test that a missing catalog is reported as an I/O error with exit code 2
/// Test that a header with only Content-Type still parses instead of aborting
#[test]
fn test_parse_catalog_withContentTypeOnlyHeader_shouldFallBack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_catalog(temp_dir.path(), "messages.po", &["Hello", "World"])?;

    let parsed = std::panic::catch_unwind(|| catalog::parse_catalog(&path));

    let entries = parsed.map_err(|_| anyhow::anyhow!("parse_catalog panicked"))??;
    let texts: Vec<_> = entries.iter().map(|e| e.source_text.as_str()).collect();
    assert_eq!(texts, vec!["Hello", "World"]);
    assert_eq!(entries.iter().map(|e| e.index).collect::<Vec<_>>(), vec![0, 1]);
    Ok(())
}

#[test]
fn test_parse_catalog_withMissingFile_shouldFailWithIo() {
    let err = catalog::parse_catalog("does/not/exist.po").unwrap_err();

    assert!(matches!(err, ParseError::Io { .. }));
    assert_eq!(AppError::from(err).exit_code(), 2);
}

/// Test that a catalog that is not UTF-8 cannot be parsed by either strategy
#[test]
fn test_parse_catalog_withInvalidUtf8_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("latin1.po");
    fs::write(&path, b"msgid \"Caf\xe9\"\nmsgstr \"\"\n")?;

    assert!(catalog::parse_catalog(&path).is_err());
    Ok(())
}

/// Test that a rejected catalog is still read by the line-oriented parser
#[test]
fn test_parse_with_rejectedByPrimary_shouldUseFallback() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_catalog(temp_dir.path(), "messages.po", &["One", "Two"])?;

    let entries = catalog::parse_with(&path, &RejectingParser, &FallbackParser)?;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].source_text, "Two");
    Ok(())
}

/// Test plural forms, obsolete entries, escapes and references in the fallback scanner
#[test]
fn test_fallback_withPluralsAndObsoleteEntries_shouldKeepMsgidsOnly() {
    let content = r#"#: src/a.c:1
#: src/b.c:2
msgid "One file"
msgid_plural "%d files"
msgstr[0] ""
msgstr[1] ""

#~ msgid "Old entry"
#~ msgstr "Entrada vieja"

msgid "Tab\there \"quoted\""
msgstr ""
"#;

    let entries = fallback::parse_catalog_str(content);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].source_text, "One file");
    assert_eq!(entries[0].location.as_deref(), Some("src/a.c:1 src/b.c:2"));
    assert_eq!(entries[1].source_text, "Tab\there \"quoted\"");
    assert_eq!(entries[1].index, 1);
}

/// Test that continuation lines of a context and a msgid are joined
#[test]
fn test_fallback_withMultiLineContext_shouldJoinParts() {
    let content = "msgctxt \"\"\n\"tool\"\n\"bar\"\nmsgid \"\"\n\"Save \"\n\"all\"\nmsgstr \"\"\n";

    let entries = fallback::parse_catalog_str(content);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].context.as_deref(), Some("toolbar"));
    assert_eq!(entries[0].source_text, "Save all");
}
