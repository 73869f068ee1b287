use std::path::Path;

use super::{CatalogParser, Entry};
use crate::errors::ParseError;

/// Catalog parser backed by the polib crate
///
/// Compiled only with the `structured-parser` feature; otherwise every call
/// returns [`ParseError::Unavailable`] so that the caller falls back.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredParser;

impl CatalogParser for StructuredParser {
    fn name(&self) -> &'static str {
        "structured"
    }

    #[cfg(feature = "structured-parser")]
    fn parse(&self, path: &Path) -> Result<Vec<Entry>, ParseError> {
        use super::EntryBuilder;
        use polib::message::MessageView;

        use crate::translation::scheduler::panic_message;

        // polib unwraps header keys it expects, so a sparse header panics
        let catalog = std::panic::catch_unwind(|| polib::po_file::parse(path))
            .map_err(|panic| ParseError::Malformed(panic_message(panic.as_ref())))?
            .map_err(|e| ParseError::Malformed(e.to_string()))?;

        let mut builder = EntryBuilder::default();
        for message in catalog.messages() {
            builder.push(
                message.msgid().to_string(),
                Some(message.msgctxt().to_string()),
                Some(message.source().to_string()),
            );
        }
        Ok(builder.finish())
    }

    #[cfg(not(feature = "structured-parser"))]
    fn parse(&self, _path: &Path) -> Result<Vec<Entry>, ParseError> {
        Err(ParseError::Unavailable(self.name()))
    }
}
