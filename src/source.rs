use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::ExtractError;
use crate::options::PageSelection;
use crate::position_log::{format_position_log, parse_position_log};
use crate::token::Token;
use crate::warning::{ExtractWarning, WarningCode};

pub const TEXTS_DIR: &str = "texts";
pub const FULL_TEXT_FILE: &str = "plans_text_optimized.txt";

/// An extracted-data directory: per-page position logs and page texts under
/// `texts/`, plus the whole-document text artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedData {
    root: PathBuf,
}

fn read_optional(path: &Path) -> Result<Option<String>, ExtractError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error.into()),
    }
}

impl ExtractedData {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn texts_dir(&self) -> PathBuf {
        self.root.join(TEXTS_DIR)
    }

    #[must_use]
    pub fn position_log_path(&self, page: u32) -> PathBuf {
        self.texts_dir()
            .join(format!("page_{page}_text_positions.txt"))
    }

    #[must_use]
    pub fn page_text_path(&self, page: u32) -> PathBuf {
        self.texts_dir().join(format!("page_{page}_text.txt"))
    }

    #[must_use]
    pub fn full_text_path(&self) -> PathBuf {
        self.texts_dir().join(FULL_TEXT_FILE)
    }

    /// Tokens from every selected page's position log, in page order. A page
    /// without a log adds a warning and contributes nothing.
    pub fn read_position_tokens(
        &self,
        pages: &PageSelection,
        warnings: &mut Vec<ExtractWarning>,
    ) -> Result<Vec<Token>, ExtractError> {
        let mut tokens = Vec::new();
        for page in pages.iter() {
            let path = self.position_log_path(page);
            match read_optional(&path)? {
                Some(log) => {
                    let parsed = parse_position_log(&log);
                    tracing::debug!(page, tokens = parsed.len(), "read position log");
                    tokens.extend(parsed);
                }
                None => warnings.push(
                    ExtractWarning::new(WarningCode::PositionLogMissing, "no position log for page")
                        .with_page(page)
                        .with_path(&path)
                        .logged(),
                ),
            }
        }
        Ok(tokens)
    }

    /// The whole-document text, `None` when the artifact is absent.
    pub fn read_full_text(&self) -> Result<Option<String>, ExtractError> {
        read_optional(&self.full_text_path())
    }

    /// Writes every page of `document` into this directory's layout and
    /// returns the number of pages written.
    pub fn write_document(&self, document: &Document) -> Result<usize, ExtractError> {
        fs::create_dir_all(self.texts_dir())?;

        let pages = document.pages();
        for page in &pages {
            fs::write(
                self.position_log_path(page.page_number),
                format_position_log(&page.tokens),
            )?;
            fs::write(self.page_text_path(page.page_number), page.text)?;
        }
        fs::write(self.full_text_path(), document.full_text())?;

        tracing::debug!(pages = pages.len(), root = %self.root.display(), "exported document");
        Ok(pages.len())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use serde_json::Map;

    use super::ExtractedData;
    use crate::document::{Document, Element};
    use crate::options::PageSelection;
    use crate::token::Token;
    use crate::warning::WarningCode;

    #[test]
    fn missing_pages_are_warned_and_skipped() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let data = ExtractedData::new(dir.path());
        fs::create_dir_all(data.texts_dir()).expect("texts dir should be created");
        fs::write(
            data.position_log_path(2),
            "Text: ATM, Position: (10, 20), Size: 40x12, Confidence: 95\n",
        )
        .expect("log should be written");

        let mut warnings = Vec::new();
        let tokens = data
            .read_position_tokens(&PageSelection::range(1, 2), &mut warnings)
            .expect("reading should succeed");

        assert_eq!(tokens, vec![Token::new("ATM", (10, 20), (40, 12), 95.0)]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::PositionLogMissing);
        assert_eq!(warnings[0].page, Some(1));
    }

    #[test]
    fn absent_full_text_is_none() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let data = ExtractedData::new(dir.path());
        assert_eq!(data.read_full_text().expect("absence is not an error"), None);
    }

    #[test]
    fn export_writes_readable_layout() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let data = ExtractedData::new(dir.path());
        let token = Token::new("PNL-1", (5, 6), (70, 14), 88.0);
        let document = Document::from_pages(
            Map::new(),
            vec![
                (0, vec![Element::page(0, "first", std::slice::from_ref(&token))]),
                (1, vec![Element::page(1, "second", &[])]),
            ],
        );

        let written = data.write_document(&document).expect("export should succeed");
        assert_eq!(written, 2);

        let mut warnings = Vec::new();
        let tokens = data
            .read_position_tokens(&PageSelection::range(1, 2), &mut warnings)
            .expect("reading should succeed");
        assert_eq!(tokens, vec![token]);
        assert!(warnings.is_empty());

        assert_eq!(
            fs::read_to_string(data.page_text_path(2)).expect("page text should exist"),
            "second"
        );
        assert_eq!(
            data.read_full_text().expect("full text should read"),
            Some(document.full_text())
        );
    }
}
