use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCode {
    PositionLogMissing,
    FullTextMissing,
    AtmTableNotFound,
    AtmSpecsNotFound,
    PanelScheduleNotFound,
    NoBomItems,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractWarning {
    pub code: WarningCode,
    pub message: String,
    pub page: Option<u32>,
    pub path: Option<PathBuf>,
}

impl ExtractWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            page: None,
            path: None,
        }
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }

    /// Emits the warning as a `tracing` event and hands it back.
    #[must_use]
    pub fn logged(self) -> Self {
        tracing::warn!(
            code = ?self.code,
            page = ?self.page,
            path = ?self.path,
            "{}",
            self.message
        );
        self
    }
}
