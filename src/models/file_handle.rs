use serde::Serialize;
use time::OffsetDateTime;

use crate::core::config::PreviewConfig;
use crate::services::fs::path;

/// Content of a file acquired through its capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub size: u64,
    pub modified: Option<OffsetDateTime>,
    pub contents: Vec<u8>,
}

impl FileHandle {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.contents).into_owned()
    }

    pub fn preview_kind(&self, config: &PreviewConfig) -> PreviewKind {
        PreviewKind::for_name(&self.name, config)
    }
}

/// Which preview widget a selected file is shown with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreviewKind {
    Spreadsheet,
    Pdf,
    Unsupported,
}

impl PreviewKind {
    pub fn for_name(name: &str, config: &PreviewConfig) -> PreviewKind {
        let Some(ext) = path::extension(name) else {
            return PreviewKind::Unsupported;
        };
        if config.spreadsheet_extensions.iter().any(|e| *e == ext) {
            PreviewKind::Spreadsheet
        } else if config.pdf_extensions.iter().any(|e| *e == ext) {
            PreviewKind::Pdf
        } else {
            PreviewKind::Unsupported
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PreviewKind::Spreadsheet => "spreadsheet",
            PreviewKind::Pdf => "pdf",
            PreviewKind::Unsupported => "unsupported",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_kind_follows_extension() {
        let config = PreviewConfig::default();
        assert_eq!(PreviewKind::for_name("a.CSV", &config), PreviewKind::Spreadsheet);
        assert_eq!(PreviewKind::for_name("a.xls", &config), PreviewKind::Spreadsheet);
        assert_eq!(PreviewKind::for_name("notes.pdf", &config), PreviewKind::Pdf);
        assert_eq!(PreviewKind::for_name("notes.txt", &config), PreviewKind::Unsupported);
        assert_eq!(PreviewKind::for_name("Makefile", &config), PreviewKind::Unsupported);
    }

    #[test]
    fn text_is_lossy() {
        let handle = FileHandle {
            name: "a.csv".into(),
            size: 3,
            modified: None,
            contents: vec![b'a', 0xff, b'b'],
        };
        assert_eq!(handle.text(), "a\u{fffd}b");
    }
}
