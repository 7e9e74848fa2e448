use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::{Error, Result};

/// Top level configuration for an explorer session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub tree: TreeConfig,
    pub preview: PreviewConfig,
    pub pane: PaneConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Leaf files with this extension are classified as spreadsheets.
    pub spreadsheet_extension: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            spreadsheet_extension: "xlsx".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub spreadsheet_extensions: Vec<String>,
    pub pdf_extensions: Vec<String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            spreadsheet_extensions: vec!["csv".into(), "xlsx".into(), "xls".into()],
            pdf_extensions: vec!["pdf".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaneConfig {
    pub default_width: u32,
    pub min_width: u32,
    pub collapsed_width: u32,
    pub indent_px: u32,
}

impl Default for PaneConfig {
    fn default() -> Self {
        Self {
            default_width: 440,
            min_width: 200,
            collapsed_width: 50,
            indent_px: 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub step_delay_ms: u64,
    pub strategy_steps: Vec<String>,
    pub answer_steps: Vec<String>,
    pub response: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 1000,
            strategy_steps: vec![
                "Analysing the query...".into(),
                "Searching for relevant docs...".into(),
            ],
            answer_steps: vec![
                "Navigating the directory...".into(),
                "Fetching answer...".into(),
            ],
            response: DEFAULT_RESPONSE.to_string(),
        }
    }
}

const DEFAULT_RESPONSE: &str = "\
## Summary

The quarterly model review covers three validation areas. Back-testing results \
are tracked in the validation workbook ![Source-1](/models/validation/backtest.xlsx) \
and the assumptions are listed in the methodology notes ![Source-2](/models/methodology.pdf).

- Outstanding findings are logged per model owner ![Source-3](/models/findings).
";

impl ExplorerConfig {
    /// Loads a config from a TOML file, or returns defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)?;
                Self::from_toml(&raw)?
            }
            None => Self::default(),
        };
        tracing::debug!(?path, "loaded explorer config");
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let mut config: ExplorerConfig =
            toml::from_str(raw).map_err(|e| Error::Config(e.to_string()))?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    fn normalize(&mut self) {
        self.tree.spreadsheet_extension = normalize_extension(&self.tree.spreadsheet_extension);
        for ext in self
            .preview
            .spreadsheet_extensions
            .iter_mut()
            .chain(self.preview.pdf_extensions.iter_mut())
        {
            *ext = normalize_extension(ext);
        }
    }

    fn validate(&self) -> Result<()> {
        if self.tree.spreadsheet_extension.is_empty() {
            return Err(Error::Config(
                "tree.spreadsheet_extension must not be empty".into(),
            ));
        }
        if self.pane.min_width == 0 {
            return Err(Error::Config("pane.min_width must be positive".into()));
        }
        Ok(())
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
