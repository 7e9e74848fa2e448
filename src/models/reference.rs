use serde::Serialize;

/// A `(digit, path)` pair embedded in chat text, pointing at a tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceMark {
    pub digit: char,
    pub path: String,
}

impl ReferenceMark {
    pub fn new(digit: char, path: impl Into<String>) -> Self {
        Self {
            digit,
            path: path.into(),
        }
    }
}
