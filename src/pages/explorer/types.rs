use serde::Serialize;

use crate::models::directory_node::NodeKind;

/// One visible line of the directory pane, as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeRow {
    pub path: String,
    pub name: String,
    pub kind: NodeKind,
    pub depth: usize,
    pub indent: u32,
    pub expanded: bool,
    pub has_children: bool,
    pub selected: bool,
    pub digit: Option<char>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The new tree replaced the previous one.
    Replaced,
    /// A newer load was started; the result was dropped.
    Stale,
}

/// Generation tag of a folder load in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTicket {
    pub(super) generation: u64,
}
