use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

use super::navigation::{Applied, FileAccessTicket, NavigationState, Selection};
use super::overlay::{self, PaneMode};
use super::pane::PaneLayout;
use super::types::{BuildTicket, LoadOutcome, TreeRow};
use crate::core::config::ExplorerConfig;
use crate::core::errors::{Error, Result};
use crate::models::directory_node::{DirectoryTree, NodeId};
use crate::models::file_handle::{FileHandle, PreviewKind};
use crate::models::reference::ReferenceMark;
use crate::services::chat::{ChatEvent, ChatTranscript, ScriptedResponder};
use crate::services::fs::capability::DirectoryCapability;
use crate::services::fs::path;
use crate::services::fs::TreeBuilder;
use crate::services::references;

/// Everything the explorer shows: the current tree, where the user is in it,
/// and which chat references are active.
pub struct ExplorerSession {
    config: ExplorerConfig,
    builder: TreeBuilder,
    responder: ScriptedResponder,
    tree: Option<Arc<DirectoryTree>>,
    navigation: Option<NavigationState>,
    marks: Vec<ReferenceMark>,
    chat: ChatTranscript,
    pane: PaneLayout,
    build_generation: u64,
}

impl ExplorerSession {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            builder: TreeBuilder::new(&config.tree),
            responder: ScriptedResponder::new(&config.chat),
            pane: PaneLayout::new(&config.pane),
            config,
            tree: None,
            navigation: None,
            marks: Vec::new(),
            chat: ChatTranscript::new(),
            build_generation: 0,
        }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn builder(&self) -> &TreeBuilder {
        &self.builder
    }

    // Folder loading

    /// Starts a folder load. Any load started earlier becomes stale.
    pub fn begin_load(&mut self) -> BuildTicket {
        self.build_generation += 1;
        BuildTicket {
            generation: self.build_generation,
        }
    }

    /// Applies a finished build.
    ///
    /// On failure the current tree and navigation stay as they were and the
    /// build error is returned.
    pub fn finish_load(
        &mut self,
        ticket: BuildTicket,
        result: Result<DirectoryTree>,
    ) -> Result<LoadOutcome> {
        if ticket.generation != self.build_generation {
            tracing::debug!(
                generation = ticket.generation,
                current = self.build_generation,
                "dropping stale directory build"
            );
            return Ok(LoadOutcome::Stale);
        }
        let tree = match result {
            Ok(tree) => tree,
            Err(e) => {
                tracing::warn!("folder load failed, keeping previous tree: {}", e);
                return Err(e);
            }
        };
        tracing::info!(root = tree.root_path(), nodes = tree.len(), "loaded directory tree");
        match self.navigation.as_mut() {
            Some(nav) => nav.reset(&tree),
            None => self.navigation = Some(NavigationState::new(&tree)),
        }
        self.tree = Some(Arc::new(tree));
        Ok(LoadOutcome::Replaced)
    }

    pub async fn load_folder(&mut self, root: Box<dyn DirectoryCapability>) -> Result<LoadOutcome> {
        let ticket = self.begin_load();
        let result = self.builder.build(root).await;
        self.finish_load(ticket, result)
    }

    pub fn tree(&self) -> Option<&Arc<DirectoryTree>> {
        self.tree.as_ref()
    }

    pub fn navigation(&self) -> Option<&NavigationState> {
        self.navigation.as_ref()
    }

    fn parts_mut(&mut self) -> Result<(&DirectoryTree, &mut NavigationState)> {
        match (self.tree.as_deref(), self.navigation.as_mut()) {
            (Some(tree), Some(nav)) => Ok((tree, nav)),
            _ => Err(Error::NoTree),
        }
    }

    // Navigation

    pub fn toggle_expand(&mut self, path: &str) -> Result<bool> {
        let (tree, nav) = self.parts_mut()?;
        nav.toggle_expand(tree, path)
    }

    /// Expands `path` and all of its ancestors.
    pub fn reveal(&mut self, path: &str) -> Result<()> {
        let (tree, nav) = self.parts_mut()?;
        let node = tree
            .get(path)
            .ok_or_else(|| Error::UnknownPath(path.to_string()))?;
        let mut chain: Vec<&str> = tree.ancestors(node.id).map(|n| n.path.as_str()).collect();
        if node.is_container() {
            chain.push(node.path.as_str());
        }
        for p in chain {
            if !nav.is_expanded(p) {
                nav.toggle_expand(tree, p)?;
            }
        }
        Ok(())
    }

    pub fn begin_select(&mut self, path: &str) -> Result<Selection> {
        let (tree, nav) = self.parts_mut()?;
        nav.begin_select(tree, path)
    }

    pub fn complete_select(
        &mut self,
        ticket: FileAccessTicket,
        result: io::Result<FileHandle>,
    ) -> Result<Applied> {
        let (_, nav) = self.parts_mut()?;
        nav.complete_select(ticket, result)
    }

    pub async fn select(&mut self, path: &str) -> Result<Applied> {
        let tree = self.tree.clone().ok_or(Error::NoTree)?;
        let nav = self.navigation.as_mut().ok_or(Error::NoTree)?;
        nav.select(&tree, path).await
    }

    /// Leaves a preview or subtree and returns to the whole tree.
    pub fn back_to_tree(&mut self) -> Result<()> {
        let (tree, nav) = self.parts_mut()?;
        nav.reset(tree);
        Ok(())
    }

    pub fn selected_file(&self) -> Option<&FileHandle> {
        self.navigation.as_ref()?.selected_file()
    }

    pub fn selected_preview(&self) -> Option<PreviewKind> {
        self.selected_file()
            .map(|file| file.preview_kind(&self.config.preview))
    }

    // Chat and references

    pub fn chat(&self) -> &ChatTranscript {
        &self.chat
    }

    pub fn responder(&self) -> &ScriptedResponder {
        &self.responder
    }

    pub fn send_message(&mut self, input: &str) -> bool {
        self.chat.send(input)
    }

    pub fn apply_chat_event(&mut self, event: ChatEvent) {
        self.chat.apply(event);
    }

    /// Selects an assistant message and makes its source markers the active references.
    pub fn select_message(&mut self, index: usize) -> Option<&[ReferenceMark]> {
        let content = self.chat.select(index)?;
        self.marks = references::extract(content);
        Some(&self.marks)
    }

    pub fn set_marks_from_text(&mut self, text: &str) -> &[ReferenceMark] {
        self.marks = references::extract(text);
        &self.marks
    }

    pub fn marks(&self) -> &[ReferenceMark] {
        &self.marks
    }

    // Presentation

    pub fn pane(&self) -> &PaneLayout {
        &self.pane
    }

    /// Drag of the pane resize handle; returns the new width.
    pub fn resize_pane(&mut self, start_width: u32, delta: i64) -> u32 {
        self.pane.resize(start_width, delta)
    }

    pub fn toggle_pane(&mut self) -> bool {
        self.pane.toggle_collapsed()
    }

    pub fn pane_mode(&self) -> PaneMode {
        match (&self.tree, &self.navigation) {
            (Some(tree), Some(nav)) => overlay::pane_mode(tree, nav.selected_path()),
            _ => PaneMode::Tree,
        }
    }

    pub fn overlay(&self) -> BTreeMap<String, char> {
        match (&self.tree, &self.navigation) {
            (Some(tree), Some(nav)) => overlay::overlay(tree, nav.expanded(), &self.marks),
            _ => BTreeMap::new(),
        }
    }

    /// Visible rows in display order. In subtree mode only the selected
    /// folder and what is expanded below it are listed.
    pub fn rows(&self) -> Vec<TreeRow> {
        let (Some(tree), Some(nav)) = (&self.tree, &self.navigation) else {
            return Vec::new();
        };
        let start = match self.pane_mode() {
            PaneMode::Subtree => tree
                .get(nav.selected_path())
                .map(|n| n.id)
                .unwrap_or(NodeId(0)),
            PaneMode::Tree | PaneMode::FilePreview => NodeId(0),
        };

        let mut rows = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let node = tree.node(id);
            let expanded = nav.is_expanded(&node.path);
            let depth = path::depth(&node.path);
            rows.push(TreeRow {
                path: node.path.clone(),
                name: node.name.clone(),
                kind: node.kind,
                depth,
                indent: u32::try_from(depth)
                    .unwrap_or(u32::MAX)
                    .saturating_mul(self.config.pane.indent_px),
                expanded,
                has_children: !node.child_ids().is_empty(),
                selected: node.path == nav.selected_path(),
                digit: overlay::digit_for(tree, nav.expanded(), &self.marks, id),
            });
            if expanded {
                stack.extend(node.child_ids().iter().rev().copied());
            }
        }
        rows
    }
}
