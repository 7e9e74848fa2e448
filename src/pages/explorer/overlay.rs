use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::models::directory_node::{DirectoryNode, DirectoryTree, NodeId};
use crate::models::reference::ReferenceMark;
use crate::services::fs::path;

/// Digit shown beside node `id`, if any.
///
/// A node carries the first mark (in source order) that points at it or below
/// it, unless the node is expanded and one of its children leads to that mark.
/// In that case the visible child carries it instead.
pub fn digit_for(
    tree: &DirectoryTree,
    expanded: &HashSet<String>,
    marks: &[ReferenceMark],
    id: NodeId,
) -> Option<char> {
    let node = tree.node(id);
    marks
        .iter()
        .filter(|mark| path::is_ancestor_or_self(&node.path, &mark.path))
        .find(|mark| !passes_down(tree, expanded, node, &mark.path))
        .map(|mark| mark.digit)
}

fn passes_down(
    tree: &DirectoryTree,
    expanded: &HashSet<String>,
    node: &DirectoryNode,
    mark_path: &str,
) -> bool {
    if mark_path == node.path || !expanded.contains(&node.path) {
        return false;
    }
    tree.children(node.id)
        .any(|child| path::is_ancestor_or_self(&child.path, mark_path))
}

/// True when every ancestor of `id` is expanded.
pub fn is_visible(tree: &DirectoryTree, expanded: &HashSet<String>, id: NodeId) -> bool {
    tree.ancestors(id)
        .all(|ancestor| expanded.contains(&ancestor.path))
}

/// Digits for every visible node, keyed by path.
pub fn overlay(
    tree: &DirectoryTree,
    expanded: &HashSet<String>,
    marks: &[ReferenceMark],
) -> BTreeMap<String, char> {
    if marks.is_empty() {
        return BTreeMap::new();
    }
    tree.iter()
        .filter(|node| is_visible(tree, expanded, node.id))
        .filter_map(|node| {
            digit_for(tree, expanded, marks, node.id).map(|digit| (node.path.clone(), digit))
        })
        .collect()
}

/// What the directory pane shows for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaneMode {
    /// Whole tree, root selected.
    Tree,
    /// Tree filtered to the selected folder's subtree.
    Subtree,
    /// Selected file shown in the preview pane.
    FilePreview,
}

pub fn pane_mode(tree: &DirectoryTree, selected_path: &str) -> PaneMode {
    match tree.get(selected_path) {
        Some(node) if node.id == tree.root().id => PaneMode::Tree,
        Some(node) if node.is_container() => PaneMode::Subtree,
        Some(_) => PaneMode::FilePreview,
        None => PaneMode::Tree,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fs::memory::{MemoryDirectory, MemoryFile};
    use crate::services::fs::TreeBuilder;

    async fn tree() -> DirectoryTree {
        let root = MemoryDirectory::new("")
            .with_dir(
                MemoryDirectory::new("a")
                    .with_file(MemoryFile::new("b.xlsx", ""))
                    .with_dir(MemoryDirectory::new("d").with_file(MemoryFile::new("e.txt", ""))),
            )
            .with_dir(MemoryDirectory::new("ab"))
            .with_file(MemoryFile::new("c.pdf", ""));
        TreeBuilder::default().build(Box::new(root)).await.unwrap()
    }

    fn expanded(paths: &[&str]) -> HashSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    fn digit(tree: &DirectoryTree, exp: &HashSet<String>, marks: &[ReferenceMark], p: &str) -> Option<char> {
        digit_for(tree, exp, marks, tree.get(p).unwrap().id)
    }

    #[tokio::test]
    async fn indicator_follows_expansion_down() {
        let tree = tree().await;
        let marks = vec![ReferenceMark::new('1', "/a/b.xlsx")];

        let exp = expanded(&["/"]);
        assert_eq!(digit(&tree, &exp, &marks, "/"), None);
        assert_eq!(digit(&tree, &exp, &marks, "/a"), Some('1'));
        assert_eq!(overlay(&tree, &exp, &marks), BTreeMap::from([("/a".to_string(), '1')]));

        let exp = expanded(&["/", "/a"]);
        assert_eq!(digit(&tree, &exp, &marks, "/a"), None);
        assert_eq!(digit(&tree, &exp, &marks, "/a/b.xlsx"), Some('1'));
        assert_eq!(
            overlay(&tree, &exp, &marks),
            BTreeMap::from([("/a/b.xlsx".to_string(), '1')])
        );
    }

    #[tokio::test]
    async fn collapsed_root_carries_everything() {
        let tree = tree().await;
        let marks = vec![ReferenceMark::new('2', "/c.pdf"), ReferenceMark::new('1', "/a/b.xlsx")];
        let exp = HashSet::new();
        assert_eq!(digit(&tree, &exp, &marks, "/"), Some('2'));
        assert_eq!(overlay(&tree, &exp, &marks).len(), 1);
    }

    #[tokio::test]
    async fn first_unpassed_mark_wins() {
        let tree = tree().await;
        let marks = vec![ReferenceMark::new('1', "/a/b.xlsx"), ReferenceMark::new('2', "/a/d/e.txt")];

        let exp = expanded(&["/"]);
        assert_eq!(digit(&tree, &exp, &marks, "/a"), Some('1'));

        let exp = expanded(&["/", "/a"]);
        assert_eq!(digit(&tree, &exp, &marks, "/a"), None);
        assert_eq!(digit(&tree, &exp, &marks, "/a/b.xlsx"), Some('1'));
        assert_eq!(digit(&tree, &exp, &marks, "/a/d"), Some('2'));
    }

    #[tokio::test]
    async fn folder_mark_stays_on_folder_when_expanded() {
        let tree = tree().await;
        let marks = vec![ReferenceMark::new('3', "/a")];
        let exp = expanded(&["/", "/a"]);
        assert_eq!(digit(&tree, &exp, &marks, "/a"), Some('3'));
        assert_eq!(digit(&tree, &exp, &marks, "/a/b.xlsx"), None);
    }

    #[tokio::test]
    async fn sibling_prefix_is_not_an_ancestor() {
        let tree = tree().await;
        let marks = vec![ReferenceMark::new('1', "/a/b.xlsx")];
        let exp = expanded(&["/"]);
        assert_eq!(digit(&tree, &exp, &marks, "/ab"), None);
    }

    #[tokio::test]
    async fn dangling_mark_stops_at_deepest_expanded_ancestor() {
        let tree = tree().await;
        let marks = vec![ReferenceMark::new('5', "/a/missing.xlsx")];
        let exp = expanded(&["/", "/a"]);
        assert_eq!(digit(&tree, &exp, &marks, "/"), None);
        assert_eq!(digit(&tree, &exp, &marks, "/a"), Some('5'));
    }

    #[tokio::test]
    async fn hidden_nodes_are_left_out_of_overlay() {
        let tree = tree().await;
        let marks = vec![ReferenceMark::new('1', "/a/d/e.txt")];
        // "/a/d" is expanded but "/a" is not, so "/a/d" is hidden.
        let exp = expanded(&["/", "/a/d"]);
        assert_eq!(overlay(&tree, &exp, &marks), BTreeMap::from([("/a".to_string(), '1')]));
    }

    #[tokio::test]
    async fn pane_mode_follows_selection_kind() {
        let tree = tree().await;
        assert_eq!(pane_mode(&tree, "/"), PaneMode::Tree);
        assert_eq!(pane_mode(&tree, "/a"), PaneMode::Subtree);
        assert_eq!(pane_mode(&tree, "/a/b.xlsx"), PaneMode::FilePreview);
    }
}
