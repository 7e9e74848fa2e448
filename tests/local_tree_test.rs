use anyhow::Result;
use dirlens::models::NodeKind;
use dirlens::services::fs::{path, LocalDirectory, TreeBuilder};
use std::collections::HashSet;
use std::fs;
use tempfile::tempdir;
use walkdir::WalkDir;

#[tokio::test]
async fn test_tree_mirrors_disk() -> Result<()> {
    let temp_root = tempdir()?;
    let root = temp_root.path().join("models");
    fs::create_dir_all(root.join("validation/archive"))?;
    fs::create_dir_all(root.join("empty"))?;
    fs::write(root.join("validation/backtest.XLSX"), "a,b")?;
    fs::write(root.join("validation/archive/old.xlsx"), "a,b")?;
    fs::write(root.join("methodology.pdf"), "%PDF")?;
    fs::write(root.join("notes.txt"), "hello")?;

    let dir = LocalDirectory::open(&root).await?;
    let tree = TreeBuilder::default().build(Box::new(dir)).await?;

    assert_eq!(tree.root().kind, NodeKind::Root);
    assert_eq!(tree.root_path(), "/models");

    // Every entry on disk shows up under its joined tree path.
    let mut expected = HashSet::new();
    for entry in WalkDir::new(&root).min_depth(1) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(&root)?;
        let mut p = tree.root_path().to_string();
        for segment in rel.iter() {
            p = path::join(&p, &segment.to_string_lossy());
        }
        let node = tree.get(&p).unwrap_or_else(|| panic!("missing {p}"));
        assert_eq!(node.is_container(), entry.file_type().is_dir());
        expected.insert(p);
    }
    assert_eq!(tree.len(), expected.len() + 1);

    assert_eq!(
        tree.get("/models/validation/backtest.XLSX").unwrap().kind,
        NodeKind::Spreadsheet
    );
    assert_eq!(tree.get("/models/notes.txt").unwrap().kind, NodeKind::ListDocument);
    assert_eq!(tree.get("/models/empty").unwrap().kind, NodeKind::Folder);
    Ok(())
}

#[tokio::test]
async fn test_open_rejects_files() -> Result<()> {
    let temp_root = tempdir()?;
    let file = temp_root.path().join("plain.txt");
    fs::write(&file, "x")?;
    assert!(LocalDirectory::open(&file).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_file_handle_reads_content_and_metadata() -> Result<()> {
    let temp_root = tempdir()?;
    let root = temp_root.path().join("data");
    fs::create_dir_all(&root)?;
    fs::write(root.join("table.csv"), "id,name\n1,alpha\n")?;

    let tree = TreeBuilder::default()
        .build(Box::new(LocalDirectory::open(&root).await?))
        .await?;
    let node = tree.get("/data/table.csv").expect("csv node");
    let handle = node.file_capability().expect("file capability").open().await?;

    assert_eq!(handle.name, "table.csv");
    assert_eq!(handle.size, 16);
    assert!(handle.modified.is_some());
    assert_eq!(handle.text(), "id,name\n1,alpha\n");
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_directory_links_are_not_followed() -> Result<()> {
    use std::os::unix::fs::symlink;
    use std::time::Duration;

    let temp_root = tempdir()?;
    let root = temp_root.path().join("r");
    fs::create_dir_all(root.join("nested"))?;
    fs::write(root.join("a.xlsx"), "x")?;
    symlink(&root, root.join("loop"))?;
    symlink(&root, root.join("loop2"))?;
    symlink(&root, root.join("nested/back"))?;

    let dir = LocalDirectory::open(&root).await?;
    let tree = tokio::time::timeout(
        Duration::from_secs(10),
        TreeBuilder::default().build(Box::new(dir)),
    )
    .await??;

    let mut paths: Vec<_> = tree.iter().map(|n| n.path.as_str()).collect();
    paths.sort();
    assert_eq!(paths, ["/r", "/r/a.xlsx", "/r/nested"]);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_entry_kinds_on_disk() -> Result<()> {
    use std::os::unix::fs::symlink;
    use std::os::unix::net::UnixListener;

    let temp_root = tempdir()?;
    let root = temp_root.path().join("r");
    fs::create_dir_all(root.join("sub"))?;
    fs::write(root.join("real.txt"), "body")?;
    fs::write(root.join("sub/inner.csv"), "a,b")?;
    symlink(root.join("real.txt"), root.join("link.txt"))?;
    symlink(root.join("missing"), root.join("dangling"))?;
    symlink(root.join("sub"), root.join("dirlink"))?;
    let _socket = UnixListener::bind(root.join("sock"))?;

    let tree = TreeBuilder::default()
        .build(Box::new(LocalDirectory::open(&root).await?))
        .await?;

    let mut paths: Vec<_> = tree.iter().map(|n| n.path.as_str()).collect();
    paths.sort();
    assert_eq!(
        paths,
        ["/r", "/r/link.txt", "/r/real.txt", "/r/sub", "/r/sub/inner.csv"]
    );

    let link = tree.get("/r/link.txt").expect("file link");
    assert_eq!(link.kind, NodeKind::ListDocument);
    let handle = link.file_capability().expect("file capability").open().await?;
    assert_eq!(handle.text(), "body");
    Ok(())
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_non_utf8_names_are_skipped() -> Result<()> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp_root = tempdir()?;
    let root = temp_root.path().join("r");
    fs::create_dir_all(&root)?;
    fs::write(root.join("good.xlsx"), "x")?;
    fs::write(root.join(OsStr::from_bytes(b"bad\xff.txt")), "y")?;

    let tree = TreeBuilder::default()
        .build(Box::new(LocalDirectory::open(&root).await?))
        .await?;

    assert_eq!(tree.len(), 2);
    assert_eq!(tree.get("/r/good.xlsx").unwrap().kind, NodeKind::Spreadsheet);
    Ok(())
}
