use anyhow::Result;
use dirlens::core::config::ExplorerConfig;
use dirlens::core::errors::Error;
use dirlens::models::PreviewKind;
use dirlens::pages::explorer::{ExplorerSession, LoadOutcome, PaneMode};
use dirlens::services::fs::LocalDirectory;
use std::collections::BTreeMap;
use std::fs;
use tempfile::tempdir;

#[tokio::test]
async fn test_reference_overlay_over_real_folder() -> Result<()> {
    let temp_root = tempdir()?;
    let root = temp_root.path().join("models");
    fs::create_dir_all(root.join("validation"))?;
    fs::write(root.join("validation/backtest.xlsx"), "year,loss\n2024,0.1\n")?;
    fs::write(root.join("methodology.pdf"), "%PDF-1.4")?;

    let mut session = ExplorerSession::new(ExplorerConfig::default());
    let outcome = session
        .load_folder(Box::new(LocalDirectory::open(&root).await?))
        .await?;
    assert_eq!(outcome, LoadOutcome::Replaced);

    session.set_marks_from_text(
        "Loss ![Source-1](/models/validation/backtest.xlsx), method ![Source-2](/models/methodology.pdf)",
    );
    assert_eq!(
        session.overlay(),
        BTreeMap::from([
            ("/models/methodology.pdf".to_string(), '2'),
            ("/models/validation".to_string(), '1'),
        ])
    );

    session.toggle_expand("/models/validation")?;
    assert_eq!(
        session.overlay().get("/models/validation/backtest.xlsx"),
        Some(&'1')
    );
    assert_eq!(session.overlay().get("/models/validation"), None);

    session.select("/models/validation/backtest.xlsx").await?;
    assert_eq!(session.pane_mode(), PaneMode::FilePreview);
    assert_eq!(session.selected_preview(), Some(PreviewKind::Spreadsheet));
    assert!(session.selected_file().unwrap().text().starts_with("year,loss"));

    session.back_to_tree()?;
    assert_eq!(session.pane_mode(), PaneMode::Tree);
    assert!(session.selected_file().is_none());
    Ok(())
}

#[tokio::test]
async fn test_removed_folder_keeps_previous_tree() -> Result<()> {
    let temp_root = tempdir()?;
    let first = temp_root.path().join("first");
    let second = temp_root.path().join("second");
    fs::create_dir_all(&first)?;
    fs::create_dir_all(&second)?;
    fs::write(first.join("a.xlsx"), "x")?;

    let mut session = ExplorerSession::new(ExplorerConfig::default());
    session
        .load_folder(Box::new(LocalDirectory::open(&first).await?))
        .await?;

    // Capability acquired, then the folder disappears before enumeration.
    let doomed = LocalDirectory::open(&second).await?;
    fs::remove_dir(&second)?;
    let err = session.load_folder(Box::new(doomed)).await.unwrap_err();
    assert!(matches!(err, Error::DirectoryBuild { .. }));

    assert_eq!(session.tree().unwrap().root_path(), "/first");
    assert!(session.tree().unwrap().contains("/first/a.xlsx"));
    Ok(())
}
