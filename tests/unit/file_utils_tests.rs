/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;
use potrad::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that a staged file dropped before commit leaves the destination byte-identical
#[test]
fn test_stage_droppedBeforeCommit_shouldLeaveDestinationUnchanged() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let destination = common::create_test_file(temp_dir.path(), "out.txt", "ORIGINAL: a\nTRADUCCIÓN: b\n")?;
    let before = fs::read(&destination)?;

    let staged = FileManager::stage(&destination, "partial content")?;
    assert_eq!(staged.destination(), destination.as_path());
    drop(staged);

    assert_eq!(fs::read(&destination)?, before);
    let leftovers: Vec<_> = fs::read_dir(temp_dir.path())?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temporary files left behind: {:?}", leftovers);
    Ok(())
}

/// Test that committing replaces the destination with the staged content
#[test]
fn test_stage_thenCommit_shouldReplaceDestination() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let destination = common::create_test_file(temp_dir.path(), "out.txt", "old")?;

    let committed = FileManager::stage(&destination, "new")?.commit()?;

    assert_eq!(committed, destination);
    assert_eq!(fs::read_to_string(&destination)?, "new");
    Ok(())
}

/// Test that ensure_dir creates nested directories and accepts existing ones
#[test]
fn test_ensure_dir_withNestedPath_shouldCreateAll() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested)?;
    FileManager::ensure_dir(&nested)?;

    assert!(nested.is_dir());
    Ok(())
}
