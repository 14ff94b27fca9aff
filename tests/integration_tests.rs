use file_organizer::{
    Category, OrganizeError, OrganizeEvent, OrganizeOptions, OrganizeReport, SkipReason, organize,
};
/// Integration tests for file-organizer
///
/// These tests run the organizer end to end against real temporary
/// directories.
///
/// Test categories:
/// 1. Basic organization workflows
/// 2. Skip rules
/// 3. Recursive mode and collisions
/// 4. Dry-run mode
/// 5. Repeated runs
/// 6. Event reporting and error scenarios
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A test fixture that sets up a temporary directory with configurable
/// file structure for testing.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    /// Create a new test fixture with a temporary directory.
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    /// Get the path to the test directory.
    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file (and any missing parent directories) with content.
    fn create_file(&self, rel_path: &str, content: &[u8]) {
        let file_path = self.path().join(rel_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content)
            .expect("Failed to write file content");
    }

    /// Create several files with their name as content.
    fn create_files(&self, names: &[&str]) {
        for name in names {
            self.create_file(name, name.as_bytes());
        }
    }

    fn read(&self, rel_path: &str) -> String {
        fs::read_to_string(self.path().join(rel_path)).expect("Failed to read file")
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_dir(), "Directory should exist: {}", path.display());
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    /// Count directories in the test directory (non-recursive).
    fn count_dirs(&self) -> usize {
        fs::read_dir(self.path())
            .expect("Failed to read directory")
            .filter_map(Result::ok)
            .filter(|e| e.path().is_dir())
            .count()
    }

    /// Every path below the root with its size and modification time.
    fn snapshot(&self) -> BTreeMap<PathBuf, (u64, SystemTime)> {
        let mut entries = BTreeMap::new();
        Self::walk(self.path(), &mut entries);
        entries
    }

    fn walk(dir: &Path, entries: &mut BTreeMap<PathBuf, (u64, SystemTime)>) {
        for entry in fs::read_dir(dir).expect("Failed to read directory").flatten() {
            let path = entry.path();
            let meta = fs::symlink_metadata(&path).expect("Failed to stat");
            entries.insert(
                path.clone(),
                (meta.len(), meta.modified().expect("mtime unavailable")),
            );
            if meta.is_dir() {
                Self::walk(&path, entries);
            }
        }
    }

    /// Organize the fixture directory, capturing events.
    fn organize(&self, options: &OrganizeOptions) -> (OrganizeReport, Vec<OrganizeEvent>) {
        let mut events = Vec::new();
        let report = organize(self.path(), options, &mut events).expect("organize failed");
        (report, events)
    }
}

fn real_run() -> OrganizeOptions {
    OrganizeOptions::default()
}

fn recursive() -> OrganizeOptions {
    OrganizeOptions {
        recursive: true,
        ..Default::default()
    }
}

fn dry_run() -> OrganizeOptions {
    OrganizeOptions {
        dry_run: true,
        ..Default::default()
    }
}

fn skip_reasons(events: &[OrganizeEvent]) -> Vec<(String, SkipReason)> {
    events
        .iter()
        .filter_map(|e| match e {
            OrganizeEvent::Skipped { path, reason } => Some((
                path.file_name().unwrap().to_string_lossy().to_string(),
                *reason,
            )),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Test Suite 1: Basic Organization
// ============================================================================

#[test]
fn test_organize_empty_directory() {
    let fixture = TestFixture::new();

    let (report, _) = fixture.organize(&real_run());

    assert_eq!(report, OrganizeReport::default());
    assert_eq!(fixture.count_dirs(), 0, "Should have no subdirectories");
}

#[test]
fn test_mixed_directory_scenario() {
    let fixture = TestFixture::new();
    fixture.create_files(&["photo.JPG", "note.txt", "script.py", ".hidden", "noext"]);

    let (report, _) = fixture.organize(&real_run());

    fixture.assert_file_exists("images/photo.JPG");
    fixture.assert_file_exists("documents/note.txt");
    fixture.assert_file_exists("code/script.py");
    fixture.assert_file_exists(".hidden");
    fixture.assert_file_exists("noext");
    fixture.assert_file_not_exists("photo.JPG");
    assert_eq!(report.total_files, 4);
    assert_eq!(report.organized_files, 3);
    assert_eq!(report.skipped_files, 1);
}

#[test]
fn test_unknown_extension_goes_to_others() {
    let fixture = TestFixture::new();
    fixture.create_file("a.zzz", b"?");

    let (report, _) = fixture.organize(&real_run());

    fixture.assert_file_exists("others/a.zzz");
    assert_eq!(report.by_category.get(&Category::Others), Some(&1));
}

#[test]
fn test_every_category_gets_its_folder() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        "pic.webp",
        "sheet.XLSX",
        "song.flac",
        "clip.mov",
        "bundle.7z",
        "page.html",
        "readme.md",
    ]);

    let (report, _) = fixture.organize(&real_run());

    fixture.assert_file_exists("images/pic.webp");
    fixture.assert_file_exists("documents/sheet.XLSX");
    fixture.assert_file_exists("audio/song.flac");
    fixture.assert_file_exists("video/clip.mov");
    fixture.assert_file_exists("archives/bundle.7z");
    fixture.assert_file_exists("code/page.html");
    fixture.assert_file_exists("others/readme.md");
    assert_eq!(fixture.count_dirs(), 7);
    assert_eq!(report.organized_files, 7);
    assert_eq!(report.by_category.len(), 7);
}

#[test]
fn test_file_content_survives_the_move() {
    let fixture = TestFixture::new();
    fixture.create_file("data.json", br#"{"k": 1}"#);

    fixture.organize(&real_run());

    assert_eq!(fixture.read("code/data.json"), r#"{"k": 1}"#);
}

// ============================================================================
// Test Suite 2: Skip Rules
// ============================================================================

#[test]
fn test_hidden_files_are_not_counted() {
    let fixture = TestFixture::new();
    fixture.create_files(&[".env", ".config.json"]);

    let (report, events) = fixture.organize(&real_run());

    assert_eq!(report, OrganizeReport::default());
    assert!(skip_reasons(&events).is_empty());
    fixture.assert_file_exists(".config.json");
}

#[test]
fn test_trailing_dot_counts_as_no_extension() {
    let fixture = TestFixture::new();
    fixture.create_file("weird.", b"");

    let (report, events) = fixture.organize(&real_run());

    assert_eq!(report.skipped_files, 1);
    assert_eq!(
        skip_reasons(&events),
        vec![("weird.".to_string(), SkipReason::NoExtension)]
    );
    fixture.assert_file_exists("weird.");
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_counted_and_skipped() {
    let fixture = TestFixture::new();
    fixture.create_file("real.txt", b"x");
    fixture.create_file("elsewhere/target.txt", b"y");
    std::os::unix::fs::symlink(
        fixture.path().join("elsewhere/target.txt"),
        fixture.path().join("link.txt"),
    )
    .unwrap();
    std::os::unix::fs::symlink(fixture.path().join("elsewhere"), fixture.path().join("dirlink"))
        .unwrap();

    let (report, events) = fixture.organize(&real_run());

    assert_eq!(report.total_files, 2);
    assert_eq!(report.organized_files, 1);
    assert_eq!(report.skipped_files, 1);
    assert_eq!(
        skip_reasons(&events),
        vec![("link.txt".to_string(), SkipReason::SymbolicLink)]
    );
    assert!(
        fs::symlink_metadata(fixture.path().join("link.txt"))
            .unwrap()
            .file_type()
            .is_symlink()
    );
}

#[test]
fn test_top_level_mode_ignores_subdirectories() {
    let fixture = TestFixture::new();
    fixture.create_files(&["top.png", "sub/inner.png", "sub/deeper/inner.mp3"]);

    let (report, _) = fixture.organize(&real_run());

    assert_eq!(report.total_files, 1);
    fixture.assert_file_exists("images/top.png");
    fixture.assert_file_exists("sub/inner.png");
    fixture.assert_file_exists("sub/deeper/inner.mp3");
    fixture.assert_file_not_exists("audio");
}

// ============================================================================
// Test Suite 3: Recursive Mode and Collisions
// ============================================================================

#[test]
fn test_recursive_collects_into_root_categories() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a/one.png", "a/b/two.png", "c/song.ogg"]);

    let (report, _) = fixture.organize(&recursive());

    fixture.assert_file_exists("images/one.png");
    fixture.assert_file_exists("images/two.png");
    fixture.assert_file_exists("audio/song.ogg");
    assert_eq!(report.organized_files, 3);
    assert_eq!(report.organized_files + report.skipped_files, report.total_files);
}

#[test]
fn test_same_name_from_two_subdirectories() {
    let fixture = TestFixture::new();
    fixture.create_file("first/doc.pdf", b"first");
    fixture.create_file("second/doc.pdf", b"second");

    let (report, _) = fixture.organize(&recursive());

    assert_eq!(report.organized_files, 2);
    assert_eq!(fixture.read("documents/doc.pdf"), "first");
    assert_eq!(fixture.read("documents/doc_1.pdf"), "second");
}

#[test]
fn test_collision_with_existing_file_never_overwrites() {
    let fixture = TestFixture::new();
    fixture.create_file("images/cat.png", b"old");
    fixture.create_file("cat.png", b"new");

    let (report, _) = fixture.organize(&real_run());

    assert_eq!(report.organized_files, 1);
    assert_eq!(fixture.read("images/cat.png"), "old");
    assert_eq!(fixture.read("images/cat_1.png"), "new");
}

#[test]
fn test_moved_files_are_not_processed_twice() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.png", "z/b.png"]);

    let (report, events) = fixture.organize(&recursive());

    // `images/` is created while the walk is running; its new contents
    // are not revisited.
    assert_eq!(report.total_files, 2);
    assert_eq!(report.organized_files, 2);
    assert!(skip_reasons(&events).is_empty());
}

// ============================================================================
// Test Suite 4: Dry-Run Mode
// ============================================================================

#[test]
fn test_dry_run_changes_nothing() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        "photo.png",
        "report.pdf",
        "noext",
        ".hidden",
        "nested/clip.mp4",
        "documents/already.txt",
    ]);
    fixture.create_file("images/photo.png", b"occupied");
    let before = fixture.snapshot();

    let options = OrganizeOptions {
        dry_run: true,
        recursive: true,
        ..Default::default()
    };
    let (report, events) = fixture.organize(&options);

    assert_eq!(fixture.snapshot(), before);
    assert_eq!(report.total_files, 6);
    assert_eq!(report.organized_files, 3);
    assert_eq!(report.skipped_files, 3);
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, OrganizeEvent::Moved { .. } | OrganizeEvent::CategoryCreated { .. }))
    );
}

#[test]
fn test_dry_run_predicts_real_run() {
    let fixture = TestFixture::new();
    fixture.create_file("images/pic.png", b"old");
    fixture.create_files(&["pic.png", "x/pic.png", "y/notes.txt"]);

    let options = OrganizeOptions {
        dry_run: true,
        recursive: true,
        ..Default::default()
    };
    let (dry_report, dry_events) = fixture.organize(&options);
    let (real_report, real_events) = fixture.organize(&recursive());

    let predicted: Vec<PathBuf> = dry_events
        .iter()
        .filter_map(|e| match e {
            OrganizeEvent::WouldMove { destination, .. } => Some(destination.clone()),
            _ => None,
        })
        .collect();
    let actual: Vec<PathBuf> = real_events
        .iter()
        .filter_map(|e| match e {
            OrganizeEvent::Moved { destination, .. } => Some(destination.clone()),
            _ => None,
        })
        .collect();

    assert_eq!(predicted, actual);
    assert_eq!(dry_report, real_report);
    fixture.assert_file_exists("images/pic_1.png");
    fixture.assert_file_exists("images/pic_2.png");
}

#[test]
fn test_dry_run_does_not_create_folders() {
    let fixture = TestFixture::new();
    fixture.create_files(&["photo.png", "report.pdf"]);

    let (report, _) = fixture.organize(&dry_run());

    assert_eq!(report.organized_files, 2);
    assert_eq!(fixture.count_dirs(), 0, "Dry-run should not create directories");
}

// ============================================================================
// Test Suite 5: Repeated Runs
// ============================================================================

#[test]
fn test_second_run_skips_everything() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.png", "b.mp3", "sub/c.zip"]);

    let (first, _) = fixture.organize(&recursive());
    let (second, events) = fixture.organize(&recursive());

    assert_eq!(first.organized_files, 3);
    assert_eq!(second.total_files, 3);
    assert_eq!(second.organized_files, 0);
    assert_eq!(second.skipped_files, 3);
    assert!(
        skip_reasons(&events)
            .iter()
            .all(|(_, reason)| *reason == SkipReason::AlreadyOrganized)
    );
}

#[test]
fn test_second_top_level_run_finds_nothing() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.png", "b.txt"]);

    fixture.organize(&real_run());
    let (second, _) = fixture.organize(&real_run());

    assert_eq!(second, OrganizeReport::default());
}

// ============================================================================
// Test Suite 6: Events and Errors
// ============================================================================

#[test]
fn test_event_sequence() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.png", "noext"]);

    let (report, events) = fixture.organize(&real_run());

    assert!(matches!(events.first(), Some(OrganizeEvent::Started { .. })));
    assert!(matches!(events.last(), Some(OrganizeEvent::Finished(r)) if *r == report));
    let created: Vec<Category> = events
        .iter()
        .filter_map(|e| match e {
            OrganizeEvent::CategoryCreated { category, .. } => Some(*category),
            _ => None,
        })
        .collect();
    assert_eq!(created, vec![Category::Images]);
    assert!(events.iter().any(|e| matches!(
        e,
        OrganizeEvent::Moved { category: Category::Images, .. }
    )));
    assert_eq!(
        events.last().unwrap().to_string(),
        "Processed 2 files: 1 organized, 1 skipped"
    );
}

#[test]
fn test_missing_directory_touches_nothing() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("missing");
    let mut events = Vec::new();

    let result = organize(&missing, &real_run(), &mut events);

    assert!(matches!(result, Err(OrganizeError::DirectoryNotFound { .. })));
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].to_string(),
        format!("Directory not found: {}", missing.display())
    );
    assert!(!missing.exists());
}

#[test]
fn test_not_a_directory() {
    let fixture = TestFixture::new();
    fixture.create_file("file.txt", b"x");
    let mut events = Vec::new();

    let result = organize(&fixture.path().join("file.txt"), &real_run(), &mut events);

    assert!(matches!(result, Err(OrganizeError::NotADirectory { .. })));
    fixture.assert_file_exists("file.txt");
    fixture.assert_file_not_exists("documents");
}

#[cfg(unix)]
#[test]
fn test_unwritable_category_folder_is_skipped_not_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = TestFixture::new();
    fixture.create_files(&["locked.png", "open.txt"]);
    fs::create_dir(fixture.path().join("images")).unwrap();
    fs::set_permissions(
        fixture.path().join("images"),
        fs::Permissions::from_mode(0o555),
    )
    .unwrap();

    // Root ignores permission bits; nothing to test there
    let marker = fixture.path().join("images/.marker");
    if File::create(&marker).is_ok() {
        let _ = fs::remove_file(&marker);
        return;
    }

    let (report, events) = fixture.organize(&real_run());

    fs::set_permissions(
        fixture.path().join("images"),
        fs::Permissions::from_mode(0o755),
    )
    .unwrap();

    assert_eq!(report.total_files, 2);
    assert_eq!(report.organized_files, 1);
    assert_eq!(report.skipped_files, 1);
    fixture.assert_file_exists("locked.png");
    fixture.assert_dir_exists("documents");
    assert!(
        events
            .iter()
            .any(|e| matches!(e, OrganizeEvent::MoveFailed { .. }))
    );
}
