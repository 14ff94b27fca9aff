//! Moving files into category folders.
//!
//! [`FileOrganizer`] walks a directory, classifies every eligible file by its
//! extension and moves it into `<root>/<category>/`, renaming on collision.
//! In dry-run mode the same decisions are made and reported, but nothing on
//! disk changes.

use crate::category::{Category, classify};
use crate::error::{OrganizeError, OrganizeResult};
use crate::events::{EventSink, OrganizeEvent, SkipReason};
use glob::Pattern;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Settings for one organize run.
#[derive(Debug, Clone)]
pub struct OrganizeOptions {
    /// Report what would happen without touching the filesystem.
    pub dry_run: bool,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Create missing category folders.
    pub create_category_folders: bool,
    /// Glob patterns, relative to the organize root, for entries to ignore.
    pub exclude: Vec<Pattern>,
}

impl Default for OrganizeOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            recursive: false,
            create_category_folders: true,
            exclude: Vec::new(),
        }
    }
}

/// Counters of a finished run.
///
/// `organized_files + skipped_files == total_files` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrganizeReport {
    pub total_files: usize,
    pub organized_files: usize,
    pub skipped_files: usize,
    /// Organized files per category.
    pub by_category: BTreeMap<Category, usize>,
}

/// How the directory tree is traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Traversal {
    /// Only the direct entries of the root.
    TopLevel,
    /// The whole tree below the root.
    Recursive,
}

/// What a discovered entry turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Symlink,
}

/// A file discovered during the walk.
#[derive(Debug, Clone)]
struct FileEntry {
    path: PathBuf,
    kind: EntryKind,
}

/// Organizes the files below one root directory.
///
/// # Examples
///
/// ```no_run
/// use file_organizer::events::TracingSink;
/// use file_organizer::organizer::{FileOrganizer, OrganizeOptions};
/// use std::path::Path;
///
/// let mut sink = TracingSink;
/// let options = OrganizeOptions { dry_run: true, ..Default::default() };
/// let report = FileOrganizer::new(Path::new("/home/user/Downloads"), &options, &mut sink)
///     .run()
///     .expect("directory exists");
/// println!("{} files would be organized", report.organized_files);
/// ```
pub struct FileOrganizer<'a, S: EventSink + ?Sized> {
    root: PathBuf,
    options: &'a OrganizeOptions,
    sink: &'a mut S,
    /// Destinations handed out during this run.
    claimed: HashSet<PathBuf>,
    report: OrganizeReport,
}

impl<'a, S: EventSink + ?Sized> FileOrganizer<'a, S> {
    pub fn new(root: &Path, options: &'a OrganizeOptions, sink: &'a mut S) -> Self {
        Self {
            root: root.to_path_buf(),
            options,
            sink,
            claimed: HashSet::new(),
            report: OrganizeReport::default(),
        }
    }

    /// Runs the organization and returns the counters.
    ///
    /// Fails only when the root is missing, is not a directory, or cannot be
    /// listed. Per-file problems are reported to the sink and counted as
    /// skipped.
    pub fn run(mut self) -> OrganizeResult<OrganizeReport> {
        if let Err(e) = self.check_root() {
            return Err(self.abort(e));
        }

        self.sink.record(OrganizeEvent::Started {
            directory: self.root.clone(),
            dry_run: self.options.dry_run,
            recursive: self.options.recursive,
        });

        let traversal = if self.options.recursive {
            Traversal::Recursive
        } else {
            Traversal::TopLevel
        };

        // Snapshot first, so files moved during the run are never seen twice.
        let entries = match traversal {
            Traversal::TopLevel => match self.list_top_level() {
                Ok(entries) => entries,
                Err(e) => return Err(self.abort(e)),
            },
            Traversal::Recursive => self.walk_recursive(),
        };

        for entry in entries {
            self.process(entry);
        }

        self.sink.record(OrganizeEvent::Finished(self.report.clone()));
        Ok(self.report)
    }

    /// Reports a fatal error to the sink and hands it back.
    fn abort(&mut self, error: OrganizeError) -> OrganizeError {
        self.sink.record(OrganizeEvent::Aborted {
            directory: self.root.clone(),
            reason: error.to_string(),
        });
        error
    }

    fn check_root(&self) -> OrganizeResult<()> {
        if !self.root.exists() {
            return Err(OrganizeError::DirectoryNotFound {
                path: self.root.clone(),
            });
        }
        if !self.root.is_dir() {
            return Err(OrganizeError::NotADirectory {
                path: self.root.clone(),
            });
        }
        Ok(())
    }

    /// Lists the direct entries of the root.
    fn list_top_level(&mut self) -> OrganizeResult<Vec<FileEntry>> {
        let read_dir = fs::read_dir(&self.root).map_err(|e| OrganizeError::ReadDir {
            path: self.root.clone(),
            source: e,
        })?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.sink.record(OrganizeEvent::WalkFailed {
                        path: Some(self.root.clone()),
                        error: e.to_string(),
                    });
                    continue;
                }
            };
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    self.sink.record(OrganizeEvent::WalkFailed {
                        path: Some(path),
                        error: e.to_string(),
                    });
                    continue;
                }
            };
            if let Some(kind) = entry_kind(&path, file_type) {
                entries.push(FileEntry { path, kind });
            }
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    /// Walks the whole tree, parents before children, siblings by name.
    ///
    /// Hidden and excluded directories are not descended into.
    fn walk_recursive(&mut self) -> Vec<FileEntry> {
        let root = self.root.clone();
        let options = self.options;
        let walker = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                !(e.file_type().is_dir()
                    && (is_hidden(e.path()) || is_excluded(&root, e.path(), &options.exclude)))
            });

        let mut entries = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if let Some(kind) = entry_kind(entry.path(), entry.file_type()) {
                        entries.push(FileEntry {
                            path: entry.into_path(),
                            kind,
                        });
                    }
                }
                Err(e) => self.sink.record(OrganizeEvent::WalkFailed {
                    path: e.path().map(Path::to_path_buf),
                    error: e.to_string(),
                }),
            }
        }
        entries
    }

    /// Applies the skip rules to one entry and moves it if it survives them.
    fn process(&mut self, entry: FileEntry) {
        let Some(file_name) = entry.path.file_name().map(OsStr::to_os_string) else {
            return;
        };

        if is_hidden_name(&file_name) || is_excluded(&self.root, &entry.path, &self.options.exclude)
        {
            return;
        }

        self.report.total_files += 1;

        if entry.kind == EntryKind::Symlink {
            self.skip(entry.path, SkipReason::SymbolicLink);
            return;
        }

        let Some(extension) = file_extension(&entry.path) else {
            self.skip(entry.path, SkipReason::NoExtension);
            return;
        };

        let category = classify(&extension);
        let category_dir = self.root.join(category.dir_name());

        if entry.path.parent() == Some(category_dir.as_path()) {
            self.skip(entry.path, SkipReason::AlreadyOrganized);
            return;
        }

        if let Some(problem) = self.unusable_category_dir(&category_dir) {
            self.fail(entry.path, category_dir, problem.to_string());
            return;
        }

        if self.options.dry_run {
            let destination = self.resolve_destination(&category_dir, &file_name);
            self.sink.record(OrganizeEvent::WouldMove {
                source: entry.path,
                destination,
                category,
            });
            self.organized(category);
            return;
        }

        if let Err(e) = self.ensure_category_dir(category, &category_dir) {
            self.fail(entry.path, category_dir, e.to_string());
            return;
        }

        let destination = self.resolve_destination(&category_dir, &file_name);
        match move_file(&entry.path, &destination) {
            Ok(()) => {
                self.sink.record(OrganizeEvent::Moved {
                    source: entry.path,
                    destination,
                    category,
                });
                self.organized(category);
            }
            Err(e) => self.fail(entry.path, destination, e.to_string()),
        }
    }

    fn fail(&mut self, source: PathBuf, destination: PathBuf, error: String) {
        self.sink.record(OrganizeEvent::MoveFailed {
            source,
            destination,
            error,
        });
        self.report.skipped_files += 1;
    }

    fn skip(&mut self, path: PathBuf, reason: SkipReason) {
        self.sink.record(OrganizeEvent::Skipped { path, reason });
        self.report.skipped_files += 1;
    }

    fn organized(&mut self, category: Category) {
        self.report.organized_files += 1;
        *self.report.by_category.entry(category).or_insert(0) += 1;
    }

    /// Why files cannot be moved into `dir`, checked the same way in dry and
    /// real runs.
    fn unusable_category_dir(&self, dir: &Path) -> Option<&'static str> {
        if dir.is_dir() {
            None
        } else if dir.symlink_metadata().is_ok() {
            Some("category folder path exists and is not a directory")
        } else if !self.options.create_category_folders {
            Some("category folder does not exist and folder creation is disabled")
        } else {
            None
        }
    }

    /// Creates the category folder on first need.
    fn ensure_category_dir(&mut self, category: Category, dir: &Path) -> io::Result<()> {
        if dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(dir)?;
        self.sink.record(OrganizeEvent::CategoryCreated {
            category,
            path: dir.to_path_buf(),
        });
        Ok(())
    }

    /// Picks `dir/name`, or the first free `dir/stem_N.ext`.
    ///
    /// A path is taken if it exists on disk or was already handed out in this
    /// run, so dry runs report the same names a real run would use.
    fn resolve_destination(&mut self, dir: &Path, file_name: &OsStr) -> PathBuf {
        let candidate = dir.join(file_name);
        let destination = if self.is_taken(&candidate) {
            (1u64..)
                .map(|n| dir.join(suffixed_name(file_name, n)))
                .find(|p| !self.is_taken(p))
                .unwrap_or(candidate)
        } else {
            candidate
        };

        self.claimed.insert(destination.clone());
        destination
    }

    fn is_taken(&self, path: &Path) -> bool {
        self.claimed.contains(path) || path.symlink_metadata().is_ok()
    }
}

/// Organizes `directory`, reporting every event to `sink`.
pub fn organize<S: EventSink + ?Sized>(
    directory: &Path,
    options: &OrganizeOptions,
    sink: &mut S,
) -> OrganizeResult<OrganizeReport> {
    FileOrganizer::new(directory, options, sink).run()
}

/// Sorts a walk entry into file, symlink, or neither (directories).
fn entry_kind(path: &Path, file_type: fs::FileType) -> Option<EntryKind> {
    if file_type.is_dir() {
        None
    } else if file_type.is_symlink() {
        // Links to directories are never followed and never counted.
        if path.is_dir() {
            None
        } else {
            Some(EntryKind::Symlink)
        }
    } else {
        Some(EntryKind::File)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name().is_some_and(is_hidden_name)
}

fn is_hidden_name(name: &OsStr) -> bool {
    name.as_encoded_bytes().starts_with(b".")
}

/// `stem_N.ext`, keeping the original bytes of the name.
fn suffixed_name(file_name: &OsStr, n: u64) -> OsString {
    let path = Path::new(file_name);
    let mut name = path.file_stem().unwrap_or(file_name).to_os_string();
    name.push(format!("_{}", n));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

fn is_excluded(root: &Path, path: &Path, exclude: &[Pattern]) -> bool {
    if exclude.is_empty() {
        return false;
    }
    let relative = path.strip_prefix(root).unwrap_or(path);
    exclude.iter().any(|p| p.matches_path(relative))
}

/// Returns the extension with its leading dot, e.g. `.jpg`.
///
/// `name.` has no extension.
fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{}", e))
}

/// Renames `source` to `destination`, copying across filesystems.
fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!(error = %e, "Rename crosses devices, falling back to copy+remove");
            fs::copy(source, destination)?;
            fs::remove_file(source)
        }
        Err(e) => Err(e),
    }
}
