use crate::core::errors::{IoContext, Result};
use crate::models::file_entry::{format_modified, unix_seconds, FileEntry, FileKind};
use crate::services::fs::owners::NameResolver;
use serde::Serialize;
use std::ffi::{OsStr, OsString};
use std::fs::{self, Metadata};
use std::io::Write;
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use std::time::UNIX_EPOCH;

#[derive(Debug, Serialize, Clone)]
pub struct FileEntryDto {
    pub name: String,
    pub kind: &'static str,
    pub permissions: String,
    pub owner: String,
    pub group: String,
    pub size: u64,
    pub modified: String,
    /// Seconds since the epoch, negative before 1970.
    pub modified_unix: i64,
}

impl From<&FileEntry> for FileEntryDto {
    fn from(entry: &FileEntry) -> Self {
        Self {
            name: entry.name.clone(),
            kind: entry.kind.as_str(),
            permissions: entry.permissions(),
            owner: entry.owner.clone(),
            group: entry.group.clone(),
            size: entry.size,
            modified: format_modified(entry.modified),
            modified_unix: unix_seconds(entry.modified),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Streams one [`FileEntry`] per directory entry to `visit`, `.` and `..` first.
///
/// Entries keep the order the OS enumerates them in. An entry that cannot be
/// stat-ed is skipped. Returns how many entries were visited.
pub fn list_dir<F>(path: &Path, mut visit: F) -> Result<usize>
where
    F: FnMut(FileEntry) -> Result<()>,
{
    let entries = fs::read_dir(path).context("Error opening directory")?;
    let mut resolver = NameResolver::default();
    let mut visited = 0;

    // read_dir never yields the dot entries
    let dots = [OsString::from("."), OsString::from("..")];
    let names = dots
        .into_iter()
        .map(Ok)
        .chain(entries.map(|entry| entry.map(|e| e.file_name())));

    for name in names {
        let name = match name {
            Ok(name) => name,
            Err(err) => {
                tracing::debug!("Skipping unreadable entry in {:?}: {}", path, err);
                continue;
            }
        };
        let full = path.join(&name);
        let metadata = match fs::metadata(&full) {
            Ok(md) => md,
            Err(err) => {
                tracing::debug!("Skipping {:?}: {}", full, err);
                continue;
            }
        };
        visit(entry_from_metadata(&name, &metadata, &mut resolver))?;
        visited += 1;
    }

    Ok(visited)
}

fn entry_from_metadata(name: &OsStr, md: &Metadata, resolver: &mut NameResolver) -> FileEntry {
    let kind = if md.is_dir() {
        FileKind::Dir
    } else if md.is_file() {
        FileKind::File
    } else {
        FileKind::Other
    };
    FileEntry {
        name: os_str_to_string(name),
        kind,
        mode: md.mode(),
        owner: resolver.owner(md.uid()),
        group: resolver.group(md.gid()),
        size: md.size(),
        modified: md.modified().unwrap_or(UNIX_EPOCH),
    }
}

pub fn write_entry<W: Write>(out: &mut W, entry: &FileEntry, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "{entry}").context("Error writing to standard output")?;
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, &FileEntryDto::from(entry))?;
            out.write_all(b"\n")
                .context("Error writing to standard output")?;
        }
    }
    Ok(())
}

fn os_str_to_string(s: impl AsRef<OsStr>) -> String {
    s.as_ref().to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::Error;
    use crate::models::file_entry::UNKNOWN_MODIFIED;
    use std::os::unix::fs::PermissionsExt;
    use std::time::Duration;
    use tempfile::TempDir;

    fn entry_modified_at(modified: std::time::SystemTime) -> FileEntry {
        FileEntry {
            name: "stamp".to_string(),
            kind: FileKind::File,
            mode: 0o100600,
            owner: "0".to_string(),
            group: "0".to_string(),
            size: 0,
            modified,
        }
    }

    fn collect(path: &Path) -> Result<Vec<FileEntry>> {
        let mut entries = Vec::new();
        list_dir(path, |entry| {
            entries.push(entry);
            Ok(())
        })?;
        Ok(entries)
    }

    #[test]
    fn lists_dot_entries_first() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let entries = collect(dir.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(&names[..2], &[".", ".."]);
        assert!(names.contains(&"a.txt"));
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind, FileKind::Dir);
    }

    #[test]
    fn regular_file_fields() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("hello.txt");
        fs::write(&file, "hello").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();

        let entries = collect(dir.path()).unwrap();
        let entry = entries.iter().find(|e| e.name == "hello.txt").unwrap();

        assert_eq!(entry.kind, FileKind::File);
        assert_eq!(entry.size, 5);
        assert_eq!(entry.permissions(), "-rw-r--r--");
        assert!(!entry.owner.is_empty());
        assert!(!entry.group.is_empty());

        let line = entry.to_string();
        assert!(line.starts_with("-rw-r--r-- "));
        assert!(line.contains(" 5 "));
        assert!(line.ends_with(" hello.txt"));
    }

    #[test]
    fn subdirectory_gets_d_prefix() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let entries = collect(dir.path()).unwrap();
        let nested = entries.iter().find(|e| e.name == "nested").unwrap();
        assert!(nested.permissions().starts_with('d'));
    }

    #[test]
    fn dangling_symlink_is_skipped() {
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();
        fs::write(dir.path().join("kept"), "x").unwrap();

        let entries = collect(dir.path()).unwrap();
        assert!(entries.iter().all(|e| e.name != "dangling"));
        assert!(entries.iter().any(|e| e.name == "kept"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = collect(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(
            err,
            Error::Io {
                context: "Error opening directory",
                ..
            }
        ));
    }

    #[test]
    fn visitor_error_stops_listing() {
        let dir = TempDir::new().unwrap();
        let mut seen = 0;
        let result = list_dir(dir.path(), |_| {
            seen += 1;
            Err(Error::PartialWrite {
                written: 0,
                expected: 1,
            })
        });
        assert!(result.is_err());
        assert_eq!(seen, 1);
    }

    #[test]
    fn json_output_is_one_object_per_line() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("data.bin"), [0u8; 12]).unwrap();

        let mut out = Vec::new();
        list_dir(dir.path(), |entry| write_entry(&mut out, &entry, OutputFormat::Json)).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        let data = lines.iter().find(|v| v["name"] == "data.bin").unwrap();
        assert_eq!(data["kind"], "file");
        assert_eq!(data["size"], 12);
        assert_eq!(data["permissions"].as_str().unwrap().len(), 10);
    }

    #[test]
    fn dto_keeps_pre_epoch_seconds() {
        let dto = FileEntryDto::from(&entry_modified_at(UNIX_EPOCH - Duration::from_secs(86_400)));
        assert_eq!(dto.modified_unix, -86_400);
        assert_ne!(dto.modified, UNKNOWN_MODIFIED);
    }

    #[test]
    fn dto_tolerates_unformattable_time() {
        let far_future = UNIX_EPOCH + Duration::from_secs(10_000_000_000_000);
        let entry = entry_modified_at(far_future);

        let dto = FileEntryDto::from(&entry);
        assert_eq!(dto.modified, UNKNOWN_MODIFIED);
        assert_eq!(dto.modified_unix, 10_000_000_000_000);

        let mut out = Vec::new();
        write_entry(&mut out, &entry, OutputFormat::Text).unwrap();
        let line = String::from_utf8(out).unwrap();
        assert!(line.contains(UNKNOWN_MODIFIED));
        assert!(line.ends_with(" stamp\n"));
    }

    #[test]
    fn file_with_extreme_mtime_is_listed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("future.txt");
        let file = fs::File::create(&path).unwrap();
        // the filesystem may clamp this; listing must succeed either way
        let _ = file.set_modified(UNIX_EPOCH + Duration::from_secs(10_000_000_000_000));
        drop(file);

        let mut lines = Vec::new();
        list_dir(dir.path(), |entry| {
            lines.push(entry.to_string());
            Ok(())
        })
        .unwrap();

        assert_eq!(lines.len(), 3);
        assert!(lines.iter().any(|l| l.ends_with(" future.txt")));
    }
}
