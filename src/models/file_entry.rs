use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub kind: FileKind,
    /// Raw `st_mode`, type bits included.
    pub mode: u32,
    pub owner: String,
    pub group: String,
    pub size: u64,
    pub modified: SystemTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Dir,
    Other,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::File => "file",
            FileKind::Dir => "dir",
            FileKind::Other => "other",
        }
    }
}

const PERMISSION_BITS: [(u32, char); 9] = [
    (0o400, 'r'),
    (0o200, 'w'),
    (0o100, 'x'),
    (0o040, 'r'),
    (0o020, 'w'),
    (0o010, 'x'),
    (0o004, 'r'),
    (0o002, 'w'),
    (0o001, 'x'),
];

/// Renders `drwxr-xr-x` style permissions: type char, then owner/group/other.
pub fn permission_string(kind: FileKind, mode: u32) -> String {
    let mut out = String::with_capacity(10);
    out.push(if kind == FileKind::Dir { 'd' } else { '-' });
    for (bit, ch) in PERMISSION_BITS {
        out.push(if mode & bit != 0 { ch } else { '-' });
    }
    out
}

pub const UNKNOWN_MODIFIED: &str = "??/??/?? @ ??:??";

/// Whole seconds relative to the epoch, rounded toward negative infinity.
pub fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(before) => {
            let before = before.duration();
            let secs = i64::try_from(before.as_secs()).unwrap_or(i64::MAX);
            let partial = i64::from(before.subsec_nanos() > 0);
            (-secs).saturating_sub(partial)
        }
    }
}

/// Formats as `yy/mm/dd @ HH:MM` in the local zone, or UTC if it is unknown.
pub fn format_modified(modified: SystemTime) -> String {
    let offset = OffsetDateTime::from_unix_timestamp(unix_seconds(modified))
        .ok()
        .and_then(|utc| UtcOffset::local_offset_at(utc).ok())
        .unwrap_or(UtcOffset::UTC);
    format_modified_at(modified, offset)
}

/// Times outside the calendar range `time` supports render as [`UNKNOWN_MODIFIED`].
pub fn format_modified_at(modified: SystemTime, offset: UtcOffset) -> String {
    let format = format_description!("[year repr:last_two]/[month]/[day] @ [hour]:[minute]");
    OffsetDateTime::from_unix_timestamp(unix_seconds(modified))
        .ok()
        .and_then(|utc| utc.checked_to_offset(offset))
        .and_then(|local| local.format(format).ok())
        .unwrap_or_else(|| UNKNOWN_MODIFIED.to_string())
}

impl FileEntry {
    pub fn permissions(&self) -> String {
        permission_string(self.kind, self.mode)
    }

    pub fn modified_display(&self) -> String {
        format_modified(self.modified)
    }
}

impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.permissions(),
            self.owner,
            self.group,
            self.size,
            self.modified_display(),
            self.name
        )
    }
}
