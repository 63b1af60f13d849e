use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::core::errors::{IoContext, Result};

/// Writes every byte of `reader` to `out`, last byte first.
///
/// The scan repositions the cursor before each one-byte read, so the reader
/// only needs to support absolute seeks. Returns the number of bytes written.
pub fn reverse_bytes<R, W>(reader: &mut R, out: &mut W) -> Result<u64>
where
    R: Read + Seek,
    W: Write,
{
    let len = reader
        .seek(SeekFrom::End(0))
        .context("Error getting file size")?;

    let mut byte = [0u8; 1];
    for offset in (0..len).rev() {
        reader
            .seek(SeekFrom::Start(offset))
            .context("Error seeking in the file")?;
        reader
            .read_exact(&mut byte)
            .context("Error reading the file")?;
        out.write_all(&byte)
            .context("Error writing to standard output")?;
    }
    Ok(len)
}

/// Prints the file at `path` reversed, followed by a newline.
pub fn reverse_file<W: Write>(path: &Path, out: &mut W) -> Result<u64> {
    let mut file = File::open(path).context("Error opening the file")?;
    let written = reverse_bytes(&mut file, out)?;
    out.write_all(b"\n")
        .and_then(|_| out.flush())
        .context("Error writing to standard output")?;
    tracing::debug!(path = %path.display(), bytes = written, "reversed file");
    Ok(written)
}
