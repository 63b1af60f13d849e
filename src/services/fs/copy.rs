use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::core::errors::{Error, IoContext, Result};

pub const CHUNK_SIZE: usize = 8192;

/// Streams `reader` into `writer` one chunk at a time.
///
/// Each chunk goes out in a single `write` call; a short write is fatal.
/// `on_chunk` is called with the size of every chunk after it is written;
/// an error from it stops the copy.
pub fn copy_chunked<R, W, F>(reader: &mut R, writer: &mut W, mut on_chunk: F) -> Result<u64>
where
    R: Read,
    W: Write,
    F: FnMut(usize) -> Result<()>,
{
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let read = reader
            .read(&mut buffer)
            .context("Failed to read from source file")?;
        if read == 0 {
            break;
        }
        let written = writer
            .write(&buffer[..read])
            .context("Failed to write to destination file")?;
        if written != read {
            return Err(Error::PartialWrite {
                written,
                expected: read,
            });
        }
        total += read as u64;
        on_chunk(read)?;
    }
    Ok(total)
}

/// Copies `src` to `dst`, creating or truncating the destination.
pub fn copy_file<F: FnMut(usize) -> Result<()>>(src: &Path, dst: &Path, on_chunk: F) -> Result<u64> {
    let mut source = File::open(src).context("Failed to open the source file for reading")?;
    let mut dest = File::create(dst)
        .context("Failed to open or create the destination file for writing")?;

    let copied = copy_chunked(&mut source, &mut dest, on_chunk)?;
    dest.flush()
        .context("Failed to write to destination file")?;

    tracing::debug!(
        src = %src.display(),
        dst = %dst.display(),
        bytes = copied,
        "copy finished"
    );
    Ok(copied)
}
