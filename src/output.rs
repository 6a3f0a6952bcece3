//! Writing rendered transcripts to their destination.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::WhispError;

/// Write `content` to `writer`, terminating it with a newline if needed.
pub fn write_stdout<W: Write>(writer: &mut W, content: &str) -> io::Result<()> {
    writer.write_all(content.as_bytes())?;
    if !content.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Path a failed write is preserved under when `keep_partial` is requested.
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".partial");
    PathBuf::from(name)
}

/// Write `content` to `path` atomically.
///
/// The content goes to a temporary file in the destination directory which is
/// renamed over `path` once fully written. On failure the temporary file is
/// removed, or moved to `<path>.partial` when `keep_partial` is set, so the
/// final path never holds a half-written file.
pub fn atomic_write(path: &Path, content: &str, keep_partial: bool) -> Result<(), WhispError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|err| output_error(path, err))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(&dir)
        .map_err(|err| output_error(path, err))?;

    if let Err(err) = write_all_synced(&mut temp, content) {
        discard(temp, path, keep_partial);
        return Err(output_error(path, err));
    }

    temp.persist(path).map_err(|err| {
        let cause = err.error;
        discard(err.file, path, keep_partial);
        output_error(path, cause)
    })?;
    Ok(())
}

fn write_all_synced(temp: &mut NamedTempFile, content: &str) -> io::Result<()> {
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()
}

fn discard(temp: NamedTempFile, dest: &Path, keep_partial: bool) {
    if !keep_partial {
        // Dropping the handle deletes the file.
        return;
    }
    let partial = partial_path(dest);
    if let Err(err) = temp.persist(&partial) {
        log::warn!("could not keep partial output {}: {}", partial.display(), err.error);
    }
}

fn output_error(path: &Path, err: io::Error) -> WhispError {
    WhispError::Output(format!("failed to write {}: {err}", path.display()))
}
