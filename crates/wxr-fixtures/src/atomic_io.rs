//! Atomic file output.
//!
//! The document is streamed into a hidden temporary file next to the target
//! and renamed into place once it is complete, so a failed run never leaves a
//! truncated export behind.

use std::io::{self, BufWriter, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, File, OpenOptions};

use crate::error::WxrError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Streams `render` into `path` inside `dir` via a temp file and rename.
///
/// `path` must be a bare file name relative to `dir`.
///
/// # Errors
///
/// Returns [`WxrError::Output`] if the temp file cannot be created, synced
/// or renamed, and whatever `render` returns if rendering fails. The temp
/// file is removed on every failure path.
pub(crate) fn write_atomic<F>(dir: &Dir, path: &Utf8Path, render: F) -> Result<(), WxrError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), WxrError>,
{
    let output_error = |message: String| WxrError::Output {
        path: path.to_path_buf(),
        message,
    };
    let mut components = path.components();
    let (Some(Utf8Component::Normal(file_name)), None) = (components.next(), components.next())
    else {
        return Err(output_error("output path must be a file".to_owned()));
    };
    let tmp_name = temp_name(file_name);

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let file = dir
        .open_with(&tmp_name, &options)
        .map_err(|err| output_error(err.to_string()))?;

    if let Err(err) = fill_temp_file(file, render) {
        drop(dir.remove_file(&tmp_name));
        return Err(match err {
            WxrError::Io(io_err) => output_error(io_err.to_string()),
            other => other,
        });
    }

    if let Err(err) = rename_temp_to_target(dir, &tmp_name, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(output_error(err.to_string()));
    }
    sync_directory(dir);

    Ok(())
}

fn temp_name(file_name: &str) -> String {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    format!(
        ".{}.tmp.{}.{}.{}",
        file_name,
        std::process::id(),
        suffix,
        counter
    )
}

fn fill_temp_file<F>(file: File, render: F) -> Result<(), WxrError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), WxrError>,
{
    let mut buffered = BufWriter::new(file);
    render(&mut buffered)?;
    let written = buffered
        .into_inner()
        .map_err(|err| WxrError::Io(err.into_error()))?;
    written.sync_all()?;
    Ok(())
}

#[cfg(windows)]
fn rename_temp_to_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists, so remove it first.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn rename_temp_to_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn sync_directory(dir: &Dir) {
    // Best-effort directory sync; ignore failures.
    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        // Ignore sync failures.
    }
}
