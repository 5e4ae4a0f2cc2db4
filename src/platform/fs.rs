// LeadSweep - platform/fs.rs
//
// Filesystem helpers for input and output files.

use crate::util::constants;
use crate::util::error::{ExportError, InputFormatError};
use std::io;
use std::path::{Path, PathBuf};

/// Fail if `path` is larger than `MAX_INPUT_FILE_SIZE`.
pub fn check_input_size(path: &Path) -> Result<u64, InputFormatError> {
    let metadata = std::fs::metadata(path).map_err(|e| InputFormatError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    if metadata.len() > constants::MAX_INPUT_FILE_SIZE {
        return Err(InputFormatError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_INPUT_FILE_SIZE,
        });
    }
    Ok(metadata.len())
}

/// Read a text file, decoding as UTF-8 and falling back to Windows-1252
/// (the usual encoding of CSVs saved from Excel on Windows).
pub fn read_text(path: &Path) -> Result<String, InputFormatError> {
    check_input_size(path)?;
    let bytes = std::fs::read(path).map_err(|e| InputFormatError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(decode_text(bytes))
}

/// Decode bytes as UTF-8, or as Windows-1252 when they are not valid UTF-8.
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!("Input is not valid UTF-8; decoding as Windows-1252");
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}

/// Write several files atomically (write temp → rename) so that either all
/// of them land or none do.
///
/// Every file is written to its temp sibling first; nothing is renamed until
/// all temp writes have succeeded. If a rename fails, the remaining temp
/// files and every target already renamed by this call are removed.
pub fn write_atomic_all(files: &[(&Path, &[u8])]) -> Result<(), ExportError> {
    let io_err = |path: &Path, e: io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(files.len());
    for &(path, bytes) in files {
        match stage(path, bytes) {
            Ok(tmp) => staged.push((tmp, path)),
            Err(e) => {
                for (tmp, _) in &staged {
                    let _ = std::fs::remove_file(tmp);
                }
                return Err(io_err(path, e));
            }
        }
    }

    for (idx, &(ref tmp, path)) in staged.iter().enumerate() {
        if let Err(e) = std::fs::rename(tmp, path) {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Rename failed; rolling back files written by this run"
            );
            for (pending, _) in &staged[idx..] {
                let _ = std::fs::remove_file(pending);
            }
            for (_, done) in &staged[..idx] {
                let _ = std::fs::remove_file(done);
            }
            return Err(io_err(path, e));
        }
    }

    for &(path, bytes) in files {
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "File written");
    }
    Ok(())
}

/// Write `bytes` to `<path>.tmp`, creating parent directories as needed.
/// Returns the temp path. A failed write removes the partial temp file.
fn stage(path: &Path, bytes: &[u8]) -> io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, bytes).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        e
    })?;
    Ok(tmp)
}
