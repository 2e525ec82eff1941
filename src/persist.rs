//! Line-delimited JSON file I/O.
//!
//! Every persisted file is UTF-8 with one JSON value per line. Reads also
//! accept a single JSON array document, the layout of the first schema.
//! Writes replace the whole file; with `atomic` set the data goes to a
//! sibling `*.tmp` file that is then renamed over the target, otherwise the
//! target is truncated in place and a crash mid-write can leave it corrupt.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::types::Result;

/// One decoded line (or array element) of a persisted file.
#[derive(Debug)]
pub struct Entry {
    /// 1-based line number, or 1-based array position for array documents.
    pub line: usize,
    pub value: std::result::Result<Value, serde_json::Error>,
}

/// Read all entries from `path`. A missing file yields no entries.
///
/// A line that is not valid JSON is reported per entry; an array document
/// that fails to parse aborts the whole read.
pub fn read_entries(path: &Path) -> Result<Vec<Entry>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("persist_file_missing: path={}", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    if text.trim_start().starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(&text)?;
        return Ok(values
            .into_iter()
            .enumerate()
            .map(|(i, value)| Entry {
                line: i + 1,
                value: Ok(value),
            })
            .collect());
    }

    Ok(text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| Entry {
            line: i + 1,
            value: serde_json::from_str(line),
        })
        .collect())
}

/// Overwrite `path` with one JSON line per item.
pub fn write_lines<T, I>(path: &Path, items: I, atomic: bool) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut buf = Vec::new();
    let mut count = 0usize;
    for item in items {
        serde_json::to_writer(&mut buf, &item)?;
        buf.push(b'\n');
        count += 1;
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    if atomic {
        let tmp = temp_path(path);
        let replaced = write_synced(&tmp, &buf).and_then(|()| fs::rename(&tmp, path));
        if let Err(e) = replaced {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
    } else {
        fs::write(path, &buf)?;
    }

    tracing::debug!(
        "persist_file_written: path={}, entries={}, atomic={}",
        path.display(),
        count,
        atomic
    );
    Ok(())
}

fn write_synced(path: &Path, buf: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(buf)?;
    file.sync_all()
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let entries = read_entries(&dir.path().join("nope.jsonl")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_write_then_read_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("items.jsonl");
        write_lines(&path, ["a", "b"], true).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "\"a\"\n\"b\"\n");
        assert!(!dir.path().join("nested").join("items.jsonl.tmp").exists());

        let entries = read_entries(&path).unwrap();
        let values: Vec<Value> = entries.into_iter().map(|e| e.value.unwrap()).collect();
        assert_eq!(values, vec![json!("a"), json!("b")]);
    }

    #[test]
    fn test_failed_atomic_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.jsonl");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupant"), b"x").unwrap();

        assert!(write_lines(&path, ["a"], true).is_err());
        assert!(!dir.path().join("items.jsonl.tmp").exists());
    }

    #[test]
    fn test_failed_temp_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.jsonl");
        // a directory where the temp file should go makes the temp write fail
        fs::create_dir(dir.path().join("items.jsonl.tmp")).unwrap();

        assert!(write_lines(&path, ["a"], true).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_in_place_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.jsonl");
        write_lines(&path, [1, 2, 3], false).unwrap();
        assert_eq!(read_entries(&path).unwrap().len(), 3);
    }

    #[test]
    fn test_empty_write_reads_back_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.jsonl");
        write_lines(&path, Vec::<Value>::new(), true).unwrap();
        assert!(read_entries(&path).unwrap().is_empty());
    }

    #[test]
    fn test_array_document_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.json");
        fs::write(&path, r#"  [{"a": 1}, {"a": 2}]"#).unwrap();

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].line, 2);
    }

    #[test]
    fn test_bad_line_reported_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.jsonl");
        fs::write(&path, "{\"a\": 1}\n\nnot json\n").unwrap();

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].value.is_ok());
        assert_eq!(entries[1].line, 3);
        assert!(entries[1].value.is_err());
    }

    #[test]
    fn test_broken_array_document_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.json");
        fs::write(&path, "[{\"a\": 1},").unwrap();
        assert!(read_entries(&path).is_err());
    }
}
