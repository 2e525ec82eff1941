//! Candidate image discovery.
//!
//! Only lists files. Decoding, orientation and scaling belong to the display layer.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::types::Result;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Image files directly inside `dir`, sorted by file name.
///
/// A missing directory has no images.
pub fn list_candidates(dir: &Path) -> Result<Vec<String>> {
    let read = match fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    for entry in read {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_image(&name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

fn is_image(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Photo reference for a workshop page in spatial mode.
pub fn page_image(page: u32) -> String {
    format!("workshop_{}.jpg", page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_only_images_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["wall.PNG", "notes.txt", "shed.jpg", "a.jpeg"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("sub.jpg")).unwrap();

        let names = list_candidates(dir.path()).unwrap();
        assert_eq!(names, vec!["a.jpeg", "shed.jpg", "wall.PNG"]);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_candidates(&dir.path().join("absent")).unwrap().is_empty());
    }

    #[test]
    fn test_page_image_name() {
        assert_eq!(page_image(2), "workshop_2.jpg");
    }
}
