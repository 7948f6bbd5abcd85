use crate::error::{HazeError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Regular files of `path`, sorted by file name.
///
/// Fails if `path` does not exist, is not a directory or holds a
/// subdirectory.
pub fn list_dir(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(HazeError::runtime(format!(
            "list_dir: {} doesn't exist",
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(HazeError::runtime(format!(
            "list_dir: {} isn't a directory",
            path.display()
        )));
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(path).map_err(|e| HazeError::io(path, e))? {
        let entry = entry.map_err(|e| HazeError::io(path, e))?;
        let entry_path = entry.path();
        if entry_path.is_dir() {
            return Err(HazeError::runtime(format!(
                "list_dir: {} isn't a file",
                entry_path.display()
            )));
        }
        files.push(entry_path);
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Fails unless `path` is an existing, empty directory.
pub fn ensure_empty_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(HazeError::runtime(format!(
            "output directory {} doesn't exist or isn't a directory",
            path.display()
        )));
    }
    let mut entries = fs::read_dir(path).map_err(|e| HazeError::io(path, e))?;
    if entries.next().is_some() {
        return Err(HazeError::runtime(format!(
            "output directory {} isn't empty",
            path.display()
        )));
    }
    Ok(())
}

/// File names written for one input in dehazing mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputNames {
    pub image: String,
    pub dark_channel: String,
    pub transmission: String,
}

/// `photo.tar.png` → `photo.tar.png`, `photo_dc.tar.png`, `photo_tr.tar.png`.
///
/// The name splits at its first `.`; a name without one gets plain suffixes.
pub fn output_names(file_name: &str) -> OutputNames {
    let (stem, ext) = match file_name.find('.') {
        Some(i) => file_name.split_at(i),
        None => (file_name, ""),
    };
    OutputNames {
        image: file_name.to_string(),
        dark_channel: format!("{stem}_dc{ext}"),
        transmission: format!("{stem}_tr{ext}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixes_go_before_the_first_dot() {
        let names = output_names("photo.tar.png");
        assert_eq!(names.image, "photo.tar.png");
        assert_eq!(names.dark_channel, "photo_dc.tar.png");
        assert_eq!(names.transmission, "photo_tr.tar.png");

        let names = output_names("noext");
        assert_eq!(names.dark_channel, "noext_dc");
        assert_eq!(names.transmission, "noext_tr");
    }

    #[test]
    fn list_dir_sorts_and_rejects_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["3.txt", "1.txt", "2.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let names: Vec<_> = list_dir(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["1.txt", "2.txt", "3.txt"]);

        fs::create_dir(dir.path().join("nested")).unwrap();
        assert!(list_dir(dir.path()).unwrap_err().is_runtime());
        assert!(list_dir(&dir.path().join("missing")).unwrap_err().is_runtime());
        assert!(list_dir(&dir.path().join("1.txt")).unwrap_err().is_runtime());
    }

    #[test]
    fn ensure_empty_dir_checks_contents() {
        let dir = tempfile::tempdir().unwrap();
        ensure_empty_dir(dir.path()).unwrap();
        fs::write(dir.path().join("a.png"), b"x").unwrap();
        assert!(ensure_empty_dir(dir.path()).unwrap_err().is_runtime());
        assert!(ensure_empty_dir(&dir.path().join("missing")).unwrap_err().is_runtime());
    }
}
