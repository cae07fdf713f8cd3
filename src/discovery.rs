use crate::error::{OptimizeError, Result};
use crate::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Returns true when `path` has one of `extensions` (compared lowercase).
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| extensions.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Lists the regular files directly inside `dir` whose extension is in
/// `extensions`, sorted by file name. Symlinks to files are followed; a
/// dangling link is skipped with a warning.
///
/// # Arguments
/// * `dir` - Directory to scan (not recursed into)
/// * `extensions` - Lowercase allow-list, e.g. `COMPRESSIBLE_EXTENSIONS`
///
/// # Returns
/// * `Ok(files)` - Matching files in lexicographic order
/// * `Err(OptimizeError::MissingInputDirectory)` - If `dir` is absent or not a directory
pub fn collect_image_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(OptimizeError::MissingInputDirectory(dir.to_path_buf()));
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        // The root itself may be hidden (e.g. a `.tmp` directory); only its entries are filtered.
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() > 0 => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let path = entry.path();
        if entry.file_type().is_file() && has_extension(path, extensions) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{COMPRESSIBLE_EXTENSIONS, REPORTED_EXTENSIONS};
    use std::fs::{self, File};
    use tempfile::TempDir;

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("a.jpg"), COMPRESSIBLE_EXTENSIONS));
        assert!(has_extension(Path::new("a.JPEG"), COMPRESSIBLE_EXTENSIONS));
        assert!(has_extension(Path::new("a.PnG"), COMPRESSIBLE_EXTENSIONS));
        assert!(!has_extension(Path::new("a.gif"), COMPRESSIBLE_EXTENSIONS));
        assert!(has_extension(Path::new("a.gif"), REPORTED_EXTENSIONS));
        assert!(has_extension(Path::new("clip.MP4"), REPORTED_EXTENSIONS));
        assert!(!has_extension(Path::new("a.txt"), REPORTED_EXTENSIONS));
        assert!(!has_extension(Path::new("jpg"), REPORTED_EXTENSIONS));
    }

    #[test]
    fn test_collect_image_files_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.png", "a.JPG", "c.jpeg", "notes.txt", "logo.svg", ".hidden.png"] {
            File::create(temp_dir.path().join(name)).unwrap();
        }

        let files = collect_image_files(temp_dir.path(), COMPRESSIBLE_EXTENSIONS).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.JPG", "b.png", "c.jpeg"]);
    }

    #[test]
    fn test_collect_image_files_not_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("nested.png");
        fs::create_dir(&subdir).unwrap();
        File::create(subdir.join("inner.png")).unwrap();
        File::create(temp_dir.path().join("top.png")).unwrap();

        let files = collect_image_files(temp_dir.path(), COMPRESSIBLE_EXTENSIONS).unwrap();
        assert_eq!(files, vec![temp_dir.path().join("top.png")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_image_files_follows_symlinks() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let shared = temp_dir.path().join("shared");
        let img_dir = temp_dir.path().join("img");
        fs::create_dir_all(&shared).unwrap();
        fs::create_dir_all(&img_dir).unwrap();
        File::create(shared.join("logo.png")).unwrap();
        symlink(shared.join("logo.png"), img_dir.join("logo.png")).unwrap();
        symlink(shared.join("gone.png"), img_dir.join("dangling.png")).unwrap();
        File::create(img_dir.join("photo.jpg")).unwrap();

        let files = collect_image_files(&img_dir, COMPRESSIBLE_EXTENSIONS).unwrap();
        assert_eq!(files, vec![img_dir.join("logo.png"), img_dir.join("photo.jpg")]);
    }

    #[test]
    fn test_collect_image_files_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        let result = collect_image_files(&missing, COMPRESSIBLE_EXTENSIONS);
        assert!(matches!(result, Err(OptimizeError::MissingInputDirectory(_))));
    }

    #[test]
    fn test_collect_image_files_file_is_not_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.png");
        File::create(&file).unwrap();
        let result = collect_image_files(&file, COMPRESSIBLE_EXTENSIONS);
        assert!(matches!(result, Err(OptimizeError::MissingInputDirectory(_))));
    }
}
