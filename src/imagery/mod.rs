//! Map image directory
//!
//! Map sheets are plain image files whose names contain the photo name used
//! in the spreadsheet (e.g. `0. 마전리 지질도.png` for photo `0. 마전리`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions recognised as map images (case-insensitive)
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image file not found: {0}")]
    NotFound(String),

    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// A directory of map images
#[derive(Debug, Clone, Default)]
pub struct ImageDirectory {
    dir: Option<PathBuf>,
}

impl ImageDirectory {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn set_path<P: Into<PathBuf>>(&mut self, dir: P) {
        self.dir = Some(dir.into());
    }

    pub fn is_valid(&self) -> bool {
        self.dir.as_ref().map(|d| d.is_dir()).unwrap_or(false)
    }

    /// Image files in file-name order
    pub fn image_files(&self) -> Vec<PathBuf> {
        let Some(dir) = self.dir.as_ref() else {
            return Vec::new();
        };
        let Ok(entries) = fs::read_dir(dir) else {
            log::debug!("Cannot read image directory {}", dir.display());
            return Vec::new();
        };
        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_image_file(p))
            .collect();
        files.sort();
        files
    }

    /// First image whose file name contains `photo_name`
    pub fn find_image(&self, photo_name: &str) -> Option<PathBuf> {
        if photo_name.is_empty() {
            return None;
        }
        let found = self
            .image_files()
            .into_iter()
            .find(|p| file_name(p).contains(photo_name));
        if found.is_none() {
            log::debug!("No image found for: {}", photo_name);
        }
        found
    }

    /// Filter-button prefixes: for each image file, the first photo name it
    /// contains. Returns prefix -> first matching image, sorted by prefix.
    pub fn prefix_images(&self, photo_names: &[String]) -> BTreeMap<String, PathBuf> {
        let mut map = BTreeMap::new();
        for path in self.image_files() {
            let name = file_name(&path);
            if let Some(prefix) = photo_names
                .iter()
                .find(|p| !p.trim().is_empty() && name.contains(p.as_str()))
            {
                map.entry(prefix.clone()).or_insert(path);
            }
        }
        log::debug!("Found {} unique image prefixes", map.len());
        map
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Decoded RGBA map image
#[derive(Clone)]
pub struct MapImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for MapImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapImage")
            .field("path", &self.path)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl MapImage {
    /// Decode an image file into RGBA8
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ImageError::NotFound(path.display().to_string()));
        }
        let img = image::open(path)
            .map_err(|source| ImageError::Decode {
                path: path.display().to_string(),
                source,
            })?
            .to_rgba8();
        let (width, height) = img.dimensions();
        log::debug!("Decoded {} ({}x{})", path.display(), width, height);
        Ok(Self {
            path: path.to_path_buf(),
            width,
            height,
            rgba: img.into_raw(),
        })
    }

    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("a.PNG")));
        assert!(is_image_file(Path::new("b.jpeg")));
        assert!(!is_image_file(Path::new("c.xlsx")));
        assert!(!is_image_file(Path::new("noext")));
    }

    #[test]
    fn test_find_image_by_photo_name() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "0. 마전리 지질도.png");
        touch(dir.path(), "1. 오호.jpg");
        touch(dir.path(), "1. 오호.txt");

        let images = ImageDirectory::new(dir.path());
        let found = images.find_image("1. 오호").unwrap();
        assert_eq!(found.file_name().unwrap().to_str().unwrap(), "1. 오호.jpg");
        assert!(images.find_image("3. 만대리").is_none());
        assert!(images.find_image("").is_none());
    }

    #[test]
    fn test_prefix_images() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "0. 마전리 a.png");
        touch(dir.path(), "0. 마전리 b.png");
        touch(dir.path(), "3. 만대리.bmp");
        touch(dir.path(), "unrelated.png");

        let names = vec!["3. 만대리".to_string(), "0. 마전리".to_string(), " ".to_string()];
        let images = ImageDirectory::new(dir.path());
        let prefixes = images.prefix_images(&names);

        let keys: Vec<&String> = prefixes.keys().collect();
        assert_eq!(keys, vec!["0. 마전리", "3. 만대리"]);
        assert!(prefixes["0. 마전리"].ends_with("0. 마전리 a.png"));
    }

    #[test]
    fn test_unset_directory() {
        let images = ImageDirectory::default();
        assert!(!images.is_valid());
        assert!(images.image_files().is_empty());
    }

    #[test]
    fn test_decode_missing_image() {
        let err = MapImage::from_file("/nonexistent/map.png").unwrap_err();
        assert!(matches!(err, ImageError::NotFound(_)));
    }
}
