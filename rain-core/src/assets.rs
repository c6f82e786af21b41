use std::{fs, path::{Path, PathBuf}};

/// Decorative image shown alongside the form. Never required for prediction.
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Read the image, or warn and return `None` if it cannot be read.
pub fn load_background(path: &Path) -> Option<BackgroundImage> {
    match fs::read(path) {
        Ok(bytes) => {
            tracing::debug!("Loaded background image {} ({} bytes)", path.display(), bytes.len());
            Some(BackgroundImage {
                path: path.to_path_buf(),
                bytes,
            })
        }
        Err(e) => {
            tracing::warn!("Background image {} unavailable: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_degrades_to_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(load_background(&dir.path().join("rain.jpg")).is_none());
    }

    #[test]
    fn existing_image_is_read() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("rain.jpg");
        fs::write(&path, [0xFF, 0xD8, 0xFF]).expect("write image");

        let image = load_background(&path).expect("image should load");
        assert_eq!(image.bytes, vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(image.path, path);
    }
}
