//! Fake device volumes for tests
//!
//! Builds the on-disk layout an iPhone mount exposes so scanners can be
//! exercised against a real directory tree in a temporary folder.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary mount point plus an empty destination folder
pub struct MockMount {
    temp_dir: TempDir,
}

impl MockMount {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("mount").join("DCIM")).unwrap();
        fs::create_dir_all(temp_dir.path().join("out")).unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("mount")
    }

    pub fn destination(&self) -> PathBuf {
        self.temp_dir.path().join("out")
    }

    /// Write a file under `DCIM/`, creating folders on the way
    pub fn add_dcim_file(&self, relative: &str, contents: &[u8]) -> PathBuf {
        let path = self.root().join("DCIM").join(relative);
        write_with_parents(&path, contents);
        path
    }

    /// Create an asset folder under `PhotoData/Mutations/DCIM/<device_folder>/`
    pub fn add_asset_folder(&self, device_folder: &str, asset: &str) -> PathBuf {
        let path = self.mutations_root().join(device_folder).join(asset);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Create an asset folder holding `Adjustments/FullSizeRender.<ext>`
    pub fn add_render(&self, device_folder: &str, asset: &str, ext: &str, contents: &[u8]) -> PathBuf {
        let folder = self.add_asset_folder(device_folder, asset);
        let path = folder
            .join("Adjustments")
            .join(format!("FullSizeRender.{}", ext));
        write_with_parents(&path, contents);
        path
    }

    pub fn mutations_root(&self) -> PathBuf {
        self.root().join("PhotoData").join("Mutations").join("DCIM")
    }

    /// Pre-populate the destination with a file
    pub fn occupy(&self, name: &str) -> PathBuf {
        let path = self.destination().join(name);
        fs::write(&path, b"existing").unwrap();
        path
    }

    /// Sorted file names currently in the destination
    pub fn destination_names(&self) -> Vec<String> {
        list_names(&self.destination())
    }
}

fn write_with_parents(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn list_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
