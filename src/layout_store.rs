//! Layout store - named layouts saved as JSON files
//!
//! Each layout lives in `<dir>/<LayoutName>.json`. The default directory is
//! `~/.config/dockspace/layouts/`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::layout::{Layout, LayoutError};

#[derive(Debug, Clone)]
pub struct LayoutStore {
    dir: PathBuf,
}

impl LayoutStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the user's layouts directory
    pub fn open_default() -> Option<Self> {
        crate::config_paths::layouts_dir().map(Self::new)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds the layout called `name`
    pub fn path_for(&self, name: &str) -> PathBuf {
        let file_name: String = name
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c => c,
            })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }

    pub fn save(&self, layout: &Layout) -> Result<PathBuf, LayoutError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&layout.name);
        fs::write(&path, layout.to_json()?)?;
        tracing::debug!(name = %layout.name, path = %path.display(), "saved layout");
        Ok(path)
    }

    /// Load the layout called `name`; a missing file is `Ok(None)`
    pub fn load(&self, name: &str) -> Result<Option<Layout>, LayoutError> {
        let path = self.path_for(name);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Layout::from_json(&json).map(Some)
    }

    /// Names of all stored layouts, sorted
    pub fn list(&self) -> Result<Vec<String>, LayoutError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn remove(&self, name: &str) -> Result<bool, LayoutError> {
        match fs::remove_file(self.path_for(name)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
