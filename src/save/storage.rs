use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;

use super::SaveData;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Could not resolve a data directory")]
    NoSaveDir,
}

/// Where the save and the optional config override live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub data_dir: PathBuf,
    pub save_path: PathBuf,
    pub config_path: PathBuf,
}

impl Paths {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let data_dir = dir.into();
        Self {
            save_path: data_dir.join("save.json"),
            config_path: data_dir.join("config.json"),
            data_dir,
        }
    }
}

pub fn project_paths() -> Result<Paths, SaveError> {
    let proj = ProjectDirs::from("com", "deskpet", "DeskPet").ok_or(SaveError::NoSaveDir)?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir)?;
    Ok(Paths::in_dir(dir))
}

/// Per-user data directory, or the working directory if there is none.
pub fn project_paths_or_cwd() -> Paths {
    match project_paths() {
        Ok(paths) => paths,
        Err(e) => {
            log::warn!("{e}; saving next to the working directory");
            Paths::in_dir(".")
        }
    }
}

pub fn load(path: &Path) -> Result<SaveData, SaveError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Missing, unreadable and malformed files all yield defaults.
pub fn load_or_default(path: &Path) -> SaveData {
    match load(path) {
        Ok(data) => {
            log::info!("Loaded save from {}", path.display());
            data
        }
        Err(SaveError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("No save at {}, starting fresh", path.display());
            SaveData::default()
        }
        Err(e) => {
            log::warn!("Could not load {} ({e}), starting fresh", path.display());
            SaveData::default()
        }
    }
}

/// Pretty-printed JSON written to a temp file, then renamed over `path`.
pub fn try_save(path: &Path, data: &SaveData) -> Result<(), SaveError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(data)?;
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Save, reporting failure as `false` instead of an error.
pub fn save(path: &Path, data: &SaveData) -> bool {
    match try_save(path, data) {
        Ok(()) => {
            log::info!("Saved to {}", path.display());
            true
        }
        Err(e) => {
            log::warn!("Save to {} failed: {e}", path.display());
            false
        }
    }
}
