use crate::config::is_slot_name;
use crate::error::{Error, Result};
use crate::high_score::ScoreStore;
use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Keeps each slot as a one-line text file named after the slot.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Uses the platform config directory, e.g. `~/.config/neon-snake`.
    pub fn new() -> Result<Self> {
        Ok(Self::at(config_dir()?))
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        if !is_slot_name(key) {
            return Err(Error::Storage(format!("invalid slot name {:?}", key)));
        }
        Ok(self.dir.join(key))
    }
}

/// Directory holding the high-score file and the optional `config.json`.
pub fn config_dir() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "neon-snake").ok_or_else(|| {
        Error::Storage("could not determine config directory".to_string())
    })?;
    Ok(project_dirs.config_dir().to_path_buf())
}

impl ScoreStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.slot_path(key)?) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, format!("{}\n", value))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::high_score::HighScore;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "neon-snake-test-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn slot_names_cannot_leave_the_directory() {
        let dir = scratch_dir("escape");
        let mut store = FileStore::at(dir.join("inner"));
        assert!(matches!(store.save("../x", "1"), Err(Error::Storage(_))));
        assert!(matches!(store.load("a/b"), Err(Error::Storage(_))));
        assert!(!dir.join("x").exists());
    }

    #[test]
    fn missing_file_is_none() {
        let store = FileStore::at(scratch_dir("missing"));
        assert_eq!(store.load("high_score").unwrap(), None);
    }

    #[test]
    fn save_creates_directory_and_round_trips() {
        let dir = scratch_dir("save");
        let mut store = FileStore::at(dir.join("nested"));
        store.save("high_score", "90").unwrap();
        assert_eq!(store.load("high_score").unwrap().as_deref(), Some("90\n"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn high_score_survives_reload() {
        let dir = scratch_dir("reload");
        {
            let mut high = HighScore::load(Box::new(FileStore::at(&dir)), "best");
            assert!(high.record(70));
        }
        let high = HighScore::load(Box::new(FileStore::at(&dir)), "best");
        assert_eq!(high.best(), 70);
        let _ = fs::remove_dir_all(&dir);
    }
}
