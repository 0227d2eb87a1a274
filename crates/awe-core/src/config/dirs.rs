use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "awelauncher";

/// Application directories following the XDG base directory layout
#[derive(Debug, Clone)]
pub struct Directories {
    /// Config directory (~/.config/awelauncher)
    pub config: PathBuf,

    /// Cache directory (~/.cache/awelauncher)
    pub cache: PathBuf,

    /// Config file path
    pub config_file: PathBuf,

    /// Usage history (MRU) file
    pub mru_file: PathBuf,
}

impl Directories {
    /// Create a new `Directories` instance with standard XDG paths.
    ///
    /// Falls back to a directory under the system temp dir when no home
    /// directory can be determined.
    #[must_use]
    pub fn new() -> Self {
        let Some(project) = ProjectDirs::from("", "", APP_NAME) else {
            return Self::with_base(std::env::temp_dir().join(APP_NAME));
        };

        let config = project.config_dir().to_path_buf();
        let cache = project.cache_dir().to_path_buf();

        Self {
            config_file: config.join("config.json"),
            mru_file: cache.join("mru.json"),
            config,
            cache,
        }
    }

    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_file: base.join("config.json"),
            mru_file: base.join("mru.json"),
            config: base.clone(),
            cache: base,
        }
    }

    /// Ensure all directories exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    pub fn ensure_exists(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)?;
        std::fs::create_dir_all(&self.cache)?;
        Ok(())
    }
}

impl Default for Directories {
    fn default() -> Self {
        Self::new()
    }
}
