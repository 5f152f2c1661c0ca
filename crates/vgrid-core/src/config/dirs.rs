use directories::ProjectDirs;
use std::path::PathBuf;

/// Application directories following XDG spec
#[derive(Debug, Clone)]
pub struct Directories {
    /// Config directory (~/.config/vgrid)
    pub config: PathBuf,

    /// Data directory (~/.local/share/vgrid)
    pub data: PathBuf,

    /// Settings file path
    pub config_file: PathBuf,

    /// Installed app catalog
    pub catalog_file: PathBuf,

    /// Ordered favorite ids
    pub favorites_file: PathBuf,

    /// Ids hidden by the visibility policy
    pub hidden_file: PathBuf,

    /// Persisted launch statistics
    pub usage_file: PathBuf,
}

impl Directories {
    /// Create a new `Directories` instance with standard XDG paths.
    ///
    /// # Panics
    ///
    /// Panics if the system's project directories cannot be determined.
    #[must_use]
    pub fn new() -> Self {
        let project =
            ProjectDirs::from("", "", "vgrid").expect("Failed to determine project directories");

        let config = project.config_dir().to_path_buf();
        let data = project.data_dir().to_path_buf();

        Self {
            config_file: config.join("config.json"),
            catalog_file: config.join("apps.json"),
            favorites_file: config.join("favorites.json"),
            hidden_file: config.join("hidden.json"),
            usage_file: data.join("usage.json"),
            config,
            data,
        }
    }

    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_file: base.join("config.json"),
            catalog_file: base.join("apps.json"),
            favorites_file: base.join("favorites.json"),
            hidden_file: base.join("hidden.json"),
            usage_file: base.join("usage.json"),
            config: base.clone(),
            data: base,
        }
    }

    /// Ensure all directories exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    pub fn ensure_exists(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)?;
        std::fs::create_dir_all(&self.data)?;
        Ok(())
    }
}

impl Default for Directories {
    fn default() -> Self {
        Self::new()
    }
}
