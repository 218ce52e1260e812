use std::path::PathBuf;

use config::FileFormat;

use crate::{config::AppConfig, fs::FileSystem};

use super::{ConfigLoadError, ConfigLoader};

pub struct YamlLoader<'a, F: FileSystem> {
    fs: &'a F,
}

impl<'a, F: FileSystem> YamlLoader<'a, F> {
    pub fn new(fs: &'a F) -> Self {
        Self { fs }
    }
}

impl<F: FileSystem> ConfigLoader for YamlLoader<'_, F> {
    fn load_config(&self) -> Result<AppConfig, ConfigLoadError> {
        let config_paths = match self.find_config_file_paths() {
            Ok(paths) => paths,
            Err(searched) => {
                return Err(ConfigLoadError::NotFound { searched });
            }
        };

        if config_paths.len() > 1 {
            return Err(ConfigLoadError::MultipleFound(
                config_paths
                    .into_iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>(),
            ));
        }

        let config_path = &config_paths[0];
        tracing::debug!(path = %config_path.display(), "loading configuration");

        let file_contents = self.fs.read_file(config_path)?;

        let config = config::Config::builder()
            .add_source(config::File::from_str(&file_contents, FileFormat::Yaml))
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        // ~ in state_file
        app_config.state_file = self.fs.expand_path(app_config.state_file())?;

        Ok(app_config)
    }

    fn find_config_file_paths(&self) -> Result<Vec<PathBuf>, PathBuf> {
        let config_dir = match self.fs.config_dir() {
            Ok(dir) => dir,
            Err(e) => {
                tracing::warn!("cannot determine configuration directory: {e}");
                return Err(PathBuf::new());
            }
        };

        let paths: Vec<PathBuf> = ["config.yaml", "config.yml"]
            .into_iter()
            .map(|name| config_dir.join(name))
            .filter(|path| self.fs.path_exists(path))
            .collect();

        if paths.is_empty() {
            return Err(config_dir);
        }

        Ok(paths)
    }
}
