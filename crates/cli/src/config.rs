use overlay::config::{AppConfig, ApplyToConfig};

use crate::cli::ClapCli;

impl ApplyToConfig for ClapCli {
    fn apply_to_config(&self, mut config: AppConfig) -> AppConfig {
        if let Some(state_file) = self.state_file.as_ref() {
            *config.state_file_mut() = state_file.clone();
        }

        // Flags can only switch these on/off relative to the file, never back
        if self.debug {
            *config.debug_mut() = true;
        }
        if self.no_color {
            *config.use_colors_mut() = false;
        }

        config
    }
}
