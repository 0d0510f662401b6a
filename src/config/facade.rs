//! ConfigLoader: single entry point that layers every source in precedence order.

use super::merge::builder_with_defaults;
use super::sources::{self, global_file, workspace_file};
use super::CardgenConfig;
use crate::error::ApiError;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a project root.
    ///
    /// Precedence (lowest to highest): built-in defaults, global file, project
    /// `config/config.toml`, project `config/{CARDGEN_ENV}.toml`, `CARDGEN__*` env vars.
    pub fn load(project_root: &Path) -> Result<CardgenConfig, ApiError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, project_root)?;
        let builder = sources::add_environment(builder);

        let config: CardgenConfig = builder.build()?.try_deserialize()?;
        debug!(root = %project_root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load configuration from an explicit file. Global and project files are skipped;
    /// env overrides still apply.
    pub fn load_from_file(path: &Path) -> Result<CardgenConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = builder_with_defaults()?
            .add_source(config::File::from(path.to_path_buf()).required(true));
        let builder = sources::add_environment(builder);
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Location of the user-level config file, if a home directory is known.
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
