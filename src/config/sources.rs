//! Configuration sources, lowest precedence first: global file, project files, environment.

pub mod global_file;
pub mod workspace_file;

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

/// Add `CARDGEN__*` environment overrides, e.g. `CARDGEN__PACING__SUCCESS_DELAY_SECS=5`.
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("CARDGEN")
            .separator("__")
            .try_parsing(true),
    )
}
