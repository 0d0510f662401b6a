//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override earlier ones key by key, so a project file that only sets
/// `pacing.success_delay_secs` keeps every other default.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("manifest_path", "src/data/flashcards.json")?
        .set_default("output_root", "public")?
        .set_default("provider.model", "gemini-2.5-flash-image")?
        .set_default(
            "provider.endpoint",
            "https://generativelanguage.googleapis.com/v1beta",
        )?
        .set_default("provider.api_key_env", "GEMINI_API_KEY")?
        .set_default("pacing.success_delay_secs", 35_i64)?
        .set_default("pacing.failure_delay_secs", 10_i64)
}
