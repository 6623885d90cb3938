/// Config file loading and creation for the roundrank CLI.
///
/// Config lives at ~/.config/roundrank/config.toml.
/// All fields are optional. CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

pub const DEFAULT_ENDPOINT: &str = "https://api.x.ai";
pub const DEFAULT_MODEL: &str = "grok-3-fast-beta";
pub const DEFAULT_PROMPT_COST_PER_MILLION: f64 = 5.0;
pub const DEFAULT_COMPLETION_COST_PER_MILLION: f64 = 25.0;

#[derive(Deserialize, Default, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RoundrankConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub api_key_file: Option<String>,
    pub instructions: Option<String>,
    pub max_retries: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub prompt_cost_per_million: Option<f64>,
    pub completion_cost_per_million: Option<f64>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# roundrank configuration
# All values here can be overridden by CLI flags.

# OpenAI-compatible API endpoint (\"/v1/chat/completions\" is appended)
# endpoint = \"https://api.x.ai\"

# Model ID
# model = \"grok-3-fast-beta\"

# API key: use XAI_API_KEY / OPENAI_API_KEY env vars, --api-key, or a key file.
# The key itself is never stored here.
# api_key_file = \"/path/to/appkey.txt\"

# Path to an instruction template file.
# The template must contain these tokens: OBJECTIVE, SYMBOL1, SYMBOL2
# If not set, the built-in default template is used.
# instructions = \"/path/to/instructions.txt\"

# Give up on a pair after this many transport retries (scored as a draw).
# If not set, transient failures are retried until they succeed.
# max_retries = 10

# Seconds before a single oracle request is abandoned and retried
# timeout_secs = 100

# Prices per million tokens, used for the running cost estimate
# prompt_cost_per_million = 5.0
# completion_cost_per_million = 25.0
";

/// Returns the default config path: ~/.config/roundrank/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("roundrank").join("config.toml")
}

pub fn parse_config(content: &str) -> Result<RoundrankConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> RoundrankConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => RoundrankConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config(path: &Path) {
    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));
}
