use std::path::PathBuf;

use figment::providers::{Env, Format, Toml};
pub use figment::Figment;
use serde::Deserialize;

pub const FILE_NAME: &str = ".lambdarc.toml";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// REPL history file.
    pub history: Option<PathBuf>,
    /// Library file used by `import`; the bundled prelude when unset.
    pub library: Option<PathBuf>,
    /// Help file; the bundled text when unset.
    pub help: Option<PathBuf>,
    /// Steps printed per expression before giving up.
    pub max_steps: usize,
    pub prompt: String,
    /// Libraries imported at start-up.
    pub imports: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history: None,
            library: None,
            help: None,
            max_steps: 1000,
            prompt: "> ".to_string(),
            imports: vec![],
        }
    }
}

/// `~/.lambdarc.toml`, then `./.lambdarc.toml`, then `LAMBDA_*` variables.
pub fn load_base_config() -> Figment {
    let mut figment = Figment::new();
    if let Some(home_dir) = home::home_dir() {
        figment = figment.merge(Toml::file(home_dir.join(FILE_NAME)));
    }
    figment
        .merge(Toml::file(FILE_NAME))
        .merge(Env::prefixed("LAMBDA_"))
}
