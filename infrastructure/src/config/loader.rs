//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables: `CONDUIT_LLM__PROVIDER`,
    ///    `CONDUIT_LLM__API_KEY`, `CONDUIT_DEFAULT_SERVER`, ...
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./conduit.toml` or `./.conduit.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/conduit/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        // Add global config (XDG or fallback)
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        // Add project-level config files (check both names)
        for filename in &["conduit.toml", ".conduit.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
                break;
            }
        }

        // Add explicit config path
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Environment variables win over every file
        figment = figment.merge(Env::prefixed("CONDUIT_").split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("conduit").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.servers.is_empty());
        assert_eq!(config.llm.provider, "ollama");
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("conduit"));
    }

    #[test]
    fn test_explicit_path_overrides_defaults() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[llm]\nprovider = \"deepseek\"\n\n[servers.files]\ncommand = \"mcp-files\""
        )
        .unwrap();

        let config = ConfigLoader::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.llm.provider, "deepseek");
        assert!(config.servers.contains_key("files"));
    }
}
