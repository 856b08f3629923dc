//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

const APP_DIR: &str = "panel-consensus";
const PROJECT_FILES: [&str; 2] = ["panel-consensus.toml", ".panel-consensus.toml"];
const ENV_PREFIX: &str = "PANEL_CONSENSUS_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Environment variables use `__` between section and key, e.g.
    /// `PANEL_CONSENSUS_ANALYSIS__COMPARATOR=strict`.
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/panel-consensus/config.toml if set,
    /// otherwise falls back to ~/.config/panel-consensus/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<7}] Explicit: {}", mark, path.display());
        }

        println!("  [       ] Env:      {}*", ENV_PREFIX);

        match Self::project_config_path() {
            Some(path) => println!("  [FOUND  ] Project:  {}", path.display()),
            None => println!("  [       ] Project:  ./{} or ./{}", PROJECT_FILES[0], PROJECT_FILES[1]),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "" };
            println!("  [{:<7}] Global:   {}", mark, path.display());
        }

        println!("  [       ] Default:  built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_domain::ComparatorKind;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.analysis.comparator, "containment");
        assert_eq!(config.campaign.rerun_count, 3);
        assert!(config.output.color);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains(APP_DIR));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[analysis]
comparator = "strict"

[campaign]
max_concurrency = 8
"#
        )
        .unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.analysis.parse_comparator().0, ComparatorKind::Strict);
        assert_eq!(config.campaign.max_concurrency, 8);
        // untouched keys keep their defaults
        assert_eq!(config.campaign.rerun_count, 3);
        assert_eq!(config.analysis.consensus_window, 10);
    }

    #[test]
    fn test_malformed_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[campaign]\nrerun_count = \"many\"\n").unwrap();
        assert!(ConfigLoader::load(Some(&path)).is_err());
    }
}
