//! Layered configuration loading.
//!
//! Sources, lowest priority first:
//!
//! 1. [`ParleyConfig::default`]
//! 2. configs passed to [`ConfigLoader::merge`]
//! 3. the profile variant of the config file, e.g. `parley.production.toml`
//! 4. the config file itself, `parley.toml` or `config.toml`
//!    (`parley.yaml` and friends with the `yaml-config` feature)
//! 5. `PARLEY_*` environment variables, `__` separating nested keys:
//!    `PARLEY_RUNTIME__PROMPT="> "` sets `runtime.prompt`
//!
//! The profile is the one set with [`ConfigLoader::profile`], else
//! `PARLEY_PROFILE`, else `development`.
//!
//! ```rust,ignore
//! use parley_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .file("./config/parley.toml")
//!     .without_env()
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "toml-config", feature = "yaml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use tracing::{debug, info};

use super::error::{ConfigError, ConfigResult};
use super::schema::ParleyConfig;
use super::validation::validate_config;

const ENV_PREFIX: &str = "PARLEY_";
const PROFILE_VAR: &str = "PARLEY_PROFILE";
const DEFAULT_PROFILE: &str = "development";

/// Config file formats compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    #[cfg(feature = "toml-config")]
    Toml,
    #[cfg(feature = "yaml-config")]
    Yaml,
}

impl FileFormat {
    /// Searched in this order.
    const ENABLED: &'static [Self] = &[
        #[cfg(feature = "toml-config")]
        Self::Toml,
        #[cfg(feature = "yaml-config")]
        Self::Yaml,
    ];

    fn file_names(self) -> &'static [&'static str] {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => &["parley.toml", "config.toml"],
            #[cfg(feature = "yaml-config")]
            Self::Yaml => &["parley.yaml", "parley.yml", "config.yaml", "config.yml"],
        }
    }

    fn extensions(self) -> &'static [&'static str] {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => &["toml"],
            #[cfg(feature = "yaml-config")]
            Self::Yaml => &["yaml", "yml"],
        }
    }

    fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ENABLED
            .iter()
            .copied()
            .find(|format| format.extensions().contains(&ext))
    }

    #[cfg_attr(
        not(any(feature = "toml-config", feature = "yaml-config")),
        allow(unused_variables)
    )]
    fn merge_into(self, figment: Figment, path: &Path) -> Figment {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => figment.merge(Toml::file_exact(path)),
            #[cfg(feature = "yaml-config")]
            Self::Yaml => figment.merge(Yaml::file_exact(path)),
        }
    }
}

/// `parley.toml` with profile `production` becomes `parley.production.toml`.
fn profile_variant(base: &Path, profile: &str) -> Option<PathBuf> {
    let stem = base.file_stem()?.to_str()?;
    let ext = base.extension()?.to_str()?;
    Some(base.with_file_name(format!("{stem}.{profile}.{ext}")))
}

/// Builds a [`ParleyConfig`] from defaults, files and the environment.
pub struct ConfigLoader {
    overrides: Figment,
    profile: Option<String>,
    search_paths: Vec<PathBuf>,
    file: Option<PathBuf>,
    load_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader searching the current directory and
    /// `<user config dir>/parley`, with environment variables enabled.
    pub fn new() -> Self {
        Self {
            overrides: Figment::new(),
            profile: None,
            search_paths: Vec::new(),
            file: None,
            load_env: true,
        }
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Adds a directory to search. Once any is added the default directories
    /// are no longer searched.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn with_current_dir(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.search_path(cwd),
            Err(_) => self,
        }
    }

    /// Loads exactly this file instead of searching. It must exist.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Ignores `PARLEY_*` variables, `PARLEY_PROFILE` included.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Layers `config` above the defaults and below every file.
    pub fn merge(mut self, config: ParleyConfig) -> Self {
        self.overrides = self.overrides.merge(Serialized::defaults(config));
        self
    }

    /// Loads, validates and returns the configuration.
    pub fn load(self) -> ConfigResult<ParleyConfig> {
        let profile = self.resolve_profile();
        let files = match &self.file {
            Some(path) => vec![Self::explicit_file(path)?],
            None => self.discover(&profile),
        };

        let mut figment = Figment::from(Serialized::defaults(ParleyConfig::default()))
            .merge(self.overrides);
        for (format, path) in &files {
            info!(path = %path.display(), "Loading configuration file");
            figment = format.merge_into(figment, path);
        }
        if self.load_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["PROFILE"]).split("__"));
        }

        let config: ParleyConfig = figment.extract().map_err(Box::new)?;
        validate_config(&config)?;

        debug!(
            profile = %profile,
            files = files.len(),
            logging_level = %config.logging.level,
            "Configuration loaded"
        );
        Ok(config)
    }

    fn resolve_profile(&self) -> String {
        self.profile
            .clone()
            .or_else(|| {
                self.load_env
                    .then(|| std::env::var(PROFILE_VAR).ok())
                    .flatten()
            })
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
    }

    fn explicit_file(path: &Path) -> ConfigResult<(FileFormat, PathBuf)> {
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let format = FileFormat::of(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        Ok((format, path.to_path_buf()))
    }

    fn search_dirs(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        std::env::current_dir()
            .ok()
            .into_iter()
            .chain(dirs::config_dir().map(|dir| dir.join("parley")))
            .collect()
    }

    /// The first directory holding a config file wins. Its profile variant,
    /// when present, is merged beneath it.
    fn discover(&self, profile: &str) -> Vec<(FileFormat, PathBuf)> {
        for dir in self.search_dirs() {
            for &format in FileFormat::ENABLED {
                for name in format.file_names() {
                    let base = dir.join(name);
                    if !base.is_file() {
                        continue;
                    }

                    let mut files = Vec::with_capacity(2);
                    if let Some(variant) = profile_variant(&base, profile)
                        && variant.is_file()
                    {
                        files.push((format, variant));
                    }
                    files.push((format, base));
                    return files;
                }
            }
        }

        debug!("No configuration file found, using defaults");
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;

    fn isolated() -> ConfigLoader {
        ConfigLoader::new()
            .search_path(std::env::temp_dir().join("parley-no-such-dir"))
            .without_env()
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = isolated().load().unwrap();

        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(
            config.runtime.no_match_message.as_deref(),
            Some("no matching query found")
        );
        assert!(config.runtime.skip_blank_lines);
    }

    #[test]
    fn test_merge_overrides_defaults() {
        let mut custom = ParleyConfig::default();
        custom.logging.level = LogLevel::Debug;
        custom.runtime.prompt = Some("> ".to_string());

        let config = isolated().merge(custom).load().unwrap();

        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.runtime.prompt.as_deref(), Some("> "));
    }

    #[test]
    fn test_missing_explicit_file() {
        let path = std::env::temp_dir().join("parley-missing-config.toml");
        let result = isolated().file(&path).load();
        assert!(matches!(result, Err(ConfigError::NotFound { path: p }) if p == path));
    }

    #[test]
    fn test_profile_variant_name() {
        assert_eq!(
            profile_variant(Path::new("/etc/parley/parley.toml"), "production"),
            Some(PathBuf::from("/etc/parley/parley.production.toml"))
        );
        assert_eq!(profile_variant(Path::new("parley"), "dev"), None);
    }

    #[cfg(feature = "toml-config")]
    mod files {
        use figment::Jail;

        use super::*;

        fn load(loader: ConfigLoader) -> figment::error::Result<ParleyConfig> {
            loader.load().map_err(|e| e.to_string().into())
        }

        #[test]
        fn test_toml_file_in_search_path() {
            Jail::expect_with(|jail| {
                jail.create_file(
                    "parley.toml",
                    r#"
                    [runtime]
                    prompt = "parley> "
                    stop_on_handler_error = true
                    "#,
                )?;

                let config = load(ConfigLoader::new().search_path(jail.directory()).without_env())?;
                assert_eq!(config.runtime.prompt.as_deref(), Some("parley> "));
                assert!(config.runtime.stop_on_handler_error);
                assert!(config.runtime.skip_blank_lines);
                Ok(())
            });
        }

        #[test]
        fn test_profile_file_merged_beneath_base() {
            Jail::expect_with(|jail| {
                jail.create_file(
                    "parley.toml",
                    r#"
                    [runtime]
                    prompt = "base> "
                    "#,
                )?;
                jail.create_file(
                    "parley.staging.toml",
                    r#"
                    [runtime]
                    prompt = "staging> "
                    no_match_message = "nothing here"
                    "#,
                )?;
                jail.set_env(PROFILE_VAR, "staging");

                let config = load(ConfigLoader::new().search_path(jail.directory()))?;
                assert_eq!(config.runtime.prompt.as_deref(), Some("base> "));
                assert_eq!(
                    config.runtime.no_match_message.as_deref(),
                    Some("nothing here")
                );

                // Another profile leaves the staging file alone.
                let config = load(
                    ConfigLoader::new()
                        .search_path(jail.directory())
                        .profile("production"),
                )?;
                assert_eq!(
                    config.runtime.no_match_message.as_deref(),
                    Some("no matching query found")
                );
                Ok(())
            });
        }

        #[test]
        fn test_env_overrides_file() {
            Jail::expect_with(|jail| {
                jail.create_file(
                    "parley.toml",
                    r#"
                    [logging]
                    level = "warn"

                    [runtime]
                    prompt = "file> "
                    "#,
                )?;
                jail.set_env("PARLEY_RUNTIME__PROMPT", "env>");
                jail.set_env("PARLEY_LOGGING__LEVEL", "debug");

                let config = load(ConfigLoader::new().search_path(jail.directory()))?;
                assert_eq!(config.runtime.prompt.as_deref(), Some("env>"));
                assert_eq!(config.logging.level, LogLevel::Debug);

                let config = load(
                    ConfigLoader::new()
                        .search_path(jail.directory())
                        .without_env(),
                )?;
                assert_eq!(config.runtime.prompt.as_deref(), Some("file> "));
                assert_eq!(config.logging.level, LogLevel::Warn);
                Ok(())
            });
        }

        #[test]
        fn test_explicit_file_and_unsupported_format() {
            Jail::expect_with(|jail| {
                jail.create_file("custom.toml", "[runtime]\nprompt = \"custom> \"\n")?;
                jail.create_file("parley.ini", "prompt = x\n")?;

                let config = load(
                    ConfigLoader::new()
                        .file(jail.directory().join("custom.toml"))
                        .without_env(),
                )?;
                assert_eq!(config.runtime.prompt.as_deref(), Some("custom> "));

                let result = ConfigLoader::new()
                    .file(jail.directory().join("parley.ini"))
                    .without_env()
                    .load();
                assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
                Ok(())
            });
        }

        #[test]
        fn test_invalid_file_values() {
            Jail::expect_with(|jail| {
                jail.create_file("parley.toml", "[logging]\nlevel = \"loud\"\n")?;
                let result = ConfigLoader::new()
                    .search_path(jail.directory())
                    .without_env()
                    .load();
                assert!(matches!(result, Err(ConfigError::Extract(_))));

                jail.create_file("parley.toml", "[logging]\noutput = \"file\"\n")?;
                let result = ConfigLoader::new()
                    .search_path(jail.directory())
                    .without_env()
                    .load();
                assert!(matches!(
                    result,
                    Err(ConfigError::Invalid {
                        field: "logging.file_path",
                        ..
                    })
                ));
                Ok(())
            });
        }
    }
}
