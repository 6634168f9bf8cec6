use config::{Config as ConfigLoader, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::error::Error;

/// Location of the configuration file when `--config` is not given, relative to the
/// working directory.
const DEFAULT_CONFIG_PATH: &str = "crates/executor/Config.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub limit_length: i64,
    pub limit_category: Option<String>,
    pub max_cycles: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub delimiter: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    pub channel_capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub delimiter: String,
    pub with_relationships: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorConfig {
    pub total_vertices: usize,
    pub total_edges: usize,
    pub categories: Vec<String>,
    pub kinds: Vec<String>,
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub search: SearchConfig,
    pub input: InputConfig,
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
    pub simulator: SimulatorConfig,
    pub logging: LoggingConfig,
}

impl InputConfig {
    /// The field delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8, Error> {
        match self.delimiter.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(Error::ConfigLoadError(format!(
                "input.delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ))),
        }
    }
}

fn build_loader(config_file_path: &Path, required: bool) -> Result<ConfigLoader, ConfigError> {
    ConfigLoader::builder()
        .set_default("search.limit_length", -1i64)?
        .set_default("input.delimiter", ";")?
        .set_default("pipeline.channel_capacity", 1024i64)?
        .set_default("output.delimiter", ";")?
        .set_default("output.with_relationships", false)?
        .set_default("simulator.total_vertices", 200i64)?
        .set_default("simulator.total_edges", 600i64)?
        .set_default("simulator.categories", vec!["PJ", "PF"])?
        .set_default("simulator.kinds", vec!["socio", "administrador"])?
        .set_default("logging.level", "info")?
        .add_source(
            File::from(config_file_path)
                .format(FileFormat::Toml)
                .required(required),
        )
        .add_source(
            Environment::with_prefix("CYCLES")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
}

/// Loads configuration from built-in defaults, a TOML file and environment variables,
/// in increasing order of precedence.
///
/// `path` must exist when given; otherwise `crates/executor/Config.toml` is used if
/// present. Environment variables look like `CYCLES_SEARCH__LIMIT_LENGTH=8`.
pub fn load_config(path: Option<&Path>) -> Result<Config, Error> {
    let (config_file_path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };

    if required && !config_file_path.exists() {
        return Err(Error::ConfigLoadError(format!(
            "Configuration file not found at: {}",
            config_file_path.display()
        )));
    }

    let s = build_loader(&config_file_path, required)
        .map_err(|e| Error::ConfigLoadError(e.to_string()))?;

    let app_config: Config = s
        .try_deserialize()
        .map_err(|e| Error::ConfigLoadError(format!("Failed to deserialize config: {}", e)))?;

    if app_config.pipeline.channel_capacity == 0 {
        return Err(Error::ConfigLoadError(
            "pipeline.channel_capacity must be positive".to_string(),
        ));
    }

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write config");
        file
    }

    #[test]
    fn empty_file_falls_back_to_defaults() {
        let file = config_file("");
        let config = load_config(Some(file.path())).expect("config should load");

        assert_eq!(config.search.limit_length, -1);
        assert!(config.search.limit_category.is_none());
        assert!(config.search.max_cycles.is_none());
        assert_eq!(config.input.delimiter_byte().unwrap(), b';');
        assert_eq!(config.pipeline.channel_capacity, 1024);
        assert_eq!(config.simulator.categories, vec!["PJ", "PF"]);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn file_values_override_defaults() {
        let file = config_file(
            r#"
[search]
limit_length = 6
limit_category = "PJ"
max_cycles = 10

[output]
delimiter = ","
with_relationships = true
"#,
        );
        let config = load_config(Some(file.path())).expect("config should load");

        assert_eq!(config.search.limit_length, 6);
        assert_eq!(config.search.limit_category.as_deref(), Some("PJ"));
        assert_eq!(config.search.max_cycles, Some(10));
        assert_eq!(config.output.delimiter, ",");
        assert!(config.output.with_relationships);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = load_config(Some(Path::new("does/not/exist.toml")));
        assert!(matches!(result, Err(Error::ConfigLoadError(_))));
    }

    #[test]
    fn zero_channel_capacity_is_rejected() {
        let file = config_file("[pipeline]\nchannel_capacity = 0\n");
        assert!(matches!(
            load_config(Some(file.path())),
            Err(Error::ConfigLoadError(_))
        ));
    }

    #[test]
    fn multi_character_delimiter_is_rejected() {
        let input = InputConfig {
            delimiter: ";;".to_string(),
        };
        assert!(input.delimiter_byte().is_err());
    }
}
