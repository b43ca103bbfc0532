// Generator configuration
//
// Read from an optional TOML file. Every key has a default so an empty file
// (or no file at all) is valid; command-line flags override what is loaded.

use crate::codegen::error::CompilerError;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory the block listing is written to
    pub output_dir: PathBuf,
    /// Base name of the listing and schematic files
    pub name: String,
    /// Directory handed to the backend for the schematic
    pub schematic_dir: PathBuf,
    /// External program turning a listing into a schematic
    pub backend: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            output_dir: PathBuf::from("generated"),
            name: "computer".to_string(),
            schematic_dir: PathBuf::from("schematics"),
            backend: None,
        }
    }
}

impl GeneratorConfig {
    pub fn parse(text: &str) -> Result<Self, CompilerError> {
        toml::from_str(text).map_err(|e| CompilerError::ConfigError(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, CompilerError> {
        let text = fs::read_to_string(path)
            .map_err(|e| CompilerError::ConfigError(format!("{}: {}", path.display(), e)))?;
        let config = Self::parse(&text)?;
        debug!("loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn listing_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.blk", self.name))
    }

    pub fn schematic_path(&self) -> PathBuf {
        self.schematic_dir.join(format!("{}.schem", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = GeneratorConfig::parse("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.listing_path(), PathBuf::from("generated/computer.blk"));
        assert_eq!(config.schematic_path(), PathBuf::from("schematics/computer.schem"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = GeneratorConfig::parse("name = \"cpu\"\nbackend = \"/usr/bin/mkschem\"\n").unwrap();
        assert_eq!(config.name, "cpu");
        assert_eq!(config.backend, Some(PathBuf::from("/usr/bin/mkschem")));
        assert_eq!(config.output_dir, PathBuf::from("generated"));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        assert!(matches!(
            GeneratorConfig::parse("name = [1, 2"),
            Err(CompilerError::ConfigError(_))
        ));
        assert!(matches!(
            GeneratorConfig::load(Path::new("/nonexistent/chainforge.toml")),
            Err(CompilerError::ConfigError(_))
        ));
    }
}
