use super::Config;
use anyhow::{Context, Result};
use std::path::Path;

pub fn parse_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config_str(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

pub fn parse_config_str(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse TOML config")?;

    // Validate and return validation errors directly without wrapping
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &Config) -> Result<()> {
    let baseline = &config.manifest.baseline_file;
    let temp = &config.manifest.temp_file;

    for name in [baseline, temp] {
        if name.is_empty() {
            anyhow::bail!("Manifest file names cannot be empty");
        }
        if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            anyhow::bail!("Manifest file name must be a plain file name: {name}");
        }
    }

    if baseline == temp {
        anyhow::bail!("Baseline and temporary manifest names must differ");
    }

    if config.hashing.block_size == 0 {
        anyhow::bail!("Hashing block size must be at least 1 byte");
    }

    for pattern in &config.scan.ignore_patterns {
        glob::Pattern::new(pattern)
            .with_context(|| format!("Invalid ignore pattern: {pattern}"))?;
    }

    Ok(())
}
