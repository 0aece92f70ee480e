//! Configuration loading: defaults, optional TOML file, then flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use pacboy_core::GameConfig;

/// Builds the game configuration from an optional file and a seed override.
pub(crate) fn load(path: Option<&Path>, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            parse(&text).with_context(|| format!("failed to load {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }
    config.validate().context("invalid game configuration")?;
    Ok(config)
}

fn parse(text: &str) -> Result<GameConfig> {
    toml::from_str(text).context("malformed TOML")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_seed() {
        let mut config = parse("seed = 3\n[maze]\nwidth = 12\n").expect("valid toml");
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.maze.width, 12);
        assert_eq!(config.maze.height, 16);

        config.seed = Some(9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn defaults_apply_without_file() {
        let config = load(None, Some(42)).expect("defaults are valid");
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.timing.ghost_move_interval_ms, 350);
    }

    #[test]
    fn missing_file_reports_path() {
        let error = load(Some(Path::new("/nonexistent/pacboy.toml")), None)
            .expect_err("file does not exist");
        assert!(format!("{error:#}").contains("/nonexistent/pacboy.toml"));
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(parse("maze = 7").is_err());
    }
}
