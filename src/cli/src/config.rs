use std::{
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    time::Duration,
};

use color_eyre::eyre::WrapErr;
use cubix_core::CubeOrder;
use log::{debug, info};
use player::Speed;
use serde::{Deserialize, Serialize};

/// Settings read from `config.toml`. Every field may be left out.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Layers per edge
    pub order: Option<usize>,
    pub speed: Option<Speed>,
    /// Milliseconds between automatic steps. Takes precedence over `speed`.
    pub interval_ms: Option<u64>,
    pub checkpoint_interval: Option<NonZeroUsize>,
    /// Whether to print the net with ANSI colors
    pub color: Option<bool>,
}

impl Config {
    /// Where the config file lives when `--config` is not given
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cubix").join("config.toml"))
    }

    /// Read the config at `path`, or at the default location if there is
    /// none. A missing default file gives the default config.
    pub fn load(path: Option<&Path>) -> color_eyre::Result<Config> {
        if let Some(path) = path {
            return Config::read(path);
        }

        match Config::default_path() {
            Some(path) if path.is_file() => Config::read(&path),
            Some(path) => {
                debug!(target: "config", "No config at {}", path.display());
                Ok(Config::default())
            }
            None => Ok(Config::default()),
        }
    }

    fn read(path: &Path) -> color_eyre::Result<Config> {
        info!(target: "config", "Reading {}", path.display());

        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read the config file {}", path.display()))?;

        toml::from_str(&text)
            .wrap_err_with(|| format!("Failed to parse the config file {}", path.display()))
    }

    /// The cube order to use, preferring `flag` over the file
    pub fn order(&self, flag: Option<CubeOrder>) -> color_eyre::Result<CubeOrder> {
        if let Some(order) = flag {
            return Ok(order);
        }

        match self.order {
            Some(layers) => CubeOrder::new(layers).wrap_err("Invalid `order` in the config file"),
            None => Ok(CubeOrder::new(3)?),
        }
    }

    /// The time between automatic steps. An explicit interval beats a named
    /// speed and flags beat the file.
    pub fn interval(&self, speed: Option<Speed>, interval_ms: Option<u64>) -> Duration {
        match (interval_ms, speed) {
            (Some(ms), _) => Duration::from_millis(ms),
            (None, Some(speed)) => speed.interval(),
            (None, None) => match self.interval_ms {
                Some(ms) => Duration::from_millis(ms),
                None => self.speed.unwrap_or_default().interval(),
            },
        }
    }

    pub fn color(&self, no_color: bool) -> bool {
        !no_color && self.color.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_the_default() {
        let config = toml::from_str::<Config>("").unwrap();
        assert_eq!(config, Config::default());

        assert_eq!(config.order(None).unwrap().get(), 3);
        assert_eq!(config.interval(None, None), Duration::from_millis(600));
        assert!(config.color(false));
        assert!(!config.color(true));
    }

    #[test]
    fn every_field() {
        let config = toml::from_str::<Config>(
            r#"
            order = 5
            speed = "swift"
            checkpoint_interval = 16
            color = false
            "#,
        )
        .unwrap();

        assert_eq!(config.order(None).unwrap().get(), 5);
        assert_eq!(config.speed, Some(Speed::Swift));
        assert_eq!(config.interval(None, None), Duration::from_millis(300));
        assert_eq!(config.checkpoint_interval, NonZeroUsize::new(16));
        assert!(!config.color(false));
    }

    #[test]
    fn flags_win() {
        let config = Config {
            order: Some(4),
            speed: Some(Speed::Lazy),
            interval_ms: Some(250),
            ..Config::default()
        };

        assert_eq!(config.interval(None, None), Duration::from_millis(250));
        assert_eq!(
            config.interval(Some(Speed::Expert), None),
            Duration::from_millis(150)
        );
        assert_eq!(
            config.interval(Some(Speed::Expert), Some(40)),
            Duration::from_millis(40)
        );
        assert_eq!(
            config.order(Some(CubeOrder::new(7).unwrap())).unwrap().get(),
            7
        );
        assert_eq!(config.order(None).unwrap().get(), 4);
    }

    #[test]
    fn bad_files() {
        assert!(toml::from_str::<Config>("speed = \"ludicrous\"").is_err());
        assert!(toml::from_str::<Config>("checkpoint_interval = 0").is_err());
        assert!(toml::from_str::<Config>("colour = true").is_err());

        let config = toml::from_str::<Config>("order = 1").unwrap();
        assert!(config.order(None).is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = Path::new("/definitely/not/a/cubix/config.toml");
        assert!(Config::load(Some(path)).is_err());
    }
}
