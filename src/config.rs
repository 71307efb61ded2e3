use std::path::Path;
use std::time::Duration;

use tracing::warn;

use crate::ai::DEFAULT_DEPTH;
use crate::error::ConfigError;
use crate::game::Player;
use crate::session::GameMode;

/// Deepest search the validator accepts; deeper gets impractically slow.
pub const MAX_DEPTH: usize = 12;

/// Longest pause allowed between unattended moves.
pub const MAX_MOVE_DELAY_MS: u64 = 60_000;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Plies searched below each candidate move.
    pub depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            depth: DEFAULT_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    /// One side is played from the keyboard.
    Human,
    /// The engine plays both sides unattended.
    Engine,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub mode: ModeKind,
    /// Side the human plays in `human` mode. Red moves first.
    pub human_player: Player,
    /// Pause between moves in `engine` mode.
    pub move_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            mode: ModeKind::Human,
            human_player: Player::Red,
            move_delay_ms: 1000,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.depth == 0 {
            return Err(ConfigError::Validation("engine.depth must be >= 1".into()));
        }
        if self.engine.depth > MAX_DEPTH {
            return Err(ConfigError::Validation(format!(
                "engine.depth must be <= {MAX_DEPTH}"
            )));
        }
        if self.game.move_delay_ms > MAX_MOVE_DELAY_MS {
            return Err(ConfigError::Validation(format!(
                "game.move_delay_ms must be <= {MAX_MOVE_DELAY_MS}"
            )));
        }
        Ok(())
    }

    /// The mode selected once at game start.
    pub fn mode(&self) -> GameMode {
        match self.game.mode {
            ModeKind::Human => GameMode::HumanVsEngine {
                human: self.game.human_player,
            },
            ModeKind::Engine => GameMode::EngineVsEngine,
        }
    }

    pub fn move_delay(&self) -> Duration {
        Duration::from_millis(self.game.move_delay_ms)
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.engine.depth, 5);
        assert_eq!(config.move_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[engine]
depth = 3
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.engine.depth, 3);
        // Other fields should be defaults
        assert_eq!(config.game, GameConfig::default());
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_mode_parsing() {
        let toml_str = r#"
[game]
mode = "engine"
human_player = "yellow"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.mode(), GameMode::EngineVsEngine);

        let config = AppConfig {
            game: GameConfig {
                mode: ModeKind::Human,
                human_player: Player::Yellow,
                ..GameConfig::default()
            },
            ..AppConfig::default()
        };
        assert_eq!(
            config.mode(),
            GameMode::HumanVsEngine {
                human: Player::Yellow
            }
        );
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[game]\nmode = \"network\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_zero_depth() {
        let mut config = AppConfig::default();
        config.engine.depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_excessive_depth() {
        let mut config = AppConfig::default();
        config.engine.depth = MAX_DEPTH + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_long_delay() {
        let mut config = AppConfig::default();
        config.game.move_delay_ms = MAX_MOVE_DELAY_MS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[game]
move_delay_ms = 250
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.game.move_delay_ms, 250);
        // Others are defaults
        assert_eq!(config.engine.depth, DEFAULT_DEPTH);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[engine]\ndepth = 0\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config, AppConfig::default());
    }
}
