//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/dropfield/settings.toml (or platform equivalent)

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::error::SettingsError;
use crate::game::{GameConfig, default_spawn_column};
use crate::tetromino::MASK_SIZE;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid: GridSettings,
    pub gravity: GravitySettings,
    pub supply: SupplySettings,
    /// Keybindings
    pub keys: KeyBindings,
    /// Visual settings
    pub visual: VisualSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub rows: usize,
    pub cols: usize,
    /// Left edge of the spawn mask; centered when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawn_column: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravitySettings {
    pub interval_ms: u64,
    /// Sideways moves and rotations delay the next drop
    pub reset_on_move: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplySettings {
    /// Fixed seed for a reproducible piece sequence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Redraw once when a draw repeats the queued piece
    pub avoid_repeat: bool,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub soft_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hard_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(key) => vec![key],
        OneOrMany::Many(keys) => keys,
    })
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match keys {
        [key] => serializer.serialize_str(key),
        keys => keys.serialize(serializer),
    }
}

/// Visual settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Ghost piece visibility
    pub show_ghost: bool,
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            rows: BOARD_HEIGHT,
            cols: BOARD_WIDTH,
            spawn_column: None,
        }
    }
}

impl Default for GravitySettings {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            reset_on_move: true,
        }
    }
}

impl Default for SupplySettings {
    fn default() -> Self {
        Self {
            seed: None,
            avoid_repeat: true,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string()],
            move_right: vec!["Right".to_string()],
            rotate: vec!["Up".to_string(), "x".to_string()],
            soft_drop: vec!["Down".to_string()],
            hard_drop: vec!["Space".to_string()],
            quit: vec!["q".to_string(), "Esc".to_string()],
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            show_ghost: true,
            block_style: "solid".to_string(),
        }
    }
}

impl VisualSettings {
    /// Get the block and ghost characters based on style
    pub fn block_chars(&self) -> (&'static str, &'static str) {
        match self.block_style.as_str() {
            "bracket" => ("[]", ".."),
            "round" => ("()", ".."),
            _ => ("██", "░░"), // "solid" or default
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "dropfield", "dropfield")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            tracing::warn!("no config directory, using default settings");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("ignoring settings file: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save settings to a specific file, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate and convert into engine parameters
    pub fn game_config(&self) -> Result<GameConfig, SettingsError> {
        let GridSettings {
            rows,
            cols,
            spawn_column,
        } = self.grid;

        if rows < MASK_SIZE as usize {
            return Err(SettingsError::Invalid {
                field: "grid.rows",
                reason: format!("{rows} is smaller than a piece"),
            });
        }
        if cols < MASK_SIZE as usize {
            return Err(SettingsError::Invalid {
                field: "grid.cols",
                reason: format!("{cols} is narrower than a piece"),
            });
        }
        let spawn_column = spawn_column.unwrap_or_else(|| default_spawn_column(cols));
        let last_column = i32::try_from(cols).unwrap_or(i32::MAX) - MASK_SIZE;
        if !(0..=last_column).contains(&spawn_column) {
            return Err(SettingsError::Invalid {
                field: "grid.spawn_column",
                reason: format!("{spawn_column} puts the spawn mask outside {cols} columns"),
            });
        }
        if self.gravity.interval_ms == 0 {
            return Err(SettingsError::Invalid {
                field: "gravity.interval_ms",
                reason: "must be positive".to_string(),
            });
        }

        Ok(GameConfig {
            width: cols,
            height: rows,
            spawn_column,
            gravity_interval: Duration::from_millis(self.gravity.interval_ms),
            reset_gravity_on_move: self.gravity.reset_on_move,
            seed: self.supply.seed,
            avoid_repeat: self.supply.avoid_repeat,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_game() {
        let config = Settings::default().game_config().unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.spawn_column, 3);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [grid]
            rows = 12

            [keys]
            hard_drop = "Enter"
            rotate = ["Up", "w"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.grid.rows, 12);
        assert_eq!(settings.grid.cols, BOARD_WIDTH);
        assert_eq!(settings.keys.hard_drop, vec!["Enter"]);
        assert_eq!(settings.keys.rotate, vec!["Up", "w"]);
        assert_eq!(settings.keys.move_left, vec!["Left"]);
        assert!(settings.gravity.reset_on_move);
    }

    #[test]
    fn test_round_trip_keeps_single_keys_as_strings() {
        let settings = Settings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        assert!(text.contains("hard_drop = \"Space\""));
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.grid.spawn_column = Some(7);
        assert!(matches!(
            settings.game_config(),
            Err(SettingsError::Invalid { field: "grid.spawn_column", .. })
        ));

        let settings: Settings = toml::from_str("[grid]\nspawn_column = 2147483647").unwrap();
        assert!(matches!(
            settings.game_config(),
            Err(SettingsError::Invalid { field: "grid.spawn_column", .. })
        ));

        let mut settings = Settings::default();
        settings.grid.spawn_column = Some(i32::MIN);
        assert!(settings.game_config().is_err());

        let mut settings = Settings::default();
        settings.grid.cols = 3;
        assert!(matches!(
            settings.game_config(),
            Err(SettingsError::Invalid { field: "grid.cols", .. })
        ));

        let mut settings = Settings::default();
        settings.gravity.interval_ms = 0;
        assert!(settings.game_config().is_err());
    }

    #[test]
    fn test_custom_spawn_and_seed() {
        let settings: Settings = toml::from_str(
            r#"
            [grid]
            spawn_column = 4
            [supply]
            seed = 99
            avoid_repeat = false
            [gravity]
            interval_ms = 250
            "#,
        )
        .unwrap();
        let config = settings.game_config().unwrap();
        assert_eq!(config.spawn_column, 4);
        assert_eq!(config.seed, Some(99));
        assert!(!config.avoid_repeat);
        assert_eq!(config.gravity_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_save_creates_directory_and_reloads() {
        let dir = std::env::temp_dir().join(format!("dropfield-settings-{}", std::process::id()));
        let path = dir.join("nested").join("settings.toml");
        let _ = fs::remove_dir_all(&dir);

        let mut settings = Settings::default();
        settings.grid.spawn_column = Some(4);
        settings.keys.rotate = vec!["w".to_string()];
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        let _ = fs::remove_dir_all(&dir);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let err = Settings::load_from(Path::new("/nonexistent/dropfield/settings.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}
