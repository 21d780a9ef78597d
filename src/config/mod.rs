use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Fixed UTC offset used for day/week/month boundaries ("+01:00", "-05:30", "UTC").
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_hours_decimals")]
    pub hours_decimals: usize,
}

fn default_timezone() -> String {
    "+00:00".to_string()
}
fn default_hours_decimals() -> usize {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            timezone: default_timezone(),
            hours_decimals: default_hours_decimals(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory (~/.rtaskclock)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rtaskclock")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rtaskclock.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rtaskclock.sqlite")
    }

    /// `~` is expanded; relative names live in the config directory.
    pub fn resolve_db_path(name: &str) -> PathBuf {
        let p = expand_tilde(name);
        if p.is_absolute() { p } else { Self::config_dir().join(p) }
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let cfg: Config = serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("failed to parse configuration: {}", e)))?;
        // Reject a bad offset at load time rather than at the first dashboard call.
        cfg.offset()?;
        Ok(cfg)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// The configured timezone as a chrono offset.
    pub fn offset(&self) -> AppResult<FixedOffset> {
        parse_offset(&self.timezone)
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => Self::resolve_db_path(&name),
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            fs::create_dir_all(&dir)?;
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }
}

/// Parse "+HH:MM", "-HH:MM", "Z" or "UTC" into a fixed offset.
pub fn parse_offset(s: &str) -> AppResult<FixedOffset> {
    let trimmed = s.trim();
    if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
        return FixedOffset::east_opt(0).ok_or_else(|| AppError::Config(s.to_string()));
    }

    let invalid = || AppError::Config(format!("invalid timezone offset '{}'", s));

    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (1, &trimmed[1..]),
        Some('-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };

    let (h, m) = rest.split_once(':').ok_or_else(invalid)?;
    let hours: i32 = h.parse().map_err(|_| invalid())?;
    let minutes: i32 = m.parse().map_err(|_| invalid())?;
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offsets() {
        assert_eq!(parse_offset("+01:00").unwrap().local_minus_utc(), 3600);
        assert_eq!(parse_offset("-05:30").unwrap().local_minus_utc(), -19800);
        assert_eq!(parse_offset("UTC").unwrap().local_minus_utc(), 0);
        assert!(parse_offset("Europe/Rome").is_err());
        assert!(parse_offset("+25:00").is_err());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg = Config::from_yaml("database: /tmp/x.sqlite\n").unwrap();
        assert_eq!(cfg.timezone, "+00:00");
        assert_eq!(cfg.hours_decimals, 2);
    }

    #[test]
    fn bad_timezone_is_a_config_error() {
        let err = Config::from_yaml("database: x\ntimezone: nowhere\n").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
