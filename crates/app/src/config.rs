use std::path::PathBuf;

pub const DEFAULT_DB_URL: &str = "sqlite://fasttrack.sqlite3";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Runtime settings read from the environment (and `.env`, if present).
///
/// Command-line flags override these after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_url: String,
    pub out_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            db_url: non_empty("FASTTRACK_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.to_string()),
            out_dir: non_empty("FASTTRACK_OUT_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from),
            log_level: non_empty("FASTTRACK_LOG")
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.db_url, DEFAULT_DB_URL);
        assert_eq!(config.out_dir, PathBuf::from("."));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("FASTTRACK_DB_URL", "sqlite::memory:"),
            ("FASTTRACK_OUT_DIR", "/tmp/exports"),
            ("FASTTRACK_LOG", "debug"),
        ]));
        assert_eq!(config.db_url, "sqlite::memory:");
        assert_eq!(config.out_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn blank_values_fall_back() {
        let config = Config::from_lookup(lookup(&[("FASTTRACK_DB_URL", "  ")]));
        assert_eq!(config.db_url, DEFAULT_DB_URL);
    }
}
