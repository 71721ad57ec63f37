use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_STORAGE_KEY: &str = "house-of-swass-storage";
pub const DEFAULT_LOGIN_DELAY_MS: u64 = 800;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// SQLite file backing the key-value storage
    pub db_path: PathBuf,
    /// Key the whole snapshot document is stored under
    pub storage_key: String,
    /// Simulated network round-trip for the login stub
    pub login_delay: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            login_delay: Duration::from_millis(DEFAULT_LOGIN_DELAY_MS),
        }
    }
}

impl StoreConfig {
    /// Read `HOUSE_DB_PATH`, `HOUSE_STORAGE_KEY` and `HOUSE_LOGIN_DELAY_MS`,
    /// falling back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let db_path = std::env::var("HOUSE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let storage_key = std::env::var("HOUSE_STORAGE_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .unwrap_or(defaults.storage_key);

        let login_delay = std::env::var("HOUSE_LOGIN_DELAY_MS")
            .ok()
            .and_then(|ms| ms.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.login_delay);

        Self {
            db_path,
            storage_key,
            login_delay,
        }
    }

    /// Config for tests and ephemeral runs: no login latency.
    pub fn instant() -> Self {
        Self {
            login_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

fn default_db_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(format!(
        "{}/Library/Application Support/HouseOfSwass/house.db",
        home
    ))
}
