use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable with an explicit path to config.toml
pub const CONFIG_ENV_VAR: &str = "DASHBOARD_CONFIG";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    /// Directory relative data paths are resolved against
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Merged order/customer/seller table
    pub orders_path: String,
    pub geolocation_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    #[serde(default = "default_top_seller_cities")]
    pub top_seller_cities: usize,
    /// Size of the best/worst selling category lists
    #[serde(default = "default_top_categories")]
    pub top_categories: usize,
}

fn default_top_seller_cities() -> usize {
    10
}

fn default_top_categories() -> usize {
    5
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            top_seller_cities: default_top_seller_cities(),
            top_categories: default_top_categories(),
        }
    }
}

static DASHBOARD_SETTINGS: OnceCell<DashboardSettings> = OnceCell::new();

/// Make dashboard settings available to request handlers
pub fn install_dashboard_settings(settings: DashboardSettings) {
    if DASHBOARD_SETTINGS.set(settings).is_err() {
        tracing::warn!("Dashboard settings already installed, keeping the first ones");
    }
}

/// Installed settings, defaults when nothing was installed
pub fn dashboard_settings() -> DashboardSettings {
    DASHBOARD_SETTINGS.get().cloned().unwrap_or_default()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[data]
orders_path = "data/merge_data.csv"
geolocation_path = "data/geolocation_dataset.csv"

[dashboard]
top_seller_cities = 10
top_categories = 5
"#;

/// Load configuration
///
/// Search order:
/// 1. Path from `DASHBOARD_CONFIG`
/// 2. config.toml next to the executable
/// 3. Embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
        let config_path = PathBuf::from(explicit);
        tracing::info!("Loading config from {}: {}", CONFIG_ENV_VAR, config_path.display());
        return load_config_file(&config_path);
    }

    let exe_dir = executable_dir();
    if let Some(exe_dir) = &exe_dir {
        let config_path = exe_dir.join("config.toml");
        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            return load_config_file(&config_path);
        }
        tracing::warn!("config.toml not found at: {}", config_path.display());
    }

    tracing::info!("Using default embedded configuration");
    let mut config = parse_config(DEFAULT_CONFIG)?;
    config.base_dir = exe_dir;
    Ok(config)
}

fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path.display(), e))?;
    let mut config = parse_config(&contents)?;
    config.base_dir = path.parent().map(Path::to_path_buf);
    Ok(config)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    Ok(config)
}

fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

impl Config {
    /// Resolve a configured data path.
    /// Absolute paths are used as is, relative ones are joined to `base_dir`.
    pub fn resolve_path(&self, configured: &str) -> PathBuf {
        let path = Path::new(configured);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match &self.base_dir {
            Some(dir) => dir.join(path),
            None => PathBuf::from(configured),
        }
    }

    pub fn orders_path(&self) -> PathBuf {
        self.resolve_path(&self.data.orders_path)
    }

    pub fn geolocation_path(&self) -> PathBuf {
        self.resolve_path(&self.data.geolocation_path)
    }
}
