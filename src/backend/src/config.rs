use anyhow::{Context, Result};
use std::{env, path::PathBuf, sync::OnceLock, time::Duration};

/// Application configuration loaded and validated at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// NetworkManager access
    pub network_manager: NetworkManagerConfig,

    /// Periodic network list refresh
    pub refresh: RefreshConfig,

    /// SSH access control
    pub ssh: SshConfig,
}

#[derive(Clone, Debug)]
pub struct NetworkManagerConfig {
    pub nmcli_path: PathBuf,
    pub wifi_interface: String,
    /// nmcli connection id of the access point used for tethering
    pub tethering_connection: String,
}

#[derive(Clone, Debug)]
pub struct RefreshConfig {
    pub interval: Duration,
    /// Delay before the first refresh after start
    pub initial_delay: Duration,
}

#[derive(Clone, Debug)]
pub struct SshConfig {
    pub service: String,
    pub authorized_keys: PathBuf,
    pub keys_url: String,
}

/// Source of configuration values, the process environment outside of tests
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

impl AppConfig {
    /// Get or load the application configuration
    ///
    /// Returns a reference to the cached configuration. On first call, it loads
    /// and validates all configuration from environment variables.
    ///
    /// # Panics
    /// Panics if configuration loading fails. The shell cannot run without
    /// valid configuration.
    pub fn get() -> &'static Self {
        static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();
        APP_CONFIG.get_or_init(|| {
            Self::load(&|key| env::var(key).ok())
                .expect("failed to load application configuration")
        })
    }

    fn load(var: Lookup) -> Result<Self> {
        Ok(Self {
            network_manager: NetworkManagerConfig::load(var)?,
            refresh: RefreshConfig::load(var)?,
            ssh: SshConfig::load(var)?,
        })
    }
}

impl NetworkManagerConfig {
    fn load(var: Lookup) -> Result<Self> {
        let nmcli_path = var("NMCLI_PATH")
            .unwrap_or_else(|| "nmcli".to_string())
            .into();
        let wifi_interface = var("WIFI_INTERFACE").unwrap_or_else(|| "wlan0".to_string());
        let tethering_connection =
            var("TETHERING_CONNECTION").unwrap_or_else(|| "Hotspot".to_string());

        anyhow::ensure!(
            !wifi_interface.trim().is_empty(),
            "failed to load WIFI_INTERFACE: must not be empty"
        );

        Ok(Self {
            nmcli_path,
            wifi_interface,
            tethering_connection,
        })
    }
}

impl RefreshConfig {
    const INITIAL_DELAY: Duration = Duration::from_millis(300);

    fn load(var: Lookup) -> Result<Self> {
        let interval_ms = var("REFRESH_INTERVAL_MS")
            .unwrap_or_else(|| "5000".to_string())
            .parse::<u64>()
            .context("failed to parse REFRESH_INTERVAL_MS: invalid format")?;

        anyhow::ensure!(
            interval_ms > 0,
            "failed to load REFRESH_INTERVAL_MS: must be greater than zero"
        );

        Ok(Self {
            interval: Duration::from_millis(interval_ms),
            initial_delay: Self::INITIAL_DELAY,
        })
    }
}

impl SshConfig {
    fn load(var: Lookup) -> Result<Self> {
        let service = var("SSH_SERVICE").unwrap_or_else(|| "ssh".to_string());
        let authorized_keys = var("SSH_AUTHORIZED_KEYS")
            .unwrap_or_else(|| "/data/ssh/authorized_keys".to_string())
            .into();
        let keys_url = var("SSH_KEYS_URL")
            .unwrap_or_else(|| "https://github.com".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            service,
            authorized_keys,
            keys_url,
        })
    }
}
