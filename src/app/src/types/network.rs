use serde::{Deserialize, Serialize};

/// Number of signal strength icons (low, medium, high, full)
const STRENGTH_BUCKETS: u8 = 4;

/// Width of one strength bucket in percent
const STRENGTH_BUCKET_WIDTH: u8 = 26;

/// Security classification reported by the network manager
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SecurityType {
    #[default]
    Open,
    Wpa,
    Unsupported,
}

/// Connection status of a scanned network
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConnectedType {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// WiFi network snapshot from the last scan
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    pub ssid: String,
    pub security_type: SecurityType,
    pub connected: ConnectedType,
    /// Signal strength in percent (0-100)
    pub strength: u8,
    /// Whether the network manager holds a stored credential for this ssid
    pub known: bool,
}

impl Network {
    /// Whether a tap on this network may start a connection attempt
    pub fn is_selectable(&self) -> bool {
        self.connected == ConnectedType::Disconnected
            && self.security_type != SecurityType::Unsupported
    }

    /// Index into the strength icons, 0 (low) to 3 (full)
    pub fn strength_bucket(&self) -> u8 {
        (self.strength / STRENGTH_BUCKET_WIDTH).min(STRENGTH_BUCKETS - 1)
    }
}

/// Icon shown at the right edge of a network row
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatusIcon {
    #[default]
    None,
    Lock,
    Checkmark,
}

/// Presentation of a single network in the WiFi list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkRow {
    pub ssid: String,
    pub enabled: bool,
    pub bold: bool,
    pub connecting_badge: bool,
    pub show_forget: bool,
    pub status_icon: StatusIcon,
    pub strength_bucket: u8,
}

impl NetworkRow {
    /// Derive the row for `network`; forget is hidden while tethering is on
    pub fn new(network: &Network, tethering_enabled: bool) -> Self {
        let status_icon = if network.connected == ConnectedType::Connected {
            StatusIcon::Checkmark
        } else if network.security_type == SecurityType::Wpa {
            StatusIcon::Lock
        } else {
            StatusIcon::None
        };

        Self {
            ssid: network.ssid.clone(),
            enabled: network.is_selectable(),
            bold: network.connected != ConnectedType::Disconnected,
            connecting_badge: network.connected == ConnectedType::Connecting,
            show_forget: network.known && !tethering_enabled,
            status_icon,
            strength_bucket: network.strength_bucket(),
        }
    }
}

/// Network manager state shown on the advanced networking panel
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WifiStatus {
    /// Current IPv4 address of the WiFi interface, empty if none
    pub ipv4_address: String,
    pub tethering_enabled: bool,
    pub tethering_password: String,
}

/// SSH access state shown on the advanced networking panel
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SshStatus {
    pub enabled: bool,
    /// GitHub user whose public keys are authorized
    pub keys_username: Option<String>,
}

/// Screen currently shown by the networking view
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Page {
    #[default]
    WifiList,
    Advanced,
}
