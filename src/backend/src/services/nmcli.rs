//! Parsing of `nmcli` terse output.
//!
//! Terse mode (`-t`) separates fields with `:` and escapes literal `:` and
//! `\` inside values with a backslash.

use std::collections::HashMap;
use touch_settings_core::{ConnectedType, Network, SecurityType};

// ============================================================================
// Field splitting
// ============================================================================

/// Split one terse line into its unescaped fields
pub fn split_terse(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ':' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}

// ============================================================================
// Scan results
// ============================================================================

/// One line of `nmcli -t -f IN-USE,SSID,SIGNAL,SECURITY device wifi list`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanEntry {
    pub in_use: bool,
    pub ssid: String,
    pub signal: u8,
    pub security: SecurityType,
}

/// Classify the SECURITY column
///
/// Only pre-shared key WPA variants can be joined with a passphrase.
pub fn classify_security(security: &str) -> SecurityType {
    let security = security.trim();
    if security.is_empty() || security == "--" {
        return SecurityType::Open;
    }

    let upper = security.to_ascii_uppercase();
    if upper.contains("802.1X") || upper.contains("WEP") {
        SecurityType::Unsupported
    } else if upper.contains("WPA") || upper.contains("RSN") {
        SecurityType::Wpa
    } else {
        SecurityType::Unsupported
    }
}

/// Parse the scan listing, skipping malformed lines and hidden networks
pub fn parse_scan(output: &str) -> Vec<ScanEntry> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let fields = split_terse(line);
            let [in_use, ssid, signal, security] = fields.as_slice() else {
                return None;
            };
            if ssid.is_empty() || ssid == "--" {
                return None;
            }

            Some(ScanEntry {
                in_use: in_use.trim() == "*",
                ssid: ssid.clone(),
                signal: signal.trim().parse::<u8>().unwrap_or(0).min(100),
                security: classify_security(security),
            })
        })
        .collect()
}

/// A stored WiFi connection profile
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WifiProfile {
    pub name: String,
    pub uuid: String,
}

/// Stored WiFi connections from `nmcli -t -f NAME,UUID,TYPE connection show`.
///
/// Profile names are free-form; the SSID lives in the profile settings.
pub fn parse_wifi_profiles(output: &str) -> Vec<WifiProfile> {
    output
        .lines()
        .filter_map(|line| {
            let fields = split_terse(line);
            match fields.as_slice() {
                [name, uuid, kind] if kind == "802-11-wireless" && !uuid.is_empty() => {
                    Some(WifiProfile {
                        name: name.clone(),
                        uuid: uuid.clone(),
                    })
                }
                _ => None,
            }
        })
        .collect()
}

/// SSID setting of a profile from
/// `nmcli -g 802-11-wireless.ssid connection show uuid <uuid>`
pub fn parse_profile_ssid(output: &str) -> Option<String> {
    let line = output.lines().next()?;
    split_terse(line)
        .into_iter()
        .next()
        .filter(|ssid| !ssid.is_empty())
}

/// Connection currently being activated on `interface`, from
/// `nmcli -t -f DEVICE,STATE,CONNECTION device status`
pub fn parse_connecting(output: &str, interface: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let fields = split_terse(line);
        match fields.as_slice() {
            [device, state, connection]
                if device == interface
                    && state.starts_with("connecting")
                    && !connection.is_empty()
                    && connection != "--" =>
            {
                Some(connection.clone())
            }
            _ => None,
        }
    })
}

/// Merge scan, stored connections and activation state into the network list.
///
/// Duplicate SSIDs (several access points) collapse to the strongest entry.
/// The list is ordered connected first, then by descending strength.
pub fn build_networks(
    scan: Vec<ScanEntry>,
    known: &[String],
    connecting: Option<&str>,
) -> Vec<Network> {
    let mut by_ssid: HashMap<String, Network> = HashMap::new();

    for entry in scan {
        let connected = if entry.in_use {
            ConnectedType::Connected
        } else if connecting == Some(entry.ssid.as_str()) {
            ConnectedType::Connecting
        } else {
            ConnectedType::Disconnected
        };

        let network = Network {
            known: known.contains(&entry.ssid),
            ssid: entry.ssid,
            security_type: entry.security,
            connected,
            strength: entry.signal,
        };

        match by_ssid.get_mut(&network.ssid) {
            Some(existing) => {
                let connected = if rank(network.connected) > rank(existing.connected) {
                    network.connected
                } else {
                    existing.connected
                };
                if network.strength > existing.strength {
                    *existing = network;
                }
                existing.connected = connected;
            }
            None => {
                by_ssid.insert(network.ssid.clone(), network);
            }
        }
    }

    let mut networks: Vec<Network> = by_ssid.into_values().collect();
    networks.sort_by(|a, b| {
        rank(b.connected)
            .cmp(&rank(a.connected))
            .then(b.strength.cmp(&a.strength))
            .then(a.ssid.cmp(&b.ssid))
    });
    networks
}

fn rank(connected: ConnectedType) -> u8 {
    match connected {
        ConnectedType::Connected => 2,
        ConnectedType::Connecting => 1,
        ConnectedType::Disconnected => 0,
    }
}

// ============================================================================
// Addresses
// ============================================================================

/// First address of `nmcli -g IP4.ADDRESS device show <iface>` without prefix
pub fn parse_ipv4(output: &str) -> String {
    output
        .lines()
        .flat_map(|line| line.split(" | "))
        .map(str::trim)
        .find(|addr| !addr.is_empty())
        .map(|addr| addr.split('/').next().unwrap_or(addr).to_string())
        .unwrap_or_default()
}

/// Whether `connection` appears in `nmcli -t -f NAME connection show --active`
pub fn is_active(output: &str, connection: &str) -> bool {
    output
        .lines()
        .any(|line| split_terse(line).first().map(String::as_str) == Some(connection))
}
