#![cfg_attr(feature = "mock", allow(dead_code, unused_imports))]

use crate::{
    command::{self, CommandOutput},
    config::NetworkManagerConfig,
    services::nmcli,
};
use anyhow::{Context, Result, bail};
use log::{info, warn};
#[cfg(feature = "mock")]
use mockall::automock;
use std::{fmt, path::PathBuf};
use touch_settings_core::Network;
use trait_variant::make;

/// The access point rejected the credential for `ssid`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticationFailed {
    pub ssid: String,
}

impl fmt::Display for AuthenticationFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "authentication to {} failed", self.ssid)
    }
}

impl std::error::Error for AuthenticationFailed {}

#[make(Send)]
#[cfg_attr(feature = "mock", automock)]
pub trait NetworkManager {
    /// Rescan and list visible networks, annotated with stored credentials
    async fn networks(&self) -> Result<Vec<Network>>;
    async fn activate_known(&self, ssid: String) -> Result<()>;
    async fn connect(&self, ssid: String) -> Result<()>;
    async fn connect_with_password(&self, ssid: String, password: String) -> Result<()>;
    async fn forget(&self, ssid: String) -> Result<()>;
    async fn is_tethering_enabled(&self) -> Result<bool>;
    async fn set_tethering_enabled(&self, enabled: bool) -> Result<()>;
    async fn tethering_password(&self) -> Result<String>;
    async fn set_tethering_password(&self, password: String) -> Result<()>;
    async fn current_ipv4(&self) -> Result<String>;
}

/// Stored WiFi profile and the SSID it connects to
#[derive(Clone, Debug, PartialEq, Eq)]
struct KnownProfile {
    name: String,
    uuid: String,
    ssid: String,
}

/// SSIDs with at least one stored profile
fn known_ssids(profiles: &[KnownProfile]) -> Vec<String> {
    let mut ssids: Vec<String> = Vec::new();
    for profile in profiles {
        if !ssids.contains(&profile.ssid) {
            ssids.push(profile.ssid.clone());
        }
    }
    ssids
}

/// UUIDs of every profile connecting to `ssid`
fn profile_uuids<'a>(profiles: &'a [KnownProfile], ssid: &str) -> Vec<&'a str> {
    profiles
        .iter()
        .filter(|p| p.ssid == ssid)
        .map(|p| p.uuid.as_str())
        .collect()
}

/// NetworkManager driven through the `nmcli` command line tool
#[derive(Clone, Debug)]
pub struct NmcliClient {
    nmcli: PathBuf,
    interface: String,
    tethering_connection: String,
}

impl NmcliClient {
    const PSK_SETTING: &str = "802-11-wireless-security.psk";
    const SSID_SETTING: &str = "802-11-wireless.ssid";

    pub fn new(config: &NetworkManagerConfig) -> Self {
        NmcliClient {
            nmcli: config.nmcli_path.clone(),
            interface: config.wifi_interface.clone(),
            tethering_connection: config.tethering_connection.clone(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        command::run(&self.nmcli, args).await
    }

    async fn query(&self, args: &[&str]) -> Result<String> {
        command::run_checked(&self.nmcli, args).await
    }

    /// Run an activation and map rejected secrets to [`AuthenticationFailed`]
    async fn activate(&self, ssid: &str, args: &[&str]) -> Result<()> {
        let output = self.run(args).await?;
        if output.success {
            return Ok(());
        }

        if is_secrets_failure(&output.stderr) {
            warn!("credential for {ssid} was rejected");
            // a failed first connect leaves a profile with the wrong secret behind
            if let Err(e) = self.delete_connection(ssid).await {
                warn!("failed to remove rejected connection {ssid}: {e:#}");
            }
            return Err(AuthenticationFailed {
                ssid: ssid.to_string(),
            }
            .into());
        }

        bail!("failed to connect to {ssid}: {}", output.stderr)
    }

    /// Delete every stored profile of `ssid`
    async fn delete_connection(&self, ssid: &str) -> Result<()> {
        let profiles = self.known_profiles().await?;
        let uuids = profile_uuids(&profiles, ssid);
        if uuids.is_empty() {
            bail!("no stored connection for {ssid}");
        }

        for uuid in uuids {
            self.query(&["connection", "delete", "uuid", uuid]).await?;
        }
        Ok(())
    }

    /// Stored WiFi profiles except the hotspot, resolved to their SSIDs
    async fn known_profiles(&self) -> Result<Vec<KnownProfile>> {
        let output = self
            .query(&["-t", "-f", "NAME,UUID,TYPE", "connection", "show"])
            .await?;

        let mut known = Vec::new();
        for profile in nmcli::parse_wifi_profiles(&output) {
            if profile.name == self.tethering_connection {
                continue;
            }

            let output = self
                .query(&[
                    "-g",
                    Self::SSID_SETTING,
                    "connection",
                    "show",
                    "uuid",
                    &profile.uuid,
                ])
                .await?;
            let ssid = nmcli::parse_profile_ssid(&output).unwrap_or_else(|| profile.name.clone());

            known.push(KnownProfile {
                name: profile.name,
                uuid: profile.uuid,
                ssid,
            });
        }

        Ok(known)
    }

    async fn connecting_ssid(&self) -> Result<Option<String>> {
        let output = self
            .query(&["-t", "-f", "DEVICE,STATE,CONNECTION", "device", "status"])
            .await?;
        Ok(nmcli::parse_connecting(&output, &self.interface))
    }
}

/// nmcli reports a rejected passphrase as missing secrets
fn is_secrets_failure(stderr: &str) -> bool {
    let stderr = stderr.to_ascii_lowercase();
    stderr.contains("secrets were required") || stderr.contains("no secrets")
}

impl NetworkManager for NmcliClient {
    async fn networks(&self) -> Result<Vec<Network>> {
        let scan = self
            .query(&[
                "-t",
                "-f",
                "IN-USE,SSID,SIGNAL,SECURITY",
                "device",
                "wifi",
                "list",
                "ifname",
                &self.interface,
                "--rescan",
                "auto",
            ])
            .await
            .context("failed to scan networks")?;

        let profiles = self.known_profiles().await?;
        // device status names the profile, not the network
        let connecting = self.connecting_ssid().await?.map(|name| {
            profiles
                .iter()
                .find(|p| p.name == name)
                .map_or(name, |p| p.ssid.clone())
        });

        Ok(nmcli::build_networks(
            nmcli::parse_scan(&scan),
            &known_ssids(&profiles),
            connecting.as_deref(),
        ))
    }

    async fn activate_known(&self, ssid: String) -> Result<()> {
        info!("activating stored connection {ssid}");
        let profiles = self.known_profiles().await?;
        let (selector, id) = match profile_uuids(&profiles, &ssid).first() {
            Some(uuid) => ("uuid", uuid.to_string()),
            None => ("id", ssid.clone()),
        };
        self.activate(
            &ssid,
            &["connection", "up", selector, &id, "ifname", &self.interface],
        )
        .await
    }

    async fn connect(&self, ssid: String) -> Result<()> {
        info!("connecting to open network {ssid}");
        self.activate(
            &ssid,
            &["device", "wifi", "connect", &ssid, "ifname", &self.interface],
        )
        .await
    }

    async fn connect_with_password(&self, ssid: String, password: String) -> Result<()> {
        info!("connecting to {ssid} with password");
        self.activate(
            &ssid,
            &[
                "device",
                "wifi",
                "connect",
                &ssid,
                "password",
                &password,
                "ifname",
                &self.interface,
            ],
        )
        .await
    }

    async fn forget(&self, ssid: String) -> Result<()> {
        info!("forgetting {ssid}");
        self.delete_connection(&ssid)
            .await
            .with_context(|| format!("failed to forget {ssid}"))
    }

    async fn is_tethering_enabled(&self) -> Result<bool> {
        let output = self
            .query(&["-t", "-f", "NAME", "connection", "show", "--active"])
            .await?;
        Ok(nmcli::is_active(&output, &self.tethering_connection))
    }

    async fn set_tethering_enabled(&self, enabled: bool) -> Result<()> {
        info!("setting tethering enabled: {enabled}");
        let action = if enabled { "up" } else { "down" };
        self.query(&["connection", action, "id", &self.tethering_connection])
            .await
            .context("failed to switch tethering")?;
        Ok(())
    }

    async fn tethering_password(&self) -> Result<String> {
        let output = self
            .query(&[
                "--show-secrets",
                "-g",
                Self::PSK_SETTING,
                "connection",
                "show",
                "id",
                &self.tethering_connection,
            ])
            .await
            .context("failed to read tethering password")?;
        Ok(output.trim_end_matches('\n').to_string())
    }

    async fn set_tethering_password(&self, password: String) -> Result<()> {
        info!("changing tethering password");
        self.query(&[
            "connection",
            "modify",
            "id",
            &self.tethering_connection,
            Self::PSK_SETTING,
            &password,
        ])
        .await
        .context("failed to change tethering password")?;

        // an active access point keeps the old secret until reactivated
        if self.is_tethering_enabled().await? {
            self.set_tethering_enabled(true).await?;
        }
        Ok(())
    }

    async fn current_ipv4(&self) -> Result<String> {
        let output = self
            .query(&["-g", "IP4.ADDRESS", "device", "show", &self.interface])
            .await
            .context("failed to read IP address")?;
        Ok(nmcli::parse_ipv4(&output))
    }
}
