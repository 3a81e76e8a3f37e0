use serde::{Deserialize, Serialize};

use crate::types::*;

/// Application Model - the complete state
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Model {
    pub page: Page,

    // WiFi list state
    /// Networks from the last refresh, in manager order
    pub networks: Vec<Network>,
    /// Ssid waiting for the forget confirmation
    pub pending_forget: Option<String>,

    // Input state
    pub keyboard: Keyboard,
    pub prompt: Option<PasswordPrompt>,

    // Advanced panel state
    pub wifi_status: WifiStatus,
    pub ssh_status: SshStatus,

    pub error_message: Option<String>,
}

impl Model {
    pub fn find_network(&self, ssid: &str) -> Option<&Network> {
        self.networks.iter().find(|network| network.ssid == ssid)
    }

    /// Whether the manager holds a credential for `ssid`, as of the last refresh
    pub fn is_known(&self, ssid: &str) -> bool {
        self.find_network(ssid).is_some_and(|network| network.known)
    }

    /// Set an error message
    pub fn set_error(&mut self, error: String) {
        self.error_message = Some(error);
    }

    /// Set an error message and return a render command
    pub fn set_error_and_render(
        &mut self,
        error: String,
    ) -> crux_core::Command<crate::Effect, crate::events::Event> {
        self.set_error(error);
        crux_core::render::render()
    }
}

/// What the renderer draws
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub page: Page,
    /// True until the first non-empty scan arrives
    pub scanning: bool,
    pub rows: Vec<NetworkRow>,
    pub forget_confirmation: Option<String>,
    pub keyboard_mode: KeyboardMode,
    pub keyboard_rows: Vec<Vec<String>>,
    pub prompt: Option<PasswordPrompt>,
    pub ipv4_address: String,
    pub tethering_enabled: bool,
    pub ssh: SshStatus,
    pub error_message: Option<String>,
}

impl From<&Model> for ViewModel {
    fn from(model: &Model) -> Self {
        let tethering_enabled = model.wifi_status.tethering_enabled;

        Self {
            page: model.page,
            scanning: model.networks.is_empty(),
            rows: model
                .networks
                .iter()
                .map(|network| NetworkRow::new(network, tethering_enabled))
                .collect(),
            forget_confirmation: model
                .pending_forget
                .as_ref()
                .map(|ssid| format!("Forget WiFi Network \"{ssid}\"?")),
            keyboard_mode: model.keyboard.mode,
            keyboard_rows: model.keyboard.rows(),
            prompt: model.prompt.clone(),
            ipv4_address: model.wifi_status.ipv4_address.clone(),
            tethering_enabled,
            ssh: model.ssh_status.clone(),
            error_message: model.error_message.clone(),
        }
    }
}
