use serde::{Deserialize, Serialize};

use crate::commands::{ssh::SshOutput, wifi::WifiOutput};
use crate::types::Network;

/// Events that can happen in the app, grouped by domain
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Event {
    Initialize,
    Wifi(WifiEvent),
    Keyboard(KeyboardEvent),
    Prompt(PromptEvent),
    Advanced(AdvancedEvent),
    Ui(UiEvent),
}

/// WiFi list events from the renderer and the network manager
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum WifiEvent {
    /// Rescan request, sent by the refresh timer and when the screen is shown
    Refresh,
    NetworksRefreshed(Vec<Network>),
    /// The manager rejected the credentials for `ssid`
    ConnectionFailed {
        ssid: String,
    },
    Select {
        ssid: String,
    },
    /// Forget button, asks for confirmation first
    Forget {
        ssid: String,
    },
    ConfirmForget,
    CancelForget,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum KeyboardEvent {
    KeyPressed { label: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    Confirm,
    Cancel,
    /// Text edited on the renderer side (hardware keyboard, paste)
    Edit { text: String },
}

/// Advanced networking panel events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum AdvancedEvent {
    Open,
    Back,
    SetTetheringEnabled(bool),
    EditTetheringPassword,
    SetSshEnabled(bool),
    SetSshKeysUsername(Option<String>),

    // Shell responses (internal events, skipped from serialization)
    #[serde(skip)]
    WifiStatusResponse(WifiOutput),
    #[serde(skip)]
    SshStatusResponse(SshOutput),
    #[serde(skip)]
    SshKeysResponse(SshOutput),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ClearError,
    ReportError(String),
}
