//! WiFi manager command definitions.
//!
//! Connection attempts are fire-and-forget: the shell reports their outcome
//! later through `WifiEvent::NetworksRefreshed` and `WifiEvent::ConnectionFailed`.

use crux_core::{capability::Operation, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use super::{notify, RequestBuilder};
use crate::types::WifiStatus;

// Operations that the Shell performs on the network manager
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum WifiOperation {
    RefreshNetworks,
    ActivateKnown { ssid: String },
    Connect { ssid: String },
    ConnectWithPassword { ssid: String, password: String },
    Forget { ssid: String },
    SetTetheringEnabled { enabled: bool },
    SetTetheringPassword { password: String },
    Status,
}

// The output from WiFi operations (only `Status` carries data)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum WifiOutput {
    Done,
    Status(WifiStatus),
    Error { message: String },
}

impl Operation for WifiOperation {
    type Output = WifiOutput;
}

/// Command-based WiFi manager API
pub struct Wifi<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> Wifi<Effect, Event>
where
    Effect: Send + From<crux_core::Request<WifiOperation>> + 'static,
    Event: Send + 'static,
{
    /// Ask the manager to rescan and publish a fresh network list
    pub fn refresh_networks() -> Command<Effect, Event> {
        notify(WifiOperation::RefreshNetworks)
    }

    /// Activate the stored connection for `ssid`
    pub fn activate_known(ssid: impl Into<String>) -> Command<Effect, Event> {
        notify(WifiOperation::ActivateKnown { ssid: ssid.into() })
    }

    /// Connect to an open network
    pub fn connect(ssid: impl Into<String>) -> Command<Effect, Event> {
        notify(WifiOperation::Connect { ssid: ssid.into() })
    }

    pub fn connect_with_password(
        ssid: impl Into<String>,
        password: impl Into<String>,
    ) -> Command<Effect, Event> {
        notify(WifiOperation::ConnectWithPassword {
            ssid: ssid.into(),
            password: password.into(),
        })
    }

    /// Delete the stored credential for `ssid`
    pub fn forget(ssid: impl Into<String>) -> Command<Effect, Event> {
        notify(WifiOperation::Forget { ssid: ssid.into() })
    }

    pub fn set_tethering_enabled(enabled: bool) -> Command<Effect, Event> {
        notify(WifiOperation::SetTetheringEnabled { enabled })
    }

    pub fn set_tethering_password(password: impl Into<String>) -> Command<Effect, Event> {
        notify(WifiOperation::SetTetheringPassword {
            password: password.into(),
        })
    }

    /// Query IP address and tethering state
    pub fn status() -> RequestBuilder<WifiOperation, Effect, Event> {
        RequestBuilder::new(WifiOperation::Status)
    }
}
