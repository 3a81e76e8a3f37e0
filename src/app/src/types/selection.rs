//! Policy for turning a tap on a network into a connection request.
//!
//! The selector holds no state of its own. The "known" predicate is owned by
//! the network manager and the last-seen list comes from the latest refresh.

use serde::{Deserialize, Serialize};

use super::network::{Network, SecurityType};

/// Minimum passphrase length accepted by the password prompt (WPA-PSK)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// What the core asks of the network manager (or the user) after a selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConnectAction {
    /// Reuse the stored credential
    ActivateKnown { ssid: String },
    /// Connect to an open network without credentials
    ConnectOpen { ssid: String },
    /// Ask the user for a passphrase first
    PromptForPassword { ssid: String },
    ConnectWithPassword { ssid: String, password: String },
}

/// Reasons a selection ends without a connection request.
///
/// None of these are fatal; callers abort silently.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SelectionError {
    /// The password prompt was cancelled or confirmed empty
    UserCancelled,
    /// The passphrase is shorter than [`MIN_PASSWORD_LENGTH`], keep prompting
    TooShort,
    /// A wrong-password callback named an ssid that is no longer seen
    UnknownNetwork,
    /// The security type is not handled, selection is disabled
    Unsupported,
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionError::UserCancelled => write!(f, "password prompt cancelled"),
            SelectionError::TooShort => write!(
                f,
                "password must have at least {MIN_PASSWORD_LENGTH} characters"
            ),
            SelectionError::UnknownNetwork => write!(f, "network is no longer in range"),
            SelectionError::Unsupported => write!(f, "security type not supported"),
        }
    }
}

impl std::error::Error for SelectionError {}

/// Decide how to connect to `network`.
///
/// A known network is activated regardless of its security type.
pub fn select_action(
    network: &Network,
    is_known: impl Fn(&str) -> bool,
) -> Result<ConnectAction, SelectionError> {
    let ssid = network.ssid.clone();

    if is_known(&network.ssid) {
        return Ok(ConnectAction::ActivateKnown { ssid });
    }

    match network.security_type {
        SecurityType::Open => Ok(ConnectAction::ConnectOpen { ssid }),
        SecurityType::Wpa => Ok(ConnectAction::PromptForPassword { ssid }),
        SecurityType::Unsupported => Err(SelectionError::Unsupported),
    }
}

/// Turn the text entered into a password prompt into a connection request
pub fn complete_password(ssid: &str, password: &str) -> Result<ConnectAction, SelectionError> {
    if password.is_empty() {
        return Err(SelectionError::UserCancelled);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(SelectionError::TooShort);
    }

    Ok(ConnectAction::ConnectWithPassword {
        ssid: ssid.to_string(),
        password: password.to_string(),
    })
}

/// Re-prompt after the network manager rejected a passphrase.
///
/// Only networks from the last-seen list are re-prompted.
pub fn on_wrong_password(ssid: &str, seen: &[Network]) -> Result<ConnectAction, SelectionError> {
    seen.iter()
        .find(|network| network.ssid == ssid)
        .map(|network| ConnectAction::PromptForPassword {
            ssid: network.ssid.clone(),
        })
        .ok_or(SelectionError::UnknownNetwork)
}
