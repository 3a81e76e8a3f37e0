use crux_core::{render::render, Command};
use log::warn;

use crate::events::{AdvancedEvent, Event};
use crate::model::Model;
use crate::types::{Page, PasswordPrompt};
use crate::update_field;
use crate::{Effect, SshCmd, SshOutput, WifiCmd, WifiOutput};

use super::wifi::open_prompt;

/// Handle advanced networking panel events
pub fn handle(event: AdvancedEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        AdvancedEvent::Open => Command::all([
            update_field!(model.page, Page::Advanced),
            query_wifi_status(),
            query_ssh_status(),
        ]),

        AdvancedEvent::Back => update_field!(model.page, Page::WifiList),

        AdvancedEvent::SetTetheringEnabled(enabled) => {
            model.wifi_status.tethering_enabled = enabled;
            Command::all([render(), WifiCmd::set_tethering_enabled(enabled)])
        }

        AdvancedEvent::EditTetheringPassword => {
            let current = model.wifi_status.tethering_password.clone();
            open_prompt(PasswordPrompt::tethering_password(current), model)
        }

        AdvancedEvent::SetSshEnabled(enabled) => {
            model.ssh_status.enabled = enabled;
            Command::all([render(), SshCmd::set_enabled(enabled)])
        }

        AdvancedEvent::SetSshKeysUsername(username) => {
            let username = username
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty());

            SshCmd::set_keys_username(username)
                .build()
                .then_send(|output| Event::Advanced(AdvancedEvent::SshKeysResponse(output)))
        }

        AdvancedEvent::WifiStatusResponse(output) => match output {
            WifiOutput::Status(status) => update_field!(model.wifi_status, status),
            WifiOutput::Error { message } => {
                warn!("failed to query wifi status: {message}");
                model.set_error_and_render(message)
            }
            WifiOutput::Done => Command::done(),
        },

        AdvancedEvent::SshStatusResponse(output) => match output {
            SshOutput::Status(status) => update_field!(model.ssh_status, status),
            SshOutput::Error { message } => {
                warn!("failed to query ssh status: {message}");
                model.set_error_and_render(message)
            }
            SshOutput::Done => Command::done(),
        },

        AdvancedEvent::SshKeysResponse(output) => match output {
            SshOutput::Error { message } => model.set_error_and_render(message),
            SshOutput::Done | SshOutput::Status(_) => query_ssh_status(),
        },
    }
}

/// Ask the shell for IP address and tethering state
pub(crate) fn query_wifi_status() -> Command<Effect, Event> {
    WifiCmd::status()
        .build()
        .then_send(|output| Event::Advanced(AdvancedEvent::WifiStatusResponse(output)))
}

fn query_ssh_status() -> Command<Effect, Event> {
    SshCmd::status()
        .build()
        .then_send(|output| Event::Advanced(AdvancedEvent::SshStatusResponse(output)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PromptPurpose, SshStatus, WifiStatus};
    use crate::update::test_support::issued;
    use crate::{SshOperation, WifiOperation};

    #[test]
    fn open_and_back_switch_pages() {
        let mut model = Model::default();

        let opened = issued(handle(AdvancedEvent::Open, &mut model));
        assert_eq!(model.page, Page::Advanced);
        assert!(opened.wifi.contains(&WifiOperation::Status));
        assert!(opened.ssh.contains(&SshOperation::Status));

        let _ = handle(AdvancedEvent::Back, &mut model);
        assert_eq!(model.page, Page::WifiList);
    }

    #[test]
    fn status_response_updates_ip_and_tethering() {
        let mut model = Model::default();
        let status = WifiStatus {
            ipv4_address: "192.168.43.1".to_string(),
            tethering_enabled: true,
            tethering_password: "swordfish".to_string(),
        };

        let _ = handle(
            AdvancedEvent::WifiStatusResponse(WifiOutput::Status(status.clone())),
            &mut model,
        );

        assert_eq!(model.wifi_status, status);
    }

    #[test]
    fn status_error_is_reported() {
        let mut model = Model::default();

        let _ = handle(
            AdvancedEvent::WifiStatusResponse(WifiOutput::Error {
                message: "nmcli not found".to_string(),
            }),
            &mut model,
        );

        assert_eq!(model.error_message.as_deref(), Some("nmcli not found"));
    }

    #[test]
    fn tethering_toggle_is_forwarded() {
        let mut model = Model::default();

        let issued = issued(handle(AdvancedEvent::SetTetheringEnabled(true), &mut model));

        assert!(model.wifi_status.tethering_enabled);
        assert_eq!(
            issued.wifi,
            vec![WifiOperation::SetTetheringEnabled { enabled: true }]
        );
    }

    #[test]
    fn edit_tethering_password_prefills_prompt() {
        let mut model = Model {
            wifi_status: WifiStatus {
                tethering_password: "swordfish".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let _ = handle(AdvancedEvent::EditTetheringPassword, &mut model);

        let prompt = model.prompt.expect("prompt should be open");
        assert_eq!(prompt.purpose, PromptPurpose::TetheringPassword);
        assert_eq!(prompt.text, "swordfish");
    }

    #[test]
    fn ssh_keys_username_is_trimmed() {
        let mut model = Model::default();

        let issued = issued(handle(
            AdvancedEvent::SetSshKeysUsername(Some("  octocat ".to_string())),
            &mut model,
        ));

        assert_eq!(
            issued.ssh,
            vec![SshOperation::SetKeysUsername {
                username: Some("octocat".to_string())
            }]
        );
    }

    #[test]
    fn blank_ssh_keys_username_removes_keys() {
        let mut model = Model::default();

        let issued = issued(handle(
            AdvancedEvent::SetSshKeysUsername(Some("   ".to_string())),
            &mut model,
        ));

        assert_eq!(
            issued.ssh,
            vec![SshOperation::SetKeysUsername { username: None }]
        );
    }

    #[test]
    fn ssh_status_response_updates_model() {
        let mut model = Model::default();
        let status = SshStatus {
            enabled: true,
            keys_username: Some("octocat".to_string()),
        };

        let _ = handle(
            AdvancedEvent::SshStatusResponse(SshOutput::Status(status.clone())),
            &mut model,
        );

        assert_eq!(model.ssh_status, status);
    }

    #[test]
    fn failed_key_fetch_shows_error() {
        let mut model = Model::default();

        let _ = handle(
            AdvancedEvent::SshKeysResponse(SshOutput::Error {
                message: "no keys for octocat".to_string(),
            }),
            &mut model,
        );

        assert_eq!(model.error_message.as_deref(), Some("no keys for octocat"));
    }
}
