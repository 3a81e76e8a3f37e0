use crux_core::{render::render, Command};
use log::debug;

use crate::events::{Event, WifiEvent};
use crate::model::Model;
use crate::types::{on_wrong_password, select_action, ConnectAction, Keyboard, PasswordPrompt};
use crate::update_field;
use crate::{Effect, WifiCmd};

use super::advanced::query_wifi_status;

/*
  tap on row ──► Select ──► select_action
                               │
       ┌──────────────┬────────┴────────┬───────────────────┐
       │              │                 │                   │
     known          open               wpa             unsupported
       │              │                 │                   │
  ActivateKnown   ConnectOpen   PromptForPassword         (ignored)
                                        │
                          (prompt confirmed, ≥ 8 chars)
                                        │
                               ConnectWithPassword
                                        │
                        (manager: ConnectionFailed(ssid))
                                        │
                     on_wrong_password ─┴─► "Wrong password" prompt
                                            (only if ssid still seen)
*/

/// Handle WiFi list events
pub fn handle(event: WifiEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        WifiEvent::Refresh => Command::all([WifiCmd::refresh_networks(), query_wifi_status()]),

        WifiEvent::NetworksRefreshed(networks) => update_field!(model.networks, networks),

        WifiEvent::ConnectionFailed { ssid } => match on_wrong_password(&ssid, &model.networks) {
            Ok(ConnectAction::PromptForPassword { ssid }) => {
                open_prompt(PasswordPrompt::retry(ssid), model)
            }
            Ok(action) => perform(action, model),
            Err(e) => {
                debug!("ignoring failed connection to {ssid}: {e}");
                Command::done()
            }
        },

        WifiEvent::Select { ssid } => handle_select(&ssid, model),

        WifiEvent::Forget { ssid } => {
            if !model.is_known(&ssid) || model.wifi_status.tethering_enabled {
                debug!("forget not offered for {ssid}");
                return Command::done();
            }
            update_field!(model.pending_forget, Some(ssid))
        }

        WifiEvent::ConfirmForget => match model.pending_forget.take() {
            Some(ssid) => Command::all([render(), WifiCmd::forget(ssid)]),
            None => Command::done(),
        },

        WifiEvent::CancelForget => update_field!(model.pending_forget, None),
    }
}

fn handle_select(ssid: &str, model: &mut Model) -> Command<Effect, Event> {
    let Some(network) = model.find_network(ssid) else {
        debug!("selected network {ssid} is no longer seen");
        return Command::done();
    };

    if !network.is_selectable() {
        debug!("selection of {ssid} is disabled");
        return Command::done();
    }

    match select_action(network, |ssid| model.is_known(ssid)) {
        Ok(action) => perform(action, model),
        Err(e) => {
            debug!("no action for {ssid}: {e}");
            Command::done()
        }
    }
}

/// Carry out a selector decision
pub(crate) fn perform(action: ConnectAction, model: &mut Model) -> Command<Effect, Event> {
    match action {
        ConnectAction::ActivateKnown { ssid } => WifiCmd::activate_known(ssid),
        ConnectAction::ConnectOpen { ssid } => WifiCmd::connect(ssid),
        ConnectAction::ConnectWithPassword { ssid, password } => {
            WifiCmd::connect_with_password(ssid, password)
        }
        ConnectAction::PromptForPassword { ssid } => {
            open_prompt(PasswordPrompt::connect(ssid), model)
        }
    }
}

/// Show `prompt`, replacing any pending one
pub(crate) fn open_prompt(prompt: PasswordPrompt, model: &mut Model) -> Command<Effect, Event> {
    model.prompt = Some(prompt);
    model.keyboard = Keyboard::default();
    render()
}
