mod advanced;
mod keyboard;
mod prompt;
mod ui;
mod wifi;

use crux_core::{render::render, Command};

use crate::events::Event;
use crate::model::Model;
use crate::{Effect, WifiCmd};

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Initialize => Command::all([
            render(),
            WifiCmd::refresh_networks(),
            advanced::query_wifi_status(),
        ]),
        Event::Wifi(event) => wifi::handle(event, model),
        Event::Keyboard(event) => keyboard::handle(event, model),
        Event::Prompt(event) => prompt::handle(event, model),
        Event::Advanced(event) => advanced::handle(event, model),
        Event::Ui(event) => ui::handle(event, model),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::{SshOperation, TextInputOperation, WifiOperation};

    /// Everything a command asks of the shell, in issue order
    #[derive(Debug, Default)]
    pub struct Issued {
        pub renders: usize,
        pub wifi: Vec<WifiOperation>,
        pub text_input: Vec<TextInputOperation>,
        pub ssh: Vec<SshOperation>,
    }

    pub fn issued(mut command: Command<Effect, Event>) -> Issued {
        let mut issued = Issued::default();
        for effect in command.effects() {
            match effect {
                Effect::Render(_) => issued.renders += 1,
                Effect::Wifi(request) => issued.wifi.push(request.operation.clone()),
                Effect::TextInput(request) => issued.text_input.push(request.operation.clone()),
                Effect::Ssh(request) => issued.ssh.push(request.operation.clone()),
            }
        }
        issued
    }
}
