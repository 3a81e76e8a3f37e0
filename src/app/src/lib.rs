pub mod commands;
pub mod events;
pub mod macros;
pub mod model;
pub mod types;
pub mod update;

use crux_core::Command;

// Re-export core types
pub use crate::{
    commands::{
        ssh::{SshOperation, SshOutput},
        text_input::TextInputOperation,
        wifi::{WifiOperation, WifiOutput},
    },
    events::*,
    model::{Model, ViewModel},
    types::*,
};

#[crux_macros::effect(typegen)]
pub enum Effect {
    Render(crux_core::render::RenderOperation),
    Wifi(WifiOperation),
    TextInput(TextInputOperation),
    Ssh(SshOperation),
}

pub type WifiCmd = crate::commands::wifi::Wifi<Effect, Event>;
pub type TextInputCmd = crate::commands::text_input::TextInput<Effect, Event>;
pub type SshCmd = crate::commands::ssh::Ssh<Effect, Event>;

/// The Core application
#[derive(Default)]
pub struct App;

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Effect = Effect;

    fn update(&self, event: Self::Event, model: &mut Self::Model) -> Command<Effect, Event> {
        update::update(event, model)
    }

    fn view(&self, model: &Self::Model) -> Self::ViewModel {
        ViewModel::from(model)
    }
}

#[cfg(test)]
mod tests;
