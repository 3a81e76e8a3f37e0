use crux_core::{render::render, Command};

use crate::events::{Event, KeyboardEvent};
use crate::model::Model;
use crate::{Effect, TextInputCmd};

use super::prompt::confirm_prompt;

/// Handle on-screen keyboard presses.
///
/// Forwarded keys edit the open prompt; without a prompt they go to the
/// shell's text input sink.
pub fn handle(event: KeyboardEvent, model: &mut Model) -> Command<Effect, Event> {
    let KeyboardEvent::KeyPressed { label } = event;

    let mode = model.keyboard.mode;
    let forwarded = model.keyboard.press(&label);
    let page_changed = model.keyboard.mode != mode;

    let Some(command) = forwarded else {
        return if page_changed {
            render()
        } else {
            Command::done()
        };
    };

    match model.prompt.as_mut() {
        Some(prompt) => {
            if prompt.apply(&command) {
                confirm_prompt(model)
            } else {
                render()
            }
        }
        None if page_changed => Command::all([render(), TextInputCmd::submit(command)]),
        None => TextInputCmd::submit(command),
    }
}
