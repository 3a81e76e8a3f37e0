//! Text input sink for keys typed while no prompt owns the keyboard.

use crux_core::{capability::Operation, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use super::notify;
use crate::types::KeyCommand;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TextInputOperation {
    Submit(KeyCommand),
}

impl Operation for TextInputOperation {
    type Output = ();
}

/// Command-based text input API
pub struct TextInput<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> TextInput<Effect, Event>
where
    Effect: Send + From<crux_core::Request<TextInputOperation>> + 'static,
    Event: Send + 'static,
{
    pub fn submit(command: KeyCommand) -> Command<Effect, Event> {
        notify(TextInputOperation::Submit(command))
    }
}
