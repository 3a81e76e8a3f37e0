//! SSH access command definitions.

use crux_core::{capability::Operation, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use super::{notify, RequestBuilder};
use crate::types::SshStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SshOperation {
    SetEnabled { enabled: bool },
    /// Authorize the public keys of a GitHub user, `None` removes them
    SetKeysUsername { username: Option<String> },
    Status,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SshOutput {
    Done,
    Status(SshStatus),
    Error { message: String },
}

impl Operation for SshOperation {
    type Output = SshOutput;
}

/// Command-based SSH API
pub struct Ssh<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> Ssh<Effect, Event>
where
    Effect: Send + From<crux_core::Request<SshOperation>> + 'static,
    Event: Send + 'static,
{
    pub fn set_enabled(enabled: bool) -> Command<Effect, Event> {
        notify(SshOperation::SetEnabled { enabled })
    }

    /// Fetch and authorize keys for `username`; the shell answers once done
    pub fn set_keys_username(
        username: Option<String>,
    ) -> RequestBuilder<SshOperation, Effect, Event> {
        RequestBuilder::new(SshOperation::SetKeysUsername { username })
    }

    pub fn status() -> RequestBuilder<SshOperation, Effect, Event> {
        RequestBuilder::new(SshOperation::Status)
    }
}
