//! Shell-facing operations of the core.
//!
//! Each module defines the operations of one capability and a small command
//! API on top of them. Fire-and-forget operations become notifications,
//! queries become requests whose output is sent back as an event.

pub mod ssh;
pub mod text_input;
pub mod wifi;

use crux_core::{capability::Operation, command, Command};
use std::marker::PhantomData;

/// Request builder for operations the shell answers with an output
#[must_use]
pub struct RequestBuilder<Op, Effect, Event> {
    operation: Op,
    _effect: PhantomData<Effect>,
    _event: PhantomData<fn() -> Event>,
}

impl<Op, Effect, Event> RequestBuilder<Op, Effect, Event>
where
    Op: Operation,
    Effect: Send + From<crux_core::Request<Op>> + 'static,
    Event: Send + 'static,
{
    fn new(operation: Op) -> Self {
        Self {
            operation,
            _effect: PhantomData,
            _event: PhantomData,
        }
    }

    /// Build the request into a Command RequestBuilder
    pub fn build(
        self,
    ) -> command::RequestBuilder<Effect, Event, impl std::future::Future<Output = Op::Output>> {
        command::RequestBuilder::new(move |ctx| async move {
            Command::request_from_shell(self.operation)
                .into_future(ctx)
                .await
        })
    }
}

/// Send an operation to the shell without waiting for an answer
fn notify<Op, Effect, Event>(operation: Op) -> Command<Effect, Event>
where
    Op: Operation,
    Effect: Send + From<crux_core::Request<Op>> + 'static,
    Event: Send + 'static,
{
    Command::notify_shell(operation).into()
}
