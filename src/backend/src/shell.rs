//! Native shell hosting the core.
//!
//! Events come from the renderer (newline-delimited JSON on stdin), the
//! refresh timer and finished connection attempts. Effects are resolved
//! against the network manager and the SSH service; renders and text input
//! go back to the renderer on stdout.

use crate::{
    config::RefreshConfig,
    network_manager_client::{AuthenticationFailed, NetworkManager},
    services::ssh::SshManager,
};
use anyhow::{Context, Result};
use crux_core::{Core, Request};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::{collections::VecDeque, sync::Arc};
use tokio::{
    io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    signal::unix::{SignalKind, signal},
    sync::mpsc,
    time::{Instant, interval_at},
};
use touch_settings_core::{
    App, Effect, Event, KeyCommand, SshOperation, SshOutput, TextInputOperation, UiEvent,
    ViewModel, WifiEvent, WifiOperation, WifiOutput, WifiStatus,
};

/// A line written to the renderer
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellOutput {
    View(ViewModel),
    TextInput(KeyCommand),
}

pub struct Shell<N, S> {
    core: Core<App>,
    network_manager: Arc<N>,
    ssh: S,
    completions: mpsc::UnboundedSender<Event>,
}

impl<N, S> Shell<N, S>
where
    N: NetworkManager + Send + Sync + 'static,
    S: SshManager,
{
    /// Create the shell and the receiver of events from background work
    pub fn new(network_manager: N, ssh: S) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (completions, receiver) = mpsc::unbounded_channel();

        let shell = Shell {
            core: Core::new(),
            network_manager: Arc::new(network_manager),
            ssh,
            completions,
        };

        (shell, receiver)
    }

    /// Process `event` and every effect it causes, collecting renderer output.
    ///
    /// Several renders within one dispatch collapse into a single view.
    pub async fn dispatch(&self, event: Event) -> Vec<ShellOutput> {
        let mut outputs = Vec::new();
        let mut rendered = false;
        let mut queue: VecDeque<Effect> = self.core.process_event(event).into();

        while let Some(effect) = queue.pop_front() {
            let effects = match effect {
                Effect::Render(_) => {
                    rendered = true;
                    Vec::new()
                }
                Effect::TextInput(request) => {
                    let TextInputOperation::Submit(command) = request.operation.clone();
                    outputs.push(ShellOutput::TextInput(command));
                    Vec::new()
                }
                Effect::Wifi(mut request) => self.handle_wifi(&mut request).await,
                Effect::Ssh(mut request) => self.handle_ssh(&mut request).await,
            };
            queue.extend(effects);
        }

        if rendered {
            outputs.push(ShellOutput::View(self.core.view()));
        }

        outputs
    }

    // ========================================================================
    // WiFi
    // ========================================================================

    async fn handle_wifi(&self, request: &mut Request<WifiOperation>) -> Vec<Effect> {
        match request.operation.clone() {
            WifiOperation::Status => {
                let output = match self.wifi_status().await {
                    Ok(status) => WifiOutput::Status(status),
                    Err(e) => {
                        error!("failed to query wifi status: {e:#}");
                        WifiOutput::Error {
                            message: format!("{e:#}"),
                        }
                    }
                };
                self.resolve(request, output)
            }

            WifiOperation::RefreshNetworks => match self.network_manager.networks().await {
                Ok(networks) => self
                    .core
                    .process_event(Event::Wifi(WifiEvent::NetworksRefreshed(networks))),
                Err(e) => {
                    // retried by the next timer tick
                    warn!("failed to refresh networks: {e:#}");
                    Vec::new()
                }
            },

            WifiOperation::ActivateKnown { ssid } => {
                self.spawn_connect(ssid, |nm, ssid| async move { nm.activate_known(ssid).await });
                Vec::new()
            }

            WifiOperation::Connect { ssid } => {
                self.spawn_connect(ssid, |nm, ssid| async move { nm.connect(ssid).await });
                Vec::new()
            }

            WifiOperation::ConnectWithPassword { ssid, password } => {
                self.spawn_connect(ssid, |nm, ssid| async move {
                    nm.connect_with_password(ssid, password).await
                });
                Vec::new()
            }

            WifiOperation::Forget { ssid } => {
                let result = self.network_manager.forget(ssid).await;
                self.refresh_after(result)
            }

            WifiOperation::SetTetheringEnabled { enabled } => {
                let result = self.network_manager.set_tethering_enabled(enabled).await;
                self.refresh_after(result)
            }

            WifiOperation::SetTetheringPassword { password } => {
                let result = self.network_manager.set_tethering_password(password).await;
                self.refresh_after(result)
            }
        }
    }

    /// Start a connection attempt in the background.
    ///
    /// Activation can take as long as the manager's timeout, so the loop keeps
    /// serving key presses meanwhile. The outcome arrives as an event.
    fn spawn_connect<F, Fut>(&self, ssid: String, attempt: F)
    where
        F: FnOnce(Arc<N>, String) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let network_manager = Arc::clone(&self.network_manager);
        let completions = self.completions.clone();

        tokio::spawn(async move {
            let event = match attempt(network_manager, ssid.clone()).await {
                Ok(()) => {
                    info!("connected to {ssid}");
                    Event::Wifi(WifiEvent::Refresh)
                }
                Err(e) => match e.downcast_ref::<AuthenticationFailed>() {
                    Some(failed) => Event::Wifi(WifiEvent::ConnectionFailed {
                        ssid: failed.ssid.clone(),
                    }),
                    None => {
                        error!("failed to connect to {ssid}: {e:#}");
                        Event::Ui(UiEvent::ReportError(format!("{e:#}")))
                    }
                },
            };

            if completions.send(event).is_err() {
                debug!("shell stopped before connection attempt finished");
            }
        });
    }

    async fn wifi_status(&self) -> Result<WifiStatus> {
        let tethering_enabled = self.network_manager.is_tethering_enabled().await?;

        let ipv4_address = self
            .network_manager
            .current_ipv4()
            .await
            .unwrap_or_else(|e| {
                debug!("no ipv4 address: {e:#}");
                String::new()
            });

        let tethering_password = self
            .network_manager
            .tethering_password()
            .await
            .unwrap_or_else(|e| {
                debug!("no tethering password: {e:#}");
                String::new()
            });

        Ok(WifiStatus {
            ipv4_address,
            tethering_enabled,
            tethering_password,
        })
    }

    /// Refresh after a successful change, report the error otherwise
    fn refresh_after(&self, result: Result<()>) -> Vec<Effect> {
        let event = match result {
            Ok(()) => Event::Wifi(WifiEvent::Refresh),
            Err(e) => {
                error!("{e:#}");
                Event::Ui(UiEvent::ReportError(format!("{e:#}")))
            }
        };
        self.core.process_event(event)
    }

    // ========================================================================
    // SSH
    // ========================================================================

    async fn handle_ssh(&self, request: &mut Request<SshOperation>) -> Vec<Effect> {
        match request.operation.clone() {
            SshOperation::SetEnabled { enabled } => match self.ssh.set_enabled(enabled).await {
                Ok(()) => Vec::new(),
                Err(e) => {
                    error!("{e:#}");
                    self.core
                        .process_event(Event::Ui(UiEvent::ReportError(format!("{e:#}"))))
                }
            },

            SshOperation::SetKeysUsername { username } => {
                let output = match self.ssh.set_keys_username(username).await {
                    Ok(()) => SshOutput::Done,
                    Err(e) => {
                        error!("failed to update authorized keys: {e:#}");
                        SshOutput::Error {
                            message: format!("{e:#}"),
                        }
                    }
                };
                self.resolve(request, output)
            }

            SshOperation::Status => {
                let output = match self.ssh.status().await {
                    Ok(status) => SshOutput::Status(status),
                    Err(e) => SshOutput::Error {
                        message: format!("{e:#}"),
                    },
                };
                self.resolve(request, output)
            }
        }
    }

    fn resolve<Op>(&self, request: &mut Request<Op>, output: Op::Output) -> Vec<Effect>
    where
        Op: crux_core::capability::Operation,
    {
        self.core.resolve(request, output).unwrap_or_else(|e| {
            error!("failed to resolve request: {e:?}");
            Vec::new()
        })
    }
}

/// Parse one line of renderer input
pub fn parse_event(line: &str) -> Result<Event> {
    serde_json::from_str(line).with_context(|| format!("failed to parse event: {line}"))
}

async fn emit<W>(out: &mut W, outputs: &[ShellOutput]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    for output in outputs {
        let mut line = serde_json::to_vec(output).context("failed to serialize output")?;
        line.push(b'\n');
        out.write_all(&line)
            .await
            .context("failed to write output")?;
    }
    out.flush().await.context("failed to flush output")
}

/// Run the shell until stdin closes or a termination signal arrives
pub async fn run<N, S>(
    shell: Shell<N, S>,
    mut completions: mpsc::UnboundedReceiver<Event>,
    refresh: &RefreshConfig,
) -> Result<()>
where
    N: NetworkManager + Send + Sync + 'static,
    S: SshManager,
{
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut out = tokio::io::stdout();
    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
    let mut ticker = interval_at(Instant::now() + refresh.initial_delay, refresh.interval);

    emit(&mut out, &shell.dispatch(Event::Initialize).await).await?;

    loop {
        let event = tokio::select! {
            line = input.next_line() => match line.context("failed to read input")? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => match parse_event(&line) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("{e:#}");
                        continue;
                    }
                },
                None => {
                    info!("input closed");
                    break;
                }
            },
            Some(event) = completions.recv() => event,
            _ = ticker.tick() => Event::Wifi(WifiEvent::Refresh),
            _ = sigterm.recv() => {
                debug!("SIGTERM received");
                break;
            },
            _ = tokio::signal::ctrl_c() => {
                debug!("ctrl-c received");
                break;
            },
        };

        emit(&mut out, &shell.dispatch(event).await).await?;
    }

    info!("shutting down");
    Ok(())
}
