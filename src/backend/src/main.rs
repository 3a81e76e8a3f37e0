use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::{error, info};
use std::io::Write;
use touch_settings::{
    config::AppConfig,
    network_manager_client::NmcliClient,
    services::ssh::SshService,
    shell::{self, Shell},
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    initialize();

    let config = AppConfig::get();
    let network_manager = NmcliClient::new(&config.network_manager);
    let ssh = SshService::new(&config.ssh).context("failed to create ssh service")?;

    let (shell, completions) = Shell::new(network_manager, ssh);

    shell::run(shell, completions, &config.refresh).await
}

fn initialize() {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => writeln!(f, "error: {}", record.args()),
        _ => writeln!(f, "{}", record.args()),
    });

    // stdout carries the renderer protocol
    builder.target(Target::Stderr).init();

    info!(
        "module version: {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_SHORT_REV")
    );
}
