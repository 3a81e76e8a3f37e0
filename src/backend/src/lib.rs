pub mod command;
pub mod config;
pub mod http_client;
pub mod network_manager_client;
pub mod services;
pub mod shell;
