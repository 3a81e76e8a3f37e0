//! Domain-based type organization
//!
//! Types are organized by domain to match the structure in `update/`:
//! - network: Scanned networks, list rows and advanced panel state
//! - selection: Connection policy for a selected network
//! - keyboard: On-screen keyboard pages
//! - prompt: Password prompt state

pub mod keyboard;
pub mod network;
pub mod prompt;
pub mod selection;

pub use keyboard::*;
pub use network::*;
pub use prompt::*;
pub use selection::*;
