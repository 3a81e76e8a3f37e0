//! Business logic services
//!
//! System-facing operations kept apart from the shell loop so they can be
//! tested on their own.

pub mod nmcli;
pub mod ssh;
