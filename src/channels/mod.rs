//! Outer surfaces: the local REPL and the HTTP API.

pub mod cli;
pub mod http;

pub use cli::{CliChannel, CliCommand};
pub use http::{HttpState, session_routes};
