//! Configuration, state and server lifecycle.

mod config;
mod server;
mod state;

pub use config::Config;
pub use server::{Server, build_app};
pub use state::ServerState;
