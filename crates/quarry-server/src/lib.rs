pub mod context;
pub mod dispatch;
pub mod error;
pub mod registries;
pub mod server;
pub mod session;
pub mod session_manager;

pub use context::ServerContext;
pub use error::{Result, ServerError};
pub use server::Server;
