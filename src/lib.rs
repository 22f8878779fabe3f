pub mod config;
pub mod errors;
pub mod guard;
pub mod lister;
pub mod logging;
pub mod security;
pub mod server;
