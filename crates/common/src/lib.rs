pub mod api;
pub mod config;
pub mod extract;
pub mod logging;
pub mod matcher;
