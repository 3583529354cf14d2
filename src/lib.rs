pub mod client;
pub mod cmd;
pub mod config;
pub mod dashboard;
pub mod logs;
pub mod router;
pub mod types;
