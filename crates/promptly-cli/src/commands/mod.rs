pub mod analyze;
pub mod config;
pub mod dispatch;
pub mod input;
pub mod optimize;
pub mod templates;
