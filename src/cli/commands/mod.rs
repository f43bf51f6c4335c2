pub mod clean;
pub mod config;
pub mod hook;
pub mod init;
pub mod status;
pub mod sync;
