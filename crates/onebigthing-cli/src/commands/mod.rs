pub mod config;
pub mod history;
pub mod reset;
pub mod streak;
pub mod subscription;
pub mod task;
