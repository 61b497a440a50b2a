pub mod changelog;
pub mod config;
pub mod git_ops;
pub mod logging;
pub mod manifest;
pub mod text;
pub mod version;
