//! CLI command implementations

pub mod groups;
pub mod init;
pub mod transform;
