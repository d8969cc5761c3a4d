//! # CLI Subcommands
//!
//! Contains modules that run the subcommands.

pub mod langx;

#[derive(thiserror::Error,Debug)]
pub enum CommandError {
    #[error("Command could not be interpreted")]
    InvalidCommand,
    #[error("One of the parameters was out of range")]
    OutOfRange
}
