pub mod commands;
pub mod handlers;

pub use commands::CliArgs;
pub use handlers::{handle_extract, handle_usage_error, EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE};
