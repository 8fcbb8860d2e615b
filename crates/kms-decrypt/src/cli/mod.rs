//! Command-line surface: flag parsing and usage text.

pub mod args;

pub use args::{parse_args, Command, USAGE};
