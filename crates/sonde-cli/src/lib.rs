//! Crate implementing the CLI commands.

mod cli;
mod config;
mod decode;
mod probe;

pub use self::cli::{CliAction, CliBits, CliEndian, CliLayout, CliOpts};
pub use self::config::SondeConfig;
pub use self::decode::{decode_to_kdl, evaluate_decode};
pub use self::probe::{evaluate_emulator_pid, evaluate_sysroot};
