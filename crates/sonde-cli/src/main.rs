#![allow(missing_docs)]
#![allow(clippy::print_stderr)]

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use miette::IntoDiagnostic;

use sonde_cli::{CliAction, CliOpts, SondeConfig};

use tracing_subscriber::EnvFilter;

fn main() {
    let cli = CliOpts::parse_from_cmdline();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_env_var("SONDE_LOG")
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = evaluate(cli) {
        eprintln!("{e:?}");
        std::process::exit(1);
    }
}

fn evaluate(cli: CliOpts) -> miette::Result<()> {
    let config = SondeConfig::parse(cli.config.as_deref())?.to_classifier_config();

    let mut output = open_output(cli.output)?;

    match cli.action {
        CliAction::Decode {
            layout,
            endian,
            elf,
            bits,
            blob,
        } => sonde_cli::evaluate_decode(&mut output, layout, endian, elf.as_deref(), bits, &blob),
        CliAction::EmulatorPid {
            observer,
            proc_root,
        } => sonde_cli::evaluate_emulator_pid(&mut output, &config, observer, proc_root),
        CliAction::Sysroot { arch, endian, elf } => {
            sonde_cli::evaluate_sysroot(&mut output, &config, arch, endian, elf.as_deref())
        }
    }
}

fn open_output(output: Option<PathBuf>) -> miette::Result<Box<dyn Write>> {
    if let Some(output) = output {
        let file = File::create(output).into_diagnostic()?;
        Ok(Box::new(file))
    } else {
        Ok(Box::new(std::io::stdout()))
    }
}
