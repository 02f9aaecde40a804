use std::ffi::OsStr;
use std::path::Path;

use miette::IntoDiagnostic;

use sonde_target::emulation::{
    ClassifierConfig, DEFAULT_EMULATOR_PROCESS_PREFIX, DEFAULT_SYSROOT_BASE,
};

/// Configuration of emulator detection.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct SondeConfig {
    /// Executable name prefix of emulator processes.
    #[knus(child, default = DEFAULT_EMULATOR_PROCESS_PREFIX.to_owned(), unwrap(argument))]
    pub emulator_process_prefix: String,

    /// Directory holding one sysroot per emulated architecture.
    #[knus(child, default = DEFAULT_SYSROOT_BASE.to_owned(), unwrap(argument))]
    pub sysroot_base: String,
}

impl SondeConfig {
    /// Parses the configuration, given either as a path to a `.kdl` file or
    /// as inline KDL content.
    pub fn parse(config: Option<&str>) -> miette::Result<Self> {
        let Some(config) = config else {
            return Ok(knus::parse("<content>", "")?);
        };

        let path = Path::new(config);

        let config = if let Some((filename, "kdl")) = path
            .file_name()
            .and_then(OsStr::to_str)
            .zip(path.extension().and_then(OsStr::to_str))
        {
            let content = std::fs::read_to_string(path).into_diagnostic()?;
            knus::parse(filename, &content)?
        } else {
            knus::parse("<content>", config)?
        };

        Ok(config)
    }

    /// Returns the classifier configuration matching this configuration.
    pub fn to_classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            emulator_process_prefix: self.emulator_process_prefix.clone(),
            sysroot_base: self.sysroot_base.clone().into(),
            ..ClassifierConfig::default()
        }
    }
}
