use std::path::PathBuf;

/// The Sonde target-introspection tool.
#[derive(clap::Parser)]
pub struct CliOpts {
    /// Configuration (KDL format).
    ///
    /// If it ends with `.kdl`, it is treated as a path to a configuration
    /// file. Otherwise it is directly parsed as inline KDL-formatted
    /// configuration.
    #[clap(short, long, value_name = "CONTENT/PATH")]
    pub config: Option<String>,

    /// Path to the optional destination of the output.
    #[clap(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// The command to run.
    #[clap(subcommand)]
    pub action: CliAction,
}

/// The command to run.
#[derive(clap::Subcommand)]
pub enum CliAction {
    /// Command to decode structures from a binary blob (e.g., a dump of the
    /// target's auxiliary vector).
    Decode {
        /// Layout of the structures to decode.
        #[clap(short, long, value_enum)]
        layout: CliLayout,

        /// Byte order of the target.
        #[clap(short, long, value_enum, conflicts_with = "elf")]
        endian: Option<CliEndian>,

        /// ELF image of the target, giving its byte order and word size.
        #[clap(long, value_name = "PATH")]
        elf: Option<PathBuf>,

        /// Word size of the target.
        #[clap(long, value_enum, conflicts_with = "elf")]
        bits: Option<CliBits>,

        /// Path to the binary blob.
        blob: PathBuf,
    },

    /// Command to find the emulator process serving a debugger's remote
    /// session.
    EmulatorPid {
        /// ID of the debugger process (defaults to this process).
        #[clap(long)]
        observer: Option<u32>,

        /// Mount point of procfs.
        #[clap(long, value_name = "PATH", default_value = "/proc")]
        proc_root: PathBuf,
    },

    /// Command to compute the sysroot of an emulated target.
    ///
    /// The debugger configuration is left untouched.
    Sysroot {
        /// Architecture name of the target.
        #[clap(short, long, required_unless_present = "elf")]
        arch: Option<String>,

        /// Byte order of the target.
        #[clap(short, long, value_enum, conflicts_with = "elf")]
        endian: Option<CliEndian>,

        /// ELF image of the target, giving its architecture and byte order.
        #[clap(long, value_name = "PATH", conflicts_with = "arch")]
        elf: Option<PathBuf>,
    },
}

/// Structure layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum CliLayout {
    /// Auxiliary vector entries.
    Auxv,

    /// ELF identification bytes.
    Ident,

    /// ELF program headers.
    Phdr,
}

/// Word size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum CliBits {
    /// 32-bit words.
    #[value(name = "32")]
    B32,

    /// 64-bit words.
    #[value(name = "64")]
    B64,
}

/// Byte order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum CliEndian {
    /// Little-endian.
    Little,

    /// Big-endian.
    Big,
}

impl From<CliEndian> for sonde_target::endian::Endianness {
    fn from(endian: CliEndian) -> Self {
        match endian {
            CliEndian::Little => Self::Little,
            CliEndian::Big => Self::Big,
        }
    }
}

impl CliOpts {
    /// Parses the CLI from the command-line.
    ///
    /// # Warning
    ///
    /// Exits on error.
    pub fn parse_from_cmdline() -> Self {
        <Self as clap::Parser>::parse()
    }
}
