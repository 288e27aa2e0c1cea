use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};

/// Mirrors the flag table in SPEC_FULL §4.11. `-h`/`--help` and `--version`
/// come for free from `clap`.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct CliArgs {
    /// Input files. The first is the mandatory application; the rest are
    /// optional. With no files, standard input is read and treated as
    /// entirely mandatory.
    #[arg(value_name = "files", value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// Quiet mode: ingest, run the basic link, then exit
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Lenient scan mode: uppercase every type char, and treat '?' as undefined
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Log each object's linking decision
    #[arg(short = 'l', long = "log-link")]
    pub log_link: bool,

    /// Log each object's unlinking decision
    #[arg(short = 'u', long = "log-unlink")]
    pub log_unlink: bool,

    /// Dump the dependencies of every object
    #[arg(short = 'd', long = "dump-deps")]
    pub dump_deps: bool,

    /// Dump every symbol's info
    #[arg(short = 's', long = "dump-syms")]
    pub dump_syms: bool,

    /// Run the multiple-definition scan over Application and Optional
    #[arg(short = 'm', long = "multiple-defs")]
    pub multiple_defs: bool,

    /// Enter the interactive query loop
    #[arg(short = 'i', long = "interactive")]
    pub interactive: bool,

    /// Process a removal-list file
    #[arg(
        short = 'r',
        long = "remove",
        value_name = "path",
        value_hint = clap::ValueHint::FilePath
    )]
    pub removal_list: Option<PathBuf>,

    /// Redirect the bulk report sink to a file instead of standard output
    #[arg(
        short = 'o',
        long = "output",
        value_name = "path",
        value_hint = clap::ValueHint::FilePath
    )]
    pub report_path: Option<PathBuf>,

    /// Write the linker script to the specified file
    #[arg(
        short = 'e',
        long = "emit-script",
        value_name = "path",
        value_hint = clap::ValueHint::FilePath
    )]
    pub script_path: Option<PathBuf>,

    /// Print colored output
    #[arg(long, value_name = "color", default_value_t = ColorOption::Auto)]
    pub color: ColorOption,

    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorOption {
    #[value(name = "never")]
    Never,

    #[value(name = "auto")]
    Auto,

    #[value(name = "always")]
    Always,

    #[value(name = "ansi")]
    AlwaysAnsi,
}

impl std::fmt::Display for ColorOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(v) = self.to_possible_value() {
            write!(f, "{}", v.get_name())?;
        }

        Ok(())
    }
}

impl From<ColorOption> for termcolor::ColorChoice {
    fn from(val: ColorOption) -> Self {
        match val {
            ColorOption::Never => termcolor::ColorChoice::Never,
            ColorOption::Auto => termcolor::ColorChoice::Auto,
            ColorOption::Always => termcolor::ColorChoice::Always,
            ColorOption::AlwaysAnsi => termcolor::ColorChoice::AlwaysAnsi,
        }
    }
}

/// Parses the command line arguments into a [`CliArgs`] and sets up the
/// leveled logger before handing back control.
pub fn parse_arguments() -> anyhow::Result<CliArgs> {
    let args = CliArgs::parse();

    crate::logging::setup_logger(&args)?;

    if args.log_link || args.log_unlink {
        let current = log::max_level();
        log::set_max_level(current.max(log::LevelFilter::Debug));
    }

    Ok(args)
}
