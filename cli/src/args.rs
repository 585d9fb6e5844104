//! Command line argument parsing.
use std::path::PathBuf;

#[derive(clap::Parser)]
#[command(
    version,
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true,
    name = "glshim"
)]
pub struct Args {
    #[command(subcommand)]
    pub subcommand: Option<Command>,

    /// Signature file, one `type: name(type: arg, ...);` per line
    #[arg(short = 'g', long, required_unless_present = "generate_config")]
    pub signatures: Option<PathBuf>,

    /// Extension list, one name per line without the driver prefix
    #[arg(short, long)]
    pub extensions: Option<PathBuf>,

    /// Configuration file for glshim
    #[arg(short, long)]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub features: FeatureOverrides,

    #[command(flatten)]
    pub output: Output,
}

#[derive(Debug, Clone, Copy, clap::Subcommand)]
pub enum Command {
    /// Generate shell completions
    Completions {
        /// The shell to generate the completions for
        shell: clap_complete::Shell,
    },
}

/// Switches that turn configured features off for this run.
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct FeatureOverrides {
    /// Emit plain wrappers without call-site info or error checks
    #[arg(long)]
    pub no_instrumentation: bool,

    /// Look extensions up by name instead of by index into a static list
    #[arg(long)]
    pub no_extension_table: bool,

    /// Do not decode GL_INVALID_OPERATION in the error check
    #[arg(long)]
    pub legacy_errors: bool,
}

#[derive(clap::Args, Debug)]
#[group(multiple = false, required = true)]
pub struct Output {
    /// Path of the generated files without extension. `<stem>.h` and
    /// `<stem>.cpp` are written; mtime is preserved if their contents don't
    /// change
    #[arg(short = 'o', long = "output")]
    pub stem: Option<PathBuf>,

    // If given, we're going to output a new template configuration file
    // instead of generating bindings, so we make it mutually exclusive with
    // running normally
    /// Generates a configuration file based on the other options specified.
    /// The file will be written to glshim.toml by default or to the file
    /// path specified by the --config-file option.
    #[arg(long)]
    pub generate_config: bool,
}
