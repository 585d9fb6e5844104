//! This is the command line tool for glshim. It compiles a list of driver
//! function signatures into a C++ header and source file that load and wrap
//! those functions.

mod args;
mod writer;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use flexi_logger::AdaptiveFormat;
use glshim_core::{
    config::Config,
    extension::ExtensionTable,
    parser::{self, ParsedData},
    ProcessInputError,
};
use log::{error, info};

use crate::{
    args::{Args, Command},
    writer::{artifact_path, write_generated},
};

fn main() -> anyhow::Result<()> {
    flexi_logger::Logger::try_with_env_or_str("info")?
        .adaptive_format_for_stderr(AdaptiveFormat::Opt)
        .adaptive_format_for_stdout(AdaptiveFormat::Opt)
        .start()?;

    let options = Args::parse();

    if let Some(options) = options.subcommand {
        match options {
            Command::Completions { shell } => {
                let mut cmd = Args::command();
                let bin_name = cmd.get_name().to_string();
                generate(shell, &mut cmd, bin_name, &mut io::stdout());
            }
        }

        return Ok(());
    }

    // Note that this can be `None`; the relevant functions handle this case
    // on their own.
    let config_file = options.config_file.as_deref();

    if options.output.generate_config {
        Config::store_config(&override_configuration(Config::default(), &options), config_file)
            .context("Unable to write configuration file")
            .inspect_err(|err| error!("glshim failed to create new config file: {err:#}"))
    } else {
        generate_bindings(config_file, &options).inspect_err(|err| {
            error!("glshim failed to generate bindings: {err:#}");
        })
    }
}

fn generate_bindings(config_file: Option<&Path>, options: &Args) -> anyhow::Result<()> {
    info!("glshim started generating bindings");

    let config = Config::load_config_with_default(config_file.map(Path::to_path_buf))
        .context("Unable to read configuration file")?;
    let mut config = override_configuration(config, options);

    let (Some(signatures), Some(stem)) = (&options.signatures, &options.output.stem) else {
        anyhow::bail!("both a signature file and an output path are required");
    };

    // The definitions include the header by the name it is written under.
    if let Some(name) = artifact_path(stem, &config.output.header_extension).file_name() {
        config.output.header_name = name.to_string_lossy().into_owned();
    }

    let functions = {
        let path = signatures.as_path();
        let input = read_input(path)?;
        parser::parse(&input).map_err(|source| ProcessInputError::ParseError {
            path: path.to_path_buf(),
            source,
        })?
    };

    let extensions = if config.features.extension_table {
        let path = options.extensions.as_deref();
        anyhow::ensure!(
            path.is_some(),
            "Please provide an extension list using --extensions <file> or set extension_table = false in glshim.toml"
        );
        path.map(read_input)
            .transpose()?
            .map(|input| ExtensionTable::parse(&input))
            .unwrap_or_default()
    } else {
        ExtensionTable::default()
    };

    let data = ParsedData::new(functions, extensions);
    let artifacts = glshim_core::generate(&config, &data).map_err(ProcessInputError::from)?;

    info!("glshim started writing generated bindings");

    write_generated(stem, &config.output, &artifacts)?;

    info!("glshim finished generating bindings");
    Ok(())
}

fn read_input(path: &Path) -> Result<String, ProcessInputError> {
    fs::read_to_string(path).map_err(|source| ProcessInputError::IoError {
        path: PathBuf::from(path),
        source,
    })
}

/// Overrides any configuration values with provided arguments
fn override_configuration(mut config: Config, options: &Args) -> Config {
    let overrides = options.features;

    if overrides.no_instrumentation {
        config.features.instrumentation = false;
    }

    if overrides.no_extension_table {
        config.features.extension_table = false;
    }

    if overrides.legacy_errors {
        config.features.strict_error_taxonomy = false;
    }

    config
}
