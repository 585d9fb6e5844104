//! Generator configuration, normally loaded from `glshim.toml`.
use serde::{Deserialize, Serialize};

/// The default name for the configuration file
pub const DEFAULT_CONFIG_FILE_NAME: &str = "glshim.toml";

/// Switches selecting which parts of the generated code are emitted.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Features {
    /// Emit call-site info parameters, wrapper macros and the debug check.
    pub instrumentation: bool,
    /// Emit index macros for a static extension list and look extensions up
    /// by index. Without it extensions are looked up by name.
    pub extension_table: bool,
    /// Decode `GL_INVALID_OPERATION` in addition to the base error codes.
    pub strict_error_taxonomy: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            instrumentation: true,
            extension_table: true,
            strict_error_taxonomy: true,
        }
    }
}

/// Names and includes used in the generated artifacts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct OutputParams {
    pub header_guard: String,
    pub namespace: String,
    /// Preprocessor symbol that switches instrumentation on in the host build.
    pub debug_define: String,
    /// Defined by the definitions artifact before including the header so the
    /// wrapper macros do not rename its own functions.
    pub no_defines: String,
    /// File name of the declarations artifact, as included by the definitions.
    pub header_name: String,
    pub header_extension: String,
    pub source_extension: String,
    /// Prefix of the driver's exported symbols.
    pub symbol_prefix: String,
    /// Prefix of the driver's extension strings.
    pub extension_prefix: String,
    /// Function resolving a driver symbol by name.
    pub loader: String,
    /// Function called when the driver cannot be initialized.
    pub fatal: String,
    pub header_includes: Vec<String>,
    pub source_includes: Vec<String>,
    pub local_includes: Vec<String>,
    pub string_type: String,
    pub format_fn: String,
    pub set_type: String,
    /// Leave out the generated-by line, for snapshot tests.
    pub no_version_header: bool,
}

impl Default for OutputParams {
    fn default() -> Self {
        Self {
            header_guard: "R_COMMON_HDR".into(),
            namespace: "gl".into(),
            debug_define: "DEBUG_GL".into(),
            no_defines: "R_COMMON_NO_DEFINES".into(),
            header_name: "r_common.h".into(),
            header_extension: "h".into(),
            source_extension: "cpp".into(),
            symbol_prefix: "gl".into(),
            extension_prefix: "GL_".into(),
            loader: "SDL_GL_GetProcAddress".into(),
            fatal: "neoFatal".into(),
            header_includes: vec!["SDL2/SDL_opengl.h".into(), "stdint.h".into()],
            source_includes: vec!["SDL2/SDL.h".into(), "stdarg.h".into(), "string.h".into()],
            local_includes: vec![
                "u_string.h".into(),
                "u_set.h".into(),
                "u_misc.h".into(),
                "engine.h".into(),
            ],
            string_type: "u::string".into(),
            format_fn: "u::format".into(),
            set_type: "u::set".into(),
            no_version_header: false,
        }
    }
}

/// The parameters that are used to configure the behaviour of glshim
/// from the configuration file `glshim.toml`
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub features: Features,
    pub output: OutputParams,
}

#[cfg(feature = "toml")]
mod has_toml {
    use crate::config::{Config, DEFAULT_CONFIG_FILE_NAME};
    use std::{
        env,
        fs::{self, OpenOptions},
        io::{self, Write},
        path::{Path, PathBuf},
    };

    impl Config {
        /// Write `config` to `file_path`, or `glshim.toml` in the current
        /// directory. Fails if the file already exists.
        pub fn store_config<P: AsRef<Path>>(
            config: &Config,
            file_path: Option<P>,
        ) -> Result<(), io::Error> {
            let file_path = file_path
                .map(|v| v.as_ref().to_path_buf())
                .unwrap_or(PathBuf::from(DEFAULT_CONFIG_FILE_NAME));

            // Fail if trying to overwrite an existing config file
            let mut file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(file_path)?;

            let config_output = toml::to_string_pretty(config).map_err(io::Error::other)?;

            file.write_all(config_output.as_bytes())?;

            Ok(())
        }

        /// Load `file_path`, or the nearest `glshim.toml` found by walking up
        /// from the current directory. Defaults when neither exists.
        pub fn load_config_with_default(file_path: Option<PathBuf>) -> Result<Config, io::Error> {
            match file_path.or_else(Config::find_configuration_file) {
                Some(file_path) => Config::load_config(file_path),
                None => Ok(Config::default()),
            }
        }

        pub fn load_config(file_path: impl Into<PathBuf>) -> Result<Config, io::Error> {
            let config_string = fs::read_to_string(file_path.into())?;
            toml::from_str(&config_string).map_err(io::Error::other)
        }

        /// Search each ancestor directory for configuration file
        pub fn find_configuration_file() -> Option<PathBuf> {
            let mut path = env::current_dir().ok()?;
            let file = Path::new(DEFAULT_CONFIG_FILE_NAME);

            loop {
                path.push(file);

                if path.is_file() {
                    break Some(path);
                } else if !(path.pop() && path.pop()) {
                    break None;
                }
            }
        }
    }

}
