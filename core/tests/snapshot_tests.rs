use anyhow::Context;
use glshim_core::{config::Config, extension::ExtensionTable, parser, parser::ParsedData};
use once_cell::sync::Lazy;
use std::{
    fs,
    path::{Path, PathBuf},
};

static TESTS_FOLDER_PATH: Lazy<PathBuf> =
    Lazy::new(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/tests"));

/// Reads the contents of the file at `path` into a string and returns it
fn load_file(path: impl AsRef<Path>) -> Result<String, anyhow::Error> {
    let path = path.as_ref();
    fs::read_to_string(path)
        .with_context(|| format!("failed to read file at path {}", path.to_string_lossy()))
}

/// Performs a snapshot test for the given parameters
///
/// Reads `input.gl` and, when the extension table is enabled,
/// `extensions.txt` from the `test_name` folder and compares the generated
/// artifacts against `output.h` and `output.cpp` in the same folder.
fn check(test_name: &str, mut config: Config) -> Result<(), anyhow::Error> {
    let folder = TESTS_FOLDER_PATH.join(test_name);
    config.output.no_version_header = true;

    let functions = parser::parse(&load_file(folder.join("input.gl"))?)?;
    let extensions = if config.features.extension_table {
        ExtensionTable::parse(&load_file(folder.join("extensions.txt"))?)
    } else {
        ExtensionTable::default()
    };

    let artifacts = glshim_core::generate(&config, &ParsedData::new(functions, extensions))?;

    let header = String::from_utf8(artifacts.declarations)?;
    expect_test::expect_file![folder.join("output.h")].assert_eq(&header);

    let source = String::from_utf8(artifacts.definitions)?;
    expect_test::expect_file![folder.join("output.cpp")].assert_eq(&source);

    Ok(())
}

#[test]
fn instrumented_with_extensions() -> Result<(), anyhow::Error> {
    check("instrumented_with_extensions", Config::default())
}

#[test]
fn plain_name_lookup() -> Result<(), anyhow::Error> {
    let mut config = Config::default();
    config.features.instrumentation = false;
    config.features.extension_table = false;
    check("plain_name_lookup", config)
}
