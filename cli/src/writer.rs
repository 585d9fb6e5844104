//! Generated artifact output.
use anyhow::Context;
use glshim_core::{config::OutputParams, Artifacts};
use log::{error, info};
use std::{
    ffi::OsString,
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// `<stem>.<extension>`, keeping any dots already in the stem.
pub fn artifact_path(stem: &Path, extension: &str) -> PathBuf {
    let mut path = OsString::from(stem.as_os_str());
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

/// Write both artifacts next to `stem`.
///
/// Both are staged in temporary files in the destination directory before
/// either one is moved into place.
pub fn write_generated(
    stem: &Path,
    params: &OutputParams,
    artifacts: &Artifacts,
) -> anyhow::Result<()> {
    let outputs = [
        (
            artifact_path(stem, &params.header_extension),
            &artifacts.declarations,
        ),
        (
            artifact_path(stem, &params.source_extension),
            &artifacts.definitions,
        ),
    ];

    let mut staged = Vec::with_capacity(outputs.len());
    for (outfile, contents) in &outputs {
        if let Some(file) = stage_file(outfile, contents)? {
            staged.push((outfile, file));
        }
    }

    let mut replaced: Vec<&PathBuf> = Vec::with_capacity(staged.len());
    for (outfile, file) in staged {
        if let Err(err) = file.persist(outfile) {
            let replaced = replaced
                .iter()
                .map(|done| done.to_string_lossy().into_owned())
                .collect::<Vec<_>>();
            if !replaced.is_empty() {
                error!(
                    "{} already replaced; it no longer matches {}",
                    replaced.join(", "),
                    outfile.to_string_lossy()
                );
            }
            return Err(err.error).with_context(|| {
                format!(
                    "failed to write output: {} (already replaced: [{}])",
                    outfile.to_string_lossy(),
                    replaced.join(", ")
                )
            });
        }
        info!("Wrote {}", outfile.to_string_lossy());
        replaced.push(outfile);
    }

    Ok(())
}

/// Stage `output` for `outfile` if the contents have changed.
fn stage_file(outfile: &Path, output: &[u8]) -> anyhow::Result<Option<NamedTempFile>> {
    match fs::read(outfile) {
        Ok(buf) if buf == output => {
            // avoid writing the file to leave the mtime intact
            // for tools which might use it to know when to
            // rebuild.
            info!("Skipping writing to {outfile:?} no changes");
            return Ok(None);
        }
        _ => {}
    }

    let out_dir = match outfile.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    // If the output directory doesn't already exist, create it.
    if !out_dir.exists() {
        fs::create_dir_all(out_dir).context("failed to create output directory")?;
    }

    let mut file = NamedTempFile::new_in(out_dir)
        .with_context(|| format!("failed to create temporary file in {out_dir:?}"))?;
    file.write_all(output)
        .with_context(|| format!("failed to stage output: {}", outfile.to_string_lossy()))?;

    Ok(Some(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{thread, time::Duration};

    fn artifacts(header: &str, source: &str) -> Artifacts {
        Artifacts {
            declarations: header.as_bytes().to_vec(),
            definitions: source.as_bytes().to_vec(),
        }
    }

    #[test]
    fn stem_keeps_its_dots() {
        assert_eq!(
            artifact_path(Path::new("out/r_common.v2"), "h"),
            PathBuf::from("out/r_common.v2.h")
        );
    }

    #[test]
    fn writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("nested/r_common");

        write_generated(&stem, &OutputParams::default(), &artifacts("header", "source")).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("nested/r_common.h")).unwrap(), "header");
        assert_eq!(fs::read_to_string(dir.path().join("nested/r_common.cpp")).unwrap(), "source");
        // No temporary files are left behind.
        assert_eq!(fs::read_dir(dir.path().join("nested")).unwrap().count(), 2);
    }

    #[test]
    fn unchanged_files_keep_their_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("r_common");
        let params = OutputParams::default();

        write_generated(&stem, &params, &artifacts("header", "source")).unwrap();
        let header = dir.path().join("r_common.h");
        let source = dir.path().join("r_common.cpp");
        let header_mtime = fs::metadata(&header).unwrap().modified().unwrap();

        thread::sleep(Duration::from_millis(20));
        write_generated(&stem, &params, &artifacts("header", "changed")).unwrap();

        assert_eq!(fs::metadata(&header).unwrap().modified().unwrap(), header_mtime);
        assert_eq!(fs::read_to_string(source).unwrap(), "changed");
    }

    #[test]
    fn failed_source_keeps_new_header() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("r_common");
        // A directory in the way of the source makes its rename fail.
        fs::create_dir(dir.path().join("r_common.cpp")).unwrap();

        let err = write_generated(&stem, &OutputParams::default(), &artifacts("header", "source"))
            .unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("failed to write output"), "{message}");
        assert!(message.contains("r_common.h"), "{message}");
        assert_eq!(fs::read_to_string(dir.path().join("r_common.h")).unwrap(), "header");
        assert!(dir.path().join("r_common.cpp").is_dir());
    }

    #[test]
    fn configured_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("bindings");
        let params = OutputParams {
            header_extension: "hpp".into(),
            source_extension: "cc".into(),
            ..Default::default()
        };

        write_generated(&stem, &params, &artifacts("h", "c")).unwrap();

        assert!(dir.path().join("bindings.hpp").is_file());
        assert!(dir.path().join("bindings.cc").is_file());
    }
}
