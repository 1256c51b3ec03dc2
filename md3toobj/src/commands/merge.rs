//! Merge mode: frame zero of several models in one OBJ file

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use q3_md3::{ConversionSession, ExportOptions, Md3Error};

pub fn execute(output: &Path, inputs: &[PathBuf], options: ExportOptions) -> Result<ExitCode> {
    let mut session = ConversionSession::new(options);
    let report = session.merge(inputs, output).map_err(|e| match e {
        Md3Error::NotEnoughModels { .. } => anyhow::Error::new(e)
            .context("At least two MD3 files must be loaded successfully for merge mode"),
        _ => anyhow::Error::new(e)
            .context(format!("Failed writing merged OBJ file {}", output.display())),
    })?;

    for (path, e) in &report.failed {
        eprintln!("Failed to load {}: {e}", path.display());
    }
    println!(
        "Merged {} models into {}",
        report.loaded.len(),
        report.output.display()
    );

    Ok(ExitCode::SUCCESS)
}
