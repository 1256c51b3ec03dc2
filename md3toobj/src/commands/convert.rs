//! Single-file conversion: one OBJ file per animation frame

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use q3_md3::{ConversionSession, ExportOptions};

pub fn execute(input: &Path, output: Option<&Path>, options: ExportOptions) -> Result<ExitCode> {
    let mut session = ConversionSession::new(options);
    let report = session
        .convert_single(input, output)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    if let Some((_, model)) = session.models().first() {
        println!("Model: {}", report.model_name);
        println!(
            "Frames: {}, Surfaces: {}",
            model.num_frames(),
            model.surfaces.len()
        );
    }

    for path in &report.written {
        println!("Wrote {}", path.display());
    }

    if report.is_complete() {
        println!("Conversion completed successfully.");
        Ok(ExitCode::SUCCESS)
    } else {
        for (frame, e) in &report.failed {
            eprintln!("Failed writing frame {frame}: {e}");
        }
        Ok(ExitCode::FAILURE)
    }
}
