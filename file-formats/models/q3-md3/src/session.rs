//! Conversion sessions
//!
//! A [`ConversionSession`] owns every model it loads until it is dropped.
//! Single-file conversion writes one OBJ document per animation frame;
//! merging writes frame zero of several models into one document.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::{Md3Error, Result};
use crate::model::Md3Model;
use crate::obj;
use crate::transform::ExportOptions;
use crate::validation;

/// Fewest models a merged document is made from
pub const MIN_MERGE_MODELS: usize = 2;

/// Outcome of converting one input file
#[derive(Debug)]
pub struct SingleReport {
    /// Display name of the converted model
    pub model_name: String,
    /// Documents written, in frame order
    pub written: Vec<PathBuf>,
    /// Frames whose document could not be written
    pub failed: Vec<(usize, Md3Error)>,
}

impl SingleReport {
    /// True when every frame was written
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of merging several input files
#[derive(Debug)]
pub struct MergeReport {
    /// The merged document
    pub output: PathBuf,
    /// Inputs that were merged, in load order
    pub loaded: Vec<PathBuf>,
    /// Inputs that failed to load and were left out
    pub failed: Vec<(PathBuf, Md3Error)>,
}

/// File name of the document holding `frame` of a model with `num_frames`
/// frames: `<base>+<frame>.obj` for animated models, `<base>.obj` otherwise
pub fn frame_output_name(base: &str, frame: usize, num_frames: usize) -> String {
    if num_frames > 1 {
        format!("{base}+{frame}.obj")
    } else {
        format!("{base}.obj")
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Directory and base name for the documents converted from `input`
///
/// An `output` naming an existing directory receives documents named after
/// the input. Any other `output` gives its parent directory and stem. With
/// no `output` the input's stem is used in the current directory.
pub fn output_base(input: &Path, output: Option<&Path>) -> (PathBuf, String) {
    match output {
        Some(dir) if dir.is_dir() => (dir.to_path_buf(), file_stem(input)),
        Some(path) => (
            path.parent().map(Path::to_path_buf).unwrap_or_default(),
            file_stem(path),
        ),
        None => (PathBuf::new(), file_stem(input)),
    }
}

/// Holds export options and loaded models for one run
#[derive(Debug, Default)]
pub struct ConversionSession {
    options: ExportOptions,
    models: Vec<(PathBuf, Md3Model)>,
}

impl ConversionSession {
    /// Start a session with the given export options
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            models: Vec::new(),
        }
    }

    /// Export options of this session
    pub fn options(&self) -> ExportOptions {
        self.options
    }

    /// Models loaded so far, with the paths they were read from
    pub fn models(&self) -> &[(PathBuf, Md3Model)] {
        &self.models
    }

    /// Load a model and keep it for the rest of the session
    pub fn load(&mut self, path: &Path) -> Result<&Md3Model> {
        let model = Md3Model::load(path)?;
        for issue in validation::validate(&model) {
            warn!("{}: {}", path.display(), issue);
        }
        info!(
            "Loaded '{}' from {}: {} frames, {} surfaces",
            model.name(),
            path.display(),
            model.num_frames(),
            model.surfaces.len()
        );

        self.models.push((path.to_path_buf(), model));
        let (_, model) = &self.models[self.models.len() - 1];
        Ok(model)
    }

    /// Convert every frame of `input` into its own OBJ document
    ///
    /// A load failure is returned as an error. A failed frame document is
    /// recorded in the report and the remaining frames are still written.
    pub fn convert_single(&mut self, input: &Path, output: Option<&Path>) -> Result<SingleReport> {
        let options = self.options;
        let model = self.load(input)?;
        let (dir, base) = output_base(input, output);
        let num_frames = model.num_frames();

        let mut report = SingleReport {
            model_name: model.name().to_string(),
            written: Vec::with_capacity(num_frames),
            failed: Vec::new(),
        };

        for frame in 0..num_frames {
            let path = dir.join(frame_output_name(&base, frame, num_frames));
            info!("Writing frame {} to {}", frame, path.display());
            match write_document(&path, |out| obj::write_frame(out, model, frame, options)) {
                Ok(()) => report.written.push(path),
                Err(e) => {
                    warn!("Failed writing frame {frame}: {e}");
                    report.failed.push((frame, e));
                }
            }
        }

        Ok(report)
    }

    /// Merge frame zero of every loadable input into the document `output`
    ///
    /// Inputs that fail to load are left out and listed in the report. With
    /// fewer than two loaded models nothing is written.
    pub fn merge<P: AsRef<Path>>(&mut self, inputs: &[P], output: &Path) -> Result<MergeReport> {
        let first = self.models.len();
        let mut failed = Vec::new();

        for input in inputs {
            let input = input.as_ref();
            if let Err(e) = self.load(input) {
                warn!("Failed to load {}: {}", input.display(), e);
                failed.push((input.to_path_buf(), e));
            }
        }

        let merged = &self.models[first..];
        if merged.len() < MIN_MERGE_MODELS {
            return Err(Md3Error::NotEnoughModels {
                loaded: merged.len(),
                required: MIN_MERGE_MODELS,
            });
        }

        let models: Vec<&Md3Model> = merged.iter().map(|(_, model)| model).collect();
        let options = self.options;
        debug!("Merging {} models into {}", models.len(), output.display());
        write_document(output, |out| obj::write_merged(out, &models, options))?;

        Ok(MergeReport {
            output: output.to_path_buf(),
            loaded: merged.iter().map(|(path, _)| path.clone()).collect(),
            failed,
        })
    }
}

fn write_document<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    let result = write(&mut out);
    if result.is_err() {
        drop(out);
        if let Err(e) = fs::remove_file(path) {
            debug!("Could not remove partial document {}: {}", path.display(), e);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::fixture;
    use tempfile::TempDir;
    use test_case::test_case;

    fn write_model(dir: &TempDir, file: &str, spec: &fixture::ModelSpec) -> PathBuf {
        let path = dir.path().join(file);
        fs::write(&path, spec.to_bytes()).unwrap();
        path
    }

    #[test_case("head", 0, 1 => "head.obj" ; "single frame")]
    #[test_case("head", 0, 2 => "head+0.obj" ; "first of two")]
    #[test_case("head", 11, 12 => "head+11.obj" ; "last of twelve")]
    fn test_frame_output_name(base: &str, frame: usize, frames: usize) -> String {
        frame_output_name(base, frame, frames)
    }

    #[test]
    fn test_output_base() {
        let dir = TempDir::new().unwrap();
        let input = Path::new("models/players/sarge/head.md3");

        assert_eq!(
            output_base(input, Some(dir.path())),
            (dir.path().to_path_buf(), "head".to_string())
        );
        assert_eq!(
            output_base(input, Some(Path::new("out/sarge.obj"))),
            (PathBuf::from("out"), "sarge".to_string())
        );
        assert_eq!(
            output_base(input, None),
            (PathBuf::new(), "head".to_string())
        );
    }

    #[test]
    fn test_convert_animated_model() {
        let dir = TempDir::new().unwrap();
        let input = write_model(&dir, "head.md3", &fixture::animated_model());

        let mut session = ConversionSession::new(ExportOptions::default());
        let report = session.convert_single(&input, Some(dir.path())).unwrap();

        assert!(report.is_complete());
        assert_eq!(
            report.written,
            vec![dir.path().join("head+0.obj"), dir.path().join("head+1.obj")]
        );
        let text = fs::read_to_string(&report.written[1]).unwrap();
        assert!(text.starts_with("o models/players/test/head.md3\n"));
        assert_eq!(session.models().len(), 1);
    }

    #[test]
    fn test_frame_failure_does_not_stop_conversion() {
        let dir = TempDir::new().unwrap();
        let mut spec = fixture::triangle_model("short");
        spec.num_frames = 2;
        let input = write_model(&dir, "short.md3", &spec);

        let mut session = ConversionSession::new(ExportOptions::default());
        let report = session.convert_single(&input, Some(dir.path())).unwrap();

        assert_eq!(report.written, vec![dir.path().join("short+0.obj")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, 1);
        assert_eq!(report.failed[0].1.kind(), ErrorKind::Format);
        assert!(!dir.path().join("short+1.obj").exists());
    }

    #[test]
    fn test_merge_skips_failed_inputs() {
        let dir = TempDir::new().unwrap();
        let a = write_model(&dir, "a.md3", &fixture::triangle_model("a"));
        let b = write_model(&dir, "b.md3", &fixture::animated_model());
        let missing = dir.path().join("missing.md3");
        let output = dir.path().join("merged.obj");

        let mut session = ConversionSession::new(ExportOptions::default());
        let report = session
            .merge(&[a.clone(), missing.clone(), b.clone()], &output)
            .unwrap();

        assert_eq!(report.loaded, vec![a, b]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, missing);
        assert_eq!(report.failed[0].1.kind(), ErrorKind::Io);

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("o MergedMD3\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 10);
    }

    #[test]
    fn test_merge_needs_two_models() {
        let dir = TempDir::new().unwrap();
        let a = write_model(&dir, "a.md3", &fixture::triangle_model("a"));
        let bad = dir.path().join("bad.md3");
        fs::write(&bad, b"IDP2").unwrap();
        let output = dir.path().join("merged.obj");

        let mut session = ConversionSession::new(ExportOptions::default());
        let err = session.merge(&[a, bad], &output).unwrap_err();

        assert!(matches!(
            err,
            Md3Error::NotEnoughModels {
                loaded: 1,
                required: 2
            }
        ));
        assert!(!output.exists());
    }
}
