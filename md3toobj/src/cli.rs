//! Command line definition for md3toobj

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use q3_md3::ExportOptions;

/// Single-dash spellings accepted for compatibility with older tooling
const LEGACY_FLAGS: [(&str, &str); 5] = [
    ("-flipUVs", "--flip-uvs"),
    ("-noFlipUVs", "--no-flip-uvs"),
    ("-swapYZ", "--swap-yz"),
    ("-noSwapYZ", "--no-swap-yz"),
    ("-merge", "--merge"),
];

#[derive(Parser, Debug)]
#[command(name = "md3toobj")]
#[command(about = "Convert Quake III MD3 models to Wavefront OBJ", long_about = None)]
#[command(version)]
#[command(after_help = "\
Usage forms:
  md3toobj [options] input.md3 [output.obj | output_directory]
  md3toobj [options] --merge output.obj input1.md3 input2.md3 [...]
  md3toobj --info input.md3 [...]")]
pub struct Cli {
    /// Flip texture coordinates vertically (default)
    #[arg(long, overrides_with = "no_flip_uvs")]
    pub flip_uvs: bool,

    /// Keep texture coordinates as stored
    #[arg(long, overrides_with = "flip_uvs")]
    pub no_flip_uvs: bool,

    /// Swap the Y and Z axes (default)
    #[arg(long, overrides_with = "no_swap_yz")]
    pub swap_yz: bool,

    /// Keep the MD3 axes and reverse triangle winding instead
    #[arg(long, overrides_with = "swap_yz")]
    pub no_swap_yz: bool,

    /// Merge frame zero of several models into one OBJ file
    #[arg(long, conflicts_with = "info")]
    pub merge: bool,

    /// Print model information instead of converting
    #[arg(long)]
    pub info: bool,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Input file and optional output, or with --merge the output file
    /// followed by the inputs
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}

impl Cli {
    /// Export options selected by the flags
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            swap_yz: !self.no_swap_yz,
            flip_uvs: !self.no_flip_uvs,
        }
    }
}

/// Rewrite legacy single-dash flags to their long option spelling
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            LEGACY_FLAGS
                .iter()
                .find(|(legacy, _)| arg == *legacy)
                .map_or(arg, |(_, long)| OsString::from(long))
        })
        .collect()
}
