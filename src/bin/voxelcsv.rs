//! Quick commandline utility to dump a vector nifti volume to a csv file.
//!
//! Every voxel becomes one row: its X, Y and Z index followed by its
//! components. A mask limits the rows to the voxels where it is non-zero, and
//! up to two more volumes can be appended column-wise.

use clap::Parser;
use env_logger::{Builder, Env};
use std::path::PathBuf;

use voxelcsv::{export, ExportOptions, FloatingPointPolicy};

// use clap to create commandline interface
#[derive(Parser, Debug)]
#[command(author, about, version, long_about)]
struct Args {
    /// the input vector nifti file
    #[arg(short, long)]
    input: String,

    /// a mask nifti file, only voxels where it is non-zero are written
    #[arg(short, long, default_value = "")]
    mask: String,

    /// a second vector nifti file whose components are appended to each row
    #[arg(short, long, default_value = "")]
    second_input: String,

    /// a third vector nifti file, appended after the second.
    /// Ignored unless --second-input is given.
    #[arg(short, long, default_value = "")]
    third_input: String,

    /// the csv file to write
    #[arg(short, long)]
    output: String,

    /// write the predefined label row before the data
    #[arg(long, default_value_t = false)]
    header: bool,

    /// stop with an error on NaN or infinite component values
    #[arg(long, default_value_t = false)]
    fp_abort: bool,
}

/// Empty strings mean the optional file was not given.
fn optional_path(value: String) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

impl From<Args> for ExportOptions {
    fn from(args: Args) -> Self {
        let floating_point = if args.fp_abort {
            FloatingPointPolicy::Abort
        } else {
            FloatingPointPolicy::Ignore
        };
        ExportOptions {
            input: PathBuf::from(args.input),
            mask: optional_path(args.mask),
            secondary: optional_path(args.second_input),
            tertiary: optional_path(args.third_input),
            output: PathBuf::from(args.output),
            header: args.header,
            floating_point,
        }
    }
}

// main function parses commandline arguments and runs the program
fn main() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Args::parse();
    let options = ExportOptions::from(cli);

    if let Err(e) = export(&options) {
        eprintln!("Error! {}", e);
        std::process::exit(-2);
    }
}
