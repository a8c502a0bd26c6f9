//! Loads the requested volumes and writes them out as csv.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use nifti::NiftiObject;

use crate::emitter::{Companions, EmitSummary, FloatingPointPolicy, RowEmitter};
use crate::error::{Error, Result};
use crate::image::{read_object, MaskImage, VectorImage};
use crate::pixel::{Component, ComponentKind};

/// Everything needed for one conversion.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub input: PathBuf,
    pub mask: Option<PathBuf>,
    pub secondary: Option<PathBuf>,
    /// only used together with `secondary`
    pub tertiary: Option<PathBuf>,
    pub output: PathBuf,
    pub header: bool,
    pub floating_point: FloatingPointPolicy,
}

impl ExportOptions {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(input: P, output: Q) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            ..Default::default()
        }
    }
}

/// Converts `options.input` (plus mask and companions) to a csv file.
///
/// The numeric representation is decided by the datatype of the input volume
/// and used for every other volume as well.
pub fn export(options: &ExportOptions) -> Result<EmitSummary> {
    let input = read_object(&options.input)?;
    let datatype = input.header().data_type().map_err(|source| Error::Read {
        path: options.input.clone(),
        source,
    })?;
    let kind = ComponentKind::from_datatype(datatype)?;
    info!(
        "Input {} has datatype {:?}, writing components as {}",
        options.input.display(),
        datatype,
        kind
    );

    match kind {
        ComponentKind::Integer => {
            let primary = VectorImage::<i32>::from_object(&options.input, input)?;
            export_as(options, &primary)
        }
        ComponentKind::Float => {
            let primary = VectorImage::<f32>::from_object(&options.input, input)?;
            export_as(options, &primary)
        }
    }
}

fn export_as<T: Component>(
    options: &ExportOptions,
    primary: &VectorImage<T>,
) -> Result<EmitSummary> {
    info!(
        "Input dims: {:?}, components: {}",
        primary.dims(),
        primary.components()
    );

    let mask = options.mask.as_ref().map(MaskImage::<T>::read).transpose()?;
    let secondary = options
        .secondary
        .as_ref()
        .map(VectorImage::<T>::read)
        .transpose()?;
    let tertiary = match (&secondary, &options.tertiary) {
        (Some(_), Some(path)) => Some(VectorImage::<T>::read(path)?),
        (None, Some(path)) => {
            warn!(
                "Ignoring third input {} because no second input was given",
                path.display()
            );
            None
        }
        (_, None) => None,
    };

    let mut emitter = RowEmitter::new(primary).floating_point(options.floating_point);
    if let Some(mask) = &mask {
        emitter = emitter.mask(mask);
    }
    if let Some(secondary) = &secondary {
        let mut companions = Companions::new(secondary);
        if let Some(tertiary) = &tertiary {
            companions = companions.with_tertiary(tertiary);
        }
        emitter = emitter.companions(companions);
    }

    emitter.check()?;
    let mut out = create_output(&options.output)?;
    if options.header {
        emitter.write_header(&mut out)?;
    }
    let summary = emitter.emit(&mut out)?;
    out.flush()?;

    info!(
        "Wrote {} rows of {} columns to {}",
        summary.rows,
        summary.columns,
        options.output.display()
    );
    Ok(summary)
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|source| Error::CreateOutput {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}
