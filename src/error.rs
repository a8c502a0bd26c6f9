use std::io;
use std::path::PathBuf;

use nifti::error::NiftiError;
use nifti::NiftiType;

use crate::common::VoxelIndex;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: NiftiError,
    },

    #[error("could not decode voxels of {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: NiftiError,
    },

    #[error("unknown input image pixel component type: {0:?}")]
    UnsupportedComponentType(NiftiType),

    #[error("{} has {ndim} dimensions, expected a 3D volume (optionally with components along dim 4 or 5)", .path.display())]
    Dimensionality { path: PathBuf, ndim: usize },

    #[error("{stream} image has {actual} voxels but the input volume has {expected}")]
    VoxelCountMismatch {
        stream: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("could not create output file {}: {source}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed writing csv: {0}")]
    Write(#[from] io::Error),

    #[error("non-finite component value {value} at voxel ({index})")]
    NonFiniteComponent { index: VoxelIndex, value: String },
}
