//! Dump vector nifti volumes to csv, one row per voxel.
//!
//! Each row holds the voxel index followed by the components of the input
//! volume and, optionally, of a second and third co-registered volume. A mask
//! volume restricts the output to its non-zero voxels.

pub mod common;
pub mod emitter;
pub mod error;
pub mod export;
pub mod image;
pub mod pixel;

pub use emitter::{Companions, EmitSummary, FloatingPointPolicy, RowEmitter};
pub use error::{Error, Result};
pub use export::{export, ExportOptions};
pub use image::{MaskImage, VectorImage};
pub use pixel::{Component, ComponentKind};
