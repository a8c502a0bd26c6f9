//! Numeric representation of voxel components.
//!
//! The representation is picked once from the datatype of the input volume and
//! every other volume (mask, second and third inputs) is decoded into it.
//! Integral datatypes are widened to `i32`, `Float32` stays `f32`.

use std::fmt;

use ndarray::ArrayD;
use nifti::error::NiftiError;
use nifti::{InMemNiftiVolume, IntoNdArray, NiftiType};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// byte, unsigned short, short and int volumes
    Integer,
    Float,
}

impl ComponentKind {
    pub fn from_datatype(datatype: NiftiType) -> Result<Self> {
        match datatype {
            NiftiType::Uint8 | NiftiType::Uint16 | NiftiType::Int16 | NiftiType::Int32 => {
                Ok(ComponentKind::Integer)
            }
            NiftiType::Float32 => Ok(ComponentKind::Float),
            other => Err(Error::UnsupportedComponentType(other)),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Integer => write!(f, "i32"),
            ComponentKind::Float => write!(f, "f32"),
        }
    }
}

/// A value stored in one component of a voxel.
pub trait Component: Copy + PartialEq + fmt::Display + fmt::Debug {
    const KIND: ComponentKind;

    fn decode(volume: InMemNiftiVolume) -> std::result::Result<ArrayD<Self>, NiftiError>;

    fn is_zero(&self) -> bool;

    fn is_finite(&self) -> bool;
}

impl Component for i32 {
    const KIND: ComponentKind = ComponentKind::Integer;

    fn decode(volume: InMemNiftiVolume) -> std::result::Result<ArrayD<Self>, NiftiError> {
        volume.into_ndarray::<i32>()
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }

    fn is_finite(&self) -> bool {
        true
    }
}

impl Component for f32 {
    const KIND: ComponentKind = ComponentKind::Float;

    fn decode(volume: InMemNiftiVolume) -> std::result::Result<ArrayD<Self>, NiftiError> {
        volume.into_ndarray::<f32>()
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }

    fn is_finite(&self) -> bool {
        f32::is_finite(*self)
    }
}
