//! In-memory vector and mask volumes.
//!
//! Volumes are decoded whole with `nifti` and kept as ndarray arrays indexed
//! `[x, y, z, component]`. Iteration always follows [`scan_order`].

use std::path::Path;

use log::debug;
use ndarray::prelude::*;
use ndarray::{Array3, Array4, ArrayD, Ix4};
use nifti::{InMemNiftiObject, NiftiObject, ReaderOptions};

use crate::common::{scan_order, VoxelIndex};
use crate::error::{Error, Result};
use crate::pixel::Component;

/// Reads a nifti file fully into memory.
pub fn read_object(path: &Path) -> Result<InMemNiftiObject> {
    ReaderOptions::new()
        .read_file(path)
        .map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Decodes the voxels of `obj` as `T` and puts them in `[x, y, z, c]` layout.
fn decode_components<T: Component>(path: &Path, obj: InMemNiftiObject) -> Result<Array4<T>> {
    let volume = T::decode(obj.into_volume()).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let ndim = volume.ndim();
    vector_layout(volume).ok_or_else(|| Error::Dimensionality {
        path: path.to_path_buf(),
        ndim,
    })
}

/// Accepts a plain 3D volume (one component), `[x, y, z, c]`, or the nifti
/// vector layout `[x, y, z, 1, c]`.
fn vector_layout<T>(volume: ArrayD<T>) -> Option<Array4<T>> {
    let volume = match volume.ndim() {
        3 => volume.insert_axis(Axis(3)),
        4 => volume,
        5 if volume.shape()[3] == 1 => volume.index_axis_move(Axis(3), 0),
        _ => return None,
    };
    volume.into_dimensionality::<Ix4>().ok()
}

/// A 3D grid where every voxel holds the same number of components.
#[derive(Debug, Clone)]
pub struct VectorImage<T> {
    data: Array4<T>,
}

impl<T: Component> VectorImage<T> {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let obj = read_object(path)?;
        Self::from_object(path, obj)
    }

    pub fn from_object(path: &Path, obj: InMemNiftiObject) -> Result<Self> {
        let image = Self::from_array(decode_components(path, obj)?);
        debug!(
            "Loaded {} with dims {:?} and {} components",
            path.display(),
            image.dims(),
            image.components()
        );
        Ok(image)
    }

    pub fn from_array(data: Array4<T>) -> Self {
        Self { data }
    }

    /// Returns `None` when the volume is not laid out as a vector image.
    pub fn from_volume(volume: ArrayD<T>) -> Option<Self> {
        vector_layout(volume).map(Self::from_array)
    }

    pub fn dims(&self) -> [usize; 3] {
        let shape = self.data.shape();
        [shape[0], shape[1], shape[2]]
    }

    pub fn components(&self) -> usize {
        self.data.shape()[3]
    }

    pub fn voxel_count(&self) -> usize {
        self.dims().iter().product()
    }

    /// All voxels in scan order, with their component values.
    pub fn voxels(&self) -> impl Iterator<Item = (VoxelIndex, ArrayView1<'_, T>)> + '_ {
        scan_order(self.dims()).map(move |idx| (idx, self.data.slice(s![idx.x, idx.y, idx.z, ..])))
    }
}

/// Scalar volume selecting the voxels whose value is non-zero.
#[derive(Debug, Clone)]
pub struct MaskImage<T> {
    data: Array3<T>,
}

impl<T: Component> MaskImage<T> {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let obj = read_object(path)?;
        let data = decode_components::<T>(path, obj)?;
        if data.shape()[3] == 0 {
            return Err(Error::Dimensionality {
                path: path.to_path_buf(),
                ndim: 4,
            });
        }
        let mask = Self::from_array(data.index_axis_move(Axis(3), 0));
        debug!(
            "Loaded mask {} with dims {:?}, {} voxels selected",
            path.display(),
            mask.dims(),
            mask.selected_count()
        );
        Ok(mask)
    }

    pub fn from_array(data: Array3<T>) -> Self {
        Self { data }
    }

    /// Only the first component of a multi-component volume is used.
    pub fn from_volume(volume: ArrayD<T>) -> Option<Self> {
        let data = vector_layout(volume)?;
        if data.shape()[3] == 0 {
            return None;
        }
        Some(Self::from_array(data.index_axis_move(Axis(3), 0)))
    }

    pub fn dims(&self) -> [usize; 3] {
        let shape = self.data.shape();
        [shape[0], shape[1], shape[2]]
    }

    pub fn voxel_count(&self) -> usize {
        self.data.len()
    }

    /// Whether each voxel is selected, in scan order.
    pub fn selection(&self) -> impl Iterator<Item = bool> + '_ {
        scan_order(self.dims()).map(move |idx| !self.data[[idx.x, idx.y, idx.z]].is_zero())
    }

    pub fn selected_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_zero()).count()
    }
}
