//! Writes one csv row per selected voxel.
//!
//! Every open image is walked in lock-step following the scan order of the
//! input volume. A row is `X,Y,Z` followed by the components of the input
//! volume, then those of the second and third inputs when present.

use std::io::Write;

use log::debug;
use ndarray::ArrayView1;

use crate::common::{Direction, VoxelIndex};
use crate::error::{Error, Result};
use crate::image::{MaskImage, VectorImage};
use crate::pixel::Component;

/// Feature names written after the coordinate labels when a header is
/// requested. They do not describe the emitted components.
///
/// The list and its trailing comma are kept exactly as the established csv
/// format has them: with the three coordinate labels the header carries 26
/// labels, even where 25 are documented.
pub const FEATURE_LABELS: [&str; 23] = [
    "Energy",
    "Entropy",
    "Correlation",
    "InverseDifferenceMoment",
    "Inertia",
    "ClusterShade",
    "ClusterProminence",
    "HarralickCorrelation",
    "ShortRunEmphasis",
    "LongRunEmpasis",
    "GreyLevelNonUniformity",
    "RunLengthNonUniformity",
    "LowGreyLevelRunEmphasis",
    "HighGreyLevelRunEmphasis",
    "ShortRunLowGreyLevelEmphasis",
    "ShortRunHighGreyLevelEmphasis",
    "LongRunLowGreyLevelEmphasis",
    "LongRunHighGreyLevelEmphasis",
    "BVTV",
    "TbN",
    "TbTh",
    "TbSp",
    "BSBV",
];

/// What to do when a float component is NaN or infinite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FloatingPointPolicy {
    /// write the value as formatted
    #[default]
    Ignore,
    /// stop before writing the offending row
    Abort,
}

/// Images appended after the input volume. A third image can only ride along
/// with a second one.
#[derive(Debug, Clone, Copy)]
pub struct Companions<'a, T> {
    pub secondary: &'a VectorImage<T>,
    pub tertiary: Option<&'a VectorImage<T>>,
}

impl<'a, T> Companions<'a, T> {
    pub fn new(secondary: &'a VectorImage<T>) -> Self {
        Self {
            secondary,
            tertiary: None,
        }
    }

    pub fn with_tertiary(mut self, tertiary: &'a VectorImage<T>) -> Self {
        self.tertiary = Some(tertiary);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitSummary {
    pub rows: usize,
    /// columns per data row, coordinates included
    pub columns: usize,
}

#[derive(Debug)]
pub struct RowEmitter<'a, T> {
    primary: &'a VectorImage<T>,
    mask: Option<&'a MaskImage<T>>,
    companions: Option<Companions<'a, T>>,
    floating_point: FloatingPointPolicy,
}

impl<'a, T: Component> RowEmitter<'a, T> {
    pub fn new(primary: &'a VectorImage<T>) -> Self {
        Self {
            primary,
            mask: None,
            companions: None,
            floating_point: FloatingPointPolicy::default(),
        }
    }

    pub fn mask(mut self, mask: &'a MaskImage<T>) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn companions(mut self, companions: Companions<'a, T>) -> Self {
        self.companions = Some(companions);
        self
    }

    pub fn floating_point(mut self, policy: FloatingPointPolicy) -> Self {
        self.floating_point = policy;
        self
    }

    /// Number of columns in each data row.
    pub fn columns(&self) -> usize {
        let companions = self.companions.map_or(0, |c| {
            c.secondary.components() + c.tertiary.map_or(0, VectorImage::components)
        });
        Direction::ALL.len() + self.primary.components() + companions
    }

    /// Writes the fixed label row.
    pub fn write_header<W: Write>(&self, out: &mut W) -> Result<()> {
        for axis in Direction::ALL {
            write!(out, "{},", axis.label())?;
        }
        for label in FEATURE_LABELS {
            write!(out, "{},", label)?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// Writes one row per selected voxel.
    pub fn emit<W: Write>(&self, out: &mut W) -> Result<EmitSummary> {
        self.check()?;

        let mut mask = self.mask.map(MaskImage::selection);
        let mut secondary = self.companions.map(|c| c.secondary.voxels());
        let mut tertiary = self
            .companions
            .and_then(|c| c.tertiary)
            .map(VectorImage::voxels);

        let mut rows = 0;
        for (index, values) in self.primary.voxels() {
            // every stream steps even when the voxel is masked out
            let selected = mask.as_mut().and_then(Iterator::next).unwrap_or(true);
            let second = secondary.as_mut().and_then(Iterator::next).map(|(_, v)| v);
            let third = tertiary.as_mut().and_then(Iterator::next).map(|(_, v)| v);
            if !selected {
                continue;
            }

            let parts = [Some(values), second, third];
            if self.floating_point == FloatingPointPolicy::Abort {
                check_finite(index, &parts)?;
            }
            write_row(out, index, &parts)?;
            rows += 1;
        }

        debug!("Wrote {} rows of {} columns", rows, self.columns());
        Ok(EmitSummary {
            rows,
            columns: self.columns(),
        })
    }

    /// Fails when the mask or a companion does not have the input's voxel
    /// count. Shapes are not compared.
    pub fn check(&self) -> Result<()> {
        let expected = self.primary.voxel_count();
        let mut streams = Vec::new();
        if let Some(mask) = self.mask {
            streams.push(("mask", mask.voxel_count()));
        }
        if let Some(c) = self.companions {
            streams.push(("second input", c.secondary.voxel_count()));
            if let Some(tertiary) = c.tertiary {
                streams.push(("third input", tertiary.voxel_count()));
            }
        }
        match streams.into_iter().find(|(_, actual)| *actual != expected) {
            Some((stream, actual)) => Err(Error::VoxelCountMismatch {
                stream,
                expected,
                actual,
            }),
            None => Ok(()),
        }
    }
}

fn check_finite<T: Component>(
    index: VoxelIndex,
    parts: &[Option<ArrayView1<'_, T>>],
) -> Result<()> {
    let bad = parts
        .iter()
        .flatten()
        .flat_map(|values| values.iter())
        .find(|v| !v.is_finite());
    match bad {
        Some(value) => Err(Error::NonFiniteComponent {
            index,
            value: value.to_string(),
        }),
        None => Ok(()),
    }
}

fn write_row<W: Write, T: Component>(
    out: &mut W,
    index: VoxelIndex,
    parts: &[Option<ArrayView1<'_, T>>],
) -> Result<()> {
    for (n, axis) in Direction::ALL.into_iter().enumerate() {
        if n > 0 {
            write!(out, ",")?;
        }
        write!(out, "{}", index.get(axis))?;
    }
    for values in parts.iter().flatten() {
        for v in values.iter() {
            write!(out, ",{}", v)?;
        }
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, Array4};

    fn ramp(dims: (usize, usize, usize, usize), offset: i32) -> VectorImage<i32> {
        let mut n = offset;
        VectorImage::from_array(Array4::from_shape_fn(dims, |_| {
            n += 1;
            n
        }))
    }

    fn render<T: Component>(emitter: &RowEmitter<'_, T>) -> (EmitSummary, String) {
        let mut out = Vec::new();
        let summary = emitter.emit(&mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn primary_only() {
        let mut data = Array4::<i32>::zeros((2, 2, 1, 2));
        data[[0, 0, 0, 0]] = 1;
        data[[0, 0, 0, 1]] = 2;
        data[[1, 0, 0, 0]] = 3;
        data[[1, 0, 0, 1]] = 4;
        data[[0, 1, 0, 0]] = 5;
        data[[0, 1, 0, 1]] = 6;
        data[[1, 1, 0, 0]] = 7;
        data[[1, 1, 0, 1]] = 8;
        let image = VectorImage::from_array(data);
        let (summary, text) = render(&RowEmitter::new(&image));
        assert_eq!(text, "0,0,0,1,2\n1,0,0,3,4\n0,1,0,5,6\n1,1,0,7,8\n");
        assert_eq!(summary, EmitSummary { rows: 4, columns: 5 });
    }

    #[test]
    fn mask_filters_rows() {
        let image = ramp((2, 2, 1, 1), 0);
        let mut m = Array3::<i32>::zeros((2, 2, 1));
        m[[1, 1, 0]] = 9;
        let mask = MaskImage::from_array(m);
        let (summary, text) = render(&RowEmitter::new(&image).mask(&mask));
        // from_shape_fn fills in row-major order, so [1, 1, 0, 0] is the 4th value
        assert_eq!(text, "1,1,0,4\n");
        assert_eq!(summary.rows, 1);
    }

    #[test]
    fn masked_out_voxels_still_advance_companions() {
        let image = ramp((3, 1, 1, 1), 0);
        let second = ramp((3, 1, 1, 2), 100);
        let mut m = Array3::<i32>::zeros((3, 1, 1));
        m[[0, 0, 0]] = 1;
        m[[2, 0, 0]] = 1;
        let mask = MaskImage::from_array(m);
        let emitter = RowEmitter::new(&image)
            .mask(&mask)
            .companions(Companions::new(&second));
        let (_, text) = render(&emitter);
        assert_eq!(text, "0,0,0,1,101,102\n2,0,0,3,105,106\n");
    }

    #[test]
    fn companions_append_in_order() {
        let image = ramp((2, 1, 1, 1), 0);
        let second = ramp((2, 1, 1, 2), 10);
        let third = ramp((2, 1, 1, 3), 20);
        let emitter = RowEmitter::new(&image)
            .companions(Companions::new(&second).with_tertiary(&third));
        assert_eq!(emitter.columns(), 9);
        let (summary, text) = render(&emitter);
        assert_eq!(
            text,
            "0,0,0,1,11,12,21,22,23\n1,0,0,2,13,14,24,25,26\n"
        );
        assert_eq!(summary.columns, 9);
        for line in text.lines() {
            assert_eq!(line.split(',').count(), summary.columns);
        }
    }

    #[test]
    fn voxel_count_mismatch_is_an_error() {
        let image = ramp((2, 2, 1, 1), 0);
        let second = ramp((3, 1, 1, 1), 0);
        let emitter = RowEmitter::new(&image).companions(Companions::new(&second));
        let mut out = Vec::new();
        let err = emitter.emit(&mut out).unwrap_err();
        assert!(matches!(
            err,
            Error::VoxelCountMismatch {
                stream: "second input",
                expected: 4,
                actual: 3
            }
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn check_runs_without_writing() {
        let image = ramp((2, 2, 1, 1), 0);
        let mask = MaskImage::from_array(Array3::<i32>::ones((2, 2, 1)));
        let other_mask = MaskImage::from_array(Array3::<i32>::ones((3, 3, 1)));
        assert!(RowEmitter::new(&image).mask(&mask).check().is_ok());
        let err = RowEmitter::new(&image).mask(&other_mask).check().unwrap_err();
        assert!(matches!(
            err,
            Error::VoxelCountMismatch {
                stream: "mask",
                expected: 4,
                actual: 9
            }
        ));
    }

    #[test]
    fn coordinates_are_written_per_axis() {
        let image = ramp((1, 1, 12, 1), 0);
        let (_, text) = render(&RowEmitter::new(&image));
        assert_eq!(text.lines().last(), Some("0,0,11,12"));
    }

    #[test]
    fn header_row() {
        let image = ramp((1, 1, 1, 1), 0);
        let mut out = Vec::new();
        RowEmitter::new(&image).write_header(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("X,Y,Z,Energy,Entropy,"));
        assert!(text.ends_with("TbSp,BSBV,\n"));
        let labels: Vec<_> = text.trim_end().split(',').filter(|l| !l.is_empty()).collect();
        assert_eq!(labels.len(), 26);
    }

    #[test]
    fn float_values_and_policy() {
        let mut data = Array4::<f32>::zeros((2, 1, 1, 1));
        data[[0, 0, 0, 0]] = 0.5;
        data[[1, 0, 0, 0]] = f32::NAN;
        let image = VectorImage::from_array(data);

        let (summary, text) = render(&RowEmitter::new(&image));
        assert_eq!(text, "0,0,0,0.5\n1,0,0,NaN\n");
        assert_eq!(summary.rows, 2);

        let mut out = Vec::new();
        let err = RowEmitter::new(&image)
            .floating_point(FloatingPointPolicy::Abort)
            .emit(&mut out)
            .unwrap_err();
        assert!(matches!(err, Error::NonFiniteComponent { index, .. } if index == VoxelIndex::new(1, 0, 0)));
        assert_eq!(String::from_utf8(out).unwrap(), "0,0,0,0.5\n");
    }
}
