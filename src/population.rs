//! Observations and the population they form.
//!
//! A [`Population`] stores one [`Data`] record per row of a [`DataMatrix`].
//! Every record has the same number of fields, and the row index is the
//! identity used by samplers, models and the engine.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Vector2;

use crate::error::{Error, Result};
use crate::types::DataMatrix;

/// One immutable observation, e.g. the coordinates of a point.
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    fields: Box<[f64]>,
}

impl Data {
    pub fn new(fields: impl Into<Vec<f64>>) -> Self {
        Self {
            fields: fields.into().into_boxed_slice(),
        }
    }

    pub fn fields(&self) -> &[f64] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Write the record as one comma-separated line.
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write_fields(writer, self.fields.iter().copied())
    }
}

impl From<Vec<f64>> for Data {
    fn from(fields: Vec<f64>) -> Self {
        Self::new(fields)
    }
}

impl<const N: usize> From<[f64; N]> for Data {
    fn from(fields: [f64; N]) -> Self {
        Self::new(fields.to_vec())
    }
}

/// Ordered set of observations fitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    data: DataMatrix,
}

impl Default for Population {
    fn default() -> Self {
        Self {
            data: DataMatrix::zeros(0, 0),
        }
    }
}

impl Population {
    /// Wrap a matrix holding one record per row.
    pub fn from_matrix(data: DataMatrix) -> Self {
        Self { data }
    }

    /// Build a population from records, which must all have the same length.
    pub fn from_records(records: &[Data]) -> Result<Self> {
        let Some(first) = records.first() else {
            return Ok(Self::default());
        };
        let dim = first.len();

        let mut flat = Vec::with_capacity(records.len() * dim);
        for (index, record) in records.iter().enumerate() {
            if record.len() != dim {
                return Err(Error::RaggedRecord {
                    index,
                    expected: dim,
                    got: record.len(),
                });
            }
            flat.extend_from_slice(record.fields());
        }

        Ok(Self::from_matrix(DataMatrix::from_row_slice(
            records.len(),
            dim,
            &flat,
        )))
    }

    /// Build a population from fixed-size rows, e.g. `[[x, y]; n]`.
    pub fn from_rows<const D: usize>(rows: &[[f64; D]]) -> Self {
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::from_matrix(DataMatrix::from_row_slice(rows.len(), D, &flat))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of fields per record.
    pub fn dim(&self) -> usize {
        self.data.ncols()
    }

    /// Field `field` of record `index`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    pub fn value(&self, index: usize, field: usize) -> f64 {
        self.data[(index, field)]
    }

    /// First two fields of record `index` as a point.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds or records have fewer than two fields.
    pub fn point2(&self, index: usize) -> Vector2<f64> {
        Vector2::new(self.data[(index, 0)], self.data[(index, 1)])
    }

    /// Copy record `index` out of the population.
    pub fn record(&self, index: usize) -> Data {
        Data::new(self.data.row(index).iter().copied().collect::<Vec<_>>())
    }

    pub fn records(&self) -> impl Iterator<Item = Data> + '_ {
        (0..self.len()).map(|i| self.record(i))
    }

    pub fn as_matrix(&self) -> &DataMatrix {
        &self.data
    }

    /// Write every record as a `", "`-separated line with six decimals.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<()> {
        for row in self.data.row_iter() {
            write_fields(&mut writer, row.iter().copied())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Export the population to `path` in the [`write_csv`](Self::write_csv) format.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))
    }
}

fn write_fields<W: Write>(
    writer: &mut W,
    fields: impl Iterator<Item = f64>,
) -> std::io::Result<()> {
    for (i, value) in fields.enumerate() {
        if i > 0 {
            writer.write_all(b", ")?;
        }
        write!(writer, "{value:.6}")?;
    }
    writer.write_all(b"\n")
}
