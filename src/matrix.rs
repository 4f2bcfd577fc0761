//! Validated square distance matrix.

use crate::error::MatrixError;

/// Square grid of finite, non-negative distances.
///
/// Only constructed through the validating constructors, so solvers can index
/// it freely.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    rows: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let n = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(MatrixError::Malformed(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            if let Some((j, value)) = row
                .iter()
                .enumerate()
                .find(|(_, value)| !value.is_finite() || **value < 0.0)
            {
                return Err(MatrixError::Malformed(format!(
                    "cell [{}][{}] holds invalid distance {}",
                    i, j, value
                )));
            }
        }
        Ok(Self { rows })
    }

    /// Accepts provider grids where unreachable pairs come back as `null`.
    pub fn from_nullable_rows(rows: Vec<Vec<Option<f64>>>) -> Result<Self, MatrixError> {
        let mut filled = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            let mut out = Vec::with_capacity(row.len());
            for (j, value) in row.into_iter().enumerate() {
                match value {
                    Some(value) => out.push(value),
                    None => {
                        return Err(MatrixError::Malformed(format!(
                            "no route between locations {} and {}",
                            i, j
                        )));
                    }
                }
            }
            filled.push(out);
        }
        Self::from_rows(filled)
    }

    /// Fails unless the matrix covers exactly `expected` locations.
    pub fn ensure_len(self, expected: usize) -> Result<Self, MatrixError> {
        if self.len() == expected {
            Ok(self)
        } else {
            Err(MatrixError::Malformed(format!(
                "got a {}x{} matrix for {} locations",
                self.len(),
                self.len(),
                expected
            )))
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.rows[from][to]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
}
