//! Square symmetric matrix with upper-triangle storage
//!
//! Entry (r, c) and entry (c, r) share one cell, so the backing vector
//! holds `rc * (rc + 1) / 2` values instead of `rc * rc`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::ops::{AddAssign, Index, IndexMut, SubAssign};
use thiserror::Error;

/// Errors raised by matrix operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("Dimension mismatch: {left} x {left} vs {right} x {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Index ({row}, {column}) out of bounds for a {dimension} x {dimension} matrix")]
    OutOfBounds {
        row: usize,
        column: usize,
        dimension: usize,
    },
}

pub type MatrixResult<T> = Result<T, MatrixError>;

/// Square symmetric matrix. Only the upper triangle (row <= column) is stored.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SymmetricMatrix<T> {
    rc: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default> SymmetricMatrix<T> {
    /// Create a zero-filled matrix with `rows` rows (and columns)
    pub fn new(rows: usize) -> Self {
        SymmetricMatrix {
            rc: rows,
            cells: vec![T::default(); rows * (rows + 1) / 2],
        }
    }

    /// Number of rows (equal to the number of columns)
    pub fn dimension(&self) -> usize {
        self.rc
    }

    /// Both row and column are within `0..dimension`
    pub fn is_valid(&self, row: usize, column: usize) -> bool {
        row < self.rc && column < self.rc
    }

    /// Offset of the cell for (row, column) in the backing storage
    pub fn position(&self, row: usize, column: usize) -> usize {
        let (r, c) = if row <= column { (row, column) } else { (column, row) };
        r * self.rc - r * r.saturating_sub(1) / 2 + (c - r)
    }

    /// Checked read
    pub fn get(&self, row: usize, column: usize) -> MatrixResult<T> {
        self.check(row, column)?;
        Ok(self.cells[self.position(row, column)])
    }

    /// Checked write
    pub fn set(&mut self, row: usize, column: usize, value: T) -> MatrixResult<()> {
        self.check(row, column)?;
        let pos = self.position(row, column);
        self.cells[pos] = value;
        Ok(())
    }

    /// Reset every cell to zero
    pub fn clear(&mut self) {
        self.cells.fill(T::default());
    }

    /// Raw upper-triangle storage, row-major
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    fn check(&self, row: usize, column: usize) -> MatrixResult<()> {
        if self.is_valid(row, column) {
            Ok(())
        } else {
            Err(MatrixError::OutOfBounds {
                row,
                column,
                dimension: self.rc,
            })
        }
    }

    fn check_dimension(&self, other: &Self) -> MatrixResult<()> {
        if self.rc == other.rc {
            Ok(())
        } else {
            Err(MatrixError::DimensionMismatch {
                left: self.rc,
                right: other.rc,
            })
        }
    }
}

impl<T: Copy + Default> SymmetricMatrix<T> {
    /// Replace every cell with `f(cell, other_cell)`
    pub fn combine<F>(&mut self, other: &SymmetricMatrix<T>, f: F) -> MatrixResult<()>
    where
        F: Fn(T, T) -> T,
    {
        self.check_dimension(other)?;
        for (cell, &value) in self.cells.iter_mut().zip(&other.cells) {
            *cell = f(*cell, value);
        }
        Ok(())
    }
}

impl<T: Copy + Default + AddAssign> SymmetricMatrix<T> {
    /// Add `addend` into this matrix cell by cell
    pub fn add(&mut self, addend: &SymmetricMatrix<T>) -> MatrixResult<()> {
        self.check_dimension(addend)?;
        for (cell, &value) in self.cells.iter_mut().zip(&addend.cells) {
            *cell += value;
        }
        Ok(())
    }
}

impl<T: Copy + Default + SubAssign> SymmetricMatrix<T> {
    /// Subtract `subtrahend` from this matrix cell by cell
    pub fn subtract(&mut self, subtrahend: &SymmetricMatrix<T>) -> MatrixResult<()> {
        self.check_dimension(subtrahend)?;
        for (cell, &value) in self.cells.iter_mut().zip(&subtrahend.cells) {
            *cell -= value;
        }
        Ok(())
    }
}

impl<T: Copy + Default> Index<(usize, usize)> for SymmetricMatrix<T> {
    type Output = T;

    fn index(&self, (row, column): (usize, usize)) -> &T {
        assert!(
            self.is_valid(row, column),
            "index ({}, {}) out of bounds for a {} x {} matrix",
            row,
            column,
            self.rc,
            self.rc
        );
        &self.cells[self.position(row, column)]
    }
}

impl<T: Copy + Default> IndexMut<(usize, usize)> for SymmetricMatrix<T> {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut T {
        assert!(
            self.is_valid(row, column),
            "index ({}, {}) out of bounds for a {} x {} matrix",
            row,
            column,
            self.rc,
            self.rc
        );
        let pos = self.position(row, column);
        &mut self.cells[pos]
    }
}
