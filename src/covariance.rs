//! Build and output covariance matrices of phylogenetic trees
//!

use std::{
    fmt::{Debug, Display, LowerExp},
    fs,
    path::Path,
};

use itertools::Itertools;
use ndarray::Array2;
use num_traits::{Float, Zero};
use thiserror::Error;

/// Errors that can occur when filling and writing [`CovarianceMatrix`] structs.
#[derive(Error, Debug)]
pub enum MatrixError {
    /// We are trying to access an entry outside of the matrix
    #[error("Entry ({row}, {col}) is out of bounds for a matrix of size {size}")]
    IndexOutOfBounds {
        /// Row of the entry we are trying to access
        row: usize,
        /// Column of the entry we are trying to access
        col: usize,
        /// Size of the covariance matrix
        size: usize,
    },
    /// There was a [`std::io::Error`] when writing the matrix to a file
    #[error("Error writing file")]
    IoError(#[from] std::io::Error),
}

/// A dense square covariance matrix
#[derive(Debug, Clone)]
pub struct CovarianceMatrix<T> {
    /// Number of rows and columns in the matrix
    pub size: usize,
    /// Covariance values
    matrix: Array2<T>,
}

impl<T> CovarianceMatrix<T>
where
    T: Display + Debug + Float + Zero + LowerExp,
{
    /// Create a zero filled covariance matrix with a given size
    pub fn new_with_size(size: usize) -> Self {
        Self {
            size,
            matrix: Array2::zeros((size, size)),
        }
    }

    /// Get the value of an entry of the matrix
    pub fn get(&self, row: usize, col: usize) -> Result<&T, MatrixError> {
        if row >= self.size || col >= self.size {
            return Err(MatrixError::IndexOutOfBounds {
                row,
                col,
                size: self.size,
            });
        }

        Ok(&self.matrix[(row, col)])
    }

    /// Set the value of an entry of the matrix
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), MatrixError> {
        if row >= self.size || col >= self.size {
            return Err(MatrixError::IndexOutOfBounds {
                row,
                col,
                size: self.size,
            });
        }

        self.matrix[(row, col)] = value;
        Ok(())
    }

    /// Mirror the lower triangle of the matrix onto the upper triangle so
    /// that the matrix is symmetric. The diagonal is left untouched.
    pub fn copy_lower_to_upper(&mut self) {
        for row in 1..self.size {
            for col in 0..row {
                self.matrix[(col, row)] = self.matrix[(row, col)];
            }
        }
    }

    /// Writes the matrix to a file
    pub fn to_file(&self, path: &Path) -> Result<(), MatrixError> {
        match fs::write(path, self.to_string()) {
            Ok(_) => Ok(()),
            Err(e) => Err(MatrixError::IoError(e)),
        }
    }
}

impl<T> Display for CovarianceMatrix<T>
where
    T: Display + Debug + Float + Zero + LowerExp,
{
    /// The first line holds the number of rows and columns, then one line
    /// per row with the values in scientific notation, separated by tabs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} {}", self.size, self.size)?;
        for row in 0..self.size {
            let line = (0..self.size)
                .map(|col| format!("{:e}", self.matrix[(row, col)]))
                .join("\t");
            writeln!(f, "{line}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    const SMALL: &str = "2 2
2e0\t1e0
1e0\t3e0
";

    const FRACTIONS: &str = "3 3
2.5e0\t0e0\t0e0
2.5e-1\t1e0\t0e0
5e-2\t1.5e1\t4e-3
";

    fn build_small() -> CovarianceMatrix<f64> {
        let mut matrix = CovarianceMatrix::new_with_size(2);
        matrix.set(0, 0, 2.0).unwrap();
        matrix.set(1, 0, 1.0).unwrap();
        matrix.set(1, 1, 3.0).unwrap();
        matrix.copy_lower_to_upper();

        matrix
    }

    #[test]
    fn mirror_makes_symmetric() {
        let matrix = build_small();

        for row in 0..2 {
            for col in 0..2 {
                assert_eq!(
                    matrix.get(row, col).unwrap(),
                    matrix.get(col, row).unwrap()
                );
            }
        }

        assert_eq!(*matrix.get(0, 1).unwrap(), 1.0);
    }

    #[test]
    fn mirror_keeps_diagonal() {
        let matrix = build_small();

        assert_eq!(*matrix.get(0, 0).unwrap(), 2.0);
        assert_eq!(*matrix.get(1, 1).unwrap(), 3.0);
    }

    #[test]
    fn to_text() {
        let matrix = build_small();
        assert_eq!(SMALL, matrix.to_string());
    }

    #[test]
    fn to_text_scientific_notation() {
        let mut matrix = CovarianceMatrix::new_with_size(3);
        matrix.set(0, 0, 2.5).unwrap();
        matrix.set(1, 0, 0.25).unwrap();
        matrix.set(1, 1, 1.0).unwrap();
        matrix.set(2, 0, 0.05).unwrap();
        matrix.set(2, 1, 15.0).unwrap();
        matrix.set(2, 2, 0.004).unwrap();

        assert_eq!(FRACTIONS, matrix.to_string());
    }

    #[test]
    fn empty_matrix() {
        let matrix: CovarianceMatrix<f64> = CovarianceMatrix::new_with_size(0);
        assert_eq!("0 0\n", matrix.to_string());
    }

    #[test]
    fn out_of_bounds() {
        let mut matrix = build_small();

        let err = matrix.get(2, 0).unwrap_err();
        assert!(matches!(
            err,
            MatrixError::IndexOutOfBounds {
                row: 2,
                col: 0,
                size: 2
            }
        ));

        let err = matrix.set(0, 2, 1.0).unwrap_err();
        assert!(matches!(err, MatrixError::IndexOutOfBounds { .. }));
    }
}
