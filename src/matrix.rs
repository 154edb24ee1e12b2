use crate::bounds::CapacityBounds;
use anyhow::{ensure, Result};
use num_traits::{One, Zero};

/// Dense row-major matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    values: Vec<T>,
}

impl<T: Copy> Matrix<T> {
    pub fn from_vec(rows: usize, cols: usize, values: Vec<T>) -> Result<Self> {
        ensure!(rows > 0 && cols > 0, "matrix must not be empty");
        ensure!(
            values.len() == rows * cols,
            "expected {} values for {} x {}, got {}",
            rows * cols,
            rows,
            cols,
            values.len()
        );
        Ok(Self { rows, cols, values })
    }

    /// Builds a matrix from rows of equal length.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        ensure!(!rows.is_empty(), "matrix must have at least one row");
        let cols = rows[0].as_ref().len();
        let mut values = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            ensure!(
                row.len() == cols,
                "row {} has {} values, expected {}",
                i,
                row.len(),
                cols
            );
            values.extend_from_slice(row);
        }
        Self::from_vec(rows.len(), cols, values)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.values[row * self.cols + col]
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        self.values.chunks_exact(self.cols)
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn map<U, F: FnMut(T) -> U>(&self, f: F) -> Matrix<U> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            values: self.values.iter().copied().map(f).collect(),
        }
    }
}

/// Binary matrix with exactly one 1 per row.
///
/// Stored as the chosen column of every row, so the row-sum invariant can not
/// be broken.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssignmentMatrix {
    cols: usize,
    row_to_col: Vec<usize>,
}

impl AssignmentMatrix {
    pub(crate) fn from_row_to_col(cols: usize, row_to_col: Vec<usize>) -> Self {
        debug_assert!(row_to_col.iter().all(|&j| j < cols));
        Self { cols, row_to_col }
    }

    /// Reads a 0/1 matrix back, checking that every entry is exactly 0 or 1
    /// and every row holds a single 1.
    pub fn try_from_matrix(matrix: &Matrix<f64>) -> Result<Self> {
        let mut row_to_col = Vec::with_capacity(matrix.rows());
        for (i, row) in matrix.iter_rows().enumerate() {
            let mut chosen = None;
            for (j, &value) in row.iter().enumerate() {
                if value == 1. {
                    ensure!(chosen.is_none(), "row {} has more than one 1", i);
                    chosen = Some(j);
                } else {
                    ensure!(
                        value == 0.,
                        "value {} at row {}, column {} is not binary",
                        value,
                        i,
                        j
                    );
                }
            }
            match chosen {
                Some(j) => row_to_col.push(j),
                None => anyhow::bail!("row {} has no 1", i),
            }
        }
        Ok(Self::from_row_to_col(matrix.cols(), row_to_col))
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.row_to_col.len()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        (self.row_to_col[row] == col) as u8
    }

    /// Office (column) assigned to `shop`.
    #[inline]
    pub fn office_of(&self, shop: usize) -> usize {
        self.row_to_col[shop]
    }

    #[inline]
    pub fn row_to_col(&self) -> &[usize] {
        &self.row_to_col
    }

    pub fn column_sums(&self) -> Vec<usize> {
        let mut sums = vec![0; self.cols];
        self.row_to_col.iter().for_each(|&j| sums[j] += 1);
        sums
    }

    pub fn satisfies(&self, bounds: &CapacityBounds) -> bool {
        self.column_sums().into_iter().all(|s| bounds.contains(s))
    }

    pub fn to_matrix<T: Copy + Zero + One>(&self) -> Matrix<T> {
        let mut values = vec![T::zero(); self.rows() * self.cols];
        for (i, &j) in self.row_to_col.iter().enumerate() {
            values[i * self.cols + j] = T::one();
        }
        Matrix {
            rows: self.rows(),
            cols: self.cols,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AssignmentMatrix, Matrix};
    use crate::bounds::CapacityBounds;

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(Matrix::from_rows(&[vec![1, 2], vec![3]]).is_err());
        let empty: [Vec<i64>; 0] = [];
        assert!(Matrix::from_rows(&empty).is_err());
    }

    #[test]
    fn test_empty_shapes_are_rejected() {
        assert!(Matrix::<i64>::from_vec(0, 3, vec![]).is_err());
        assert!(Matrix::<i64>::from_vec(3, 0, vec![]).is_err());
        assert!(Matrix::from_rows(&[Vec::<i64>::new(), Vec::new()]).is_err());
    }

    #[test]
    fn test_office_of() {
        let a = AssignmentMatrix::from_row_to_col(3, vec![2, 0, 2]);
        assert_eq!(a.office_of(0), 2);
        assert_eq!(a.office_of(1), 0);
    }

    #[test]
    fn test_indexing() {
        let m = Matrix::from_rows(&[[1, 2, 3], [4, 5, 6]]).unwrap();
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert_eq!(m.get(1, 2), 6);
        assert_eq!(m.row(1), &[4, 5, 6]);
        assert_eq!(m.map(|v| v * 2).get(0, 1), 4);
    }

    #[test]
    fn test_assignment_to_matrix() {
        let a = AssignmentMatrix::from_row_to_col(2, vec![0, 1, 1]);
        let m: Matrix<f64> = a.to_matrix();
        assert_eq!(m.as_slice(), &[1., 0., 0., 1., 0., 1.]);
        assert_eq!(a.column_sums(), vec![1, 2]);
        assert!(a.satisfies(&CapacityBounds::new(1, 2)));
        assert!(!a.satisfies(&CapacityBounds::new(0, 1)));
        assert_eq!(AssignmentMatrix::try_from_matrix(&m).unwrap(), a);
    }

    #[test]
    fn test_try_from_matrix_rejects_invalid() {
        let two_ones = Matrix::from_rows(&[[1., 1.]]).unwrap();
        assert!(AssignmentMatrix::try_from_matrix(&two_ones).is_err());
        let no_one = Matrix::from_rows(&[[0., 0.]]).unwrap();
        assert!(AssignmentMatrix::try_from_matrix(&no_one).is_err());
        let fractional = Matrix::from_rows(&[[0.5, 0.5]]).unwrap();
        assert!(AssignmentMatrix::try_from_matrix(&fractional).is_err());
    }
}
