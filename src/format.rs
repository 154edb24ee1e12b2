//! Plain comma separated matrix files.
//!
//! The first line holds a leading field that is ignored, then one label per
//! office. Every following line holds a shop label and one value per office:
//!
//! ```text
//!  ,office 1,office 2
//! shop 1,5,150
//! shop 2,20,135
//! ```
//!
//! Solution matrices use the same layout with 0/1 values.
use crate::matrix::{AssignmentMatrix, Matrix};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const DELIMITER: &str = ",";

#[derive(Debug, Error)]
pub enum FormatError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },
}

impl FormatError {
    fn malformed(line: usize, reason: impl Into<String>) -> Self {
        FormatError::MalformedInput {
            line,
            reason: reason.into(),
        }
    }
}

/// Values together with their office (column) and shop (row) labels.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix {
    pub offices: Vec<String>,
    pub shops: Vec<String>,
    pub values: Matrix<f64>,
}

impl LabeledMatrix {
    pub fn new(offices: Vec<String>, shops: Vec<String>, values: Matrix<f64>) -> Self {
        debug_assert_eq!(offices.len(), values.cols());
        debug_assert_eq!(shops.len(), values.rows());
        Self {
            offices,
            shops,
            values,
        }
    }

    /// Same labels around other values, e.g. the solution of this cost matrix.
    pub fn with_values(&self, values: Matrix<f64>) -> Self {
        Self::new(self.offices.clone(), self.shops.clone(), values)
    }

    pub fn with_assignment(&self, assignment: &AssignmentMatrix) -> Self {
        self.with_values(assignment.to_matrix())
    }

    /// The values as integers when every one of them is a whole number that
    /// `i64` holds exactly.
    pub fn integral(&self) -> Option<Matrix<i64>> {
        // 2^53, beyond it f64 no longer represents every integer
        const EXACT_LIMIT: f64 = 9_007_199_254_740_992.;
        let integral = self
            .values
            .as_slice()
            .iter()
            .all(|v| v.fract() == 0. && v.abs() <= EXACT_LIMIT);
        if integral {
            Some(self.values.map(|v| v as i64))
        } else {
            None
        }
    }

    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, FormatError> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(n, line)| (n + 1, line))
            .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty()));

        let (header_line, header) = match lines.next() {
            Some((n, line)) => (n, line?),
            None => return Err(FormatError::malformed(1, "missing header line")),
        };
        let offices: Vec<String> = split_fields(&header).skip(1).map(String::from).collect();
        if offices.is_empty() {
            return Err(FormatError::malformed(header_line, "header has no office labels"));
        }

        let mut shops = Vec::new();
        let mut values = Vec::new();
        for (n, line) in lines {
            let line = line?;
            let mut fields = split_fields(&line);
            let shop = fields.next().unwrap_or_default();
            let row_start = values.len();
            for field in fields {
                let value = field.parse::<f64>().map_err(|_| {
                    FormatError::malformed(n, format!("value {:?} is not a number", field))
                })?;
                values.push(value);
            }
            let found = values.len() - row_start;
            if found != offices.len() {
                return Err(FormatError::malformed(
                    n,
                    format!("expected {} values, found {}", offices.len(), found),
                ));
            }
            shops.push(shop.to_string());
        }
        if shops.is_empty() {
            return Err(FormatError::malformed(header_line + 1, "no shop rows"));
        }

        let values = Matrix::from_vec(shops.len(), offices.len(), values)
            .map_err(|e| FormatError::malformed(header_line, e.to_string()))?;
        debug!("read {} shops x {} offices", shops.len(), offices.len());
        Ok(Self::new(offices, shops, values))
    }

    pub fn read_path<P: AsRef<Path>>(path: P) -> Result<Self, FormatError> {
        Self::read_from(BufReader::new(File::open(path)?))
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), FormatError> {
        write!(writer, "{}", DELIMITER)?;
        writeln!(writer, "{}", self.offices.join(DELIMITER))?;
        for (shop, row) in self.shops.iter().zip(self.values.iter_rows()) {
            write!(writer, "{}", shop)?;
            for value in row {
                // Display for f64 is the shortest representation that reads back identically
                write!(writer, "{}{}", DELIMITER, value)?;
            }
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_path<P: AsRef<Path>>(&self, path: P) -> Result<(), FormatError> {
        self.write_to(BufWriter::new(File::create(path)?))
    }
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(DELIMITER).map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::{FormatError, LabeledMatrix};
    use crate::matrix::{AssignmentMatrix, Matrix};

    const SAMPLE: &str = " ,office 1, office 2
shop 1,5,150
shop 2,20, 135
shop 3,90, 50
shop 4,60, 35
shop 5,360, 500
";

    #[test]
    fn test_read_sample() {
        let matrix = LabeledMatrix::read_from(SAMPLE.as_bytes()).unwrap();
        assert_eq!(matrix.offices, vec!["office 1", "office 2"]);
        assert_eq!(matrix.shops.len(), 5);
        assert_eq!(matrix.shops[4], "shop 5");
        assert_eq!(matrix.values.row(1), &[20., 135.]);
        assert_eq!(matrix.integral().unwrap().get(4, 1), 500);
    }

    #[test]
    fn test_solution_round_trip() {
        let costs = LabeledMatrix::read_from(SAMPLE.as_bytes()).unwrap();
        let assignment = AssignmentMatrix::try_from_matrix(
            &Matrix::from_rows(&[[1., 0.], [1., 0.], [0., 1.], [0., 1.], [1., 0.]]).unwrap(),
        )
        .unwrap();
        let solution = costs.with_assignment(&assignment);

        let mut buffer = Vec::new();
        solution.write_to(&mut buffer).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with(",office 1,office 2\nshop 1,1,0\n"));

        let read_back = LabeledMatrix::read_from(buffer.as_slice()).unwrap();
        assert_eq!(read_back, solution);
        assert_eq!(
            AssignmentMatrix::try_from_matrix(&read_back.values).unwrap(),
            assignment
        );
    }

    #[test]
    fn test_fractional_values_are_not_integral() {
        let matrix = LabeledMatrix::read_from(",a,b\nx,1.5,2\n".as_bytes()).unwrap();
        assert_eq!(matrix.values.get(0, 0), 1.5);
        assert!(matrix.integral().is_none());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let matrix = LabeledMatrix::read_from(",a\n\nx,1\n\n".as_bytes()).unwrap();
        assert_eq!(matrix.shops, vec!["x"]);
    }

    fn malformed_line(input: &str) -> usize {
        match LabeledMatrix::read_from(input.as_bytes()) {
            Err(FormatError::MalformedInput { line, .. }) => line,
            other => panic!("expected malformed input, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_input() {
        assert_eq!(malformed_line(""), 1);
        assert_eq!(malformed_line("only\n"), 1);
        assert_eq!(malformed_line(",a,b\n"), 2);
        assert_eq!(malformed_line(",a,b\nx,1,2\ny,1\n"), 3);
        assert_eq!(malformed_line(",a,b\nx,1,2,3\n"), 2);
        assert_eq!(malformed_line(",a,b\nx,1,far\n"), 2);
    }
}
