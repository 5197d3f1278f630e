//! CSV reader for draws and histogram bins

use crate::reader::{CsvOptions, HistogramColumns, IoError, IoResult};
use hopplot_stats::{HistogramBin, Sample};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// CSV file reader
pub struct CsvReader {
    path: PathBuf,
    options: CsvOptions,
    headers: Vec<String>,
}

impl CsvReader {
    /// Open a comma-separated file with a header row
    pub fn open(path: impl AsRef<Path>) -> IoResult<Self> {
        Self::open_with_options(path, CsvOptions::default())
    }

    /// Open a delimited file with options
    pub fn open_with_options(path: impl AsRef<Path>, options: CsvOptions) -> IoResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(IoError::FileNotFound(path.display().to_string()));
        }

        let mut reader = Self::csv_reader(&path, &options)?;
        let headers = reader
            .headers()
            .map_err(|e| IoError::InvalidFormat(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        Ok(Self {
            path,
            options,
            headers,
        })
    }

    fn csv_reader(path: &Path, options: &CsvOptions) -> IoResult<csv::Reader<BufReader<File>>> {
        let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        Ok(csv::ReaderBuilder::new()
            .delimiter(options.delimiter_byte()?)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file)))
    }

    /// Column names from the header row
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn column_index(&self, name: &str) -> IoResult<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| IoError::ColumnNotFound(name.to_string()))
    }

    /// Parse the named columns row by row; missing cells become `None`
    fn read_rows(&self, names: &[&str]) -> IoResult<Vec<Vec<Option<f64>>>> {
        let indices = names
            .iter()
            .map(|name| self.column_index(name))
            .collect::<IoResult<Vec<_>>>()?;

        let mut reader = Self::csv_reader(&self.path, &self.options)?;
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let row = indices
                .iter()
                .zip(names)
                .map(|(&idx, &name)| {
                    let cell = record.get(idx).unwrap_or("");
                    if self.options.is_missing(cell) {
                        return Ok(None);
                    }
                    cell.parse::<f64>().map(Some).map_err(|_| IoError::Parse {
                        line,
                        column: name.to_string(),
                        value: cell.to_string(),
                    })
                })
                .collect::<IoResult<Vec<_>>>()?;
            rows.push(row);
        }

        Ok(rows)
    }

    /// Read one numeric column, skipping missing cells
    pub fn read_column(&self, name: &str) -> IoResult<Vec<f64>> {
        let rows = self.read_rows(&[name])?;
        let total = rows.len();
        let values: Vec<f64> = rows.into_iter().filter_map(|row| row[0]).collect();

        if values.len() < total {
            tracing::warn!(
                column = name,
                skipped = total - values.len(),
                "skipped missing cells"
            );
        }
        Ok(values)
    }

    /// Read a sample of draws, weighted when `weight_column` is given
    ///
    /// Rows missing either the value or the weight are skipped.
    pub fn read_sample(&self, value_column: &str, weight_column: Option<&str>) -> IoResult<Sample> {
        let sample = match weight_column {
            None => Sample::from_values(self.read_column(value_column)?)?,
            Some(weight_column) => {
                let rows = self.read_rows(&[value_column, weight_column])?;
                let total = rows.len();
                let pairs: Vec<(f64, f64)> = rows
                    .into_iter()
                    .filter_map(|row| Some((row[0]?, row[1]?)))
                    .collect();
                if pairs.len() < total {
                    tracing::warn!(
                        skipped = total - pairs.len(),
                        "skipped incomplete weighted rows"
                    );
                }
                Sample::from_weighted(pairs)?
            }
        };

        tracing::info!(
            path = %self.path.display(),
            column = value_column,
            size = sample.len(),
            weighted = sample.is_weighted(),
            "read sample"
        );
        Ok(sample)
    }

    /// Read histogram bins, one per row
    ///
    /// Rows with any missing cell are an error, since a gap would shift the
    /// cumulative probabilities of every later bin.
    pub fn read_histogram(&self, columns: &HistogramColumns) -> IoResult<Vec<HistogramBin>> {
        let names = [
            columns.lower.as_str(),
            columns.upper.as_str(),
            columns.count.as_str(),
        ];
        let rows = self.read_rows(&names)?;

        let bins = rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| match (row[0], row[1], row[2]) {
                (Some(lower), Some(upper), Some(count)) => {
                    Ok(HistogramBin::new(lower, upper, count))
                }
                _ => Err(IoError::InvalidFormat(format!(
                    "histogram row {} has a missing cell",
                    idx + 1
                ))),
            })
            .collect::<IoResult<Vec<_>>>()?;

        tracing::info!(path = %self.path.display(), bins = bins.len(), "read histogram");
        Ok(bins)
    }
}
