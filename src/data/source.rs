use std::fmt;
use std::path::{Path, PathBuf};

use super::loader;
use super::model::Table;
use crate::error::{AnalysisError, Result};

/// Format-specific parser: one file in, one table out.
pub type Parser = fn(&Path) -> anyhow::Result<Table>;

// ---------------------------------------------------------------------------
// DataSource contract
// ---------------------------------------------------------------------------

/// Something that can turn a directory of inflammation files into tables.
///
/// `load` scans eagerly and fails with [`AnalysisError::NoDataFound`] when
/// nothing matches; parsing is deferred to iteration of the returned
/// [`TableIter`].
pub trait DataSource {
    fn load(&self) -> Result<TableIter>;
}

/// Lazy, single-pass sequence of tables, one per discovered file.
pub struct TableIter {
    paths: std::vec::IntoIter<PathBuf>,
    parser: Parser,
}

impl TableIter {
    /// Scan `dir` for `pattern` and prepare to parse each match with `parser`.
    pub fn discover(dir: &Path, pattern: &str, parser: Parser) -> Result<Self> {
        let paths = discover(dir, pattern)?;
        Ok(TableIter {
            paths: paths.into_iter(),
            parser,
        })
    }

    /// Files not yet parsed, in the order they will be yielded.
    pub fn paths(&self) -> &[PathBuf] {
        self.paths.as_slice()
    }
}

impl Iterator for TableIter {
    type Item = Result<Table>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths.next()?;
        let table = (self.parser)(&path).map_err(|source| AnalysisError::Parse {
            path: path.clone(),
            source,
        });
        if let Ok(t) = &table {
            log::debug!("Parsed {}: {t}", path.display());
        }
        Some(table)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.paths.size_hint()
    }
}

impl ExactSizeIterator for TableIter {}

impl fmt::Debug for TableIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableIter")
            .field("paths", &self.paths.as_slice())
            .finish_non_exhaustive()
    }
}

/// List regular files in `dir` whose names match `pattern`, alphabetically.
fn discover(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    // The directory itself may contain glob metacharacters.
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let search = Path::new(&escaped).join(pattern);

    let mut paths = Vec::new();
    for entry in glob::glob(&search.to_string_lossy())? {
        let path = entry?;
        if path.is_file() {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(AnalysisError::NoDataFound {
            dir: dir.to_path_buf(),
            pattern: pattern.to_string(),
        });
    }
    log::debug!(
        "Found {} file(s) matching '{pattern}' in {}",
        paths.len(),
        dir.display()
    );
    Ok(paths)
}

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

/// On-disk formats a directory of inflammation data can be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DataFormat {
    Csv,
    Json,
    Parquet,
}

impl DataFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            DataFormat::Csv => "csv",
            DataFormat::Json => "json",
            DataFormat::Parquet => "parquet",
        }
    }

    /// Discovery pattern, relative to the data directory.
    pub fn pattern(self) -> &'static str {
        match self {
            DataFormat::Csv => "inflammation*.csv",
            DataFormat::Json => "inflammation*.json",
            DataFormat::Parquet => "inflammation*.parquet",
        }
    }

    fn parser(self) -> Parser {
        match self {
            DataFormat::Csv => loader::load_csv,
            DataFormat::Json => loader::load_json,
            DataFormat::Parquet => loader::load_parquet,
        }
    }

    /// The data source reading this format from `dir`.
    pub fn data_source(self, dir: impl Into<PathBuf>) -> Box<dyn DataSource> {
        match self {
            DataFormat::Csv => Box::new(CsvDataSource::new(dir)),
            DataFormat::Json => Box::new(JsonDataSource::new(dir)),
            DataFormat::Parquet => Box::new(ParquetDataSource::new(dir)),
        }
    }

    fn load(self, dir: &Path) -> Result<TableIter> {
        TableIter::discover(dir, self.pattern(), self.parser())
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// Reads `inflammation*.csv` files.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    dir: PathBuf,
}

impl CsvDataSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DataSource for CsvDataSource {
    fn load(&self) -> Result<TableIter> {
        DataFormat::Csv.load(&self.dir)
    }
}

/// Reads `inflammation*.json` files of `{ "observations": [...] }` records.
#[derive(Debug, Clone)]
pub struct JsonDataSource {
    dir: PathBuf,
}

impl JsonDataSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DataSource for JsonDataSource {
    fn load(&self) -> Result<TableIter> {
        DataFormat::Json.load(&self.dir)
    }
}

/// Reads `inflammation*.parquet` files with an `observations` list column.
#[derive(Debug, Clone)]
pub struct ParquetDataSource {
    dir: PathBuf,
}

impl ParquetDataSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DataSource for ParquetDataSource {
    fn load(&self) -> Result<TableIter> {
        DataFormat::Parquet.load(&self.dir)
    }
}
