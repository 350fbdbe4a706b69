//! The table tree the parsers work on.
//!
//! Only tables, rows, and their `td`/`th` cells (with text content) are kept
//! from the source HTML. Loose HTML is normalized by html5ever.

use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use scraper::{Html, Selector};

static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid selector"));
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td, th").expect("valid selector"));

/// Whether a cell was a `td` or a `th`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// A `td` cell.
    Data,
    /// A `th` cell.
    Header,
}

/// One table cell and its text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// The element the cell came from.
    pub kind: CellKind,
    /// The concatenated text of the cell and all its descendants.
    pub text: String,
}

/// One table row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// Every `td` and `th` below the row, in document order.
    pub cells: Vec<Cell>,
}

impl Row {
    /// A row of `td` cells.
    #[must_use]
    pub fn data<S: AsRef<str>>(texts: &[S]) -> Self {
        Self::of(CellKind::Data, texts)
    }

    /// A row of `th` cells.
    #[must_use]
    pub fn headers<S: AsRef<str>>(texts: &[S]) -> Self {
        Self::of(CellKind::Header, texts)
    }

    fn of<S: AsRef<str>>(kind: CellKind, texts: &[S]) -> Self {
        Self {
            cells: texts
                .iter()
                .map(|text| Cell {
                    kind,
                    text: text.as_ref().to_string(),
                })
                .collect(),
        }
    }

    /// The `td` cells of the row.
    #[must_use]
    pub fn data_cells(&self) -> Vec<&Cell> {
        self.cells_of(CellKind::Data)
    }

    /// The `th` cells of the row.
    #[must_use]
    pub fn header_cells(&self) -> Vec<&Cell> {
        self.cells_of(CellKind::Header)
    }

    /// The `td` cells of the row, or its `th` cells if it has no `td`.
    #[must_use]
    pub fn data_or_header_cells(&self) -> Vec<&Cell> {
        let data = self.data_cells();
        if data.is_empty() {
            self.header_cells()
        } else {
            data
        }
    }

    fn cells_of(&self, kind: CellKind) -> Vec<&Cell> {
        self.cells.iter().filter(|cell| cell.kind == kind).collect()
    }
}

/// One table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Every `tr` below the table, in document order.
    pub rows: Vec<Row>,
}

/// Errors raised while loading a document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The source file could not be read.
    #[error("failed to read document {path}: {source}")]
    Read {
        /// The file that was read.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

/// All tables of one source document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// The tables of the document.
    pub tables: Vec<Table>,
}

impl Document {
    /// Builds the table tree from (possibly loosely formed) HTML.
    #[must_use]
    pub fn from_html(html: &str) -> Self {
        let html = Html::parse_document(html);
        let tables = html
            .select(&TABLE)
            .map(|table| Table {
                rows: table
                    .select(&ROW)
                    .map(|row| Row {
                        cells: row
                            .select(&CELL)
                            .map(|cell| Cell {
                                kind: if cell.value().name() == "th" {
                                    CellKind::Header
                                } else {
                                    CellKind::Data
                                },
                                text: cell.text().collect(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        Self { tables }
    }

    /// Reads and parses an HTML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        tracing::info!("Reading {}", path.display());
        let html = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_html(&html))
    }
}
