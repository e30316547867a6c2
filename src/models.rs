use chrono::NaiveDateTime;

/// One reading from a trend export: a timestamped value for a single point.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendRecord {
    pub timestamp: NaiveDateTime,
    pub source: String,
    pub value: String,
}

/// A single grid cell. Columns are converted to `Number` as a whole after
/// resampling when every non-missing cell parses; otherwise they stay `Text`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Wide-format trend table: one row per timestamp, one column per point.
///
/// Invariants: `timestamps` is sorted ascending and unique, and every row of
/// `cells` has exactly `columns.len()` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendGrid {
    pub timestamps: Vec<NaiveDateTime>,
    pub columns: Vec<String>,
    pub cells: Vec<Vec<CellValue>>,
}

impl TrendGrid {
    pub fn empty() -> Self {
        Self {
            timestamps: Vec::new(),
            columns: Vec::new(),
            cells: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        &self.cells[row][col]
    }

    /// Position of a column by display name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}
