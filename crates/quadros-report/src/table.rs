//! In-memory report tables

/// One row: column name to cell value, in insertion order
pub type Row = Vec<(String, String)>;

/// A named table whose columns appear in first-seen order
///
/// The declared columns are seeded up front, so an empty table still has a
/// header. Columns introduced by later rows are appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with its declared columns
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Table name, used as the output file stem
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in output order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in insertion order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row, registering any column not seen before
    pub fn push_row<K, V>(&mut self, cells: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let row: Row = cells.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        for (column, _) in &row {
            if !self.columns.contains(column) {
                self.columns.push(column.clone());
            }
        }
        self.rows.push(row);
    }

    /// Cell values of a row aligned to `columns()`; missing cells are empty
    pub fn aligned(&self, row: &Row) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| {
                row.iter()
                    .find(|(name, _)| name == column)
                    .map(|(_, value)| value.clone())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Values of one column across all rows
    pub fn column_values(&self, column: &str) -> Vec<&str> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .find(|(name, _)| name == column)
                    .map(|(_, value)| value.as_str())
                    .unwrap_or("")
            })
            .collect()
    }
}
