//! In-memory representation of a 2DA table.

use indexmap::IndexSet;
use kotor_common::{ResRef, StrRef};
use tracing::instrument;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, ParseError, Result};
use crate::schema::{self, ColumnSchema, ColumnType, TypedRow};

/// Text used by the text format to mark an empty cell
pub const EMPTY_MARKER: &str = "****";

/// Value of a single cell
///
/// [`Cell::Empty`] is the `****` marker. A cell holding an empty string is a different, present
/// value, though only the text format can store the difference on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Cell {
    /// No value
    #[default]
    Empty,
    /// A stored value
    Value(String),
}

impl Cell {
    /// Text of the cell, `None` when empty
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Empty => None,
            Cell::Value(value) => Some(value),
        }
    }

    /// Whether the cell is the empty marker
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Interpret text read from a file, mapping the empty marker to [`Cell::Empty`]
    pub(crate) fn from_stored(value: String) -> Self {
        if value == EMPTY_MARKER {
            Cell::Empty
        } else {
            Cell::Value(value)
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Value(value.to_owned())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Value(value)
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map_or(Cell::Empty, Cell::Value)
    }
}

/// A row of cells, one per column of the owning table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Row {
    label: String,
    cells: Vec<Cell>,
}

impl Row {
    /// The row header. Cosmetic: lookups always use the row index.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Cells in column order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// A 2DA table
///
/// ```
/// use kotor_2da::{Cell, TwoDA};
///
/// let mut table = TwoDA::new(["label", "modela"])?;
/// let row = table.add_row(None);
/// table.set_cell(row, "label", "Bastila")?;
///
/// assert_eq!(table.cell(row, "label"), Some("Bastila"));
/// assert_eq!(table.cell(row, "modela"), None);
///
/// let bytes = table.encode()?;
/// assert_eq!(TwoDA::decode(&bytes)?, table);
/// # Ok::<(), kotor_2da::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TableData"))]
pub struct TwoDA {
    columns: IndexSet<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    default_value: Option<String>,
    rows: Vec<Row>,
}

/// Unvalidated shape of a table, checked on deserialization
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct TableData {
    columns: Vec<String>,
    #[serde(default)]
    default_value: Option<String>,
    rows: Vec<Row>,
}

#[cfg(feature = "serde")]
impl TryFrom<TableData> for TwoDA {
    type Error = Error;

    fn try_from(value: TableData) -> Result<Self> {
        let mut table = TwoDA::new(value.columns)?;
        table.default_value = value.default_value;
        for (index, row) in value.rows.into_iter().enumerate() {
            if row.cells.len() != table.column_count() {
                return Err(Error::TruncatedData {
                    offset: index,
                    reason: format!(
                        "row has {} cells but the table has {} columns",
                        row.cells.len(),
                        table.column_count()
                    ),
                });
            }
            table.rows.push(row);
        }
        Ok(table)
    }
}

/// Construction and queries
impl TwoDA {
    /// Create an empty table with the given columns
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = IndexSet::new();
        for column in columns {
            let column = column.into();
            if set.contains(&column) {
                return Err(Error::DuplicateColumn(column));
            }
            set.insert(column);
        }

        Ok(Self {
            columns: set,
            default_value: None,
            rows: Vec::new(),
        })
    }

    /// Build a table from already validated parts
    pub(crate) fn from_parts(
        columns: IndexSet<String>,
        default_value: Option<String>,
        rows: Vec<(String, Vec<Cell>)>,
    ) -> Self {
        Self {
            columns,
            default_value,
            rows: rows
                .into_iter()
                .map(|(label, cells)| Row { label, cells })
                .collect(),
        }
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Position of a column. Column names are matched exactly.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.get_index_of(column)
    }

    /// All rows in order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// A row by index
    pub fn row(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    /// The cosmetic label of a row
    pub fn row_label(&self, row: usize) -> Option<&str> {
        self.rows.get(row).map(Row::label)
    }

    /// Value of the text format's `DEFAULT:` line
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Set or clear the value of the text format's `DEFAULT:` line
    pub fn set_default_value(&mut self, value: Option<String>) {
        self.default_value = value;
    }

    /// Text of a cell. `None` when the row or column does not exist or the cell is empty.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        self.cell_raw(row, column).and_then(Cell::as_str)
    }

    /// A cell, keeping the difference between empty and an empty string
    pub fn cell_raw(&self, row: usize, column: &str) -> Option<&Cell> {
        let column = self.column_index(column)?;
        self.cell_by_index(row, column)
    }

    /// A cell by row and column position
    pub fn cell_by_index(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row)?.cells.get(column)
    }

    /// Every cell of a column, in row order
    pub fn column_values(&self, column: &str) -> Option<impl Iterator<Item = &Cell>> {
        let index = self.column_index(column)?;
        Some(self.rows.iter().map(move |row| &row.cells[index]))
    }

    /// Index of the first row whose `column` holds exactly `value`
    pub fn find_row(&self, column: &str, value: &str) -> Option<usize> {
        let index = self.column_index(column)?;
        self.rows
            .iter()
            .position(|row| row.cells[index].as_str() == Some(value))
    }
}

/// Typed access
///
/// Each accessor returns `Ok(None)` for an empty cell (or unknown row or column) and a
/// [`ParseError`] when the stored text is not a valid value of the requested type.
impl TwoDA {
    /// Read a cell as an integer. Decimal and `0x` prefixed hexadecimal are accepted.
    pub fn cell_as_int(&self, row: usize, column: &str) -> core::result::Result<Option<i32>, ParseError> {
        self.coerce(row, column, ColumnType::Integer, schema::parse_int)
    }

    /// Read a cell as a float
    pub fn cell_as_float(&self, row: usize, column: &str) -> core::result::Result<Option<f32>, ParseError> {
        self.coerce(row, column, ColumnType::Float, schema::parse_float)
    }

    /// Read a cell as a resource reference
    pub fn cell_as_resref(
        &self,
        row: usize,
        column: &str,
    ) -> core::result::Result<Option<ResRef>, ParseError> {
        self.coerce(row, column, ColumnType::ResRef, schema::parse_resref)
    }

    /// Read a cell as a talk table reference. `-1` is the invalid reference.
    pub fn cell_as_strref(
        &self,
        row: usize,
        column: &str,
    ) -> core::result::Result<Option<StrRef>, ParseError> {
        self.coerce(row, column, ColumnType::StrRef, schema::parse_strref)
    }

    /// Read a cell as a boolean. Any non-zero integer is true.
    pub fn cell_as_bool(&self, row: usize, column: &str) -> core::result::Result<Option<bool>, ParseError> {
        self.coerce(row, column, ColumnType::Boolean, schema::parse_bool)
    }

    /// Read every column named by `schema` from one row
    ///
    /// Columns the schema names but the table lacks come back as `Ok(None)`, so one schema can be
    /// used for tables from both games.
    pub fn typed_row(&self, row: usize, schema: &ColumnSchema) -> Result<TypedRow> {
        if row >= self.rows.len() {
            return Err(Error::RowNotFound(row));
        }

        Ok(schema
            .iter()
            .map(|(column, column_type)| {
                let value = match self.cell(row, column) {
                    None => Ok(None),
                    Some(text) => column_type.parse(text).map(Some).ok_or_else(|| ParseError {
                        row,
                        column: column.to_owned(),
                        value: text.to_owned(),
                        expected: *column_type,
                    }),
                };
                (column.to_owned(), value)
            })
            .collect())
    }

    fn coerce<T>(
        &self,
        row: usize,
        column: &str,
        expected: ColumnType,
        parse: fn(&str) -> Option<T>,
    ) -> core::result::Result<Option<T>, ParseError> {
        let Some(text) = self.cell(row, column) else {
            return Ok(None);
        };

        parse(text).map(Some).ok_or_else(|| ParseError {
            row,
            column: column.to_owned(),
            value: text.to_owned(),
            expected,
        })
    }
}

/// Mutation
///
/// Every method keeps each row exactly as wide as the column list.
impl TwoDA {
    /// Append a column, filling existing rows with `default`. Returns the column position.
    #[instrument(skip_all, err)]
    pub fn add_column(&mut self, name: impl Into<String>, default: Cell) -> Result<usize> {
        let name = name.into();
        if self.columns.contains(&name) {
            return Err(Error::DuplicateColumn(name));
        }

        let (index, _) = self.columns.insert_full(name);
        for row in &mut self.rows {
            row.cells.push(default.clone());
        }
        Ok(index)
    }

    /// Remove a column and its cells
    #[instrument(skip(self), err)]
    pub fn remove_column(&mut self, name: &str) -> Result<()> {
        let Some((index, _)) = self.columns.shift_remove_full(name) else {
            return Err(Error::ColumnNotFound(name.to_owned()));
        };

        for row in &mut self.rows {
            row.cells.remove(index);
        }
        Ok(())
    }

    /// Rename a column in place
    pub fn rename_column(&mut self, from: &str, to: impl Into<String>) -> Result<()> {
        let to = to.into();
        if !self.columns.contains(from) {
            return Err(Error::ColumnNotFound(from.to_owned()));
        }
        if from != to && self.columns.contains(&to) {
            return Err(Error::DuplicateColumn(to));
        }

        self.columns = self
            .columns
            .drain(..)
            .map(|column| if column == from { to.clone() } else { column })
            .collect();
        Ok(())
    }

    /// Append a row of empty cells and return its index
    ///
    /// Without a label the row is labelled with its index, as the games' own tables are.
    pub fn add_row(&mut self, label: Option<String>) -> usize {
        let index = self.rows.len();
        self.rows.push(Row {
            label: label.unwrap_or_else(|| index.to_string()),
            cells: vec![Cell::Empty; self.columns.len()],
        });
        index
    }

    /// Remove a row. Rows after it move up by one index.
    pub fn remove_row(&mut self, row: usize) -> Result<Row> {
        if row >= self.rows.len() {
            return Err(Error::RowNotFound(row));
        }
        Ok(self.rows.remove(row))
    }

    /// Store a value in a cell
    pub fn set_cell(&mut self, row: usize, column: &str, value: impl Into<Cell>) -> Result<()> {
        let index = self
            .column_index(column)
            .ok_or_else(|| Error::ColumnNotFound(column.to_owned()))?;
        let target = self.rows.get_mut(row).ok_or(Error::RowNotFound(row))?;
        target.cells[index] = value.into();
        Ok(())
    }

    /// Mark a cell empty
    pub fn clear_cell(&mut self, row: usize, column: &str) -> Result<()> {
        self.set_cell(row, column, Cell::Empty)
    }

    /// Change the cosmetic label of a row
    pub fn set_row_label(&mut self, row: usize, label: impl Into<String>) -> Result<()> {
        let target = self.rows.get_mut(row).ok_or(Error::RowNotFound(row))?;
        target.label = label.into();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use kotor_common::StrRef;
    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::schema::ColumnType;
    use crate::types::{Cell, TwoDA};

    fn appearance() -> Result<TwoDA> {
        let mut table = TwoDA::new(["label", "modela", "race", "normalhead", "walkdist"])?;
        for (label, model, race, head, walk) in [
            ("Bastila", "p_bastbb", "P_BastBB", "", "1.7"),
            ("Carth", "p_carthbb", "P_CarthBB", "0x10", "1.75"),
            ("Broken", "n_bad", "", "twelve", "fast"),
        ] {
            let row = table.add_row(None);
            table.set_cell(row, "label", label)?;
            table.set_cell(row, "modela", model)?;
            if !race.is_empty() {
                table.set_cell(row, "race", race)?;
            }
            if !head.is_empty() {
                table.set_cell(row, "normalhead", head)?;
            }
            table.set_cell(row, "walkdist", walk)?;
        }
        Ok(table)
    }

    #[test]
    fn rejects_duplicate_columns() {
        assert!(matches!(
            TwoDA::new(["label", "label"]),
            Err(Error::DuplicateColumn(column)) if column == "label"
        ));
    }

    #[test]
    fn cell_lookup() -> Result<()> {
        let table = appearance()?;

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(0, "label"), Some("Bastila"));
        assert_eq!(table.cell(0, "normalhead"), None);
        assert_eq!(table.cell(0, "no_such_column"), None);
        assert_eq!(table.cell(9, "label"), None);
        assert_eq!(table.row_label(1), Some("1"));

        Ok(())
    }

    #[test]
    fn typed_cells() -> Result<()> {
        let table = appearance()?;

        assert_eq!(table.cell_as_int(1, "normalhead"), Ok(Some(16)));
        assert_eq!(table.cell_as_int(0, "normalhead"), Ok(None));
        assert_eq!(table.cell_as_float(0, "walkdist"), Ok(Some(1.7)));
        assert_eq!(
            table.cell_as_resref(1, "modela").unwrap().unwrap().as_str(),
            "p_carthbb"
        );

        let err = table.cell_as_int(2, "normalhead").unwrap_err();
        assert_eq!(err.row, 2);
        assert_eq!(err.column, "normalhead");
        assert_eq!(err.value, "twelve");
        assert_eq!(err.expected, ColumnType::Integer);

        assert!(table.cell_as_float(2, "walkdist").is_err());

        Ok(())
    }

    #[test]
    fn strref_and_bool_cells() -> Result<()> {
        let mut table = TwoDA::new(["name", "hostile"])?;
        let row = table.add_row(None);
        table.set_cell(row, "name", "-1")?;
        table.set_cell(row, "hostile", "1")?;
        let row = table.add_row(None);
        table.set_cell(row, "name", "42")?;
        table.set_cell(row, "hostile", "0")?;

        assert_eq!(table.cell_as_strref(0, "name"), Ok(Some(StrRef::INVALID)));
        assert_eq!(table.cell_as_strref(1, "name"), Ok(Some(StrRef::new(42))));
        assert_eq!(table.cell_as_bool(0, "hostile"), Ok(Some(true)));
        assert_eq!(table.cell_as_bool(1, "hostile"), Ok(Some(false)));

        Ok(())
    }

    #[test]
    fn empty_is_distinct_from_empty_string() -> Result<()> {
        let mut table = TwoDA::new(["label"])?;
        let first = table.add_row(None);
        let second = table.add_row(None);

        table.set_cell(first, "label", "")?;
        table.set_cell(second, "label", "x")?;
        table.clear_cell(second, "label")?;

        assert_eq!(table.cell_raw(first, "label"), Some(&Cell::Value(String::new())));
        assert_eq!(table.cell_raw(second, "label"), Some(&Cell::Empty));
        assert_eq!(table.cell(second, "label"), None);

        Ok(())
    }

    #[test]
    fn column_mutations_keep_rows_aligned() -> Result<()> {
        let mut table = appearance()?;

        let index = table.add_column("envmap", Cell::from("default"))?;
        assert_eq!(index, 5);
        assert!(table.rows().iter().all(|row| row.cells().len() == 6));
        assert_eq!(table.cell(2, "envmap"), Some("default"));

        table.remove_column("race")?;
        assert!(table.rows().iter().all(|row| row.cells().len() == 5));
        assert_eq!(table.cell(1, "normalhead"), Some("0x10"));

        table.rename_column("modela", "model_a")?;
        assert_eq!(table.cell(0, "model_a"), Some("p_bastbb"));
        assert!(matches!(
            table.rename_column("model_a", "label"),
            Err(Error::DuplicateColumn(_))
        ));
        assert!(matches!(
            table.add_column("label", Cell::Empty),
            Err(Error::DuplicateColumn(_))
        ));
        assert!(matches!(
            table.set_cell(7, "label", "x"),
            Err(Error::RowNotFound(7))
        ));

        Ok(())
    }

    #[test]
    fn find_row_uses_values_not_labels() -> Result<()> {
        let table = appearance()?;

        assert_eq!(table.find_row("label", "Carth"), Some(1));
        assert_eq!(table.find_row("label", "1"), None);
        assert_eq!(
            table
                .column_values("modela")
                .unwrap()
                .filter_map(Cell::as_str)
                .collect::<Vec<_>>(),
            vec!["p_bastbb", "p_carthbb", "n_bad"]
        );

        Ok(())
    }
}
