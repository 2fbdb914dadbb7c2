use crate::spreadsheet::cell::Cell;

/// Represents a sheet from a spreadsheet file with its cells in document order.
#[derive(Debug)]
pub struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells in the sheet, row-major
    pub(crate) cells: Vec<Cell>,
    /// Actual data range (determined from cell data)
    pub(crate) row_lower_bound: Option<usize>,
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_lower_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    /// Creates an empty sheet.
    pub(crate) fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
            row_lower_bound: None,
            row_upper_bound: None,
            col_lower_bound: None,
            col_upper_bound: None,
        }
    }

    /// Sheet name as listed in the workbook.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the sheet contains no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds a cell to the sheet, updating the data range.
    pub(crate) fn push(&mut self, cell: Cell) {
        self.update_bound(cell.row, cell.col);
        self.cells.push(cell);
    }

    /// Updates the actual data range boundaries based on cell positions.
    fn update_bound(&mut self, row: usize, col: usize) {
        if self.row_lower_bound.map(|row_lower_bound| row < row_lower_bound).unwrap_or(true) {
            self.row_lower_bound = Some(row);
        }
        if self.row_upper_bound.map(|row_upper_bound| row_upper_bound < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
        if self.col_lower_bound.map(|col_lower_bound| col < col_lower_bound).unwrap_or(true) {
            self.col_lower_bound = Some(col);
        }
        if self.col_upper_bound.map(|col_upper_bound| col_upper_bound < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }

    /// Returns every populated row as a dense record spanning the column bounds.
    /// Rows without any cell are not returned.
    pub(crate) fn rows(&self) -> Vec<(usize, Vec<Option<&Cell>>)> {
        let (col_lower, col_upper) = match self.col_lower_bound.zip(self.col_upper_bound) {
            Some(bounds) => bounds,
            None => return Vec::new(),
        };
        let mut cells: Vec<&Cell> = self.cells.iter().collect();
        cells.sort_by_key(|cell| (cell.row, cell.col));

        let mut table = Vec::<(usize, Vec<Option<&Cell>>)>::new();
        for cell in cells {
            if table.last().map(|(row, _)| *row != cell.row).unwrap_or(true) {
                table.push((cell.row, vec![None; col_upper - col_lower + 1]));
            }
            if let Some((_, record)) = table.last_mut() {
                record[cell.col - col_lower] = Some(cell);
            }
        }
        table
    }
}
