//! Slicing a worksheet's value grid into a [`Frame`], and the reverse.
use tabular::Frame;

use crate::CellRef;

/// Which part of a worksheet [`frame_from_values`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions<'a> {
    /// Top left cell of the block, header row included.
    pub start_cell: &'a str,
    /// Last row to read (1-based). Defaults to the last row with data.
    pub end_row: Option<u32>,
    /// Letters of the last column to read. Defaults to the last column with data.
    pub end_column: Option<&'a str>,
    /// Use the first row of the block as column names.
    pub include_header: bool,
}

impl Default for ReadOptions<'_> {
    fn default() -> Self {
        Self {
            start_cell: "A1",
            end_row: None,
            end_column: None,
            include_header: true,
        }
    }
}

impl<'a> ReadOptions<'a> {
    pub fn starting_at(start_cell: &'a str) -> Self {
        Self {
            start_cell,
            ..Self::default()
        }
    }

    pub fn without_header(mut self) -> Self {
        self.include_header = false;
        self
    }
}

/// Names blank entries `column0`, `column1`, ... with one counter shared by every blank, then
/// appends more placeholders until there are `len` names.
pub fn fill_columns(columns: &mut Vec<String>, len: usize) {
    let mut count = 0;

    for idx in 0..len {
        match columns.get_mut(idx) {
            Some(name) if name.is_empty() => {
                *name = format!("column{count}");
                count += 1;
            }
            Some(_) => (),
            None => {
                columns.push(format!("column{count}"));
                count += 1;
            }
        }
    }
}

/// Rows `first_row..=last_row` and columns `first_col..=last_col` (1-based) shaped the way the
/// values API returns a range: trailing blank cells are cut from each row and trailing blank
/// rows are dropped.
fn slice(
    grid: &[Vec<String>],
    first_row: usize,
    last_row: usize,
    first_col: usize,
    last_col: usize,
) -> Vec<Vec<String>> {
    if first_row == 0 || first_col == 0 || first_row > last_row || first_col > last_col {
        return Vec::new();
    }

    let mut rows = grid
        .iter()
        .skip(first_row - 1)
        .take(last_row + 1 - first_row)
        .map(|row| {
            let mut cells = row
                .iter()
                .skip(first_col - 1)
                .take(last_col + 1 - first_col)
                .cloned()
                .collect::<Vec<_>>();

            while cells.last().is_some_and(String::is_empty) {
                cells.pop();
            }
            cells
        })
        .collect::<Vec<_>>();

    while rows.last().is_some_and(Vec::is_empty) {
        rows.pop();
    }

    rows
}

fn to_cells(row: Vec<String>) -> Vec<Option<String>> {
    row.into_iter()
        .map(|cell| (!cell.is_empty()).then_some(cell))
        .collect()
}

/// Reads a block out of a worksheet's full value grid. `None` if the worksheet is empty.
///
/// With a header, blank names are filled by [`fill_columns`] and the names are truncated to
/// the widest data row. A worksheet with only one row gives a frame with that row as its
/// columns and no data. Without a header, columns are named by position from `"0"`. Empty
/// strings become absent cells either way.
pub fn frame_from_values(
    grid: &[Vec<String>],
    options: &ReadOptions<'_>,
) -> crate::Result<Option<Frame>> {
    let height = grid.len();
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);

    if height == 0 || width == 0 {
        return Ok(None);
    }

    let (start_row, start_col) = CellRef::require(options.start_cell)?;
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    let end_row = match options.end_row {
        Some(row) if row > 0 && (row as usize) <= height => row as usize,
        _ => height,
    };

    let end_col = match options
        .end_column
        .and_then(|column| CellRef::parse(column).column)
    {
        Some(col) if (col as usize) <= width => col as usize,
        _ => width,
    };

    if !options.include_header {
        let rows = slice(grid, start_row, end_row, start_col, end_col);
        let num_columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let columns = (0..num_columns).map(|idx| idx.to_string()).collect();

        return Ok(Some(Frame::from_ragged(
            columns,
            rows.into_iter().map(to_cells).collect(),
        )));
    }

    if height == 1 {
        let mut columns = grid[0].clone();
        columns.resize(width, String::new());
        return Ok(Some(Frame::new(columns)));
    }

    let mut columns = slice(grid, start_row, start_row, start_col, end_col)
        .into_iter()
        .next()
        .unwrap_or_default();
    fill_columns(&mut columns, (end_col + 1).saturating_sub(start_col));

    let rows = slice(grid, start_row + 1, end_row, start_col, end_col);

    if let Some(widest) = rows.iter().map(Vec::len).max() {
        columns.truncate(widest);
    }

    Ok(Some(Frame::from_ragged(
        columns,
        rows.into_iter().map(to_cells).collect(),
    )))
}

/// The block [`crate::SheetsService::write_frame`] writes: an optional header row, then every
/// row with absent cells as empty strings.
pub fn frame_to_values(frame: &Frame, include_header: bool) -> Vec<Vec<String>> {
    let mut values = Vec::with_capacity(frame.num_rows() + 1);

    if include_header {
        values.push(frame.columns().to_vec());
    }

    values.extend(frame.rows().iter().map(|row| {
        row.iter()
            .map(|cell| cell.clone().unwrap_or_default())
            .collect::<Vec<_>>()
    }));

    values
}
