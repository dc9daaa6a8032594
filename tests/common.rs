use dancing_xcc::{Constraint, Item, Kind};

/// Items of the classic example from the Wikipedia article on exact cover.
///
/// The only solution is `B, D, F`.
#[allow(dead_code)]
pub fn wikipedia_items(option: &char) -> Vec<u8> {
    match option {
        'A' => vec![0, 3, 6],
        'B' => vec![0, 3],
        'C' => vec![3, 4, 6],
        'D' => vec![2, 4, 5],
        'E' => vec![1, 2, 5, 6],
        'F' => vec![1, 6],
        'G' => vec![2, 4, 5],
        _ => vec![],
    }
}

/// Items 0 to 4 are primary, 5 and 6 are colored secondary items. Options
/// `A` and `D` agree on the color of 6 but not on the color of 5.
///
/// The solutions are `A, B` and `D, E`.
#[allow(dead_code)]
pub fn colored_items(option: &char) -> Vec<Constraint<u8, u8>> {
    use Constraint::{Primary as P, Secondary as S};

    match option {
        'A' => vec![P(0), P(1), P(2), S(5, Some(8)), S(6, Some(7))],
        'B' => vec![P(3), P(4), S(5, Some(8))],
        'C' => vec![P(3), P(4), S(5, Some(9))],
        'D' => vec![P(0), P(1), S(5, Some(9)), S(6, Some(7))],
        'E' => vec![P(2), P(3), P(4), S(5, Some(9))],
        'F' => vec![P(2), P(3), P(4), S(5, Some(8))],
        _ => vec![],
    }
}

/// Four options with the two solutions `A, B` and `C, D`.
#[allow(dead_code)]
pub fn two_solution_items(option: &char) -> Vec<u8> {
    match option {
        'A' => vec![0, 1, 2],
        'B' => vec![3, 4],
        'C' => vec![0, 1],
        'D' => vec![2, 3, 4],
        _ => vec![],
    }
}

/// Constraints of the N-Queens problem. Every row and column needs exactly
/// one queen, every diagonal takes at most one.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueenItem {
    Row(usize),
    Column(usize),
    Diagonal(usize),
    AntiDiagonal(isize),
}

impl Item for QueenItem {
    type Color = ();

    fn kind(&self) -> Kind<()> {
        match self {
            QueenItem::Row(_) | QueenItem::Column(_) => Kind::Primary,
            QueenItem::Diagonal(_) | QueenItem::AntiDiagonal(_) => Kind::Secondary(None),
        }
    }
}

/// Items covered by a queen at `(row, column)`.
#[allow(dead_code)]
pub fn queen_items(&(row, column): &(usize, usize)) -> Vec<QueenItem> {
    vec![
        QueenItem::Row(row),
        QueenItem::Column(column),
        QueenItem::Diagonal(row + column),
        QueenItem::AntiDiagonal(row as isize - column as isize),
    ]
}

/// Every square of an `n` by `n` board.
#[allow(dead_code)]
pub fn queen_placements(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |row| (0..n).map(move |column| (row, column)))
}

/// A value written in a square of a Sudoku grid.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub row: usize,
    pub column: usize,
    pub value: usize,
}

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SudokuItem {
    Cell { row: usize, column: usize },
    RowValue { row: usize, value: usize },
    ColumnValue { column: usize, value: usize },
    BoxValue { square: usize, value: usize },
}

impl Item for SudokuItem {
    type Color = ();
}

/// Return a provider for the placements of a Sudoku whose boxes are
/// `box_side_length` squares wide.
#[allow(dead_code)]
pub fn sudoku_provider(box_side_length: usize) -> impl Fn(&Placement) -> Vec<SudokuItem> {
    move |&Placement { row, column, value }| {
        let square = (row / box_side_length) * box_side_length + column / box_side_length;

        vec![
            SudokuItem::Cell { row, column },
            SudokuItem::RowValue { row, value },
            SudokuItem::ColumnValue { column, value },
            SudokuItem::BoxValue { square, value },
        ]
    }
}

/// Every placement of a Sudoku whose boxes are `box_side_length` squares
/// wide.
#[allow(dead_code)]
pub fn sudoku_placements(box_side_length: usize) -> Vec<Placement> {
    let side_length = box_side_length * box_side_length;

    (0..side_length)
        .flat_map(|row| {
            (0..side_length).flat_map(move |column| {
                (1..=side_length).map(move |value| Placement { row, column, value })
            })
        })
        .collect()
}

/// Parse the given values of a Sudoku puzzle from an input string.
///
/// # Expected Format
///  - 0 denotes an empty value
///  - The numbers are presented in row-major order. So the first `side_length`
///    numbers are the first row, the second `side_length` numbers are the
///    second row, etc.
///
/// # Panics
///  - If the string is not exactly `side_length` * `side_length` characters
///  - If any character in the string is not [0-9]
#[allow(dead_code)]
pub fn parse_sudoku(sudoku_input: &str, box_side_length: usize) -> Vec<Placement> {
    let side_length = box_side_length * box_side_length;

    log::debug!(
        "Parsing sudoku puzzle input [{}] for side length [{}].",
        sudoku_input,
        side_length
    );

    assert_eq!(
        sudoku_input.len(),
        side_length * side_length,
        "Input needs to be `side_length` * `side_length` characters long."
    );

    sudoku_input
        .chars()
        .enumerate()
        .filter_map(|(index, c)| {
            let value = c.to_digit(10).expect("Input must only contain digits.") as usize;

            (value != 0).then(|| Placement {
                row: index / side_length,
                column: index % side_length,
                value,
            })
        })
        .collect()
}

/// Format a list of placements into a string format matching the input of
/// `parse_sudoku`.
///
/// # Panics
///  - Panics if there is more that one `Placement` with the same (row,
///    column) values.
///  - Panics if any of the `Placement.value` has more than a single digit.
#[allow(dead_code)]
pub fn format_sudoku<'a>(
    placements: impl IntoIterator<Item = &'a Placement>,
    box_side_length: usize,
) -> String {
    let side_length = box_side_length * box_side_length;
    let mut output = vec![b'0'; side_length * side_length];

    for placement in placements {
        let index = placement.row * side_length + placement.column;
        assert_eq!(
            output[index], b'0',
            "Overwriting an existing value at position [{},{}]",
            placement.row, placement.column
        );

        let formatted_value = placement.value.to_string();
        assert_eq!(formatted_value.len(), 1);
        output[index] = formatted_value.as_bytes()[0];
    }

    String::from_utf8(output).unwrap()
}

/// Install a logger for the test run, ignoring any logger installed by
/// another test.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
