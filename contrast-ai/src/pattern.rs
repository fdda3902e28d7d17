use contrast::{Board, Cell, Player, Square, TileColour};

/// Cell states per feature: pawns and tiles are looked up in separate tables,
/// so each reads as one of three states rather than nine combined ones.
pub const ALPHABET: usize = 3;

/// A fixed set of board cells (linearised indices, y*5+x) whose joint state
/// is one evaluation feature.
#[derive(Clone, Copy, Debug)]
pub struct Pattern {
    cells: &'static [usize],
}

impl Pattern {
    const fn new(cells: &'static [usize]) -> Self {
        Pattern { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &'static [usize] {
        self.cells
    }

    /// Number of joint states, and so the weight-table size: 3^len.
    pub fn table_size(&self) -> usize {
        ALPHABET.pow(self.cells.len() as u32)
    }

    /// Fold the pawns on this pattern's cells into a base-3 index, seen from
    /// `perspective`. Cells off the board read as empty.
    pub fn occupant_index(&self, board: &Board, perspective: Player) -> usize {
        self.cells.iter().fold(0, |index, &cell| {
            index * ALPHABET + encode_occupant(board.get(Square::from_index(cell)), perspective)
        })
    }

    /// Fold the tiles on this pattern's cells into a base-3 index. Tile
    /// colours are board facts, not sides, so no perspective applies.
    pub fn tile_index(&self, board: &Board) -> usize {
        self.cells.iter().fold(0, |index, &cell| {
            index * ALPHABET + encode_tile(board.get(Square::from_index(cell)))
        })
    }
}

pub fn encode_occupant(cell: Option<&Cell>, perspective: Player) -> usize {
    match cell.and_then(|c| c.occupant) {
        None => 0,
        Some(p) if p == perspective => 1,
        Some(_) => 2,
    }
}

pub fn encode_tile(cell: Option<&Cell>) -> usize {
    match cell.and_then(|c| c.tile) {
        None => 0,
        Some(TileColour::Black) => 1,
        Some(TileColour::Gray) => 2,
    }
}

/* cell numbering:
 0  1  2  3  4
 5  6  7  8  9
10 11 12 13 14
15 16 17 18 19
20 21 22 23 24
*/
pub const PATTERNS: [Pattern; 16] = [
    // 5x2 horizontal bands
    Pattern::new(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
    Pattern::new(&[5, 6, 7, 8, 9, 10, 11, 12, 13, 14]),
    Pattern::new(&[10, 11, 12, 13, 14, 15, 16, 17, 18, 19]),
    Pattern::new(&[15, 16, 17, 18, 19, 20, 21, 22, 23, 24]),
    // 2x5 vertical bands
    Pattern::new(&[0, 5, 10, 15, 20, 1, 6, 11, 16, 21]),
    Pattern::new(&[1, 6, 11, 16, 21, 2, 7, 12, 17, 22]),
    Pattern::new(&[2, 7, 12, 17, 22, 3, 8, 13, 18, 23]),
    // 3x3 squares
    Pattern::new(&[0, 1, 2, 5, 6, 7, 10, 11, 12]),
    Pattern::new(&[1, 2, 3, 6, 7, 8, 11, 12, 13]),
    Pattern::new(&[5, 6, 7, 10, 11, 12, 15, 16, 17]),
    Pattern::new(&[6, 7, 8, 11, 12, 13, 16, 17, 18]),
    Pattern::new(&[10, 11, 12, 15, 16, 17, 20, 21, 22]),
    Pattern::new(&[11, 12, 13, 16, 17, 18, 21, 22, 23]),
    // top row with a descending arm
    Pattern::new(&[0, 1, 2, 3, 4, 5, 10, 15, 20]),
    Pattern::new(&[0, 1, 2, 3, 4, 6, 11, 16, 21]),
    Pattern::new(&[0, 1, 2, 3, 4, 7, 12, 17, 22]),
];
