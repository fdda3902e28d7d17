use arrayvec::ArrayVec;

use crate::{
    board::Board,
    game::Game,
    moves::Move,
    player::Player,
    square::Square,
    tile::TileColour,
};

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const OMNI: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

// Five pawns, at most eight directions each.
const MAX_BASE_MOVES: usize = 40;

impl Game {
    /// All legal moves for the side to move: every pawn step or jump, each
    /// optionally combined with every affordable tile placement. Placements
    /// are enumerated against the current board, before the pawn moves.
    pub fn possible_moves(&self) -> Vec<Move> {
        let mover = self.to_move;
        let mut base: ArrayVec<Move, MAX_BASE_MOVES> = ArrayVec::new();

        for (square, cell) in self.board.iter() {
            if cell.occupant != Some(mover) {
                continue;
            }
            let directions: &[(i8, i8)] = match cell.tile {
                None => &ORTHOGONAL,
                Some(TileColour::Black) => &DIAGONAL,
                Some(TileColour::Gray) => &OMNI,
            };
            for &(dx, dy) in directions {
                if let Some(to) = step_or_jump(&self.board, mover, square, dx, dy) {
                    base.push(Move::step(square, to));
                }
            }
        }

        let stock = self.stock(mover);
        let mut moves = Vec::with_capacity(base.len());
        for &m in &base {
            moves.push(m);
            for colour in [TileColour::Black, TileColour::Gray] {
                if stock.count(colour) == 0 {
                    continue;
                }
                for (at, cell) in self.board.iter() {
                    if cell.is_bare() {
                        moves.push(m.with_placement(at, colour));
                    }
                }
            }
        }
        moves
    }
}

/// A step onto an adjacent empty square, or a jump along the direction over a
/// contiguous chain of friendly pawns onto the first empty square. Opponent
/// pawns and the board edge block.
fn step_or_jump(board: &Board, mover: Player, from: Square, dx: i8, dy: i8) -> Option<Square> {
    let mut square = from.step(dx, dy)?;
    match board[square].occupant {
        None => Some(square),
        Some(p) if p != mover => None,
        Some(_) => {
            while board[square].occupant == Some(mover) {
                square = square.step(dx, dy)?;
            }
            board[square].is_empty().then_some(square)
        }
    }
}
