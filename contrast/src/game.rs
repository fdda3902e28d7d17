use std::fmt;

use crate::{
    board::Board,
    error::PlayError,
    moves::{Move, Placement},
    player::Player,
    tile::TileColour,
};

/// Plies after which the game is scored a draw. The pawn-and-tile rules have
/// no natural draw, so shuffling games must be cut off somewhere.
pub const TURN_LIMIT: u32 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    Winner(Player),
    Draw,
    Ongoing,
}

/// Per-side stock of unplaced tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileStock {
    pub black: u8,
    pub gray: u8,
}

impl Default for TileStock {
    fn default() -> Self {
        TileStock { black: 3, gray: 1 }
    }
}

impl TileStock {
    pub fn count(&self, colour: TileColour) -> u8 {
        match colour {
            TileColour::Black => self.black,
            TileColour::Gray => self.gray,
        }
    }

    fn take(&mut self, colour: TileColour) {
        match colour {
            TileColour::Black => self.black -= 1,
            TileColour::Gray => self.gray -= 1,
        }
    }
}

/// A full position: board, side to move, and both tile stocks. Cheap to copy,
/// so searchers work on scratch clones and never mutate the caller's state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Game {
    pub board: Board,
    pub to_move: Player,
    pub black_stock: TileStock,
    pub white_stock: TileStock,
    pub ply: u32,
}

impl Default for Game {
    fn default() -> Self {
        Game {
            board: Board::default(),
            to_move: Player::Black,
            black_stock: TileStock::default(),
            white_stock: TileStock::default(),
            ply: 0,
        }
    }
}

impl Game {
    pub fn stock(&self, player: Player) -> &TileStock {
        match player {
            Player::Black => &self.black_stock,
            Player::White => &self.white_stock,
        }
    }

    pub fn stock_mut(&mut self, player: Player) -> &mut TileStock {
        match player {
            Player::Black => &mut self.black_stock,
            Player::White => &mut self.white_stock,
        }
    }

    /// Apply a move for the side to move. Validates ownership, occupancy and
    /// stock; the movement path itself is trusted (searchers and drivers only
    /// play moves produced by `possible_moves`).
    pub fn play(&mut self, my_move: Move) -> Result<(), PlayError> {
        let mover = self.to_move;
        match self.board[my_move.from].occupant {
            None => return Err(PlayError::EmptySquare),
            Some(p) if p != mover => return Err(PlayError::NotYourPawn),
            Some(_) => {}
        }
        if self.board[my_move.to].occupant.is_some() {
            return Err(PlayError::DestinationOccupied);
        }
        if let Some(Placement { at, colour }) = my_move.placement {
            if !self.board[at].is_bare() {
                return Err(PlayError::PlacementBlocked);
            }
            if self.stock(mover).count(colour) == 0 {
                return Err(PlayError::NoTilesLeft);
            }
            self.board[at].tile = Some(colour);
            self.stock_mut(mover).take(colour);
        }

        self.board[my_move.from].occupant = None;
        self.board[my_move.to].occupant = Some(mover);
        self.to_move = mover.next();
        self.ply += 1;
        Ok(())
    }

    /// Did `player` already win by reaching the far row?
    pub fn is_win(&self, player: Player) -> bool {
        self.board.reached_target_row(player)
    }

    pub fn result(&self) -> GameResult {
        // The previous mover may have just reached their target row.
        let opponent = self.to_move.next();
        if self.is_win(opponent) {
            return GameResult::Winner(opponent);
        }
        if self.is_win(self.to_move) {
            return GameResult::Winner(self.to_move);
        }
        if self.possible_moves().is_empty() {
            return GameResult::Winner(opponent);
        }
        if self.ply >= TURN_LIMIT {
            return GameResult::Draw;
        }
        GameResult::Ongoing
    }

    /// FNV-1a content hash over cells, side to move and both stocks.
    pub fn hash(&self) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;
        let mut hash = OFFSET;
        let mut mix = |value: u64| {
            hash ^= value;
            hash = hash.wrapping_mul(PRIME);
        };
        for (_, cell) in self.board.iter() {
            mix(match cell.occupant {
                None => 0,
                Some(Player::Black) => 1,
                Some(Player::White) => 2,
            });
            mix(match cell.tile {
                None => 0,
                Some(TileColour::Black) => 1,
                Some(TileColour::Gray) => 2,
            });
        }
        mix(match self.to_move {
            Player::Black => 1,
            Player::White => 2,
        });
        mix(u64::from(self.black_stock.black) << 8 | u64::from(self.black_stock.gray));
        mix(u64::from(self.white_stock.black) << 8 | u64::from(self.white_stock.gray));
        hash
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        writeln!(
            f,
            "to move: {:?}  stocks B{{b{} g{}}} W{{b{} g{}}}  ply {}",
            self.to_move,
            self.black_stock.black,
            self.black_stock.gray,
            self.white_stock.black,
            self.white_stock.gray,
            self.ply
        )
    }
}
