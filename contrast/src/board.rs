use std::{
    fmt,
    ops::{Index, IndexMut},
};

use crate::{player::Player, square::Square, tile::Cell};

pub const WIDTH: usize = 5;
pub const HEIGHT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; WIDTH * HEIGHT],
}

impl Default for Board {
    /// Starting position: Black's five pawns on row 0, White's on the last row.
    fn default() -> Self {
        let mut board = Board {
            cells: [Cell::default(); WIDTH * HEIGHT],
        };
        for x in 0..WIDTH {
            board[Square::new(x, 0)].occupant = Some(Player::Black);
            board[Square::new(x, HEIGHT - 1)].occupant = Some(Player::White);
        }
        board
    }
}

impl Index<Square> for Board {
    type Output = Cell;

    fn index(&self, square: Square) -> &Self::Output {
        &self.cells[square.index()]
    }
}

impl IndexMut<Square> for Board {
    fn index_mut(&mut self, square: Square) -> &mut Self::Output {
        &mut self.cells[square.index()]
    }
}

impl Board {
    pub fn get(&self, square: Square) -> Option<&Cell> {
        self.cells.get(square.index())
    }

    pub fn squares() -> impl Iterator<Item = Square> {
        (0..WIDTH * HEIGHT).map(Square::from_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Square, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (Square::from_index(i), cell))
    }

    /// Does `player` have a pawn on the row they are trying to reach?
    pub fn reached_target_row(&self, player: Player) -> bool {
        let y = player.target_row();
        (0..WIDTH).any(|x| self[Square::new(x, y)].occupant == Some(player))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let cell = self[Square::new(x, y)];
                let occupant = match cell.occupant {
                    Some(Player::Black) => 'B',
                    Some(Player::White) => 'W',
                    None => '.',
                };
                let tile = match cell.tile {
                    Some(crate::tile::TileColour::Black) => 'b',
                    Some(crate::tile::TileColour::Gray) => 'g',
                    None => ' ',
                };
                write!(f, "{occupant}{tile} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
