use crate::{
    board::{Board, HEIGHT, WIDTH},
    moves::Move,
    player::Player,
    square::Square,
    tile::{Cell, TileColour},
};

/// The board admits exactly two symmetries. There is no rotational symmetry:
/// Black always advances down the board and White up it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symmetry {
    Identity,
    Mirror,
}

fn cell_code(cell: &Cell) -> u8 {
    let occupant = match cell.occupant {
        None => 0,
        Some(Player::Black) => 1,
        Some(Player::White) => 2,
    };
    let tile = match cell.tile {
        None => 0,
        Some(TileColour::Black) => 1,
        Some(TileColour::Gray) => 2,
    };
    occupant * 3 + tile
}

impl Board {
    /// Reflect along the vertical axis.
    #[must_use]
    pub fn mirrored(&self) -> Board {
        let mut mirrored = *self;
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                mirrored[Square::new(x, y)] = self[Square::new(x, y).mirrored()];
            }
        }
        mirrored
    }

    /// The representative of this board's symmetry class: whichever of the
    /// board and its mirror has the lexicographically smaller cell-code
    /// sequence. Both members of a class canonicalise to the same board.
    pub fn canonical(&self) -> (Symmetry, Board) {
        let mirrored = self.mirrored();
        let original_codes = self.iter().map(|(_, cell)| cell_code(cell));
        let mirrored_codes = mirrored.iter().map(|(_, cell)| cell_code(cell));
        if mirrored_codes.lt(original_codes) {
            (Symmetry::Mirror, mirrored)
        } else {
            (Symmetry::Identity, *self)
        }
    }
}

impl Move {
    #[must_use]
    pub fn mirrored(self) -> Move {
        Move {
            from: self.from.mirrored(),
            to: self.to.mirrored(),
            placement: self.placement.map(|p| crate::moves::Placement {
                at: p.at.mirrored(),
                colour: p.colour,
            }),
        }
    }
}
