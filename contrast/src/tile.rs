use crate::player::Player;

/// Colour of a floor tile. Tiles belong to the board, not to a side: a black
/// tile under a pawn changes its movement no matter whose pawn it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileColour {
    Black,
    Gray,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    pub occupant: Option<Player>,
    pub tile: Option<TileColour>,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    /// Free for a tile placement: no pawn and no tile already there.
    pub fn is_bare(&self) -> bool {
        self.occupant.is_none() && self.tile.is_none()
    }
}
