use std::fmt;

use crate::{square::Square, tile::TileColour};

/// Dropping a tile from the mover's stock onto a bare square, combined with a
/// pawn move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    pub at: Square,
    pub colour: TileColour,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub placement: Option<Placement>,
}

impl Move {
    pub fn step(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            placement: None,
        }
    }

    #[must_use]
    pub fn with_placement(self, at: Square, colour: TileColour) -> Self {
        Move {
            placement: Some(Placement { at, colour }),
            ..self
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)?;
        if let Some(Placement { at, colour }) = self.placement {
            let c = match colour {
                TileColour::Black => 'b',
                TileColour::Gray => 'g',
            };
            write!(f, "+{c}{at}")?;
        }
        Ok(())
    }
}
