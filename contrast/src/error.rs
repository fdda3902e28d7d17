use std::{error::Error, fmt::Display};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayError {
    EmptySquare,
    NotYourPawn,
    DestinationOccupied,
    PlacementBlocked,
    NoTilesLeft,
}

impl Display for PlayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use PlayError::*;
        write!(f, "{}", match self {
            EmptySquare => "cannot move from an empty square",
            NotYourPawn => "cannot move a pawn that you do not own",
            DestinationOccupied => "destination square is occupied",
            PlacementBlocked => "tiles can only be placed on empty squares without a tile",
            NoTilesLeft => "no tiles of that colour left in stock",
        })
    }
}

impl Error for PlayError {}
