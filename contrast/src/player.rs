#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    Black,
    White,
}

impl Player {
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Home row of the *opponent*, i.e. the row this player is trying to reach.
    pub fn target_row(self) -> usize {
        match self {
            Player::Black => crate::board::HEIGHT - 1,
            Player::White => 0,
        }
    }
}
