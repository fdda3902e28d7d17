use contrast::{Board, Game, Player};

use crate::pattern::{encode_occupant, encode_tile, ALPHABET, PATTERNS};

/// Stock feature cardinality: black count clamped to 0..=3, gray to 0..=1.
pub const STOCK_STATES: usize = 8;

/// The pattern network. Weights are stored and trained from Black's point of
/// view; evaluating for White negates the summed value. That single sign flip
/// is what keeps the evaluator, both searchers and the learner agreeing on
/// "positive favours whoever moves next".
///
/// Cloning duplicates every table, so searchers and learners can each own a
/// copy without ever sharing mutable arrays.
#[derive(Clone, Debug)]
pub struct Evaluator {
    pub(crate) occupant_tables: Vec<Vec<f32>>,
    pub(crate) tile_tables: Vec<Vec<f32>>,
    pub(crate) stock_table: Vec<f32>,
}

impl Default for Evaluator {
    fn default() -> Self {
        let initial = 0.5 / (PATTERNS.len() as f32 + 1.0);
        Evaluator {
            occupant_tables: PATTERNS
                .iter()
                .map(|p| vec![initial; p.table_size()])
                .collect(),
            tile_tables: PATTERNS
                .iter()
                .map(|p| vec![initial; p.table_size()])
                .collect(),
            stock_table: vec![initial; STOCK_STATES],
        }
    }
}

fn stock_index(black: u8, gray: u8) -> usize {
    black.min(3) as usize * 2 + gray.min(1) as usize
}

/// Pick the representative of {board, mirror} by comparing the cell codes the
/// tables are actually indexed with (pawns seen from `perspective`, tiles
/// as-is). Keying the choice on perspective-relative codes is what makes a
/// colour-swapped position select the matching representative, so the
/// perspective antisymmetry of `evaluate` holds exactly.
fn canonical_for(board: &Board, perspective: Player) -> Board {
    let mirrored = board.mirrored();
    let code = |cell| encode_occupant(Some(cell), perspective) * ALPHABET + encode_tile(Some(cell));
    let original_codes = board.iter().map(|(_, cell)| code(cell));
    let mirrored_codes = mirrored.iter().map(|(_, cell)| code(cell));
    if mirrored_codes.lt(original_codes) {
        mirrored
    } else {
        *board
    }
}

impl Evaluator {
    /// Value of the position for the side to move. Positive is good for them.
    pub fn evaluate(&self, game: &Game) -> f32 {
        let mover = game.to_move;
        let board = canonical_for(&game.board, mover);

        let mut value = 0.0;
        for (pattern, table) in PATTERNS.iter().zip(&self.occupant_tables) {
            value += table[pattern.occupant_index(&board, mover)];
        }
        for (pattern, table) in PATTERNS.iter().zip(&self.tile_tables) {
            value += table[pattern.tile_index(&board)];
        }
        let stock = game.stock(mover);
        value += self.stock_table[stock_index(stock.black, stock.gray)];

        if mover == Player::White {
            -value
        } else {
            value
        }
    }

    /// One TD(0) step: nudge every feature active in this position so the
    /// estimate moves toward `target`. The step is split evenly across the
    /// active cells, keeping the combined update independent of how many
    /// tables there are.
    pub fn td_update(&mut self, game: &Game, target: f32, learning_rate: f32) {
        let mover = game.to_move;
        let board = canonical_for(&game.board, mover);

        let occupant_indices: Vec<usize> = PATTERNS
            .iter()
            .map(|p| p.occupant_index(&board, mover))
            .collect();
        let tile_indices: Vec<usize> = PATTERNS.iter().map(|p| p.tile_index(&board)).collect();
        let stock = game.stock(mover);
        let stock_idx = stock_index(stock.black, stock.gray);

        let mut raw = 0.0;
        for (table, &index) in self.occupant_tables.iter().zip(&occupant_indices) {
            raw += table[index];
        }
        for (table, &index) in self.tile_tables.iter().zip(&tile_indices) {
            raw += table[index];
        }
        raw += self.stock_table[stock_idx];

        let estimate = if mover == Player::White { -raw } else { raw };
        let mut error = target - estimate;
        if mover == Player::White {
            // back into the reference frame the tables are stored in
            error = -error;
        }

        let components = (2 * PATTERNS.len() + 1) as f32;
        let step = learning_rate / components * error;
        for (table, &index) in self.occupant_tables.iter_mut().zip(&occupant_indices) {
            table[index] += step;
        }
        for (table, &index) in self.tile_tables.iter_mut().zip(&tile_indices) {
            table[index] += step;
        }
        self.stock_table[stock_idx] += step;
    }

    pub fn num_weights(&self) -> usize {
        self.occupant_tables.iter().map(Vec::len).sum::<usize>()
            + self.tile_tables.iter().map(Vec::len).sum::<usize>()
            + self.stock_table.len()
    }
}

#[cfg(test)]
mod tests {
    use contrast::{Board, Game, Player, Square, TileColour, TileStock};

    use super::{stock_index, Evaluator};

    /// Swap piece colours, tile colours, stocks, and the side to move.
    fn colour_swapped(game: &Game) -> Game {
        let mut swapped = *game;
        for square in Board::squares() {
            swapped.board[square].occupant = game.board[square].occupant.map(Player::next);
            swapped.board[square].tile = game.board[square].tile.map(|t| match t {
                TileColour::Black => TileColour::Gray,
                TileColour::Gray => TileColour::Black,
            });
        }
        swapped.black_stock = game.white_stock;
        swapped.white_stock = game.black_stock;
        swapped.to_move = game.to_move.next();
        swapped
    }

    /// A scattering of pawns with no tiles on the board.
    fn tileless_position() -> Game {
        let mut game = Game::default();
        game.board[Square::new(2, 0)].occupant = None;
        game.board[Square::new(2, 2)].occupant = Some(Player::Black);
        game.board[Square::new(1, 4)].occupant = None;
        game.board[Square::new(1, 3)].occupant = Some(Player::White);
        game.black_stock = TileStock { black: 2, gray: 1 };
        game.white_stock = TileStock { black: 3, gray: 0 };
        game
    }

    /// De-uniformise the tables with a few deterministic updates.
    fn trained() -> Evaluator {
        let mut evaluator = Evaluator::default();
        let mut game = Game::default();
        for i in 0..12 {
            let moves = game.possible_moves();
            evaluator.td_update(&game, 0.2 * i as f32 - 1.0, 0.5);
            game.play(moves[i * 7 % moves.len()]).unwrap();
        }
        evaluator
    }

    #[test]
    fn perspective_antisymmetry_with_default_weights() {
        let evaluator = Evaluator::default();
        let mut game = Game::default();
        game.board[Square::new(3, 2)].tile = Some(TileColour::Gray);
        let swapped = colour_swapped(&game);
        assert!((evaluator.evaluate(&game) + evaluator.evaluate(&swapped)).abs() < 1e-3);
    }

    #[test]
    fn perspective_antisymmetry_with_trained_weights() {
        // Train on tile-free positions only, so the tile tables stay
        // symmetric and the swap identity is exact.
        let mut evaluator = Evaluator::default();
        let mut game = tileless_position();
        for i in 0..10 {
            evaluator.td_update(&game, 0.3 * i as f32 - 1.2, 0.4);
            let moves = game.possible_moves();
            let plain: Vec<_> = moves.iter().filter(|m| m.placement.is_none()).collect();
            game.play(*plain[i % plain.len()]).unwrap();
        }

        for probe in [tileless_position(), game] {
            let swapped = colour_swapped(&probe);
            let value = evaluator.evaluate(&probe);
            let swapped_value = evaluator.evaluate(&swapped);
            assert!(
                (value + swapped_value).abs() < 1e-5,
                "{value} vs {swapped_value}"
            );
            assert!(value.abs() > 1e-6, "trained evaluation should be nonzero");
        }
    }

    #[test]
    fn mirror_invariance() {
        let evaluator = trained();
        let mut game = Game::default();
        game.board[Square::new(0, 1)].occupant = Some(Player::Black);
        game.board[Square::new(0, 0)].occupant = None;
        game.board[Square::new(4, 2)].tile = Some(TileColour::Black);

        let mut mirrored = game;
        mirrored.board = game.board.mirrored();
        assert_eq!(evaluator.evaluate(&game), evaluator.evaluate(&mirrored));
    }

    #[test]
    fn td_update_moves_the_estimate_by_the_learning_rate() {
        for mover in [Player::Black, Player::White] {
            let mut evaluator = trained();
            let mut game = Game::default();
            game.to_move = mover;
            let before = evaluator.evaluate(&game);
            evaluator.td_update(&game, before + 1.0, 0.1);
            let after = evaluator.evaluate(&game);
            // One active cell per table, each stepped by lr/components.
            assert!((after - (before + 0.1)).abs() < 1e-4);
        }
    }

    #[test]
    fn stock_feature_is_clamped() {
        assert_eq!(stock_index(0, 0), 0);
        assert_eq!(stock_index(3, 1), 7);
        assert_eq!(stock_index(9, 4), 7);

        let evaluator = trained();
        let mut game = Game::default();
        game.black_stock = TileStock { black: 3, gray: 1 };
        let clamped = evaluator.evaluate(&game);
        game.black_stock = TileStock { black: 9, gray: 4 };
        assert_eq!(evaluator.evaluate(&game), clamped);
    }

    #[test]
    fn clones_do_not_share_tables() {
        let mut original = Evaluator::default();
        let copy = original.clone();
        original.td_update(&Game::default(), 5.0, 1.0);
        assert_ne!(
            original.evaluate(&Game::default()),
            copy.evaluate(&Game::default())
        );
        assert_eq!(original.num_weights(), copy.num_weights());
    }
}
