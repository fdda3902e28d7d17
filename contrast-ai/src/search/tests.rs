use std::time::Duration;

use contrast::{Board, Game, Move, Player, Square, TileStock};

use super::{node::ROOT, AlphaBeta, Mcts, SearchLimit};
use crate::{config::WIN_VALUE, evaluator::Evaluator};

fn trained() -> Evaluator {
    let mut evaluator = Evaluator::default();
    let mut game = Game::default();
    for i in 0..10 {
        evaluator.td_update(&game, 0.2 * i as f32 - 0.7, 0.5);
        let moves = game.possible_moves();
        game.play(moves[i * 17 % moves.len()]).unwrap();
    }
    evaluator
}

fn cleared() -> Game {
    let mut game = Game::default();
    for square in Board::squares() {
        game.board[square].occupant = None;
        game.board[square].tile = None;
    }
    game.black_stock = TileStock { black: 0, gray: 0 };
    game.white_stock = TileStock { black: 0, gray: 0 };
    game
}

/// A low-branching middlegame with both stocks spent.
fn skirmish() -> Game {
    let mut game = cleared();
    game.board[Square::new(1, 1)].occupant = Some(Player::Black);
    game.board[Square::new(2, 2)].occupant = Some(Player::Black);
    game.board[Square::new(2, 3)].occupant = Some(Player::White);
    game.board[Square::new(4, 3)].occupant = Some(Player::White);
    game
}

/// White to move, one step away from Black's home row.
fn white_to_win() -> Game {
    let mut game = cleared();
    game.board[Square::new(3, 1)].occupant = Some(Player::White);
    game.board[Square::new(0, 0)].occupant = Some(Player::Black);
    game.board[Square::new(1, 0)].occupant = Some(Player::Black);
    game.to_move = Player::White;
    game
}

fn value_with(game: &Game, table: bool, ordering: bool) -> f32 {
    let mut search = AlphaBeta::new(trained());
    search.set_transposition(table);
    search.set_move_ordering(ordering);
    search.search(game, SearchLimit::Depth(3)).value
}

#[test]
fn optimisation_toggles_do_not_change_the_value() {
    let game = skirmish();
    let reference = value_with(&game, false, false);
    for (table, ordering) in [(true, false), (false, true), (true, true)] {
        let value = value_with(&game, table, ordering);
        assert!(
            (value - reference).abs() < 1e-4,
            "tt={table} ordering={ordering}: {value} vs {reference}"
        );
    }
}

#[test]
fn decided_position_returns_the_terminal_constant() {
    let mut game = cleared();
    game.board[Square::new(2, 4)].occupant = Some(Player::Black);

    for depth in [1, 4] {
        // Black stands on its target row; from Black's seat that is +WIN.
        game.to_move = Player::Black;
        let result = AlphaBeta::new(trained()).search(&game, SearchLimit::Depth(depth));
        assert_eq!(result.value, WIN_VALUE);
        assert!(result.best.is_none());

        game.to_move = Player::White;
        let result = AlphaBeta::new(trained()).search(&game, SearchLimit::Depth(depth));
        assert_eq!(result.value, -WIN_VALUE);
    }
}

#[test]
fn alphabeta_finds_the_winning_step() {
    let game = white_to_win();
    let winning = Move::step(Square::new(3, 1), Square::new(3, 0));

    let result = AlphaBeta::new(trained()).search(&game, SearchLimit::Depth(1));
    assert_eq!(result.best, Some(winning));
    assert_eq!(result.value, WIN_VALUE);

    // Deeper searches may prefer a different forced win, but the value must
    // stay at the terminal constant.
    let result = AlphaBeta::new(trained()).search(&game, SearchLimit::Depth(3));
    assert_eq!(result.value, WIN_VALUE);
    assert!(result.best.is_some());
}

#[test]
fn transposition_table_gets_hits() {
    let mut search = AlphaBeta::new(trained());
    search.search(&skirmish(), SearchLimit::Depth(4));
    let stats = search.stats();
    assert!(stats.nodes > 0);
    assert!(stats.tt_hits > 0, "deepening should revisit positions");
    assert_eq!(stats.depth_reached, 4);
}

#[test]
fn timed_search_completes_at_least_one_depth() {
    let mut search = AlphaBeta::new(trained());
    let result = search.search(
        &Game::default(),
        SearchLimit::Timed(Duration::from_millis(200)),
    );
    assert!(result.best.is_some());
    assert!(result.depth >= 1);
    assert_eq!(search.stats().depth_reached, result.depth);
}

#[test]
fn mcts_visit_conservation() {
    let iterations = 500;
    let mcts = Mcts::new(trained());
    let tree = mcts.grow_tree(&skirmish(), iterations);

    assert_eq!(tree[ROOT].visits, iterations);
    let child_visits: u32 = tree[ROOT].children.iter().map(|&c| tree[c].visits).sum();
    // exactly one visit landed on the root before its first expansion
    assert_eq!(child_visits, iterations - 1);
}

#[test]
fn mcts_prefers_the_winning_move() {
    let game = white_to_win();
    let winning = Move::step(Square::new(3, 1), Square::new(3, 0));

    let mcts = Mcts::new(trained());
    assert_eq!(mcts.search(&game, 300), Some(winning));

    let tree = mcts.grow_tree(&game, 300);
    let winning_visits = tree[ROOT]
        .children
        .iter()
        .map(|&c| &tree[c])
        .find(|node| node.produced_by == Some(winning))
        .map(|node| node.visits)
        .unwrap();
    let other_max = tree[ROOT]
        .children
        .iter()
        .map(|&c| &tree[c])
        .filter(|node| node.produced_by != Some(winning))
        .map(|node| node.visits)
        .max()
        .unwrap();
    assert!(
        winning_visits > other_max,
        "{winning_visits} should dominate {other_max}"
    );
}

#[test]
fn mcts_returns_none_on_decided_positions() {
    let mut game = cleared();
    game.board[Square::new(0, 2)].occupant = Some(Player::Black);
    game.board[Square::new(1, 2)].occupant = Some(Player::White);
    game.board[Square::new(0, 1)].occupant = Some(Player::White);
    game.board[Square::new(0, 3)].occupant = Some(Player::White);
    assert!(game.possible_moves().is_empty());

    let mcts = Mcts::new(trained());
    assert_eq!(mcts.search(&game, 50), None);
}

/// Sanity regression from the starting position: the depth-3 choice must not
/// hand White a win on the very next move.
#[test]
fn opening_choice_is_not_an_immediate_blunder() {
    let game = Game::default();
    let result = AlphaBeta::new(trained()).search(&game, SearchLimit::Depth(3));
    let best = result.best.unwrap();

    let mut next = game;
    next.play(best).unwrap();
    for reply in next.possible_moves() {
        let mut after = next;
        after.play(reply).unwrap();
        assert!(!after.is_win(Player::White), "losing to {reply}");
    }
}
