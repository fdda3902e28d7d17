use contrast::{Game, GameResult, Move};
use log::info;
use rand::{seq::SliceRandom, thread_rng, Rng};

use crate::{
    config::{EXPLORATION_EPSILON, LEARNING_RATE},
    evaluator::Evaluator,
};

#[derive(Clone, Copy, Debug)]
pub struct TrainOptions {
    pub episodes: u32,
    pub learning_rate: f32,
    /// Probability of playing a random move instead of the greedy one.
    pub epsilon: f64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        TrainOptions {
            episodes: 1000,
            learning_rate: LEARNING_RATE,
            epsilon: EXPLORATION_EPSILON,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TrainStats {
    pub episodes: u32,
    pub black_wins: u32,
    pub white_wins: u32,
    pub draws: u32,
}

/// Offline TD(0) training through ε-greedy self-play. After every move the
/// position left behind is nudged toward the negated value of its successor,
/// or toward the final reward once the game ends.
pub fn train(evaluator: &mut Evaluator, options: &TrainOptions) -> TrainStats {
    let mut stats = TrainStats::default();
    for episode in 0..options.episodes {
        match self_play_episode(evaluator, options) {
            GameResult::Winner(contrast::Player::Black) => stats.black_wins += 1,
            GameResult::Winner(contrast::Player::White) => stats.white_wins += 1,
            _ => stats.draws += 1,
        }
        stats.episodes += 1;
        if (episode + 1) % 100 == 0 {
            info!(
                "episode {}/{}: {}B {}W {} draws",
                episode + 1,
                options.episodes,
                stats.black_wins,
                stats.white_wins,
                stats.draws
            );
        }
    }
    stats
}

fn self_play_episode(evaluator: &mut Evaluator, options: &TrainOptions) -> GameResult {
    let mut rng = thread_rng();
    let mut game = Game::default();
    loop {
        let moves = game.possible_moves();
        let my_move = if rng.gen_bool(options.epsilon) {
            *moves.choose(&mut rng).expect("ongoing game has moves")
        } else {
            greedy_move(evaluator, &game, &moves)
        };

        let previous = game;
        game.play(my_move).unwrap();
        let result = game.result();

        let target = match result {
            GameResult::Ongoing => -evaluator.evaluate(&game),
            GameResult::Winner(winner) => {
                if winner == previous.to_move {
                    1.0
                } else {
                    -1.0
                }
            }
            GameResult::Draw => 0.0,
        };
        evaluator.td_update(&previous, target, options.learning_rate);

        if result != GameResult::Ongoing {
            return result;
        }
    }
}

fn greedy_move(evaluator: &Evaluator, game: &Game, moves: &[Move]) -> Move {
    let (_, best) = moves
        .iter()
        .map(|&m| {
            let mut next = *game;
            next.play(m).unwrap();
            (-evaluator.evaluate(&next), m)
        })
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .expect("ongoing game has moves");
    best
}
