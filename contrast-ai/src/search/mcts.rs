use contrast::{Game, Move, Player};
use log::debug;
use rand::thread_rng;
use rand_distr::{Distribution, WeightedIndex};

use crate::{
    config::{EVAL_SCALE, EXPLORATION_CONSTANT},
    evaluator::Evaluator,
    search::node::{Tree, ROOT},
};

/// Monte Carlo tree search with UCB1 selection and the pattern evaluator in
/// place of playout rollouts. The tree lives only for one `search` call.
pub struct Mcts {
    evaluator: Evaluator,
    exploration: f32,
}

impl Mcts {
    pub fn new(evaluator: Evaluator) -> Self {
        Mcts {
            evaluator,
            exploration: EXPLORATION_CONSTANT,
        }
    }

    #[must_use]
    pub fn with_exploration(mut self, exploration: f32) -> Self {
        self.exploration = exploration;
        self
    }

    /// Run `iterations` select/expand/simulate/backpropagate cycles and play
    /// the root child with the most visits. Visit count is the robust choice:
    /// a rarely visited child can carry a noisy high average.
    pub fn search(&self, game: &Game, iterations: u32) -> Option<Move> {
        let tree = self.grow_tree(game, iterations);
        let best = tree[ROOT]
            .children
            .iter()
            .max_by_key(|&&child| tree[child].visits)?;
        debug!(
            "picked {} with {} visits, average {:.3}",
            tree[*best].produced_by.unwrap(),
            tree[*best].visits,
            tree[*best].average_value(),
        );
        tree[*best].produced_by
    }

    /// Like `search`, but sample the move with probability proportional to
    /// visit counts. Used by self-play to vary its games.
    pub fn search_sampled(&self, game: &Game, iterations: u32) -> Option<Move> {
        let tree = self.grow_tree(game, iterations);
        let children = &tree[ROOT].children;
        if children.is_empty() {
            return None;
        }
        let weights: Vec<u32> = children.iter().map(|&child| tree[child].visits).collect();
        let distribution = WeightedIndex::new(&weights).ok()?;
        let child = children[distribution.sample(&mut thread_rng())];
        tree[child].produced_by
    }

    pub(crate) fn grow_tree(&self, game: &Game, iterations: u32) -> Tree {
        let mut tree = Tree::new(*game);
        for _ in 0..iterations {
            let mut index = self.select(&tree);
            if tree[index].visits > 0 && !tree[index].terminal {
                expand(&mut tree, index);
                if let Some(&first) = tree[index].children.first() {
                    index = first;
                }
            }
            let value = self.simulate(&tree, index);
            backpropagate(&mut tree, index, value);
        }
        if tree[ROOT].children.is_empty() {
            expand(&mut tree, ROOT);
        }
        tree
    }

    /// Walk down through expanded, undecided nodes along the UCB1-maximal
    /// child.
    fn select(&self, tree: &Tree) -> usize {
        let mut index = ROOT;
        while tree[index].expanded && !tree[index].terminal {
            index = *tree[index]
                .children
                .iter()
                .max_by(|&&a, &&b| {
                    self.ucb1(tree, index, a).total_cmp(&self.ucb1(tree, index, b))
                })
                .expect("expanded non-terminal node must have children");
        }
        index
    }

    fn ucb1(&self, tree: &Tree, parent: usize, child: usize) -> f32 {
        tree.ucb1(parent, child, self.exploration)
    }

    /// Leaf estimate from the node mover's perspective, squashed into [-1, 1]
    /// so evaluator output and terminal rewards share a scale.
    fn simulate(&self, tree: &Tree, index: usize) -> f32 {
        let node = &tree[index];
        if node.terminal {
            return terminal_value(&node.game);
        }
        (self.evaluator.evaluate(&node.game) / EVAL_SCALE).tanh()
    }
}

fn expand(tree: &mut Tree, index: usize) {
    if tree[index].terminal || tree[index].expanded {
        return;
    }
    let moves = tree[index].game.possible_moves();
    if moves.is_empty() {
        tree[index].terminal = true;
        tree[index].expanded = true;
        return;
    }
    for m in moves {
        let mut next = tree[index].game;
        next.play(m).unwrap();
        tree.add_child(index, next, m, is_terminal(&next));
    }
    tree[index].expanded = true;
}

fn backpropagate(tree: &mut Tree, index: usize, value: f32) {
    let mut index = Some(index);
    let mut value = value;
    while let Some(i) = index {
        let node = &mut tree[i];
        node.visits += 1;
        node.total_value += value;
        // one level up is the other side's turn
        value = -value;
        index = node.parent;
    }
}

fn is_terminal(game: &Game) -> bool {
    game.is_win(Player::Black) || game.is_win(Player::White) || game.possible_moves().is_empty()
}

/// ±1 reward from the perspective of whoever would move in this position.
fn terminal_value(game: &Game) -> f32 {
    let mover = game.to_move;
    if game.is_win(Player::Black) {
        return if mover == Player::Black { 1.0 } else { -1.0 };
    }
    if game.is_win(Player::White) {
        return if mover == Player::White { 1.0 } else { -1.0 };
    }
    // stuck: the mover has no reply and loses
    -1.0
}
