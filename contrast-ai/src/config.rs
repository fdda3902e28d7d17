// evaluation
pub const EVAL_SCALE: f32 = 3.0;

// search
pub const WIN_VALUE: f32 = 10_000.0;
pub const EXPLORATION_CONSTANT: f32 = 1.414;
pub const MAX_SEARCH_DEPTH: u8 = 64;
pub const DEADLINE_POLL_NODES: u64 = 1024;

// training
pub const LEARNING_RATE: f32 = 0.01;
pub const EXPLORATION_EPSILON: f64 = 0.1;

/// Where match drivers look for trained weights by convention. Library APIs
/// always take an explicit path.
pub const DEFAULT_WEIGHTS_PATH: &str = "weights/contrast-ntuple.bin";
