// Prior constants
pub const NORMAL_PRIOR_SCALE: f64 = 1.0;
pub const SCALE_PRIOR_LOCATION: f64 = 0.0;
pub const SCALE_PRIOR_SCALE: f64 = 0.5;
// Simulation constants
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_ABILITY_SCALE: f64 = 1.0;
// Point estimation constants
pub const MAX_ITERATIONS: usize = 5000;
pub const GRADIENT_TOLERANCE: f64 = 1e-6;
pub const INITIAL_STEP_SIZE: f64 = 0.1;
pub const ARMIJO_CONSTANT: f64 = 1e-4;
pub const MAX_BACKTRACKS: usize = 60;
// Sampling constants
pub const CHAINS: usize = 4;
pub const WARMUP: usize = 1000;
pub const DRAWS: usize = 1000;
pub const LEAPFROG_STEPS: usize = 16;
pub const TARGET_ACCEPTANCE: f64 = 0.8;
pub const INITIAL_RADIUS: f64 = 2.0;
pub const DIVERGENCE_THRESHOLD: f64 = 1000.0;
// Diagnostic thresholds
pub const RHAT_THRESHOLD: f64 = 1.05;
pub const MIN_EFFECTIVE_SAMPLES: f64 = 100.0;
// Ranking constants
pub const RANK_INTERVAL_LEVEL: f64 = 0.9;
