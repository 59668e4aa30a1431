mod ranking;

pub use ranking::{RankingEngine, RankingPolicy};
