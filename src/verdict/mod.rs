//! Response assembly: classifier label → verdict, packaged with probability
//! and cluster.

mod engine;

pub use engine::{InferenceResult, ResponseAssembler, Verdict, BOT_LABEL, HUMAN_LABEL};
