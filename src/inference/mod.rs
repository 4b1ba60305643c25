//! Three-stage numeric inference: standardize → cluster-assign → classify.

mod pipeline;

pub use pipeline::{Classification, InferencePipeline, StageOutputs};
