//! Command-line facing orchestration

pub mod orchestration;

pub use orchestration::{ReleaseArgs, ReleasePackager, ReleasePlan, RunReport};
