pub mod generate;
pub mod runner;

pub use generate::{OutputMode, generate, render};
pub use runner::{ExecutionOutcome, OutputLine, OutputSender, RunState, RunnerConfig, ZintRunner};
