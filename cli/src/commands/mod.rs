pub mod cli;
pub mod logs;
pub mod plan;
