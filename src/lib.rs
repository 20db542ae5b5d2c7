pub mod args;
pub mod cli;
pub mod compiler;
pub mod error;
pub mod graph;
pub mod package;
pub mod render;
