#![doc = include_str!("../README.md")]

pub mod ai;
pub mod api;
pub mod cli;
pub mod engine;
pub mod error;
pub mod history;
pub mod log;
pub mod runtime;
pub mod sites;
pub mod store;
pub mod tools;
pub mod types;

pub use engine::*;
pub use error::*;
pub use types::*;
