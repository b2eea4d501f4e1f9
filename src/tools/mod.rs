// Modular tools
pub mod batch;
pub mod classify;
pub mod fetch;
