pub mod builder;
pub mod config;
pub mod error;
pub mod filter;
pub mod interleave;
pub mod library;
pub mod log;
pub mod ordering;
pub mod queue;
pub mod show_order;
pub mod switch;
pub mod types;
