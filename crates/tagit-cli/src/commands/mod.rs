pub mod common;
pub mod completions;
pub mod config;
pub mod export;
pub mod history;
pub mod list;
pub mod log;
pub mod mv;
pub mod prune;
pub mod revert;
pub mod scan;
pub mod set;
pub mod tags;
