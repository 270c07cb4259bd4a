//! Simple to use cli for keeping track of mess meals and what you paid for them.
//! Records live in two JSON slots on disk, can be browsed, summarised per month and moved around
//! as CSV.
//!

pub mod cli;
pub mod fs;
pub mod storage;
pub mod tracker;
pub mod utils;
