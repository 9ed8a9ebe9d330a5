//! Terminal presentation for the ftpdeploy binary

pub mod console;
pub mod error;
pub mod json;
pub mod terminal;
pub mod theme;
