//! Turns a JSON scenario tree into the flat list of wired-up [`Object`]s
//! the scheduler runs. See [`parse`] for the entry point.

mod error;
mod parser;
mod payload;
mod wire;


pub use error::{Error, GraphError, ParseError};
pub use parser::parse;
