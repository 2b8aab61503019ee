//! Karel script parser.
//!
//! Scripts are never tokenized. The parser finds `def name():` headers,
//! cuts bodies out by indentation, and classifies single lines on demand
//! as the engine reaches them.

mod block;
mod program;
mod statement;

pub use block::{block_len, extract_block, extract_block_from_text, indentation, Block};
pub use program::{parse_program, Procedure, Program, ENTRY_POINT};
pub use statement::{classify, normalize_condition, Statement};
