//! Procedure discovery.

use crate::block::{extract_block_from_text, Block};
use karel_types::SourceFile;
use std::collections::HashMap;
use tracing::trace;

/// Name of the procedure execution starts from.
pub const ENTRY_POINT: &str = "main";

/// A user-defined zero-argument procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure<'s> {
    pub name: &'s str,
    /// 1-based line holding the header's closing `:`.
    pub header_line: u32,
    /// Body lines; entry 0 is whatever followed the header's colon.
    pub body: Vec<&'s str>,
}

impl<'s> Procedure<'s> {
    pub fn block(&self) -> Block<'_, 's> {
        // The body begins on the header's own line.
        Block::new(&self.body, self.header_line)
    }
}

/// All procedures found in a script.
#[derive(Debug, Clone, Default)]
pub struct Program<'s> {
    procedures: HashMap<&'s str, Procedure<'s>>,
}

impl<'s> Program<'s> {
    pub fn get(&self, name: &str) -> Option<&Procedure<'s>> {
        self.procedures.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.procedures.contains_key(name)
    }

    pub fn main(&self) -> Option<&Procedure<'s>> {
        self.get(ENTRY_POINT)
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }

    /// Procedure names, sorted.
    pub fn names(&self) -> Vec<&'s str> {
        let mut names: Vec<&'s str> = self.procedures.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// Find every `def <name>():` header in `source` and cut out its body.
///
/// Headers are recognised anywhere in the text. A later definition of
/// the same name replaces an earlier one.
pub fn parse_program(source: &str) -> Program<'_> {
    let file = SourceFile::new(source);
    let mut procedures = HashMap::new();
    let mut search_from = 0;

    while let Some(found) = source.get(search_from..).and_then(|s| s.find("def")) {
        let start = search_from + found;
        match match_header(source, start) {
            Some((name, end)) => {
                let header_line = file.line_of_offset(end);
                let body = extract_block_from_text(source, end);
                trace!(name, header_line, body_lines = body.len(), "found procedure");
                procedures.insert(
                    name,
                    Procedure {
                        name,
                        header_line,
                        body,
                    },
                );
                search_from = end;
            }
            None => search_from = start + "def".len(),
        }
    }

    Program { procedures }
}

/// Match `def\s+(\w+)\s*\(\s*\)\s*:` at byte `start`; returns the name and the offset past `:`.
fn match_header(source: &str, start: usize) -> Option<(&str, usize)> {
    let bytes = source.as_bytes();
    let mut pos = start + "def".len();

    let ws_start = pos;
    pos = skip_whitespace(bytes, pos);
    if pos == ws_start {
        return None;
    }

    let name_start = pos;
    while bytes.get(pos).is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_') {
        pos += 1;
    }
    if pos == name_start {
        return None;
    }
    let name = &source[name_start..pos];

    for expected in [b'(', b')', b':'] {
        pos = skip_whitespace(bytes, pos);
        if bytes.get(pos) != Some(&expected) {
            return None;
        }
        pos += 1;
    }

    Some((name, pos))
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
        pos += 1;
    }
    pos
}
