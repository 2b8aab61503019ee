//! Indentation block extraction.
//!
//! The first non-blank line sets the block's baseline indentation. The
//! block runs until a non-blank line indented less than the baseline, or
//! end of input. Blank lines always belong to the block and never set
//! the baseline.

/// A borrowed run of script lines plus the 1-based source line of its first entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'l, 's> {
    pub lines: &'l [&'s str],
    pub first_line: u32,
}

impl<'l, 's> Block<'l, 's> {
    pub fn new(lines: &'l [&'s str], first_line: u32) -> Self {
        Self { lines, first_line }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Source line number of the entry at `index`.
    pub fn line_number(&self, index: usize) -> u32 {
        self.first_line + index as u32
    }

    /// The nested block starting at `index`.
    pub fn nested(&self, index: usize) -> Block<'l, 's> {
        Block::new(extract_block(self.lines, index), self.line_number(index))
    }
}

/// Width of the leading whitespace, one per character.
pub fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Number of lines belonging to the block that starts at `lines[start]`.
pub fn block_len(lines: &[&str], start: usize) -> usize {
    let mut count = 0;
    let mut baseline = None;

    for line in lines.iter().skip(start) {
        if line.trim().is_empty() {
            count += 1;
            continue;
        }
        let indent = indentation(line);
        let base = *baseline.get_or_insert(indent);
        if indent < base {
            break;
        }
        count += 1;
    }

    count
}

/// The block that starts at `lines[start]`.
pub fn extract_block<'l, 's>(lines: &'l [&'s str], start: usize) -> &'l [&'s str] {
    let start = start.min(lines.len());
    &lines[start..start + block_len(lines, start)]
}

/// The block that starts at byte `offset` of `text`, e.g. just after a `def name():` header.
///
/// The remainder of the header's own line is the block's first entry.
pub fn extract_block_from_text(text: &str, offset: usize) -> Vec<&str> {
    let rest = text.get(offset..).unwrap_or("");
    let lines: Vec<&str> = rest.split('\n').collect();
    let len = block_len(&lines, 0);
    lines.into_iter().take(len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.split('\n').collect()
    }

    #[test]
    fn test_indentation() {
        assert_eq!(indentation("move()"), 0);
        assert_eq!(indentation("    move()"), 4);
        assert_eq!(indentation("\t\tmove()"), 2);
        assert_eq!(indentation("   "), 3);
    }

    #[test]
    fn test_block_stops_at_dedent() {
        let src = lines("    move()\n    turn_left()\nmain()");
        assert_eq!(block_len(&src, 0), 2);
    }

    #[test]
    fn test_blank_lines_do_not_set_baseline() {
        let src = lines("\n\n    move()\n\n    move()\n  x()");
        assert_eq!(block_len(&src, 0), 5);
    }

    #[test]
    fn test_deeper_lines_stay_in_block() {
        let src = lines("  while a():\n      move()\n  turn_left()\n done()");
        assert_eq!(block_len(&src, 0), 3);
        assert_eq!(block_len(&src, 1), 1);
    }

    #[test]
    fn test_start_past_end() {
        let src = lines("a()");
        assert_eq!(block_len(&src, 5), 0);
        assert!(extract_block(&src, 5).is_empty());
    }

    #[test]
    fn test_extract_from_text_includes_header_remainder() {
        let text = "def main():\n    move()\n\ndef other():\n    turn_left()";
        let offset = "def main():".len();
        let body = extract_block_from_text(text, offset);
        assert_eq!(body, vec!["", "    move()", ""]);
    }

    #[test]
    fn test_nested_block_line_numbers() {
        let src = lines("a()\nwhile x():\n    b()\n    c()\nd()");
        let block = Block::new(&src, 10);
        let inner = block.nested(2);
        assert_eq!(inner.len(), 2);
        assert_eq!(inner.first_line, 12);
        assert_eq!(inner.line_number(1), 13);
    }
}
