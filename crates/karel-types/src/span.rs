/// Borrowed script text with a line index, for mapping byte offsets to lines.
#[derive(Debug, Clone)]
pub struct SourceFile<'s> {
    pub source: &'s str,
    /// Byte offset where each line starts.
    line_starts: Vec<usize>,
}

impl<'s> SourceFile<'s> {
    pub fn new(source: &'s str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// 1-based line number containing byte `offset`.
    pub fn line_of_offset(&self, offset: usize) -> u32 {
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        idx as u32 + 1
    }

    /// `(line_number, text)` pairs, CR stripped.
    pub fn lines(&self) -> impl Iterator<Item = (u32, &'s str)> {
        self.source
            .split('\n')
            .enumerate()
            .map(|(i, l)| (i as u32 + 1, l.trim_end_matches('\r')))
    }
}
