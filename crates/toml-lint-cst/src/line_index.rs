//! Byte offset to line/column conversion.

/// A zero-based line and character column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

/// Line start table for a source text.
#[derive(Debug, Clone)]
pub struct LineIndex<'src> {
    source: &'src str,
    line_starts: Vec<u32>,
}

impl<'src> LineIndex<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .match_indices('\n')
                .map(|(i, _)| i as u32 + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    /// Position of `offset`. The column counts characters, not bytes.
    pub fn line_col(&self, offset: u32) -> LineCol {
        let offset = offset.min(self.source.len() as u32);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let start = self.line_starts[line] as usize;
        let column = self.source[start..offset as usize].chars().count();
        LineCol {
            line: line as u32,
            column: column as u32,
        }
    }

    /// Byte offset of a position, clamped to the end of its line.
    pub fn offset(&self, pos: LineCol) -> u32 {
        let Some(&start) = self.line_starts.get(pos.line as usize) else {
            return self.source.len() as u32;
        };
        let line = &self.source[start as usize..];
        let line = &line[..line.find('\n').unwrap_or(line.len())];
        let within = line
            .char_indices()
            .nth(pos.column as usize)
            .map(|(i, _)| i)
            .unwrap_or(line.len());
        start + within as u32
    }
}
