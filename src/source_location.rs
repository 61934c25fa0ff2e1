//! Source Location Utilities
//!
//! Line/column calculation shared by the diagnostic renderer and the
//! pattern compiler's error messages.

use std::fmt;

/// A position in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    /// Byte offset from start of input
    pub offset: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, counted in chars)
    pub column: usize,
}

impl SourcePosition {
    /// Create a new source position
    #[inline]
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Create a position at the start of input
    #[inline]
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Calculate position from a byte offset in the input
    ///
    /// Offsets past the end are clamped to the input length.
    pub fn from_offset(input: &str, offset: usize) -> Self {
        let offset = floor_char_boundary(input, offset.min(input.len()));
        let before = &input.as_bytes()[..offset];

        let line = memchr::memchr_iter(b'\n', before).count() + 1;
        let line_start = line_start(input, offset);
        let column = input[line_start..offset].chars().count() + 1;

        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::start()
    }
}

/// Byte offset of the first character of the line containing `offset`
pub fn line_start(input: &str, offset: usize) -> usize {
    let offset = offset.min(input.len());
    memchr::memrchr(b'\n', &input.as_bytes()[..offset])
        .map(|n| n + 1)
        .unwrap_or(0)
}

/// Byte offset just past the last character of the line containing `offset`
/// (excluding the newline itself and a preceding carriage return)
pub fn line_end(input: &str, offset: usize) -> usize {
    let offset = offset.min(input.len());
    let end = memchr::memchr(b'\n', &input.as_bytes()[offset..])
        .map(|n| offset + n)
        .unwrap_or(input.len());
    if end > 0 && end > line_start(input, offset) && input.as_bytes()[end - 1] == b'\r' {
        end - 1
    } else {
        end
    }
}

/// Full text of the line containing `offset`
pub fn get_line_at_offset(input: &str, offset: usize) -> &str {
    let start = line_start(input, offset);
    let end = line_end(input, offset).max(start);
    &input[start..end]
}

fn floor_char_boundary(input: &str, mut offset: usize) -> usize {
    while offset > 0 && !input.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_offset_first_line() {
        let pos = SourcePosition::from_offset("hello world", 6);
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 7);
    }

    #[test]
    fn test_from_offset_later_line() {
        let input = "first\nsecond\nthird";
        let pos = SourcePosition::from_offset(input, 9);
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 4);
    }

    #[test]
    fn test_from_offset_counts_chars_not_bytes() {
        let input = "é+x";
        // 'é' is two bytes
        let pos = SourcePosition::from_offset(input, 3);
        assert_eq!(pos.column, 3);
    }

    #[test]
    fn test_from_offset_clamps() {
        let pos = SourcePosition::from_offset("ab", 100);
        assert_eq!(pos.offset, 2);
        assert_eq!(pos.column, 3);
    }

    #[test]
    fn test_get_line_at_offset() {
        let input = "one\r\ntwo\nthree";
        assert_eq!(get_line_at_offset(input, 0), "one");
        assert_eq!(get_line_at_offset(input, 6), "two");
        assert_eq!(get_line_at_offset(input, input.len()), "three");
    }

    #[test]
    fn test_display() {
        assert_eq!(SourcePosition::new(4, 2, 3).to_string(), "line 2, column 3");
    }
}
