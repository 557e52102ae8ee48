// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Comment-aware literal locator for shader source text.
//!
//! Finds the first occurrence of a literal that is not inside a `//` line
//! comment or a `/* */` block comment. String literals are not tracked; the
//! scanner only needs to step over commented-out declarations such as
//! `// Shader "Old/Name"` sitting above the real one.

use memchr::{memchr, memmem};

use crate::error::{Error, Result};

/// Default bound on scanner iterations (one per skipped comment)
pub const DEFAULT_ITERATION_LIMIT: usize = 1000;

/// Comment-aware scanner over a borrowed source string
///
/// Literal matching is ASCII case-insensitive, comment markers are matched
/// exactly. Returned positions are byte offsets into the source.
#[derive(Debug, Clone)]
pub struct SourceScanner<'a> {
    source: &'a str,
    folded: Vec<u8>,
    iteration_limit: usize,
}

impl<'a> SourceScanner<'a> {
    /// Create a scanner with the default iteration limit
    pub fn new(source: &'a str) -> Self {
        Self::with_iteration_limit(source, DEFAULT_ITERATION_LIMIT)
    }

    /// Create a scanner that gives up after `iteration_limit` comment skips
    pub fn with_iteration_limit(source: &'a str, iteration_limit: usize) -> Self {
        Self {
            source,
            folded: source.as_bytes().to_ascii_lowercase(),
            iteration_limit,
        }
    }

    /// The text being scanned
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Find `literal` at or after `from`, skipping commented-out occurrences.
    ///
    /// Returns `Ok(None)` when no uncommented occurrence exists.
    pub fn find(&self, literal: &str, from: usize) -> Result<Option<usize>> {
        let bytes = self.source.as_bytes();
        let needle = literal.as_bytes().to_ascii_lowercase();
        let mut cursor = from;

        for _ in 0..self.iteration_limit {
            if cursor > bytes.len() {
                return Ok(None);
            }
            let target = match memmem::find(&self.folded[cursor..], &needle) {
                Some(offset) => cursor + offset,
                None => return Ok(None),
            };

            let window = &bytes[cursor..target];
            let line_comment = memmem::find(window, b"//");
            let block_comment = memmem::find(window, b"/*");

            match (line_comment, block_comment) {
                (Some(line), block) if block.map_or(true, |block| line < block) => {
                    let opener = cursor + line;
                    match memchr(b'\n', &bytes[opener..]) {
                        Some(newline) => cursor = opener + newline + 1,
                        // The literal sits in a trailing line comment
                        None => return Ok(None),
                    }
                }
                (_, Some(block)) => {
                    let opener = cursor + block;
                    match memmem::find(&bytes[opener + 2..], b"*/") {
                        Some(close) => cursor = opener + 2 + close + 2,
                        None => return Err(Error::UnterminatedComment(opener)),
                    }
                }
                _ => return Ok(Some(target)),
            }
        }

        Err(Error::ScannerExhausted {
            literal: literal.to_string(),
            iterations: self.iteration_limit,
        })
    }

    /// Like [`find`](Self::find), but a missing literal is also an error.
    pub fn require(&self, literal: &str, from: usize) -> Result<usize> {
        self.find(literal, from)?
            .ok_or_else(|| Error::LiteralNotFound(literal.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_line_commented_declaration() {
        let source = "// Shader \"X\"\nShader \"Y\"";
        let scanner = SourceScanner::new(source);
        let pos = scanner.find("Shader", 0).unwrap().unwrap();
        assert_eq!(pos, 14);
        assert!(source[pos..].starts_with("Shader \"Y\""));
    }

    #[test]
    fn skips_block_comment() {
        let source = "/* Shader \"Old\" */ Shader \"New\" {}";
        let scanner = SourceScanner::new(source);
        let pos = scanner.find("shader", 0).unwrap().unwrap();
        assert!(source[pos..].starts_with("Shader \"New\""));
    }

    #[test]
    fn matches_case_insensitively() {
        let scanner = SourceScanner::new("SHADER \"A\"");
        assert_eq!(scanner.find("Shader", 0).unwrap(), Some(0));
    }

    #[test]
    fn starts_from_cursor() {
        let source = "Shader \"A\" { }";
        let scanner = SourceScanner::new(source);
        let quote = scanner.find("\"", 6).unwrap().unwrap();
        assert_eq!(quote, 7);
        assert_eq!(scanner.find("{", quote + 1).unwrap(), Some(11));
    }

    #[test]
    fn brace_inside_comment_is_skipped() {
        let source = "Shader \"A\" // {\n/* { */\n{";
        let scanner = SourceScanner::new(source);
        let brace = scanner.find("{", 10).unwrap().unwrap();
        assert_eq!(brace, source.len() - 1);
    }

    #[test]
    fn literal_in_trailing_line_comment_is_not_found() {
        let scanner = SourceScanner::new("Properties {} // Shader");
        assert_eq!(scanner.find("Shader", 0).unwrap(), None);
    }

    #[test]
    fn missing_literal_is_not_found() {
        let scanner = SourceScanner::new("Properties {}");
        assert_eq!(scanner.find("Shader", 0).unwrap(), None);
    }

    #[test]
    fn unterminated_block_comment_fails() {
        let scanner = SourceScanner::new("/* Shader \"A\"");
        assert_eq!(
            scanner.find("Shader", 0),
            Err(Error::UnterminatedComment(0))
        );
    }

    #[test]
    fn iteration_limit_is_enforced() {
        let source = "/* a */ /* b */ /* c */ Shader";
        let scanner = SourceScanner::with_iteration_limit(source, 2);
        match scanner.find("Shader", 0) {
            Err(Error::ScannerExhausted { iterations, .. }) => assert_eq!(iterations, 2),
            other => panic!("expected exhaustion, got {:?}", other),
        }

        let scanner = SourceScanner::with_iteration_limit(source, 4);
        assert_eq!(scanner.find("Shader", 0).unwrap(), Some(24));
    }

    #[test]
    fn require_reports_missing_literal() {
        let scanner = SourceScanner::new("no braces here");
        assert_eq!(
            scanner.require("{", 0),
            Err(Error::LiteralNotFound("{".to_string()))
        );
    }
}
