// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Locating the `Shader "Name" {` declaration in shader source.

use boxclip_core::SourceScanner;
use memchr::memchr;

use crate::error::{Error, Result};

/// Byte offsets of a shader declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration {
    /// Start of the `Shader` keyword
    pub keyword: usize,
    /// First byte of the name (just past the opening quote)
    pub name_start: usize,
    /// The closing quote
    pub name_end: usize,
    /// The body's opening brace
    pub brace: usize,
}

impl Declaration {
    /// Find the first uncommented declaration.
    ///
    /// The closing quote is the next `"` after the opening one; names cannot
    /// contain escaped quotes.
    pub fn locate(source: &str, iteration_limit: usize) -> Result<Self> {
        let scanner = SourceScanner::with_iteration_limit(source, iteration_limit);
        let keyword = scanner.require("Shader", 0)?;
        let open_quote = scanner.require("\"", keyword)?;
        let name_start = open_quote + 1;
        let name_end = memchr(b'"', &source.as_bytes()[name_start..])
            .map(|offset| name_start + offset)
            .ok_or(Error::UnterminatedName(open_quote))?;
        let brace = scanner.require("{", name_end + 1)?;

        Ok(Self {
            keyword,
            name_start,
            name_end,
            brace,
        })
    }

    pub fn name<'a>(&self, source: &'a str) -> &'a str {
        &source[self.name_start..self.name_end]
    }

    /// Text after the opening brace
    pub fn body<'a>(&self, source: &'a str) -> &'a str {
        &source[self.brace + 1..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxclip_core::DEFAULT_ITERATION_LIMIT;

    #[test]
    fn skips_commented_declaration() {
        let source = "// Shader \"Old/Name\" {\nShader \"BoxClip/Standard\" /* { */ {\n}";
        let decl = Declaration::locate(source, DEFAULT_ITERATION_LIMIT).unwrap();
        assert_eq!(decl.name(source), "BoxClip/Standard");
        assert_eq!(decl.body(source), "\n}");
    }

    #[test]
    fn unterminated_name() {
        let source = "Shader \"BoxClip/Standard {";
        assert!(matches!(
            Declaration::locate(source, DEFAULT_ITERATION_LIMIT),
            Err(Error::UnterminatedName(7))
        ));
    }

    #[test]
    fn missing_keyword() {
        assert!(matches!(
            Declaration::locate("Properties { }", DEFAULT_ITERATION_LIMIT),
            Err(Error::Scan(boxclip_core::Error::LiteralNotFound(_)))
        ));
    }
}
