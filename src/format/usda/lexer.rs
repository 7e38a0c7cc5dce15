// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{UsdaParseError, UsdaParseErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TokenKind {
    Ident,
    Number,
    /// Quoted string; `start..end` covers the quotes.
    String,
    /// `@asset@` or `@@@asset@@@`.
    Asset,
    /// `</prim/path>`.
    Path,
    Punct(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

impl Token {
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.start..self.end]
    }

    pub fn is_punct(&self, ch: char) -> bool {
        self.kind == TokenKind::Punct(ch)
    }

    pub fn is_ident(&self, src: &str, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.text(src) == word
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | ':' | '.')
}

pub(super) fn tokenize(src: &str) -> Result<Vec<Token>, UsdaParseError> {
    Lexer { src, pos: 0, line: 1, tokens: Vec::new() }.run()
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl Lexer<'_> {
    fn run(mut self) -> Result<Vec<Token>, UsdaParseError> {
        while let Some(ch) = self.peek() {
            let start = self.pos;
            let line = self.line;
            match ch {
                '\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                _ if ch.is_whitespace() => self.pos += ch.len_utf8(),
                '#' => self.skip_line(),
                '/' if self.rest().starts_with("//") => self.skip_line(),
                '/' if self.rest().starts_with("/*") => self.skip_block_comment(line)?,
                '"' | '\'' => {
                    self.lex_string(ch, line)?;
                    self.push(TokenKind::String, start, line);
                }
                '@' => {
                    self.lex_asset(line)?;
                    self.push(TokenKind::Asset, start, line);
                }
                '<' => {
                    self.lex_path(line)?;
                    self.push(TokenKind::Path, start, line);
                }
                _ if is_ident_start(ch) => {
                    self.eat_while(is_ident_continue);
                    self.push(TokenKind::Ident, start, line);
                }
                _ if self.starts_number() => {
                    self.lex_number();
                    self.push(TokenKind::Number, start, line);
                }
                _ => {
                    self.pos += ch.len_utf8();
                    self.push(TokenKind::Punct(ch), start, line);
                }
            }
        }
        Ok(self.tokens)
    }

    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn push(&mut self, kind: TokenKind, start: usize, line: usize) {
        self.tokens.push(Token { kind, start, end: self.pos, line });
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            if ch == '\n' {
                self.line += 1;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn skip_line(&mut self) {
        self.eat_while(|ch| ch != '\n');
    }

    fn skip_block_comment(&mut self, line: usize) -> Result<(), UsdaParseError> {
        self.pos += 2;
        let Some(len) = self.rest().find("*/") else {
            return Err(UsdaParseError::new(line, UsdaParseErrorKind::UnterminatedComment));
        };
        self.line += self.rest()[..len].matches('\n').count();
        self.pos += len + 2;
        Ok(())
    }

    fn lex_string(&mut self, quote: char, line: usize) -> Result<(), UsdaParseError> {
        let triple: String = std::iter::repeat(quote).take(3).collect();
        if self.rest().starts_with(&triple) {
            self.pos += 3;
            let Some(len) = self.rest().find(&triple) else {
                return Err(UsdaParseError::new(line, UsdaParseErrorKind::UnterminatedString));
            };
            self.line += self.rest()[..len].matches('\n').count();
            self.pos += len + 3;
            return Ok(());
        }

        self.pos += 1;
        let mut escaped = false;
        while let Some(ch) = self.peek() {
            self.pos += ch.len_utf8();
            match ch {
                '\n' => break,
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                _ if ch == quote => return Ok(()),
                _ => {}
            }
        }
        Err(UsdaParseError::new(line, UsdaParseErrorKind::UnterminatedString))
    }

    fn lex_asset(&mut self, line: usize) -> Result<(), UsdaParseError> {
        let delimiter = if self.rest().starts_with("@@@") { "@@@" } else { "@" };
        self.pos += delimiter.len();
        let Some(len) = self.rest().find(delimiter) else {
            return Err(UsdaParseError::new(line, UsdaParseErrorKind::UnterminatedAsset));
        };
        if self.rest()[..len].contains('\n') {
            return Err(UsdaParseError::new(line, UsdaParseErrorKind::UnterminatedAsset));
        }
        self.pos += len + delimiter.len();
        Ok(())
    }

    fn lex_path(&mut self, line: usize) -> Result<(), UsdaParseError> {
        let Some(len) = self.rest().find('>') else {
            return Err(UsdaParseError::new(line, UsdaParseErrorKind::UnterminatedPath));
        };
        if self.rest()[..len].contains('\n') {
            return Err(UsdaParseError::new(line, UsdaParseErrorKind::UnterminatedPath));
        }
        self.pos += len + 1;
        Ok(())
    }

    fn starts_number(&self) -> bool {
        let mut chars = self.rest().chars();
        match chars.next() {
            Some(ch) if ch.is_ascii_digit() => true,
            Some('-' | '+' | '.') => chars.next().is_some_and(|ch| ch.is_ascii_digit() || ch == '.'),
            _ => false,
        }
    }

    fn lex_number(&mut self) {
        let mut prev = '\0';
        let mut first = true;
        while let Some(ch) = self.peek() {
            let accept = ch.is_ascii_digit()
                || ch == '.'
                || matches!(ch, 'e' | 'E')
                || (matches!(ch, '-' | '+') && (first || matches!(prev, 'e' | 'E')));
            if !accept {
                break;
            }
            prev = ch;
            first = false;
            self.pos += 1;
        }
    }
}

/// Decodes the contents of a [`TokenKind::String`] token.
pub(super) fn unquote(raw: &str) -> String {
    for triple in ["\"\"\"", "'''"] {
        if raw.len() >= 6 && raw.starts_with(triple) && raw.ends_with(triple) {
            return raw[3..raw.len() - 3].to_owned();
        }
    }

    let inner = if raw.len() >= 2 { &raw[1..raw.len() - 1] } else { "" };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Strips the delimiters from an asset or path token.
pub(super) fn strip_delimiters(raw: &str, kind: TokenKind) -> &str {
    match kind {
        TokenKind::Asset => raw.trim_start_matches('@').trim_end_matches('@'),
        TokenKind::Path => raw.trim_start_matches('<').trim_end_matches('>'),
        _ => raw,
    }
}
