// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::PathBuf;

use crate::model::{Attribute, PrimId, Property, Relationship, Specifier, Stage, Variability};

use super::lexer::{strip_delimiters, tokenize, unquote, Token, TokenKind};
use super::{UsdaParseError, UsdaParseErrorKind, MAX_PRIM_DEPTH};

const LIST_OPS: [&str; 4] = ["prepend", "append", "add", "delete"];
const PROPERTY_SUFFIXES: [&str; 3] = ["timeSamples", "connect", "spline"];

/// Reads the prim outline of a text layer.
///
/// Composition arcs are recorded as flags only and values are kept as source text.
pub fn parse_usda(src: &str, root_layer: impl Into<PathBuf>) -> Result<Stage, UsdaParseError> {
    let first_line = src.trim_start_matches('\u{feff}').lines().next().unwrap_or_default();
    if !first_line.trim_start().starts_with(super::USDA_HEADER) {
        return Err(UsdaParseError::new(1, UsdaParseErrorKind::MissingHeader));
    }

    let tokens = tokenize(src)?;
    let mut parser = Parser { src, tokens, pos: 0, depth: 0, stage: Stage::new(root_layer) };
    parser.parse_layer()?;
    Ok(parser.stage)
}

/// Byte range of one value in the source.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
    first_token: usize,
    end_token: usize,
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    /// Prims currently open around `pos`.
    depth: usize,
    stage: Stage,
}

impl<'a> Parser<'a> {
    fn parse_layer(&mut self) -> Result<(), UsdaParseError> {
        if self.peek_punct('(') {
            self.parse_layer_metadata()?;
        }

        let root = self.stage.pseudo_root().id();
        while self.peek().is_some() {
            if !self.at_prim_statement() {
                return Err(self.unexpected("prim statement ('def', 'over' or 'class')"));
            }
            self.parse_prim(root)?;
        }
        Ok(())
    }

    fn parse_layer_metadata(&mut self) -> Result<(), UsdaParseError> {
        self.expect_punct('(')?;
        loop {
            let Some(token) = self.peek() else {
                return Err(self.eof("')' closing layer metadata"));
            };
            match token.kind {
                TokenKind::Punct(')') => {
                    self.pos += 1;
                    return Ok(());
                }
                TokenKind::Punct(';' | ',') => self.pos += 1,
                TokenKind::String => {
                    self.pos += 1;
                    self.stage.metadata_mut().doc = Some(unquote(token.text(self.src)));
                }
                TokenKind::Ident => {
                    self.pos += 1;
                    let mut key = token.text(self.src);
                    if LIST_OPS.contains(&key) {
                        key = self.expect_ident("metadata key")?;
                    }
                    if !self.eat_punct('=') {
                        continue;
                    }
                    let span = self.parse_value()?;
                    self.apply_layer_metadata(key, span);
                }
                _ => return Err(self.unexpected("layer metadata entry")),
            }
        }
    }

    fn apply_layer_metadata(&mut self, key: &str, span: Span) {
        let text = self.span_text(span);
        let number = text.parse::<f64>().ok();
        let string = self.span_string(span);
        let sub_layers = (key == "subLayers").then(|| self.span_assets(span));
        let metadata = self.stage.metadata_mut();
        match key {
            "defaultPrim" => metadata.default_prim = string,
            "doc" | "comment" => metadata.doc = string,
            "timeCodesPerSecond" => metadata.time_codes_per_second = number,
            "framesPerSecond" => metadata.frames_per_second = number,
            "startTimeCode" => metadata.start_time_code = number,
            "endTimeCode" => metadata.end_time_code = number,
            "upAxis" => metadata.up_axis = string,
            "metersPerUnit" => metadata.meters_per_unit = number,
            "subLayers" => metadata.sub_layers = sub_layers.unwrap_or_default(),
            _ => {}
        }
    }

    fn at_prim_statement(&self) -> bool {
        let Some(token) = self.peek() else {
            return false;
        };
        if token.kind != TokenKind::Ident || Specifier::from_keyword(token.text(self.src)).is_none()
        {
            return false;
        }
        match (self.peek_at(1), self.peek_at(2)) {
            (Some(next), _) if next.kind == TokenKind::String => true,
            (Some(next), Some(after)) => {
                next.kind == TokenKind::Ident && after.kind == TokenKind::String
            }
            _ => false,
        }
    }

    fn parse_prim(&mut self, parent: PrimId) -> Result<(), UsdaParseError> {
        if self.depth >= MAX_PRIM_DEPTH {
            let line = self.peek().map_or(0, |token| token.line);
            return Err(UsdaParseError::new(
                line,
                UsdaParseErrorKind::NestingTooDeep { limit: MAX_PRIM_DEPTH },
            ));
        }
        self.depth += 1;
        let result = self.parse_prim_inner(parent);
        self.depth -= 1;
        result
    }

    fn parse_prim_inner(&mut self, parent: PrimId) -> Result<(), UsdaParseError> {
        let keyword = self.expect_ident("prim specifier")?;
        let specifier = Specifier::from_keyword(keyword)
            .ok_or_else(|| self.unexpected("prim specifier ('def', 'over' or 'class')"))?;

        let type_name = match self.peek() {
            Some(token) if token.kind == TokenKind::Ident => {
                self.pos += 1;
                token.text(self.src)
            }
            _ => "",
        };

        let name_token = self.expect_kind(TokenKind::String, "prim name")?;
        let name = unquote(name_token.text(self.src));
        if !is_valid_prim_name(&name) {
            return Err(UsdaParseError::new(
                name_token.line,
                UsdaParseErrorKind::InvalidPrimName { name },
            ));
        }

        let id = self.stage.define_prim(parent, &name, specifier, type_name);

        if self.peek_punct('(') {
            self.parse_prim_metadata(id)?;
        }

        self.expect_punct('{')?;
        self.parse_prim_body(id)
    }

    fn parse_prim_metadata(&mut self, id: PrimId) -> Result<(), UsdaParseError> {
        self.expect_punct('(')?;
        loop {
            let Some(token) = self.peek() else {
                return Err(self.eof("')' closing prim metadata"));
            };
            match token.kind {
                TokenKind::Punct(')') => {
                    self.pos += 1;
                    return Ok(());
                }
                TokenKind::Punct(';' | ',') | TokenKind::String => self.pos += 1,
                TokenKind::Ident => {
                    self.pos += 1;
                    let mut key = token.text(self.src);
                    let mut list_op = None;
                    if LIST_OPS.contains(&key) {
                        list_op = Some(key);
                        key = self.expect_ident("metadata key")?;
                    }
                    if !self.eat_punct('=') {
                        continue;
                    }
                    let span = self.parse_value()?;
                    self.apply_prim_metadata(id, key, list_op, span);
                }
                _ => return Err(self.unexpected("prim metadata entry")),
            }
        }
    }

    fn apply_prim_metadata(&mut self, id: PrimId, key: &str, list_op: Option<&str>, span: Span) {
        let text = self.span_text(span);
        let adds_arcs = list_op != Some("delete") && text != "None";
        let string = self.span_string(span);
        let prim = self.stage.prim_mut(id);
        match key {
            "active" => prim.set_active(text != "false" && text != "0"),
            "instanceable" => prim.set_instanceable(text == "true" || text == "1"),
            "kind" => prim.set_kind(string),
            "references" if adds_arcs => prim.set_has_authored_references(true),
            "payload" | "payloads" if adds_arcs => prim.set_has_authored_payloads(true),
            _ => {}
        }
    }

    fn parse_prim_body(&mut self, id: PrimId) -> Result<(), UsdaParseError> {
        loop {
            let Some(token) = self.peek() else {
                return Err(self.eof("'}' closing prim body"));
            };
            match token.kind {
                TokenKind::Punct('}') => {
                    self.pos += 1;
                    return Ok(());
                }
                TokenKind::Punct(';') => self.pos += 1,
                TokenKind::Ident if self.at_prim_statement() => self.parse_prim(id)?,
                TokenKind::Ident if token.text(self.src) == "variantSet" => {
                    self.skip_variant_set()?;
                }
                TokenKind::Ident if token.text(self.src) == "reorder" => {
                    self.pos += 1;
                    self.expect_ident("reorder target")?;
                    self.expect_punct('=')?;
                    self.parse_value()?;
                }
                TokenKind::Ident => self.parse_property(id)?,
                _ => return Err(self.unexpected("prim, property or '}'")),
            }
        }
    }

    fn skip_variant_set(&mut self) -> Result<(), UsdaParseError> {
        self.expect_ident("variantSet")?;
        self.expect_kind(TokenKind::String, "variant set name")?;
        self.expect_punct('=')?;
        if !self.peek_punct('{') {
            return Err(self.unexpected("'{' opening variant set"));
        }
        self.skip_balanced()
    }

    fn parse_property(&mut self, id: PrimId) -> Result<(), UsdaParseError> {
        let mut list_op = None;
        let mut custom = false;
        let mut variability = Variability::Varying;

        loop {
            let word = self.expect_ident("property declaration")?;
            match word {
                _ if LIST_OPS.contains(&word) => list_op = Some(word),
                "custom" => custom = true,
                "uniform" => variability = Variability::Uniform,
                "varying" => variability = Variability::Varying,
                "config" => variability = Variability::Config,
                "rel" => return self.parse_relationship(id, custom, list_op),
                type_name => {
                    return self.parse_attribute(id, type_name, custom, variability);
                }
            }
        }
    }

    fn parse_relationship(
        &mut self,
        id: PrimId,
        custom: bool,
        list_op: Option<&str>,
    ) -> Result<(), UsdaParseError> {
        let name = self.expect_ident("relationship name")?;
        let targets = if self.eat_punct('=') {
            let span = self.parse_value()?;
            self.span_paths(span)
        } else {
            Vec::new()
        };
        self.skip_property_metadata()?;

        let prim = self.stage.prim_mut(id);
        if prim.property(name).is_none() {
            let mut rel = Relationship::new(name);
            rel.custom = custom;
            prim.push_property(Property::Relationship(rel));
        }
        if let Some(Property::Relationship(rel)) = prim.property_mut(name) {
            merge_list_op(&mut rel.targets, targets, list_op);
        }
        Ok(())
    }

    fn parse_attribute(
        &mut self,
        id: PrimId,
        type_name: &str,
        custom: bool,
        variability: Variability,
    ) -> Result<(), UsdaParseError> {
        let is_array = matches!(
            (self.peek(), self.peek_at(1)),
            (Some(open), Some(close)) if open.is_punct('[') && close.is_punct(']')
        );
        let type_name = if is_array {
            self.pos += 2;
            format!("{type_name}[]")
        } else {
            type_name.to_owned()
        };

        let declared = self.expect_ident("attribute name")?;
        let (name, suffix) = split_property_suffix(declared);

        let value = if self.eat_punct('=') { Some(self.parse_value()?) } else { None };
        self.skip_property_metadata()?;

        let connections = match (suffix, value) {
            (Some("connect"), Some(span)) => self.span_paths(span),
            _ => Vec::new(),
        };
        let default_value = match (suffix, value) {
            (None, Some(span)) => Some(self.span_text(span).to_owned()),
            _ => None,
        };

        let prim = self.stage.prim_mut(id);
        if prim.property(name).is_none() {
            let mut attr = Attribute::new(name, type_name);
            attr.custom = custom;
            attr.variability = variability;
            prim.push_property(Property::Attribute(attr));
        }
        if let Some(Property::Attribute(attr)) = prim.property_mut(name) {
            match suffix {
                Some("timeSamples" | "spline") => attr.has_time_samples = true,
                Some(_) => merge_list_op(&mut attr.connections, connections, None),
                None => {
                    if default_value.is_some() {
                        attr.default_value = default_value;
                    }
                }
            }
        }
        Ok(())
    }

    fn skip_property_metadata(&mut self) -> Result<(), UsdaParseError> {
        if self.peek_punct('(') {
            self.skip_balanced()?;
        }
        Ok(())
    }

    /// Consumes one value: a bracketed group, a signed scalar, or a single token.
    fn parse_value(&mut self) -> Result<Span, UsdaParseError> {
        let Some(first) = self.peek() else {
            return Err(self.eof("value"));
        };
        let first_token = self.pos;
        match first.kind {
            TokenKind::Punct('(' | '[' | '{') => self.skip_balanced()?,
            TokenKind::Punct('-' | '+') => {
                self.pos += 1;
                if self.peek().is_none() {
                    return Err(self.eof("value after sign"));
                }
                self.pos += 1;
            }
            TokenKind::Punct(_) => return Err(self.unexpected("value")),
            TokenKind::Asset => {
                // `@layer.usda@</Target>`
                self.pos += 1;
                if self.peek().is_some_and(|token| token.kind == TokenKind::Path) {
                    self.pos += 1;
                }
            }
            _ => self.pos += 1,
        }
        let last = self.tokens[self.pos - 1];
        Ok(Span { start: first.start, end: last.end, first_token, end_token: self.pos })
    }

    fn skip_balanced(&mut self) -> Result<(), UsdaParseError> {
        let mut stack = Vec::new();
        loop {
            let Some(token) = self.peek() else {
                let open = stack.last().copied().unwrap_or('(');
                return Err(self.eof_with(UsdaParseErrorKind::Unbalanced { open }));
            };
            self.pos += 1;
            match token.kind {
                TokenKind::Punct(open @ ('(' | '[' | '{')) => stack.push(open),
                TokenKind::Punct(close @ (')' | ']' | '}')) => {
                    let expected = match stack.pop() {
                        Some('(') => ')',
                        Some('[') => ']',
                        Some(_) => '}',
                        None => return Err(self.unexpected_at(token, "opening bracket")),
                    };
                    if close != expected {
                        return Err(UsdaParseError::new(
                            token.line,
                            UsdaParseErrorKind::UnexpectedToken {
                                expected: "matching closing bracket",
                                found: close.to_string(),
                            },
                        ));
                    }
                    if stack.is_empty() {
                        return Ok(());
                    }
                }
                _ if stack.is_empty() => return Err(self.unexpected_at(token, "opening bracket")),
                _ => {}
            }
        }
    }

    fn span_text(&self, span: Span) -> &'a str {
        &self.src[span.start..span.end]
    }

    fn span_tokens(&self, span: Span) -> &[Token] {
        &self.tokens[span.first_token..span.end_token]
    }

    fn span_string(&self, span: Span) -> Option<String> {
        match self.span_tokens(span) {
            [token] if token.kind == TokenKind::String => Some(unquote(token.text(self.src))),
            [token] if token.kind == TokenKind::Ident && token.text(self.src) != "None" => {
                Some(token.text(self.src).to_owned())
            }
            _ => None,
        }
    }

    fn span_assets(&self, span: Span) -> Vec<String> {
        self.span_tokens(span)
            .iter()
            .filter(|token| token.kind == TokenKind::Asset)
            .map(|token| strip_delimiters(token.text(self.src), token.kind).to_owned())
            .collect()
    }

    fn span_paths(&self, span: Span) -> Vec<String> {
        self.span_tokens(span)
            .iter()
            .filter(|token| token.kind == TokenKind::Path)
            .map(|token| strip_delimiters(token.text(self.src), token.kind).to_owned())
            .collect()
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<Token> {
        self.tokens.get(self.pos + offset).copied()
    }

    fn peek_punct(&self, ch: char) -> bool {
        self.peek().is_some_and(|token| token.is_punct(ch))
    }

    fn eat_punct(&mut self, ch: char) -> bool {
        if self.peek_punct(ch) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn expect_punct(&mut self, ch: char) -> Result<(), UsdaParseError> {
        if self.eat_punct(ch) {
            return Ok(());
        }
        let expected = match ch {
            '(' => "'('",
            '{' => "'{'",
            '=' => "'='",
            _ => "punctuation",
        };
        Err(self.unexpected(expected))
    }

    fn expect_ident(&mut self, expected: &'static str) -> Result<&'a str, UsdaParseError> {
        let token = self.expect_kind(TokenKind::Ident, expected)?;
        Ok(token.text(self.src))
    }

    fn expect_kind(
        &mut self,
        kind: TokenKind,
        expected: &'static str,
    ) -> Result<Token, UsdaParseError> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&self, expected: &'static str) -> UsdaParseError {
        match self.peek() {
            Some(token) => self.unexpected_at(token, expected),
            None => self.eof(expected),
        }
    }

    fn unexpected_at(&self, token: Token, expected: &'static str) -> UsdaParseError {
        UsdaParseError::new(
            token.line,
            UsdaParseErrorKind::UnexpectedToken {
                expected,
                found: token.text(self.src).to_owned(),
            },
        )
    }

    fn eof(&self, expected: &'static str) -> UsdaParseError {
        self.eof_with(UsdaParseErrorKind::UnexpectedEof { expected })
    }

    fn eof_with(&self, kind: UsdaParseErrorKind) -> UsdaParseError {
        let line = self.tokens.last().map(|token| token.line).unwrap_or(1);
        UsdaParseError::new(line, kind)
    }
}

fn is_valid_prim_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|ch| ch.is_alphabetic() || ch == '_')
        && chars.all(|ch| ch.is_alphanumeric() || ch == '_')
}

fn split_property_suffix(declared: &str) -> (&str, Option<&str>) {
    match declared.rsplit_once('.') {
        Some((name, suffix)) if PROPERTY_SUFFIXES.contains(&suffix) => (name, Some(suffix)),
        _ => (declared, None),
    }
}

fn merge_list_op(existing: &mut Vec<String>, items: Vec<String>, list_op: Option<&str>) {
    match list_op {
        Some("delete") => existing.retain(|item| !items.contains(item)),
        _ => {
            for item in items {
                if !existing.contains(&item) {
                    existing.push(item);
                }
            }
        }
    }
}
