// Bitauth template language (BTL) compiler library.
//
// SPDX-License-Identifier: Apache-2.0
//
// Written in 2019-2023 by
//     Dr Maxim Orlovsky <orlovsky@lnp-bp.org>
//
// Copyright (C) 2019-2023 LNP/BP Standards Association. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Recursive-descent parser for the Bitauth template language.
//!
//! Grammar: `<...>` data pushes, `$(...)` compile-time evaluations,
//! identifiers `[A-Za-z_][A-Za-z0-9_.]*`, `0x`-prefixed hex literals with an
//! even digit count, single- or double-quoted UTF-8 literals (no escapes),
//! optionally-negative decimal integers, and `//` line or `/* */` block
//! comments. Every node carries its exact 1-indexed, end-exclusive source
//! span.

use crate::{ParseError, Range, ScriptSegment, SegmentKind};

pub fn parse_script(source: &str) -> Result<Vec<ScriptSegment>, ParseError> {
    let mut parser = Parser::new(source);
    parser.parse_segments(None)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Parser {
    fn new(source: &str) -> Self {
        Parser {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> { self.chars.get(self.pos).copied() }

    fn peek_next(&self) -> Option<char> { self.chars.get(self.pos + 1).copied() }

    fn bump(&mut self) -> Option<char> {
        let next = self.peek()?;
        self.pos += 1;
        if next == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(next)
    }

    fn location(&self) -> (u32, u32) { (self.line, self.column) }

    /// The single-character span at the current position.
    fn here(&self) -> Range {
        Range::new(self.line, self.column, self.line, self.column + 1)
    }

    fn since(&self, start: (u32, u32)) -> Range {
        Range::new(start.0, start.1, self.line, self.column)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().map_or(false, char::is_whitespace) {
            self.bump();
        }
    }

    fn parse_segments(
        &mut self,
        terminator: Option<char>,
    ) -> Result<Vec<ScriptSegment>, ParseError> {
        let mut segments = vec![];
        loop {
            self.skip_whitespace();
            let Some(next) = self.peek() else {
                return match terminator {
                    None => Ok(segments),
                    Some(terminator) => Err(ParseError::new(
                        format!("unexpected end of source, expected '{terminator}'"),
                        self.here(),
                    )),
                };
            };
            if Some(next) == terminator {
                return Ok(segments);
            }
            let segment = match next {
                '<' => self.parse_push()?,
                '$' => self.parse_evaluation()?,
                '/' => self.parse_comment()?,
                '"' | '\'' => self.parse_string(next)?,
                '0' if self.peek_next() == Some('x') => self.parse_hex()?,
                '-' => self.parse_number()?,
                digit if digit.is_ascii_digit() => self.parse_number()?,
                start if start.is_ascii_alphabetic() || start == '_' => self.parse_identifier(),
                unexpected => {
                    return Err(ParseError::new(
                        format!("unexpected character '{unexpected}'"),
                        self.here(),
                    ))
                }
            };
            segments.push(segment);
        }
    }

    fn parse_push(&mut self) -> Result<ScriptSegment, ParseError> {
        let start = self.location();
        self.bump();
        let children = self.parse_segments(Some('>'))?;
        self.bump();
        Ok(ScriptSegment::new(SegmentKind::Push(children), self.since(start)))
    }

    fn parse_evaluation(&mut self) -> Result<ScriptSegment, ParseError> {
        let start = self.location();
        self.bump();
        if self.peek() != Some('(') {
            return Err(ParseError::new("expected '(' after '$'", self.here()));
        }
        self.bump();
        let children = self.parse_segments(Some(')'))?;
        self.bump();
        Ok(ScriptSegment::new(SegmentKind::Evaluation(children), self.since(start)))
    }

    fn parse_comment(&mut self) -> Result<ScriptSegment, ParseError> {
        let start = self.location();
        self.bump();
        match self.peek() {
            Some('/') => {
                self.bump();
                let mut value = String::new();
                while self.peek().map_or(false, |next| next != '\n') {
                    value.push(self.bump().expect("peeked"));
                }
                Ok(ScriptSegment::new(
                    SegmentKind::Comment(value.trim().to_owned()),
                    self.since(start),
                ))
            }
            Some('*') => {
                self.bump();
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some('*') if self.peek() == Some('/') => {
                            self.bump();
                            break;
                        }
                        Some(next) => value.push(next),
                        None => {
                            return Err(ParseError::new(
                                "unterminated block comment",
                                self.since(start),
                            ))
                        }
                    }
                }
                Ok(ScriptSegment::new(
                    SegmentKind::Comment(value.trim().to_owned()),
                    self.since(start),
                ))
            }
            _ => Err(ParseError::new("expected '//' or '/*'", self.here())),
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<ScriptSegment, ParseError> {
        let start = self.location();
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(next) if next == quote => break,
                Some(next) => value.push(next),
                None => {
                    return Err(ParseError::new("unterminated string literal", self.since(start)))
                }
            }
        }
        Ok(ScriptSegment::new(SegmentKind::Utf8Literal(value), self.since(start)))
    }

    fn parse_hex(&mut self) -> Result<ScriptSegment, ParseError> {
        let start = self.location();
        self.bump();
        self.bump();
        let mut digits = String::new();
        while self.peek().map_or(false, |next| next.is_ascii_hexdigit()) {
            digits.push(self.bump().expect("peeked"));
        }
        if digits.is_empty() {
            return Err(ParseError::new(
                "expected hexadecimal digits after '0x'",
                self.since(start),
            ));
        }
        if digits.len() % 2 != 0 {
            return Err(ParseError::new(
                "hex literals require an even number of digits",
                self.since(start),
            ));
        }
        Ok(ScriptSegment::new(SegmentKind::HexLiteral(digits), self.since(start)))
    }

    fn parse_number(&mut self) -> Result<ScriptSegment, ParseError> {
        let start = self.location();
        let mut digits = String::new();
        if self.peek() == Some('-') {
            digits.push(self.bump().expect("peeked"));
        }
        while self.peek().map_or(false, |next| next.is_ascii_digit()) {
            digits.push(self.bump().expect("peeked"));
        }
        if digits == "-" {
            return Err(ParseError::new("expected digits after '-'", self.since(start)));
        }
        let value = digits.parse::<i128>().map_err(|_| {
            ParseError::new("integer literal out of range", self.since(start))
        })?;
        Ok(ScriptSegment::new(SegmentKind::BigIntLiteral(value), self.since(start)))
    }

    fn parse_identifier(&mut self) -> ScriptSegment {
        let start = self.location();
        let mut name = String::new();
        while self
            .peek()
            .map_or(false, |next| next.is_ascii_alphanumeric() || next == '_' || next == '.')
        {
            name.push(self.bump().expect("peeked"));
        }
        ScriptSegment::new(SegmentKind::Identifier(name), self.since(start))
    }
}
