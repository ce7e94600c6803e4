// src/manifest/type_expr.rs
//! Textual type expressions used in manifests.
//!
//! ```text
//! type  := 'tracked' '(' key ')' named {'[' ']'}
//!        | '?' [('extends' | 'super') type]
//!        | named {'[' ']'}
//! named := ident {'.' ident} ['<' type {',' type} '>'] ['[' key {',' key} ']']
//! ```
//!
//! `Name[a, b]` binds key parameters; `Name[]` is an array.

use crate::errors::DriverError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Named(NamedType),
    Array(Box<TypeExpr>),
    /// `?`, `? extends T` or `? super T`.
    Wildcard(Option<(BoundKind, Box<TypeExpr>)>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedType {
    pub name: String,
    pub args: Vec<TypeExpr>,
    pub keys: Vec<String>,
    pub tracked: Option<String>,
}

impl NamedType {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// No arguments, keys or tracking key.
    pub fn is_plain(&self) -> bool {
        self.args.is_empty() && self.keys.is_empty() && self.tracked.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Extends,
    Super,
}

/// Parse a complete type expression.
pub fn parse_type(text: &str) -> Result<TypeExpr, DriverError> {
    let mut parser = Parser::new(text);
    let ty = parser.ty()?;
    parser.finish()?;
    Ok(ty)
}

/// Parse a type parameter declaration: `T` or `T extends Bound`.
pub fn parse_type_param(text: &str) -> Result<(String, Option<TypeExpr>), DriverError> {
    let mut parser = Parser::new(text);
    let name = parser.ident()?;
    let bound = if parser.keyword("extends") {
        Some(parser.ty()?)
    } else {
        None
    };
    parser.finish()?;
    Ok((name, bound))
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn error(&self, reason: &'static str) -> DriverError {
        let len = usize::from(self.pos < self.text.len());
        DriverError::TypeSyntax {
            text: self.text.to_string(),
            reason,
            source_code: self.text.to_string(),
            span: (self.pos, len).into(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.text.len() - trimmed.len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.rest().chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char, reason: &'static str) -> Result<(), DriverError> {
        if self.eat(c) { Ok(()) } else { Err(self.error(reason)) }
    }

    fn finish(&mut self) -> Result<(), DriverError> {
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.error("unexpected trailing input")),
        }
    }

    fn is_ident_char(c: char) -> bool {
        c.is_alphanumeric() || c == '_' || c == '$'
    }

    fn ident(&mut self) -> Result<String, DriverError> {
        self.skip_ws();
        let rest = self.rest();
        match rest.chars().next() {
            Some(c) if Self::is_ident_char(c) && !c.is_ascii_digit() => {}
            Some(_) => return Err(self.error("expected a name")),
            None => return Err(self.error("unexpected end")),
        }
        let len = rest
            .find(|c: char| !Self::is_ident_char(c))
            .unwrap_or(rest.len());
        self.pos += len;
        Ok(rest[..len].to_string())
    }

    /// Consume `word` if it is the next whole identifier.
    fn keyword(&mut self, word: &str) -> bool {
        self.skip_ws();
        let rest = self.rest();
        let whole = rest.starts_with(word)
            && !rest[word.len()..].starts_with(Self::is_ident_char);
        if whole {
            self.pos += word.len();
        }
        whole
    }

    fn ty(&mut self) -> Result<TypeExpr, DriverError> {
        if self.eat('?') {
            let bound = if self.keyword("extends") {
                Some((BoundKind::Extends, Box::new(self.ty()?)))
            } else if self.keyword("super") {
                Some((BoundKind::Super, Box::new(self.ty()?)))
            } else {
                None
            };
            return Ok(TypeExpr::Wildcard(bound));
        }

        let tracked = if self.rest_is_tracked() {
            self.keyword("tracked");
            self.expect('(', "expected '(' after tracked")?;
            let key = self.ident()?;
            self.expect(')', "expected ')' after tracking key")?;
            Some(key)
        } else {
            None
        };

        let mut named = self.named()?;
        named.tracked = tracked;
        let mut ty = TypeExpr::Named(named);
        while self.array_suffix()? {
            ty = TypeExpr::Array(Box::new(ty));
        }
        Ok(ty)
    }

    fn rest_is_tracked(&mut self) -> bool {
        self.skip_ws();
        let after = self.rest().strip_prefix("tracked");
        after.is_some_and(|after| after.trim_start().starts_with('('))
    }

    fn named(&mut self) -> Result<NamedType, DriverError> {
        let mut name = self.ident()?;
        while self.eat('.') {
            name.push('.');
            name.push_str(&self.ident()?);
        }
        let mut named = NamedType::plain(name);

        if self.eat('<') {
            loop {
                named.args.push(self.ty()?);
                if !self.eat(',') {
                    break;
                }
            }
            self.expect('>', "expected '>' to close type arguments")?;
        }

        // `[k]` is a key list, `[]` an array suffix handled by the caller.
        let save = self.pos;
        if self.eat('[') {
            if self.peek() == Some(']') {
                self.pos = save;
            } else {
                loop {
                    named.keys.push(self.ident()?);
                    if !self.eat(',') {
                        break;
                    }
                }
                self.expect(']', "expected ']' to close key list")?;
            }
        }
        Ok(named)
    }

    fn array_suffix(&mut self) -> Result<bool, DriverError> {
        if !self.eat('[') {
            return Ok(false);
        }
        self.expect(']', "expected ']' after '['")?;
        Ok(true)
    }
}
