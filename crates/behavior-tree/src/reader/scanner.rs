//! Character scanner for one physical line.

use std::error::Error;

use super::{AttrValue, HandlerResult, ParseError, ReadHandler, SyntaxError};

/// Where and why scanning a line stopped.
pub(super) struct Fault {
    /// Byte offset into the line.
    pos: usize,
    kind: FaultKind,
}

enum FaultKind {
    Syntax(SyntaxError),
    Rejected(Box<dyn Error + Send + Sync>),
}

impl Fault {
    pub(super) fn into_error(self, line: usize, text: &str) -> ParseError {
        let near = text
            .get(self.pos..)
            .unwrap_or_default()
            .trim_end_matches('\r')
            .to_owned();
        match self.kind {
            FaultKind::Syntax(kind) => ParseError::Syntax { line, near, kind },
            FaultKind::Rejected(source) => ParseError::Rejected { line, near, source },
        }
    }
}

type Scan<T> = Result<T, Fault>;

const fn is_indent(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

const fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '_' | '$')
}

const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '-')
}

const fn ends_unquoted(c: char) -> bool {
    matches!(c, '(' | ')' | ' ' | '\t' | '\r')
}

/// Scans one line and feeds its events to a handler.
pub(super) struct LineScanner<'a, H: ?Sized> {
    line: &'a str,
    pos: usize,
    handler: &'a mut H,
    reports_comments: bool,
}

impl<'a, H: ReadHandler + ?Sized> LineScanner<'a, H> {
    pub(super) fn new(line: &'a str, handler: &'a mut H, reports_comments: bool) -> Self {
        Self {
            line,
            pos: 0,
            handler,
            reports_comments,
        }
    }

    pub(super) fn scan(mut self) -> Scan<()> {
        let indent = self.line.chars().take_while(|&c| is_indent(c)).count();
        self.pos = indent;
        self.skip_space();

        match self.peek() {
            None => return Ok(()),
            Some('#') => return self.comment(),
            Some(_) => {}
        }

        self.emit(|handler| handler.start_line(indent))?;
        loop {
            self.statement()?;
            let gap = self.skip_space();
            match self.peek() {
                None => break,
                Some('#') => {
                    self.comment()?;
                    break;
                }
                Some(c) if gap == 0 => return self.fail(SyntaxError::UnexpectedChar(c)),
                Some(_) => {}
            }
        }
        self.emit(|handler| handler.end_line())
    }

    fn statement(&mut self) -> Scan<()> {
        let is_guard = self.eat('?');
        let is_subtree_ref = self.eat_str("->");
        let name = self.name()?;
        self.emit(|handler| handler.start_statement(name, is_subtree_ref, is_guard))?;

        if self.eat('(') {
            loop {
                self.skip_space();
                match self.peek() {
                    Some(')') => {
                        self.bump();
                        break;
                    }
                    None => return self.fail(SyntaxError::UnclosedAttributes),
                    Some(_) => {}
                }

                self.attribute()?;
                match self.peek() {
                    Some(c) if is_space(c) || c == ')' => {}
                    Some(c) => return self.fail(SyntaxError::UnexpectedChar(c)),
                    None => return self.fail(SyntaxError::UnclosedAttributes),
                }
            }
        }

        self.emit(|handler| handler.end_statement())
    }

    fn attribute(&mut self) -> Scan<()> {
        let name = self.name()?;
        self.skip_space();
        match self.peek() {
            Some(':') => {
                self.bump();
            }
            Some(c) => return self.fail(SyntaxError::UnexpectedChar(c)),
            None => return self.fail(SyntaxError::UnclosedAttributes),
        }
        self.skip_space();

        let value = match self.peek() {
            None | Some(')') => {
                return self.fail(SyntaxError::MissingValue {
                    attribute: name.to_owned(),
                });
            }
            Some('"') => self.quoted()?,
            Some(c @ ('#' | ':' | '(')) => return self.fail(SyntaxError::UnexpectedChar(c)),
            Some(_) => self.unquoted()?,
        };
        self.emit(|handler| handler.attribute(name, value))
    }

    fn name(&mut self) -> Scan<&'a str> {
        let start = self.pos;
        match self.peek() {
            Some(c) if is_name_start(c) => {
                self.bump();
            }
            Some(c) => return self.fail(SyntaxError::UnexpectedChar(c)),
            None => return self.fail(SyntaxError::UnexpectedEnd),
        }
        while matches!(self.peek(), Some(c) if is_name_char(c)) {
            self.bump();
        }
        let line = self.line;
        Ok(&line[start..self.pos])
    }

    fn quoted(&mut self) -> Scan<AttrValue> {
        let start = self.pos;
        self.bump();

        let mut value = String::new();
        loop {
            match self.bump() {
                None => return fail_at(start, SyntaxError::UnterminatedString),
                Some('"') => return Ok(AttrValue::Str(value)),
                Some('\\') => value.push(self.escape(start)?),
                Some(c) => value.push(c),
            }
        }
    }

    fn escape(&mut self, string_start: usize) -> Scan<char> {
        let at = self.pos - 1;
        let c = match self.bump() {
            None => return fail_at(string_start, SyntaxError::UnterminatedString),
            Some(c @ ('"' | '\\' | '/')) => c,
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('u') => return self.unicode(at),
            Some(c) => return fail_at(at, SyntaxError::IllegalEscape(c)),
        };
        Ok(c)
    }

    /// Decodes `\uXXXX`, combining UTF-16 surrogate pairs.
    fn unicode(&mut self, at: usize) -> Scan<char> {
        let high = self.hex4(at)?;
        let code = if (0xD800..0xDC00).contains(&high) && self.eat_str("\\u") {
            let low = self.hex4(at)?;
            if !(0xDC00..0xE000).contains(&low) {
                return self.invalid_unicode(at);
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };
        match char::from_u32(code) {
            Some(c) => Ok(c),
            None => self.invalid_unicode(at),
        }
    }

    fn hex4(&mut self, at: usize) -> Scan<u32> {
        let start = self.pos;
        for _ in 0..4 {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    self.bump();
                }
                _ => return self.invalid_unicode(at),
            }
        }
        u32::from_str_radix(&self.line[start..self.pos], 16).or_else(|_| self.invalid_unicode(at))
    }

    fn invalid_unicode<T>(&self, at: usize) -> Scan<T> {
        let escape = self.line[at..self.pos].to_owned();
        fail_at(at, SyntaxError::InvalidUnicodeEscape(escape))
    }

    fn unquoted(&mut self) -> Scan<AttrValue> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if !ends_unquoted(c)) {
            self.bump();
        }
        let token = &self.line[start..self.pos];
        match AttrValue::from_token(token) {
            Some(value) => Ok(value),
            None => fail_at(start, SyntaxError::InvalidValue(token.to_owned())),
        }
    }

    fn comment(&mut self) -> Scan<()> {
        self.bump();
        let line = self.line;
        let text = line[self.pos..].trim_end_matches('\r');
        if self.reports_comments {
            self.emit(|handler| handler.comment(text))?;
        }
        self.pos = self.line.len();
        Ok(())
    }

    fn emit(&mut self, event: impl FnOnce(&mut H) -> HandlerResult) -> Scan<()> {
        let pos = self.pos;
        event(&mut *self.handler).map_err(|source| Fault {
            pos,
            kind: FaultKind::Rejected(source),
        })
    }

    fn fail<T>(&self, kind: SyntaxError) -> Scan<T> {
        fail_at(self.pos, kind)
    }

    fn peek(&self) -> Option<char> {
        self.line[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, expected: &str) -> bool {
        if self.line[self.pos..].starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    fn skip_space(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_space(c)) {
            self.bump();
        }
        self.pos - start
    }
}

fn fail_at<T>(pos: usize, kind: SyntaxError) -> Scan<T> {
    Err(Fault {
        pos,
        kind: FaultKind::Syntax(kind),
    })
}
