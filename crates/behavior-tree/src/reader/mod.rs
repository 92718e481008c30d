//! Event-driven reader for the textual tree language.
//!
//! The reader is a pure event producer. It knows nothing about task types or
//! the tree being described; it turns source text into a stream of
//! [`ReadHandler`] callbacks and leaves the interpretation to the handler.
//! [`TreeParser`](crate::TreeParser) is the handler that builds trees.
//!
//! # Language
//!
//! One physical line holds one or more statements. The number of leading
//! spaces or tabs is the line's indentation, which places its first statement
//! in the hierarchy. Further statements on the same line are separated by
//! whitespace.
//!
//! ```text
//! # patrol until an enemy shows up
//! selector
//!   ?enemy-visible attack(weapon:"sword" power:2.5)
//!   repeat(times:3) ->patrol
//! ```
//!
//! A statement is an optional guard marker `?`, an optional subtree
//! reference marker `->`, a name made of letters, digits, `_`, `$`, `.` and
//! `-` (not starting with a digit, `.` or `-`), and an optional parenthesized
//! list of `name:value` attributes separated by whitespace.
//!
//! Values are double-quoted strings, with the escapes `\" \\ \/ \b \f \n \r
//! \t \uXXXX`, or unquoted tokens classified by [`AttrValue::from_token`].
//! `#` starts a comment that runs to the end of the line.

mod collector;
mod error;
mod scanner;
mod value;

use std::io::Read;

pub use collector::{ParsedLine, StatementCollector};
pub use error::{ParseError, SyntaxError};
pub use value::AttrValue;

use crate::ParserConfig;
use scanner::LineScanner;

/// Outcome of a handler callback. An error aborts the parse and is reported
/// as [`ParseError::Rejected`].
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Receives the events of a [`TreeReader`].
///
/// For every line holding at least one statement the events are
/// `start_line`, then per statement `start_statement`, its `attribute`s and
/// `end_statement`, and finally `end_line`. Blank and comment-only lines
/// produce no line events.
pub trait ReadHandler {
    /// A line with statements starts at the given indentation.
    fn start_line(&mut self, indent: usize) -> HandlerResult;

    fn start_statement(&mut self, name: &str, is_subtree_ref: bool, is_guard: bool)
    -> HandlerResult;

    /// An attribute of the current statement, in source order.
    fn attribute(&mut self, name: &str, value: AttrValue) -> HandlerResult;

    fn end_statement(&mut self) -> HandlerResult;

    fn end_line(&mut self) -> HandlerResult;

    /// Text following `#`, reported only when comment reporting is enabled.
    fn comment(&mut self, _text: &str) -> HandlerResult {
        Ok(())
    }
}

/// Scanner for the tree language.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeReader {
    reports_comments: bool,
}

impl TreeReader {
    /// Creates a reader that discards comments.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comments(reports_comments: bool) -> Self {
        Self { reports_comments }
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self::with_comments(config.reports_comments)
    }

    pub fn reports_comments(&self) -> bool {
        self.reports_comments
    }

    /// Reads `text`, feeding every event to `handler`.
    ///
    /// Lines end at `\n`; a trailing `\r` is treated as whitespace.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed line ([`ParseError::Syntax`]) or the first
    /// event the handler rejects ([`ParseError::Rejected`]). Events for earlier
    /// lines have already been delivered.
    pub fn parse<H>(&self, text: &str, handler: &mut H) -> Result<(), ParseError>
    where
        H: ReadHandler + ?Sized,
    {
        for (index, line) in text.split('\n').enumerate() {
            LineScanner::new(line, handler, self.reports_comments)
                .scan()
                .map_err(|fault| fault.into_error(index + 1, line))?;
        }
        Ok(())
    }

    /// Reads the whole source from `reader`, then parses it.
    ///
    /// # Errors
    ///
    /// As [`parse`](Self::parse), plus [`ParseError::Io`] when reading fails
    /// or the source is not valid UTF-8.
    pub fn parse_reader<R, H>(&self, mut reader: R, handler: &mut H) -> Result<(), ParseError>
    where
        R: Read,
        H: ReadHandler + ?Sized,
    {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.parse(&text, handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every event as a string.
    #[derive(Default)]
    struct EventLog {
        events: Vec<String>,
    }

    impl ReadHandler for EventLog {
        fn start_line(&mut self, indent: usize) -> HandlerResult {
            self.events.push(format!("line {indent}"));
            Ok(())
        }

        fn start_statement(
            &mut self,
            name: &str,
            is_subtree_ref: bool,
            is_guard: bool,
        ) -> HandlerResult {
            let guard = if is_guard { "?" } else { "" };
            let reference = if is_subtree_ref { "->" } else { "" };
            self.events.push(format!("statement {guard}{reference}{name}"));
            Ok(())
        }

        fn attribute(&mut self, name: &str, value: AttrValue) -> HandlerResult {
            self.events.push(format!("{name}={value}"));
            Ok(())
        }

        fn end_statement(&mut self) -> HandlerResult {
            self.events.push("end statement".into());
            Ok(())
        }

        fn end_line(&mut self) -> HandlerResult {
            self.events.push("end line".into());
            Ok(())
        }

        fn comment(&mut self, text: &str) -> HandlerResult {
            self.events.push(format!("comment{text}"));
            Ok(())
        }
    }

    fn events(reader: TreeReader, text: &str) -> Vec<String> {
        let mut log = EventLog::default();
        reader.parse(text, &mut log).unwrap();
        log.events
    }

    fn syntax_error(text: &str) -> (usize, String, SyntaxError) {
        match TreeReader::new().parse(text, &mut EventLog::default()) {
            Err(ParseError::Syntax { line, near, kind }) => (line, near, kind),
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn statement_with_typed_attributes() {
        let events = events(
            TreeReader::new(),
            r#"action(speed:3.5 name:"go" enabled:true tag:null)"#,
        );
        assert_eq!(
            events,
            vec![
                "line 0",
                "statement action",
                "speed=3.5",
                "name=\"go\"",
                "enabled=true",
                "tag=null",
                "end statement",
                "end line",
            ]
        );
    }

    #[test]
    fn indentation_and_inline_statements() {
        let text = "selector\n\t?ready ->patrol\n  wait(seconds: 2)\n";
        assert_eq!(
            events(TreeReader::new(), text),
            vec![
                "line 0",
                "statement selector",
                "end statement",
                "end line",
                "line 1",
                "statement ?ready",
                "end statement",
                "statement ->patrol",
                "end statement",
                "end line",
                "line 2",
                "statement wait",
                "seconds=2",
                "end statement",
                "end line",
            ]
        );
    }

    #[test]
    fn comments_are_reported_only_when_enabled() {
        let text = "# header\nsequence # trailing\n";
        assert_eq!(
            events(TreeReader::new(), text),
            vec!["line 0", "statement sequence", "end statement", "end line"]
        );
        assert_eq!(
            events(TreeReader::with_comments(true), text),
            vec![
                "comment header",
                "line 0",
                "statement sequence",
                "end statement",
                "comment trailing",
                "end line",
            ]
        );
    }

    #[test]
    fn crlf_parses_like_lf() {
        let unix = "sequence\n  success(x:1)\n";
        let windows = "sequence\r\n  success(x:1)\r\n";
        assert_eq!(
            events(TreeReader::new(), unix),
            events(TreeReader::new(), windows)
        );
    }

    #[test]
    fn string_escapes() {
        let events = events(
            TreeReader::new(),
            r#"say(text:"a\"b\\c\/d\n\u0041\uD83D\uDE00")"#,
        );
        assert_eq!(events[2], format!("text={}", AttrValue::from("a\"b\\c/d\nA\u{1F600}")));
    }

    #[test]
    fn missing_value_names_the_line() {
        let (line, near, kind) = syntax_error("sequence\n  action(x:)\n");
        assert_eq!(line, 2);
        assert_eq!(near, ")");
        assert_eq!(
            kind,
            SyntaxError::MissingValue {
                attribute: "x".into()
            }
        );
    }

    #[test]
    fn malformed_input() {
        assert_eq!(
            syntax_error(r#"say(text:"open)"#).2,
            SyntaxError::UnterminatedString
        );
        assert_eq!(
            syntax_error("say(text:patrol)").2,
            SyntaxError::InvalidValue("patrol".into())
        );
        assert_eq!(
            syntax_error(r#"say(text:"\q")"#).2,
            SyntaxError::IllegalEscape('q')
        );
        assert_eq!(syntax_error("wait(seconds:1").2, SyntaxError::UnclosedAttributes);
        assert_eq!(syntax_error("1task").2, SyntaxError::UnexpectedChar('1'));
        assert_eq!(syntax_error("task?").2, SyntaxError::UnexpectedChar('?'));
        assert_eq!(syntax_error("?").2, SyntaxError::UnexpectedEnd);
    }

    #[test]
    fn error_reports_unparsed_remainder() {
        let err = TreeReader::new()
            .parse("a\nb\nc(x:oops y:1)\r\n", &mut EventLog::default())
            .unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert_eq!(
            err.to_string(),
            "error parsing behavior tree on line 3 near: oops y:1) \
             (attribute value 'oops' must be a number, a boolean, a string or null)"
        );
    }

    #[test]
    fn handler_rejection_is_wrapped() {
        struct Picky;
        impl ReadHandler for Picky {
            fn start_line(&mut self, _indent: usize) -> HandlerResult {
                Ok(())
            }
            fn start_statement(&mut self, name: &str, _: bool, _: bool) -> HandlerResult {
                if name == "forbidden" {
                    return Err("forbidden task".into());
                }
                Ok(())
            }
            fn attribute(&mut self, _name: &str, _value: AttrValue) -> HandlerResult {
                Ok(())
            }
            fn end_statement(&mut self) -> HandlerResult {
                Ok(())
            }
            fn end_line(&mut self) -> HandlerResult {
                Ok(())
            }
        }

        let err = TreeReader::new()
            .parse("ok\n  forbidden(x:1)", &mut Picky)
            .unwrap_err();
        match err {
            ParseError::Rejected { line, near, source } => {
                assert_eq!(line, 2);
                assert_eq!(near, "(x:1)");
                assert_eq!(source.to_string(), "forbidden task");
            }
            other => panic!("expected a rejection, got {other:?}"),
        }
    }

    #[test]
    fn parse_reader_reads_whole_source() {
        let source = std::io::Cursor::new("sequence\n  success\n");
        let mut log = EventLog::default();
        TreeReader::new().parse_reader(source, &mut log).unwrap();
        assert_eq!(log.events.len(), 8);
    }

    #[test]
    fn invalid_utf8_is_an_io_error() {
        let source = std::io::Cursor::new(vec![0xff, 0xfe]);
        let err = TreeReader::new()
            .parse_reader(source, &mut EventLog::default())
            .unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
        assert_eq!(err.line(), None);
    }
}
