use super::{AttrValue, HandlerResult, ReadHandler};
use crate::{BuildError, Statement};

/// One source line that held statements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedLine {
    pub indent: usize,
    pub statements: Vec<Statement>,
}

/// Handler that keeps every line and statement as plain data.
///
/// Useful for tooling that inspects a tree definition without building it.
///
/// ```
/// use behavior_tree::{StatementCollector, TreeReader};
///
/// let mut collector = StatementCollector::new();
/// TreeReader::new().parse("selector\n  ?ready wait(seconds:2)", &mut collector)?;
///
/// let lines = collector.lines();
/// assert_eq!(lines[1].indent, 2);
/// assert_eq!(lines[1].statements[0].to_string(), "?ready");
/// # Ok::<(), behavior_tree::ParseError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct StatementCollector {
    lines: Vec<ParsedLine>,
    comments: Vec<String>,
    current: Option<Statement>,
}

impl StatementCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[ParsedLine] {
        &self.lines
    }

    /// Comments, when the reader reports them.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn into_lines(self) -> Vec<ParsedLine> {
        self.lines
    }
}

impl ReadHandler for StatementCollector {
    fn start_line(&mut self, indent: usize) -> HandlerResult {
        self.lines.push(ParsedLine {
            indent,
            statements: Vec::new(),
        });
        Ok(())
    }

    fn start_statement(
        &mut self,
        name: &str,
        is_subtree_ref: bool,
        is_guard: bool,
    ) -> HandlerResult {
        self.current = Some(Statement::new(name, is_subtree_ref, is_guard));
        Ok(())
    }

    fn attribute(&mut self, name: &str, value: AttrValue) -> HandlerResult {
        if let Some(statement) = self.current.as_mut()
            && !statement.attributes.insert(name, value)
        {
            return Err(BuildError::DuplicateAttribute {
                task: statement.name.clone(),
                attribute: name.to_owned(),
            }
            .into());
        }
        Ok(())
    }

    fn end_statement(&mut self) -> HandlerResult {
        if let (Some(statement), Some(line)) = (self.current.take(), self.lines.last_mut()) {
            line.statements.push(statement);
        }
        Ok(())
    }

    fn end_line(&mut self) -> HandlerResult {
        Ok(())
    }

    fn comment(&mut self, text: &str) -> HandlerResult {
        self.comments.push(text.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParseError, TreeReader};

    #[test]
    fn collects_lines_statements_and_comments() {
        let text = "# root\nselector\n  repeat(times:\"forever\") ->patrol # loop\n";
        let mut collector = StatementCollector::new();
        TreeReader::with_comments(true)
            .parse(text, &mut collector)
            .unwrap();

        assert_eq!(collector.comments(), [" root", " loop"]);
        let lines = collector.into_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].indent, 0);
        assert_eq!(lines[1].indent, 2);

        let rendered: Vec<_> = lines[1]
            .statements
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered, [r#"repeat(times:"forever")"#, "->patrol"]);
    }

    #[test]
    fn duplicate_attributes_are_rejected() {
        let mut collector = StatementCollector::new();
        let err = TreeReader::new()
            .parse("wait(seconds:1 seconds:2)", &mut collector)
            .unwrap_err();
        assert!(matches!(err, ParseError::Rejected { line: 1, .. }));
    }
}
