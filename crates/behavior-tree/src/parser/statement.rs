use core::fmt;

use super::BuildError;
use crate::AttrValue;

/// Ordered attributes of one statement.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute. Returns `false`, leaving the set unchanged, if
    /// the name is already present.
    pub fn insert(&mut self, name: impl Into<String>, value: AttrValue) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.entries.push((name, value));
        true
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attributes in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Fails on the first attribute whose name is not in `allowed`.
    pub fn expect_only(&self, task: &str, allowed: &[&str]) -> Result<(), BuildError> {
        match self.iter().find(|(name, _)| !allowed.contains(name)) {
            Some((name, _)) => Err(BuildError::UnknownAttribute {
                task: task.to_owned(),
                attribute: name.to_owned(),
            }),
            None => Ok(()),
        }
    }

    /// Returns the attribute or [`BuildError::MissingAttribute`].
    pub fn require(&self, task: &str, name: &str) -> Result<&AttrValue, BuildError> {
        self.get(name).ok_or_else(|| BuildError::MissingAttribute {
            task: task.to_owned(),
            attribute: name.to_owned(),
        })
    }

    pub fn bool(&self, name: &str) -> Result<Option<bool>, BuildError> {
        self.typed(name, "boolean", AttrValue::as_bool)
    }

    pub fn int(&self, name: &str) -> Result<Option<i64>, BuildError> {
        self.typed(name, "integer", AttrValue::as_int)
    }

    /// Floats; integers are accepted and widened.
    pub fn float(&self, name: &str) -> Result<Option<f64>, BuildError> {
        self.typed(name, "number", AttrValue::as_float)
    }

    pub fn str(&self, name: &str) -> Result<Option<&str>, BuildError> {
        self.typed(name, "string", AttrValue::as_str)
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        expected: &'static str,
        convert: impl FnOnce(&'a AttrValue) -> Option<T>,
    ) -> Result<Option<T>, BuildError> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        convert(value)
            .map(Some)
            .ok_or_else(|| BuildError::InvalidAttribute {
                attribute: name.to_owned(),
                expected,
                found: value.to_string(),
            })
    }
}

/// One parsed statement of the tree language.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    /// Task type, or subtree name for references.
    pub name: String,
    /// `->name`: splice a library subtree instead of creating a task.
    pub is_subtree_ref: bool,
    /// `?name`: guard of the next statement.
    pub is_guard: bool,
    pub attributes: Attributes,
}

impl Statement {
    pub fn new(name: impl Into<String>, is_subtree_ref: bool, is_guard: bool) -> Self {
        Self {
            name: name.into(),
            is_subtree_ref,
            is_guard,
            attributes: Attributes::new(),
        }
    }
}

/// Renders the statement back in source form.
impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_guard {
            f.write_str("?")?;
        }
        if self.is_subtree_ref {
            f.write_str("->")?;
        }
        f.write_str(&self.name)?;
        if !self.attributes.is_empty() {
            f.write_str("(")?;
            for (index, (name, value)) in self.attributes.iter().enumerate() {
                if index > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{name}:{value}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes() -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert("times", AttrValue::Int(3));
        attributes.insert("label", AttrValue::from("go"));
        attributes
    }

    #[test]
    fn insert_keeps_order_and_rejects_duplicates() {
        let mut attributes = attributes();
        assert!(!attributes.insert("times", AttrValue::Int(4)));
        assert_eq!(attributes.int("times"), Ok(Some(3)));
        let names: Vec<_> = attributes.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["times", "label"]);
    }

    #[test]
    fn typed_accessors() {
        let attributes = attributes();
        assert_eq!(attributes.float("times"), Ok(Some(3.0)));
        assert_eq!(attributes.str("label"), Ok(Some("go")));
        assert_eq!(attributes.bool("absent"), Ok(None));
        assert_eq!(
            attributes.int("label"),
            Err(BuildError::InvalidAttribute {
                attribute: "label".into(),
                expected: "integer",
                found: "\"go\"".into(),
            })
        );
    }

    #[test]
    fn expect_only_names_the_intruder() {
        let attributes = attributes();
        let allowed = ["times", "label"];
        assert!(attributes.expect_only("repeat", &allowed).is_ok());
        assert_eq!(
            attributes.expect_only("repeat", &["times"]),
            Err(BuildError::UnknownAttribute {
                task: "repeat".into(),
                attribute: "label".into(),
            })
        );
    }

    #[test]
    fn statement_display_round_trips_source_form() {
        let mut statement = Statement::new("wait", false, true);
        statement.attributes.insert("seconds", AttrValue::Float(1.5));
        assert_eq!(statement.to_string(), "?wait(seconds:1.5)");
        assert_eq!(
            Statement::new("patrol", true, false).to_string(),
            "->patrol"
        );
    }
}
