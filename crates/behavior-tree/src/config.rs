//! Tunables for the tree-definition reader and parser.

/// How much the parser logs while assembling a tree.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DebugLevel {
    /// Nothing beyond errors.
    #[default]
    None,
    /// The assembled tree once parsing succeeds.
    Low,
    /// Additionally every statement and comment as it is read.
    High,
}

/// Parser configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParserConfig {
    /// Emit `comment` events instead of discarding comments.
    pub reports_comments: bool,
    pub debug_level: DebugLevel,
}

impl ParserConfig {
    pub const DEFAULT_REPORTS_COMMENTS: bool = false;
    pub const DEFAULT_DEBUG_LEVEL: DebugLevel = DebugLevel::None;

    pub fn new() -> Self {
        Self {
            reports_comments: Self::DEFAULT_REPORTS_COMMENTS,
            debug_level: Self::DEFAULT_DEBUG_LEVEL,
        }
    }

    pub fn with_reports_comments(mut self, reports_comments: bool) -> Self {
        self.reports_comments = reports_comments;
        self
    }

    pub fn with_debug_level(mut self, debug_level: DebugLevel) -> Self {
        self.debug_level = debug_level;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_level_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<DebugLevel>(), Ok(DebugLevel::High));
        assert_eq!(DebugLevel::Low.to_string(), "low");
        assert!(DebugLevel::High > DebugLevel::Low);
        assert!("verbose".parse::<DebugLevel>().is_err());
    }

    #[test]
    fn builders_override_defaults() {
        let config = ParserConfig::new()
            .with_reports_comments(true)
            .with_debug_level(DebugLevel::Low);
        assert!(config.reports_comments);
        assert_eq!(config.debug_level, DebugLevel::Low);
        assert_eq!(ParserConfig::default().debug_level, DebugLevel::None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ParserConfig = serde_json::from_str(r#"{"debug_level":"high"}"#).unwrap();
        assert_eq!(
            config,
            ParserConfig::new().with_debug_level(DebugLevel::High)
        );
    }
}
