use crate::error::ConfigError;
use crate::eval::{MarkdownStringifier, Stringify, TerminalStringifier};
use crate::tag::TagState;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// How struck-through dice and bonus totals are emphasized.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Terminal,
    Markdown,
}

impl Default for Style {
    fn default() -> Self {
        Style::Terminal
    }
}

impl Style {
    pub fn stringifier(self) -> Box<dyn Stringify> {
        match self {
            Style::Terminal => Box::new(TerminalStringifier::new()),
            Style::Markdown => Box::new(MarkdownStringifier::new()),
        }
    }
}

/// When the rolls inside a group print their own trace lines.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracePolicy {
    /// `-verbose`, or no statistic asked for and either a single child or the root group.
    Selective,
    /// `-verbose`, or no tags at all.
    Untagged,
    Always,
}

impl Default for TracePolicy {
    fn default() -> Self {
        TracePolicy::Selective
    }
}

impl TracePolicy {
    pub fn prints_rolls(self, tags: &TagState, children: usize, depth: usize) -> bool {
        match self {
            TracePolicy::Selective => {
                tags.verbose() || (!tags.requests_statistic() && (children == 1 || depth == 0))
            }
            TracePolicy::Untagged => tags.verbose() || tags.is_empty(),
            TracePolicy::Always => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub style: Style,
    pub trace_policy: TracePolicy,
    /// Spaces per nesting level.
    pub indent: usize,
    /// Dice one line may roll before evaluation stops. Zero means no limit.
    pub max_rolls: usize,
    pub macros: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            style: Style::default(),
            trace_policy: TracePolicy::default(),
            indent: 2,
            max_rolls: 1000,
            macros: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::recognize_tag;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.indent, 2);
        assert_eq!(config.style, Style::Terminal);
        assert_eq!(config.max_rolls, 1000);
    }

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml(
            r#"
            style = "markdown"
            trace_policy = "always"
            indent = 4
            max_rolls = 0

            [macros]
            fireball = "8d6:fire"
            "#,
        )
        .unwrap();
        assert_eq!(config.style, Style::Markdown);
        assert_eq!(config.trace_policy, TracePolicy::Always);
        assert_eq!(config.indent, 4);
        assert_eq!(config.max_rolls, 0);
        assert_eq!(config.macros["fireball"], "8d6:fire");
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            Config::from_toml("style = \"fancy\""),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            Config::load("/nonexistent/dice-groups.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_trace_policies() {
        let mut tagged = TagState::new();
        let none: [&str; 0] = [];
        tagged.insert(recognize_tag("-mean", &none).unwrap().unwrap());
        tagged.settle();
        let mut untagged = TagState::new();
        untagged.settle();

        assert!(TracePolicy::Selective.prints_rolls(&untagged, 3, 0));
        assert!(TracePolicy::Selective.prints_rolls(&untagged, 1, 2));
        assert!(!TracePolicy::Selective.prints_rolls(&untagged, 3, 1));
        assert!(!TracePolicy::Selective.prints_rolls(&tagged, 1, 0));

        assert!(TracePolicy::Untagged.prints_rolls(&untagged, 3, 1));
        assert!(!TracePolicy::Untagged.prints_rolls(&tagged, 1, 0));
        assert!(TracePolicy::Always.prints_rolls(&tagged, 3, 1));
    }
}
