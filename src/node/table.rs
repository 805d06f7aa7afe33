use super::{Modify, Outcome};
use crate::common::is_word;
use crate::error::ParseError;
use crate::eval::{Evaluate, RResult, RollContext, Roller, Trace};
use crate::parse::Modifier;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// A keyed lookup such as `{hit=yes;miss=no}=hit`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Table {
    entries: Vec<(String, String)>,
    key: String,
}

impl Table {
    /// Whether `token` is meant as a table. It can still fail to parse.
    pub fn matches(token: &str) -> bool {
        token.starts_with('{')
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The entry for the selected key.
    pub fn lookup(&self) -> Result<&str, ParseError> {
        self.get(&self.key)
            .ok_or_else(|| ParseError::MissingTableKey {
                table: self.to_string(),
                key: self.key.clone(),
            })
    }
}

impl FromStr for Table {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidTable(s.to_string());
        let (items, key) = s
            .strip_prefix('{')
            .and_then(|rest| rest.split_once("}="))
            .ok_or_else(invalid)?;
        if key.is_empty() || !is_word(key) {
            return Err(invalid());
        }

        let mut entries: Vec<(String, String)> = Vec::new();
        for item in items.split(';') {
            let (k, v) = item.split_once('=').ok_or_else(invalid)?;
            if !is_word(k) || !is_word(v) {
                return Err(invalid());
            }
            match entries.iter_mut().find(|(existing, _)| existing == k) {
                Some(entry) => entry.1 = v.to_string(),
                None => entries.push((k.to_string(), v.to_string())),
            }
        }

        let table = Self {
            entries,
            key: key.to_string(),
        };
        table.lookup()?;
        Ok(table)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self
            .entries
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(";");
        write!(f, "{{{}}}={}", items, self.key)
    }
}

impl Evaluate for Table {
    fn evaluate<R: Roller, W: Write>(
        &mut self,
        ctx: &mut RollContext<R, W>,
        trace: Trace,
    ) -> RResult<Outcome> {
        let result = self.lookup()?.to_string();
        if trace.print {
            let line = ctx.style().str_table(self, &result);
            ctx.line(trace.depth, &line)?;
        }
        Ok(Outcome::Text(result))
    }
}

impl Modify for Table {
    fn modify(&mut self, _: &Modifier) {}
}
