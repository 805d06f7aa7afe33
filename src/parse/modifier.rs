use crate::common::*;
use crate::error::ParseError;
use std::str::FromStr;

pub const MODIFIER_MARKER: char = '.';

/// A post-fix change to the node before it, such as `.+2`, `.count*=2` or `.@atk:h1`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Modifier {
    /// Only rolls with this label are changed. `None` changes every roll.
    pub target: Option<String>,
    pub change: Change,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Change {
    Bonus(Int),
    Count(CountOp, UInt),
    KeepHighest(UInt),
    KeepLowest(UInt),
    Reroll(UInt),
    Label(String),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CountOp {
    Set,
    Mul,
    Add,
}

impl Modifier {
    pub fn is_modifier(token: &str) -> bool {
        token.starts_with(MODIFIER_MARKER)
    }

    pub fn targets(&self, label: &str) -> bool {
        self.target.as_deref().map_or(true, |target| target == label)
    }
}

impl FromStr for Modifier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidModifier(s.to_string());
        let body = s.strip_prefix(MODIFIER_MARKER).ok_or_else(invalid)?;
        let (target, body) = match body.strip_prefix('@') {
            Some(rest) => {
                let (name, body) = rest.split_once(':').ok_or_else(invalid)?;
                if name.is_empty() || !is_word(name) {
                    return Err(invalid());
                }
                (Some(name.to_string()), body)
            }
            None => (None, body),
        };
        let body = body
            .strip_prefix('{')
            .and_then(|inner| inner.strip_suffix('}'))
            .unwrap_or(body);
        let change = parse_change(body).ok_or_else(invalid)?;
        Ok(Self { target, change })
    }
}

fn parse_change(body: &str) -> Option<Change> {
    if let Some(n) = signed(body) {
        return Some(Change::Bonus(n));
    }
    if let Some(rest) = body.strip_prefix("count") {
        let (op, n) = if let Some(n) = rest.strip_prefix("*=") {
            (CountOp::Mul, n)
        } else if let Some(n) = rest.strip_prefix("+=") {
            (CountOp::Add, n)
        } else {
            (CountOp::Set, rest.strip_prefix('=')?)
        };
        // a roll always has at least one die
        let n = unsigned(n).filter(|&n| n > 0 || op == CountOp::Add)?;
        return Some(Change::Count(op, n));
    }
    if let Some(n) = body.strip_prefix('h').and_then(unsigned) {
        return Some(Change::KeepHighest(n));
    }
    if let Some(n) = body.strip_prefix('l').and_then(unsigned) {
        return Some(Change::KeepLowest(n));
    }
    if let Some(n) = body.strip_prefix('r').and_then(unsigned) {
        return Some(Change::Reroll(n));
    }
    body.strip_prefix("label=")
        .map(|label| Change::Label(label.to_string()))
}

fn unsigned(s: &str) -> Option<UInt> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn signed(s: &str) -> Option<Int> {
    let digits = s.strip_prefix('+').or_else(|| s.strip_prefix('-'))?;
    unsigned(digits)?;
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modifier(token: &str) -> Modifier {
        token.parse().unwrap()
    }

    #[test]
    fn test_changes() {
        assert_eq!(modifier(".+3").change, Change::Bonus(3));
        assert_eq!(modifier(".-2").change, Change::Bonus(-2));
        assert_eq!(modifier(".count=4").change, Change::Count(CountOp::Set, 4));
        assert_eq!(modifier(".count*=2").change, Change::Count(CountOp::Mul, 2));
        assert_eq!(modifier(".count+=1").change, Change::Count(CountOp::Add, 1));
        assert_eq!(modifier(".count+=0").change, Change::Count(CountOp::Add, 0));
        assert_eq!(modifier(".h1").change, Change::KeepHighest(1));
        assert_eq!(modifier(".l2").change, Change::KeepLowest(2));
        assert_eq!(modifier(".r1").change, Change::Reroll(1));
        assert_eq!(
            modifier(".label=fire").change,
            Change::Label("fire".to_string())
        );
    }

    #[test]
    fn test_target_and_braces() {
        let m = modifier(".@atk:{h1}");
        assert_eq!(m.target.as_deref(), Some("atk"));
        assert_eq!(m.change, Change::KeepHighest(1));
        assert!(m.targets("atk"));
        assert!(!m.targets("dmg"));

        assert_eq!(modifier(".{+3}"), modifier(".+3"));
        assert!(modifier(".+3").targets("anything"));
    }

    #[test]
    fn test_invalid() {
        for token in [
            ".", ".+", ".x3", ".count", ".count-=1", ".count=0", ".count*=0", ".h", ".@:+1",
            ".@a b:+1", ".@atk+1", ".{+3",
        ] {
            assert_eq!(
                token.parse::<Modifier>(),
                Err(ParseError::InvalidModifier(token.to_string())),
                "{}",
                token
            );
        }
    }
}
