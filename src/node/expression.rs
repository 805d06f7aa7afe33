use super::{Modify, Outcome};
use crate::common::*;
use crate::error::ParseError;
use crate::eval::{Evaluate, RResult, RollContext, Roller, Trace};
use crate::parse::Modifier;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// A constant such as `str=3+2`, computed once when parsed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Expression {
    pub label: String,
    pub value: Int,
}

impl Expression {
    /// Whether `token` has the `label=...` shape. It can still fail to parse if the arithmetic is bad.
    pub fn matches(token: &str) -> bool {
        token
            .split_once('=')
            .map_or(false, |(label, _)| is_word(label))
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidExpression(s.to_string());
        let (label, arithmetic) = s.split_once('=').ok_or_else(invalid)?;
        if !is_word(label) || arithmetic.is_empty() {
            return Err(invalid());
        }
        let value = arithmetic_value(arithmetic).ok_or_else(invalid)?;
        Ok(Self {
            label: label.to_string(),
            value: value as Int,
        })
    }
}

/// Evaluates `+ - * /` strictly left to right. A `-` with no digits before it negates the next number.
fn arithmetic_value(src: &str) -> Option<Float> {
    let mut acc: Float = 0.0;
    let mut op = '+';
    let mut num = String::new();
    for c in src.chars() {
        match c {
            '0'..='9' | '.' => num.push(c),
            '-' if num.is_empty() => num.push(c),
            '+' | '-' | '*' | '/' => {
                acc = apply(op, acc, num.parse().ok()?)?;
                num.clear();
                op = c;
            }
            _ => return None,
        }
    }
    let acc = apply(op, acc, num.parse().ok()?)?;
    acc.is_finite().then(|| acc)
}

fn apply(op: char, lhs: Float, rhs: Float) -> Option<Float> {
    match op {
        '+' => Some(lhs + rhs),
        '-' => Some(lhs - rhs),
        '*' => Some(lhs * rhs),
        '/' if rhs != 0.0 => Some(lhs / rhs),
        _ => None,
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.label, self.value)
    }
}

impl Evaluate for Expression {
    fn evaluate<R: Roller, W: Write>(
        &mut self,
        ctx: &mut RollContext<R, W>,
        trace: Trace,
    ) -> RResult<Outcome> {
        if trace.print {
            let line = ctx.style().str_expression(self);
            ctx.line(trace.depth, &line)?;
        }
        Ok(Outcome::Number(self.value))
    }
}

impl Modify for Expression {
    fn modify(&mut self, _: &Modifier) {}
}
