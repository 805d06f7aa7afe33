//! Building the group tree from a flat token sequence.

pub(crate) mod lexer;
mod modifier;

pub use modifier::{Change, CountOp, Modifier, MODIFIER_MARKER};

use crate::common::*;
use crate::error::ParseError;
use crate::node::{Expression, Group, Modify, Node, Roll, Table};
use crate::tag::{self, TagState};
use crate::token::{self, matching_bracket, Substitute};

pub type PResult<T> = Result<T, ParseError>;

/// The most copies a single `xN` may make.
pub const MAX_REPEAT: usize = 1000;

/// Parses a token sequence into the root group (depth 0).
pub fn parse<S: AsRef<str>>(tokens: &[S]) -> PResult<Group> {
    parse_group(tokens, 0)
}

/// Tokenizes a raw line, expands macros, rewrites commas and parses the result.
pub fn parse_line(line: &str, macros: &impl Substitute) -> PResult<Group> {
    let tokens = token::tokenize(line);
    let tokens = token::expand(&tokens, macros)?;
    parse(&token::group_commas(&tokens))
}

fn parse_group<S: AsRef<str>>(tokens: &[S], depth: usize) -> PResult<Group> {
    let mut builder = GroupBuilder::new(depth);
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_ref();
        if let Some(tag) = tag::recognize_tag(token, &tokens[i + 1..])? {
            builder.tags.insert(tag);
            i += tag.consumed;
        } else if Modifier::is_modifier(token) {
            builder.modify(token)?;
        } else if let Some(times) = multiplier(token)? {
            builder.repeat(token, times)?;
        } else if token == LEFT_SEP {
            let end = matching_bracket(tokens, i)
                .ok_or_else(|| ParseError::UnclosedGroup(join(&tokens[i..])))?;
            builder.push(parse_group(&tokens[i + 1..end], depth + 1)?.into());
            i = end;
        } else if token == RIGHT_SEP {
            return Err(ParseError::UnopenedGroup(join(tokens)));
        } else {
            builder.push(leaf(token)?);
        }
        i += 1;
    }
    builder.build()
}

fn leaf(token: &str) -> PResult<Node> {
    Ok(if Expression::matches(token) {
        token.parse::<Expression>()?.into()
    } else if Table::matches(token) {
        token.parse::<Table>()?.into()
    } else {
        token.parse::<Roll>()?.into()
    })
}

/// `x3` repeats the previous node three times. Other tokens starting with `x` are not multipliers.
fn multiplier(token: &str) -> PResult<Option<usize>> {
    let digits = match token.strip_prefix('x') {
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => digits,
        _ => return Ok(None),
    };
    match digits.parse() {
        Ok(times) if times > 0 => Ok(Some(times)),
        _ => Err(ParseError::InvalidMultiplier(token.to_string())),
    }
}

fn join<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|token| token.as_ref())
        .collect::<Vec<&str>>()
        .join(" ")
}

/// The group under construction. Modifiers and multipliers act on its last child.
struct GroupBuilder {
    depth: usize,
    children: Vec<Node>,
    tags: TagState,
}

impl GroupBuilder {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            children: Vec::new(),
            tags: TagState::new(),
        }
    }

    fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    fn modify(&mut self, token: &str) -> PResult<()> {
        let last = self
            .children
            .last_mut()
            .ok_or_else(|| ParseError::DanglingModifier(token.to_string()))?;
        let modifier: Modifier = token.parse()?;
        log::debug!("applying {:?} to {}", modifier, last);
        last.modify(&modifier);
        Ok(())
    }

    fn repeat(&mut self, token: &str, times: usize) -> PResult<()> {
        if times > MAX_REPEAT {
            return Err(ParseError::MultiplierTooLarge {
                token: token.to_string(),
                max: MAX_REPEAT,
            });
        }
        let last = self
            .children
            .pop()
            .ok_or_else(|| ParseError::DanglingMultiplier(token.to_string()))?;
        self.children.extend(std::iter::repeat(last).take(times));
        Ok(())
    }

    fn build(self) -> PResult<Group> {
        let children = NonEmpty::try_from_vec(self.children).map_err(|_| ParseError::EmptyGroup)?;
        let mut tags = self.tags;
        tags.settle();
        let supertags = tags.supertags().to_vec();

        let mut group = Group::new(children, self.depth, tags);
        if !supertags.is_empty() {
            group.propagate(&supertags);
        }
        log::debug!(
            "built group at depth {} with {} children, yielding {}",
            group.depth(),
            group.children().len(),
            group.tags().yield_target()
        );
        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::{StatKind, TagName};
    use std::collections::BTreeMap;

    #[test]
    fn test_nested_groups() {
        let group = parse(&["1d4", "[", "2d6", "[", "=3", "]", "]", "-max"]).unwrap();
        assert_eq!(group.children().len(), 2);
        assert_eq!(group.to_string(), "[ 1d4 [ 2d6 [ =3 ] ] ]");
        let inner = group.children()[1].as_group().unwrap();
        assert_eq!(inner.depth(), 1);
        assert_eq!(inner.children()[1].as_group().unwrap().depth(), 2);
        assert_eq!(group.tags().yield_target(), StatKind::Max);
    }

    #[test]
    fn test_unclosed_group() {
        let err = parse(&["[", "1d1"]).unwrap_err();
        assert_eq!(err, ParseError::UnclosedGroup("[ 1d1".to_string()));
        assert!(err.to_string().contains("missing ']'"));
    }

    #[test]
    fn test_unopened_group() {
        assert_eq!(
            parse(&["1d1", "]"]),
            Err(ParseError::UnopenedGroup("1d1 ]".to_string()))
        );
    }

    #[test]
    fn test_empty_groups() {
        let none: [&str; 0] = [];
        assert_eq!(parse(&none), Err(ParseError::EmptyGroup));
        assert_eq!(parse(&["1d1", "[", "]"]), Err(ParseError::EmptyGroup));
        assert_eq!(parse(&["-total"]), Err(ParseError::EmptyGroup));
    }

    #[test]
    fn test_dangling() {
        assert_eq!(
            parse(&[".{+3}"]),
            Err(ParseError::DanglingModifier(".{+3}".to_string()))
        );
        assert_eq!(
            parse(&["x2", "1d6"]),
            Err(ParseError::DanglingMultiplier("x2".to_string()))
        );
        assert_eq!(
            parse(&["1d6", "x0"]),
            Err(ParseError::InvalidMultiplier("x0".to_string()))
        );
    }

    #[test]
    fn test_multiplier_cap() {
        assert_eq!(
            parse(&["1d6", "x4000000000"]),
            Err(ParseError::MultiplierTooLarge {
                token: "x4000000000".to_string(),
                max: MAX_REPEAT,
            })
        );
        let group = parse(&["1d6", "x1000"]).unwrap();
        assert_eq!(group.children().len(), MAX_REPEAT);
    }

    #[test]
    fn test_modifier_hits_last_child_only() {
        let group = parse(&["1d6", "1d8", ".+1", "[", "1d4", "1d4", "]", ".count=3"]).unwrap();
        assert_eq!(group.to_string(), "[ 1d6 1d8+1 [ 3d4 3d4 ] ]");
    }

    #[test]
    fn test_leaf_kinds() {
        let group = parse(&["str=2*3", "{a=x}=a", "d"]).unwrap();
        let kinds: Vec<_> = group
            .children()
            .iter()
            .map(|node| match node {
                Node::Expression(_) => "expression",
                Node::Table(_) => "table",
                Node::Roll(_) => "roll",
                Node::Group(_) => "group",
            })
            .collect();
        assert_eq!(kinds, vec!["expression", "table", "roll"]);
        assert_eq!(
            parse(&["=1/0"]),
            Err(ParseError::InvalidExpression("=1/0".to_string()))
        );
        assert_eq!(
            parse(&["xyz"]),
            Err(ParseError::InvalidRoll("xyz".to_string()))
        );
    }

    #[test]
    fn test_yield_consumes_its_target() {
        let group = parse(&["1d6", "-yield", "-min", "1d6"]).unwrap();
        assert_eq!(group.children().len(), 2);
        assert_eq!(group.tags().yield_target(), StatKind::Min);
        assert!(!group.tags().requests_statistic());
    }

    #[test]
    fn test_outermost_supertag_wins() {
        let group = parse(&["--yield", "-max", "[", "--yield", "-min", "[", "1d1", "]", "]"]).unwrap();
        let middle = group.children()[0].as_group().unwrap();
        let inner = middle.children()[0].as_group().unwrap();
        assert_eq!(middle.tags().yield_target(), StatKind::Max);
        assert_eq!(inner.tags().yield_target(), StatKind::Max);
        assert_eq!(
            middle.tags().supertags(),
            &[TagName::Yield(StatKind::Min)]
        );
    }

    #[test]
    fn test_parse_line() {
        let mut macros = BTreeMap::new();
        macros.insert("atk".to_string(), "1d20+5:hit".to_string());
        let group = parse_line("atk, atk -total", &macros).unwrap();
        assert_eq!(group.to_string(), "[ [ 1d20+5 ] [ 1d20+5 ] ]");
        assert!(group.children()[1]
            .as_group()
            .unwrap()
            .tags()
            .requests_statistic());
    }
}
