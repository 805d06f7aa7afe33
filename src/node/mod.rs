mod expression;
mod group;
mod roll;
mod table;

pub use expression::Expression;
pub use group::Group;
pub use roll::{Die, Roll, RollOutcome, DEFAULT_DIE};
pub use table::Table;

use crate::common::Int;
use crate::eval::Evaluate;
use enum_dispatch::enum_dispatch;
use std::fmt;

/// What evaluating a node produces. Only numbers take part in statistics.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Outcome {
    Number(Int),
    Text(String),
}

/// Post-fix modification of an already parsed node.
#[enum_dispatch]
pub trait Modify {
    fn modify(&mut self, modifier: &crate::parse::Modifier);
}

#[enum_dispatch(Evaluate, Modify)]
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Roll(Roll),
    Expression(Expression),
    Table(Table),
    Group(Group),
}

impl Node {
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Node::Group(group) => Some(group),
            _ => None,
        }
    }

    pub(crate) fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Node::Group(group) => Some(group),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Roll(x) => fmt::Display::fmt(x, f),
            Node::Expression(x) => fmt::Display::fmt(x, f),
            Node::Table(x) => fmt::Display::fmt(x, f),
            Node::Group(x) => fmt::Display::fmt(x, f),
        }
    }
}
