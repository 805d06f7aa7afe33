mod ctx;
mod num;
pub(crate) mod roller;
mod stringify;

use crate::error::RollError;

pub type RResult<T> = Result<T, RollError>;

pub use ctx::{DefaultRoller, RollContext};
pub use num::Number;
pub use roller::Roller;
pub use stringify::{MarkdownStringifier, Stringify, TerminalStringifier};

/// Whether a node should print its own trace line, and how deep it sits.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Trace {
    pub print: bool,
    pub depth: usize,
}

impl Trace {
    pub fn new(print: bool, depth: usize) -> Self {
        Self { print, depth }
    }

    pub fn root() -> Self {
        Self::new(true, 0)
    }
}

/// Evaluation shared by every node kind.
#[enum_dispatch::enum_dispatch]
pub trait Evaluate {
    fn evaluate<R: crate::eval::Roller, W: std::io::Write>(
        &mut self,
        ctx: &mut crate::eval::RollContext<R, W>,
        trace: crate::eval::Trace,
    ) -> crate::eval::RResult<crate::node::Outcome>;
}
