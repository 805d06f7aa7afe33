//! Grouped, tagged dice notation: `[ 4d6h3 ] x6 -total -nice`, `2d20h1+5:attack, 1d8+3 -verbose`.
//!
//! A line is tokenized, macros are substituted, and the tokens are parsed into a tree of
//! [`Group`]s holding rolls, expressions and tables. Evaluating the root group prints a trace and
//! returns the group's yield statistic.

pub mod common;
pub mod config;
pub mod error;
// `eval` defines `Evaluate`, which `node` dispatches over, so it has to come first
pub mod eval;
pub mod node;
pub mod parse;
pub mod tag;
pub mod token;

pub use config::{Config, Style, TracePolicy};
pub use error::{ConfigError, ParseError, RollError};
pub use eval::{Evaluate, RollContext, Roller};
pub use node::{Expression, Group, Node, Outcome, Roll, Table};
pub use parse::{parse, parse_line};

use common::Int;

/// Rolls `line` with the default configuration, printing the trace to stdout.
pub fn roll(line: &str) -> Result<Int, RollError> {
    roll_with(&Config::default(), line)
}

pub fn roll_with(config: &Config, line: &str) -> Result<Int, RollError> {
    let mut group = parse_line(line, &config.macros)?;
    let mut ctx = RollContext::new(rand::thread_rng(), std::io::stdout(), config);
    ctx.eval(&mut group)
}
