use super::{roller::Roller, stringify::Stringify, Evaluate, RResult, Trace};
use crate::common::Int;
use crate::config::{Config, TracePolicy};
use crate::error::RollError;
use crate::node::{Group, Outcome};
use std::io::{self, Write};

pub type DefaultRoller = rand::rngs::ThreadRng;

/// Everything evaluation needs besides the tree: the dice, where trace lines go and how they look.
pub struct RollContext<R = DefaultRoller, W = io::Stdout> {
    max_rolls: Option<usize>,
    rolls: usize,
    roller: R,
    out: W,
    style: Box<dyn Stringify>,
    policy: TracePolicy,
    indent: usize,
}

impl<R: Roller, W: Write> RollContext<R, W> {
    pub fn new(roller: R, out: W, config: &Config) -> Self {
        Self {
            max_rolls: (config.max_rolls > 0).then(|| config.max_rolls),
            rolls: 0,
            roller,
            out,
            style: config.style.stringifier(),
            policy: config.trace_policy,
            indent: config.indent,
        }
    }

    pub fn roller(&mut self) -> &mut R {
        &mut self.roller
    }

    /// Charges `n` dice against the budget before they are rolled.
    pub fn count_rolls(&mut self, n: usize) -> RResult<()> {
        self.rolls = self.rolls.saturating_add(n);
        match self.max_rolls {
            Some(max) if self.rolls > max => Err(RollError::TooManyRolls(max)),
            _ => Ok(()),
        }
    }

    pub fn style(&self) -> &dyn Stringify {
        &*self.style
    }

    pub fn policy(&self) -> TracePolicy {
        self.policy
    }

    /// Writes one trace line indented for `depth`.
    pub fn line(&mut self, depth: usize, text: &str) -> io::Result<()> {
        writeln!(self.out, "{:width$}{}", "", text, width = depth * self.indent)
    }

    pub fn blank_line(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    /// Evaluates a root group, printing its trace, and returns its yield.
    pub fn eval(&mut self, group: &mut Group) -> RResult<Int> {
        let outcome = group.evaluate(self, Trace::root())?;
        self.out.flush()?;
        Ok(match outcome {
            Outcome::Number(n) => n,
            Outcome::Text(_) => 0,
        })
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Style;
    use crate::eval::roller::StepRoller;

    fn ctx() -> RollContext<StepRoller, Vec<u8>> {
        let config = Config {
            style: Style::Markdown,
            ..Config::default()
        };
        RollContext::new(StepRoller::new(1, 1), Vec::new(), &config)
    }

    #[test]
    fn test_lines_are_indented_by_depth() {
        let mut ctx = ctx();
        ctx.line(0, "Total: 3").unwrap();
        ctx.line(2, "Mean: 1.5").unwrap();
        ctx.blank_line().unwrap();
        let out = String::from_utf8(ctx.into_output()).unwrap();
        assert_eq!(out, "Total: 3\n    Mean: 1.5\n\n");
    }

    #[test]
    fn test_roll_budget() {
        let config = Config {
            max_rolls: 5,
            ..Config::default()
        };
        let mut ctx = RollContext::new(StepRoller::new(1, 1), Vec::new(), &config);
        ctx.count_rolls(3).unwrap();
        ctx.count_rolls(2).unwrap();
        assert!(matches!(ctx.count_rolls(1), Err(RollError::TooManyRolls(5))));

        let mut group = crate::parse::parse(&["4000000000d6"]).unwrap();
        let mut ctx = RollContext::new(StepRoller::new(1, 1), Vec::new(), &Config::default());
        assert!(matches!(ctx.eval(&mut group), Err(RollError::TooManyRolls(1000))));

        let mut group = crate::parse::parse(&["1d6", ".count*=4000000000"]).unwrap();
        let mut ctx = RollContext::new(StepRoller::new(1, 1), Vec::new(), &Config::default());
        assert!(matches!(ctx.eval(&mut group), Err(RollError::TooManyRolls(_))));
    }

    #[test]
    fn test_unbounded_budget() {
        let config = Config {
            max_rolls: 0,
            ..Config::default()
        };
        let mut ctx = RollContext::new(StepRoller::new(1, 1), Vec::new(), &config);
        assert!(ctx.count_rolls(usize::MAX).is_ok());
        assert!(ctx.count_rolls(1).is_ok());
    }

    #[test]
    fn test_eval_returns_yield() {
        let mut ctx = ctx();
        let mut group = crate::parse::parse(&["2d4", "1d6"]).unwrap();
        // 1 + 2 from the d4s, then 3 from the d6
        assert_eq!(ctx.eval(&mut group).unwrap(), 6);
    }
}
