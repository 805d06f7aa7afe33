use super::{Modify, Outcome};
use crate::common::*;
use crate::error::ParseError;
use crate::eval::{Evaluate, RResult, RollContext, Roller, Trace};
use crate::parse::{Change, CountOp, Modifier};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// The die size used when a roll names none, so `d` and `+5` both roll a d20.
pub const DEFAULT_DIE: UInt = 20;

/// A parametric dice roll such as `4d6h3` or `2d20+5r1:attack`.
///
/// Zero-valued `reroll`, `keep_highest` and `keep_lowest` mean the clause is unset.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Roll {
    pub count: UInt,
    pub die: UInt,
    pub bonus: Int,
    pub reroll: UInt,
    pub keep_highest: UInt,
    pub keep_lowest: UInt,
    pub label: String,
}

impl Roll {
    pub fn new(count: UInt, die: UInt) -> Self {
        Self {
            count,
            die,
            bonus: 0,
            reroll: 0,
            keep_highest: 0,
            keep_lowest: 0,
            label: String::new(),
        }
    }

    /// Rolls every die, applies the reroll threshold once per die, then discards per the keep clauses.
    pub fn roll<R: Roller>(&self, roller: &mut R) -> RollOutcome {
        let mut dice: Vec<Die> = (0..self.count).map(|_| self.roll_die(roller)).collect();
        let discarded = self.discarded(&dice);
        for (die, discard) in dice.iter_mut().zip(discarded) {
            die.kept = !discard;
        }
        let die_sum = dice
            .iter()
            .fold(0 as Int, |sum, die| sum.saturating_add(Int::from(die.total())));
        RollOutcome {
            dice,
            die_sum,
            total: die_sum.saturating_add(self.bonus),
        }
    }

    fn roll_die<R: Roller>(&self, roller: &mut R) -> Die {
        let (first, reroll) = match NonZeroUInt::new(self.die) {
            None => (0, (self.reroll > 0).then(|| 0)),
            Some(sides) => {
                let first = roller.roll(sides);
                let reroll = (first <= self.reroll).then(|| roller.roll(sides));
                (first, reroll)
            }
        };
        Die {
            first,
            reroll,
            kept: true,
        }
    }

    /// Marks the dice the keep clauses throw away. Equal values are discarded in roll order.
    fn discarded(&self, dice: &[Die]) -> Vec<bool> {
        let n = dice.len();
        let mut by_value: Vec<usize> = (0..n).collect();
        by_value.sort_by_key(|&i| dice[i].value());

        let mut ret = vec![false; n];
        if self.keep_highest > 0 {
            let keep = n.min(self.keep_highest as usize);
            for &i in &by_value[..n - keep] {
                ret[i] = true;
            }
        }
        if self.keep_lowest > 0 {
            let keep = n.min(self.keep_lowest as usize);
            for &i in &by_value[keep..] {
                ret[i] = true;
            }
        }
        ret
    }
}

impl FromStr for Roll {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::lexer::parse_roll(s)
    }
}

/// The canonical notation, without the label. Parsing it back yields the same roll.
impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.die)?;
        if self.bonus != 0 {
            write!(f, "{:+}", self.bonus)?;
        }
        if self.reroll > 0 {
            write!(f, "r{}", self.reroll)?;
        }
        if self.keep_highest > 0 {
            write!(f, "h{}", self.keep_highest)?;
        }
        if self.keep_lowest > 0 {
            write!(f, "l{}", self.keep_lowest)?;
        }
        Ok(())
    }
}

impl Evaluate for Roll {
    fn evaluate<R: Roller, W: Write>(
        &mut self,
        ctx: &mut RollContext<R, W>,
        trace: Trace,
    ) -> RResult<Outcome> {
        ctx.count_rolls(self.count as usize)?;
        let outcome = self.roll(ctx.roller());
        log::trace!("rolled {:?} for {}", &outcome.dice, &self);
        if trace.print {
            let line = ctx.style().str_roll(self, &outcome);
            ctx.line(trace.depth, &line)?;
        }
        Ok(Outcome::Number(outcome.total))
    }
}

impl Modify for Roll {
    fn modify(&mut self, modifier: &Modifier) {
        if !modifier.targets(&self.label) {
            return;
        }
        match &modifier.change {
            Change::Bonus(n) => self.bonus = self.bonus.saturating_add(*n),
            Change::Count(op, n) => {
                self.count = match op {
                    CountOp::Set => *n,
                    CountOp::Mul => self.count.saturating_mul(*n),
                    CountOp::Add => self.count.saturating_add(*n),
                }
            }
            Change::KeepHighest(n) => self.keep_highest = *n,
            Change::KeepLowest(n) => self.keep_lowest = *n,
            Change::Reroll(n) => self.reroll = *n,
            Change::Label(text) => self.label = text.clone(),
        }
    }
}

/// One die of a roll: its first face, the face it was rerolled to, and whether it counts.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Die {
    pub first: UInt,
    pub reroll: Option<UInt>,
    pub kept: bool,
}

impl Die {
    pub fn value(&self) -> UInt {
        self.reroll.unwrap_or(self.first)
    }

    pub fn total(&self) -> UInt {
        if self.kept {
            self.value()
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RollOutcome {
    pub dice: Vec<Die>,
    pub die_sum: Int,
    pub total: Int,
}

impl RollOutcome {
    pub fn rerolled(&self) -> bool {
        self.dice.iter().any(|die| die.reroll.is_some())
    }

    pub fn discarded(&self) -> usize {
        self.dice.iter().filter(|die| !die.kept).count()
    }
}
