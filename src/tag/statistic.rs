use crate::common::{Float, Int};
use crate::eval::Number;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StatKind {
    Total,
    Mean,
    Std,
    Median,
    Mode,
    Range,
    Max,
    Min,
}

impl StatKind {
    pub const ALL: [StatKind; 8] = [
        StatKind::Total,
        StatKind::Mean,
        StatKind::Std,
        StatKind::Median,
        StatKind::Mode,
        StatKind::Range,
        StatKind::Max,
        StatKind::Min,
    ];

    /// The tag name, as written after the `-` marker.
    pub fn name(self) -> &'static str {
        match self {
            StatKind::Total => "total",
            StatKind::Mean => "mean",
            StatKind::Std => "std",
            StatKind::Median => "median",
            StatKind::Mode => "mode",
            StatKind::Range => "range",
            StatKind::Max => "max",
            StatKind::Min => "min",
        }
    }

    fn title(self) -> &'static str {
        match self {
            StatKind::Total => "Total",
            StatKind::Mean => "Mean",
            StatKind::Std => "Standard Deviation",
            StatKind::Median => "Median",
            StatKind::Mode => "Mode",
            StatKind::Range => "Range",
            StatKind::Max => "Maximum",
            StatKind::Min => "Minimum",
        }
    }

    pub fn compute(self, outcomes: &[Int]) -> StatValue {
        let n = outcomes.len();
        if n == 0 && self != StatKind::Total {
            return StatValue::Undefined;
        }
        let sum = outcomes.iter().fold(0 as Int, |sum, &x| sum.saturating_add(x));
        let mean = outcomes.iter().map(|&x| x as Float).sum::<Float>() / n as Float;
        match self {
            StatKind::Total => StatValue::Number(sum.into()),
            StatKind::Mean => StatValue::Number(mean.into()),
            StatKind::Std if n < 2 => StatValue::Undefined,
            StatKind::Std => {
                let squares: Float = outcomes
                    .iter()
                    .map(|&x| (x as Float - mean).powi(2))
                    .sum();
                StatValue::Number((squares / (n - 1) as Float).sqrt().into())
            }
            StatKind::Median => {
                let mut sorted = outcomes.to_vec();
                sorted.sort_unstable();
                let middle = (sorted[n / 2] as Float + sorted[(n - 1) / 2] as Float) / 2.0;
                StatValue::Number(middle.into())
            }
            StatKind::Mode => {
                let mut counts = BTreeMap::new();
                for &x in outcomes {
                    *counts.entry(x).or_insert(0usize) += 1;
                }
                let occurrences = counts.values().copied().max().unwrap_or(0);
                let values = counts
                    .into_iter()
                    .filter(|&(_, count)| count == occurrences)
                    .map(|(x, _)| x)
                    .collect();
                StatValue::Modes {
                    values,
                    occurrences,
                }
            }
            StatKind::Range => {
                let (lo, hi) = min_max(outcomes);
                StatValue::Number(hi.saturating_sub(lo).into())
            }
            StatKind::Max => StatValue::Number(min_max(outcomes).1.into()),
            StatKind::Min => StatValue::Number(min_max(outcomes).0.into()),
        }
    }
}

fn min_max(outcomes: &[Int]) -> (Int, Int) {
    outcomes
        .iter()
        .fold((Int::MAX, Int::MIN), |(lo, hi), &x| (lo.min(x), hi.max(x)))
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnknownStatistic;

impl FromStr for StatKind {
    type Err = UnknownStatistic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or(UnknownStatistic)
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    Number(Number),
    /// Every value tied for the most occurrences, ascending.
    Modes { values: Vec<Int>, occurrences: usize },
    Undefined,
}

impl StatValue {
    /// The integer a group yields when this is its yield statistic.
    pub fn as_int(&self) -> Int {
        match self {
            StatValue::Number(n) => n.as_int(),
            StatValue::Modes { values, .. } => values.last().copied().unwrap_or(0),
            StatValue::Undefined => 0,
        }
    }
}

/// A statistic attached to a group, with the result of its latest calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistic {
    kind: StatKind,
    requested: bool,
    computed: Option<(StatValue, String)>,
}

impl Statistic {
    /// `requested` is false for a statistic only present because the group yields it.
    pub fn new(kind: StatKind, requested: bool) -> Self {
        Self {
            kind,
            requested,
            computed: None,
        }
    }

    pub fn kind(&self) -> StatKind {
        self.kind
    }

    pub fn is_requested(&self) -> bool {
        self.requested
    }

    pub fn calculate(&mut self, outcomes: &[Int]) {
        let value = self.kind.compute(outcomes);
        let line = self.format(&value);
        self.computed = Some((value, line));
    }

    pub fn value(&self) -> Option<&StatValue> {
        self.computed.as_ref().map(|(value, _)| value)
    }

    /// The printable line, once calculated.
    pub fn line(&self) -> Option<&str> {
        self.computed.as_ref().map(|(_, line)| line.as_str())
    }

    fn format(&self, value: &StatValue) -> String {
        match value {
            StatValue::Undefined => format!("{}: n/a", self.kind.title()),
            StatValue::Number(Number::Float(x)) if self.kind == StatKind::Std => {
                format!("{}: {:.2}", self.kind.title(), x)
            }
            StatValue::Number(n) => format!("{}: {}", self.kind.title(), n),
            StatValue::Modes {
                values,
                occurrences,
            } => {
                let plural = |count: usize| if count == 1 { "" } else { "s" };
                let joined = values
                    .iter()
                    .map(Int::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "Mode{}: {} ({} occurence{})",
                    plural(values.len()),
                    joined,
                    occurrences,
                    plural(*occurrences)
                )
            }
        }
    }
}
