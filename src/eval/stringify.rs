use crate::node::{Die, Expression, Roll, RollOutcome, Table};

/// Renders the per-node trace lines. Implementors only choose how emphasis looks.
pub trait Stringify {
    fn strike(&self, s: &str) -> String;

    fn bold(&self, s: &str) -> String;

    fn str_die(&self, die: &Die) -> String {
        match (die.kept, die.reroll) {
            (true, None) => die.first.to_string(),
            (true, Some(second)) => format!("{} {}", self.strike(&die.first.to_string()), second),
            (false, None) => self.strike(&die.first.to_string()),
            (false, Some(second)) => self.strike(&format!("{} {}", die.first, second)),
        }
    }

    fn str_roll(&self, roll: &Roll, outcome: &RollOutcome) -> String {
        let mut ret = format!("Rolling {}: ", roll);
        if roll.bonus != 0 {
            ret.push_str(&format!(
                "{} -> {}",
                outcome.die_sum,
                self.bold(&outcome.total.to_string())
            ));
        } else {
            ret.push_str(&outcome.total.to_string());
        }
        if !roll.label.is_empty() {
            ret.push(' ');
            ret.push_str(&roll.label);
        }
        if roll.count > 1 || outcome.rerolled() {
            let dice = outcome
                .dice
                .iter()
                .map(|die| self.str_die(die))
                .collect::<Vec<_>>()
                .join(", ");
            ret.push_str(&format!(" ({})", dice));
        }
        ret
    }

    fn str_expression(&self, expr: &Expression) -> String {
        if expr.label.is_empty() {
            expr.value.to_string()
        } else {
            format!("{} = {}", expr.label, expr.value)
        }
    }

    fn str_table(&self, _: &Table, result: &str) -> String {
        format!("Outcome of table: {}", result)
    }
}

/// Emphasis for a terminal: combining strikethrough marks and ANSI bold.
#[derive(Default, Debug, Copy, Clone)]
pub struct TerminalStringifier;

impl TerminalStringifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stringify for TerminalStringifier {
    fn strike(&self, s: &str) -> String {
        s.chars().flat_map(|c| [c, '\u{0336}']).collect()
    }

    fn bold(&self, s: &str) -> String {
        format!("\x1b[1m{}\x1b[0m", s)
    }
}

#[derive(Default, Debug, Copy, Clone)]
pub struct MarkdownStringifier;

impl MarkdownStringifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stringify for MarkdownStringifier {
    fn strike(&self, s: &str) -> String {
        format!("~~{}~~", s)
    }

    fn bold(&self, s: &str) -> String {
        format!("**{}**", s)
    }
}
