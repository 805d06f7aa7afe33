use crate::common::*;
use crate::error::ParseError;
use crate::node::{Roll, DEFAULT_DIE};
use logos::{Lexer as LogosLexer, Logos};
use logos_iter::{LogosIter, PeekableLexer};

pub type Lexer<'a> = PeekableLexer<'a, LogosLexer<'a, Clause>, Clause>;

pub fn lexer(s: &str) -> Lexer {
    Clause::lexer(s).peekable_lexer()
}

/// The pieces a roll token is made of.
#[derive(Logos, Debug, Copy, Clone, PartialEq)]
pub enum Clause {
    /// `3d`, or a bare `d` for one die. A count of zero is an error.
    #[regex(r"[0-9]*d", |lex| parse_count(lex.slice()))]
    Count(UInt),
    #[regex(r"[0-9]+", |lex| lex.slice().parse())]
    Size(UInt),
    #[regex(r"[+-][0-9]+", |lex| lex.slice().parse())]
    Bonus(Int),
    #[regex(r"r[0-9]+", |lex| lex.slice()[1..].parse())]
    Reroll(UInt),
    #[regex(r"h[0-9]+", |lex| lex.slice()[1..].parse())]
    KeepHighest(UInt),
    #[regex(r"l[0-9]+", |lex| lex.slice()[1..].parse())]
    KeepLowest(UInt),
    /// `:` and everything after it.
    #[regex(r":.*")]
    Label,

    #[error]
    Error,
}

fn parse_count(s: &str) -> Option<UInt> {
    match &s[..s.len() - 1] {
        "" => Some(1),
        digits => digits.parse().ok().filter(|&n| n > 0),
    }
}

/// Parses a whole roll token. Every character has to belong to a clause, and each clause may
/// appear at most once.
pub(crate) fn parse_roll(token: &str) -> Result<Roll, ParseError> {
    let invalid = || ParseError::InvalidRoll(token.to_string());
    if token.is_empty() {
        return Err(invalid());
    }

    let mut lex = lexer(token);
    let mut roll = Roll::new(1, DEFAULT_DIE);
    if let Some(&Clause::Count(count)) = lex.peek() {
        roll.count = count;
        lex.next();
    }
    // r, h, l and the label need a number before them, not a bare `d`
    let mut after_digit = false;
    if let Some(&Clause::Size(die)) = lex.peek() {
        roll.die = die;
        lex.next();
        after_digit = true;
    }

    let (mut bonus, mut reroll, mut high, mut low) = (false, false, false, false);
    while let Some(clause) = lex.next() {
        match clause {
            Clause::Bonus(n) if !bonus => {
                roll.bonus = n;
                bonus = true;
            }
            Clause::Reroll(n) if after_digit && !reroll => {
                roll.reroll = n;
                reroll = true;
            }
            Clause::KeepHighest(n) if after_digit && !high => {
                roll.keep_highest = n;
                high = true;
            }
            Clause::KeepLowest(n) if after_digit && !low => {
                roll.keep_lowest = n;
                low = true;
            }
            Clause::Label if after_digit => roll.label = lex.slice()[1..].to_string(),
            _ => return Err(invalid()),
        }
        after_digit = true;
    }
    Ok(roll)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(token: &str, count: UInt, die: UInt, bonus: Int, label: &str) {
        let roll = parse_roll(token).unwrap();
        assert_eq!(
            (roll.count, roll.die, roll.bonus, roll.label.as_str()),
            (count, die, bonus, label),
            "{}",
            token
        );
    }

    #[test]
    fn test_lexer() {
        let clauses: Vec<_> = Clause::lexer("4d6+2r1h3:str").collect();
        assert_eq!(
            clauses,
            vec![
                Clause::Count(4),
                Clause::Size(6),
                Clause::Bonus(2),
                Clause::Reroll(1),
                Clause::KeepHighest(3),
                Clause::Label,
            ]
        );
    }

    #[test]
    fn test_defaults() {
        check("d", 1, 20, 0, "");
        check("d8", 1, 8, 0, "");
        check("12", 1, 12, 0, "");
        check("+5", 1, 20, 5, "");
        check("d-1", 1, 20, -1, "");
        check("3d", 3, 20, 0, "");
        check("1d-6", 1, 20, -6, "");
    }

    #[test]
    fn test_clauses_in_any_order() {
        let roll = parse_roll("2d20h1+3r2:init").unwrap();
        assert_eq!(
            (roll.bonus, roll.reroll, roll.keep_highest, roll.label.as_str()),
            (3, 2, 1, "init")
        );
        let roll = parse_roll("6d6l2r1-4").unwrap();
        assert_eq!((roll.bonus, roll.reroll, roll.keep_lowest), (-4, 1, 2));
    }

    #[test]
    fn test_label_takes_the_rest() {
        check("1d6:fire damage!", 1, 6, 0, "fire damage!");
        check("d20+1:", 1, 20, 1, "");
    }

    #[test]
    fn test_invalid() {
        for token in [
            "", "0d6", "2d6d6", "2d6+1+1", "2d6h1h1", "dh1", "d:x", "2x6", "1d6 ", "d20r", "abc",
        ] {
            assert_eq!(
                parse_roll(token),
                Err(ParseError::InvalidRoll(token.to_string())),
                "{:?}",
                token
            );
        }
    }
}
