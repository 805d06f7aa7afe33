//! Turning raw input into the flat token sequence the group parser consumes.

use crate::common::{COMMA_SEP, LEFT_SEP, RIGHT_SEP};
use crate::error::ParseError;
use std::collections::{BTreeMap, HashMap};

const MAX_MACRO_DEPTH: usize = 32;

/// Splits `input` on whitespace, then splits every `[`, `]` and `,` off into a token of its own.
///
/// ```
/// # use dice_groups::token::tokenize;
/// assert_eq!(tokenize("[2d6, 1d4]x2"), vec!["[", "2d6", ",", "1d4", "]", "x2"]);
/// ```
pub fn tokenize(input: &str) -> Vec<String> {
    input.split_whitespace().flat_map(split_separators).collect()
}

fn split_separators(word: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        if matches!(c, '[' | ']' | ',') {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            out.push(c.to_string());
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Finds the index of the `]` closing the `[` at `open`, tracking nesting.
pub(crate) fn matching_bracket<S: AsRef<str>>(tokens: &[S], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token.as_ref() {
            LEFT_SEP => depth += 1,
            RIGHT_SEP => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Rewrites comma-separated segments into bracketed sub-groups, at every nesting level.
///
/// `1d20 , 1d6 -total` becomes `[ 1d20 ] [ 1d6 -total ]`. Unbalanced brackets are passed
/// through untouched so the parser can report them.
pub fn group_commas(tokens: &[String]) -> Vec<String> {
    let mut finished: Vec<Vec<String>> = Vec::new();
    let mut segment = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == LEFT_SEP {
            match matching_bracket(tokens, i) {
                Some(end) => {
                    segment.push(LEFT_SEP.to_string());
                    segment.extend(group_commas(&tokens[i + 1..end]));
                    segment.push(RIGHT_SEP.to_string());
                    i = end + 1;
                    continue;
                }
                None => {
                    segment.extend(tokens[i..].iter().cloned());
                    break;
                }
            }
        } else if token == COMMA_SEP {
            finished.push(std::mem::take(&mut segment));
        } else {
            segment.push(token.clone());
        }
        i += 1;
    }

    if finished.is_empty() {
        return segment;
    }
    finished.push(segment);
    finished
        .into_iter()
        .flat_map(|segment| {
            std::iter::once(LEFT_SEP.to_string())
                .chain(segment)
                .chain(std::iter::once(RIGHT_SEP.to_string()))
        })
        .collect()
}

/// A source of token replacements, such as a macro table or a character sheet.
pub trait Substitute {
    fn substitute(&self, token: &str) -> Option<&str>;
}

impl Substitute for () {
    fn substitute(&self, _: &str) -> Option<&str> {
        None
    }
}

impl Substitute for BTreeMap<String, String> {
    fn substitute(&self, token: &str) -> Option<&str> {
        self.get(token).map(String::as_str)
    }
}

impl Substitute for HashMap<String, String> {
    fn substitute(&self, token: &str) -> Option<&str> {
        self.get(token).map(String::as_str)
    }
}

/// Replaces every token `macros` knows about, re-tokenizing replacements recursively.
pub fn expand(tokens: &[String], macros: &impl Substitute) -> Result<Vec<String>, ParseError> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        expand_into(token, macros, 0, &mut out)?;
    }
    Ok(out)
}

fn expand_into(
    token: &str,
    macros: &impl Substitute,
    depth: usize,
    out: &mut Vec<String>,
) -> Result<(), ParseError> {
    match macros.substitute(token) {
        Some(replacement) => {
            if depth >= MAX_MACRO_DEPTH {
                return Err(ParseError::MacroRecursion(token.to_string()));
            }
            log::debug!("expanding macro {:?} to {:?}", token, replacement);
            for part in tokenize(replacement) {
                expand_into(&part, macros, depth + 1, out)?;
            }
            Ok(())
        }
        None => {
            out.push(token.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_separators_are_split_off() {
        assert_eq!(tokenize("[[1d20]]"), vec!["[", "[", "1d20", "]", "]"]);
        assert_eq!(tokenize("  4d6h3   x6 "), vec!["4d6h3", "x6"]);
        assert_eq!(tokenize("1d4,1d6"), vec!["1d4", ",", "1d6"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_matching_bracket() {
        let tokens = ["[", "[", "1d1", "]", "1d2", "]", "1d3"];
        assert_eq!(matching_bracket(&tokens, 0), Some(5));
        assert_eq!(matching_bracket(&tokens, 1), Some(3));
        assert_eq!(matching_bracket(&["[", "1d1"], 0), None);
    }

    #[test]
    fn test_group_commas() {
        let tokens = strings(&["1d20", ",", "1d6", "-total"]);
        assert_eq!(
            group_commas(&tokens),
            strings(&["[", "1d20", "]", "[", "1d6", "-total", "]"])
        );

        let untouched = strings(&["[", "1d20", "]", "-max"]);
        assert_eq!(group_commas(&untouched), untouched);

        let nested = strings(&["[", "1d4", ",", "1d6", "]", "-hide"]);
        assert_eq!(
            group_commas(&nested),
            strings(&["[", "[", "1d4", "]", "[", "1d6", "]", "]", "-hide"])
        );
    }

    #[test]
    fn test_expand_macros() {
        let mut macros = BTreeMap::new();
        macros.insert("adv".to_string(), "x2 -max -verbose".to_string());
        macros.insert("stat".to_string(), "4d6h3".to_string());
        macros.insert("char".to_string(), "[stat stat]".to_string());

        let expanded = expand(&strings(&["1d20", "adv"]), &macros).unwrap();
        assert_eq!(expanded, strings(&["1d20", "x2", "-max", "-verbose"]));

        let expanded = expand(&strings(&["char"]), &macros).unwrap();
        assert_eq!(expanded, strings(&["[", "4d6h3", "4d6h3", "]"]));

        assert_eq!(expand(&strings(&["1d6"]), &()).unwrap(), strings(&["1d6"]));
    }

    #[test]
    fn test_recursive_macro_fails() {
        let mut macros = HashMap::new();
        macros.insert("loop".to_string(), "1d4 loop".to_string());
        assert_eq!(
            expand(&strings(&["loop"]), &macros),
            Err(ParseError::MacroRecursion("loop".to_string()))
        );
    }
}
