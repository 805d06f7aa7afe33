//! Group tags: `-total`, `-hide`, `-yield -mean`, and their `--` supertag forms.

pub mod statistic;

pub use statistic::{StatKind, StatValue, Statistic};

use crate::common::{is_word, Int};
use crate::error::ParseError;

pub const TAG_MARKER: char = '-';

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TagName {
    Hide,
    Verbose,
    Nice,
    Stat(StatKind),
    /// Return the named statistic instead of the default one.
    Yield(StatKind),
}

impl TagName {
    /// Tags that occupy the same slot in a group, so a later one replaces an earlier one.
    fn same_slot(self, other: TagName) -> bool {
        matches!((self, other), (TagName::Yield(_), TagName::Yield(_))) || self == other
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Tag {
    pub name: TagName,
    pub is_super: bool,
    /// How many tokens after the tag itself it used up.
    pub consumed: usize,
}

/// Recognizes `token` as a tag, looking ahead into `remaining` for the target of a yield.
///
/// Returns `Ok(None)` for tokens that are not shaped like a tag at all.
pub fn recognize_tag<S: AsRef<str>>(
    token: &str,
    remaining: &[S],
) -> Result<Option<Tag>, ParseError> {
    let (is_super, name) = match token.strip_prefix("--") {
        Some(name) => (true, name),
        None => match token.strip_prefix(TAG_MARKER) {
            Some(name) => (false, name),
            None => return Ok(None),
        },
    };
    // `-3` is a roll with a negative bonus, not a tag
    if !name.starts_with(char::is_alphabetic) || !is_word(name) {
        return Ok(None);
    }

    let name = match name {
        "hide" => TagName::Hide,
        "verbose" => TagName::Verbose,
        "nice" => TagName::Nice,
        "yield" => {
            let target = remaining
                .first()
                .map(|s| s.as_ref())
                .ok_or_else(|| ParseError::MissingYieldTarget(token.to_string()))?;
            let kind = yield_target(target)
                .ok_or_else(|| ParseError::InvalidYieldTarget(target.to_string()))?;
            return Ok(Some(Tag {
                name: TagName::Yield(kind),
                is_super,
                consumed: 1,
            }));
        }
        other => match other.parse() {
            Ok(kind) => TagName::Stat(kind),
            Err(_) => return Err(ParseError::UnknownTag(token.to_string())),
        },
    };
    Ok(Some(Tag {
        name,
        is_super,
        consumed: 0,
    }))
}

fn yield_target(token: &str) -> Option<StatKind> {
    token.strip_prefix(TAG_MARKER)?.parse().ok()
}

/// Everything the tags of one group decided.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagState {
    hide: bool,
    verbose: bool,
    nice: bool,
    statistics: Vec<Statistic>,
    yield_to: Option<StatKind>,
    supertags: Vec<TagName>,
}

impl TagState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a tag as it is read. Supertags take effect here too and are remembered for propagation.
    pub fn insert(&mut self, tag: Tag) {
        if tag.is_super {
            self.supertags.retain(|&name| !name.same_slot(tag.name));
            self.supertags.push(tag.name);
        }
        self.apply(tag.name);
    }

    fn apply(&mut self, name: TagName) {
        match name {
            TagName::Hide => self.hide = true,
            TagName::Verbose => self.verbose = true,
            TagName::Nice => self.nice = true,
            TagName::Stat(kind) => match self.statistics.iter_mut().find(|s| s.kind() == kind) {
                Some(stat) => *stat = Statistic::new(kind, true),
                None => self.statistics.push(Statistic::new(kind, true)),
            },
            TagName::Yield(kind) => self.yield_to = Some(kind),
        }
    }

    /// Resolves the yield and makes sure its statistic exists. Run once all tags are in.
    pub fn settle(&mut self) {
        self.statistics.retain(Statistic::is_requested);
        let target = self.yield_target();
        if !self.statistics.iter().any(|s| s.kind() == target) {
            self.statistics.push(Statistic::new(target, false));
        }
    }

    /// A copy of this state with inherited supertags laid over it.
    pub fn with_supertags(&self, supertags: &[TagName]) -> TagState {
        let mut ret = self.clone();
        for &name in supertags {
            ret.apply(name);
        }
        ret.settle();
        ret
    }

    /// The explicit yield, else the first requested statistic, else the total.
    pub fn yield_target(&self) -> StatKind {
        self.yield_to
            .or_else(|| {
                self.statistics
                    .iter()
                    .find(|s| s.is_requested())
                    .map(Statistic::kind)
            })
            .unwrap_or(StatKind::Total)
    }

    pub fn hidden(&self) -> bool {
        self.hide
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn nice(&self) -> bool {
        self.nice
    }

    pub fn supertags(&self) -> &[TagName] {
        &self.supertags
    }

    /// Whether any statistic was asked for by name. A yield alone does not count.
    pub fn requests_statistic(&self) -> bool {
        self.statistics.iter().any(Statistic::is_requested)
    }

    /// Whether the group carries no tags at all.
    pub fn is_empty(&self) -> bool {
        !self.hide
            && !self.verbose
            && !self.nice
            && self.yield_to.is_none()
            && !self.requests_statistic()
    }

    pub fn statistics(&self) -> &[Statistic] {
        &self.statistics
    }

    pub(crate) fn statistics_mut(&mut self) -> std::slice::IterMut<'_, Statistic> {
        self.statistics.iter_mut()
    }

    pub fn statistic(&self, kind: StatKind) -> Option<&Statistic> {
        self.statistics.iter().find(|s| s.kind() == kind)
    }

    /// The calculated value of the yield statistic, or 0 before evaluation.
    pub fn yield_value(&self) -> Int {
        self.statistic(self.yield_target())
            .and_then(Statistic::value)
            .map_or(0, StatValue::as_int)
    }
}
