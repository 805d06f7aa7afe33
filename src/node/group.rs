use super::{Modify, Node, Outcome};
use crate::common::*;
use crate::eval::{Evaluate, RResult, RollContext, Roller, Trace};
use crate::parse::Modifier;
use crate::tag::{TagName, TagState};
use std::fmt;
use std::io::Write;

/// A bracketed, tagged collection of nodes. The whole input line is the group at depth 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    children: NonEmpty<Node>,
    depth: usize,
    tags: TagState,
}

impl Group {
    pub(crate) fn new(children: NonEmpty<Node>, depth: usize, tags: TagState) -> Self {
        Self {
            children,
            depth,
            tags,
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn tags(&self) -> &TagState {
        &self.tags
    }

    /// Applies `supertags` to every descendant group, overriding what they set themselves.
    pub(crate) fn propagate(&mut self, supertags: &[TagName]) {
        for child in self.children.iter_mut() {
            if let Some(group) = child.as_group_mut() {
                group.tags = group.tags.with_supertags(supertags);
                log::debug!(
                    "propagated {:?} into group at depth {}",
                    supertags,
                    group.depth
                );
                group.propagate(supertags);
            }
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", LEFT_SEP)?;
        for child in self.children.iter() {
            write!(f, " {}", child)?;
        }
        write!(f, " {}", RIGHT_SEP)
    }
}

impl Evaluate for Group {
    fn evaluate<R: Roller, W: Write>(
        &mut self,
        ctx: &mut RollContext<R, W>,
        _: Trace,
    ) -> RResult<Outcome> {
        let len = self.children.len();
        let trace = Trace::new(
            ctx.policy().prints_rolls(&self.tags, len, self.depth),
            self.depth,
        );

        let mut outcomes = Vec::with_capacity(len);
        let mut last_was_group = false;
        for child in self.children.iter_mut() {
            match child.as_group() {
                Some(group) if !group.tags.hidden() => {
                    if last_was_group {
                        ctx.blank_line()?;
                    }
                    last_was_group = true;
                }
                _ => last_was_group = false,
            }
            match child.evaluate(ctx, trace)? {
                Outcome::Number(n) => outcomes.push(n),
                Outcome::Text(_) => {}
            }
        }

        let hidden = self.tags.hidden();
        for stat in self.tags.statistics_mut() {
            stat.calculate(&outcomes);
            if hidden || !(stat.is_requested() || len > 1) {
                continue;
            }
            if let Some(line) = stat.line() {
                ctx.line(self.depth, line)?;
            }
        }
        if self.tags.nice() {
            ctx.line(self.depth, "Good job!")?;
        }

        let ret = self.tags.yield_value();
        log::trace!(
            "group at depth {} yielded {} from {:?}",
            self.depth,
            ret,
            outcomes
        );
        Ok(Outcome::Number(ret))
    }
}

impl Modify for Group {
    fn modify(&mut self, modifier: &Modifier) {
        for child in self.children.iter_mut() {
            child.modify(modifier);
        }
    }
}
