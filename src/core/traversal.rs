//! SOL-002: Dotted dependency references as structured traversals.
//!
//! A dependency like `"aws_vpc.foo.id"` becomes an ordered path: a root step
//! for the first segment, an attribute step for each segment after it. Every
//! step carries a source range relative to the dependency string itself
//! (line 1, column 1, byte 0 at the start of the string), so downstream
//! diagnostics can point at the exact segment.

use super::diag::{Pos, SrcRange};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a traversal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Bare identifier at the start of the path.
    Root,

    /// Dotted attribute access.
    Attr,
}

/// One step of a traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalStep {
    pub kind: StepKind,
    pub name: String,
    pub range: SrcRange,
}

/// A structured reference path between declared resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Traversal {
    pub steps: Vec<TraversalStep>,
}

impl Traversal {
    /// Parse a dotted reference string into a traversal.
    ///
    /// Segments are taken verbatim — no identifier validation happens here,
    /// malformed names propagate unchanged for downstream validation. The
    /// byte offset of each step advances by segment length only, with no
    /// adjustment for the `.` separators; position-sensitive consumers
    /// depend on exactly this accounting. An empty string yields a traversal
    /// with zero steps.
    pub fn parse(reference: &str) -> Self {
        if reference.is_empty() {
            return Self::default();
        }

        let mut steps = Vec::new();
        let mut pos = 0usize;
        for part in reference.split('.') {
            let kind = if pos == 0 { StepKind::Root } else { StepKind::Attr };
            steps.push(TraversalStep {
                kind,
                name: part.to_string(),
                range: SrcRange {
                    start: Pos {
                        line: 1,
                        column: pos + 1,
                        byte: pos,
                    },
                    end: Pos {
                        line: 1,
                        column: pos + part.len() + 1,
                        byte: pos + part.len(),
                    },
                },
            });
            pos += part.len();
        }

        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.steps.iter().map(|s| s.name.as_str()).collect();
        write!(f, "{}", names.join("."))
    }
}
