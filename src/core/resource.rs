//! SOL-001: Canonical resource model and the normalizer.
//!
//! Both front ends — the scripted loader and the schema-driven extractor —
//! terminate here. Whatever syntax a resource was declared in, its `config`
//! holds the same [`AttrExpr`] representation, so the downstream graph
//! builder never learns which syntax produced it.

use super::traversal::Traversal;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Attribute expressions
// ============================================================================

/// One part of a template expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplatePart {
    /// A literal string, taken whole — no escaping or interpolation is
    /// interpreted.
    Literal(String),
}

/// A value expression attached to an attribute name.
///
/// The scripted front end only ever constructs the `Template` variant with a
/// single literal part. The structural front end may produce arbitrarily rich
/// expressions, carried through the `Structural` variant unevaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrExpr {
    Template(Vec<TemplatePart>),
    Structural(hcl::Expression),
}

impl AttrExpr {
    /// A template expression wrapping one literal string part.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Template(vec![TemplatePart::Literal(value.into())])
    }
}

// ============================================================================
// Resources
// ============================================================================

/// Whether a resource is managed by the engine or a read-only data lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceMode {
    Managed,
    Data,
}

impl fmt::Display for ResourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Managed => write!(f, "managed"),
            Self::Data => write!(f, "data"),
        }
    }
}

/// Lifecycle flags for a managed resource.
///
/// Present on every managed resource to distinguish it from a placeholder.
/// Nothing in the loading layer populates these; they stay at their defaults
/// until later decoding stages take over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagedMeta {
    #[serde(default)]
    pub create_before_destroy: bool,

    #[serde(default)]
    pub prevent_destroy: bool,

    #[serde(default)]
    pub ignore_changes: Vec<String>,
}

/// A declared unit of infrastructure intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Managed vs. data — both current front ends only declare managed
    /// resources.
    pub mode: ResourceMode,

    /// Provider-defined resource kind (e.g. `aws_instance`).
    #[serde(rename = "type")]
    pub type_: String,

    /// Name within the file's resource namespace. Uniqueness is the
    /// caller's responsibility, not enforced here.
    pub name: String,

    /// Attribute body, insertion-ordered.
    pub config: IndexMap<String, AttrExpr>,

    /// Explicit extra dependency edges, in declaration order.
    pub depends_on: Vec<Traversal>,

    /// Managed-resource lifecycle flags (defaults only at this layer).
    pub managed: ManagedMeta,
}

/// Assemble a canonical [`Resource`] from raw front-end output.
///
/// Every param value becomes a template expression holding a single literal
/// string part — deterministic, and deliberately lossy: the string is always
/// treated as a complete literal. Every dep string is parsed into a
/// [`Traversal`] in order. This cannot fail; empty `type`/`name` values are
/// accepted and left for downstream validation.
pub fn normalize(
    type_: &str,
    name: &str,
    params: &IndexMap<String, String>,
    deps: &[String],
) -> Resource {
    let mut config = IndexMap::with_capacity(params.len());
    for (key, value) in params {
        config.insert(key.clone(), AttrExpr::literal(value.clone()));
    }

    let depends_on = deps.iter().map(|dep| Traversal::parse(dep)).collect();

    Resource {
        mode: ResourceMode::Managed,
        type_: type_.to_string(),
        name: name.to_string(),
        config,
        depends_on,
        managed: ManagedMeta::default(),
    }
}
