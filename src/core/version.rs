//! SOL-006: Best-effort version requirement sniffing.
//!
//! Scans a body for `terraform` blocks carrying a `required_version`
//! attribute. Tolerance is the point: the file may use constructs from a
//! future syntax version, and one malformed block must never suppress the
//! constraints declared by its siblings. The sniff returns whatever it could
//! read, plus diagnostics for whatever it could not.

use super::diag::{Diagnostic, Diagnostics};
use super::schema::{extract_terraform_block, parse_body};
use semver::VersionReq;
use serde::Serialize;

/// A version requirement declared by one `terraform` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionConstraint {
    /// The requirement string exactly as declared.
    pub declared: String,

    /// The parsed requirement.
    pub requirement: VersionReq,
}

/// Sniff version requirements from raw structural-syntax source.
///
/// If the body cannot be parsed at all, no constraints are returned along
/// with the parse diagnostic.
pub fn sniff_source(path: &str, src: &str) -> (Vec<VersionConstraint>, Diagnostics) {
    let (body, mut diags) = parse_body(path, src);
    let Some(body) = body else {
        return (Vec::new(), diags);
    };
    let (constraints, sniff_diags) = sniff_version_requirements(&body);
    diags.extend(sniff_diags);
    (constraints, diags)
}

/// Sniff version requirements from an already-parsed body.
///
/// Each `terraform` block contributes independently: a block without the
/// attribute is skipped silently, and a block whose value fails to decode
/// contributes diagnostics without stopping the scan.
pub fn sniff_version_requirements(body: &hcl::Body) -> (Vec<VersionConstraint>, Diagnostics) {
    let mut constraints = Vec::new();
    let mut diags = Diagnostics::new();

    for block in body.blocks() {
        if block.identifier.as_str() != "terraform" {
            continue;
        }
        if !block.labels.is_empty() {
            diags.push(Diagnostic::error(format!(
                "'terraform' block expects no labels, found {}",
                block.labels.len()
            )));
            continue;
        }

        let (decoded, block_diags) = extract_terraform_block(&block.body);
        diags.extend(block_diags);

        let Some(attr) = decoded.required_version else {
            continue;
        };

        match decode_version_constraint(&attr) {
            Ok(constraint) => constraints.push(constraint),
            Err(attr_diags) => diags.extend(attr_diags),
        }
    }

    (constraints, diags)
}

/// Decode one `required_version` attribute into a constraint.
fn decode_version_constraint(attr: &hcl::Attribute) -> Result<VersionConstraint, Diagnostics> {
    let declared = match &attr.expr {
        hcl::Expression::String(s) => s.clone(),
        other => {
            return Err(Diagnostic::error(format!(
                "required_version must be a quoted string literal, got {}",
                expression_kind(other)
            ))
            .into());
        }
    };

    // The pessimistic operator `~> X.Y.Z` bounds exactly like semver's
    // tilde requirement.
    let normalized = declared.replace("~>", "~");

    match VersionReq::parse(&normalized) {
        Ok(requirement) => Ok(VersionConstraint {
            declared,
            requirement,
        }),
        Err(err) => Err(Diagnostic::error(format!(
            "invalid version requirement {:?}: {}",
            declared, err
        ))
        .into()),
    }
}

fn expression_kind(expr: &hcl::Expression) -> &'static str {
    match expr {
        hcl::Expression::Null => "null",
        hcl::Expression::Bool(_) => "a bool",
        hcl::Expression::Number(_) => "a number",
        hcl::Expression::String(_) => "a string",
        hcl::Expression::Array(_) => "a list",
        hcl::Expression::Object(_) => "an object",
        _ => "an unevaluated expression",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    #[test]
    fn test_sol006_single_requirement() {
        let src = r#"
            terraform {
              required_version = ">= 1.3.0"
            }
        "#;
        let (constraints, diags) = sniff_source("main.tf", src);
        assert!(!diags.has_errors(), "unexpected diags: {:?}", diags);
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].declared, ">= 1.3.0");
        assert!(constraints[0]
            .requirement
            .matches(&Version::new(1, 4, 0)));
        assert!(!constraints[0]
            .requirement
            .matches(&Version::new(1, 2, 9)));
    }

    #[test]
    fn test_sol006_pessimistic_operator() {
        let src = r#"
            terraform {
              required_version = "~> 1.5.0"
            }
        "#;
        let (constraints, diags) = sniff_source("main.tf", src);
        assert!(!diags.has_errors());
        assert_eq!(constraints.len(), 1);
        assert!(constraints[0].requirement.matches(&Version::new(1, 5, 7)));
        assert!(!constraints[0].requirement.matches(&Version::new(1, 6, 0)));
        // Declared text is preserved verbatim.
        assert_eq!(constraints[0].declared, "~> 1.5.0");
    }

    #[test]
    fn test_sol006_malformed_block_does_not_suppress_sibling() {
        let src = r#"
            terraform {
              required_version = "not a version at all %%%"
            }

            terraform {
              required_version = ">= 0.12.0"
            }
        "#;
        let (constraints, diags) = sniff_source("main.tf", src);
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].declared, ">= 0.12.0");
        assert!(diags.has_errors());
    }

    #[test]
    fn test_sol006_non_string_value_is_diagnosed() {
        let src = r#"
            terraform {
              required_version = 1
            }

            terraform {
              required_version = "1.2.3"
            }
        "#;
        let (constraints, diags) = sniff_source("main.tf", src);
        assert_eq!(constraints.len(), 1);
        assert!(diags.has_errors());
        assert!(diags
            .iter()
            .any(|d| d.summary.contains("quoted string literal")));
    }

    #[test]
    fn test_sol006_block_without_attribute_skipped_silently() {
        let src = r#"
            terraform {
              backend "local" {
                path = "state"
              }
            }
        "#;
        let (constraints, diags) = sniff_source("main.tf", src);
        assert!(constraints.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_sol006_tolerates_unknown_surroundings() {
        let src = r#"
            hologram "future" "construct" {
              unknown = true
            }

            terraform {
              required_version = ">= 1.0.0"
            }
        "#;
        let (constraints, diags) = sniff_source("main.tf", src);
        assert!(!diags.has_errors());
        assert_eq!(constraints.len(), 1);
    }

    #[test]
    fn test_sol006_labeled_block_diagnosed_siblings_survive() {
        let src = r#"
            terraform "stray_label" {
              required_version = ">= 9.0.0"
            }

            terraform {
              required_version = ">= 1.0.0"
            }
        "#;
        let (constraints, diags) = sniff_source("main.tf", src);
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].declared, ">= 1.0.0");
        assert!(diags.has_errors());
        assert!(diags.iter().any(|d| d.summary.contains("no labels")));
    }

    #[test]
    fn test_sol006_unparsable_body_yields_nothing() {
        let (constraints, diags) = sniff_source("main.tf", "terraform {{{{");
        assert!(constraints.is_empty());
        assert!(diags.has_errors());
    }

    #[test]
    fn test_sol006_multiple_blocks_multiple_constraints() {
        let src = r#"
            terraform {
              required_version = ">= 1.0.0"
            }

            terraform {
              required_version = "< 2.0.0"
            }
        "#;
        let (constraints, diags) = sniff_source("main.tf", src);
        assert!(!diags.has_errors());
        let declared: Vec<&str> = constraints.iter().map(|c| c.declared.as_str()).collect();
        assert_eq!(declared, vec![">= 1.0.0", "< 2.0.0"]);
    }
}
