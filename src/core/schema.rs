//! SOL-005: Schema-driven extraction from structural (HCL) bodies.
//!
//! Partially decodes a parsed body against the fixed top-level block schema.
//! Partial means exactly that: content the schema doesn't name is ignored at
//! this level, never rejected — deeper validation belongs to per-block-type
//! decoders. A recognized block type with the wrong label shape earns a
//! diagnostic and is skipped without aborting extraction of its siblings.

use super::diag::{Diagnostic, Diagnostics};
use indexmap::IndexMap;

/// Expected header shape for one recognized block type.
struct BlockHeaderSchema {
    type_: &'static str,
    labels: &'static [&'static str],
}

/// The fixed schema for the top level of a configuration file.
const TOP_LEVEL_SCHEMA: &[BlockHeaderSchema] = &[
    BlockHeaderSchema { type_: "terraform", labels: &[] },
    BlockHeaderSchema { type_: "provider", labels: &["name"] },
    BlockHeaderSchema { type_: "variable", labels: &["name"] },
    BlockHeaderSchema { type_: "locals", labels: &[] },
    BlockHeaderSchema { type_: "output", labels: &["name"] },
    BlockHeaderSchema { type_: "module", labels: &["name"] },
    BlockHeaderSchema { type_: "resource", labels: &["type", "name"] },
    BlockHeaderSchema { type_: "data", labels: &["type", "name"] },
];

/// Restricted schema for the inside of a `terraform` block.
const TERRAFORM_BLOCK_SCHEMA: &[BlockHeaderSchema] = &[
    BlockHeaderSchema { type_: "backend", labels: &["type"] },
    BlockHeaderSchema { type_: "required_providers", labels: &[] },
];

/// A block matched by a schema, with its labels and body carried whole.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedBlock {
    pub block_type: String,
    pub labels: Vec<String>,
    pub body: hcl::Body,
}

/// Decoded content of one `terraform` block, per the restricted schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerraformBlock {
    /// The `required_version` attribute, if declared.
    pub required_version: Option<hcl::Attribute>,

    /// `backend "<type>" { ... }` sub-blocks.
    pub backends: Vec<ExtractedBlock>,

    /// `required_providers { ... }` sub-blocks.
    pub required_providers: Vec<hcl::Body>,
}

/// Parse raw structural-syntax source into a body.
///
/// `path` is used only for diagnostic attribution. A parse failure yields no
/// body plus one error diagnostic.
pub fn parse_body(path: &str, src: &str) -> (Option<hcl::Body>, Diagnostics) {
    match hcl::parse(src) {
        Ok(body) => (Some(body), Diagnostics::new()),
        Err(err) => (
            None,
            Diagnostic::error(format!("{}: invalid configuration syntax: {}", path, err)).into(),
        ),
    }
}

/// Partially decode a body against the fixed top-level schema.
///
/// Returns matched blocks grouped by type, in first-seen order. Unrecognized
/// block types and stray top-level attributes are silently ignored.
pub fn extract_top_level(
    body: &hcl::Body,
) -> (IndexMap<String, Vec<ExtractedBlock>>, Diagnostics) {
    let mut diags = Diagnostics::new();
    let mut by_type: IndexMap<String, Vec<ExtractedBlock>> = IndexMap::new();

    for block in body.blocks() {
        match match_header(TOP_LEVEL_SCHEMA, block, &mut diags) {
            Some(extracted) => {
                by_type
                    .entry(extracted.block_type.clone())
                    .or_default()
                    .push(extracted);
            }
            None => continue,
        }
    }

    (by_type, diags)
}

/// Restricted decode of a `terraform` block body.
///
/// Only `required_version` and the `backend`/`required_providers` sub-blocks
/// are recognized; everything else is ignored so that files written for
/// newer syntax versions still yield what they can.
pub fn extract_terraform_block(body: &hcl::Body) -> (TerraformBlock, Diagnostics) {
    let mut diags = Diagnostics::new();
    let mut decoded = TerraformBlock::default();

    for attr in body.attributes() {
        if attr.key.as_str() == "required_version" && decoded.required_version.is_none() {
            decoded.required_version = Some(attr.clone());
        }
    }

    for block in body.blocks() {
        match match_header(TERRAFORM_BLOCK_SCHEMA, block, &mut diags) {
            Some(extracted) if extracted.block_type == "backend" => {
                decoded.backends.push(extracted);
            }
            Some(extracted) => {
                decoded.required_providers.push(extracted.body);
            }
            None => continue,
        }
    }

    (decoded, diags)
}

/// Match one block against a schema table.
///
/// Unknown types return `None` silently; a known type with the wrong label
/// count returns `None` with an error diagnostic.
fn match_header(
    schema: &[BlockHeaderSchema],
    block: &hcl::Block,
    diags: &mut Diagnostics,
) -> Option<ExtractedBlock> {
    let entry = schema.iter().find(|e| e.type_ == block.identifier.as_str())?;

    if block.labels.len() != entry.labels.len() {
        diags.push(Diagnostic::error(format!(
            "'{}' block expects {} label(s) ({}), found {}",
            entry.type_,
            entry.labels.len(),
            entry.labels.join(", "),
            block.labels.len()
        )));
        return None;
    }

    Some(ExtractedBlock {
        block_type: block.identifier.to_string(),
        labels: block.labels.iter().map(|l| l.as_str().to_string()).collect(),
        body: block.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(src: &str) -> hcl::Body {
        let (body, diags) = parse_body("test.tf", src);
        assert!(!diags.has_errors(), "unexpected diags: {:?}", diags);
        body.unwrap()
    }

    #[test]
    fn test_sol005_extract_known_blocks() {
        let body = body(
            r#"
            terraform {
              required_version = ">= 1.0"
            }

            resource "aws_instance" "web" {
              ami = "ami-123"
            }

            provider "aws" {
              region = "us-east-1"
            }
            "#,
        );
        let (by_type, diags) = extract_top_level(&body);
        assert!(!diags.has_errors());
        assert_eq!(by_type["terraform"].len(), 1);
        assert_eq!(by_type["resource"].len(), 1);
        assert_eq!(
            by_type["resource"][0].labels,
            vec!["aws_instance".to_string(), "web".to_string()]
        );
        assert_eq!(by_type["provider"][0].labels, vec!["aws".to_string()]);
    }

    #[test]
    fn test_sol005_unknown_block_ignored_known_survives() {
        let body = body(
            r#"
            gadget "future_thing" {
              mystery = true
            }

            resource "aws_vpc" "main" {
              cidr_block = "10.0.0.0/16"
            }
            "#,
        );
        let (by_type, diags) = extract_top_level(&body);
        assert!(diags.is_empty());
        assert!(!by_type.contains_key("gadget"));
        let resource = &by_type["resource"][0];
        assert_eq!(resource.labels[1], "main");
        assert_eq!(resource.body.attributes().count(), 1);
    }

    #[test]
    fn test_sol005_wrong_label_count_is_diagnosed_not_fatal() {
        let body = body(
            r#"
            resource "only_one_label" {
            }

            output "ip" {
              value = "x"
            }
            "#,
        );
        let (by_type, diags) = extract_top_level(&body);
        assert!(diags.has_errors());
        assert!(!by_type.contains_key("resource"));
        assert_eq!(by_type["output"].len(), 1);
    }

    #[test]
    fn test_sol005_stray_attributes_ignored() {
        let body = body(
            r#"
            loose_attribute = "ignored here"

            locals {
              a = 1
            }
            "#,
        );
        let (by_type, diags) = extract_top_level(&body);
        assert!(diags.is_empty());
        assert_eq!(by_type.len(), 1);
        assert!(by_type.contains_key("locals"));
    }

    #[test]
    fn test_sol005_terraform_block_decode() {
        let body = body(
            r#"
            required_version = "~> 1.5"

            backend "s3" {
              bucket = "state"
            }

            required_providers {
              aws = "~> 4.0"
            }

            experiments = ["unknown_future_attr"]
            "#,
        );
        let (decoded, diags) = extract_terraform_block(&body);
        assert!(!diags.has_errors());
        assert!(decoded.required_version.is_some());
        assert_eq!(decoded.backends.len(), 1);
        assert_eq!(decoded.backends[0].labels, vec!["s3".to_string()]);
        assert_eq!(decoded.required_providers.len(), 1);
    }

    #[test]
    fn test_sol005_parse_failure_is_a_diagnostic() {
        let (body, diags) = parse_body("broken.tf", "resource \"x\" {{{");
        assert!(body.is_none());
        assert!(diags.has_errors());
        assert!(diags.iter().next().unwrap().summary.contains("broken.tf"));
    }

    #[test]
    fn test_sol005_blocks_grouped_in_first_seen_order() {
        let body = body(
            r#"
            output "a" { value = 1 }
            variable "v" {}
            output "b" { value = 2 }
            "#,
        );
        let (by_type, _) = extract_top_level(&body);
        let order: Vec<&str> = by_type.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["output", "variable"]);
        assert_eq!(by_type["output"].len(), 2);
    }
}
