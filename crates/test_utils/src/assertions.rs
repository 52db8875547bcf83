//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for lineage views and score
//! outcomes that give more meaningful error messages than standard assertions.

use std::collections::HashSet;

use core_kernel::AssetId;
use domain_catalog::Neighborhood;
use domain_fraud::{FraudLabel, ScoreOutcome};
use rust_decimal::Decimal;

/// Asserts that no edge or node appears twice in a neighborhood
pub fn assert_no_duplicates(view: &Neighborhood) {
    let mut edges = HashSet::new();
    for edge in &view.edges {
        assert!(edges.insert(edge.id), "Edge {} listed more than once", edge.id);
    }

    let mut nodes = HashSet::new();
    for node in &view.nodes {
        assert!(nodes.insert(node.id), "Node {} listed more than once", node.id);
    }
}

/// Asserts that every edge of the view touches `center` and every edge
/// endpoint is among the nodes
pub fn assert_edges_touch_center(view: &Neighborhood, center: AssetId) {
    for edge in &view.edges {
        assert!(
            edge.source == center || edge.target == center,
            "Edge {} ({} -> {}) does not touch center {}",
            edge.id,
            edge.source,
            edge.target,
            center
        );
        assert!(
            view.contains_node(edge.source) && view.contains_node(edge.target),
            "Edge {} has an endpoint missing from the nodes",
            edge.id
        );
    }
}

/// Asserts the relations of a view in edge order
pub fn assert_relations(view: &Neighborhood, expected: &[&str]) {
    let actual: Vec<&str> = view.edges.iter().map(|e| e.relation.as_str()).collect();
    assert_eq!(actual, expected, "Relation order mismatch");
}

/// Asserts the score and label of an outcome
pub fn assert_score(outcome: &ScoreOutcome, score: Decimal, label: FraudLabel) {
    assert_eq!(
        outcome.fraud_score, score,
        "Score mismatch for claim {}: reasons={:?}",
        outcome.claim_number, outcome.reasons
    );
    assert_eq!(
        outcome.fraud_label, label,
        "Label mismatch for claim {} with score {}",
        outcome.claim_number, outcome.fraud_score
    );
}

/// Asserts the reasons of an outcome in rule-table order
pub fn assert_reasons(outcome: &ScoreOutcome, expected: &[&str]) {
    let actual: Vec<&str> = outcome.reasons.iter().map(String::as_str).collect();
    assert_eq!(
        actual, expected,
        "Reason mismatch for claim {}",
        outcome.claim_number
    );
}

/// Asserts that a score lies within `[0, max]`
pub fn assert_score_in_range(score: Decimal, max: Decimal) {
    assert!(
        score >= Decimal::ZERO && score <= max,
        "Score {} is not in range [0, {}]",
        score,
        max
    );
}

/// Asserts that a result is Ok and returns the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Asserts that a result is Err and returns the error
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => e,
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => panic!("{}: got Ok({:?})", $msg, value),
            Err(e) => e,
        }
    };
}

/// Asserts that an error matches a specific variant
#[macro_export]
macro_rules! assert_err_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Ok(value) => panic!("Expected Err matching {}, got Ok({:?})", stringify!($pattern), value),
            Err(ref e) => {
                assert!(
                    matches!(e, $pattern),
                    "Error {:?} does not match pattern {}",
                    e,
                    stringify!($pattern)
                );
            }
        }
    };
}
