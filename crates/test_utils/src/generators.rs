//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use domain_catalog::AssetType;
use domain_fraud::ClaimScoreRequest;

/// Strategy for asset types, including custom ones
pub fn asset_type_strategy() -> impl Strategy<Value = AssetType> {
    prop_oneof![
        Just(AssetType::Policy),
        Just(AssetType::Claim),
        Just(AssetType::ReserveModel),
        "[a-z]{3,12}".prop_map(AssetType::Other),
    ]
}

/// Strategy for relation labels, including blanks that fall back to the default
pub fn relation_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("feeds".to_string())),
        Just(Some("drives".to_string())),
        "[a-z_]{1,16}".prop_map(Some),
    ]
}

/// Strategy for non-negative claim amounts with up to two decimal places
pub fn claim_amount_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2)),
        // Around the high-amount limit
        (29_999_900i64..30_000_100i64).prop_map(|cents| Decimal::new(cents, 2)),
    ]
}

/// Strategy for submission channels in mixed case
pub fn channel_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("online".to_string()),
        Just(" Online ".to_string()),
        Just("agent".to_string()),
        Just("branch".to_string()),
        Just(String::new()),
    ]
}

/// Strategy for cities, a third of them missing or unknown
pub fn city_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("unknown".to_string()),
        Just("NA".to_string()),
        Just(String::new()),
        "[A-Z][a-z]{3,10}",
        "[A-Z][a-z]{3,10}",
        "[A-Z][a-z]{3,10}",
    ]
}

/// Strategy for valid scoring requests; any field may be absent
pub fn claim_request_strategy() -> impl Strategy<Value = ClaimScoreRequest> {
    (
        proptest::option::of("C-[0-9]{4}"),
        proptest::option::of("P-[0-9]{4}"),
        proptest::option::of(claim_amount_strategy()),
        proptest::option::of(0i64..10),
        proptest::option::of(channel_strategy()),
        proptest::option::of(city_strategy()),
    )
        .prop_map(
            |(claim_number, policy_number, amount, prior_claims, channel, city)| {
                ClaimScoreRequest {
                    claim_number,
                    policy_number,
                    amount,
                    prior_claims,
                    channel,
                    city,
                }
            },
        )
}

/// Strategy for loosely typed JSON claim bodies, numbers sometimes as strings
pub fn claim_json_strategy() -> impl Strategy<Value = Value> {
    (claim_amount_strategy(), 0i64..10, any::<bool>(), channel_strategy(), city_strategy())
        .prop_map(|(amount, prior, as_strings, channel, city)| {
            if as_strings {
                json!({
                    "amount": amount.to_string(),
                    "prior_claims": prior.to_string(),
                    "channel": channel,
                    "city": city,
                })
            } else {
                json!({
                    "amount": amount.to_string().parse::<f64>().unwrap_or_default(),
                    "prior_claims": prior,
                    "channel": channel,
                    "city": city,
                })
            }
        })
}

/// Strategy for edge lists over `nodes` assets, as index pairs
pub fn edge_list_strategy(
    nodes: usize,
    max_edges: usize,
) -> impl Strategy<Value = Vec<(usize, usize)>> {
    proptest::collection::vec((0..nodes, 0..nodes), 0..max_edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn prop_generated_requests_normalize(request in claim_request_strategy()) {
            let facts = request.normalize().unwrap();
            prop_assert!(facts.amount >= Decimal::ZERO);
            prop_assert_eq!(facts.channel.trim(), facts.channel.as_str());
        }

        #[test]
        fn prop_generated_json_parses(body in claim_json_strategy()) {
            let request = ClaimScoreRequest::from_json(&body).unwrap();
            prop_assert!(request.amount.is_some());
            prop_assert!(request.prior_claims.is_some());
        }
    }
}
