//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the relevant fields; everything else is filled with
//! realistic fake values.

use fake::faker::address::en::CityName;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use rust_decimal::Decimal;

use domain_catalog::{Asset, AssetType, CreateAssetRequest};
use domain_fraud::ClaimScoreRequest;

/// Builder for catalog assets
pub struct TestAssetBuilder {
    name: String,
    asset_type: AssetType,
    description: String,
    tags: Vec<String>,
}

impl Default for TestAssetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAssetBuilder {
    /// A policy asset with a random name and description
    pub fn new() -> Self {
        let suffix: u32 = (1000..9999).fake();
        Self {
            name: format!("Dataset_{suffix}"),
            asset_type: AssetType::Policy,
            description: Sentence(3..8).fake(),
            tags: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_type(mut self, asset_type: AssetType) -> Self {
        self.asset_type = asset_type;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// A create request for the service layer
    pub fn request(self) -> CreateAssetRequest {
        CreateAssetRequest {
            name: self.name,
            asset_type: self.asset_type,
            description: self.description,
            tags: self.tags,
        }
    }

    /// A stored asset for seeding stores directly
    pub fn build(self) -> Asset {
        Asset::new(self.name, self.asset_type)
            .with_description(self.description)
            .with_tags(self.tags)
    }
}

/// Builder for claim scoring requests that trigger no standard rule
pub struct TestClaimBuilder {
    request: ClaimScoreRequest,
}

impl Default for TestClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClaimBuilder {
    /// A low-risk agent claim from a random real city
    pub fn new() -> Self {
        let number: u32 = (1000..99999).fake();
        let amount: i64 = (1_000..250_000).fake();
        let city: String = CityName().fake();

        Self {
            request: ClaimScoreRequest::new()
                .claim_number(format!("C-{number}"))
                .policy_number(format!("P-{number}"))
                .amount(Decimal::from(amount))
                .prior_claims(0)
                .channel("agent")
                .city(city),
        }
    }

    pub fn amount(mut self, amount: Decimal) -> Self {
        self.request = self.request.amount(amount);
        self
    }

    pub fn prior_claims(mut self, count: i64) -> Self {
        self.request = self.request.prior_claims(count);
        self
    }

    pub fn online(mut self) -> Self {
        self.request = self.request.channel("online");
        self
    }

    pub fn unknown_city(mut self) -> Self {
        self.request = self.request.city("unknown");
        self
    }

    pub fn build(self) -> ClaimScoreRequest {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::STANDARD_ENGINE;
    use rust_decimal_macros::dec;

    #[test]
    fn test_asset_builder_defaults() {
        let asset = TestAssetBuilder::new().with_tag("PII").build();
        assert!(asset.name.starts_with("Dataset_"));
        assert!(asset.has_tag("PII"));
        assert_eq!(asset.asset_type, AssetType::Policy);
    }

    #[test]
    fn test_default_claim_is_clean() {
        for _ in 0..20 {
            let facts = TestClaimBuilder::new().build().normalize().unwrap();
            let assessment = STANDARD_ENGINE.assess(&facts);
            assert!(assessment.triggered.is_empty(), "city {:?}", facts.city);
        }
    }

    #[test]
    fn test_claim_builder_escalation() {
        let facts = TestClaimBuilder::new()
            .amount(dec!(300001))
            .online()
            .build()
            .normalize()
            .unwrap();
        assert_eq!(STANDARD_ENGINE.assess(&facts).score, dec!(55));
    }
}
