//! Unit tests for the Identifiers module
//!
//! Tests cover identifier creation, parsing, conversion, and display formatting.

use core_kernel::{AssetId, LineageEdgeId, ScoredClaimId, TagId, UserId};
use proptest::prelude::*;
use uuid::Uuid;

mod asset_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = AssetId::new();
        let id2 = AssetId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = AssetId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = AssetId::new_v7();
        assert!(id1 < id2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = AssetId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_display_format() {
        let id = AssetId::new();
        assert!(id.to_string().starts_with("AST-"));
    }

    #[test]
    fn test_from_str_with_prefix() {
        let original = AssetId::new();
        let parsed: AssetId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_from_str_without_prefix() {
        let uuid = Uuid::new_v4();
        let parsed: AssetId = uuid.to_string().parse().unwrap();
        assert_eq!(*parsed.as_uuid(), uuid);
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("AST-not-a-uuid".parse::<AssetId>().is_err());
        assert!("".parse::<AssetId>().is_err());
    }

    #[test]
    fn test_from_str_wrong_kind() {
        let edge = LineageEdgeId::new_v7();
        assert!(edge.to_string().parse::<AssetId>().is_err());
        assert!(edge.as_uuid().to_string().parse::<AssetId>().is_ok());
    }

    #[test]
    fn test_serde_is_transparent() {
        let uuid = Uuid::new_v4();
        let id = AssetId::from(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }
}

#[test]
fn test_prefixes() {
    assert_eq!(AssetId::prefix(), "AST");
    assert_eq!(TagId::prefix(), "TAG");
    assert_eq!(LineageEdgeId::prefix(), "LIN");
    assert_eq!(ScoredClaimId::prefix(), "SCL");
    assert_eq!(UserId::prefix(), "USR");
}

proptest! {
    #[test]
    fn prop_display_parse_roundtrip(bytes in any::<[u8; 16]>()) {
        let id = LineageEdgeId::from_uuid(Uuid::from_bytes(bytes));
        let parsed: LineageEdgeId = id.to_string().parse().unwrap();
        prop_assert_eq!(id, parsed);
    }
}
