//! Property-based tests using proptest

use data_loader::{Record, RecordSet};
use pipeline::stages::{FilterOp, FilterRule, apply_rules};
use proptest::prelude::*;

fn record_set(values: &[String]) -> RecordSet {
    let mut set = RecordSet::new(vec!["Name".to_string(), "Phone".to_string()]);
    for (idx, value) in values.iter().enumerate() {
        set.push(Record::from_pairs([("Name", format!("p{idx}")), ("Phone", value.clone())]));
    }
    set
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_empty_rules_are_identity(values in prop::collection::vec(".{0,12}", 0..20)) {
        let set = record_set(&values);
        prop_assert_eq!(apply_rules(set.clone(), &[]), set);
    }

    #[test]
    fn test_notnull_on_whitespace_yields_nothing(values in prop::collection::vec("[ \t]{0,6}", 0..20)) {
        let set = record_set(&values);
        let kept = apply_rules(set, &[FilterRule::new("Phone", FilterOp::NotNull, "")]);
        prop_assert!(kept.is_empty());
    }

    #[test]
    fn test_null_and_notnull_partition(values in prop::collection::vec("[ a-z]{0,4}", 0..20)) {
        let set = record_set(&values);
        let null = apply_rules(set.clone(), &[FilterRule::new("Phone", FilterOp::Null, "")]);
        let notnull = apply_rules(set.clone(), &[FilterRule::new("Phone", FilterOp::NotNull, "")]);
        prop_assert_eq!(null.len() + notnull.len(), set.len());
    }

    #[test]
    fn test_rule_order_does_not_change_result(values in prop::collection::vec("[ab ]{0,3}", 0..20)) {
        let set = record_set(&values);
        let a = FilterRule::new("Phone", FilterOp::Contains, "a");
        let b = FilterRule::new("Phone", FilterOp::Ne, "ab");
        let forward = apply_rules(set.clone(), &[a.clone(), b.clone()]);
        let backward = apply_rules(set, &[b, a]);
        prop_assert_eq!(forward, backward);
    }
}
