use chrono::{TimeZone, Utc};
use coopdashapp::aggregate::summarize;
use coopdashapp::classify::{Category, RuleBook};
use coopdashapp::filter::{self, FilterCriteria};
use coopdashapp::model::{AuditEvent, Record};
use proptest::prelude::*;

const ACTIONS: &[&str] = &[
    "CREATE", "UPDATE", "DELETE", "VIEW", "EXPORT", "LOGIN", "ARCHIVE", "",
];

fn arb_record() -> impl Strategy<Value = Record> {
    (0usize..ACTIONS.len(), 1u32..28, "[a-zA-Z ]{0,12}").prop_map(|(action, day, user)| {
        AuditEvent::new(
            format!("A{day}-{action}"),
            Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            user,
            ACTIONS[action],
            "Member",
        )
        .into()
    })
}

proptest! {
    #[test]
    fn identity_filter_keeps_every_record_in_order(records in prop::collection::vec(arb_record(), 0..60)) {
        let rules = RuleBook::default();
        let predicate = filter::build(&FilterCriteria::default(), &rules);
        let kept = filter::apply(&records, &predicate);

        prop_assert_eq!(kept.len(), records.len());
        for (kept, original) in kept.iter().zip(&records) {
            prop_assert!(std::ptr::eq(*kept, original));
        }
    }

    #[test]
    fn classification_tally_sums_to_record_count(records in prop::collection::vec(arb_record(), 0..60)) {
        let rules = RuleBook::default();
        let tally = summarize(&records, |r| Some(rules.classify(r).as_str()));

        prop_assert_eq!(tally.total(), records.len());
        for key in tally.keys() {
            prop_assert!(key.parse::<Category>().is_ok());
        }
    }
}
