use extknowledge_core::search::filter::evaluate_condition;
use extknowledge_core::search::matches_filter;
use extknowledge_core::{
    filter_and_rank, CandidateRecord, CandidateScorer, ComparisonOperator, LogicalOperator,
    MetadataCondition, MetadataFilter, MetadataValue, QueryContext, RankDecayScorer,
    RetrievalSettings,
};
use proptest::prelude::*;
use std::collections::HashMap;

const LANGS: &[&str] = &["en", "fr", "de"];
const CATEGORIES: &[&str] = &["AI", "Machine Learning/AI", "Biology", ""];

fn arb_record() -> impl Strategy<Value = CandidateRecord> {
    (
        "[a-z ]{1,20}",
        0.0f64..=1.0,
        prop::sample::select(LANGS),
        prop::option::of(prop::sample::select(CATEGORIES)),
        0i64..10,
    )
        .prop_map(|(content, score, lang, category, year_offset)| {
            let mut metadata = HashMap::new();
            metadata.insert("lang".to_string(), MetadataValue::from(lang));
            metadata.insert("year".to_string(), MetadataValue::from(2015 + year_offset));
            if let Some(c) = category {
                metadata.insert("category".to_string(), MetadataValue::from(c));
            }
            CandidateRecord::new(content, score, "Document_1", metadata)
        })
}

fn arb_condition() -> impl Strategy<Value = MetadataCondition> {
    prop_oneof![
        prop::sample::select(LANGS)
            .prop_map(|l| MetadataCondition::new(&["lang"], ComparisonOperator::Is, Some(l))),
        Just(MetadataCondition::new(
            &["category"],
            ComparisonOperator::Contains,
            Some("AI")
        )),
        Just(MetadataCondition::new(
            &["category", "lang"],
            ComparisonOperator::NotEmpty,
            None
        )),
        (2015i64..2025).prop_map(|y| {
            let year = y.to_string();
            MetadataCondition::new(&["year"], ComparisonOperator::GreaterEqual, Some(year.as_str()))
        }),
        (2015i64..2025).prop_map(|y| {
            let year = format!("{y}.0");
            MetadataCondition::new(&["year"], ComparisonOperator::Equal, Some(year.as_str()))
        }),
    ]
}

fn arb_filter() -> impl Strategy<Value = MetadataFilter> {
    (
        prop_oneof![Just(LogicalOperator::And), Just(LogicalOperator::Or)],
        prop::collection::vec(arb_condition(), 0..4),
    )
        .prop_map(|(logical_operator, conditions)| MetadataFilter {
            logical_operator,
            conditions,
        })
}

fn arb_settings() -> impl Strategy<Value = RetrievalSettings> {
    (1usize..=100, 0.0f64..=1.0)
        .prop_map(|(k, t)| RetrievalSettings::new(k, t).expect("generated in range"))
}

proptest! {
    #[test]
    fn every_output_meets_threshold(
        records in prop::collection::vec(arb_record(), 0..40),
        settings in arb_settings(),
        filter in prop::option::of(arb_filter()),
    ) {
        let out = filter_and_rank(records, &settings, filter.as_ref());
        for r in &out {
            prop_assert!(r.score >= settings.score_threshold());
        }
    }

    #[test]
    fn output_never_exceeds_top_k(
        records in prop::collection::vec(arb_record(), 0..150),
        settings in arb_settings(),
    ) {
        let out = filter_and_rank(records, &settings, None);
        prop_assert!(out.len() <= settings.top_k());
    }

    #[test]
    fn pipeline_is_idempotent(
        records in prop::collection::vec(arb_record(), 0..40),
        settings in arb_settings(),
        filter in prop::option::of(arb_filter()),
    ) {
        let once = filter_and_rank(records, &settings, filter.as_ref());
        let twice = filter_and_rank(once.clone(), &settings, filter.as_ref());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn output_is_ordered_subsequence_of_input(
        records in prop::collection::vec(arb_record(), 0..40),
        settings in arb_settings(),
        filter in prop::option::of(arb_filter()),
    ) {
        let out = filter_and_rank(records.clone(), &settings, filter.as_ref());
        let mut input = records.iter();
        for r in &out {
            prop_assert!(input.any(|c| c == r), "output is not an ordered subsequence");
        }
    }

    #[test]
    fn and_or_match_individual_conditions(
        record in arb_record(),
        conditions in prop::collection::vec(arb_condition(), 0..5),
    ) {
        let individual: Vec<bool> = conditions
            .iter()
            .map(|c| evaluate_condition(&record.metadata, c))
            .collect();
        let and = MetadataFilter { logical_operator: LogicalOperator::And, conditions: conditions.clone() };
        let or = MetadataFilter { logical_operator: LogicalOperator::Or, conditions };
        prop_assert_eq!(matches_filter(&record.metadata, &and), individual.iter().all(|b| *b));
        prop_assert_eq!(matches_filter(&record.metadata, &or), individual.iter().any(|b| *b));
    }

    #[test]
    fn missing_field_always_fails(
        record in arb_record(),
        op in prop::sample::select(vec![
            ComparisonOperator::Contains,
            ComparisonOperator::NotContains,
            ComparisonOperator::IsNot,
            ComparisonOperator::Empty,
            ComparisonOperator::NotEmpty,
            ComparisonOperator::Equal,
            ComparisonOperator::NotEqual,
        ]),
        value in prop::option::of("[a-z0-9]{0,4}"),
    ) {
        let cond = MetadataCondition {
            fields: vec!["lang".to_string(), "absent_field".to_string()],
            operator: op,
            value,
        };
        prop_assert!(!evaluate_condition(&record.metadata, &cond));
    }

    #[test]
    fn scorer_output_stays_in_range(
        blocks in prop::collection::vec("[a-z \n]{0,12}", 0..30),
    ) {
        let ctx = QueryContext { query: "q", knowledge_id: "default" };
        let out = RankDecayScorer::default().score(&blocks, &ctx);
        prop_assert_eq!(out.len(), blocks.iter().filter(|b| !b.trim().is_empty()).count());
        for w in out.windows(2) {
            prop_assert!(w[0].score >= w[1].score);
        }
        for r in &out {
            prop_assert!((0.5..=1.0).contains(&r.score));
            prop_assert!(!r.content.is_empty());
        }
    }
}
