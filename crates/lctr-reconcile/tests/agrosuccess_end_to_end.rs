//! # AgroSuccess End-to-End Tests
//!
//! Runs the bundled Millington 2009 → AgroSuccess configuration over a
//! small hand-built legacy table (supplementary-material codes) and checks
//! every stage's row counts, the canonical order, and determinism.
//!
//! The fixture exercises each stage at least once: a removal that drops
//! rules into and out of a category, a source-only category expanded into
//! two, a merge that drops rules between its candidates, and several
//! reflexive "no change" rows.

use lctr_core::{Category, ConditionLabel, RawRule, RuleSet};
use lctr_reconcile::{summarise, CanonicalTable, Pipeline, ReconcileConfig, Stage};

// Legacy codes (millington_paper).
const PINE: u32 = 1;
const TRANS: u32 = 2;
const PASTURE: u32 = 3;
const DECIDUOUS: u32 = 4;
const SCRUB: u32 = 5;
const HOLM_OAK: u32 = 6;
const HOLM_OAK_W_PASTURE: u32 = 7;
const CROPLAND: u32 = 8;
const WATER_QUARRY: u32 = 9;
const URBAN: u32 = 10;
const BURNT: u32 = 11;

fn row(source: u32, target: u32, conditions: [u32; 6], duration: u32) -> RawRule {
    RawRule {
        source,
        target,
        conditions: conditions.to_vec(),
        duration,
    }
}

fn fixture() -> Vec<RawRule> {
    vec![
        row(PINE, TRANS, [0, 0, 0, 1, 0, 1], 20),
        row(PINE, PINE, [0, 0, 0, 0, 0, 0], 0),
        row(TRANS, HOLM_OAK, [1, 1, 0, 1, 0, 1], 25),
        row(TRANS, DECIDUOUS, [1, 0, 0, 0, 1, 2], 30),
        row(PASTURE, SCRUB, [0, 0, 0, 0, 0, 0], 5),
        row(PASTURE, PINE, [0, 1, 1, 0, 0, 0], 15),
        row(SCRUB, PINE, [0, 1, 1, 0, 0, 1], 12),
        row(SCRUB, HOLM_OAK, [1, 0, 0, 1, 0, 1], 20),
        row(CROPLAND, PASTURE, [0, 0, 0, 0, 0, 0], 3),
        row(CROPLAND, SCRUB, [0, 0, 0, 0, 0, 1], 6),
        row(HOLM_OAK_W_PASTURE, HOLM_OAK, [0, 0, 0, 1, 0, 0], 10),
        row(PASTURE, HOLM_OAK_W_PASTURE, [1, 1, 0, 1, 0, 0], 8),
        row(URBAN, PINE, [1, 1, 1, 1, 1, 2], 40),
        row(BURNT, PASTURE, [0, 0, 0, 0, 0, 0], 2),
        row(BURNT, SCRUB, [0, 0, 0, 0, 0, 1], 2),
        row(DECIDUOUS, DECIDUOUS, [0, 0, 0, 0, 0, 0], 0),
        row(HOLM_OAK, BURNT, [1, 1, 1, 1, 1, 2], 1),
        row(WATER_QUARRY, WATER_QUARRY, [0, 0, 0, 0, 0, 0], 0),
    ]
}

fn pipeline() -> Pipeline {
    ReconcileConfig::agrosuccess()
        .expect("bundled configuration should parse")
        .build()
        .expect("bundled configuration should validate")
}

fn cat(id: &str) -> Category {
    Category::new(id).expect("valid category")
}

fn edges(table: &CanonicalTable) -> Vec<(usize, &str, &str, u32)> {
    table
        .rows()
        .iter()
        .map(|r| {
            (
                r.transition_id,
                r.rule.source.as_str(),
                r.rule.target.as_str(),
                r.rule.duration,
            )
        })
        .collect()
}

#[test]
fn stage_row_counts() {
    let out = pipeline().run(&fixture()).expect("fixture reconciles");
    let counts: Vec<(Stage, Option<&str>, usize, usize)> = out
        .report
        .stages
        .iter()
        .map(|s| (s.stage, s.subject.as_deref(), s.rows_in, s.rows_out))
        .collect();
    assert_eq!(
        counts,
        vec![
            (Stage::Translate, None, 18, 18),
            (Stage::Rename, None, 18, 18),
            (Stage::Prune, Some("holm_oak_w_pasture"), 18, 16),
            (Stage::Prune, Some("urban"), 16, 15),
            (Stage::Expand, Some("cropland -> wheat, dal"), 15, 17),
            (Stage::Merge, Some("pasture + scrubland -> shrubland"), 17, 16),
            (Stage::DropReflexive, None, 16, 13),
            (Stage::Canonicalize, None, 13, 13),
        ]
    );
}

#[test]
fn canonical_table_contents() {
    let out = pipeline().run(&fixture()).expect("fixture reconciles");
    assert_eq!(
        edges(&out.table),
        vec![
            (0, "burnt", "shrubland", 2),
            (1, "burnt", "shrubland", 2),
            (2, "wheat", "shrubland", 3),
            (3, "wheat", "shrubland", 6),
            (4, "dal", "shrubland", 3),
            (5, "dal", "shrubland", 6),
            (6, "shrubland", "pine", 15),
            (7, "shrubland", "pine", 12),
            (8, "shrubland", "oak", 20),
            (9, "pine", "trans_forest", 20),
            (10, "trans_forest", "deciduous", 30),
            (11, "trans_forest", "oak", 25),
            (12, "oak", "burnt", 1),
        ]
    );
}

#[test]
fn conditions_are_translated_and_ordered_by_code() {
    let out = pipeline().run(&fixture()).expect("fixture reconciles");
    let first = &out.table.rows()[0].rule.conditions;
    assert_eq!(first.to_string(), "(regeneration, north, False, False, False, xeric)");
    let second = &out.table.rows()[1].rule.conditions;
    assert_eq!(
        second.values()[5].label,
        ConditionLabel::Text("mesic".to_string())
    );
    assert!(first < second);
}

#[test]
fn output_uses_only_target_vocabulary() {
    let p = pipeline();
    let out = p.run(&fixture()).expect("fixture reconciles");
    for row in out.table.rows() {
        assert!(p.target().contains(&row.rule.source), "{}", row.rule);
        assert!(p.target().contains(&row.rule.target), "{}", row.rule);
        assert!(!row.rule.is_reflexive());
    }
    let gone = ["pasture", "scrubland", "cropland", "urban", "holm_oak_w_pasture"];
    let categories = out.table.to_rule_set();
    for id in gone {
        assert!(!categories.categories().contains(&cat(id)), "{id} survived");
    }
}

#[test]
fn repeated_runs_are_identical() {
    let p = pipeline();
    let first = p.run(&fixture()).expect("fixture reconciles");
    let mut shuffled = fixture();
    shuffled.reverse();
    let second = p.run(&shuffled).expect("fixture reconciles");
    assert_eq!(first.table, second.table);
}

#[test]
fn report_serializes_to_json() {
    let out = pipeline().run(&fixture()).expect("fixture reconciles");
    let json = serde_json::to_value(&out.report).expect("report serializes");
    assert_eq!(json["stages"][0]["stage"], "translate");
    assert_eq!(json["stages"][6]["stage"], "drop_reflexive");
    assert!(json["stages"][0].get("subject").is_none());
    assert_eq!(json["stages"][2]["subject"], "holm_oak_w_pasture");
}

#[test]
fn removing_a_sole_source_is_refused() {
    // Only urban reaches water_quarry, so removing urban would orphan it.
    let mut rows = fixture();
    rows.push(row(URBAN, WATER_QUARRY, [0, 0, 0, 0, 0, 0], 50));
    let err = pipeline().run(&rows).expect_err("urban is now a sole source");
    assert_eq!(err.stage, Stage::Prune);
    assert_eq!(err.subject.as_deref(), Some("urban"));
    assert_eq!(
        err.source,
        lctr_core::ReconcileError::UnsafeRemoval {
            category: cat("urban"),
            orphaned: vec![cat("water_quarry")],
        }
    );
    // holm_oak_w_pasture was already removed from the last good set.
    let last_good: &RuleSet = &err.last_good;
    assert!(!last_good.categories().contains(&cat("holm_oak_w_pasture")));
}

#[test]
fn merge_conflict_is_refused() {
    // Same conditions and target for both merge candidates.
    let mut rows = fixture();
    rows.push(row(SCRUB, PINE, [0, 1, 1, 0, 0, 0], 18));
    let err = pipeline().run(&rows).expect_err("merge would collapse rules");
    assert_eq!(err.stage, Stage::Merge);
    assert!(err.to_string().contains("pasture -> pine"));
    assert!(err.to_string().contains("scrubland -> pine"));
}

#[test]
fn expanding_a_category_with_incoming_rules_is_refused() {
    let mut rows = fixture();
    rows.push(row(BURNT, CROPLAND, [0, 0, 0, 0, 0, 2], 4));
    let err = pipeline().run(&rows).expect_err("cropland has an incoming rule");
    assert_eq!(err.stage, Stage::Expand);
}

#[test]
fn summary_of_translated_legacy_table() {
    let p = pipeline();
    let rules = p.translate(&fixture()).expect("fixture translates");
    let summary = summarise(&rules);
    // 18 rows, 3 reflexive, no repeated pair.
    assert_eq!(summary.len(), 15);
    let pine = summary
        .iter()
        .find(|s| s.source == cat("pine"))
        .expect("pine has an outgoing transition");
    assert_eq!(pine.target, cat("transition_forest"));
    assert_eq!((pine.min_duration, pine.max_duration), (20, 20));
}
