//! # Code Translator
//!
//! Replaces the integer codes of a raw legacy table with names: category
//! codes become legacy vocabulary identifiers, condition codes become the
//! labels of their field's domain.
//!
//! Post-processing follows the field's [`ConditionKind`]: `label` fields
//! are lower-cased (`XERIC` becomes `xeric`), `flag` fields become
//! booleans (`TRUE` becomes `true`).

use lctr_core::{
    Category, CategoryVocabulary, ConditionKind, ConditionLabel, ConditionSchema,
    ConditionValue, ConditionVector, RawRule, ReconcileError, RuleSet, TransitionRule,
};

use crate::config::TableLayout;

/// Translate every row of a raw table.
///
/// Fails with `UnknownCode` on the first code that has no entry in its
/// enumeration, or when a row's condition arity differs from the schema.
pub fn translate(
    raw: &[RawRule],
    legacy: &CategoryVocabulary,
    schema: &ConditionSchema,
    layout: &TableLayout,
) -> Result<RuleSet, ReconcileError> {
    let rules = raw
        .iter()
        .enumerate()
        .map(|(idx, row)| translate_row(idx + 1, row, legacy, schema, layout))
        .collect::<Result<RuleSet, _>>()?;
    tracing::debug!(rows = rules.len(), vocabulary = legacy.name(), "translated raw table");
    Ok(rules)
}

fn translate_row(
    row_number: usize,
    row: &RawRule,
    legacy: &CategoryVocabulary,
    schema: &ConditionSchema,
    layout: &TableLayout,
) -> Result<TransitionRule, ReconcileError> {
    let source = category_of(legacy, row.source, &layout.source_column, row_number)?;
    let target = category_of(legacy, row.target, &layout.target_column, row_number)?;

    if row.conditions.len() != schema.arity() {
        // Report the first missing or surplus position as the offending column.
        let position = row.conditions.len().min(schema.arity());
        let column = schema
            .fields()
            .get(position)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| format!("condition #{}", position + 1));
        return Err(ReconcileError::UnknownCode {
            column,
            code: row.conditions.get(position).copied().unwrap_or_default(),
            row: row_number,
        });
    }

    let conditions = schema
        .fields()
        .iter()
        .zip(&row.conditions)
        .map(|(field, &code)| {
            let name = field.name_of(code).ok_or_else(|| ReconcileError::UnknownCode {
                column: field.name.clone(),
                code,
                row: row_number,
            })?;
            Ok(ConditionValue {
                code,
                label: post_process(field.kind, name),
            })
        })
        .collect::<Result<Vec<_>, ReconcileError>>()?;

    Ok(TransitionRule::new(
        source,
        target,
        ConditionVector(conditions),
        row.duration,
    ))
}

fn category_of(
    vocabulary: &CategoryVocabulary,
    code: u32,
    column: &str,
    row: usize,
) -> Result<Category, ReconcileError> {
    vocabulary
        .by_code(code)
        .map(|entry| entry.id.clone())
        .ok_or_else(|| ReconcileError::UnknownCode {
            column: column.to_string(),
            code,
            row,
        })
}

/// Apply a field's post-processing to an enumeration name.
pub fn post_process(kind: ConditionKind, name: &str) -> ConditionLabel {
    match kind {
        ConditionKind::Label => ConditionLabel::Text(name.to_lowercase()),
        ConditionKind::Flag => ConditionLabel::Flag(name == "TRUE"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lctr_core::condition::presets as schemas;
    use lctr_core::vocabulary::presets as vocabularies;

    fn raw(source: u32, target: u32, conditions: &[u32], duration: u32) -> RawRule {
        RawRule {
            source,
            target,
            conditions: conditions.to_vec(),
            duration,
        }
    }

    #[test]
    fn translates_categories_and_conditions() {
        let legacy = vocabularies::millington_paper().unwrap();
        let schema = schemas::millington().unwrap();
        let rules = translate(
            &[raw(3, 5, &[1, 0, 1, 0, 0, 2], 10)],
            &legacy,
            &schema,
            &TableLayout::default(),
        )
        .unwrap();

        let r = &rules.rules()[0];
        assert_eq!(r.source.as_str(), "pasture");
        assert_eq!(r.target.as_str(), "scrubland");
        assert_eq!(r.duration, 10);
        assert_eq!(
            r.conditions.to_string(),
            "(secondary, north, True, False, False, hydric)"
        );
        assert_eq!(r.conditions.values()[5].code, 2);
    }

    #[test]
    fn legacy_encoding_changes_meaning() {
        let schema = schemas::millington().unwrap();
        let row = [raw(3, 5, &[0, 0, 0, 0, 0, 0], 1)];
        let layout = TableLayout::default();
        let paper = translate(&row, &vocabularies::millington_paper().unwrap(), &schema, &layout)
            .unwrap();
        let thesis = translate(&row, &vocabularies::millington_thesis().unwrap(), &schema, &layout)
            .unwrap();
        assert_eq!(paper.rules()[0].source.as_str(), "pasture");
        assert_eq!(thesis.rules()[0].source.as_str(), "deciduous");
    }

    #[test]
    fn unknown_category_code() {
        let err = translate(
            &[raw(1, 1, &[0, 0, 0, 0, 0, 0], 0), raw(12, 1, &[0, 0, 0, 0, 0, 0], 0)],
            &vocabularies::millington_paper().unwrap(),
            &schemas::millington().unwrap(),
            &TableLayout::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ReconcileError::UnknownCode {
                column: "start".into(),
                code: 12,
                row: 2
            }
        );
    }

    #[test]
    fn unknown_condition_code() {
        let err = translate(
            &[raw(1, 2, &[0, 0, 0, 0, 0, 3], 0)],
            &vocabularies::millington_paper().unwrap(),
            &schemas::millington().unwrap(),
            &TableLayout::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ReconcileError::UnknownCode {
                column: "water".into(),
                code: 3,
                row: 1
            }
        );
    }

    #[test]
    fn arity_mismatch_is_reported() {
        let err = translate(
            &[raw(1, 2, &[0, 0], 0)],
            &vocabularies::millington_paper().unwrap(),
            &schemas::millington().unwrap(),
            &TableLayout::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::UnknownCode { ref column, row: 1, .. } if column == "pine"
        ));
    }

    #[test]
    fn flag_post_processing() {
        assert_eq!(post_process(ConditionKind::Flag, "TRUE"), ConditionLabel::Flag(true));
        assert_eq!(post_process(ConditionKind::Flag, "FALSE"), ConditionLabel::Flag(false));
        assert_eq!(
            post_process(ConditionKind::Label, "SOUTH"),
            ConditionLabel::Text("south".into())
        );
    }
}
