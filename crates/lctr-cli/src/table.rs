//! # CSV Table I/O
//!
//! Reads legacy tables into [`RawRule`]s by column name and renders the
//! canonical table. Column names come from the configuration's
//! [`TableLayout`] and condition schema; extra input columns are ignored.
//!
//! Output columns, in order: transition id, source, target, one column per
//! condition, duration. Rows are `\n`-terminated, so equal tables render to
//! equal bytes.

use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};

use lctr_core::{Category, CategoryVocabulary, ConditionSchema, RawRule};
use lctr_reconcile::{CanonicalTable, OutputNames, TableLayout, TransitionSummary};

/// Read a legacy table from `path`.
pub fn read_raw_table(
    path: &Path,
    layout: &TableLayout,
    schema: &ConditionSchema,
) -> Result<Vec<RawRule>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open table: {}", path.display()))?;
    parse_raw_table(file, layout, schema)
        .with_context(|| format!("failed to read table: {}", path.display()))
}

/// Parse a legacy table from any reader.
pub fn parse_raw_table(
    reader: impl Read,
    layout: &TableLayout,
    schema: &ConditionSchema,
) -> Result<Vec<RawRule>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers().context("missing header row")?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("missing column {name:?}"))
    };

    let source = column(&layout.source_column)?;
    let target = column(&layout.target_column)?;
    let duration = column(&layout.duration_column)?;
    let conditions = schema
        .names()
        .map(|name| Ok((name, column(name)?)))
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let record = record.with_context(|| format!("malformed row at line {line}"))?;
        let code = |name: &str, position: usize| -> Result<u32> {
            let cell = record.get(position).unwrap_or_default();
            cell.parse()
                .with_context(|| format!("line {line}, column {name}: {cell:?} is not a code"))
        };
        rows.push(RawRule {
            source: code(&layout.source_column, source)?,
            target: code(&layout.target_column, target)?,
            conditions: conditions
                .iter()
                .map(|&(name, position)| code(name, position))
                .collect::<Result<_>>()?,
            duration: code(&layout.duration_column, duration)?,
        });
    }

    tracing::debug!(rows = rows.len(), "read raw table");
    Ok(rows)
}

/// Render the canonical table as CSV bytes.
pub fn render_canonical(
    table: &CanonicalTable,
    layout: &TableLayout,
    schema: &ConditionSchema,
    target: &CategoryVocabulary,
    names: OutputNames,
) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![
        layout.id_column.as_str(),
        layout.source_column.as_str(),
        layout.target_column.as_str(),
    ];
    header.extend(schema.names());
    header.push(layout.duration_column.as_str());
    writer.write_record(&header)?;

    let name = |category: &Category| -> String {
        match (names, target.get(category)) {
            (OutputNames::Alias, Some(entry)) => entry.alias().to_string(),
            _ => category.to_string(),
        }
    };

    for row in table.rows() {
        let rule = &row.rule;
        if rule.conditions.len() != schema.arity() {
            bail!("rule {rule} does not match the condition schema");
        }
        let mut record = vec![
            row.transition_id.to_string(),
            name(&rule.source),
            name(&rule.target),
        ];
        record.extend(rule.conditions.values().iter().map(ToString::to_string));
        record.push(rule.duration.to_string());
        writer.write_record(&record)?;
    }

    writer.into_inner().context("failed to flush table")
}

/// Render a transition summary as CSV bytes.
pub fn render_summary(summary: &[TransitionSummary]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in summary {
        writer.serialize(entry)?;
    }
    if summary.is_empty() {
        writer.write_record(["source", "target", "rules", "min_duration", "max_duration"])?;
    }
    writer.into_inner().context("failed to flush summary")
}
