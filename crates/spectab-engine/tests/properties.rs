//! Property tests over generated span tilings.

use std::collections::HashSet;

use proptest::prelude::*;
use serde_json::{json, Value};
use spectab_engine::prelude::*;
use spectab_test_utils::{plain_row, tiling};

fn table_draft(headers: Vec<Value>, rows: Vec<Value>) -> SpecificationDraft {
    SpecificationDraft::new("Generated", "matrix", json!({ "headers": headers, "rows": rows }))
}

/// Ids a generated position id may collide with
const TAKEN_POSITIONS: [&str; 6] = ["h1c1", "h1c2", "h2c1", "r1c1", "r1c2", "r2c1"];

/// Give cells explicit ids by `choices`, cycled: 0 none, 1 blank,
/// 2 an id some other cell would be generated with, 3 a free-form id
fn assign_ids(headers: &mut [Value], rows: &mut [Value], choices: &[u8]) {
    let mut used = HashSet::new();
    let mut collisions = TAKEN_POSITIONS.iter();
    let cells = headers
        .iter_mut()
        .chain(rows.iter_mut())
        .filter_map(Value::as_array_mut)
        .flatten();

    for (k, (cell, choice)) in cells.zip(choices.iter().cycle()).enumerate() {
        let id = match choice {
            0 => continue,
            1 => "  ".to_string(),
            2 => match collisions.find(|id| !used.contains(**id)) {
                Some(id) => (*id).to_string(),
                None => continue,
            },
            _ => format!("cell-{k}"),
        };
        used.insert(id.clone());
        cell["id"] = json!(id);
    }
}

fn spans() -> impl Strategy<Value = Vec<(u32, u32)>> {
    proptest::collection::vec((1u32..4, 1u32..4), 0..12)
}

proptest! {
    #[test]
    fn prop_tilings_are_accepted_at_their_width(
        cols in 1..8usize,
        header_rows in 1..3usize,
        body_rows in 0..6usize,
        header_spans in spans(),
        body_spans in spans(),
    ) {
        let draft = table_draft(
            tiling(header_rows, cols, &header_spans),
            tiling(body_rows, cols, &body_spans),
        );

        let doc = validate_and_normalize(&draft);
        prop_assert!(doc.is_ok(), "rejected: {:?}", doc.err());
        prop_assert_eq!(doc.unwrap().column_count(), Some(cols));
    }

    #[test]
    fn prop_normalization_is_idempotent(
        cols in 1..6usize,
        header_rows in 1..3usize,
        body_rows in 1..5usize,
        header_spans in spans(),
        body_spans in spans(),
        ids in proptest::collection::vec(0..4u8, 1..16),
    ) {
        let mut headers = tiling(header_rows, cols, &header_spans);
        let mut rows = tiling(body_rows, cols, &body_spans);
        assign_ids(&mut headers, &mut rows, &ids);

        let first = validate_and_normalize(&table_draft(headers, rows)).unwrap();
        let stored = serde_json::to_string(&first).unwrap();

        let reread: SpecificationDraft = serde_json::from_str(&stored).unwrap();
        let second = validate_and_normalize(&reread).unwrap();

        prop_assert_eq!(&second, &first);
        prop_assert_eq!(serde_json::to_string(&second).unwrap(), stored);

        let table = first.content.as_table().unwrap();
        let ids: Vec<&str> = table
            .headers
            .iter()
            .chain(&table.rows)
            .flatten()
            .map(|cell| cell.id.as_str())
            .collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), ids.len());
        prop_assert!(ids.iter().all(|id| !id.trim().is_empty()));
    }

    #[test]
    fn prop_span_free_row_of_wrong_width_is_a_mismatch(
        cols in 1..8usize,
        actual in 0..10usize,
    ) {
        prop_assume!(actual != cols);
        let labels: Vec<String> = (0..cols.max(actual)).map(|i| format!("v{i}")).collect();
        let labels: Vec<&str> = labels.iter().map(String::as_str).collect();

        let draft = table_draft(
            vec![plain_row(&labels[..cols])],
            vec![plain_row(&labels[..cols]), plain_row(&labels[..actual])],
        );
        let err = validate_and_normalize(&draft).unwrap_err();

        prop_assert_eq!(
            err,
            ValidationError::ColumnCountMismatch {
                section: spectab_model::Section::Body,
                row: 1,
                expected: cols,
                actual,
            }
        );
    }

    #[test]
    fn prop_dropping_a_cell_is_rejected(
        cols in 1..6usize,
        body_rows in 1..5usize,
        body_spans in spans(),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut rows = tiling(body_rows, cols, &body_spans);
        let non_empty: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.as_array().is_some_and(|cells| !cells.is_empty()))
            .map(|(i, _)| i)
            .collect();
        let target = non_empty[pick.index(non_empty.len())];
        if let Some(cells) = rows[target].as_array_mut() {
            cells.pop();
        }

        let draft = table_draft(tiling(1, cols, &[]), rows);
        prop_assert!(validate_and_normalize(&draft).is_err());
    }
}
