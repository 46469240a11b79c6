//! Testing utilities for spectab workspace
//!
//! Shared fixtures and table generators. The fixtures are the catalog's
//! authoring templates: simple grid, merged-header matrix, feature
//! comparison, multi-section table with row-spanning categories and a
//! list-style table.

#![allow(missing_docs)]

use serde_json::{json, Value};
use spectab_model::SpecificationDraft;

pub fn draft(title: &str, content_type: &str, content: Value) -> SpecificationDraft {
    SpecificationDraft::new(title, content_type, content)
}

/// Row of plain cells
pub fn plain_row(values: &[&str]) -> Value {
    Value::Array(values.iter().map(|v| json!({ "value": v })).collect())
}

pub fn simple_grid() -> SpecificationDraft {
    draft(
        "Technical Specifications",
        "grid",
        json!({
            "headers": [[
                { "id": "h1", "value": "Specification", "align": "left" },
                { "id": "h2", "value": "Value" },
                { "id": "h3", "value": "Unit" }
            ]],
            "rows": [
                [
                    { "id": "r1c1", "value": "Flow Rate", "isHeader": true, "align": "left" },
                    { "id": "r1c2", "value": "2-4" },
                    { "id": "r1c3", "value": "LPH" }
                ],
                [
                    { "id": "r2c1", "value": "Working Pressure", "isHeader": true, "align": "left" },
                    { "id": "r2c2", "value": "1.0-3.0" },
                    { "id": "r2c3", "value": "Bar" }
                ],
                [
                    { "id": "r3c1", "value": "Recommended Spacing", "isHeader": true, "align": "left" },
                    { "id": "r3c2", "value": "30-60" },
                    { "id": "r3c3", "value": "cm" }
                ]
            ]
        }),
    )
}

/// Two-row merged header: `Pressure` spans both header rows, the diameter
/// label spans five columns
pub fn matrix_merged() -> SpecificationDraft {
    draft("Maximum Recommended Length of Run", "matrix", matrix_content(5))
}

/// Merged-header matrix content whose second header row declares
/// `second_row_cells` cells; five is correct
pub fn matrix_content(second_row_cells: usize) -> Value {
    let labels = ["Emitter Spacing 20cm", "30 cm", "40 cm", "50 cm", "60 cm", "70 cm", "80 cm"];
    let second_row: Vec<Value> = labels
        .iter()
        .cycle()
        .take(second_row_cells)
        .enumerate()
        .map(|(i, label)| json!({ "id": format!("h{}", i + 3), "value": label }))
        .collect();

    json!({
        "headers": [
            [
                { "id": "h1", "value": "Pressure (Kg/Cm²)", "rowSpan": 2 },
                { "id": "h2", "value": "Nominal Dia. 12mm", "colSpan": 5 }
            ],
            second_row
        ],
        "rows": [
            [
                { "id": "r1c1", "value": "2 LPH", "isHeader": true },
                { "id": "r1c2", "value": 18 },
                { "id": "r1c3", "value": 26 },
                { "id": "r1c4", "value": 35 },
                { "id": "r1c5", "value": 44 },
                { "id": "r1c6", "value": 52 }
            ],
            [
                { "id": "r2c1", "value": "4 LPH", "isHeader": true },
                { "id": "r2c2", "value": 13 },
                { "id": "r2c3", "value": 20 },
                { "id": "r2c4", "value": 26 },
                { "id": "r2c5", "value": 33 },
                { "id": "r2c6", "value": 39 }
            ],
            [
                { "id": "r3c1", "value": "8 LPH", "isHeader": true },
                { "id": "r3c2", "value": 10 },
                { "id": "r3c3", "value": 15 },
                { "id": "r3c4", "value": 20 },
                { "id": "r3c5", "value": 25 },
                { "id": "r3c6", "value": 30 }
            ]
        ]
    })
}

pub fn feature_comparison() -> SpecificationDraft {
    let feature = |row: usize, name: &str, marks: [bool; 3]| {
        json!([
            { "id": format!("r{row}c1"), "value": name, "isHeader": true, "align": "left" },
            { "id": format!("r{row}c2"), "value": marks[0] },
            { "id": format!("r{row}c3"), "value": marks[1] },
            { "id": format!("r{row}c4"), "value": marks[2] }
        ])
    };

    draft(
        "Product Features",
        "grid",
        json!({
            "headers": [[
                { "id": "h1", "value": "Feature" },
                { "id": "h2", "value": "Basic" },
                { "id": "h3", "value": "Pro" },
                { "id": "h4", "value": "Premium" }
            ]],
            "rows": [
                feature(1, "UV Resistant", [true, true, true]),
                feature(2, "Anti-Clog", [false, true, true]),
                feature(3, "Self-Flushing", [false, false, true]),
                feature(4, "Pressure Compensating", [false, true, true])
            ]
        }),
    )
}

/// Body rows grouped under row-spanning category labels
pub fn multi_section() -> SpecificationDraft {
    draft(
        "Dripper Specifications",
        "grid",
        json!({
            "headers": [[
                { "id": "h1", "value": "Category" },
                { "id": "h2", "value": "Parameter" },
                { "id": "h3", "value": "Value" }
            ]],
            "rows": [
                [
                    { "id": "r1c1", "value": "Hydraulic", "isHeader": true, "rowSpan": 3 },
                    { "id": "r1c2", "value": "Flow Rate" },
                    { "id": "r1c3", "value": "2 LPH" }
                ],
                [
                    { "id": "r2c2", "value": "Working Pressure" },
                    { "id": "r2c3", "value": "0.5-4.0 Bar" }
                ],
                [
                    { "id": "r3c2", "value": "Uniformity" },
                    { "id": "r3c3", "value": ">95%" }
                ],
                [
                    { "id": "r4c1", "value": "Physical", "isHeader": true, "rowSpan": 2 },
                    { "id": "r4c2", "value": "Material" },
                    { "id": "r4c3", "value": "PE (Polyethylene)" }
                ],
                [
                    { "id": "r5c2", "value": "Temperature Range" },
                    { "id": "r5c3", "value": "-10°C to 50°C" }
                ]
            ]
        }),
    )
}

pub fn list_style() -> SpecificationDraft {
    draft(
        "Product Applications",
        "grid",
        json!({
            "headers": [[
                { "id": "h1", "value": "Application Area" },
                { "id": "h2", "value": "Suitable For" }
            ]],
            "rows": [
                [
                    { "id": "r1c1", "value": "Agriculture", "isHeader": true, "align": "left" },
                    { "id": "r1c2", "value": "Row crops, vegetables, orchards", "align": "left" }
                ],
                [
                    { "id": "r2c1", "value": "Landscaping", "isHeader": true, "align": "left" },
                    { "id": "r2c2", "value": "Gardens, parks, sports fields", "align": "left" }
                ],
                [
                    { "id": "r3c1", "value": "Greenhouse", "isHeader": true, "align": "left" },
                    { "id": "r3c2", "value": "Potted plants, hydroponics", "align": "left" }
                ]
            ]
        }),
    )
}

/// All authoring templates
pub fn all_fixtures() -> Vec<SpecificationDraft> {
    vec![
        simple_grid(),
        matrix_merged(),
        feature_comparison(),
        multi_section(),
        list_style(),
    ]
}

/// Generate a valid block of `rows` × `cols` cells
///
/// Walks the grid row-major and starts a cell at every free position, taking
/// its `(rowSpan, colSpan)` from `spans` in turn and shrinking it until it
/// fits inside the block without touching an earlier cell. Values cycle
/// through text, number and boolean.
pub fn tiling(rows: usize, cols: usize, spans: &[(u32, u32)]) -> Vec<Value> {
    let mut taken = vec![vec![false; cols]; rows];
    let mut out: Vec<Vec<Value>> = vec![Vec::new(); rows];
    let mut next = spans.iter().copied().cycle();

    for r in 0..rows {
        for c in 0..cols {
            if taken[r][c] {
                continue;
            }
            let (want_rows, want_cols) = next.next().unwrap_or((1, 1));

            let mut cs = (want_cols.max(1) as usize).min(cols - c);
            while (c..c + cs).any(|col| taken[r][col]) {
                cs -= 1;
            }
            let mut rs = (want_rows.max(1) as usize).min(rows - r);
            while (r..r + rs).any(|row| (c..c + cs).any(|col| taken[row][col])) {
                rs -= 1;
            }

            for row in taken.iter_mut().skip(r).take(rs) {
                for slot in row.iter_mut().skip(c).take(cs) {
                    *slot = true;
                }
            }

            let value = match (r + c) % 3 {
                0 => json!(format!("{r}:{c}")),
                1 => json!(r * cols + c),
                _ => json!(r % 2 == 0),
            };
            out[r].push(json!({ "value": value, "rowSpan": rs, "colSpan": cs }));
        }
    }

    out.into_iter().map(Value::Array).collect()
}
