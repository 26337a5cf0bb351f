//! Downloadable CSV template for review imports

use crate::entities::ReviewField;

const EXAMPLE_ROWS: [&str; 2] = [
    r#""Jane Smith","Marketing Director","Acme Corp",5,"Delivered on time, with great attention to detail.","Upwork","January 2025","US","United States","New York",true"#,
    r#""Lukas Weber","CTO","Nordlicht GmbH",4,"Clear communication and a solid dashboard build.","Direct","February 2025","DE","Germany","Berlin",false"#,
];

/// Canonical header line
pub fn template_header() -> String {
    ReviewField::ALL
        .iter()
        .map(|f| f.column())
        .collect::<Vec<_>>()
        .join(",")
}

/// Header plus two example rows, newline terminated
pub fn template_csv() -> String {
    let mut out = template_header();
    out.push('\n');
    for row in EXAMPLE_ROWS {
        out.push_str(row);
        out.push('\n');
    }
    out
}
