//! Column mapping from arbitrary CSV headers onto review fields

use chrono::NaiveDate;

use crate::entities::{NewReview, ReviewField};

use super::tokenizer::ParsedRow;

/// Rating used when the cell is missing, non-numeric, or outside 1-5
pub const DEFAULT_RATING: u8 = 5;

/// Platform used when the file has no platform value
pub const DEFAULT_PLATFORM: &str = "Direct";

/// Accepted header names per field, in priority order
pub const FIELD_SYNONYMS: &[(ReviewField, &[&str])] = &[
    (ReviewField::ClientName, &["client_name", "name", "client"]),
    (ReviewField::ClientTitle, &["client_title", "title", "position"]),
    (ReviewField::ClientCompany, &["client_company", "company"]),
    (ReviewField::Rating, &["rating"]),
    (
        ReviewField::ReviewText,
        &["review_text", "review", "text", "testimonial"],
    ),
    (ReviewField::Platform, &["platform"]),
    (ReviewField::Date, &["date"]),
    (ReviewField::CountryCode, &["country_code"]),
    (ReviewField::CountryName, &["country_name", "country"]),
    (ReviewField::City, &["city"]),
    (ReviewField::IsFeatured, &["is_featured", "featured"]),
];

/// Header names accepted for a field
pub fn synonyms(field: ReviewField) -> &'static [&'static str] {
    FIELD_SYNONYMS
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, names)| *names)
        .unwrap_or(&[])
}

/// First non-empty cell among the field's synonyms
pub fn lookup(row: &ParsedRow, field: ReviewField) -> Option<&str> {
    synonyms(field)
        .iter()
        .filter_map(|name| row.get(*name))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
}

/// Build a candidate review from one parsed row
///
/// `date_label` fills the date when the row has none.
pub fn map_row(row: &ParsedRow, date_label: &str) -> NewReview {
    let text = |field| lookup(row, field).unwrap_or_default().to_string();

    NewReview {
        client_name: text(ReviewField::ClientName),
        client_title: text(ReviewField::ClientTitle),
        client_company: text(ReviewField::ClientCompany),
        rating: parse_rating(lookup(row, ReviewField::Rating)),
        review_text: text(ReviewField::ReviewText),
        platform: lookup(row, ReviewField::Platform)
            .unwrap_or(DEFAULT_PLATFORM)
            .to_string(),
        date: lookup(row, ReviewField::Date)
            .unwrap_or(date_label)
            .to_string(),
        country_code: text(ReviewField::CountryCode),
        country_name: text(ReviewField::CountryName),
        city: text(ReviewField::City),
        is_featured: lookup(row, ReviewField::IsFeatured) == Some("true"),
    }
}

/// Parse the leading integer of a cell, e.g. `4`, `4.5` or `4 stars`
pub fn parse_rating(raw: Option<&str>) -> u8 {
    let Some(raw) = raw else {
        return DEFAULT_RATING;
    };

    let raw = raw.trim();
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();

    digits
        .parse::<u8>()
        .ok()
        .filter(|r| (1..=5).contains(r))
        .unwrap_or(DEFAULT_RATING)
}

/// Display label for a month, e.g. "March 2025"
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}
