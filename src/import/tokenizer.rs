//! Line-oriented CSV tokenizer for review uploads
//!
//! This is deliberately not RFC 4180. A `"` toggles quoting and is dropped,
//! so a doubled `""` inside a quoted field is not an escape: it closes and
//! reopens the quote and the literal quote is lost from the value. Files
//! that rely on `""` escaping import with that artifact. Records cannot
//! span lines either.

use std::collections::HashMap;

/// One data line keyed by normalized header name
pub type ParsedRow = HashMap<String, String>;

/// Lines producing fewer fields than this are dropped
pub const MIN_FIELDS: usize = 3;

/// Tokenizer output
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedCsv {
    /// Normalized header names, in file order
    pub headers: Vec<String>,
    /// Retained data rows
    pub rows: Vec<ParsedRow>,
    /// Data lines dropped for having too few fields
    pub malformed: usize,
}

impl ParsedCsv {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse a whole file into header-keyed rows
///
/// Returns an empty result when fewer than two non-blank lines exist. A
/// leading UTF-8 byte order mark is ignored.
pub fn parse_csv(text: &str) -> ParsedCsv {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines: Vec<&str> = text.split('\n').filter(|l| !l.trim().is_empty()).collect();

    if lines.len() < 2 {
        return ParsedCsv::default();
    }

    // Headers are split naively; quoted commas are not supported there
    let headers: Vec<String> = lines[0]
        .split(',')
        .map(|h| strip_quotes(&h.trim().to_lowercase()).to_string())
        .collect();

    let mut parsed = ParsedCsv {
        headers,
        ..Default::default()
    };

    for line in &lines[1..] {
        let fields: Vec<String> = split_line(line)
            .iter()
            .map(|f| normalize_cell(f))
            .collect();

        if fields.len() < MIN_FIELDS {
            parsed.malformed += 1;
            continue;
        }

        let row = parsed
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), fields.get(i).cloned().unwrap_or_default()))
            .collect();
        parsed.rows.push(row);
    }

    parsed
}

/// Split one data line on commas outside double quotes
///
/// Quote characters are consumed, not copied into the field.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}

/// Trim and remove one layer of surrounding quotes
pub fn normalize_cell(raw: &str) -> String {
    strip_quotes(raw.trim()).to_string()
}

fn strip_quotes(s: &str) -> &str {
    const QUOTES: &[char] = &['"', '\''];
    let s = s.strip_prefix(QUOTES).unwrap_or(s);
    s.strip_suffix(QUOTES).unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_header_and_data() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("client_name,rating,review_text").is_empty());
        assert!(parse_csv("client_name,rating,review_text\n\n   \n").is_empty());
    }

    #[test]
    fn test_headers_normalized() {
        let parsed = parse_csv(" Client_Name ,\"Rating\",'Review_Text'\nA,5,Nice\n");
        assert_eq!(parsed.headers, vec!["client_name", "rating", "review_text"]);
        assert_eq!(parsed.rows[0]["client_name"], "A");
        assert_eq!(parsed.rows[0]["review_text"], "Nice");
    }

    #[test]
    fn test_quoted_comma_preserved() {
        let text = "client_name,client_title,client_company,rating,review_text,platform,date,country_code,country_name,city,is_featured\n\
                    \"Doe, John\",\"CEO\",\"Corp\",5,\"Great, really great\",\"Fiverr\",,,,,\n";
        let parsed = parse_csv(text);

        assert_eq!(parsed.rows.len(), 1);
        let row = &parsed.rows[0];
        assert_eq!(row["client_name"], "Doe, John");
        assert_eq!(row["review_text"], "Great, really great");
        assert_eq!(row["platform"], "Fiverr");
        assert_eq!(row["country_code"], "");
        assert_eq!(row["is_featured"], "");
    }

    #[test]
    fn test_short_lines_dropped() {
        let parsed = parse_csv("client_name,rating,review_text\nA,5\nB,4,Good\nonly-one\n");
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.malformed, 2);
        assert_eq!(parsed.rows[0]["client_name"], "B");
    }

    #[test]
    fn test_extra_fields_ignored_missing_fields_empty() {
        let parsed = parse_csv("a,b,c,d\n1,2,3\n1,2,3,4,5,6\n");
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0]["d"], "");
        assert_eq!(parsed.rows[1]["d"], "4");
        assert_eq!(parsed.rows[1].len(), 4);
    }

    #[test]
    fn test_crlf_line_endings() {
        let parsed = parse_csv("client_name,rating,review_text\r\nAda,4,Sharp\r\n");
        assert_eq!(parsed.headers[2], "review_text");
        assert_eq!(parsed.rows[0]["review_text"], "Sharp");
    }

    #[test]
    fn test_leading_bom_ignored() {
        let parsed = parse_csv("\u{feff}client_name,rating,review_text\nAda,5,Sharp\n");
        assert_eq!(parsed.headers[0], "client_name");
        assert_eq!(parsed.rows[0]["client_name"], "Ada");
    }

    #[test]
    fn test_doubled_quote_is_not_an_escape() {
        // `""` is not treated as an escaped quote
        let fields = split_line(r#"A,"He said ""hi""",x"#);
        assert_eq!(fields, vec!["A", "He said hi", "x"]);

        let fields = split_line(r#"A,"5"" screen",x"#);
        assert_eq!(fields, vec!["A", "5 screen", "x"]);

        // An unbalanced quote swallows the rest of the line
        let fields = split_line(r#"A,"open,b,c"#);
        assert_eq!(fields, vec!["A", "open,b,c"]);
    }

    #[test]
    fn test_single_quotes_stripped_one_layer() {
        assert_eq!(normalize_cell("  'Acme'  "), "Acme");
        assert_eq!(normalize_cell("''x''"), "'x'");
        assert_eq!(normalize_cell("plain"), "plain");
    }
}
