//! Read-only preview of candidates before they are committed

use std::fmt;

use tabled::{builder::Builder, settings::Style};

use crate::entities::NewReview;

/// Rows shown before the "...and N more" line
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;

/// One visible preview line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    /// 1-based position in the candidate list
    pub number: usize,
    pub client_name: String,
    pub client_company: String,
    pub stars: String,
    pub platform: String,
    /// Present only when the row has a country code
    pub location: Option<String>,
}

/// The visible slice of a candidate list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub rows: Vec<PreviewRow>,
    /// Number of candidates that will be submitted
    pub total: usize,
}

impl Preview {
    pub fn build(candidates: &[NewReview], limit: usize) -> Self {
        let rows = candidates
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, c)| PreviewRow {
                number: i + 1,
                client_name: c.client_name.clone(),
                client_company: c.client_company.clone(),
                stars: stars(c.rating),
                platform: c.platform.clone(),
                location: location_label(c),
            })
            .collect();

        Self {
            rows,
            total: candidates.len(),
        }
    }

    /// Candidates beyond the visible rows
    pub fn hidden(&self) -> usize {
        self.total.saturating_sub(self.rows.len())
    }

    /// "...and N more" when rows are hidden
    pub fn more_label(&self) -> Option<String> {
        match self.hidden() {
            0 => None,
            n => Some(format!("...and {} more", n)),
        }
    }

    /// Render as a table
    pub fn render(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(["#", "Client", "Company", "Rating", "Platform", "Location"]);

        for row in &self.rows {
            builder.push_record([
                row.number.to_string(),
                truncate_str(&row.client_name, 30),
                truncate_str(&row.client_company, 24),
                row.stars.clone(),
                row.platform.clone(),
                row.location.clone().unwrap_or_default(),
            ]);
        }

        builder.build().with(Style::rounded()).to_string()
    }
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.render())?;
        if let Some(more) = self.more_label() {
            writeln!(f, "{}", more)?;
        }
        Ok(())
    }
}

/// Filled and empty stars for a 1-5 rating
pub fn stars(rating: u8) -> String {
    let filled = rating.min(5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Truncate to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// "Country · City" label, shown only when a country code is set
///
/// The code stands in for a missing country name.
fn location_label(c: &NewReview) -> Option<String> {
    let code = c.country_code.trim();
    if code.is_empty() {
        return None;
    }

    let country = match c.country_name.trim() {
        "" => code,
        name => name,
    };

    match c.city.trim() {
        "" => Some(country.to_string()),
        city => Some(format!("{} · {}", country, city)),
    }
}
