//! Review entity - client testimonials shown on the public site

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::store::{Record, RecordStore, StoreError};

/// Store table holding reviews
pub const REVIEWS_TABLE: &str = "reviews";

/// Columns a review can be populated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewField {
    ClientName,
    ClientTitle,
    ClientCompany,
    Rating,
    ReviewText,
    Platform,
    Date,
    CountryCode,
    CountryName,
    City,
    IsFeatured,
}

impl ReviewField {
    /// All fields in canonical column order
    pub const ALL: [ReviewField; 11] = [
        ReviewField::ClientName,
        ReviewField::ClientTitle,
        ReviewField::ClientCompany,
        ReviewField::Rating,
        ReviewField::ReviewText,
        ReviewField::Platform,
        ReviewField::Date,
        ReviewField::CountryCode,
        ReviewField::CountryName,
        ReviewField::City,
        ReviewField::IsFeatured,
    ];

    /// Canonical column name
    pub fn column(&self) -> &'static str {
        match self {
            ReviewField::ClientName => "client_name",
            ReviewField::ClientTitle => "client_title",
            ReviewField::ClientCompany => "client_company",
            ReviewField::Rating => "rating",
            ReviewField::ReviewText => "review_text",
            ReviewField::Platform => "platform",
            ReviewField::Date => "date",
            ReviewField::CountryCode => "country_code",
            ReviewField::CountryName => "country_name",
            ReviewField::City => "city",
            ReviewField::IsFeatured => "is_featured",
        }
    }
}

impl std::fmt::Display for ReviewField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// A review that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    pub client_name: String,
    pub client_title: String,
    pub client_company: String,
    pub rating: u8,
    pub review_text: String,
    pub platform: String,
    pub date: String,
    pub country_code: String,
    pub country_name: String,
    pub city: String,
    pub is_featured: bool,
}

impl NewReview {
    /// True when both required fields carry text
    pub fn has_required_fields(&self) -> bool {
        !self.client_name.trim().is_empty() && !self.review_text.trim().is_empty()
    }

    /// Turn into a storable row at the given position
    ///
    /// Empty geographic fields become `None`.
    pub fn into_review(self, order_index: i64) -> Review {
        Review {
            id: None,
            client_name: self.client_name,
            client_title: self.client_title,
            client_company: self.client_company,
            rating: self.rating,
            review_text: self.review_text,
            platform: self.platform,
            date: self.date,
            country_code: non_empty(self.country_code),
            country_name: non_empty(self.country_name),
            city: non_empty(self.city),
            is_featured: self.is_featured,
            order_index,
            client_image: None,
            created_at: None,
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// A review row as kept in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Assigned by the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub client_name: String,
    #[serde(default)]
    pub client_title: String,
    #[serde(default)]
    pub client_company: String,
    pub rating: u8,
    pub review_text: String,
    pub platform: String,
    pub date: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    pub order_index: i64,
    #[serde(default)]
    pub client_image: Option<String>,
    /// Assigned by the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Serialize into a store row
    pub fn to_record(&self) -> Result<Record, serde_json::Error> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "expected an object, got {}",
                other
            ))),
        }
    }

    /// Parse a store row
    pub fn from_record(record: Record) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::Value::Object(record))
    }

    /// Read every stored review, ordered by `order_index`
    pub fn load_all<S: RecordStore + ?Sized>(store: &S) -> Result<Vec<Review>, StoreError> {
        let mut reviews = store
            .select(REVIEWS_TABLE)?
            .into_iter()
            .map(|record| {
                Review::from_record(record).map_err(|source| StoreError::Malformed {
                    table: REVIEWS_TABLE.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Stable sort keeps insertion order among equal indices
        reviews.sort_by_key(|r| r.order_index);
        Ok(reviews)
    }

    /// Highest `order_index` in the store, or 0 when there are no reviews
    pub fn max_order_index<S: RecordStore + ?Sized>(store: &S) -> Result<i64, StoreError> {
        Ok(Self::load_all(store)?
            .iter()
            .map(|r| r.order_index)
            .max()
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::SqliteStore;

    fn candidate() -> NewReview {
        NewReview {
            client_name: "Jane Smith".into(),
            client_title: "CTO".into(),
            client_company: "Acme".into(),
            rating: 3,
            review_text: "Great work".into(),
            platform: "Direct".into(),
            date: "March 2025".into(),
            country_code: "".into(),
            country_name: " ".into(),
            city: "Berlin".into(),
            is_featured: true,
        }
    }

    #[test]
    fn test_into_review_normalizes_geo_fields() {
        let review = candidate().into_review(7);
        assert_eq!(review.country_code, None);
        assert_eq!(review.country_name, None);
        assert_eq!(review.city.as_deref(), Some("Berlin"));
        assert_eq!(review.order_index, 7);
        assert_eq!(review.client_image, None);
        assert_eq!(review.id, None);
    }

    #[test]
    fn test_record_keeps_nulls_but_not_store_fields() {
        let record = candidate().into_review(1).to_record().unwrap();
        assert!(record["country_code"].is_null());
        assert!(record["client_image"].is_null());
        assert!(!record.contains_key("id"));
        assert!(!record.contains_key("created_at"));
    }

    #[test]
    fn test_round_trip_through_store() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let record = candidate().into_review(1).to_record().unwrap();
        store.insert(REVIEWS_TABLE, &[record]).unwrap();

        let reviews = Review::load_all(&store).unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].rating, 3);
        assert!(reviews[0].is_featured);
        assert!(reviews[0].id.is_some());
        assert!(reviews[0].created_at.is_some());
    }

    #[test]
    fn test_max_order_index() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(Review::max_order_index(&store).unwrap(), 0);

        let rows: Vec<Record> = [4, 9, 2]
            .into_iter()
            .map(|i| candidate().into_review(i).to_record().unwrap())
            .collect();
        store.insert(REVIEWS_TABLE, &rows).unwrap();

        assert_eq!(Review::max_order_index(&store).unwrap(), 9);
        let order: Vec<i64> = Review::load_all(&store)
            .unwrap()
            .iter()
            .map(|r| r.order_index)
            .collect();
        assert_eq!(order, vec![2, 4, 9]);
    }

    #[test]
    fn test_field_columns_are_unique() {
        let mut columns: Vec<&str> = ReviewField::ALL.iter().map(|f| f.column()).collect();
        columns.sort();
        columns.dedup();
        assert_eq!(columns.len(), ReviewField::ALL.len());
    }
}
