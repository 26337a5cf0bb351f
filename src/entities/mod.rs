//! Entity type definitions

pub mod review;

pub use review::{NewReview, Review, ReviewField, REVIEWS_TABLE};
