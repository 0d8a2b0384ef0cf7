use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// A customer review for a restaurant.
///
/// `restaurant_id` is a foreign key into the restaurants collection but is
/// not enforced referentially; an orphaned review (parent restaurant never
/// cached) is tolerated. The service sometimes delivers `restaurant_id` as a
/// string, so the field goes through [`RecordId`]'s lenient parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: RecordId,
    pub restaurant_id: RecordId,
    /// Reviewer display name.
    pub name: String,
    pub rating: u8,
    pub comments: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_parses_service_payload() {
        let json = r#"{
            "id": 4,
            "restaurant_id": "2",
            "name": "Morgan",
            "rating": 5,
            "comments": "This place is a blast.",
            "createdAt": "2017-01-10T17:37:11.000Z",
            "updatedAt": "2017-01-10T17:37:11.000Z"
        }"#;

        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.id, RecordId::from(4));
        // string-form parent id normalizes to the numeric form
        assert_eq!(review.restaurant_id, RecordId::from(2));
        assert_eq!(review.rating, 5);
    }
}
