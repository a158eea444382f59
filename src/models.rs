//! Row types returned by the store and request bodies accepted by handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub slug: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub username: String,
    pub name: String,
    pub avatar_url: String,
}

/// Full review row as stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub review_id: i32,
    pub title: String,
    pub designer: String,
    pub owner: String,
    pub review_img_url: String,
    pub review_body: String,
    pub category: String,
    pub votes: i32,
    pub created_at: DateTime<Utc>,
}

/// Review row with its comment count; `comment_count` is text on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ReviewDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub review: Review,
    pub comment_count: String,
}

/// Entry of the review listing. No `review_body`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ReviewSummary {
    pub review_id: i32,
    pub owner: String,
    pub title: String,
    pub designer: String,
    pub review_img_url: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub votes: i32,
    pub comment_count: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub comment_id: i32,
    pub review_id: i32,
    pub author: String,
    pub body: String,
    pub votes: i32,
    pub created_at: DateTime<Utc>,
}

/// PATCH /api/reviews/:id body. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct VotePatch {
    #[serde(default)]
    pub inc_votes: Option<serde_json::Value>,
}

/// POST /api/reviews/:id/comments body. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct NewComment {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jenga() -> Review {
        Review {
            review_id: 2,
            title: "Jenga".into(),
            designer: "Leslie Scott".into(),
            owner: "philippaclaire9".into(),
            review_img_url: "https://images.pexels.com/photos/4473494/pexels-photo-4473494.jpeg?w=700&h=700".into(),
            review_body: "Fiddly fun for all the family".into(),
            category: "dexterity".into(),
            votes: 5,
            created_at: Utc.timestamp_millis_opt(1610964101251).unwrap(),
        }
    }

    #[test]
    fn review_serializes_nine_keys() {
        let v = serde_json::to_value(jenga()).unwrap();
        assert_eq!(v.as_object().unwrap().len(), 9);
    }

    #[test]
    fn review_detail_flattens_with_string_count() {
        let detail = ReviewDetail {
            review: jenga(),
            comment_count: "3".into(),
        };
        let v = serde_json::to_value(detail).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 10);
        assert_eq!(obj["comment_count"], "3");
        assert_eq!(obj["review_id"], 2);
    }

    #[test]
    fn bodies_ignore_extra_fields() {
        let patch: VotePatch = serde_json::from_str(r#"{"inc_votes": 2, "shape": "square"}"#).unwrap();
        assert_eq!(patch.inc_votes.and_then(|v| v.as_i64()), Some(2));
        let comment: NewComment = serde_json::from_str(r#"{"username": "bainesface", "size": "medium"}"#).unwrap();
        assert_eq!(comment.username.as_deref(), Some("bainesface"));
        assert!(comment.body.is_none());
    }
}
