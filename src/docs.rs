//! Endpoint documentation served at GET /api.

use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDoc {
    #[serde(skip)]
    pub method: &'static str,
    #[serde(skip)]
    pub path: &'static str,
    pub description: &'static str,
    pub queries: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_request: Option<Value>,
    pub example_response: Value,
}

impl EndpointDoc {
    /// Document key, e.g. "GET /api/reviews".
    pub fn key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

fn example_review() -> Value {
    json!({
        "review_id": 2,
        "title": "Jenga",
        "designer": "Leslie Scott",
        "owner": "philippaclaire9",
        "review_img_url": "https://images.pexels.com/photos/4473494/pexels-photo-4473494.jpeg?w=700&h=700",
        "review_body": "Fiddly fun for all the family",
        "category": "dexterity",
        "votes": 5,
        "created_at": "2021-01-18T10:01:41.251Z"
    })
}

fn example_comment() -> Value {
    json!({
        "comment_id": 1,
        "review_id": 2,
        "author": "bainesface",
        "body": "I loved this game too!",
        "votes": 16,
        "created_at": "2017-11-22T12:43:33.389Z"
    })
}

pub fn endpoints() -> Vec<EndpointDoc> {
    let mut review_with_count = example_review();
    review_with_count["comment_count"] = json!("3");
    let mut review_summary = review_with_count.clone();
    if let Some(obj) = review_summary.as_object_mut() {
        obj.remove("review_body");
    }

    vec![
        EndpointDoc {
            method: "GET",
            path: "/api",
            description: "serves up a json representation of all the available endpoints of the api",
            queries: vec![],
            example_request: None,
            example_response: json!({ "GET /api/categories": { "description": "..." } }),
        },
        EndpointDoc {
            method: "GET",
            path: "/api/categories",
            description: "serves an array of all categories",
            queries: vec![],
            example_request: None,
            example_response: json!({
                "categories": [{ "slug": "dexterity", "description": "Games involving physical skill" }]
            }),
        },
        EndpointDoc {
            method: "GET",
            path: "/api/reviews",
            description: "serves an array of all reviews with their comment counts",
            queries: vec!["category", "sort_by", "order"],
            example_request: None,
            example_response: json!({ "reviews": [review_summary] }),
        },
        EndpointDoc {
            method: "GET",
            path: "/api/reviews/:review_id",
            description: "serves a single review with its comment count",
            queries: vec![],
            example_request: None,
            example_response: json!({ "review": review_with_count }),
        },
        EndpointDoc {
            method: "PATCH",
            path: "/api/reviews/:review_id",
            description: "adds inc_votes to the review's votes (never below 0) and serves the updated review",
            queries: vec![],
            example_request: Some(json!({ "inc_votes": 2 })),
            example_response: json!({ "review": example_review() }),
        },
        EndpointDoc {
            method: "GET",
            path: "/api/reviews/:review_id/comments",
            description: "serves an array of comments for the review, most recent first",
            queries: vec![],
            example_request: None,
            example_response: json!({ "comments": [example_comment()] }),
        },
        EndpointDoc {
            method: "POST",
            path: "/api/reviews/:review_id/comments",
            description: "adds a comment by an existing user to the review and serves the new comment",
            queries: vec![],
            example_request: Some(json!({ "username": "bainesface", "body": "I loved this game too!" })),
            example_response: json!({ "comment": example_comment() }),
        },
        EndpointDoc {
            method: "DELETE",
            path: "/api/comments/:comment_id",
            description: "deletes the comment and responds with no content",
            queries: vec![],
            example_request: None,
            example_response: Value::Null,
        },
        EndpointDoc {
            method: "GET",
            path: "/api/users",
            description: "serves an array of all users",
            queries: vec![],
            example_request: None,
            example_response: json!({
                "users": [{
                    "username": "bainesface",
                    "name": "sarah",
                    "avatar_url": "https://avatars2.githubusercontent.com/u/24394918?s=400&v=4"
                }]
            }),
        },
        EndpointDoc {
            method: "GET",
            path: "/health",
            description: "liveness check",
            queries: vec![],
            example_request: None,
            example_response: json!({ "status": "ok" }),
        },
        EndpointDoc {
            method: "GET",
            path: "/ready",
            description: "readiness check; 503 when the store is unreachable",
            queries: vec![],
            example_request: None,
            example_response: json!({ "status": "ok", "database": "ok" }),
        },
        EndpointDoc {
            method: "GET",
            path: "/version",
            description: "serves the service name and version",
            queries: vec![],
            example_request: None,
            example_response: json!({ "name": env!("CARGO_PKG_NAME"), "version": env!("CARGO_PKG_VERSION") }),
        },
    ]
}

/// The whole document: one entry per endpoint keyed by "METHOD path".
pub fn api_document() -> Value {
    let mut map = Map::new();
    for doc in endpoints() {
        let key = doc.key();
        match serde_json::to_value(&doc) {
            Ok(v) => {
                map.insert(key, v);
            }
            Err(e) => tracing::warn!(endpoint = %key, error = %e, "skipping undocumentable endpoint"),
        }
    }
    Value::Object(map)
}
