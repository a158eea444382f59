//! Builds the review listing SELECT: whitelisted sort column, direction, optional category filter.
//! Identifiers only ever come from `SortColumn`; the category value is always a bound parameter.

use crate::error::AppError;
use std::fmt;
use std::str::FromStr;

/// Columns the review listing may be sorted by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortColumn {
    ReviewId,
    Owner,
    Title,
    Designer,
    ReviewImgUrl,
    Category,
    #[default]
    CreatedAt,
    Votes,
    CommentCount,
}

impl SortColumn {
    pub const ALL: [SortColumn; 9] = [
        SortColumn::ReviewId,
        SortColumn::Owner,
        SortColumn::Title,
        SortColumn::Designer,
        SortColumn::ReviewImgUrl,
        SortColumn::Category,
        SortColumn::CreatedAt,
        SortColumn::Votes,
        SortColumn::CommentCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::ReviewId => "review_id",
            SortColumn::Owner => "owner",
            SortColumn::Title => "title",
            SortColumn::Designer => "designer",
            SortColumn::ReviewImgUrl => "review_img_url",
            SortColumn::Category => "category",
            SortColumn::CreatedAt => "created_at",
            SortColumn::Votes => "votes",
            SortColumn::CommentCount => "comment_count",
        }
    }

    /// ORDER BY expression. `comment_count` sorts on the numeric aggregate, not its text form.
    fn order_expr(&self) -> String {
        match self {
            SortColumn::CommentCount => format!("COUNT({}.{})", quoted("comments"), quoted("comment_id")),
            other => format!("{}.{}", quoted("reviews"), quoted(other.as_str())),
        }
    }
}

impl FromStr for SortColumn {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(AppError::InvalidQuery("Invalid sort query"))
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(AppError::InvalidQuery("Invalid order query")),
        }
    }
}

/// Validated parameters of GET /api/reviews.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewListQuery {
    pub category: Option<String>,
    pub sort_by: SortColumn,
    pub order: SortOrder,
}

impl ReviewListQuery {
    /// Parse raw query-string values. Empty values count as absent. `sort_by` is checked before `order`.
    pub fn parse(category: Option<&str>, sort_by: Option<&str>, order: Option<&str>) -> Result<Self, AppError> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|s| !s.is_empty())
        }
        let sort_by = present(sort_by).map(str::parse::<SortColumn>).transpose()?.unwrap_or_default();
        let order = present(order).map(str::parse::<SortOrder>).transpose()?.unwrap_or_default();
        Ok(ReviewListQuery {
            category: present(category).map(str::to_string),
            sort_by,
            order,
        })
    }
}

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<String>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: String) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

/// Review columns followed by the comment count as text, grouped per review.
fn review_select(with_body: bool) -> String {
    let mut cols: Vec<String> = [
        "review_id",
        "title",
        "designer",
        "owner",
        "review_img_url",
        "category",
        "votes",
        "created_at",
    ]
    .iter()
    .map(|c| format!("{}.{}", quoted("reviews"), quoted(c)))
    .collect();
    if with_body {
        cols.push(format!("{}.{}", quoted("reviews"), quoted("review_body")));
    }
    cols.push(format!(
        "COUNT({}.{})::text AS {}",
        quoted("comments"),
        quoted("comment_id"),
        quoted("comment_count")
    ));
    format!(
        "SELECT {} FROM {} LEFT JOIN {} ON {}.{} = {}.{}",
        cols.join(", "),
        quoted("reviews"),
        quoted("comments"),
        quoted("reviews"),
        quoted("review_id"),
        quoted("comments"),
        quoted("review_id")
    )
}

/// GET /api/reviews listing. Ties on the sort key fall back to `review_id` ascending.
pub fn select_reviews(query: &ReviewListQuery) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sql = review_select(false);
    if let Some(category) = &query.category {
        let n = q.push_param(category.clone());
        sql.push_str(&format!(" WHERE {}.{} = ${}", quoted("reviews"), quoted("category"), n));
    }
    sql.push_str(&format!(
        " GROUP BY {}.{} ORDER BY {} {}, {}.{} ASC",
        quoted("reviews"),
        quoted("review_id"),
        query.sort_by.order_expr(),
        query.order.as_sql(),
        quoted("reviews"),
        quoted("review_id")
    ));
    q.sql = sql;
    q
}

/// Single review with comment count. Caller binds the id as $1.
pub fn select_review_detail() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "{} WHERE {}.{} = $1 GROUP BY {}.{}",
        review_select(true),
        quoted("reviews"),
        quoted("review_id"),
        quoted("reviews"),
        quoted("review_id")
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_created_at_desc() {
        let q = ReviewListQuery::parse(None, None, None).unwrap();
        assert_eq!(q.sort_by, SortColumn::CreatedAt);
        assert_eq!(q.order, SortOrder::Desc);
        assert!(q.category.is_none());
    }

    #[test]
    fn empty_values_count_as_absent() {
        let q = ReviewListQuery::parse(Some(""), Some(""), Some("")).unwrap();
        assert_eq!(q, ReviewListQuery::default());
    }

    #[test]
    fn values_are_trimmed_before_parsing() {
        let q = ReviewListQuery::parse(Some(" dexterity "), Some(" votes"), Some("asc ")).unwrap();
        assert_eq!(q.category.as_deref(), Some("dexterity"));
        assert_eq!(q.sort_by, SortColumn::Votes);
        assert_eq!(q.order, SortOrder::Asc);
    }

    #[test]
    fn columns_display_as_their_names() {
        assert_eq!(SortColumn::CommentCount.to_string(), "comment_count");
        assert_eq!(SortColumn::ReviewImgUrl.to_string(), "review_img_url");
    }

    #[test]
    fn every_whitelisted_column_parses() {
        for col in SortColumn::ALL {
            assert_eq!(col.as_str().parse::<SortColumn>().unwrap(), col);
        }
    }

    #[test]
    fn rejects_unknown_sort_column() {
        for bad in ["5", "review_body", "votes; DROP TABLE reviews", "VOTES"] {
            let err = ReviewListQuery::parse(None, Some(bad), None).unwrap_err();
            assert_eq!(err.to_string(), "Invalid sort query");
        }
    }

    #[test]
    fn rejects_unknown_order() {
        let err = ReviewListQuery::parse(None, None, Some("triangle")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid order query");
    }

    #[test]
    fn sort_is_checked_before_order() {
        let err = ReviewListQuery::parse(None, Some("nope"), Some("sideways")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid sort query");
    }

    #[test]
    fn category_becomes_bound_parameter() {
        let query = ReviewListQuery::parse(Some("children's games"), Some("votes"), Some("asc")).unwrap();
        let q = select_reviews(&query);
        assert_eq!(q.params, vec!["children's games".to_string()]);
        assert!(q.sql.contains(r#"WHERE "reviews"."category" = $1"#));
        assert!(q.sql.contains(r#"ORDER BY "reviews"."votes" ASC, "reviews"."review_id" ASC"#));
        assert!(!q.sql.contains("children"));
    }

    #[test]
    fn comment_count_sorts_on_aggregate() {
        let query = ReviewListQuery::parse(None, Some("comment_count"), None).unwrap();
        let q = select_reviews(&query);
        assert!(q.params.is_empty());
        assert!(q.sql.contains(r#"ORDER BY COUNT("comments"."comment_id") DESC"#));
        assert!(q.sql.contains("LEFT JOIN"));
        assert!(!q.sql.contains("review_body"));
    }

    #[test]
    fn detail_includes_body_and_count() {
        let q = select_review_detail();
        assert!(q.sql.contains(r#""reviews"."review_body""#));
        assert!(q.sql.contains(r#"::text AS "comment_count""#));
        assert!(q.sql.contains(r#"WHERE "reviews"."review_id" = $1"#));
    }
}
