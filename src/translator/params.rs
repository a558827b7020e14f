//! Query parameter validation for the issue listing.
//!
//! # Responsibilities
//! - Hold the allow-lists for `sort`, `direction` and `state`
//! - Check each present parameter in a fixed order
//! - Produce the ordered list of pairs that may be forwarded upstream
//!
//! # Design Decisions
//! - Allow-lists are `const`: shared read-only by every request, no locking
//! - First failure wins; later parameters are never looked at
//! - Unknown parameters are dropped, never forwarded

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use url::form_urlencoded;

/// Accepted values for `sort`.
pub const ALLOWED_SORT: &[&str] = &["created", "updated", "comments"];

/// Accepted values for `direction`.
pub const ALLOWED_DIRECTION: &[&str] = &["desc", "asc"];

/// Accepted values for `state`.
pub const ALLOWED_STATE: &[&str] = &["open", "closed", "all"];

/// A parameter rejected before any upstream call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Allowed sort: {}", ALLOWED_SORT.join(","))]
    Sort,
    #[error("Allowed sort direction: {}", ALLOWED_DIRECTION.join(","))]
    Direction,
    #[error("Allowed state: {}", ALLOWED_STATE.join(","))]
    State,
    #[error("Allowed since timestamp in ISO 8601 format YYYY-MM-DDTHH:MM:SSZ")]
    Since,
    #[error("Allowed labels is a list of comma separated label names")]
    Labels,
}

impl ValidationError {
    /// Name of the rejected query parameter.
    pub fn param(&self) -> &'static str {
        match self {
            ValidationError::Sort => IssueParam::Sort.name(),
            ValidationError::Direction => IssueParam::Direction.name(),
            ValidationError::State => IssueParam::State.name(),
            ValidationError::Since => IssueParam::Since.name(),
            ValidationError::Labels => IssueParam::Labels.name(),
        }
    }
}

/// The issue listing parameters, in the order they are validated and forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueParam {
    Sort,
    Direction,
    State,
    Since,
    Labels,
}

impl IssueParam {
    pub const ORDER: [IssueParam; 5] = [
        IssueParam::Sort,
        IssueParam::Direction,
        IssueParam::State,
        IssueParam::Since,
        IssueParam::Labels,
    ];

    /// Query string key.
    pub fn name(self) -> &'static str {
        match self {
            IssueParam::Sort => "sort",
            IssueParam::Direction => "direction",
            IssueParam::State => "state",
            IssueParam::Since => "since",
            IssueParam::Labels => "labels",
        }
    }

    fn accepts(self, value: &str) -> bool {
        match self {
            IssueParam::Sort => ALLOWED_SORT.contains(&value),
            IssueParam::Direction => ALLOWED_DIRECTION.contains(&value),
            IssueParam::State => ALLOWED_STATE.contains(&value),
            IssueParam::Since => parse_timestamp(value),
            IssueParam::Labels => !value.contains(' '),
        }
    }

    fn error(self) -> ValidationError {
        match self {
            IssueParam::Sort => ValidationError::Sort,
            IssueParam::Direction => ValidationError::Direction,
            IssueParam::State => ValidationError::State,
            IssueParam::Since => ValidationError::Since,
            IssueParam::Labels => ValidationError::Labels,
        }
    }
}

/// Accepts anything that reads as a point in time: RFC 3339, ISO 8601
/// date-times with or without seconds and offset, calendar dates down to
/// year precision, and RFC 2822.
fn parse_timestamp(value: &str) -> bool {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").is_ok()
        || DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M%:z").is_ok()
        || value
            .strip_suffix('Z')
            .is_some_and(|v| NaiveDateTime::parse_from_str(v, "%Y-%m-%dT%H:%M").is_ok())
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || parse_reduced_date(value)
        || DateTime::parse_from_rfc2822(value).is_ok()
}

/// `YYYY` or `YYYY-MM`.
fn parse_reduced_date(value: &str) -> bool {
    let padded = match value.len() {
        4 => format!("{value}-01-01"),
        7 => format!("{value}-01"),
        _ => return false,
    };
    value.bytes().take(4).all(|b| b.is_ascii_digit())
        && NaiveDate::parse_from_str(&padded, "%Y-%m-%d").is_ok()
}

/// Raw query string of an issue listing request, decoded into pairs.
#[derive(Debug, Clone, Default)]
pub struct IssueQuery {
    pairs: Vec<(String, String)>,
}

impl IssueQuery {
    /// Decode a raw (`application/x-www-form-urlencoded`) query string.
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    /// Validate every present parameter and return the pairs to forward,
    /// in forwarding order.
    pub fn validate(&self) -> Result<Vec<(&'static str, String)>, ValidationError> {
        let mut forwarded = Vec::new();

        for param in IssueParam::ORDER {
            let mut values = self
                .pairs
                .iter()
                .filter(|(key, _)| key == param.name())
                .map(|(_, value)| value);

            let Some(value) = values.next() else {
                continue;
            };

            // A repeated key is not a single allowed value.
            if values.next().is_some() || !param.accepts(value) {
                return Err(param.error());
            }

            forwarded.push((param.name(), value.clone()));
        }

        Ok(forwarded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(raw: &str) -> Result<Vec<(&'static str, String)>, ValidationError> {
        IssueQuery::parse(Some(raw)).validate()
    }

    #[test]
    fn test_messages_match_allow_lists() {
        assert_eq!(ValidationError::Sort.to_string(), "Allowed sort: created,updated,comments");
        assert_eq!(ValidationError::Direction.to_string(), "Allowed sort direction: desc,asc");
        assert_eq!(ValidationError::State.to_string(), "Allowed state: open,closed,all");
        assert_eq!(
            ValidationError::Since.to_string(),
            "Allowed since timestamp in ISO 8601 format YYYY-MM-DDTHH:MM:SSZ"
        );
        assert_eq!(
            ValidationError::Labels.to_string(),
            "Allowed labels is a list of comma separated label names"
        );
    }

    #[test]
    fn test_absent_query_forwards_nothing() {
        assert_eq!(IssueQuery::parse(None).validate(), Ok(vec![]));
        assert_eq!(validate(""), Ok(vec![]));
    }

    #[test]
    fn test_every_allowed_value_passes() {
        for sort in ALLOWED_SORT {
            assert!(validate(&format!("sort={sort}")).is_ok());
        }
        for direction in ALLOWED_DIRECTION {
            assert!(validate(&format!("direction={direction}")).is_ok());
        }
        for state in ALLOWED_STATE {
            assert!(validate(&format!("state={state}")).is_ok());
        }
    }

    #[test]
    fn test_disallowed_values_rejected() {
        assert_eq!(validate("sort=invalid"), Err(ValidationError::Sort));
        assert_eq!(validate("sort=Created"), Err(ValidationError::Sort));
        assert_eq!(validate("direction=up"), Err(ValidationError::Direction));
        assert_eq!(validate("state=merged"), Err(ValidationError::State));
        assert_eq!(validate("since=yesterday"), Err(ValidationError::Since));
        assert_eq!(validate("labels=bug%20fix"), Err(ValidationError::Labels));
        assert_eq!(validate("labels=bug+fix"), Err(ValidationError::Labels));
    }

    #[test]
    fn test_empty_values() {
        assert_eq!(validate("sort="), Err(ValidationError::Sort));
        assert_eq!(validate("since="), Err(ValidationError::Since));
        assert_eq!(validate("labels="), Ok(vec![("labels", String::new())]));
    }

    #[test]
    fn test_first_failure_in_order_wins() {
        // Query string order does not matter, validation order does.
        assert_eq!(
            validate("labels=a%20b&since=nope&state=x&direction=y&sort=z"),
            Err(ValidationError::Sort)
        );
        assert_eq!(
            validate("labels=a%20b&since=nope&state=x&direction=y"),
            Err(ValidationError::Direction)
        );
        assert_eq!(validate("labels=a%20b&since=nope&state=x"), Err(ValidationError::State));
        assert_eq!(validate("labels=a%20b&since=nope"), Err(ValidationError::Since));
    }

    #[test]
    fn test_forwarded_in_fixed_order() {
        let forwarded =
            validate("labels=bug,ui&since=2024-01-01T00:00:00Z&state=open&direction=asc&sort=updated")
                .unwrap();
        assert_eq!(
            forwarded,
            vec![
                ("sort", "updated".to_string()),
                ("direction", "asc".to_string()),
                ("state", "open".to_string()),
                ("since", "2024-01-01T00:00:00Z".to_string()),
                ("labels", "bug,ui".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_parameters_dropped() {
        assert_eq!(
            validate("page=2&per_page=100&state=all"),
            Ok(vec![("state", "all".to_string())])
        );
    }

    #[test]
    fn test_repeated_parameter_rejected() {
        assert_eq!(validate("state=open&state=closed"), Err(ValidationError::State));
    }

    #[test]
    fn test_since_formats() {
        for ok in [
            "2011-04-22T13:33:48Z",
            "2011-04-22T13:33:48.123Z",
            "2011-04-22T13:33:48+02:00",
            "2011-04-22T13:33:48",
            "2011-04-22T13:33",
            "2011-04-22T13:33Z",
            "2011-04-22T13:33+02:00",
            "2011-04-22",
            "2011-04",
            "2011",
            "Fri, 22 Apr 2011 13:33:48 +0000",
        ] {
            assert!(parse_timestamp(ok), "{ok} should parse");
        }
        for bad in [
            "",
            "2011-13-45",
            "2011-13",
            "201",
            "+2011",
            "22/04/2011",
            "now",
            "2011-04-22T25:00:00Z",
        ] {
            assert!(!parse_timestamp(bad), "{bad} should not parse");
        }
    }
}
