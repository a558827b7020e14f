//! Static API description served at `/api/`.

use serde::Serialize;

use super::params::{ALLOWED_DIRECTION, ALLOWED_SORT, ALLOWED_STATE};

#[derive(Debug, Serialize)]
pub struct EndpointDescription {
    pub endpoint: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<IssueParams>,
}

#[derive(Debug, Serialize)]
pub struct IssueParams {
    pub sort: &'static [&'static str],
    pub direction: &'static [&'static str],
    pub state: &'static [&'static str],
    pub labels: &'static str,
    pub since: &'static str,
}

/// The three endpoints and what they accept.
pub fn api_description() -> [EndpointDescription; 3] {
    [
        EndpointDescription {
            endpoint: "/api/",
            description: "Returns api description",
            params: None,
        },
        EndpointDescription {
            endpoint: "/api/{name}/{repo}/",
            description: "Returns issue list",
            params: Some(IssueParams {
                sort: ALLOWED_SORT,
                direction: ALLOWED_DIRECTION,
                state: ALLOWED_STATE,
                labels: "A list of comma separated label names",
                since: "ISO 8601 format YYYY-MM-DDTHH:MM:SSZ",
            }),
        },
        EndpointDescription {
            endpoint: "/api/{name}/{repo}/labels",
            description: "Returns all allowed labels",
            params: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_document() {
        let value = serde_json::to_value(api_description()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                { "endpoint": "/api/", "description": "Returns api description" },
                {
                    "endpoint": "/api/{name}/{repo}/",
                    "description": "Returns issue list",
                    "params": {
                        "sort": ["created", "updated", "comments"],
                        "direction": ["desc", "asc"],
                        "state": ["open", "closed", "all"],
                        "labels": "A list of comma separated label names",
                        "since": "ISO 8601 format YYYY-MM-DDTHH:MM:SSZ"
                    }
                },
                { "endpoint": "/api/{name}/{repo}/labels", "description": "Returns all allowed labels" }
            ])
        );
    }
}
