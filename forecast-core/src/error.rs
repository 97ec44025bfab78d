use thiserror::Error;

/// Why a geocoding or forecast lookup did not produce usable data.
///
/// The front end collapses every variant into the same "invalid form"
/// feedback; the variants exist for logs and tests.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("failed to parse {endpoint} JSON: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} response is missing `{field}`")]
    MissingField {
        endpoint: &'static str,
        field: &'static str,
    },
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("not found"), "not found");
    }

    #[test]
    fn truncate_cuts_on_char_boundary() {
        let body = "é".repeat(150);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= 203);
    }

    #[test]
    fn missing_field_message_names_the_field() {
        let err = LookupError::MissingField {
            endpoint: "geocode",
            field: "city.coord",
        };
        assert_eq!(err.to_string(), "geocode response is missing `city.coord`");
    }
}
