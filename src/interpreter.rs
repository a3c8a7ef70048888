//! Query-string driven validation and field extraction.
//!
//! The caller configures each webhook through its query string:
//!
//! | Parameter | Effect |
//! |---|---|
//! | `rundeckjobid=<id>` | Rundeck job to run |
//! | `checkheader<name>=<value>` | header `<name>` must equal `<value>` |
//! | `checkkey<name>=<value>` | body field `<name>` must equal `<value>` |
//! | `passkey<name>` | forward body field `<name>` as a job option |
//!
//! Names are matched case-sensitively and the first matching rule wins, in
//! the order above. The parameters are parsed once into [`Directives`] and
//! then evaluated against the event with [`Directives::interpret`].

use lambda_runtime::tracing::{debug, info, warn};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

const JOB_ID_PARAM: &str = "rundeckjobid";
const CHECK_HEADER_PREFIX: &str = "checkheader";
const CHECK_KEY_PREFIX: &str = "checkkey";
const PASS_KEY_PREFIX: &str = "passkey";

/// A body field forwarded to Rundeck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassKey {
    /// Field read from the webhook body
    pub source: String,
    /// Option name sent to Rundeck
    pub output: String,
}

impl PassKey {
    fn new(name: &str) -> Self {
        // `passkey<name>:<alias>` renaming is not supported: the colon and
        // everything after it stay part of the field name.
        if name.contains(':') {
            warn!(
                passkey = %name,
                "Pass-key rename syntax is not supported; the full name is used as the field"
            );
        }
        Self {
            source: name.to_string(),
            output: name.to_string(),
        }
    }
}

/// The typed form of the query-string conventions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    pub job_id: Option<String>,
    /// (header name, expected value)
    pub header_checks: Vec<(String, String)>,
    /// (body field, expected value)
    pub body_checks: Vec<(String, String)>,
    pub pass_keys: Vec<PassKey>,
}

impl Directives {
    /// Classifies each query parameter by its prefix.
    ///
    /// Parameters matching no rule are ignored. A later `rundeckjobid`
    /// overrides an earlier one.
    pub fn parse<'a, I>(parameters: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut directives = Self::default();

        for (name, value) in parameters {
            if name == JOB_ID_PARAM {
                directives.job_id = Some(value.to_string());
            } else if let Some(header) = name.strip_prefix(CHECK_HEADER_PREFIX) {
                directives
                    .header_checks
                    .push((header.to_string(), value.to_string()));
            } else if let Some(key) = name.strip_prefix(CHECK_KEY_PREFIX) {
                directives
                    .body_checks
                    .push((key.to_string(), value.to_string()));
            } else if let Some(key) = name.strip_prefix(PASS_KEY_PREFIX) {
                directives.pass_keys.push(PassKey::new(key));
            } else {
                debug!(parameter = %name, "Ignoring unrecognised query parameter");
            }
        }

        directives
    }

    /// Evaluates the checks and collects the forwarded options.
    ///
    /// Never fails: a failed check is recorded in the returned [`Intent`]
    /// and a missing pass-key field is logged and skipped.
    #[must_use]
    pub fn interpret(
        &self,
        headers: Option<&HashMap<String, String>>,
        body: &Map<String, Value>,
    ) -> Intent {
        let failed_headers: Vec<String> = self
            .header_checks
            .iter()
            .filter(|(name, expected)| {
                let actual = headers.and_then(|h| h.get(name.as_str()));
                let matched = actual.is_some_and(|actual| actual == expected);
                if !matched {
                    warn!(
                        header = %name,
                        expected = %expected,
                        "Header value did not match the expected value"
                    );
                }
                !matched
            })
            .map(|(name, _)| name.clone())
            .collect();

        let failed_keys: Vec<String> = self
            .body_checks
            .iter()
            .filter(|(key, expected)| {
                let matched = body
                    .get(key.as_str())
                    .is_some_and(|v| body_value_matches(v, expected));
                if !matched {
                    warn!(
                        key = %key,
                        expected = %expected,
                        "Body value did not match the expected value"
                    );
                }
                !matched
            })
            .map(|(key, _)| key.clone())
            .collect();

        Intent {
            job_id: self.job_id.clone(),
            outcome: CheckOutcome {
                headers_passed: failed_headers.is_empty(),
                body_passed: failed_keys.is_empty(),
            },
            options: self.forwarded_options(body),
            failed_headers,
            failed_keys,
        }
    }

    /// Copies each requested body field that exists into the option map.
    #[must_use]
    pub fn forwarded_options(&self, body: &Map<String, Value>) -> Map<String, Value> {
        let mut options = Map::new();
        for pass_key in &self.pass_keys {
            if let Some(value) = body.get(&pass_key.source) {
                options.insert(pass_key.output.clone(), value.clone());
            } else {
                info!(key = %pass_key.source, "Key not found in body and cannot be passed");
            }
        }
        options
    }
}

// A JSON string compares by content; numbers and booleans by their JSON text.
fn body_value_matches(actual: &Value, expected: &str) -> bool {
    match actual {
        Value::String(s) => s == expected,
        Value::Number(n) => n.to_string() == expected,
        Value::Bool(b) => b.to_string() == expected,
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Whether the requested checks passed. Vacuously true with no checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutcome {
    pub headers_passed: bool,
    pub body_passed: bool,
}

impl CheckOutcome {
    #[must_use]
    pub const fn passed(self) -> bool {
        self.headers_passed && self.body_passed
    }
}

/// The result of evaluating [`Directives`] against one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    pub job_id: Option<String>,
    pub outcome: CheckOutcome,
    /// Forwarded job options, a subset of the body
    pub options: Map<String, Value>,
    pub failed_headers: Vec<String>,
    pub failed_keys: Vec<String>,
}

/// An intent that passed validation and can be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedIntent {
    pub job_id: String,
    pub options: Map<String, Value>,
}

/// Why a standard (non-ping) request was rejected.
///
/// The caller only ever sees one generic message; the variant is kept for
/// logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    MissingJobId,
    HeaderCheckFailed { headers: Vec<String> },
    BodyCheckFailed { keys: Vec<String> },
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingJobId => write!(f, "missing `{JOB_ID_PARAM}` query parameter"),
            Self::HeaderCheckFailed { headers } => {
                write!(f, "header checks failed for: {}", headers.join(", "))
            }
            Self::BodyCheckFailed { keys } => {
                write!(f, "body key checks failed for: {}", keys.join(", "))
            }
        }
    }
}

impl std::error::Error for ValidationFailure {}

impl Intent {
    /// Requires a job id and passing checks.
    ///
    /// # Errors
    ///
    /// Returns the first failing cause, in the order job id, headers, body.
    pub fn validate(self) -> Result<ValidatedIntent, ValidationFailure> {
        let Some(job_id) = self.job_id else {
            return Err(ValidationFailure::MissingJobId);
        };
        if !self.outcome.headers_passed {
            return Err(ValidationFailure::HeaderCheckFailed {
                headers: self.failed_headers,
            });
        }
        if !self.outcome.body_passed {
            return Err(ValidationFailure::BodyCheckFailed {
                keys: self.failed_keys,
            });
        }
        Ok(ValidatedIntent {
            job_id,
            options: self.options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_parse_classifies_by_prefix() {
        let directives = Directives::parse([
            ("rundeckjobid", "J1"),
            ("checkheaderX-Token", "secret"),
            ("checkkeyref", "refs/heads/main"),
            ("passkeyuser", ""),
            ("unrelated", "x"),
        ]);

        assert_eq!(directives.job_id.as_deref(), Some("J1"));
        assert_eq!(
            directives.header_checks,
            vec![("X-Token".to_string(), "secret".to_string())]
        );
        assert_eq!(
            directives.body_checks,
            vec![("ref".to_string(), "refs/heads/main".to_string())]
        );
        assert_eq!(directives.pass_keys, vec![PassKey::new("user")]);
    }

    #[test]
    fn test_job_id_must_match_exactly() {
        let directives = Directives::parse([("rundeckjobidextra", "J1"), ("RundeckJobId", "J2")]);
        assert!(directives.job_id.is_none());
        assert!(directives.pass_keys.is_empty());
    }

    #[test]
    fn test_prefixes_are_case_sensitive() {
        let directives = Directives::parse([("PassKeyuser", ""), ("CHECKKEYref", "x")]);
        assert_eq!(directives, Directives::default());
    }

    #[test]
    fn test_rename_suffix_is_kept_in_field_name() {
        let directives = Directives::parse([("passkeyuser:login", "")]);
        assert_eq!(directives.pass_keys[0].source, "user:login");
        assert_eq!(directives.pass_keys[0].output, "user:login");

        let options = directives.forwarded_options(&body(json!({"user": "octocat"})));
        assert!(options.is_empty());
    }

    #[test]
    fn test_no_checks_pass_vacuously() {
        let intent = Directives::parse([("rundeckjobid", "J1")]).interpret(None, &Map::new());
        assert!(intent.outcome.passed());
        assert!(intent.options.is_empty());

        let validated = intent.validate().unwrap();
        assert_eq!(validated.job_id, "J1");
        assert!(validated.options.is_empty());
    }

    #[test]
    fn test_header_check_requires_exact_value() {
        let directives = Directives::parse([("checkheaderauth", "secret")]);

        let ok = directives.interpret(Some(&headers(&[("auth", "secret")])), &Map::new());
        assert!(ok.outcome.headers_passed);

        let wrong = directives.interpret(Some(&headers(&[("auth", "Secret")])), &Map::new());
        assert!(!wrong.outcome.headers_passed);
        assert_eq!(wrong.failed_headers, vec!["auth".to_string()]);

        let wrong_case = directives.interpret(Some(&headers(&[("Auth", "secret")])), &Map::new());
        assert!(!wrong_case.outcome.headers_passed);

        let missing = directives.interpret(None, &Map::new());
        assert!(!missing.outcome.headers_passed);
    }

    #[test]
    fn test_all_header_checks_must_pass() {
        let directives = Directives::parse([("checkheadera", "1"), ("checkheaderb", "2")]);
        let intent = directives.interpret(Some(&headers(&[("a", "1"), ("b", "3")])), &Map::new());
        assert!(!intent.outcome.headers_passed);
        assert!(intent.outcome.body_passed);
        assert_eq!(intent.failed_headers, vec!["b".to_string()]);
    }

    #[test]
    fn test_body_check_compares_scalars_by_text() {
        let payload = body(json!({
            "ref": "refs/heads/main",
            "count": 3,
            "forced": false,
            "nothing": null,
            "repo": {"name": "x"}
        }));

        let passing = Directives::parse([
            ("checkkeyref", "refs/heads/main"),
            ("checkkeycount", "3"),
            ("checkkeyforced", "false"),
        ]);
        assert!(passing.interpret(None, &payload).outcome.body_passed);

        for (key, expected) in [
            ("checkkeyref", "refs/heads/dev"),
            ("checkkeynothing", "null"),
            ("checkkeyrepo", "x"),
            ("checkkeyabsent", ""),
        ] {
            let intent = Directives::parse([(key, expected)]).interpret(None, &payload);
            assert!(!intent.outcome.body_passed, "{key}={expected} should fail");
        }
    }

    #[test]
    fn test_body_check_does_not_coerce_values() {
        let payload = body(json!({"private": true, "n": 0, "id": 1}));

        for (key, expected, passes) in [
            ("checkkeyprivate", "true", true),
            ("checkkeyprivate", "1", false),
            ("checkkeyn", "0", true),
            ("checkkeyn", "", false),
            ("checkkeyn", "false", false),
            ("checkkeyid", "1.0", false),
            ("checkkeyid", "true", false),
        ] {
            let intent = Directives::parse([(key, expected)]).interpret(None, &payload);
            assert_eq!(intent.outcome.body_passed, passes, "{key}={expected:?}");
        }
    }

    #[test]
    fn test_pass_keys_are_a_subset_of_body() {
        let payload = body(json!({
            "user": "octocat",
            "zero": 0,
            "empty": "",
            "nil": null,
            "secret": "do not forward"
        }));
        let directives = Directives::parse([
            ("passkeyuser", ""),
            ("passkeyzero", ""),
            ("passkeyempty", ""),
            ("passkeynil", ""),
            ("passkeymissing", ""),
        ]);

        let options = directives.forwarded_options(&payload);
        assert_eq!(
            Value::Object(options),
            json!({"user": "octocat", "zero": 0, "empty": "", "nil": null})
        );
    }

    #[test]
    fn test_validate_reports_first_cause() {
        let payload = body(json!({"ref": "x"}));

        let no_job = Directives::parse([("checkheaderauth", "s")]).interpret(None, &payload);
        assert_eq!(no_job.validate(), Err(ValidationFailure::MissingJobId));

        let bad_header = Directives::parse([
            ("rundeckjobid", "J1"),
            ("checkheaderauth", "s"),
            ("checkkeyref", "y"),
        ])
        .interpret(None, &payload);
        assert_eq!(
            bad_header.validate(),
            Err(ValidationFailure::HeaderCheckFailed {
                headers: vec!["auth".to_string()]
            })
        );

        let bad_body = Directives::parse([("rundeckjobid", "J1"), ("checkkeyref", "y")])
            .interpret(None, &payload);
        let failure = bad_body.validate().unwrap_err();
        assert_eq!(
            failure,
            ValidationFailure::BodyCheckFailed {
                keys: vec!["ref".to_string()]
            }
        );
        assert_eq!(failure.to_string(), "body key checks failed for: ref");
    }
}
