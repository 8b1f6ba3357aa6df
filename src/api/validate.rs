use serde_json::{Map, Value};
use tracing::debug;

use crate::config::ScrapeOverrides;
use crate::error::{AppError, Result};

/// Request fields that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    pub url: String,
    pub prompt: Option<String>,
    pub overrides: ScrapeOverrides,
}

/// Decodes a raw request body. A missing body counts as `{}`.
pub fn decode_body(body: Option<&[u8]>) -> Result<Map<String, Value>> {
    let Some(bytes) = body else {
        return Ok(Map::new());
    };

    match serde_json::from_slice::<Value>(bytes).map_err(AppError::MalformedBody)? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::TypeMismatch {
            field: "Request body",
            expected: "a JSON object",
        }),
    }
}

pub fn validate_input(body: &Map<String, Value>) -> Result<ValidatedInput> {
    let url = match body.get("url") {
        None | Some(Value::Null) => return Err(AppError::MissingField("URL")),
        Some(Value::String(url)) if url.is_empty() => {
            return Err(AppError::MissingField("URL"));
        }
        Some(Value::String(url)) => url.clone(),
        Some(_) => {
            return Err(AppError::TypeMismatch {
                field: "URL",
                expected: "a string",
            });
        }
    };

    let prompt = match body.get("prompt") {
        None | Some(Value::Null) => None,
        Some(Value::String(prompt)) => Some(prompt.clone()),
        Some(_) => {
            return Err(AppError::TypeMismatch {
                field: "Prompt",
                expected: "a string if provided",
            });
        }
    };

    let overrides = ScrapeOverrides {
        max_depth: coerce_limit("max_depth", body.get("max_depth"))?,
        max_pages: coerce_limit("max_pages", body.get("max_pages"))?,
    };

    Ok(ValidatedInput {
        url,
        prompt,
        overrides,
    })
}

/// Integer coercion for the scraping limit overrides.
///
/// Accepts non-negative integers, integral floats and numeric strings.
fn coerce_limit(field: &'static str, value: Option<&Value>) -> Result<Option<u32>> {
    let mismatch = AppError::TypeMismatch {
        field,
        expected: "a non-negative integer",
    };

    let limit = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => match (n.as_u64(), n.as_f64()) {
            (Some(n), _) => u32::try_from(n).ok(),
            (None, Some(f)) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => {
                Some(f as u32)
            }
            _ => None,
        },
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        Some(_) => None,
    };

    match limit {
        Some(limit) => {
            debug!(field, limit, "Applying scraping limit override");
            Ok(Some(limit))
        }
        None => Err(mismatch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn validate(value: Value) -> Result<ValidatedInput> {
        validate_input(&body(value))
    }

    #[test]
    fn test_valid_minimal_body() {
        let input = validate(json!({"url": "https://example.com"})).unwrap();
        assert_eq!(input.url, "https://example.com");
        assert_eq!(input.prompt, None);
        assert_eq!(input.overrides, ScrapeOverrides::default());
    }

    #[test]
    fn test_missing_url() {
        for value in [json!({}), json!({"url": null}), json!({"url": ""}), json!({"prompt": "hi"})] {
            let err = validate(value).unwrap_err();
            assert!(matches!(err, AppError::MissingField("URL")));
            assert_eq!(err.to_string(), "URL is required");
        }
    }

    #[test]
    fn test_url_type_mismatch() {
        for url in [json!(42), json!(0), json!(["https://example.com"]), json!({}), json!(true)] {
            let err = validate(json!({ "url": url })).unwrap_err();
            assert!(matches!(err, AppError::TypeMismatch { field: "URL", .. }));
            assert_eq!(err.to_string(), "URL must be a string");
        }
    }

    #[test]
    fn test_prompt_type_mismatch() {
        for prompt in [json!(1), json!(false), json!(["what"]), json!({"q": "what"})] {
            let err = validate(json!({"url": "https://example.com", "prompt": prompt})).unwrap_err();
            assert_eq!(err.to_string(), "Prompt must be a string if provided");
        }
    }

    #[test]
    fn test_prompt_kept_and_null_ignored() {
        let input =
            validate(json!({"url": "https://example.com", "prompt": "List the authors"})).unwrap();
        assert_eq!(input.prompt.as_deref(), Some("List the authors"));

        let input = validate(json!({"url": "https://example.com", "prompt": null})).unwrap();
        assert_eq!(input.prompt, None);
    }

    #[test]
    fn test_limit_coercion() {
        let input = validate(json!({
            "url": "https://example.com",
            "max_depth": "5",
            "max_pages": 3
        }))
        .unwrap();
        assert_eq!(input.overrides.max_depth, Some(5));
        assert_eq!(input.overrides.max_pages, Some(3));

        let input = validate(json!({
            "url": "https://example.com",
            "max_depth": " 7 ",
            "max_pages": 4.0
        }))
        .unwrap();
        assert_eq!(input.overrides.max_depth, Some(7));
        assert_eq!(input.overrides.max_pages, Some(4));

        let input = validate(json!({"url": "https://example.com", "max_depth": 0})).unwrap();
        assert_eq!(input.overrides.max_depth, Some(0));
    }

    #[test]
    fn test_limit_coercion_failures() {
        for value in [
            json!("abc"),
            json!(""),
            json!(-1),
            json!(2.5),
            json!(true),
            json!([3]),
            json!(u64::from(u32::MAX) + 1),
        ] {
            let err = validate(json!({"url": "https://example.com", "max_pages": value})).unwrap_err();
            assert_eq!(err.to_string(), "max_pages must be a non-negative integer");
        }
    }

    #[test]
    fn test_decode_body() {
        assert!(decode_body(None).unwrap().is_empty());
        assert_eq!(
            decode_body(Some(&br#"{"url": "https://example.com"}"#[..])).unwrap()["url"],
            "https://example.com"
        );
        assert!(matches!(
            decode_body(Some(&br#"{"url":"#[..])),
            Err(AppError::MalformedBody(_))
        ));
        assert!(matches!(decode_body(Some(&b""[..])), Err(AppError::MalformedBody(_))));

        let err = decode_body(Some(&b"[1, 2]"[..])).unwrap_err();
        assert_eq!(err.to_string(), "Request body must be a JSON object");
    }
}
