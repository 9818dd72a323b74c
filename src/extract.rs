use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// PathId
///
/// The raw text of a single `{id}` path segment. Parsing is deferred to
/// [`PathId::integer`] so handlers decide where in their validation order an
/// invalid id is reported.
#[derive(Debug, Clone)]
pub struct PathId(pub String);

impl PathId {
    pub fn integer(&self) -> Result<i32, ApiError> {
        parse_integer(&self.0)
    }
}

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::InvalidInput)?;
        Ok(Self(raw))
    }
}

/// JsonObject
///
/// The request body as a JSON object. An absent or empty body reads as an
/// empty object so that "no body" and "missing fields" report the same way.
/// Anything that is not a JSON object is a malformed body.
#[derive(Debug, Clone, Default)]
pub struct JsonObject(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::MalformedBody)?;
        parse_object(&bytes).map(Self)
    }
}

impl JsonObject {
    /// A required integer field, following the database's integer input rules:
    /// JSON integers and numeric strings are accepted.
    pub fn integer(&self, field: &str) -> Result<i32, ApiError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Err(ApiError::MalformedBody),
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_i64() {
                    i32::try_from(v).map_err(|_| ApiError::OutOfRange)
                } else if n.is_u64() {
                    Err(ApiError::OutOfRange)
                } else if let Some(f) = n
                    .as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                {
                    // Whole numbers written as floats, and integer literals beyond u64.
                    if f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX) {
                        Ok(f as i32)
                    } else {
                        Err(ApiError::OutOfRange)
                    }
                } else {
                    Err(ApiError::InvalidInput)
                }
            }
            Some(Value::String(s)) => parse_integer(s),
            Some(_) => Err(ApiError::InvalidInput),
        }
    }

    /// A required, non-empty text field. Numbers and booleans are taken in
    /// their text form, as the database would store them.
    pub fn text(&self, field: &str) -> Result<String, ApiError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Err(ApiError::MalformedBody),
            Some(Value::String(s)) if s.is_empty() => Err(ApiError::MalformedBody),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::Bool(b)) => Ok(b.to_string()),
            Some(Value::Array(_) | Value::Object(_)) => Err(ApiError::InvalidInput),
        }
    }
}

fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ApiError::MalformedBody),
    }
}

/// parse_integer
///
/// Parses a 32-bit integer the way PostgreSQL's `integer` input does:
/// surrounding whitespace and a leading sign are allowed, then digits only.
/// Well-formed numbers that do not fit report `OutOfRange`, everything else
/// `InvalidInput`.
pub fn parse_integer(raw: &str) -> Result<i32, ApiError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::InvalidInput);
    }

    trimmed.parse::<i32>().map_err(|_| ApiError::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => JsonObject(map),
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn parses_plain_and_signed_integers() {
        assert_eq!(parse_integer("10").unwrap(), 10);
        assert_eq!(parse_integer("0").unwrap(), 0);
        assert_eq!(parse_integer("-7").unwrap(), -7);
        assert_eq!(parse_integer("+7").unwrap(), 7);
        assert_eq!(parse_integer(" 42 ").unwrap(), 42);
        assert_eq!(parse_integer("2147483647").unwrap(), i32::MAX);
    }

    #[test]
    fn non_numeric_text_is_invalid_input() {
        for raw in ["pineapple", "", "-", "1.5", "12abc", "0x10", "1e3"] {
            assert!(
                matches!(parse_integer(raw), Err(ApiError::InvalidInput)),
                "{raw:?} should be invalid input"
            );
        }
    }

    #[test]
    fn oversized_numbers_are_out_of_range() {
        for raw in [
            "9332879283",
            "23423421123",
            "2147483648",
            "-2147483649",
            "99999999999999999999999",
        ] {
            assert!(
                matches!(parse_integer(raw), Err(ApiError::OutOfRange)),
                "{raw:?} should be out of range"
            );
        }
    }

    #[test]
    fn empty_body_reads_as_empty_object() {
        assert!(parse_object(b"").unwrap().is_empty());
        assert!(parse_object(b"  \n").unwrap().is_empty());
        assert!(matches!(parse_object(b"[1,2]"), Err(ApiError::MalformedBody)));
        assert!(matches!(parse_object(b"{not json"), Err(ApiError::MalformedBody)));
    }

    #[test]
    fn integer_field_rules() {
        let body = object(json!({
            "ok": -100,
            "numeric_text": "5",
            "word": "pineapple",
            "fraction": 1.5,
            "flag": true,
            "huge": 5_000_000_000i64,
            "nothing": null,
        }));

        assert_eq!(body.integer("ok").unwrap(), -100);
        assert_eq!(body.integer("numeric_text").unwrap(), 5);
        assert!(matches!(body.integer("word"), Err(ApiError::InvalidInput)));
        assert!(matches!(body.integer("fraction"), Err(ApiError::InvalidInput)));
        assert!(matches!(body.integer("flag"), Err(ApiError::InvalidInput)));
        assert!(matches!(body.integer("huge"), Err(ApiError::OutOfRange)));
        assert!(matches!(body.integer("nothing"), Err(ApiError::MalformedBody)));
        assert!(matches!(body.integer("absent"), Err(ApiError::MalformedBody)));
    }

    #[test]
    fn integer_field_beyond_64_bits_is_out_of_range() {
        let body = object(
            serde_json::from_str(concat!(
                r#"{"up": 99999999999999999999, "down": -99999999999999999999,"#,
                r#" "whole": 3.0, "half": 2.5}"#,
            ))
            .unwrap(),
        );

        assert!(matches!(body.integer("up"), Err(ApiError::OutOfRange)));
        assert!(matches!(body.integer("down"), Err(ApiError::OutOfRange)));
        assert_eq!(body.integer("whole").unwrap(), 3);
        assert!(matches!(body.integer("half"), Err(ApiError::InvalidInput)));
    }

    #[test]
    fn text_field_rules() {
        let body = object(json!({
            "username": "butter_bridge",
            "number": 5,
            "empty": "",
            "list": ["a"],
        }));

        assert_eq!(body.text("username").unwrap(), "butter_bridge");
        assert_eq!(body.text("number").unwrap(), "5");
        assert!(matches!(body.text("empty"), Err(ApiError::MalformedBody)));
        assert!(matches!(body.text("absent"), Err(ApiError::MalformedBody)));
        assert!(matches!(body.text("list"), Err(ApiError::InvalidInput)));
    }
}
