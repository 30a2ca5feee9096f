use std::collections::HashMap;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::Request;
use serde_json::Value;
use tracing::{debug, warn};

use crate::handlers::http::utils::headers::get_header_value;

/// Collect the request body into a field map.
///
/// `application/json` bodies are read as a flat object; anything else is
/// treated as `application/x-www-form-urlencoded`. A JSON body that is not
/// an object yields no fields, so callers report the first missing one.
pub async fn read_form(req: Request<hyper::body::Incoming>) -> Result<HashMap<String, String>> {
    let is_json = get_header_value(req.headers(), "content-type")
        .map(|ct| ct.to_ascii_lowercase().starts_with("application/json"))
        .unwrap_or(false);

    let body = req
        .into_body()
        .collect()
        .await
        .context("Failed to read request body")?
        .to_bytes();

    Ok(parse_fields(&body, is_json))
}

pub fn parse_fields(body: &Bytes, is_json: bool) -> HashMap<String, String> {
    let fields = if is_json {
        parse_json_fields(body)
    } else {
        form_urlencoded::parse(body.as_ref())
            .into_owned()
            .collect::<HashMap<String, String>>()
    };

    debug!("Parsed {} form field(s)", fields.len());
    fields
}

fn parse_json_fields(body: &[u8]) -> HashMap<String, String> {
    let object = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            warn!("JSON body is not an object");
            return HashMap::new();
        }
        Err(e) => {
            warn!("Malformed JSON body: {}", e);
            return HashMap::new();
        }
    };

    object
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            Value::Number(n) => Some((key, n.to_string())),
            Value::Bool(b) => Some((key, b.to_string())),
            _ => None,
        })
        .collect()
}

/// Fetch a required field exactly as submitted. Presence is the only check.
pub fn required_field<'a>(fields: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    fields.get(name).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencoded_fields_are_decoded() {
        let fields = parse_fields(&Bytes::from("username=ash+ketchum&password=p%40ss"), false);
        assert_eq!(fields["username"], "ash ketchum");
        assert_eq!(fields["password"], "p@ss");
    }

    #[test]
    fn json_scalars_become_strings() {
        let fields = parse_fields(
            &Bytes::from(r#"{"name":"Mew","pokedex_number":151,"type2":null}"#),
            true,
        );
        assert_eq!(fields["name"], "Mew");
        assert_eq!(fields["pokedex_number"], "151");
        assert!(!fields.contains_key("type2"));
    }

    #[test]
    fn required_fields_keep_surrounding_whitespace() {
        let fields = parse_fields(&Bytes::from("username=+ash&password="), false);
        assert_eq!(required_field(&fields, "username"), Some(" ash"));
        assert_eq!(required_field(&fields, "password"), Some(""));
        assert_eq!(required_field(&fields, "email"), None);
    }

    #[test]
    fn malformed_json_has_no_fields() {
        assert!(parse_fields(&Bytes::from("{not json"), true).is_empty());
        assert!(parse_fields(&Bytes::from("[1,2]"), true).is_empty());
    }
}
