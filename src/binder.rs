use crate::error::{Error, ResultExt};
use hyper::header::CONTENT_TYPE;
use hyper::{Body, Request};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// The raw, still-stringly-typed form of a decoded `application/x-www-form-urlencoded`
/// body: every key maps to every value that appeared under it, in order.
/// A sequence-of-string field can come from either repeated fields under
/// the same name or a single comma-separated value.
pub struct FormFields(HashMap<String, Vec<String>>);

impl FormFields {
    fn parse(bytes: &[u8]) -> FormFields {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in form_urlencoded::parse(bytes) {
            map.entry(key.into_owned()).or_default().push(value.into_owned());
        }
        FormFields(map)
    }

    fn raw(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// A single scalar value, the first one present under `name`.
    pub fn get_string(&self, name: &str) -> Option<String> {
        self.raw(name).and_then(|values| values.first()).cloned()
    }

    /// `true` for `"on" | "true" | "1"`, `false` for anything else or
    /// absence.
    pub fn get_bool(&self, name: &str) -> bool {
        match self.raw(name).and_then(|values| values.first()) {
            Some(value) => matches!(value.as_str(), "on" | "true" | "1"),
            None => false,
        }
    }

    /// Parses the single value present under `name` via `FromStr`.
    pub fn get_parsed<T>(&self, name: &str) -> crate::Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.raw(name).and_then(|values| values.first()) {
            Some(value) => value
                .parse::<T>()
                .map(Some)
                .map_err(|e| Error::new(format!("field '{}': {}", name, e))),
            None => Ok(None),
        }
    }

    /// A sequence-of-string field: either repeated `name=...` occurrences,
    /// or a single comma-separated value. Repeated occurrences take
    /// priority since they are unambiguous; a lone value containing a
    /// comma is treated as a list of its comma-separated parts.
    pub fn get_strings(&self, name: &str) -> Vec<String> {
        match self.raw(name) {
            Some(values) if values.len() > 1 => values.to_vec(),
            Some(values) if values.len() == 1 => {
                if values[0].contains(',') {
                    values[0].split(',').map(|part| part.trim().to_string()).collect()
                } else {
                    values.to_vec()
                }
            }
            _ => Vec::new(),
        }
    }
}

/// Implemented by `#[derive(FromForm)]`: builds a value field by field out
/// of a decoded form body, the way `Validate` reads each field's
/// validation rules. Rust has no runtime reflection to walk struct fields
/// generically, so this is the compile-time substitute.
pub trait FromForm: Sized {
    fn from_form_fields(fields: &FormFields) -> crate::Result<Self>;
}

fn content_type_str(req: &Request<Body>) -> &str {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Decodes the full body as JSON. An empty body is a "missing body" error
/// rather than being handed to the JSON decoder.
pub(crate) async fn bind_json<T: DeserializeOwned>(req: &mut Request<Body>) -> crate::Result<T> {
    let body = std::mem::replace(req.body_mut(), Body::empty());
    let bytes = hyper::body::to_bytes(body).await.context("failed reading request body")?;

    if bytes.is_empty() {
        return Err(Error::new("missing request body"));
    }

    serde_json::from_slice(&bytes).context("invalid JSON body")
}

pub(crate) async fn bind_form<T: FromForm>(req: &mut Request<Body>) -> crate::Result<T> {
    let body = std::mem::replace(req.body_mut(), Body::empty());
    let bytes = hyper::body::to_bytes(body).await.context("failed reading request body")?;
    let fields = FormFields::parse(&bytes);
    T::from_form_fields(&fields)
}

/// Inspects `Content-Type` and dispatches to JSON or form decoding. Any
/// other content type is an unsupported-content-type error.
pub(crate) async fn bind<T: DeserializeOwned + FromForm>(req: &mut Request<Body>) -> crate::Result<T> {
    let content_type = content_type_str(req).to_string();

    if content_type.starts_with("application/json") {
        bind_json(req).await
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        bind_form(req).await
    } else {
        Err(Error::new(format!("unsupported content type '{}'", content_type)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_and_comma_separated_value_agree() {
        let repeated = FormFields::parse(b"tag=a&tag=b&tag=c");
        let joined = FormFields::parse(b"tag=a,b,c");
        assert_eq!(repeated.get_strings("tag"), vec!["a", "b", "c"]);
        assert_eq!(joined.get_strings("tag"), vec!["a", "b", "c"]);
    }

    #[test]
    fn bool_field_accepts_on_true_and_1_only() {
        assert!(FormFields::parse(b"subscribed=on").get_bool("subscribed"));
        assert!(FormFields::parse(b"subscribed=true").get_bool("subscribed"));
        assert!(FormFields::parse(b"subscribed=1").get_bool("subscribed"));
        assert!(!FormFields::parse(b"subscribed=nope").get_bool("subscribed"));
        assert!(!FormFields::parse(b"").get_bool("subscribed"));
    }

    #[tokio::test]
    async fn json_binding_rejects_empty_body() {
        #[derive(serde::Deserialize)]
        struct Nothing {}

        let mut req = Request::new(Body::empty());
        let err = bind_json::<Nothing>(&mut req).await.unwrap_err();
        assert!(err.to_string().contains("missing request body"));
    }

    #[tokio::test]
    async fn bind_dispatches_on_content_type() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Person {
            name: String,
        }
        impl FromForm for Person {
            fn from_form_fields(fields: &FormFields) -> crate::Result<Self> {
                Ok(Person {
                    name: fields.get_string("name").unwrap_or_default(),
                })
            }
        }

        let mut req = Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"ada"}"#))
            .unwrap();
        let person: Person = bind(&mut req).await.unwrap();
        assert_eq!(person, Person { name: "ada".into() });

        let mut req = Request::builder()
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("name=grace"))
            .unwrap();
        let person: Person = bind(&mut req).await.unwrap();
        assert_eq!(person, Person { name: "grace".into() });

        let mut req = Request::builder()
            .header(CONTENT_TYPE, "text/plain")
            .body(Body::from("name=nope"))
            .unwrap();
        assert!(bind::<Person>(&mut req).await.is_err());
    }
}
