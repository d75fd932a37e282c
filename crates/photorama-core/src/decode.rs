//! Flickr photo-list response decoder.
//!
//! Expects a document shaped like
//! `{ "photos": { "photo": [ { "id", "title", "datetaken", "url_h", ... } ] } }`.
//!
//! Elements are decoded independently. An element missing a required field,
//! carrying a non-string value, an unparseable URL, or a date not in
//! [`DATE_TAKEN_FORMAT`] is skipped. The batch only fails when the envelope
//! is wrong, or when a non-empty list yields no photos at all.

use chrono::NaiveDateTime;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::models::NewPhoto;

/// Format of Flickr's `datetaken` field.
pub const DATE_TAKEN_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Payload could not be turned into photos.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Wrong shape, or every element of a non-empty list was unusable.
    #[error("malformed photo list: {0}")]
    Malformed(&'static str),
    /// Not JSON at all.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode a raw response payload into photos, in payload order.
///
/// An empty `photo` list is a valid, empty result.
///
/// # Errors
///
/// - [`DecodeError::Json`] if the payload does not parse as JSON.
/// - [`DecodeError::Malformed`] if `photos.photo` is missing or not an
///   array of objects, or if it is non-empty and none of its elements
///   decode.
pub fn decode_photos(payload: &[u8]) -> Result<Vec<NewPhoto>, DecodeError> {
    let json: Value = serde_json::from_slice(payload)?;

    let elements = json
        .get("photos")
        .and_then(|p| p.get("photo"))
        .and_then(|p| p.as_array())
        .ok_or(DecodeError::Malformed("missing photos.photo array"))?;

    let mut photos = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        let Some(object) = element.as_object() else {
            return Err(DecodeError::Malformed("photos.photo contains a non-object"));
        };
        match decode_photo(object) {
            Ok(photo) => photos.push(photo),
            Err(reason) => tracing::debug!(index, reason, "skipping photo element"),
        }
    }

    if photos.is_empty() && !elements.is_empty() {
        return Err(DecodeError::Malformed("no photo element could be decoded"));
    }

    Ok(photos)
}

fn decode_photo(json: &serde_json::Map<String, Value>) -> Result<NewPhoto, &'static str> {
    let field = |name: &'static str| json.get(name).and_then(Value::as_str);

    let photo_id = field("id").ok_or("missing id")?;
    if photo_id.is_empty() {
        return Err("empty id");
    }
    let title = field("title").ok_or("missing title")?;
    let date_taken = field("datetaken").ok_or("missing datetaken")?;
    let url = field("url_h").ok_or("missing url_h")?;

    let remote_url = Url::parse(url).map_err(|_| "invalid url_h")?;
    let date_taken = NaiveDateTime::parse_from_str(date_taken, DATE_TAKEN_FORMAT)
        .map_err(|_| "invalid datetaken")?;

    Ok(NewPhoto {
        photo_id: photo_id.to_string(),
        title: title.to_string(),
        remote_url,
        date_taken,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn element(id: &str, url_h: Option<&str>) -> Value {
        let mut obj = serde_json::json!({
            "id": id,
            "title": format!("Photo {id}"),
            "datetaken": "2020-01-01 00:00:00",
        });
        if let Some(url) = url_h {
            obj["url_h"] = Value::String(url.to_string());
        }
        obj
    }

    fn payload(elements: Vec<Value>) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({ "photos": { "photo": elements } })).unwrap()
    }

    #[test]
    fn decodes_single_photo() {
        let body = br#"{"photos":{"photo":[{"id":"1","title":"A","datetaken":"2020-01-01 00:00:00","url_h":"http://x/a.jpg"}]}}"#;
        let photos = decode_photos(body).unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].photo_id, "1");
        assert_eq!(photos[0].title, "A");
        assert_eq!(photos[0].remote_url.as_str(), "http://x/a.jpg");
        assert_eq!(
            photos[0].date_taken,
            NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn empty_list_is_empty_success() {
        let photos = decode_photos(br#"{"photos":{"photo":[]}}"#).unwrap();
        assert!(photos.is_empty());
    }

    #[test]
    fn wrong_envelope_is_malformed() {
        assert!(matches!(
            decode_photos(br#"{"foo":1}"#),
            Err(DecodeError::Malformed(_))
        ));
        assert!(matches!(
            decode_photos(br#"{"photos":{"photo":{"id":"1"}}}"#),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn non_json_is_json_error() {
        assert!(matches!(
            decode_photos(b"jsonFlickrApi({})"),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn skips_elements_missing_url() {
        let body = payload(vec![
            element("1", Some("http://x/1.jpg")),
            element("2", None),
            element("3", Some("http://x/3.jpg")),
            element("4", None),
            element("5", Some("http://x/5.jpg")),
        ]);
        let ids: Vec<String> = decode_photos(&body)
            .unwrap()
            .into_iter()
            .map(|p| p.photo_id)
            .collect();
        assert_eq!(ids, vec!["1", "3", "5"]);
    }

    #[test]
    fn all_bad_elements_is_malformed() {
        let body = payload(vec![
            element("1", None),
            element("2", None),
            element("3", None),
        ]);
        assert!(matches!(
            decode_photos(&body),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn skips_bad_dates_numeric_ids_and_bad_urls() {
        let mut bad_date = element("1", Some("http://x/1.jpg"));
        bad_date["datetaken"] = Value::String("2020-01-01T00:00:00Z".into());
        let mut numeric_id = element("2", Some("http://x/2.jpg"));
        numeric_id["id"] = serde_json::json!(2);
        let bad_url = element("3", Some("not a url"));
        let good = element("4", Some("http://x/4.jpg"));

        let photos = decode_photos(&payload(vec![bad_date, numeric_id, bad_url, good])).unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].photo_id, "4");
    }

    #[test]
    fn keeps_duplicates_in_payload_order() {
        let body = payload(vec![
            element("7", Some("http://x/first.jpg")),
            element("7", Some("http://x/second.jpg")),
        ]);
        let photos = decode_photos(&body).unwrap();
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].remote_url.as_str(), "http://x/first.jpg");
    }
}
