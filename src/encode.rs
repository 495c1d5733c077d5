use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::{N1qlError, Result};

/// RFC 3986 query component set: everything but `A-Z a-z 0-9 - _ . ~`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes raw text for use as a query string value.
pub fn escape(text: &str) -> String {
    utf8_percent_encode(text, QUERY_COMPONENT).to_string()
}

/// Serializes `value` to compact JSON and percent-encodes the result.
///
/// `name` is only used to label the error when serialization fails.
pub fn encode<T>(name: &str, value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|source| N1qlError::Encoding {
        name: name.to_owned(),
        source,
    })?;
    Ok(escape(&json))
}

pub(crate) fn to_json_value<T>(name: &str, value: T) -> Result<serde_json::Value>
where
    T: Serialize,
{
    serde_json::to_value(value).map_err(|source| N1qlError::Encoding {
        name: name.to_owned(),
        source,
    })
}

/// Renders a duration in the service's duration syntax (`5s`, `250ms`, `10us`, `500ns`).
///
/// The coarsest unit that represents the value exactly is used.
pub(crate) fn format_duration(duration: Duration) -> String {
    let nanos = duration.subsec_nanos();
    if nanos == 0 {
        format!("{}s", duration.as_secs())
    } else if nanos % 1_000_000 == 0 {
        format!("{}ms", duration.as_millis())
    } else if nanos % 1_000 == 0 {
        format!("{}us", duration.as_micros())
    } else {
        format!("{}ns", duration.as_nanos())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use serde::ser::{Error as _, Serializer};
    use serde::Serialize;

    use super::{encode, escape, format_duration};
    use crate::N1qlError;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("not representable"))
        }
    }

    #[test]
    fn escape_keeps_unreserved_characters() {
        assert_eq!(escape("abc-XYZ_0.9~"), "abc-XYZ_0.9~");
    }

    #[test]
    fn escape_encodes_reserved_and_space() {
        assert_eq!(
            escape("SELECT * FROM default WHERE type=$1"),
            "SELECT%20%2A%20FROM%20default%20WHERE%20type%3D%241"
        );
    }

    #[test]
    fn escape_encodes_utf8_bytes() {
        assert_eq!(escape("é"), "%C3%A9");
    }

    #[test]
    fn encode_string_is_json_quoted() {
        assert_eq!(encode("p", "dog").expect("must encode"), "%22dog%22");
    }

    #[test]
    fn encode_scalars() {
        assert_eq!(encode("p", &42).expect("must encode"), "42");
        assert_eq!(encode("p", &true).expect("must encode"), "true");
        assert_eq!(encode("p", &()).expect("must encode"), "null");
    }

    #[test]
    fn encode_object() {
        let mut map = BTreeMap::new();
        map.insert("a", 1);
        assert_eq!(encode("p", &map).expect("must encode"), "%7B%22a%22%3A1%7D");
    }

    #[test]
    fn encode_reports_serialization_failure() {
        let err = encode("broken", &Unserializable).expect_err("must fail");
        match err {
            N1qlError::Encoding { name, .. } => assert_eq!(name, "broken"),
            other => panic!("expected encoding error, got {other:?}"),
        }
    }

    #[test]
    fn duration_units() {
        assert_eq!(format_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1500ms");
        assert_eq!(format_duration(Duration::from_micros(10)), "10us");
        assert_eq!(format_duration(Duration::from_nanos(1_500)), "1500ns");
    }

    #[test]
    fn sub_microsecond_duration_is_not_zero() {
        assert_eq!(format_duration(Duration::from_nanos(1)), "1ns");
        assert_eq!(format_duration(Duration::from_nanos(999)), "999ns");
    }
}
