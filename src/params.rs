//! Typed values for the scalar query options.

/// Response format requested from the service.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Format {
    Json,
    Xml,
    Csv,
    Tsv,
}

impl Format {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Xml => "XML",
            Self::Csv => "CSV",
            Self::Tsv => "TSV",
        }
    }
}

/// Character encoding of the response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Encoding {
    Utf8,
}

impl Encoding {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
        }
    }
}

/// Compression applied to the response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Compression {
    Zip,
    Rle,
    Lzma,
    Lzo,
    None,
}

impl Compression {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zip => "ZIP",
            Self::Rle => "RLE",
            Self::Lzma => "LZMA",
            Self::Lzo => "LZO",
            Self::None => "NONE",
        }
    }
}

/// Staleness the query tolerates in the index it scans.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScanConsistency {
    /// Whatever the index holds right now.
    NotBounded,
    /// At least as fresh as the supplied scan vector.
    AtPlus,
    /// At least as fresh as the moment the request arrives.
    RequestPlus,
    /// At least as fresh as the moment each statement starts.
    StatementPlus,
}

impl ScanConsistency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotBounded => "not_bounded",
            Self::AtPlus => "at_plus",
            Self::RequestPlus => "request_plus",
            Self::StatementPlus => "statement_plus",
        }
    }
}

/// Scan vector forwarded with `at_plus` consistency.
#[derive(Clone, Debug, PartialEq)]
pub enum ScanVector {
    /// Sent as escaped text, without JSON quoting.
    Text(String),
    /// Sent as escaped JSON.
    Object(serde_json::Value),
}

impl From<String> for ScanVector {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ScanVector {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<serde_json::Value> for ScanVector {
    fn from(value: serde_json::Value) -> Self {
        Self::Object(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{Compression, Encoding, Format, ScanConsistency, ScanVector};

    #[test]
    fn wire_names() {
        assert_eq!(Format::Json.as_str(), "JSON");
        assert_eq!(Encoding::Utf8.as_str(), "UTF-8");
        assert_eq!(Compression::None.as_str(), "NONE");
        assert_eq!(ScanConsistency::RequestPlus.as_str(), "request_plus");
    }

    #[test]
    fn scan_vector_conversions() {
        assert_eq!(ScanVector::from("v1"), ScanVector::Text("v1".to_owned()));
        assert!(matches!(
            ScanVector::from(json!({"5": [1, "abc"]})),
            ScanVector::Object(_)
        ));
    }
}
