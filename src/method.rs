use std::fmt;

/// HTTP verb used to submit a query.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }

    /// Infers the verb from statement text.
    ///
    /// Anything containing `select` in any letter case goes out as GET,
    /// everything else as POST. This is a substring test, so a literal such
    /// as `'preselected'` inside a mutation also yields GET.
    pub fn resolve(text: &str) -> Self {
        if text.to_lowercase().contains("select") {
            Self::Get
        } else {
            Self::Post
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HttpMethod;

    #[test]
    fn select_in_any_case_is_get() {
        assert_eq!(HttpMethod::resolve("SELECT 1"), HttpMethod::Get);
        assert_eq!(HttpMethod::resolve("select 1"), HttpMethod::Get);
        assert_eq!(HttpMethod::resolve("SeLeCt 1"), HttpMethod::Get);
    }

    #[test]
    fn other_statements_are_post() {
        assert_eq!(
            HttpMethod::resolve("CREATE PRIMARY INDEX ON `default`"),
            HttpMethod::Post
        );
        assert_eq!(HttpMethod::resolve(""), HttpMethod::Post);
    }

    #[test]
    fn select_inside_literal_still_resolves_to_get() {
        assert_eq!(
            HttpMethod::resolve("UPDATE default SET note = 'preselected'"),
            HttpMethod::Get
        );
    }

    #[test]
    fn converts_to_reqwest_method() {
        assert_eq!(reqwest::Method::from(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(reqwest::Method::from(HttpMethod::Post), reqwest::Method::POST);
    }
}
