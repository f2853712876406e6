//! Query-string builders for the Table API.
//!
//! [`EncodedQuery`] assembles a `sysparm_query` value (terms joined by
//! `^`), and [`TableQuery`] carries the remaining `sysparm_*` parameters.

/// A ServiceNow encoded query under construction.
///
/// Terms are ANDed together with `^` in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedQuery {
    terms: Vec<String>,
}

impl EncodedQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `field=value`.
    pub fn equals(mut self, field: &str, value: impl AsRef<str>) -> Self {
        self.terms.push(format!("{}={}", field, value.as_ref()));
        self
    }

    /// Adds `field=value` when a value is given.
    pub fn equals_opt(self, field: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.equals(field, v),
            None => self,
        }
    }

    /// Adds `field=true|false` when a flag is given.
    pub fn flag(self, field: &str, value: Option<bool>) -> Self {
        match value {
            Some(v) => self.equals(field, if v { "true" } else { "false" }),
            None => self,
        }
    }

    /// Adds `fieldLIKEneedle` when a needle is given.
    pub fn contains(mut self, field: &str, needle: Option<&str>) -> Self {
        if let Some(n) = needle {
            self.terms.push(format!("{}LIKE{}", field, n));
        }
        self
    }

    /// Adds `aLIKEn^ORbLIKEn...` across several fields when a needle is given.
    pub fn contains_any(mut self, fields: &[&str], needle: Option<&str>) -> Self {
        if let Some(n) = needle {
            let term = fields
                .iter()
                .map(|f| format!("{}LIKE{}", f, n))
                .collect::<Vec<_>>()
                .join("^OR");
            if !term.is_empty() {
                self.terms.push(term);
            }
        }
        self
    }

    /// Appends a caller-supplied encoded query fragment verbatim.
    pub fn raw(mut self, fragment: Option<&str>) -> Self {
        if let Some(f) = fragment.map(str::trim).filter(|f| !f.is_empty()) {
            self.terms.push(f.to_string());
        }
        self
    }

    /// Returns true if no terms were added.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Joins the terms with `^`, or `None` when empty.
    pub fn build(&self) -> Option<String> {
        if self.terms.is_empty() {
            None
        } else {
            Some(self.terms.join("^"))
        }
    }
}

/// Parameters for a Table API read.
///
/// Use the builder methods to construct the query.
#[derive(Debug, Clone, Default)]
pub struct TableQuery {
    limit: Option<u32>,
    offset: Option<u32>,
    query: Option<String>,
    fields: Vec<String>,
    display_value: Option<bool>,
    exclude_reference_link: bool,
}

impl TableQuery {
    /// Creates empty parameters (server defaults apply).
    pub fn new() -> Self {
        Self::default()
    }

    /// Query used by single-record and list tools: display values, no
    /// reference links, and only the listed fields.
    pub fn display(fields: &[&str]) -> Self {
        Self::new()
            .with_fields(fields)
            .with_display_value(true)
            .excluding_reference_links()
    }

    /// Sets `sysparm_limit`.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets `sysparm_offset`.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets `sysparm_query` from a builder; an empty builder clears it.
    pub fn with_query(mut self, query: &EncodedQuery) -> Self {
        self.query = query.build();
        self
    }

    /// Restricts the returned columns (`sysparm_fields`).
    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Sets `sysparm_display_value`.
    pub fn with_display_value(mut self, display: bool) -> Self {
        self.display_value = Some(display);
        self
    }

    /// Sets `sysparm_exclude_reference_link=true`.
    pub fn excluding_reference_links(mut self) -> Self {
        self.exclude_reference_link = true;
        self
    }

    /// Converts the parameters into query-string pairs.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(query) = &self.query {
            pairs.push(("sysparm_query", query.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("sysparm_limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("sysparm_offset", offset.to_string()));
        }
        if let Some(display) = self.display_value {
            pairs.push(("sysparm_display_value", display.to_string()));
        }
        if self.exclude_reference_link {
            pairs.push(("sysparm_exclude_reference_link", "true".to_string()));
        }
        if !self.fields.is_empty() {
            pairs.push(("sysparm_fields", self.fields.join(",")));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn value_of<'a>(pairs: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_empty_query_builds_none() {
        assert_eq!(EncodedQuery::new().build(), None);
        assert!(EncodedQuery::new().flag("active", None).is_empty());
    }

    #[test]
    fn test_terms_join_with_caret() {
        let query = EncodedQuery::new()
            .equals("test", "abc")
            .flag("active", Some(false))
            .contains_any(&["display_name", "notes"], Some("login"));
        assert_eq!(
            query.build().unwrap(),
            "test=abc^active=false^display_nameLIKElogin^ORnotesLIKElogin"
        );
    }

    #[test]
    fn test_raw_fragment_skips_blank() {
        let query = EncodedQuery::new().raw(Some("  ")).raw(Some("ORDERBYorder"));
        assert_eq!(query.build().unwrap(), "ORDERBYorder");
    }

    #[test]
    fn test_table_query_pairs() {
        let query = TableQuery::display(&["sys_id", "name"])
            .with_limit(25)
            .with_offset(50)
            .with_query(&EncodedQuery::new().equals("active", "true"));
        let pairs = query.to_pairs();
        assert_eq!(value_of(&pairs, "sysparm_limit"), Some("25"));
        assert_eq!(value_of(&pairs, "sysparm_offset"), Some("50"));
        assert_eq!(value_of(&pairs, "sysparm_query"), Some("active=true"));
        assert_eq!(value_of(&pairs, "sysparm_fields"), Some("sys_id,name"));
        assert_eq!(value_of(&pairs, "sysparm_display_value"), Some("true"));
        assert_eq!(
            value_of(&pairs, "sysparm_exclude_reference_link"),
            Some("true")
        );
    }

    #[test]
    fn test_table_query_defaults_are_empty() {
        assert!(TableQuery::new().to_pairs().is_empty());
    }
}
