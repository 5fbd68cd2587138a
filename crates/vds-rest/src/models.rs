//! Request models for the VDS REST search endpoints.

use serde::Serialize;
use validator::Validate;
use vds_core::query::QueryParams;
use vds_core::{Error, SearchScope};

use crate::Result;

/// Probe paths tried under every REST root, in order.
pub const PROBE_PATHS: &[&str] = &["/ping", "/server/info"];

/// Filter used when none is given.
pub const DEFAULT_FILTER: &str = "(objectClass=*)";

/// Size limit used when none is given.
pub const DEFAULT_SIZE_LIMIT: u32 = 100;

/// A single liveness probe: a REST root and a path below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeDescriptor<'a> {
    /// REST root prefix being probed
    pub root: &'a str,
    /// Probe path appended to the root
    pub path: &'static str,
}

impl<'a> ProbeDescriptor<'a> {
    /// Ordered, lazily evaluated probe sequence for the given roots.
    ///
    /// Roots keep their configured order; each root is probed with every entry of
    /// [`PROBE_PATHS`] before moving on to the next root.
    pub fn sequence(roots: &'a [String]) -> impl Iterator<Item = ProbeDescriptor<'a>> + 'a {
        roots.iter().flat_map(|root| {
            PROBE_PATHS.iter().map(move |path| ProbeDescriptor {
                root: root.as_str(),
                path: *path,
            })
        })
    }
}

impl std::fmt::Display for ProbeDescriptor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.root, self.path)
    }
}

/// LDAP-style search issued through the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct SearchRequest {
    /// Base distinguished name
    #[validate(length(min = 1))]
    pub base_dn: String,

    /// LDAP filter expression
    #[validate(length(min = 1))]
    pub filter: String,

    /// Requested attributes; empty means the server default
    pub attributes: Vec<String>,

    /// Search breadth
    pub scope: SearchScope,

    /// Maximum number of entries returned
    pub size_limit: u32,

    /// Maximum search time in seconds (0 means no limit)
    pub time_limit: u32,
}

impl SearchRequest {
    /// Create a subtree search for all objects below `base_dn`.
    #[must_use]
    pub fn new(base_dn: impl Into<String>) -> Self {
        Self {
            base_dn: base_dn.into(),
            filter: DEFAULT_FILTER.to_string(),
            attributes: Vec::new(),
            scope: SearchScope::default(),
            size_limit: DEFAULT_SIZE_LIMIT,
            time_limit: 0,
        }
    }

    /// Set the filter expression.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Set the requested attributes. Duplicates and blank names are dropped.
    #[must_use]
    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.clear();
        for attribute in attributes {
            let attribute = attribute.into().trim().to_string();
            if !attribute.is_empty() && !self.attributes.contains(&attribute) {
                self.attributes.push(attribute);
            }
        }
        self
    }

    /// Set the search scope.
    #[must_use]
    pub const fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the size limit.
    #[must_use]
    pub const fn with_size_limit(mut self, limit: u32) -> Self {
        self.size_limit = limit;
        self
    }

    /// Set the time limit in seconds.
    #[must_use]
    pub const fn with_time_limit(mut self, limit: u32) -> Self {
        self.time_limit = limit;
        self
    }

    /// Check that the base DN and filter are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] when a required field is empty.
    pub fn ensure_valid(&self) -> Result<()> {
        self.validate()
            .map_err(|e| Error::InvalidRequest(format!("Invalid search request: {e}")))
    }

    /// Query parameters for `GET <root>/ldap/search`.
    #[must_use]
    pub fn to_query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push("base", &self.base_dn);
        params.push("scope", self.scope);
        params.push("filter", &self.filter);
        params.push("sizeLimit", self.size_limit);
        params.push("timeLimit", self.time_limit);
        params.push_joined("attributes", &self.attributes, ",");
        params
    }

    /// JSON body for `POST <root>/rest/search`.
    #[must_use]
    pub fn to_json_body(&self) -> JsonSearchBody<'_> {
        JsonSearchBody {
            dn: &self.base_dn,
            scope: self.scope,
            filter: &self.filter,
            attributes: &self.attributes,
        }
    }

    /// Query parameters for `GET /adap/<dn>`.
    #[must_use]
    pub fn to_adap_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push("contextFilter", &self.filter);
        params
    }
}

/// Body of a JSON search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonSearchBody<'a> {
    /// Base distinguished name
    pub dn: &'a str,
    /// Search breadth
    pub scope: SearchScope,
    /// LDAP filter expression
    pub filter: &'a str,
    /// Requested attributes
    pub attributes: &'a [String],
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn probe_sequence_is_root_major() {
        let roots = vec!["/vds/rest".to_string(), "/rest".to_string()];
        let probes: Vec<String> = ProbeDescriptor::sequence(&roots)
            .map(|probe| probe.to_string())
            .collect();
        assert_eq!(
            probes,
            vec![
                "/vds/rest/ping",
                "/vds/rest/server/info",
                "/rest/ping",
                "/rest/server/info",
            ]
        );
    }

    #[test]
    fn probe_sequence_empty_roots() {
        let roots: Vec<String> = Vec::new();
        assert_eq!(ProbeDescriptor::sequence(&roots).count(), 0);
    }

    #[test]
    fn search_request_defaults() {
        let request = SearchRequest::new("ou=people,dc=example,dc=com");
        assert_eq!(request.filter, DEFAULT_FILTER);
        assert_eq!(request.scope, SearchScope::Subtree);
        assert_eq!(request.size_limit, DEFAULT_SIZE_LIMIT);
        assert_eq!(request.time_limit, 0);
        assert!(request.attributes.is_empty());
    }

    #[test]
    fn with_attributes_dedupes_and_trims() {
        let request = SearchRequest::new("dc=example,dc=com")
            .with_attributes(["cn", " mail ", "cn", "", "uid"]);
        assert_eq!(request.attributes, vec!["cn", "mail", "uid"]);
    }

    #[test]
    fn ensure_valid_rejects_empty_base_dn() {
        let err = SearchRequest::new("").ensure_valid().unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(SearchRequest::new("dc=example,dc=com").ensure_valid().is_ok());
    }

    #[test]
    fn query_params_include_attributes_only_when_present() {
        let request = SearchRequest::new("ou=targetou,dc=acme,dc=com")
            .with_filter("(cn=*)")
            .with_size_limit(25);
        let pairs = request.to_query_params().into_pairs();
        assert_eq!(
            pairs,
            vec![
                ("base", "ou=targetou,dc=acme,dc=com".to_string()),
                ("scope", "sub".to_string()),
                ("filter", "(cn=*)".to_string()),
                ("sizeLimit", "25".to_string()),
                ("timeLimit", "0".to_string()),
            ]
        );

        let pairs = request
            .with_attributes(["cn", "mail", "uid"])
            .to_query_params()
            .into_pairs();
        assert_eq!(pairs.last(), Some(&("attributes", "cn,mail,uid".to_string())));
    }

    #[test]
    fn json_body_shape() {
        let request = SearchRequest::new("dc=example,dc=com")
            .with_filter("(uid=*)")
            .with_scope(SearchScope::OneLevel)
            .with_attributes(["*"]);
        let body = serde_json::to_value(request.to_json_body()).unwrap();
        assert_eq!(
            body,
            json!({
                "dn": "dc=example,dc=com",
                "scope": "one",
                "filter": "(uid=*)",
                "attributes": ["*"]
            })
        );
    }

    #[test]
    fn adap_params_carry_filter() {
        let request = SearchRequest::new("o=companydirectory").with_filter("(uid=*)");
        assert_eq!(
            request.to_adap_params().into_pairs(),
            vec![("contextFilter", "(uid=*)".to_string())]
        );
    }
}
