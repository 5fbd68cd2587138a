//! Core VDS domain types.
//!
//! This module provides the search scope and the search strategies understood by
//! the RadiantOne VDS REST gateways.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Breadth of an LDAP search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SearchScope {
    /// The base entry only
    #[serde(rename = "base")]
    Base,
    /// Immediate children of the base entry
    #[serde(rename = "one", alias = "onelevel")]
    OneLevel,
    /// The base entry and its whole subtree
    #[default]
    #[serde(rename = "sub", alias = "subtree")]
    Subtree,
}

impl SearchScope {
    /// Returns the wire name used by the gateway.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::OneLevel => "one",
            Self::Subtree => "sub",
        }
    }
}

impl FromStr for SearchScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(Self::Base),
            "one" | "onelevel" => Ok(Self::OneLevel),
            "sub" | "subtree" => Ok(Self::Subtree),
            _ => Err(Error::InvalidRequest(format!("Unknown search scope: {s}"))),
        }
    }
}

impl std::fmt::Display for SearchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a search is sent to the gateway.
///
/// The strategies target different backend APIs and are not interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchStrategy {
    /// `GET <root>/ldap/search` with query parameters
    #[default]
    QueryParams,
    /// `POST <root>/rest/search` with a JSON body
    JsonBody,
    /// `GET /adap/<dn>?contextFilter=<filter>` on the host
    Adap,
}

impl SearchStrategy {
    /// Returns the strategy name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::QueryParams => "query-params",
            Self::JsonBody => "json-body",
            Self::Adap => "adap",
        }
    }

    /// Returns all strategies.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::QueryParams, Self::JsonBody, Self::Adap]
    }

    /// Returns true if the strategy is addressed under a discovered REST root.
    #[must_use]
    pub const fn requires_root(&self) -> bool {
        matches!(self, Self::QueryParams | Self::JsonBody)
    }
}

impl FromStr for SearchStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "query-params" | "get" => Ok(Self::QueryParams),
            "json-body" | "post" => Ok(Self::JsonBody),
            "adap" => Ok(Self::Adap),
            _ => Err(Error::InvalidRequest(format!("Unknown search strategy: {s}"))),
        }
    }
}

impl std::fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_scope_wire_names() {
        assert_eq!(SearchScope::Base.as_str(), "base");
        assert_eq!(SearchScope::OneLevel.as_str(), "one");
        assert_eq!(SearchScope::Subtree.as_str(), "sub");
        assert_eq!(SearchScope::default(), SearchScope::Subtree);
    }

    #[test]
    fn test_search_scope_from_str() {
        assert_eq!("BASE".parse::<SearchScope>().unwrap(), SearchScope::Base);
        assert_eq!("onelevel".parse::<SearchScope>().unwrap(), SearchScope::OneLevel);
        assert_eq!("subtree".parse::<SearchScope>().unwrap(), SearchScope::Subtree);
        assert!("children".parse::<SearchScope>().is_err());
    }

    #[test]
    fn test_search_scope_serialization() {
        let json = serde_json::to_string(&SearchScope::OneLevel).unwrap();
        assert_eq!(json, "\"one\"");

        let scope: SearchScope = serde_json::from_str("\"subtree\"").unwrap();
        assert_eq!(scope, SearchScope::Subtree);
    }

    #[test]
    fn test_search_strategy_from_str() {
        assert_eq!(
            "query_params".parse::<SearchStrategy>().unwrap(),
            SearchStrategy::QueryParams
        );
        assert_eq!(
            "Json-Body".parse::<SearchStrategy>().unwrap(),
            SearchStrategy::JsonBody
        );
        assert_eq!("adap".parse::<SearchStrategy>().unwrap(), SearchStrategy::Adap);

        let err = "soap".parse::<SearchStrategy>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_REQUEST");
    }

    #[test]
    fn test_search_strategy_requires_root() {
        assert!(SearchStrategy::QueryParams.requires_root());
        assert!(SearchStrategy::JsonBody.requires_root());
        assert!(!SearchStrategy::Adap.requires_root());
    }

    #[test]
    fn test_search_strategy_display_round_trips_through_from_str() {
        for strategy in SearchStrategy::all() {
            assert_eq!(
                strategy.to_string().parse::<SearchStrategy>().unwrap(),
                *strategy
            );
        }
    }
}
