//! Route specifier parsing.
//!
//! # Responsibilities
//! - Parse `METHOD PATH` strings from page entries
//! - Reject methods and paths the exact-match router cannot serve
//!
//! # Design Decisions
//! - Exactly two whitespace-separated tokens, anything else is malformed
//! - Paths are literal: no `{param}` captures, no `*` wildcards, no
//!   `:name` segments
//! - Only characters a client sends unencoded are allowed, so the declared
//!   path is byte-for-byte what arrives on the wire

use std::fmt;

use axum::http::Method;
use axum::routing::MethodFilter;
use thiserror::Error;

/// Punctuation allowed unencoded in a path (RFC 3986 `pchar` plus `/`).
const PATH_PUNCTUATION: &str = "-._~!$&'()+,;=:@/";

const SUPPORTED_METHODS: [Method; 7] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::HEAD,
    Method::OPTIONS,
];

/// Errors produced while parsing a route specifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteParseError {
    #[error("route '{0}' must be exactly 'METHOD PATH'")]
    Malformed(String),

    #[error("route '{route}' uses unsupported method '{method}'")]
    UnsupportedMethod { route: String, method: String },

    #[error("route '{route}' has an invalid path: {reason}")]
    InvalidPath { route: String, reason: &'static str },
}

/// A parsed (method, path) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    pub method: Method,
    pub path: String,
}

impl Route {
    pub fn parse(spec: &str) -> Result<Self, RouteParseError> {
        let mut tokens = spec.split_whitespace();
        let (Some(method), Some(path), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Err(RouteParseError::Malformed(spec.to_string()));
        };

        let method = SUPPORTED_METHODS
            .iter()
            .find(|m| m.as_str() == method)
            .cloned()
            .ok_or_else(|| RouteParseError::UnsupportedMethod {
                route: spec.to_string(),
                method: method.to_string(),
            })?;

        let invalid = |reason| RouteParseError::InvalidPath {
            route: spec.to_string(),
            reason,
        };
        if !path.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }
        if path.contains(['{', '}', '*']) {
            return Err(invalid("wildcards and captures are not supported"));
        }
        if path.split('/').any(|segment| segment.starts_with(':')) {
            return Err(invalid("segments must not start with ':'"));
        }
        if !path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PATH_PUNCTUATION.contains(c))
        {
            return Err(invalid("only unreserved ASCII characters are allowed"));
        }

        Ok(Self {
            method,
            path: path.to_string(),
        })
    }

    /// Method filter for the axum router.
    pub fn method_filter(&self) -> Option<MethodFilter> {
        MethodFilter::try_from(self.method.clone()).ok()
    }

    /// Cache lookup key, `METHOD PATH` with single-space separation.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
