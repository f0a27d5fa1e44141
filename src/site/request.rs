//! Transport-neutral request and response values.

use std::fmt;

use crate::utils::mime::types;

use super::route::normalize_request_path;

/// Body of the "not found" response.
pub const NOT_FOUND_BODY: &str = "404 - No such page";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Options,
    Post,
    Put,
    Patch,
    Delete,
    Other,
}

impl Method {
    pub fn parse(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            _ => Self::Other,
        }
    }

    /// GET, HEAD and OPTIONS: the only methods an asset server answers.
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Options)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Other => "OTHER",
        })
    }
}

/// Named route parameters supplied by a surrounding router
/// (e.g. `/:file*` gives `file` plus a wildcard remainder).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    pub file: String,
    pub rest: String,
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Raw request target, possibly percent-encoded and with a query string.
    pub path: String,
    pub params: Option<RouteParams>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn with_params(mut self, params: RouteParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Index key this request resolves to.
    pub fn lookup_key(&self) -> String {
        match &self.params {
            Some(params) if !params.file.is_empty() => {
                format!("/{}{}", params.file, params.rest)
            }
            _ => normalize_request_path(&self.path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(content_type: &str, max_age: u64, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            headers: vec![
                ("Content-Type", content_type.to_string()),
                ("Cache-Control", format!("max-age={max_age}")),
            ],
            body,
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            headers: vec![("Content-Type", types::PLAIN.to_string())],
            body: NOT_FOUND_BODY.as_bytes().to_vec(),
        }
    }

    /// First header value with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// What the handler decided for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Respond(Response),
    /// Not ours: hand the request to the next handler in the chain.
    Next,
}

impl Outcome {
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Respond(response) => Some(response),
            Self::Next => None,
        }
    }
}
