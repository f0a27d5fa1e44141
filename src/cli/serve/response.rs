//! Writing handler outcomes back over tiny_http.

use crate::site::{Outcome, RenderError, Response};
use crate::utils::html::escape;
use crate::utils::mime::types::HTML;
use anyhow::{Result, anyhow};
use tiny_http::{Header, StatusCode};

/// Send the handler's answer. HEAD requests get headers only.
pub fn respond(request: tiny_http::Request, result: Result<Outcome, RenderError>) -> Result<()> {
    let head = request.method() == &tiny_http::Method::Head;
    let response = match result {
        Ok(Outcome::Respond(response)) => response,
        Ok(Outcome::Next) => Response::not_found(),
        Err(err) => {
            let err = anyhow::Error::from(err);
            crate::log!("error"; "{} {}: {:#}", request.method(), request.url(), err);
            error_page(&err)
        }
    };
    send(request, response, head)
}

/// Escaped 500 page for render failures.
pub fn error_page(error: &anyhow::Error) -> Response {
    let error_str = format!("{error:#}");
    let msg = escape(&error_str);
    let body = format!("<html><body><h1>Render Error</h1><pre>{msg}</pre></body></html>");
    Response {
        status: 500,
        headers: vec![("Content-Type", HTML.to_string())],
        body: body.into_bytes(),
    }
}

fn send(request: tiny_http::Request, response: Response, head: bool) -> Result<()> {
    let body = if head { Vec::new() } else { response.body };
    let mut http = tiny_http::Response::from_data(body).with_status_code(StatusCode(response.status));
    for (key, value) in &response.headers {
        http.add_header(make_header(key, value)?);
    }
    request.respond(http)?;
    Ok(())
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow!("invalid header `{key}: {value}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_page_escaped() {
        let err = anyhow!("bad <script>").context("cannot render `/page`");
        let page = error_page(&err);
        let body = String::from_utf8(page.body).unwrap();
        assert_eq!(page.status, 500);
        assert!(body.contains("cannot render `/page`: bad &lt;script&gt;"));
        assert!(!body.contains("<script>"));
    }

    #[test]
    fn test_make_header() {
        assert!(make_header("Cache-Control", "max-age=60").is_ok());
    }
}
