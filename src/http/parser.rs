use std::collections::HashMap;

use crate::http::request::{Method, Request};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("request line is missing a method")]
    MissingMethod,
    #[error("request line is missing a path")]
    MissingPath,
}

/// Request line prefixes, matched ignoring case.
const REQUEST_LINE_PREFIXES: [&str; 5] = ["GET ", "POST ", "PUT ", "PATCH ", "DELETE "];

#[derive(Default)]
struct PartialRequest {
    method: Option<Method>,
    path: Option<String>,
    query: Option<String>,
    params: HashMap<String, String>,
    headers: HashMap<String, String>,
    cookies: HashMap<String, String>,
}

/// Builds a [`Request`] out of the bytes accumulated for one connection.
///
/// Every `\n`-terminated line is either the request line, a `Name:value`
/// header, or ignored. A trailing fragment with no line terminator is not a
/// complete line and is skipped.
pub fn parse_request(buf: &[u8]) -> Result<Request, ParseError> {
    let mut partial = PartialRequest::default();

    let mut rest = buf;
    while let Some(end) = rest.iter().position(|&b| b == b'\n') {
        let mut line = &rest[..end];
        rest = &rest[end + 1..];

        if let Some(stripped) = line.strip_suffix(b"\r") {
            line = stripped;
        }
        process_line(&String::from_utf8_lossy(line), &mut partial);
    }

    let method = partial.method.ok_or(ParseError::MissingMethod)?;
    let path = partial
        .path
        .filter(|p| !p.is_empty())
        .ok_or(ParseError::MissingPath)?;

    Ok(Request {
        method,
        path,
        query: partial.query,
        args: Vec::new(),
        params: partial.params,
        headers: partial.headers,
        cookies: partial.cookies,
    })
}

fn is_request_line(line: &str) -> bool {
    REQUEST_LINE_PREFIXES.iter().any(|prefix| {
        line.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

fn process_line(line: &str, req: &mut PartialRequest) {
    if is_request_line(line) {
        process_request_line(line, req);
    } else if let Some((name, value)) = line.split_once(':') {
        process_header(name, value, req);
    }
}

fn process_request_line(line: &str, req: &mut PartialRequest) {
    let Some((method, target)) = line.split_once(' ') else {
        return;
    };
    req.method = Method::from_str(method);

    let target = match target.find(" HTTP") {
        Some(end) => &target[..end],
        None => target,
    };

    let path = match target.split_once('?') {
        Some((path, query)) => {
            for pair in query.split('&') {
                if let Some((name, value)) = parse_pair(pair) {
                    req.params.insert(name, value);
                }
            }
            req.query = Some(query.to_string());
            path
        }
        None => target,
    };
    req.path = Some(path.to_string());
}

fn process_header(name: &str, value: &str, req: &mut PartialRequest) {
    if name.is_empty() {
        return;
    }

    if name.eq_ignore_ascii_case("Cookie") {
        for segment in value.split(';') {
            if let Some((cookie, v)) = parse_pair(segment.trim_start_matches(' ')) {
                req.cookies.insert(cookie, v);
            }
        }
    }
    req.headers.insert(name.to_string(), value.to_string());
}

/// Splits `name=value` on the first `=`. Pairs without `=` or with an empty
/// name are dropped; `name=` yields an empty value.
fn parse_pair(pair: &str) -> Option<(String, String)> {
    let (name, value) = pair.split_once('=')?;
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.to_string()))
}
