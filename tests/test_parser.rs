use beacon::http::parser::{ParseError, parse_request};
use beacon::http::request::Method;

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = parse_request(req).unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.query, None);
    assert!(parsed.args.is_empty());
}

#[test]
fn test_parse_header_value_is_not_trimmed() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\nX-Raw:tight\r\n\r\n";
    let parsed = parse_request(req).unwrap();

    assert_eq!(parsed.headers.get("Host").unwrap(), " example.com");
    assert_eq!(parsed.headers.get("X-Raw").unwrap(), "tight");
}

#[test]
fn test_parse_header_value_keeps_extra_colons() {
    let req = b"GET / HTTP/1.1\r\nReferer: http://example.com:8080/x\r\n\r\n";
    let parsed = parse_request(req).unwrap();

    assert_eq!(
        parsed.header("Referer"),
        Some(" http://example.com:8080/x")
    );
}

#[test]
fn test_parse_header_case_preservation() {
    let req = b"GET / HTTP/1.1\r\ncontent-TYPE: application/json\r\n\r\n";
    let parsed = parse_request(req).unwrap();

    assert!(parsed.headers.contains_key("content-TYPE"));
    assert!(!parsed.headers.contains_key("Content-Type"));
}

#[test]
fn test_parse_header_with_empty_name_is_dropped() {
    let req = b"GET / HTTP/1.1\r\n: orphan\r\nHost: a\r\n\r\n";
    let parsed = parse_request(req).unwrap();

    assert_eq!(parsed.headers.len(), 1);
    assert!(!parsed.headers.contains_key(""));
}

#[test]
fn test_parse_method_is_case_insensitive_and_uppercased() {
    let methods = vec![
        ("get", Method::GET),
        ("Post", Method::POST),
        ("PUT", Method::PUT),
        ("pAtCh", Method::PATCH),
        ("delete", Method::DELETE),
    ];

    for (method_str, expected_method) in methods {
        let req = format!("{} /thing HTTP/1.1\r\n\r\n", method_str);
        let parsed = parse_request(req.as_bytes()).unwrap();
        assert_eq!(parsed.method, expected_method);
        assert_eq!(parsed.method.as_str(), method_str.to_uppercase());
        assert_eq!(parsed.path, "/thing");
    }
}

#[test]
fn test_parse_query_string() {
    let req = b"GET /search?q=rust&page=2 HTTP/1.1\r\n\r\n";
    let parsed = parse_request(req).unwrap();

    assert_eq!(parsed.path, "/search");
    assert_eq!(parsed.query.as_deref(), Some("q=rust&page=2"));
    assert_eq!(parsed.param("q"), Some("rust"));
    assert_eq!(parsed.param("page"), Some("2"));
    assert_eq!(parsed.params.len(), 2);
}

#[test]
fn test_parse_query_pairs_rejoin_to_original_set() {
    let query = "a=1&b=two&c=&d=x=y";
    let req = format!("GET /p?{} HTTP/1.1\r\n\r\n", query);
    let parsed = parse_request(req.as_bytes()).unwrap();

    let mut rebuilt: Vec<String> = parsed
        .params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    rebuilt.sort();
    let mut original: Vec<&str> = query.split('&').collect();
    original.sort();

    assert_eq!(rebuilt, original);
}

#[test]
fn test_parse_query_empty_value_and_dropped_pairs() {
    let req = b"GET /p?empty=&=nameless&flag&last=1& HTTP/1.1\r\n\r\n";
    let parsed = parse_request(req).unwrap();

    assert_eq!(parsed.param("empty"), Some(""));
    assert_eq!(parsed.param("last"), Some("1"));
    assert_eq!(parsed.param("flag"), None);
    assert_eq!(parsed.params.len(), 2);
}

#[test]
fn test_parse_query_duplicate_key_last_wins() {
    let req = b"GET /p?k=1&k=2 HTTP/1.1\r\n\r\n";
    let parsed = parse_request(req).unwrap();

    assert_eq!(parsed.param("k"), Some("2"));
}

#[test]
fn test_parse_query_is_not_url_decoded() {
    let req = b"GET /p?name=a%20b+c HTTP/1.1\r\n\r\n";
    let parsed = parse_request(req).unwrap();

    assert_eq!(parsed.param("name"), Some("a%20b+c"));
}

#[test]
fn test_parse_cookie_header() {
    let req = b"GET / HTTP/1.1\r\nCookie: a=1; b=2\r\n\r\n";
    let parsed = parse_request(req).unwrap();

    assert_eq!(parsed.cookies.len(), 2);
    assert_eq!(parsed.cookie("a"), Some("1"));
    assert_eq!(parsed.cookie("b"), Some("2"));
    assert_eq!(parsed.header("Cookie"), Some(" a=1; b=2"));
}

#[test]
fn test_parse_cookie_header_name_is_case_insensitive() {
    let req = b"GET / HTTP/1.1\r\ncookie:session=abc;theme=dark;  empty=\r\n\r\n";
    let parsed = parse_request(req).unwrap();

    assert_eq!(parsed.cookie("session"), Some("abc"));
    assert_eq!(parsed.cookie("theme"), Some("dark"));
    assert_eq!(parsed.cookie("empty"), Some(""));
    assert!(parsed.headers.contains_key("cookie"));
}

#[test]
fn test_parse_lf_only_lines() {
    let req = b"POST /form?x=1 HTTP/1.0\nAccept:*/*\n\n";
    let parsed = parse_request(req).unwrap();

    assert_eq!(parsed.method, Method::POST);
    assert_eq!(parsed.path, "/form");
    assert_eq!(parsed.header("Accept"), Some("*/*"));
}

#[test]
fn test_parse_request_line_without_protocol() {
    let req = b"GET /plain\r\n\r\n";
    let parsed = parse_request(req).unwrap();

    assert_eq!(parsed.path, "/plain");
}

#[test]
fn test_parse_unrecognized_lines_are_ignored() {
    let req = b"GET / HTTP/1.1\r\nnonsense without colon\r\n\r\n";
    let parsed = parse_request(req).unwrap();

    assert!(parsed.headers.is_empty());
}

#[test]
fn test_parse_unsupported_method_is_missing_method() {
    let req = b"HEAD / HTTP/1.1\r\nHost: a\r\n\r\n";
    let result = parse_request(req);

    assert_eq!(result, Err(ParseError::MissingMethod));
}

#[test]
fn test_parse_empty_path_is_missing_path() {
    let req = b"GET  HTTP/1.1\r\n\r\n";
    let result = parse_request(req);

    assert_eq!(result, Err(ParseError::MissingPath));
}

#[test]
fn test_parse_unterminated_request_line_is_ignored() {
    let req = b"GET / HTTP/1.1";
    let result = parse_request(req);

    assert_eq!(result, Err(ParseError::MissingMethod));
}

#[test]
fn test_parse_empty_buffer() {
    assert_eq!(parse_request(b""), Err(ParseError::MissingMethod));
}
