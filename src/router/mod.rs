//! Route table and resolution.
//!
//! Routes live in an ordered map keyed by `"<METHOD> <pattern>"`. A pattern
//! segment is either literal text or [`WILDCARD`], which matches one
//! non-empty path segment and captures it.
//!
//! # Resolution
//!
//! 1. Exact lookup of `"<METHOD> <path>"`. Fully literal routes end here.
//! 2. Otherwise, for each segment boundary left to right, keep the path up to
//!    the boundary literal and put a wildcard in the next segment, e.g. for
//!    `GET /user/42/edit`:
//!
//! ```text
//!    GET /user/*/     <- seek here, walk keys sharing this prefix
//!    GET /user/42/*   <- then here
//! ```
//!
//!    Every key sharing the prefix is matched segment by segment against the
//!    rest of the path. The first full match in key order wins.
//!
//! The first path segment is always literal, so `/` or `/user/` never reach a
//! wildcard route.

mod handler;

pub use handler::Handler;

use std::collections::BTreeMap;
use std::ops::Bound;

use tracing::debug;

use crate::http::request::{Method, Request};

/// Route segment that matches any single non-empty path segment.
pub const WILDCARD: &str = "*";

/// A resolved route: the handler plus the wildcard captures, in order.
pub struct RouteMatch<'a> {
    pub handler: &'a dyn Handler,
    pub captures: Vec<String>,
}

#[derive(Default)]
pub struct Router {
    routes: BTreeMap<String, Box<dyn Handler>>,
}

fn route_key(method: Method, path: &str) -> String {
    format!("{} {}", method.as_str(), path)
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `method` and `pattern`. Registering the same
    /// method and pattern again replaces the previous handler.
    pub fn add<H>(&mut self, method: Method, pattern: &str, handler: H)
    where
        H: Handler + 'static,
    {
        let key = route_key(method, pattern);
        debug!(route = %key, "Adding route");
        self.routes.insert(key, Box::new(handler));
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn contains(&self, method: Method, pattern: &str) -> bool {
        self.routes.contains_key(&route_key(method, pattern))
    }

    pub fn clear(&mut self) {
        self.routes.clear();
    }

    /// Finds the handler for `method` and `path` without touching any request.
    pub fn resolve(&self, method: Method, path: &str) -> Option<RouteMatch<'_>> {
        let key = route_key(method, path);
        if let Some(handler) = self.routes.get(&key) {
            return Some(RouteMatch {
                handler: handler.as_ref(),
                captures: Vec::new(),
            });
        }

        let head = usize::from(path.starts_with('/'));
        let segments: Vec<&str> = path[head..].split('/').collect();
        // Byte offset in `key` where the path starts.
        let path_offset = method.as_str().len() + 1;

        let mut literal_end = head;
        for depth in 1..segments.len() {
            literal_end += segments[depth - 1].len() + 1;

            let mut prefix = String::with_capacity(path_offset + literal_end + 2);
            prefix.push_str(&key[..path_offset + literal_end]);
            prefix.push_str(WILDCARD);
            if depth + 1 < segments.len() {
                prefix.push('/');
            }

            let remaining = &segments[depth..];
            let candidates = self
                .routes
                .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
                .take_while(|(route, _)| route.starts_with(prefix.as_str()));

            for (route, handler) in candidates {
                let tail = &route[path_offset + literal_end..];
                if let Some(captures) = match_segments(tail, remaining) {
                    return Some(RouteMatch {
                        handler: handler.as_ref(),
                        captures,
                    });
                }
            }
        }

        None
    }

    /// Resolves `req` and, on a match, appends the captures to `req.args`.
    /// A miss leaves the request untouched.
    pub fn find(&self, req: &mut Request) -> Option<&dyn Handler> {
        let found = self.resolve(req.method, &req.path)?;
        req.args.extend(found.captures);
        Some(found.handler)
    }
}

/// Walks `pattern` and `segments` in lock-step. Both must run out together.
fn match_segments(pattern: &str, segments: &[&str]) -> Option<Vec<String>> {
    let mut expected = pattern.split('/');
    let mut captures = Vec::new();

    for segment in segments {
        let component = expected.next()?;
        if component == WILDCARD {
            if segment.is_empty() {
                return None;
            }
            captures.push((*segment).to_string());
        } else if component != *segment {
            return None;
        }
    }

    match expected.next() {
        Some(_) => None,
        None => Some(captures),
    }
}
