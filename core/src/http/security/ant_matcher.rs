//! Ant-style path and request matching.
//!
//! Pattern syntax:
//!
//! - `?` matches exactly one character
//! - `*` matches zero or more characters within a path segment
//! - `**` matches zero or more whole path segments
//! - `{name}` matches exactly one path segment
//!
//! Leading, trailing and repeated slashes are ignored on both sides.
//!
//! # Spring Equivalent
//! `AntPathMatcher` / `AntPathRequestMatcher`

use actix_web::http::Method;

/// A compiled Ant-style path pattern.
///
/// ```
/// use lost_found_security_core::http::security::ant_matcher::AntMatcher;
///
/// let m = AntMatcher::new("/lost-found/admin/student/**");
/// assert!(m.matches("/lost-found/admin/student"));
/// assert!(m.matches("/lost-found/admin/student/alice/items"));
/// assert!(!m.matches("/lost-found/admin/students"));
/// ```
#[derive(Debug, Clone)]
pub struct AntMatcher {
    pattern: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    /// `*`, `{var}` or any segment containing `?`/`*`.
    Glob(String),
    /// `**`
    Any,
}

impl AntMatcher {
    pub fn new(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|part| {
                if part == "**" {
                    Segment::Any
                } else if part.starts_with('{') && part.ends_with('}') {
                    Segment::Glob("*".to_string())
                } else if part.contains(['*', '?']) {
                    Segment::Glob(part.to_string())
                } else {
                    Segment::Literal(part.to_string())
                }
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = split_path(path).collect();
        match_segments(&self.segments, &parts)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::Any, rest)) => {
            // Collapse consecutive `**`
            if rest.first() == Some(&Segment::Any) {
                return match_segments(rest, path);
            }
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((segment, rest)) => match path.split_first() {
            Some((head, tail)) => match_one(segment, head) && match_segments(rest, tail),
            None => false,
        },
    }
}

fn match_one(segment: &Segment, text: &str) -> bool {
    match segment {
        Segment::Literal(lit) => lit == text,
        Segment::Glob(glob) => {
            let g: Vec<char> = glob.chars().collect();
            let t: Vec<char> = text.chars().collect();
            glob_match(&g, &t)
        }
        Segment::Any => true,
    }
}

/// Iterative wildcard match with single-star backtracking.
fn glob_match(glob: &[char], text: &[char]) -> bool {
    let (mut g, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if g < glob.len() && (glob[g] == '?' || glob[g] == text[t]) {
            g += 1;
            t += 1;
        } else if g < glob.len() && glob[g] == '*' {
            star = Some((g, t));
            g += 1;
        } else if let Some((sg, st)) = star {
            g = sg + 1;
            t = st + 1;
            star = Some((sg, st + 1));
        } else {
            return false;
        }
    }

    glob[g..].iter().all(|&c| c == '*')
}

/// Matches a request by optional HTTP method and a set of path patterns.
///
/// # Spring Equivalent
/// `requestMatchers(HttpMethod, String...)`
#[derive(Debug, Clone)]
pub struct RequestMatcher {
    method: Option<Method>,
    patterns: Vec<AntMatcher>,
}

impl RequestMatcher {
    /// Matches the patterns for any HTTP method.
    pub fn paths(patterns: &[&str]) -> Self {
        Self {
            method: None,
            patterns: patterns.iter().map(|p| AntMatcher::new(p)).collect(),
        }
    }

    /// Matches the patterns only for `method`.
    pub fn method(method: Method, patterns: &[&str]) -> Self {
        Self {
            method: Some(method),
            ..Self::paths(patterns)
        }
    }

    pub fn get_method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    pub fn get_patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(AntMatcher::pattern)
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        if let Some(m) = &self.method {
            if m != method {
                return false;
            }
        }
        self.patterns.iter().any(|p| p.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        let m = AntMatcher::new("/lost-found/register");
        assert!(m.matches("/lost-found/register"));
        assert!(m.matches("/lost-found/register/"));
        assert!(!m.matches("/lost-found/registers"));
        assert!(!m.matches("/lost-found/register/extra"));
        assert!(!m.matches("/lost-found"));
    }

    #[test]
    fn test_variable_matches_single_segment() {
        let m = AntMatcher::new("/lost-found/lost-items/{id}");
        assert!(m.matches("/lost-found/lost-items/42"));
        assert!(m.matches("/lost-found/lost-items/user"));
        assert!(!m.matches("/lost-found/lost-items"));
        assert!(!m.matches("/lost-found/lost-items/42/photo"));
    }

    #[test]
    fn test_double_wildcard() {
        let m = AntMatcher::new("/lost-found/fuzzy/**");
        assert!(m.matches("/lost-found/fuzzy"));
        assert!(m.matches("/lost-found/fuzzy/lost-items"));
        assert!(m.matches("/lost-found/fuzzy/a/b/c"));
        assert!(!m.matches("/lost-found/fuzz"));
    }

    #[test]
    fn test_double_wildcard_in_middle() {
        let m = AntMatcher::new("/api/**/edit");
        assert!(m.matches("/api/edit"));
        assert!(m.matches("/api/a/b/edit"));
        assert!(!m.matches("/api/a/b"));

        let m = AntMatcher::new("/api/**/**/edit");
        assert!(m.matches("/api/x/edit"));
    }

    #[test]
    fn test_single_star_and_question_mark() {
        let m = AntMatcher::new("/files/*.txt");
        assert!(m.matches("/files/a.txt"));
        assert!(m.matches("/files/.txt"));
        assert!(!m.matches("/files/a.pdf"));
        assert!(!m.matches("/files/sub/a.txt"));

        let m = AntMatcher::new("/file?.txt");
        assert!(m.matches("/file1.txt"));
        assert!(!m.matches("/file12.txt"));
        assert!(!m.matches("/file.txt"));

        let m = AntMatcher::new("/v*/items/*");
        assert!(m.matches("/v1/items/9"));
        assert!(!m.matches("/items/9"));
    }

    #[test]
    fn test_glob_backtracking() {
        assert!(glob_match(&['a', '*', 'b', '*', 'c'], &"axxbyybc".chars().collect::<Vec<_>>()));
        assert!(!glob_match(&['a', '*', 'b'], &"axxc".chars().collect::<Vec<_>>()));
        assert!(glob_match(&['*'], &[]));
    }

    #[test]
    fn test_root_pattern() {
        let m = AntMatcher::new("/");
        assert!(m.matches("/"));
        assert!(m.matches(""));
        assert!(!m.matches("/x"));

        let m = AntMatcher::new("/**");
        assert!(m.matches("/"));
        assert!(m.matches("/anything/at/all"));
    }

    #[test]
    fn test_request_matcher_method() {
        let m = RequestMatcher::method(
            Method::GET,
            &["/lost-found/lost-items", "/lost-found/found-items"],
        );
        assert!(m.matches(&Method::GET, "/lost-found/lost-items"));
        assert!(m.matches(&Method::GET, "/lost-found/found-items"));
        assert!(!m.matches(&Method::POST, "/lost-found/lost-items"));
        assert!(!m.matches(&Method::GET, "/lost-found/other"));
        assert_eq!(m.get_method(), Some(&Method::GET));
    }

    #[test]
    fn test_request_matcher_any_method() {
        let m = RequestMatcher::paths(&["/lost-found/admin/students"]);
        assert!(m.matches(&Method::GET, "/lost-found/admin/students"));
        assert!(m.matches(&Method::DELETE, "/lost-found/admin/students"));
        assert!(m.get_method().is_none());
        assert_eq!(
            m.get_patterns().collect::<Vec<_>>(),
            vec!["/lost-found/admin/students"]
        );
    }
}
