//! URL patterns for state registration, matching and URL generation
//!
//! A state declares a pattern relative to its parent (`/overview`); the
//! router joins it onto the parent's absolute pattern
//! (`/editApplication/:name/overview`) at registration time.

use std::collections::BTreeMap;

use thiserror::Error;

pub mod segment;

pub use segment::{classify_segment, parse_param_name, Constraint, Param, Segment};

/// Path parameters bound during matching, keyed by parameter name
pub type Params = BTreeMap<String, String>;

/// Rejections raised while parsing a pattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern '{0}' must start with '/'")]
    MissingLeadingSlash(String),

    #[error("pattern '{pattern}' has a parameter without a name")]
    EmptyParamName { pattern: String },

    #[error("pattern '{pattern}' has an invalid parameter name '{name}'")]
    InvalidParamName { pattern: String, name: String },

    #[error("pattern '{pattern}' declares parameter '{name}' more than once")]
    DuplicateParam { pattern: String, name: String },

    #[error("pattern '{pattern}' has an invalid regex for '{param}': {message}")]
    InvalidRegex {
        pattern: String,
        param: String,
        message: String,
    },

    #[error("pattern '{pattern}' has an unterminated '{{'")]
    Unterminated { pattern: String },
}

/// Failures while generating a URL from parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("missing required parameter '{0}'")]
    MissingParam(String),

    #[error("value '{value}' is not accepted by parameter '{param}'")]
    Rejected { param: String, value: String },
}

/// A parsed URL pattern
#[derive(Debug, Clone, PartialEq)]
pub struct UrlPattern {
    source: String,
    segments: Vec<Segment>,
}

impl UrlPattern {
    /// Parses a pattern such as `/editApplication/:name`
    ///
    /// The empty pattern is accepted: a child with an empty URL shares its
    /// parent's URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use cu_router::pattern::UrlPattern;
    ///
    /// let pattern = UrlPattern::parse("/editApplication/:name").unwrap();
    /// assert_eq!(pattern.param_names().collect::<Vec<_>>(), vec!["name"]);
    ///
    /// assert!(UrlPattern::parse("editApplication").is_err());
    /// ```
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        if source.is_empty() {
            return Ok(Self::root());
        }

        if !source.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(source.to_string()));
        }

        let segments = source
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| classify_segment(source, s))
            .collect::<Result<Vec<_>, _>>()?;

        let pattern = Self {
            source: source.to_string(),
            segments,
        };
        pattern.check_duplicates()?;
        Ok(pattern)
    }

    /// The empty pattern (matches `/` on its own)
    pub fn root() -> Self {
        Self {
            source: String::new(),
            segments: Vec::new(),
        }
    }

    /// Appends a child pattern to this one
    ///
    /// ```
    /// use cu_router::pattern::UrlPattern;
    ///
    /// let parent = UrlPattern::parse("/editApplication/:name").unwrap();
    /// let child = UrlPattern::parse("/logs").unwrap();
    /// assert_eq!(parent.join(&child).unwrap().as_str(), "/editApplication/:name/logs");
    /// ```
    pub fn join(&self, child: &UrlPattern) -> Result<UrlPattern, PatternError> {
        let source = match (self.source.as_str(), child.source.as_str()) {
            ("" | "/", child) => child.to_string(),
            (parent, "" | "/") => parent.to_string(),
            (parent, child) => format!("{}{}", parent, child),
        };

        let joined = Self {
            source,
            segments: self
                .segments
                .iter()
                .chain(child.segments.iter())
                .cloned()
                .collect(),
        };
        joined.check_duplicates()?;
        Ok(joined)
    }

    fn check_duplicates(&self) -> Result<(), PatternError> {
        let mut seen = std::collections::HashSet::new();
        match self.param_names().find(|name| !seen.insert(*name)) {
            Some(name) => Err(PatternError::DuplicateParam {
                pattern: self.source.clone(),
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// The pattern as written (`/` for the root pattern)
    pub fn as_str(&self) -> &str {
        if self.source.is_empty() {
            "/"
        } else {
            &self.source
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Parameter names in declaration order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(p) => Some(p.name.as_str()),
            Segment::Static(_) => None,
        })
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.param_names().any(|p| p == name)
    }

    /// Sort key: fewer parameters first, then more static segments first
    pub fn priority(&self) -> (usize, std::cmp::Reverse<usize>) {
        let dynamic = self.segments.iter().filter(|s| s.is_param()).count();
        (dynamic, std::cmp::Reverse(self.segments.len() - dynamic))
    }

    /// Matches a canonical path against the whole pattern
    ///
    /// Parameter values are percent-decoded before constraint checks.
    ///
    /// ```
    /// use cu_router::pattern::UrlPattern;
    ///
    /// let pattern = UrlPattern::parse("/editApplication/:name/overview").unwrap();
    /// let params = pattern.matches("/editApplication/my%20app/overview", false).unwrap();
    /// assert_eq!(params.get("name").map(String::as_str), Some("my app"));
    ///
    /// assert!(pattern.matches("/editApplication/overview", false).is_none());
    /// ```
    pub fn matches(&self, path: &str, case_insensitive: bool) -> Option<Params> {
        let path_segments = crate::path::segments(path);

        if path_segments.len() != self.segments.len() {
            return None;
        }

        self.segments
            .iter()
            .zip(path_segments)
            .try_fold(Params::new(), |mut params, (segment, value)| match segment {
                Segment::Static(text) => {
                    let equal = if case_insensitive {
                        text.eq_ignore_ascii_case(value)
                    } else {
                        text == value
                    };
                    equal.then_some(params)
                }
                Segment::Param(param) => {
                    let decoded = urlencoding::decode(value).ok()?;
                    if !param.accepts(&decoded) {
                        return None;
                    }
                    params.insert(param.name.clone(), decoded.into_owned());
                    Some(params)
                }
            })
    }

    /// Generates a concrete URL, percent-encoding parameter values
    ///
    /// ```
    /// use cu_router::pattern::{Params, UrlPattern};
    ///
    /// let pattern = UrlPattern::parse("/editApplication/:name/deploy").unwrap();
    /// let mut params = Params::new();
    /// params.insert("name".to_string(), "my app".to_string());
    /// assert_eq!(pattern.generate(&params).unwrap(), "/editApplication/my%20app/deploy");
    /// ```
    pub fn generate(&self, params: &Params) -> Result<String, GenerateError> {
        let parts = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Static(text) => Ok(text.clone()),
                Segment::Param(param) => {
                    let value = params
                        .get(&param.name)
                        .ok_or_else(|| GenerateError::MissingParam(param.name.clone()))?;
                    if !param.accepts(value) {
                        return Err(GenerateError::Rejected {
                            param: param.name.clone(),
                            value: value.clone(),
                        });
                    }
                    Ok(urlencoding::encode(value).into_owned())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(format!("/{}", parts.join("/")))
    }
}

impl std::fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
