//! Segment parsing for URL patterns
//!
//! Pure functional parsing of pattern segments into typed segments.
//! Recognized forms, evaluated in order:
//!
//! 1. **Constrained parameter**: `{name:regex}` (regex must match the whole segment)
//! 2. **Bare braces**: `{name}`
//! 3. **Parameter**: `:name`
//! 4. **Static**: any other text

use regex::Regex;

use super::PatternError;

/// A parameter constraint compiled from `{name:regex}`
#[derive(Debug, Clone)]
pub struct Constraint {
    source: String,
    regex: Regex,
}

impl Constraint {
    /// Compiles a constraint anchored to the whole segment
    pub fn new(pattern: &str, param: &str, source: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(&format!("^(?:{})$", source)).map_err(|e| {
            PatternError::InvalidRegex {
                pattern: pattern.to_string(),
                param: param.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The regex as written in the pattern
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn validate(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// A path parameter placeholder
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub constraint: Option<Constraint>,
}

impl Param {
    /// Checks a decoded value against the constraint, if any
    pub fn accepts(&self, value: &str) -> bool {
        !value.is_empty()
            && self
                .constraint
                .as_ref()
                .map(|c| c.validate(value))
                .unwrap_or(true)
    }
}

/// One `/`-separated piece of a URL pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Static(String),
    /// Path parameter bound at navigation time
    Param(Param),
}

impl Segment {
    pub fn is_param(&self) -> bool {
        matches!(self, Segment::Param(_))
    }

    /// Renders the segment back into pattern syntax
    pub fn to_pattern(&self) -> String {
        match self {
            Segment::Static(text) => text.clone(),
            Segment::Param(Param {
                name,
                constraint: None,
            }) => format!(":{}", name),
            Segment::Param(Param {
                name,
                constraint: Some(c),
            }) => format!("{{{}:{}}}", name, c.as_str()),
        }
    }
}

/// Classifies a segment into a typed segment
///
/// `pattern` is the full pattern, used for error context only.
///
/// # Examples
///
/// ```
/// use cu_router::pattern::{classify_segment, Segment};
///
/// let seg = classify_segment("/overview", "overview").unwrap();
/// assert_eq!(seg, Segment::Static("overview".to_string()));
///
/// let seg = classify_segment("/editApplication/:name", ":name").unwrap();
/// assert!(seg.is_param());
///
/// let seg = classify_segment("/apps/{id:[0-9]+}", "{id:[0-9]+}").unwrap();
/// assert!(seg.is_param());
/// ```
pub fn classify_segment(pattern: &str, segment: &str) -> Result<Segment, PatternError> {
    if let Some(inner) = segment.strip_prefix('{') {
        let inner = inner
            .strip_suffix('}')
            .ok_or_else(|| PatternError::Unterminated {
                pattern: pattern.to_string(),
            })?;

        let (name, constraint) = match inner.split_once(':') {
            Some((name, source)) => {
                let name = parse_param_name(pattern, name)?;
                let constraint = Constraint::new(pattern, &name, source)?;
                (name, Some(constraint))
            }
            None => (parse_param_name(pattern, inner)?, None),
        };

        return Ok(Segment::Param(Param { name, constraint }));
    }

    match segment.strip_prefix(':') {
        Some(name) => Ok(Segment::Param(Param {
            name: parse_param_name(pattern, name)?,
            constraint: None,
        })),
        None => Ok(Segment::Static(segment.to_string())),
    }
}

/// Validates a parameter name: `[A-Za-z_][A-Za-z0-9_]*`
pub fn parse_param_name(pattern: &str, name: &str) -> Result<String, PatternError> {
    let mut chars = name.chars();

    match chars.next() {
        None => Err(PatternError::EmptyParamName {
            pattern: pattern.to_string(),
        }),
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
                Ok(name.to_string())
            } else {
                Err(PatternError::InvalidParamName {
                    pattern: pattern.to_string(),
                    name: name.to_string(),
                })
            }
        }
        Some(_) => Err(PatternError::InvalidParamName {
            pattern: pattern.to_string(),
            name: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str) -> Segment {
        Segment::Param(Param {
            name: name.to_string(),
            constraint: None,
        })
    }

    #[test]
    fn test_classify_static() {
        let seg = classify_segment("/deploy", "deploy").unwrap();
        assert_eq!(seg, Segment::Static("deploy".to_string()));
    }

    #[test]
    fn test_classify_colon_param() {
        assert_eq!(classify_segment("/:name", ":name").unwrap(), param("name"));
    }

    #[test]
    fn test_classify_brace_param() {
        assert_eq!(classify_segment("/{name}", "{name}").unwrap(), param("name"));
    }

    #[test]
    fn test_classify_constrained_param() {
        let seg = classify_segment("/{id:[0-9]+}", "{id:[0-9]+}").unwrap();
        match seg {
            Segment::Param(p) => {
                assert_eq!(p.name, "id");
                assert!(p.accepts("42"));
                assert!(!p.accepts("4a2"));
                assert!(!p.accepts(""));
            }
            other => panic!("expected param, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_errors() {
        assert!(matches!(
            classify_segment("/:", ":"),
            Err(PatternError::EmptyParamName { .. })
        ));
        assert!(matches!(
            classify_segment("/:9lives", ":9lives"),
            Err(PatternError::InvalidParamName { .. })
        ));
        assert!(matches!(
            classify_segment("/{id", "{id"),
            Err(PatternError::Unterminated { .. })
        ));
        assert!(matches!(
            classify_segment("/{id:[0-9}", "{id:[0-9}"),
            Err(PatternError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn test_segment_round_trips_to_pattern_syntax() {
        let seg = classify_segment("/{id:[a-z]+}", "{id:[a-z]+}").unwrap();
        assert_eq!(seg.to_pattern(), "{id:[a-z]+}");
        assert_eq!(param("name").to_pattern(), ":name");
    }
}
