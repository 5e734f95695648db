//! Path template matching.
//!
//! # Responsibilities
//! - Compile a template (`/tests/:param/subPath/:param2`) into segments
//! - Test request paths against the compiled template
//! - Extract named parameters positionally, as strings
//!
//! # Design Decisions
//! - Literal segments compare ASCII case-insensitively
//! - A `:name` segment captures exactly one non-empty segment
//! - One trailing slash on the request path or the template is tolerated
//! - Empty segments (`/a//b`) are rejected at compile time
//! - No regex to guarantee O(segments) matching

use crate::error::TemplateError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Compile a template string.
    pub fn compile(template: &str) -> Result<Self, TemplateError> {
        let Some(rest) = template.strip_prefix('/') else {
            return Err(TemplateError::MissingLeadingSlash(template.to_string()));
        };

        // One trailing slash is not a segment of its own
        let trimmed = rest.strip_suffix('/').unwrap_or(rest);
        if trimmed.is_empty() && !rest.is_empty() {
            return Err(TemplateError::EmptySegment(template.to_string()));
        }

        let mut segments = Vec::new();
        if !trimmed.is_empty() {
            for part in trimmed.split('/') {
                match part.strip_prefix(':') {
                    Some("") => return Err(TemplateError::EmptyParameter(template.to_string())),
                    Some(name) => {
                        let duplicate = segments
                            .iter()
                            .any(|s| matches!(s, Segment::Param(existing) if existing == name));
                        if duplicate {
                            return Err(TemplateError::DuplicateParameter {
                                template: template.to_string(),
                                name: name.to_string(),
                            });
                        }
                        segments.push(Segment::Param(name.to_string()));
                    }
                    None if part.is_empty() => {
                        return Err(TemplateError::EmptySegment(template.to_string()))
                    }
                    None => segments.push(Segment::Literal(part.to_string())),
                }
            }
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    /// Template made only of literal segments. Never fails.
    pub(crate) fn literal(path: &str) -> Self {
        let rest = path.trim_matches('/');
        let segments = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').map(|s| Segment::Literal(s.to_string())).collect()
        };
        Self {
            source: format!("/{}", rest),
            segments,
        }
    }

    /// The template as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Declared parameter names, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn has_params(&self) -> bool {
        self.param_names().next().is_some()
    }

    /// Match a request path, returning `(name, value)` pairs on success.
    pub fn matches(&self, path: &str) -> Option<Vec<(String, String)>> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

        let parts: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) => {
                    if !literal.eq_ignore_ascii_case(part) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.push((name.clone(), part.to_string()));
                }
            }
        }
        Some(params)
    }
}
