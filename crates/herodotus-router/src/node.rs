//! Radix tree nodes.

use crate::error::RouterError;
use crate::method_router::MethodRouter;
use crate::params::Params;

/// Kind of path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal segment (`tasks`).
    Static,
    /// Named parameter (`{id}`).
    Param(String),
    /// Catch-all (`*path`), always last.
    Wildcard(String),
}

impl SegmentKind {
    fn parse(segment: &str) -> Self {
        if let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Self::Param(name.to_string())
        } else if let Some(name) = segment.strip_prefix('*') {
            Self::Wildcard(name.to_string())
        } else {
            Self::Static
        }
    }
}

/// A node in the route tree.
///
/// Lookup priority at every level is static, then parameter, then wildcard.
#[derive(Debug, Clone)]
pub struct Node<T> {
    segment: String,
    kind: SegmentKind,
    methods: Option<MethodRouter<T>>,
    static_children: Vec<Node<T>>,
    param_child: Option<Box<Node<T>>>,
    wildcard_child: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    fn new(segment: &str, kind: SegmentKind) -> Self {
        Self {
            segment: segment.to_string(),
            kind,
            methods: None,
            static_children: Vec::new(),
            param_child: None,
            wildcard_child: None,
        }
    }

    /// Creates the root node.
    #[must_use]
    pub fn root() -> Self {
        Self::new("", SegmentKind::Static)
    }

    /// Segment text as written in the pattern.
    #[must_use]
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Segment kind.
    #[must_use]
    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    /// Inserts `methods` at `path`, merging with methods already there.
    ///
    /// # Errors
    ///
    /// Fails if a wildcard is not the last segment or if a parameter name
    /// conflicts with one already registered at the same position.
    pub fn insert(&mut self, path: &str, methods: MethodRouter<T>) -> Result<(), RouterError> {
        let segments: Vec<&str> = split(path).collect();
        self.insert_segments(path, &segments, methods)
    }

    fn insert_segments(
        &mut self,
        path: &str,
        segments: &[&str],
        methods: MethodRouter<T>,
    ) -> Result<(), RouterError> {
        let Some((&segment, rest)) = segments.split_first() else {
            match &mut self.methods {
                Some(existing) => existing.merge(methods),
                None => self.methods = Some(methods),
            }
            return Ok(());
        };

        let child = match SegmentKind::parse(segment) {
            SegmentKind::Static => {
                let index = match self
                    .static_children
                    .binary_search_by(|c| c.segment.as_str().cmp(segment))
                {
                    Ok(index) => index,
                    Err(index) => {
                        self.static_children
                            .insert(index, Node::new(segment, SegmentKind::Static));
                        index
                    }
                };
                &mut self.static_children[index]
            }
            SegmentKind::Param(name) => {
                if let Some(existing) = &self.param_child {
                    if let SegmentKind::Param(existing) = &existing.kind {
                        if *existing != name {
                            return Err(RouterError::ParamConflict {
                                path: path.to_string(),
                                existing: existing.clone(),
                                new: name,
                            });
                        }
                    }
                }
                self.param_child
                    .get_or_insert_with(|| Box::new(Node::new(segment, SegmentKind::Param(name))))
                    .as_mut()
            }
            SegmentKind::Wildcard(name) => {
                if !rest.is_empty() {
                    return Err(RouterError::WildcardNotLast {
                        path: path.to_string(),
                        segment: segment.to_string(),
                    });
                }
                self.wildcard_child
                    .get_or_insert_with(|| {
                        Box::new(Node::new(segment, SegmentKind::Wildcard(name)))
                    })
                    .as_mut()
            }
        };

        child.insert_segments(path, rest, methods)
    }

    /// Matches a request path, returning the method table and captures.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        let segments: Vec<&str> = split(path).collect();
        let mut params = Params::new();
        let methods = self.match_segments(&segments, &mut params)?;
        Some((methods, params))
    }

    fn match_segments<'a>(
        &'a self,
        segments: &[&str],
        params: &mut Params,
    ) -> Option<&'a MethodRouter<T>> {
        let Some((&segment, rest)) = segments.split_first() else {
            return self.methods.as_ref();
        };

        if let Ok(index) = self
            .static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
        {
            if let Some(found) = self.static_children[index].match_segments(rest, params) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param(name) = &child.kind {
                let mark = params.len();
                params.push(name.as_str(), segment);
                if let Some(found) = child.match_segments(rest, params) {
                    return Some(found);
                }
                params.truncate(mark);
            }
        }

        if let Some(child) = &self.wildcard_child {
            if let SegmentKind::Wildcard(name) = &child.kind {
                let methods = child.methods.as_ref()?;
                params.push(name.as_str(), segments.join("/"));
                return Some(methods);
            }
        }

        None
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
