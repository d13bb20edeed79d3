//! Middleware parameter declarations.
//!
//! Middleware types declare the headers they expect by registering a
//! [`ParameterSource`] in the [`MiddlewareRegistry`]. The
//! [`MetadataExtractor`] turns a route's middleware identifiers into the
//! flattened, order-preserving list of declared parameters.
//!
//! Identifiers follow the usual route-table conventions:
//!
//! - `throttle:60,1` carries arguments after the colon; only `throttle` is
//!   used for lookup.
//! - A **group** (`api`) expands to its member identifiers.
//! - An **alias** (`auth`) maps to a concrete middleware type name.
//! - Anything else is taken as a type name directly.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use herodotus_core::ParameterDescriptor;
//! use herodotus_docs::{MetadataExtractor, MiddlewareRegistry};
//!
//! let mut registry = MiddlewareRegistry::new();
//! registry
//!     .register(
//!         "app::Authenticate",
//!         vec![ParameterDescriptor::builder("Authorization")
//!             .required(true)
//!             .masked(true)
//!             .build()
//!             .unwrap()],
//!     )
//!     .alias("auth", "app::Authenticate")
//!     .group("api", ["auth:sanctum", "throttle:60,1"]);
//!
//! let extractor = MetadataExtractor::new(Arc::new(registry), Vec::<String>::new());
//! let params = extractor.extract(["api"]);
//! assert_eq!(params.len(), 1);
//! assert_eq!(params[0].name(), "Authorization");
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use herodotus_core::{CoreResult, ParameterDescriptor, RouteDescriptor};

use crate::error::ResolveError;

/// Something that can produce the parameter declarations of a middleware.
pub trait ParameterSource: Send + Sync + 'static {
    /// Returns the declared parameters.
    fn parameters(&self) -> Result<Vec<ParameterDescriptor>, ResolveError>;
}

impl ParameterSource for Vec<ParameterDescriptor> {
    fn parameters(&self) -> Result<Vec<ParameterDescriptor>, ResolveError> {
        Ok(self.clone())
    }
}

/// A [`ParameterSource`] backed by a closure.
pub struct FnSource<F> {
    f: F,
}

/// Wraps a closure as a [`ParameterSource`].
///
/// The closure runs every time a path entry is first created, so it can
/// reflect state that changes while the process runs.
pub fn from_fn<F>(f: F) -> FnSource<F>
where
    F: Fn() -> Result<Vec<ParameterDescriptor>, ResolveError> + Send + Sync + 'static,
{
    FnSource { f }
}

impl<F> ParameterSource for FnSource<F>
where
    F: Fn() -> Result<Vec<ParameterDescriptor>, ResolveError> + Send + Sync + 'static,
{
    fn parameters(&self) -> Result<Vec<ParameterDescriptor>, ResolveError> {
        (self.f)()
    }
}

/// Implemented by middleware types that declare their headers statically.
///
/// ```
/// use herodotus_core::{CoreResult, ParameterDescriptor};
/// use herodotus_docs::{DeclaresParameters, MiddlewareRegistry};
///
/// struct SetLocale;
///
/// impl DeclaresParameters for SetLocale {
///     const NAME: &'static str = "app::SetLocale";
///
///     fn declared_parameters() -> CoreResult<Vec<ParameterDescriptor>> {
///         Ok(vec![ParameterDescriptor::header("Accept-Language", "Preferred locale")?])
///     }
/// }
///
/// let mut registry = MiddlewareRegistry::new();
/// registry.register_type::<SetLocale>().alias("locale", SetLocale::NAME);
/// assert!(registry.contains("app::SetLocale"));
/// ```
pub trait DeclaresParameters {
    /// Type name the middleware is registered under.
    const NAME: &'static str;

    /// Declared header parameters.
    fn declared_parameters() -> CoreResult<Vec<ParameterDescriptor>>;
}

struct DeclaredSource<M> {
    _marker: std::marker::PhantomData<fn() -> M>,
}

impl<M: DeclaresParameters + 'static> ParameterSource for DeclaredSource<M> {
    fn parameters(&self) -> Result<Vec<ParameterDescriptor>, ResolveError> {
        M::declared_parameters().map_err(|e| ResolveError::unavailable(M::NAME, e.to_string()))
    }
}

/// Maps middleware identifiers to parameter sources.
#[derive(Default, Clone)]
pub struct MiddlewareRegistry {
    sources: HashMap<String, Arc<dyn ParameterSource>>,
    aliases: HashMap<String, String>,
    groups: HashMap<String, Vec<String>>,
}

impl fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareRegistry")
            .field("sources", &self.sources.keys().collect::<Vec<_>>())
            .field("aliases", &self.aliases)
            .field("groups", &self.groups)
            .finish()
    }
}

impl MiddlewareRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the parameter source of a middleware type.
    pub fn register(
        &mut self,
        type_name: impl Into<String>,
        source: impl ParameterSource,
    ) -> &mut Self {
        self.sources.insert(type_name.into(), Arc::new(source));
        self
    }

    /// Registers a middleware type that implements [`DeclaresParameters`].
    pub fn register_type<M: DeclaresParameters + 'static>(&mut self) -> &mut Self {
        self.register(
            M::NAME,
            DeclaredSource::<M> {
                _marker: std::marker::PhantomData,
            },
        )
    }

    /// Maps a short identifier to a type name.
    pub fn alias(&mut self, alias: impl Into<String>, type_name: impl Into<String>) -> &mut Self {
        self.aliases.insert(alias.into(), type_name.into());
        self
    }

    /// Defines a named group of middleware identifiers.
    pub fn group<I, S>(&mut self, name: impl Into<String>, members: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups
            .insert(name.into(), members.into_iter().map(Into::into).collect());
        self
    }

    /// Returns true if a source is registered under `type_name`.
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.sources.contains_key(type_name)
    }

    /// Resolves one base name to the type names it stands for.
    ///
    /// Groups expand recursively; a group that (directly or indirectly)
    /// contains itself expands only once.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Vec<String> {
        let mut resolved = Vec::new();
        let mut visiting = HashSet::new();
        self.resolve_into(name, &mut visiting, &mut resolved);
        resolved
    }

    fn resolve_into(&self, name: &str, visiting: &mut HashSet<String>, out: &mut Vec<String>) {
        if let Some(members) = self.groups.get(name) {
            if !visiting.insert(name.to_string()) {
                return;
            }
            for member in members {
                if let Some(base) = base_name(member) {
                    self.resolve_into(base, visiting, out);
                }
            }
            return;
        }

        let type_name = self.aliases.get(name).map_or(name, String::as_str);
        out.push(type_name.to_string());
    }

    /// Calls the source registered under `type_name`.
    ///
    /// # Errors
    ///
    /// [`ResolveError::Unregistered`] if nothing is registered, or whatever
    /// the source itself reports.
    pub fn parameters(&self, type_name: &str) -> Result<Vec<ParameterDescriptor>, ResolveError> {
        let source = self
            .sources
            .get(type_name)
            .ok_or_else(|| ResolveError::Unregistered {
                name: type_name.to_string(),
            })?;
        source.parameters()
    }
}

/// Returns the lookup name of an identifier: the part before the first `:`,
/// or `None` if that is empty.
fn base_name(identifier: &str) -> Option<&str> {
    let base = identifier.split(':').next().unwrap_or_default().trim();
    (!base.is_empty()).then_some(base)
}

/// Reduces identifiers to unique base names, keeping first occurrences.
///
/// ```
/// use herodotus_docs::extractor::normalize;
///
/// let names = normalize(["throttle:60,1", "auth:api", "throttle:10,1", ":x"]);
/// assert_eq!(names, vec!["throttle", "auth"]);
/// ```
pub fn normalize<I, S>(identifiers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    identifiers
        .into_iter()
        .filter_map(|id| base_name(id.as_ref()).map(str::to_string))
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Resolves middleware identifiers to declared parameters.
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    registry: Arc<MiddlewareRegistry>,
    global: Vec<String>,
}

impl MetadataExtractor {
    /// Creates an extractor with the server-wide middleware list.
    #[must_use]
    pub fn new<I, S>(registry: Arc<MiddlewareRegistry>, global: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            registry,
            global: global.into_iter().map(Into::into).collect(),
        }
    }

    /// The registry used for lookups.
    #[must_use]
    pub fn registry(&self) -> &MiddlewareRegistry {
        &self.registry
    }

    /// Server-wide middleware identifiers.
    #[must_use]
    pub fn global(&self) -> &[String] {
        &self.global
    }

    /// Extracts parameters for a list of middleware identifiers.
    ///
    /// Failures are logged at debug level and contribute nothing.
    pub fn extract<I, S>(&self, identifiers: I) -> Vec<ParameterDescriptor>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let types: Vec<String> = normalize(identifiers)
            .iter()
            .flat_map(|name| self.registry.resolve(name))
            .filter(|type_name| seen.insert(type_name.clone()))
            .collect();

        let mut parameters = Vec::new();
        for type_name in &types {
            match self.registry.parameters(type_name) {
                Ok(declared) => parameters.extend(declared),
                Err(e) => {
                    tracing::debug!(
                        middleware = %type_name,
                        error = %e,
                        "Skipping middleware parameters"
                    );
                }
            }
        }
        parameters
    }

    /// Extracts parameters for a route: global middleware first, then the
    /// route's own.
    pub fn extract_for_route(&self, route: &RouteDescriptor) -> Vec<ParameterDescriptor> {
        self.extract(self.global.iter().chain(route.middleware()))
    }
}
