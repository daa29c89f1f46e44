//! Static descriptions of the proxied upstream routes.
//!
//! A [`RouteSpec`] couples a route name with a URL template and the names of
//! the caller parameters and server-held secrets the template consumes. The
//! [`RouteTable`] is built once at startup; template mistakes surface there
//! instead of on the first request.

use std::collections::{BTreeMap, BTreeSet};

/// Route relaying the inventory spreadsheet service.
pub const INVENTORY_ROUTE: &str = "inventory";
/// Route relaying artist artwork lookups by MusicBrainz id.
pub const ARTIST_ART_ROUTE: &str = "artist-art";
/// Route relaying release searches.
pub const RELEASE_SEARCH_ROUTE: &str = "release-search";

/// Secret embedded in the inventory script URL.
pub const INVENTORY_TOKEN_SECRET: &str = "inventory_token";
/// API key for the artist artwork service.
pub const FANART_API_KEY_SECRET: &str = "fanart_api_key";
/// Personal access token for the release search service.
pub const DISCOGS_TOKEN_SECRET: &str = "discogs_token";

const INVENTORY_TEMPLATE: &str =
    "https://script.google.com/macros/s/{inventory_token}/exec?path=INVENTARIO&action=read";
const ARTIST_ART_TEMPLATE: &str =
    "https://webservice.fanart.tv/v3/music/{mbid}?api_key={fanart_api_key}";
const RELEASE_SEARCH_TEMPLATE: &str =
    "https://api.discogs.com/database/search?q={q}&type=release&token={discogs_token}";

/// Problems detected while building route specs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteSpecError {
    /// Route name was blank.
    #[error("route name must not be empty")]
    EmptyName,
    /// A `{` had no matching `}` or a `}` had no opening `{`.
    #[error("route {route}: unbalanced braces in URL template")]
    UnbalancedBraces { route: String },
    /// A placeholder had no name.
    #[error("route {route}: empty placeholder in URL template")]
    EmptyPlaceholder { route: String },
    /// A placeholder is neither a declared parameter nor a declared secret.
    #[error("route {route}: placeholder {{{name}}} is not declared")]
    UndeclaredPlaceholder { route: String, name: String },
    /// A name is declared as both a parameter and a secret.
    #[error("route {route}: {name} is declared as both parameter and secret")]
    AmbiguousName { route: String, name: String },
    /// A declared parameter or secret never appears in the template.
    #[error("route {route}: {name} is declared but unused")]
    UnusedName { route: String, name: String },
    /// Two routes share a name.
    #[error("duplicate route: {route}")]
    DuplicateRoute { route: String },
    /// Rendering found no value for a placeholder.
    #[error("route {route}: no value for placeholder {{{name}}}")]
    UnresolvedPlaceholder { route: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Parsed URL template with `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl UrlTemplate {
    fn parse(route: &str, raw: &str) -> Result<Self, RouteSpecError> {
        let unbalanced = || RouteSpecError::UnbalancedBraces {
            route: route.to_owned(),
        };
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') | None => return Err(unbalanced()),
                            Some(other) => name.push(other),
                        }
                    }
                    if name.trim().is_empty() {
                        return Err(RouteSpecError::EmptyPlaceholder {
                            route: route.to_owned(),
                        });
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name));
                }
                '}' => return Err(unbalanced()),
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self {
            raw: raw.to_owned(),
            segments,
        })
    }

    /// Template text as configured.
    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute placeholder values. Values are inserted as given; callers
    /// encode caller-supplied values beforehand.
    pub(crate) fn render(
        &self,
        route: &str,
        values: &BTreeMap<&str, String>,
    ) -> Result<String, RouteSpecError> {
        let mut rendered = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Placeholder(name) => {
                    let value = values.get(name.as_str()).ok_or_else(|| {
                        RouteSpecError::UnresolvedPlaceholder {
                            route: route.to_owned(),
                            name: name.clone(),
                        }
                    })?;
                    rendered.push_str(value);
                }
            }
        }
        Ok(rendered)
    }
}

/// Static description of one proxied endpoint.
///
/// # Examples
/// ```
/// use gateway::domain::RouteSpec;
///
/// let spec = RouteSpec::new(
///     "release-search",
///     "https://api.example.test/search?q={q}&token={token}",
///     ["q"],
///     ["token"],
/// )
/// .unwrap();
/// assert!(spec.required_params().contains("q"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    name: String,
    url_template: UrlTemplate,
    required_params: BTreeSet<String>,
    secret_refs: BTreeSet<String>,
}

impl RouteSpec {
    /// Build and validate a route spec.
    ///
    /// Every placeholder must be a declared parameter or secret and every
    /// declared name must appear in the template.
    pub fn new<P, S>(
        name: &str,
        url_template: &str,
        required_params: P,
        secret_refs: S,
    ) -> Result<Self, RouteSpecError>
    where
        P: IntoIterator,
        P::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        if name.trim().is_empty() {
            return Err(RouteSpecError::EmptyName);
        }
        let template = UrlTemplate::parse(name, url_template)?;
        let required_params: BTreeSet<String> =
            required_params.into_iter().map(Into::into).collect();
        let secret_refs: BTreeSet<String> = secret_refs.into_iter().map(Into::into).collect();

        if let Some(shared) = required_params.intersection(&secret_refs).next() {
            return Err(RouteSpecError::AmbiguousName {
                route: name.to_owned(),
                name: shared.clone(),
            });
        }

        let used: BTreeSet<&str> = template.placeholders().collect();
        if let Some(undeclared) = used
            .iter()
            .find(|placeholder| {
                !required_params.contains(**placeholder) && !secret_refs.contains(**placeholder)
            })
        {
            return Err(RouteSpecError::UndeclaredPlaceholder {
                route: name.to_owned(),
                name: (*undeclared).to_owned(),
            });
        }
        if let Some(unused) = required_params
            .iter()
            .chain(secret_refs.iter())
            .find(|declared| !used.contains(declared.as_str()))
        {
            return Err(RouteSpecError::UnusedName {
                route: name.to_owned(),
                name: unused.clone(),
            });
        }

        Ok(Self {
            name: name.to_owned(),
            url_template: template,
            required_params,
            secret_refs,
        })
    }

    /// Route name, also the request path segment.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Upstream URL template.
    pub fn url_template(&self) -> &UrlTemplate {
        &self.url_template
    }

    /// Caller parameters that must be present and non-empty.
    pub fn required_params(&self) -> &BTreeSet<String> {
        &self.required_params
    }

    /// Server-held secrets the template consumes.
    pub fn secret_refs(&self) -> &BTreeSet<String> {
        &self.secret_refs
    }
}

/// Lookup table of proxied routes keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: BTreeMap<String, RouteSpec>,
}

impl RouteTable {
    /// Build a table, rejecting duplicate route names.
    pub fn new(specs: impl IntoIterator<Item = RouteSpec>) -> Result<Self, RouteSpecError> {
        let mut routes = BTreeMap::new();
        for spec in specs {
            let name = spec.name().to_owned();
            if routes.insert(name.clone(), spec).is_some() {
                return Err(RouteSpecError::DuplicateRoute { route: name });
            }
        }
        Ok(Self { routes })
    }

    /// The inventory, artist-art and release-search routes.
    ///
    /// # Examples
    /// ```
    /// use gateway::domain::RouteTable;
    ///
    /// let table = RouteTable::standard().unwrap();
    /// assert!(table.get("release-search").is_some());
    /// ```
    pub fn standard() -> Result<Self, RouteSpecError> {
        Self::new([
            RouteSpec::new(
                INVENTORY_ROUTE,
                INVENTORY_TEMPLATE,
                Vec::<String>::new(),
                [INVENTORY_TOKEN_SECRET],
            )?,
            RouteSpec::new(
                ARTIST_ART_ROUTE,
                ARTIST_ART_TEMPLATE,
                ["mbid"],
                [FANART_API_KEY_SECRET],
            )?,
            RouteSpec::new(
                RELEASE_SEARCH_ROUTE,
                RELEASE_SEARCH_TEMPLATE,
                ["q"],
                [DISCOGS_TOKEN_SECRET],
            )?,
        ])
    }

    /// Route spec registered under `name`.
    pub fn get(&self, name: &str) -> Option<&RouteSpec> {
        self.routes.get(name)
    }

    /// Registered routes ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &RouteSpec> {
        self.routes.values()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn spec(template: &str, params: &[&str], secrets: &[&str]) -> Result<RouteSpec, RouteSpecError> {
        RouteSpec::new(
            "lookup",
            template,
            params.iter().copied(),
            secrets.iter().copied(),
        )
    }

    #[test]
    fn standard_table_declares_expected_inputs() {
        let table = RouteTable::standard().expect("standard routes are valid");
        let names: Vec<&str> = table.iter().map(RouteSpec::name).collect();
        assert_eq!(names, vec!["artist-art", "inventory", "release-search"]);

        let search = table.get(RELEASE_SEARCH_ROUTE).expect("release search");
        assert!(search.required_params().contains("q"));
        assert!(search.secret_refs().contains(DISCOGS_TOKEN_SECRET));

        let inventory = table.get(INVENTORY_ROUTE).expect("inventory");
        assert!(inventory.required_params().is_empty());
    }

    #[rstest]
    #[case("https://x.test/{q", RouteSpecError::UnbalancedBraces { route: "lookup".into() })]
    #[case("https://x.test/q}", RouteSpecError::UnbalancedBraces { route: "lookup".into() })]
    #[case("https://x.test/{{q}}", RouteSpecError::UnbalancedBraces { route: "lookup".into() })]
    #[case("https://x.test/{}?q={q}", RouteSpecError::EmptyPlaceholder { route: "lookup".into() })]
    fn rejects_malformed_templates(#[case] template: &str, #[case] expected: RouteSpecError) {
        assert_eq!(spec(template, &["q"], &[]), Err(expected));
    }

    #[test]
    fn rejects_undeclared_placeholders() {
        let err = spec("https://x.test/{id}?q={q}", &["q"], &[]).expect_err("undeclared");
        assert_eq!(
            err,
            RouteSpecError::UndeclaredPlaceholder {
                route: "lookup".into(),
                name: "id".into()
            }
        );
    }

    #[test]
    fn rejects_unused_declarations() {
        let err = spec("https://x.test/?q={q}", &["q"], &["token"]).expect_err("unused");
        assert!(matches!(err, RouteSpecError::UnusedName { name, .. } if name == "token"));
    }

    #[test]
    fn rejects_names_declared_twice() {
        let err = spec("https://x.test/?q={q}", &["q"], &["q"]).expect_err("ambiguous");
        assert!(matches!(err, RouteSpecError::AmbiguousName { .. }));
    }

    #[test]
    fn rejects_duplicate_routes() {
        let first = spec("https://x.test/", &[], &[]).expect("valid");
        let err = RouteTable::new([first.clone(), first]).expect_err("duplicate");
        assert_eq!(
            err,
            RouteSpecError::DuplicateRoute {
                route: "lookup".into()
            }
        );
    }

    #[test]
    fn renders_values_in_place() {
        let route = spec("https://x.test/{id}?key={key}", &["id"], &["key"]).expect("valid");
        let values = BTreeMap::from([("id", "42".to_owned()), ("key", "k".to_owned())]);
        let rendered = route
            .url_template()
            .render(route.name(), &values)
            .expect("renders");
        assert_eq!(rendered, "https://x.test/42?key=k");
    }

    #[test]
    fn render_reports_missing_values() {
        let route = spec("https://x.test/{id}", &["id"], &[]).expect("valid");
        let err = route
            .url_template()
            .render(route.name(), &BTreeMap::new())
            .expect_err("missing value");
        assert!(matches!(err, RouteSpecError::UnresolvedPlaceholder { .. }));
    }
}
