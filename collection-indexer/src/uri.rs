//! Public URIs of records.

use collection_indexer_shared::{Record, RecordKind};
use heck::ToKebabCase;

use crate::errors::UriError;

const ACTION: &str = "show";

/// Builds the public URI of a record.
///
/// Routing follows the public site: simple pages live at their slug,
/// exhibit pages under their exhibit, other sluggable records under
/// `/{controller}/show/{slug}` and everything else under
/// `/{controller}/show/{id}`.
#[derive(Debug, Clone)]
pub struct UriResolver {
    base_url: String,
}

impl UriResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resolve(&self, record: &Record) -> Result<String, UriError> {
        let missing_slug = || UriError::MissingSlug(record.key());

        let uri = match &record.kind {
            RecordKind::SimplePage => {
                let slug = record.slug.as_deref().ok_or_else(missing_slug)?;
                format!("{}/{}", self.base_url, slug)
            }
            RecordKind::ExhibitPage => {
                let slug = record.slug.as_deref().ok_or_else(missing_slug)?;
                let container = record.container.as_ref().ok_or_else(missing_slug)?;
                format!(
                    "{}/{}",
                    self.slug_uri(&container.kind, &container.slug),
                    slug
                )
            }
            kind => match record.slug.as_deref() {
                Some(slug) => self.slug_uri(kind, slug),
                None => format!(
                    "{}/{}/{}/{}",
                    self.base_url,
                    controller(kind),
                    ACTION,
                    record.id
                ),
            },
        };

        Ok(public_uri(&uri))
    }

    fn slug_uri(&self, kind: &RecordKind, slug: &str) -> String {
        format!("{}/{}/{}/{}", self.base_url, controller(kind), ACTION, slug)
    }
}

/// Controller of a record kind: the kebab-cased, pluralised table name.
pub fn controller(kind: &RecordKind) -> String {
    pluralize(&kind.table_name().to_kebab_case())
}

fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{}ies", stem);
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|end| word.ends_with(end)) {
        format!("{}es", word)
    } else {
        format!("{}s", word)
    }
}

/// Rewrite the first `/admin/` segment so admin-side URIs point at the public site.
fn public_uri(uri: &str) -> String {
    uri.replacen("/admin/", "/", 1)
}
