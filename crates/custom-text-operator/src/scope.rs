//! Scopes and the composite external identifier.
//!
//! Every customization record is addressed by a language and, for
//! tenant-scoped categories, a tenant id. The external identifier persisted in
//! declared state is derived from those two dimensions and must decode back to
//! the same scope.

use std::fmt::{self, Display};

use snafu::{OptionExt, Snafu, ensure};

use crate::state::AttributeBag;

/// Attribute holding the external identifier.
pub const ID_ATTRIBUTE: &str = "id";

/// Attribute holding the BCP-47 language code.
pub const LANGUAGE_ATTRIBUTE: &str = "language";

/// Attribute holding the tenant id of tenant-scoped categories.
pub const TENANT_ID_ATTRIBUTE: &str = "tenant_id";

const ID_SEPARATOR: char = '_';

#[derive(Debug, Snafu)]
pub enum ScopeError {
    #[snafu(display("the \"{LANGUAGE_ATTRIBUTE}\" attribute must be a known, non-empty string"))]
    MissingLanguage,

    #[snafu(display("the \"{TENANT_ID_ATTRIBUTE}\" attribute must be a known, non-empty string"))]
    MissingTenantId,
}

/// The (tenant id, language) pair a remote customization record is addressed
/// by. `tenant_id` is only set for tenant-scoped categories.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Scope {
    pub tenant_id: Option<String>,
    pub language: String,
}

impl Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tenant_id {
            Some(tenant_id) => write!(f, "{tenant_id}/{language}", language = self.language),
            None => f.write_str(&self.language),
        }
    }
}

/// How a text category derives its scope and external identifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScopePolicy {
    /// Instance-wide defaults, addressed by language alone.
    Global,

    /// Per-tenant customizations, addressed by tenant id and language.
    Tenant,
}

impl ScopePolicy {
    /// Resolves the scope from the named attributes of a declared bag.
    pub fn resolve(self, declared: &AttributeBag) -> Result<Scope, ScopeError> {
        let language = declared
            .get_string(LANGUAGE_ATTRIBUTE)
            .context(MissingLanguageSnafu)?;
        ensure!(!language.is_empty(), MissingLanguageSnafu);

        let tenant_id = match self {
            Self::Global => None,
            Self::Tenant => {
                let tenant_id = declared
                    .get_string(TENANT_ID_ATTRIBUTE)
                    .context(MissingTenantIdSnafu)?;
                ensure!(!tenant_id.is_empty(), MissingTenantIdSnafu);
                Some(tenant_id.to_owned())
            }
        };

        Ok(Scope {
            tenant_id,
            language: language.to_owned(),
        })
    }

    /// Derives the external identifier of a scope: the language alone, or
    /// `{tenant_id}_{language}` for tenant-scoped categories.
    pub fn encode(self, scope: &Scope) -> String {
        match self {
            Self::Global => scope.language.clone(),
            Self::Tenant => format!(
                "{tenant_id}{ID_SEPARATOR}{language}",
                tenant_id = scope.tenant_id.as_deref().unwrap_or_default(),
                language = scope.language
            ),
        }
    }

    /// Recovers the scope from a persisted external identifier.
    ///
    /// Tenant-scoped identifiers split on the first separator. Identifiers
    /// that do not split cleanly (legacy state, or an empty part) fall back to
    /// the bag's named scope attributes, as does an empty identifier.
    pub fn decode(self, id: &str, fallback: &AttributeBag) -> Result<Scope, ScopeError> {
        match self {
            Self::Global => {
                if id.is_empty() {
                    return self.resolve(fallback);
                }
                Ok(Scope {
                    tenant_id: None,
                    language: id.to_owned(),
                })
            }
            Self::Tenant => {
                if let Some((tenant_id, language)) = id.split_once(ID_SEPARATOR)
                    && !tenant_id.is_empty()
                    && !language.is_empty()
                {
                    return Ok(Scope {
                        tenant_id: Some(tenant_id.to_owned()),
                        language: language.to_owned(),
                    });
                }
                self.resolve(fallback)
            }
        }
    }
}
