//! The override reconciliation controller.
//!
//! One controller drives all four lifecycle operations of a single text
//! category against the administrative API. It is stateless between
//! invocations; the declared bag passed in by the host and the remote API are
//! the only sources of truth.

use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::{
    category::TextCategory,
    client::{AdminTextClient, ClientError},
    schema::{self, ResourceSchema},
    scope::{ID_ATTRIBUTE, LANGUAGE_ATTRIBUTE, Scope, ScopeError, ScopePolicy, TENANT_ID_ATTRIBUTE},
    state::AttributeBag,
    transcode::{self, Classification, TranscodeError},
};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to resolve the scope of {type_name}"))]
    ResolveScope {
        source: ScopeError,
        type_name: &'static str,
    },

    #[snafu(display("failed to build the {type_name} request payload"))]
    BuildRequest {
        source: TranscodeError,
        type_name: &'static str,
    },

    #[snafu(display("failed to set {type_name} for scope {scope}"))]
    SetText {
        source: ClientError,
        type_name: &'static str,
        scope: Scope,
    },

    #[snafu(display("failed to read {type_name} for scope {scope}"))]
    GetText {
        source: ClientError,
        type_name: &'static str,
        scope: Scope,
    },

    #[snafu(display("failed to decode the {type_name} record for scope {scope}"))]
    DecodeRecord {
        source: TranscodeError,
        type_name: &'static str,
        scope: Scope,
    },

    #[snafu(display("failed to reset {type_name} for scope {scope} to its default"))]
    ResetText {
        source: ClientError,
        type_name: &'static str,
        scope: Scope,
    },
}

/// Result of reconciling remote state into declared state on [`read`].
///
/// [`read`]: TextOverrideController::read
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReadOutcome {
    /// An override exists; the declared bag was refreshed from it.
    Refreshed,

    /// The platform reports its built-in default, so no customization exists
    /// anymore. The host must remove this instance from declared state.
    Removed,
}

/// Reconciles one text category's declared overrides against the
/// administrative API.
pub struct TextOverrideController<C> {
    category: TextCategory,
    client: C,
}

impl<C> TextOverrideController<C> {
    pub fn new(category: TextCategory, client: C) -> Self {
        Self { category, client }
    }

    /// The unique type name under which the host registers this resource.
    pub fn type_name(&self) -> &'static str {
        self.category.type_name()
    }

    /// The consumer-facing descriptor tree of this category.
    ///
    /// Globally scoped categories drop the tenant dimension, it has no
    /// meaning there. Every attribute comes out user-suppliable.
    pub fn schema(&self) -> ResourceSchema {
        let exclude: &[&str] = match self.category.scope_policy() {
            ScopePolicy::Global => &[TENANT_ID_ATTRIBUTE],
            ScopePolicy::Tenant => &[],
        };
        schema::resource_schema(&self.category.source_schema(), exclude)
    }
}

impl<C> TextOverrideController<C>
where
    C: AdminTextClient,
{
    /// Pushes the declared texts as a new override and attaches the external
    /// identifier and scope attributes to the bag.
    pub async fn create(&self, declared: &mut AttributeBag) -> Result<(), Error> {
        let scope = self.declared_scope(declared)?;
        self.push(declared, &scope).await?;

        let id = self.category.scope_policy().encode(&scope);
        debug!(
            type_name = self.type_name(),
            %scope,
            %id,
            "created custom text override"
        );
        attach_scope(declared, &scope, id);
        Ok(())
    }

    /// Refreshes the declared bag from the remote record.
    ///
    /// A record flagged as platform default, like a record the API reports
    /// missing, yields [`ReadOutcome::Removed`]: the override was reverted
    /// out of band and the instance must leave declared state.
    pub async fn read(&self, state: &mut AttributeBag) -> Result<ReadOutcome, Error> {
        let policy = self.category.scope_policy();
        let id = state.get_string(ID_ATTRIBUTE).unwrap_or_default().to_owned();
        let scope = policy.decode(&id, state).context(ResolveScopeSnafu {
            type_name: self.type_name(),
        })?;

        let record = match self.client.get_text(self.category, &scope).await {
            Ok(record) => record,
            Err(source) if source.is_not_found() => {
                debug!(
                    type_name = self.type_name(),
                    %scope,
                    "remote record not found, removing instance"
                );
                return Ok(ReadOutcome::Removed);
            }
            Err(source) => {
                return Err(source).context(GetTextSnafu {
                    type_name: self.type_name(),
                    scope,
                });
            }
        };

        match transcode::classify(record) {
            Classification::Absent => {
                debug!(
                    type_name = self.type_name(),
                    %scope,
                    "platform reports default text, removing instance"
                );
                Ok(ReadOutcome::Removed)
            }
            Classification::Override(content) => {
                // Only the customization fields come from the remote record,
                // the scope attributes are reattached from the decoded scope.
                let content =
                    self.category
                        .project_content(content)
                        .context(DecodeRecordSnafu {
                            type_name: self.type_name(),
                            scope: scope.clone(),
                        })?;
                state.merge_json_object(&content);

                let id = policy.encode(&scope);
                attach_scope(state, &scope, id);
                Ok(ReadOutcome::Refreshed)
            }
        }
    }

    /// Pushes the declared texts over the existing override. The external
    /// identifier is immutable after creation and is left untouched.
    pub async fn update(&self, declared: &mut AttributeBag) -> Result<(), Error> {
        let scope = self.declared_scope(declared)?;
        self.push(declared, &scope).await?;

        let id = match declared.get_string(ID_ATTRIBUTE) {
            Some(id) if !id.is_empty() => id.to_owned(),
            _ => self.category.scope_policy().encode(&scope),
        };
        debug!(
            type_name = self.type_name(),
            %scope,
            %id,
            "updated custom text override"
        );
        attach_scope(declared, &scope, id);
        Ok(())
    }

    /// Reverts the scope to the platform default. A record the API already
    /// reports missing counts as success.
    pub async fn delete(&self, state: &AttributeBag) -> Result<(), Error> {
        let scope = self.declared_scope(state)?;

        match self.client.reset_text(self.category, &scope).await {
            Ok(()) => {
                debug!(
                    type_name = self.type_name(),
                    %scope,
                    "reset custom text override to default"
                );
                Ok(())
            }
            Err(source) if source.is_not_found() => {
                debug!(
                    type_name = self.type_name(),
                    %scope,
                    "remote record already absent"
                );
                Ok(())
            }
            Err(source) => Err(source).context(ResetTextSnafu {
                type_name: self.type_name(),
                scope,
            }),
        }
    }

    fn declared_scope(&self, declared: &AttributeBag) -> Result<Scope, Error> {
        self.category
            .scope_policy()
            .resolve(declared)
            .context(ResolveScopeSnafu {
                type_name: self.type_name(),
            })
    }

    async fn push(&self, declared: &AttributeBag, scope: &Scope) -> Result<(), Error> {
        let content = self
            .category
            .request_content(declared)
            .context(BuildRequestSnafu {
                type_name: self.type_name(),
            })?;

        self.client
            .set_text(self.category, scope, content)
            .await
            .context(SetTextSnafu {
                type_name: self.type_name(),
                scope: scope.clone(),
            })
    }
}

/// Writes the external identifier and scope attributes back into the bag.
/// They are invariant after the first create, so this is idempotent for an
/// unchanged scope.
fn attach_scope(bag: &mut AttributeBag, scope: &Scope, id: String) {
    bag.set_string(ID_ATTRIBUTE, id);
    bag.set_string(LANGUAGE_ATTRIBUTE, scope.language.clone());
    if let Some(tenant_id) = &scope.tenant_id {
        bag.set_string(TENANT_ID_ATTRIBUTE, tenant_id.clone());
    }
}
