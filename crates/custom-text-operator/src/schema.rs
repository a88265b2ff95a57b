//! Attribute descriptor trees and the source-to-resource transform.
//!
//! The generated descriptor sets describe every attribute the platform's
//! text messages expose, including platform-computed ones. The consumer-facing
//! schema is derived from them: selected top-level attributes are dropped
//! (scope dimensions that travel out-of-band) and every remaining attribute is
//! marked user-suppliable.

use std::collections::BTreeMap;

/// Documentation strings and flags shared by every attribute descriptor.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AttributeMeta {
    pub description: String,
    pub markdown_description: String,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub deprecation_message: String,
}

/// An attribute descriptor as produced by the generated descriptor source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SourceAttribute {
    String(AttributeMeta),
    Bool(AttributeMeta),
    Int64(AttributeMeta),
    SingleNested {
        meta: AttributeMeta,
        attributes: BTreeMap<String, SourceAttribute>,
    },
    ListNested {
        meta: AttributeMeta,
        attributes: BTreeMap<String, SourceAttribute>,
    },

    /// Emitted by generated descriptor code for attribute kinds this library
    /// does not model. The transform degrades these to an optional free-form
    /// string instead of failing, so newer descriptor sets keep working.
    Unknown,
}

/// An attribute descriptor in the consumer-facing schema. Unlike
/// [`SourceAttribute`] there is no unknown kind and no attribute is ever
/// platform-computed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResourceAttribute {
    String(AttributeMeta),
    Bool(AttributeMeta),
    Int64(AttributeMeta),
    SingleNested {
        meta: AttributeMeta,
        attributes: BTreeMap<String, ResourceAttribute>,
    },
    ListNested {
        meta: AttributeMeta,
        attributes: BTreeMap<String, ResourceAttribute>,
    },
}

impl ResourceAttribute {
    pub fn meta(&self) -> &AttributeMeta {
        match self {
            Self::String(meta)
            | Self::Bool(meta)
            | Self::Int64(meta)
            | Self::SingleNested { meta, .. }
            | Self::ListNested { meta, .. } => meta,
        }
    }
}

/// A full descriptor tree as produced by the generated descriptor source.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SourceSchema {
    pub description: String,
    pub markdown_description: String,
    pub deprecation_message: String,
    pub attributes: BTreeMap<String, SourceAttribute>,
}

/// The consumer-facing descriptor tree of one text category.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResourceSchema {
    pub description: String,
    pub markdown_description: String,
    pub deprecation_message: String,
    pub attributes: BTreeMap<String, ResourceAttribute>,
}

/// Derives the consumer-facing schema from a generated descriptor tree,
/// dropping the named top-level attributes.
pub fn resource_schema(source: &SourceSchema, exclude_top_level: &[&str]) -> ResourceSchema {
    ResourceSchema {
        description: source.description.clone(),
        markdown_description: source.markdown_description.clone(),
        deprecation_message: source.deprecation_message.clone(),
        attributes: resource_attributes(&source.attributes, exclude_top_level),
    }
}

/// Transforms a generated attribute descriptor map into its consumer-facing
/// counterpart, dropping the named top-level attributes. Exclusions only
/// apply at the top level, nested attributes are carried over in full.
pub fn resource_attributes(
    source: &BTreeMap<String, SourceAttribute>,
    exclude_top_level: &[&str],
) -> BTreeMap<String, ResourceAttribute> {
    source
        .iter()
        .filter(|(name, _)| !exclude_top_level.contains(&name.as_str()))
        .map(|(name, attribute)| (name.clone(), resource_attribute(attribute)))
        .collect()
}

fn resource_attribute(source: &SourceAttribute) -> ResourceAttribute {
    match source {
        SourceAttribute::String(meta) => ResourceAttribute::String(user_suppliable(meta)),
        SourceAttribute::Bool(meta) => ResourceAttribute::Bool(user_suppliable(meta)),
        SourceAttribute::Int64(meta) => ResourceAttribute::Int64(user_suppliable(meta)),
        SourceAttribute::SingleNested { meta, attributes } => ResourceAttribute::SingleNested {
            meta: user_suppliable(meta),
            attributes: resource_attributes(attributes, &[]),
        },
        SourceAttribute::ListNested { meta, attributes } => ResourceAttribute::ListNested {
            meta: user_suppliable(meta),
            attributes: resource_attributes(attributes, &[]),
        },
        SourceAttribute::Unknown => ResourceAttribute::String(AttributeMeta {
            optional: true,
            ..AttributeMeta::default()
        }),
    }
}

fn user_suppliable(meta: &AttributeMeta) -> AttributeMeta {
    AttributeMeta {
        computed: false,
        ..meta.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_attr(description: &str, required: bool, computed: bool) -> SourceAttribute {
        SourceAttribute::String(AttributeMeta {
            description: description.to_owned(),
            required,
            optional: !required,
            computed,
            ..AttributeMeta::default()
        })
    }

    fn sample_tree() -> BTreeMap<String, SourceAttribute> {
        BTreeMap::from([
            ("id".to_owned(), string_attr("unique identifier", false, true)),
            ("language".to_owned(), string_attr("language code", true, false)),
            ("tenant_id".to_owned(), string_attr("tenant", true, false)),
            (
                "login_text".to_owned(),
                SourceAttribute::SingleNested {
                    meta: AttributeMeta {
                        optional: true,
                        ..AttributeMeta::default()
                    },
                    attributes: BTreeMap::from([
                        ("title".to_owned(), string_attr("screen title", false, true)),
                        (
                            "secret".to_owned(),
                            SourceAttribute::String(AttributeMeta {
                                sensitive: true,
                                optional: true,
                                ..AttributeMeta::default()
                            }),
                        ),
                    ]),
                },
            ),
            ("future_kind".to_owned(), SourceAttribute::Unknown),
        ])
    }

    #[test]
    fn excluded_top_level_names_are_absent() {
        let target = resource_attributes(&sample_tree(), &["tenant_id"]);

        assert!(!target.contains_key("tenant_id"));
        assert!(target.contains_key("id"));
        assert!(target.contains_key("language"));
        assert!(target.contains_key("login_text"));
    }

    #[test]
    fn exclusion_does_not_apply_below_the_top_level() {
        // A nested attribute sharing an excluded name must survive.
        let source = BTreeMap::from([(
            "outer".to_owned(),
            SourceAttribute::SingleNested {
                meta: AttributeMeta::default(),
                attributes: BTreeMap::from([(
                    "tenant_id".to_owned(),
                    string_attr("nested tenant", false, false),
                )]),
            },
        )]);

        let target = resource_attributes(&source, &["tenant_id"]);
        let ResourceAttribute::SingleNested { attributes, .. } = &target["outer"] else {
            unreachable!("outer must stay single-nested");
        };
        assert!(attributes.contains_key("tenant_id"));
    }

    #[test]
    fn computed_is_forced_false_recursively() {
        let target = resource_attributes(&sample_tree(), &[]);

        assert!(!target["id"].meta().computed);
        let ResourceAttribute::SingleNested { attributes, .. } = &target["login_text"] else {
            unreachable!("login_text must stay single-nested");
        };
        assert!(!attributes["title"].meta().computed);
    }

    #[test]
    fn flags_and_documentation_are_preserved() {
        let target = resource_attributes(&sample_tree(), &[]);

        let ResourceAttribute::String(language) = &target["language"] else {
            unreachable!("language must stay a string attribute");
        };
        assert!(language.required);
        assert!(!language.optional);
        assert_eq!(language.description, "language code");

        let ResourceAttribute::SingleNested { attributes, .. } = &target["login_text"] else {
            unreachable!("login_text must stay single-nested");
        };
        assert!(attributes["secret"].meta().sensitive);
    }

    #[test]
    fn unknown_kinds_degrade_to_an_optional_string() {
        let target = resource_attributes(&sample_tree(), &[]);

        assert_eq!(
            target["future_kind"],
            ResourceAttribute::String(AttributeMeta {
                optional: true,
                ..AttributeMeta::default()
            })
        );
    }

    #[test]
    fn list_nested_children_are_transformed() {
        let source = BTreeMap::from([(
            "screens".to_owned(),
            SourceAttribute::ListNested {
                meta: AttributeMeta::default(),
                attributes: BTreeMap::from([(
                    "title".to_owned(),
                    string_attr("screen title", false, true),
                )]),
            },
        )]);

        let target = resource_attributes(&source, &[]);
        let ResourceAttribute::ListNested { attributes, .. } = &target["screens"] else {
            unreachable!("screens must stay list-nested");
        };
        assert!(!attributes["title"].meta().computed);
    }
}
