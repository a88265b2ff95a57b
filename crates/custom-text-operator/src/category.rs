//! The text category table.
//!
//! Every customization domain the platform exposes is one [`TextCategory`]
//! variant. A category bundles everything that differs between domains: the
//! stable type name, the scope policy, the set-request field allow-list, the
//! typed request content shape, and the generated source descriptor tree.
//! The reconciliation controller is written once against this table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter};

use crate::{
    schema::{AttributeMeta, SourceAttribute, SourceSchema},
    scope::{ID_ATTRIBUTE, LANGUAGE_ATTRIBUTE, ScopePolicy, TENANT_ID_ATTRIBUTE},
    state::AttributeBag,
    transcode::{self, TranscodeError},
};

/// Fields recognized by the message-text set-requests.
const MESSAGE_TEXT_FIELDS: &[&str] = &[
    "title",
    "pre_header",
    "subject",
    "greeting",
    "text",
    "button_text",
    "footer_text",
];

/// The SMS one-time-passcode message is delivered as a plain SMS body, its
/// set-request only recognizes the text itself.
const SMS_OTP_TEXT_FIELDS: &[&str] = &["text"];

/// Top-level screen objects recognized by the login-text set-request.
const LOGIN_TEXT_FIELDS: &[&str] = &[
    "select_account_text",
    "login_text",
    "password_text",
    "logout_text",
];

/// The customization domains of the identity platform.
#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, Hash, PartialEq)]
#[strum(serialize_all = "snake_case")]
pub enum TextCategory {
    /// Texts of the hosted login screens.
    LoginTexts,

    /// The password-reset notification message.
    PasswordResetMessage,

    /// The phone-number verification message.
    VerifyPhoneMessage,

    /// The SMS one-time-passcode message.
    VerifySmsOtpMessage,
}

impl TextCategory {
    /// The unique type name under which the host tool registers this
    /// category's resource.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::LoginTexts => "default_login_texts",
            Self::PasswordResetMessage => "password_reset_message_text",
            Self::VerifyPhoneMessage => "verify_phone_message_text",
            Self::VerifySmsOtpMessage => "default_verify_sms_otp_message_text",
        }
    }

    /// Only the phone-verification message is customized per tenant; the
    /// other categories are instance-wide defaults.
    pub fn scope_policy(self) -> ScopePolicy {
        match self {
            Self::VerifyPhoneMessage => ScopePolicy::Tenant,
            Self::LoginTexts | Self::PasswordResetMessage | Self::VerifySmsOtpMessage => {
                ScopePolicy::Global
            }
        }
    }

    /// Attribute names this category's set-request recognizes.
    pub fn request_fields(self) -> &'static [&'static str] {
        match self {
            Self::LoginTexts => LOGIN_TEXT_FIELDS,
            Self::PasswordResetMessage | Self::VerifyPhoneMessage => MESSAGE_TEXT_FIELDS,
            Self::VerifySmsOtpMessage => SMS_OTP_TEXT_FIELDS,
        }
    }

    /// Builds this category's set-request content from declared attributes.
    /// Unrecognized attributes are dropped, malformed recognized ones error.
    pub fn request_content(
        self,
        declared: &AttributeBag,
    ) -> Result<Map<String, Value>, TranscodeError> {
        self.project_content(declared.to_json_object())
    }

    /// Projects a JSON object through this category's typed content shape.
    ///
    /// Serves both directions: declared attributes on their way into a
    /// set-request, and a fetched override record on its way into declared
    /// state. Fields the shape does not recognize are dropped at every
    /// depth, recognized fields of the wrong shape error.
    pub fn project_content(
        self,
        content: Map<String, Value>,
    ) -> Result<Map<String, Value>, TranscodeError> {
        let fields = self.request_fields();
        match self {
            Self::LoginTexts => transcode::project_content::<LoginTextContent>(content, fields),
            Self::PasswordResetMessage | Self::VerifyPhoneMessage => {
                transcode::project_content::<MessageTextContent>(content, fields)
            }
            Self::VerifySmsOtpMessage => {
                transcode::project_content::<SmsOtpTextContent>(content, fields)
            }
        }
    }

    /// The generated source descriptor tree of this category.
    ///
    /// Descriptor generation itself lives outside this crate; these trees
    /// mirror its output shape, including the platform-computed identifier
    /// and the tenant dimension that global categories later exclude.
    pub fn source_schema(self) -> SourceSchema {
        match self {
            Self::LoginTexts => login_text_schema(),
            Self::PasswordResetMessage => {
                message_text_schema("Customized texts of the password-reset message")
            }
            Self::VerifyPhoneMessage => {
                message_text_schema("Customized texts of the phone-verification message")
            }
            Self::VerifySmsOtpMessage => {
                message_text_schema("Customized text of the SMS one-time-passcode message")
            }
        }
    }
}

/// Set-request content of the notification message categories.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct MessageTextContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
}

/// Set-request content of the SMS one-time-passcode message.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SmsOtpTextContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Set-request content of the login-screen texts.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct LoginTextContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_account_text: Option<SelectAccountScreenText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_text: Option<LoginScreenText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_text: Option<PasswordScreenText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logout_text: Option<LogoutScreenText>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SelectAccountScreenText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_user: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct LoginScreenText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_name_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register_button_text: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PasswordScreenText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_link_text: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct LogoutScreenText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_button_text: Option<String>,
}

fn string_attribute(description: &str, required: bool, computed: bool) -> SourceAttribute {
    SourceAttribute::String(AttributeMeta {
        description: description.to_owned(),
        required,
        optional: !required && !computed,
        computed,
        ..AttributeMeta::default()
    })
}

fn scope_attributes() -> BTreeMap<String, SourceAttribute> {
    BTreeMap::from([
        (
            ID_ATTRIBUTE.to_owned(),
            string_attribute("Unique identifier of the customization", false, true),
        ),
        (
            TENANT_ID_ATTRIBUTE.to_owned(),
            string_attribute("Id of the tenant the customization belongs to", true, false),
        ),
        (
            LANGUAGE_ATTRIBUTE.to_owned(),
            string_attribute("Language of the customized texts", true, false),
        ),
    ])
}

fn message_text_schema(description: &str) -> SourceSchema {
    let mut attributes = scope_attributes();
    for field in MESSAGE_TEXT_FIELDS {
        attributes.insert(
            (*field).to_owned(),
            string_attribute("Customized message text", false, false),
        );
    }
    SourceSchema {
        description: description.to_owned(),
        markdown_description: description.to_owned(),
        attributes,
        ..SourceSchema::default()
    }
}

fn screen_attribute(description: &str, fields: &[&str]) -> SourceAttribute {
    SourceAttribute::SingleNested {
        meta: AttributeMeta {
            description: description.to_owned(),
            optional: true,
            ..AttributeMeta::default()
        },
        attributes: fields
            .iter()
            .map(|field| {
                (
                    (*field).to_owned(),
                    string_attribute("Customized screen text", false, false),
                )
            })
            .collect(),
    }
}

fn login_text_schema() -> SourceSchema {
    let description = "Customized texts of the hosted login screens";
    let mut attributes = scope_attributes();
    attributes.insert(
        "select_account_text".to_owned(),
        screen_attribute(
            "Texts of the account-selection screen",
            &["title", "description", "other_user"],
        ),
    );
    attributes.insert(
        "login_text".to_owned(),
        screen_attribute(
            "Texts of the login screen",
            &[
                "title",
                "description",
                "login_name_label",
                "next_button_text",
                "register_button_text",
            ],
        ),
    );
    attributes.insert(
        "password_text".to_owned(),
        screen_attribute(
            "Texts of the password screen",
            &["title", "description", "password_label", "reset_link_text"],
        ),
    );
    attributes.insert(
        "logout_text".to_owned(),
        screen_attribute(
            "Texts of the logout screen",
            &["title", "description", "login_button_text"],
        ),
    );
    SourceSchema {
        description: description.to_owned(),
        markdown_description: description.to_owned(),
        attributes,
        ..SourceSchema::default()
    }
}
