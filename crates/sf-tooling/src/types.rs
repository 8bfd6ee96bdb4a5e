//! Tooling API types.

use serde::{Deserialize, Serialize};

/// A custom field definition for `tooling/sobjects/CustomField`.
///
/// `full_name` is `Object.Field__c`, e.g. `Account.Region__c`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "Metadata")]
    pub metadata: CustomFieldMetadata,
}

impl CustomField {
    pub fn new(
        full_name: impl Into<String>,
        label: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            metadata: CustomFieldMetadata {
                label: label.into(),
                field_type: field_type.into(),
                length: None,
            },
        }
    }

    /// Set the length, required for `Text` fields.
    pub fn with_length(mut self, length: u32) -> Self {
        self.metadata.length = Some(length);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldMetadata {
    pub label: String,
    /// Field type such as `Text`, `Number` or `Checkbox`.
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}
