//! Describe types.
//!
//! Only the commonly used attributes are typed; everything else the server
//! sends is kept in the `extra` map of each struct, so nothing is lost when
//! Salesforce adds keys in a new API version.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of `sobjects/{type}/describe`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DescribeSObjectResult {
    pub name: String,
    pub label: String,
    #[serde(rename = "labelPlural")]
    pub label_plural: Option<String>,
    #[serde(rename = "keyPrefix")]
    pub key_prefix: Option<String>,
    #[serde(default)]
    pub custom: bool,

    // === Capabilities ===
    #[serde(default)]
    pub createable: bool,
    #[serde(default)]
    pub deletable: bool,
    #[serde(default)]
    pub queryable: bool,
    #[serde(default)]
    pub retrieveable: bool,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default)]
    pub updateable: bool,

    #[serde(default)]
    pub fields: Vec<FieldDescribe>,
    #[serde(rename = "childRelationships", default)]
    pub child_relationships: Vec<ChildRelationship>,
    #[serde(rename = "recordTypeInfos", default)]
    pub record_type_infos: Vec<RecordTypeInfo>,
    #[serde(default)]
    pub urls: HashMap<String, String>,

    /// Keys not modelled above.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl DescribeSObjectResult {
    /// Look up a field by API name, ignoring case.
    pub fn field(&self, name: &str) -> Option<&FieldDescribe> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }
}

/// Describe of one field.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldDescribe {
    pub name: String,
    pub label: String,
    /// `type` on the wire, e.g. "string", "reference", "picklist".
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub length: i64,
    #[serde(default)]
    pub custom: bool,
    #[serde(default)]
    pub nillable: bool,
    #[serde(default)]
    pub createable: bool,
    #[serde(default)]
    pub updateable: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(rename = "externalId", default)]
    pub external_id: bool,
    #[serde(rename = "referenceTo", default)]
    pub reference_to: Vec<String>,
    #[serde(rename = "relationshipName")]
    pub relationship_name: Option<String>,
    #[serde(rename = "picklistValues", default)]
    pub picklist_values: Vec<PicklistValue>,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PicklistValue {
    pub value: String,
    pub label: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(rename = "defaultValue", default)]
    pub default_value: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChildRelationship {
    #[serde(rename = "childSObject")]
    pub child_sobject: String,
    pub field: String,
    #[serde(rename = "relationshipName")]
    pub relationship_name: Option<String>,
    #[serde(rename = "cascadeDelete", default)]
    pub cascade_delete: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordTypeInfo {
    pub name: String,
    #[serde(rename = "recordTypeId")]
    pub record_type_id: String,
    #[serde(rename = "developerName")]
    pub developer_name: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub available: bool,
    #[serde(rename = "defaultRecordTypeMapping", default)]
    pub default_record_type_mapping: bool,
    #[serde(default)]
    pub master: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_describe_keeps_unknown_keys() {
        let json = json!({
            "name": "Account",
            "label": "Account",
            "labelPlural": "Accounts",
            "keyPrefix": "001",
            "custom": false,
            "createable": true,
            "queryable": true,
            "fields": [
                {"name": "Id", "label": "Account ID", "type": "id", "length": 18, "nillable": false},
                {
                    "name": "Industry", "label": "Industry", "type": "picklist", "length": 255,
                    "nillable": true, "updateable": true,
                    "picklistValues": [
                        {"value": "Banking", "label": "Banking", "active": true, "defaultValue": false}
                    ],
                    "inlineHelpText": null
                },
                {
                    "name": "OwnerId", "label": "Owner ID", "type": "reference",
                    "referenceTo": ["User"], "relationshipName": "Owner"
                }
            ],
            "childRelationships": [
                {"childSObject": "Contact", "field": "AccountId", "relationshipName": "Contacts", "cascadeDelete": false}
            ],
            "recordTypeInfos": [
                {"name": "Master", "recordTypeId": "012000000000000AAA", "active": true, "available": true,
                 "defaultRecordTypeMapping": true, "master": true}
            ],
            "urls": {"describe": "/services/data/v58.0/sobjects/Account/describe"},
            "mruEnabled": true,
            "triggerable": true
        });

        let describe: DescribeSObjectResult = serde_json::from_value(json).unwrap();
        assert_eq!(describe.key_prefix.as_deref(), Some("001"));
        assert!(describe.createable);
        assert!(!describe.deletable);
        assert_eq!(describe.fields.len(), 3);
        assert_eq!(describe.extra["mruEnabled"], json!(true));
        assert_eq!(describe.extra["triggerable"], json!(true));

        let industry = describe.field("industry").unwrap();
        assert_eq!(industry.field_type, "picklist");
        assert_eq!(industry.picklist_values[0].value, "Banking");
        assert!(industry.extra.contains_key("inlineHelpText"));

        let owner = describe.field("OwnerId").unwrap();
        assert_eq!(owner.reference_to, vec!["User"]);
        assert_eq!(owner.relationship_name.as_deref(), Some("Owner"));

        assert_eq!(describe.child_relationships[0].child_sobject, "Contact");
        assert!(describe.record_type_infos[0].master);
    }
}
