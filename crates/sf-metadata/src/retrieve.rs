//! Retrieve types.

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use sfkit_client::xml::escape;
use sfkit_client::{DecodeFailure, OperationState};

use crate::types::{FileProperties, RetrieveMessage};

/// A retrieve of unpackaged metadata described by a manifest.
#[derive(Debug, Clone, Default)]
pub struct RetrieveRequest {
    /// API version for this retrieve; the client's version when `None`.
    pub api_version: Option<String>,
    pub single_package: bool,
    /// `package.xml` content. A full document is accepted; it is reduced to
    /// its inner content before sending.
    pub unpackaged: String,
}

impl RetrieveRequest {
    pub fn new(manifest: impl Into<String>) -> Self {
        Self {
            unpackaged: manifest.into(),
            ..Self::default()
        }
    }

    pub fn from_manifest(manifest: &PackageManifest) -> Self {
        Self::new(manifest.to_xml())
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    pub fn with_single_package(mut self, single_package: bool) -> Self {
        self.single_package = single_package;
        self
    }
}

/// Reduce a `package.xml` document to the content inside `<Package>`.
///
/// Trims, drops a leading XML declaration, then keeps what lies between the
/// end of the opening `Package` tag and the last `</Package>`. Input without
/// a `Package` element is returned trimmed.
pub fn normalize_manifest(manifest: &str) -> String {
    let mut manifest = manifest.trim();

    if manifest.starts_with("<?xml") {
        if let Some(end) = manifest.find("?>") {
            manifest = manifest[end + 2..].trim();
        }
    }

    if manifest.contains("<Package") {
        if let Some(start) = manifest.find('>') {
            let content = &manifest[start + 1..];
            if let Some(end) = content.rfind("</Package>") {
                return content[..end].trim().to_string();
            }
        }
    }

    manifest.to_string()
}

/// Package manifest (package.xml) builder.
///
/// Member and type names are XML-escaped when rendered.
#[derive(Debug, Clone, Default)]
pub struct PackageManifest {
    pub types: Vec<PackageTypeMembers>,
    pub version: String,
}

impl PackageManifest {
    /// Create a new package manifest with the given API version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            types: Vec::new(),
            version: version.into(),
        }
    }

    /// Add a metadata type with its members.
    pub fn add_type<I, S>(mut self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.push(PackageTypeMembers {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Render as a complete `package.xml` document.
    pub fn to_xml(&self) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Package xmlns=\"http://soap.sforce.com/2006/04/metadata\">\n",
        );
        for type_members in &self.types {
            xml.push_str("    <types>\n");
            for member in &type_members.members {
                xml.push_str(&format!("        <members>{}</members>\n", escape(member)));
            }
            xml.push_str(&format!(
                "        <name>{}</name>\n    </types>\n",
                escape(&type_members.name)
            ));
        }
        xml.push_str(&format!(
            "    <version>{}</version>\n</Package>\n",
            escape(&self.version)
        ));
        xml
    }
}

/// Type members in a package manifest.
#[derive(Debug, Clone)]
pub struct PackageTypeMembers {
    pub name: String,
    pub members: Vec<String>,
}

/// Retrieve status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetrieveStatus {
    Pending,
    InProgress,
    Succeeded,
    Failed,
    Canceling,
    Canceled,
}

impl RetrieveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrieveStatus::Pending => "Pending",
            RetrieveStatus::InProgress => "InProgress",
            RetrieveStatus::Succeeded => "Succeeded",
            RetrieveStatus::Failed => "Failed",
            RetrieveStatus::Canceling => "Canceling",
            RetrieveStatus::Canceled => "Canceled",
        }
    }

    /// Map the older async `state` vocabulary (Queued, InProgress, Completed, Error).
    pub fn from_async_state(state: &str) -> Result<Self, DecodeFailure> {
        match state {
            "Queued" => Ok(RetrieveStatus::Pending),
            "InProgress" => Ok(RetrieveStatus::InProgress),
            "Completed" => Ok(RetrieveStatus::Succeeded),
            "Error" => Ok(RetrieveStatus::Failed),
            _ => Err(DecodeFailure::UnknownValue(format!("retrieve state {state}"))),
        }
    }
}

impl std::str::FromStr for RetrieveStatus {
    type Err = DecodeFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(RetrieveStatus::Pending),
            "InProgress" => Ok(RetrieveStatus::InProgress),
            "Succeeded" => Ok(RetrieveStatus::Succeeded),
            "Failed" => Ok(RetrieveStatus::Failed),
            "Canceling" => Ok(RetrieveStatus::Canceling),
            "Canceled" => Ok(RetrieveStatus::Canceled),
            _ => Err(DecodeFailure::UnknownValue(format!("retrieve status {s}"))),
        }
    }
}

impl From<RetrieveStatus> for OperationState {
    fn from(status: RetrieveStatus) -> Self {
        match status {
            RetrieveStatus::Pending => OperationState::Queued,
            RetrieveStatus::InProgress | RetrieveStatus::Canceling => OperationState::InProgress,
            RetrieveStatus::Succeeded => OperationState::Succeeded,
            RetrieveStatus::Failed => OperationState::Failed,
            RetrieveStatus::Canceled => OperationState::Aborted,
        }
    }
}

/// Result of a retrieve, as returned by `checkRetrieveStatus`.
///
/// The whole result arrives in one response; there is no paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrieveOutcome {
    /// Async process ID.
    pub id: String,
    pub done: bool,
    pub status: RetrieveStatus,
    pub success: bool,
    pub error_message: Option<String>,
    pub error_status_code: Option<String>,
    /// Base64-encoded zip file contents.
    pub zip_file: Option<String>,
    pub file_properties: Vec<FileProperties>,
    pub messages: Vec<RetrieveMessage>,
}

impl RetrieveOutcome {
    /// Decode the base64 zip archive.
    pub fn zip_bytes(&self) -> Result<Vec<u8>, DecodeFailure> {
        let encoded = self
            .zip_file
            .as_deref()
            .ok_or_else(|| DecodeFailure::MissingElement("zipFile".to_string()))?;
        let compact: String = encoded.split_whitespace().collect();
        general_purpose::STANDARD
            .decode(compact)
            .map_err(|e| DecodeFailure::UnknownValue(format!("zipFile is not base64: {e}")))
    }
}
