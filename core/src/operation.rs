//! Resource/operation selectors and the per-item request they resolve to.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ZapSignError;
use crate::params::{BinaryData, Parameters};

/// Every supported (resource, operation) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    DocumentCreate,
    DocumentCreateOneClick,
    DocumentGet,
    DocumentGetAll,
    DocumentUpdate,
    DocumentDelete,
    DocumentCancel,
    DocumentRefuse,
    DocumentActivityHistory,
    DocumentPlaceSignatures,
    DocumentValidateSignatures,
    DocumentAddExtraDocument,
    DocumentAddExtraDocumentFromTemplate,
    DocumentReorderEnvelope,
    SignerAdd,
    SignerRemove,
    SignerUpdate,
    SignerGet,
    SignerResetAttempts,
    TemplateGetAll,
    TemplateCreateDocument,
    TemplateCreateDocx,
    TemplateGet,
    TemplateUpdate,
    TemplateDelete,
    TemplateUpdateForm,
    BackgroundCheckCreatePerson,
    BackgroundCheckCreateCompany,
    BackgroundCheckGet,
    BackgroundCheckDetails,
    PartnershipCreateAccount,
    PartnershipUpdatePaymentStatus,
    TimestampAdd,
    WebhookCreate,
    WebhookDelete,
}

impl OperationKind {
    pub const ALL: &'static [OperationKind] = &[
        OperationKind::DocumentCreate,
        OperationKind::DocumentCreateOneClick,
        OperationKind::DocumentGet,
        OperationKind::DocumentGetAll,
        OperationKind::DocumentUpdate,
        OperationKind::DocumentDelete,
        OperationKind::DocumentCancel,
        OperationKind::DocumentRefuse,
        OperationKind::DocumentActivityHistory,
        OperationKind::DocumentPlaceSignatures,
        OperationKind::DocumentValidateSignatures,
        OperationKind::DocumentAddExtraDocument,
        OperationKind::DocumentAddExtraDocumentFromTemplate,
        OperationKind::DocumentReorderEnvelope,
        OperationKind::SignerAdd,
        OperationKind::SignerRemove,
        OperationKind::SignerUpdate,
        OperationKind::SignerGet,
        OperationKind::SignerResetAttempts,
        OperationKind::TemplateGetAll,
        OperationKind::TemplateCreateDocument,
        OperationKind::TemplateCreateDocx,
        OperationKind::TemplateGet,
        OperationKind::TemplateUpdate,
        OperationKind::TemplateDelete,
        OperationKind::TemplateUpdateForm,
        OperationKind::BackgroundCheckCreatePerson,
        OperationKind::BackgroundCheckCreateCompany,
        OperationKind::BackgroundCheckGet,
        OperationKind::BackgroundCheckDetails,
        OperationKind::PartnershipCreateAccount,
        OperationKind::PartnershipUpdatePaymentStatus,
        OperationKind::TimestampAdd,
        OperationKind::WebhookCreate,
        OperationKind::WebhookDelete,
    ];

    /// Resolve the two-level selector. A few operations accept the alternate
    /// names the UI has used for them.
    pub fn parse(resource: &str, operation: &str) -> Result<Self, ZapSignError> {
        use OperationKind::*;
        let kind = match (resource, operation) {
            ("document", "create") => DocumentCreate,
            ("document", "createOneClick") => DocumentCreateOneClick,
            ("document", "get") => DocumentGet,
            ("document", "getAll") => DocumentGetAll,
            ("document", "update") => DocumentUpdate,
            ("document", "delete") => DocumentDelete,
            ("document", "cancel") => DocumentCancel,
            ("document", "refuse") => DocumentRefuse,
            ("document", "activityHistory" | "getActivityHistory") => DocumentActivityHistory,
            ("document", "placeSignatures") => DocumentPlaceSignatures,
            ("document", "validateSignatures") => DocumentValidateSignatures,
            ("document", "addExtraDocument") => DocumentAddExtraDocument,
            ("document", "addExtraDocumentFromTemplate") => DocumentAddExtraDocumentFromTemplate,
            ("document", "reorderEnvelope") => DocumentReorderEnvelope,
            ("signer", "add") => SignerAdd,
            ("signer", "remove") => SignerRemove,
            ("signer", "update") => SignerUpdate,
            ("signer", "get" | "detail") => SignerGet,
            ("signer", "resetAttempts") => SignerResetAttempts,
            ("template", "getAll") => TemplateGetAll,
            ("template", "createDocument") => TemplateCreateDocument,
            ("template", "createTemplateDocx") => TemplateCreateDocx,
            ("template", "get") => TemplateGet,
            ("template", "update") => TemplateUpdate,
            ("template", "delete") => TemplateDelete,
            ("template", "updateTemplateForm") => TemplateUpdateForm,
            ("backgroundCheck", "createPerson") => BackgroundCheckCreatePerson,
            ("backgroundCheck", "createCompany") => BackgroundCheckCreateCompany,
            ("backgroundCheck", "get") => BackgroundCheckGet,
            ("backgroundCheck", "details") => BackgroundCheckDetails,
            ("partnership", "createAccount") => PartnershipCreateAccount,
            ("partnership", "updatePaymentStatus") => PartnershipUpdatePaymentStatus,
            ("timestamp", "add") => TimestampAdd,
            ("webhook", "create") => WebhookCreate,
            ("webhook", "delete") => WebhookDelete,
            _ => {
                return Err(ZapSignError::UnsupportedOperation {
                    resource: resource.to_string(),
                    operation: operation.to_string(),
                })
            }
        };
        Ok(kind)
    }

    pub fn resource(&self) -> &'static str {
        self.selector().0
    }

    pub fn operation(&self) -> &'static str {
        self.selector().1
    }

    fn selector(&self) -> (&'static str, &'static str) {
        use OperationKind::*;
        match self {
            DocumentCreate => ("document", "create"),
            DocumentCreateOneClick => ("document", "createOneClick"),
            DocumentGet => ("document", "get"),
            DocumentGetAll => ("document", "getAll"),
            DocumentUpdate => ("document", "update"),
            DocumentDelete => ("document", "delete"),
            DocumentCancel => ("document", "cancel"),
            DocumentRefuse => ("document", "refuse"),
            DocumentActivityHistory => ("document", "activityHistory"),
            DocumentPlaceSignatures => ("document", "placeSignatures"),
            DocumentValidateSignatures => ("document", "validateSignatures"),
            DocumentAddExtraDocument => ("document", "addExtraDocument"),
            DocumentAddExtraDocumentFromTemplate => ("document", "addExtraDocumentFromTemplate"),
            DocumentReorderEnvelope => ("document", "reorderEnvelope"),
            SignerAdd => ("signer", "add"),
            SignerRemove => ("signer", "remove"),
            SignerUpdate => ("signer", "update"),
            SignerGet => ("signer", "get"),
            SignerResetAttempts => ("signer", "resetAttempts"),
            TemplateGetAll => ("template", "getAll"),
            TemplateCreateDocument => ("template", "createDocument"),
            TemplateCreateDocx => ("template", "createTemplateDocx"),
            TemplateGet => ("template", "get"),
            TemplateUpdate => ("template", "update"),
            TemplateDelete => ("template", "delete"),
            TemplateUpdateForm => ("template", "updateTemplateForm"),
            BackgroundCheckCreatePerson => ("backgroundCheck", "createPerson"),
            BackgroundCheckCreateCompany => ("backgroundCheck", "createCompany"),
            BackgroundCheckGet => ("backgroundCheck", "get"),
            BackgroundCheckDetails => ("backgroundCheck", "details"),
            PartnershipCreateAccount => ("partnership", "createAccount"),
            PartnershipUpdatePaymentStatus => ("partnership", "updatePaymentStatus"),
            TimestampAdd => ("timestamp", "add"),
            WebhookCreate => ("webhook", "create"),
            WebhookDelete => ("webhook", "delete"),
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource(), self.operation())
    }
}

/// One input record as handed over by the automation host.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputItem {
    pub resource: String,
    pub operation: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub binary: BTreeMap<String, BinaryData>,
}

impl InputItem {
    pub fn new(resource: &str, operation: &str, parameters: Value) -> Self {
        Self {
            resource: resource.to_string(),
            operation: operation.to_string(),
            parameters: match parameters {
                Value::Object(map) => map,
                _ => Map::new(),
            },
            binary: BTreeMap::new(),
        }
    }

    pub fn with_binary(mut self, property: &str, data: BinaryData) -> Self {
        self.binary.insert(property.to_string(), data);
        self
    }
}

/// An input item resolved to its operation. Immutable while its handler runs.
#[derive(Debug, Clone)]
pub struct OperationRequest {
    pub kind: OperationKind,
    pub parameters: Parameters,
    pub binary: BTreeMap<String, BinaryData>,
}

impl OperationRequest {
    pub fn resolve(item: &InputItem) -> Result<Self, ZapSignError> {
        Ok(Self {
            kind: OperationKind::parse(&item.resource, &item.operation)?,
            parameters: Parameters::new(item.parameters.clone()),
            binary: item.binary.clone(),
        })
    }
}
