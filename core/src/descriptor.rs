//! Static option tables and required parameters per operation.
//!
//! These mirror the choices the workflow UI offers. Values outside a table
//! are rejected locally so the vendor never sees them.

use crate::error::ZapSignError;
use crate::operation::OperationKind;
use crate::params::Parameters;

pub const AUTH_MODES: &[&str] = &[
    "assinaturaTela",
    "tokenEmail",
    "assinaturaTela-tokenEmail",
    "tokenSms",
    "assinaturaTela-tokenSms",
    "tokenWhatsapp",
    "assinaturaTela-tokenWhatsapp",
    "certificadoDigital",
    "",
];

pub const SELFIE_VALIDATION_TYPES: &[&str] = &["", "facematch"];

/// Webhook event types; the empty string subscribes to every document event.
pub const WEBHOOK_EVENTS: &[&str] = &[
    "",
    "doc_signed",
    "doc_created",
    "doc_deleted",
    "doc_refused",
    "email_bounce",
];

pub const LANGUAGES: &[&str] = &["pt-br", "es", "en"];

pub const PARTNER_COUNTRIES: &[&str] = &["br", "mx"];

pub const PAYMENT_STATUSES: &[&str] = &["adimplente", "inadimplente"];

pub const RUBRIC_TYPES: &[&str] = &["signature", "visto"];

/// Parameters that must be present before the handler runs. Finer checks
/// (non-empty tokens, at least one signer...) belong to the handlers.
pub fn required_parameters(kind: OperationKind) -> &'static [&'static str] {
    use OperationKind::*;
    match kind {
        DocumentGet | DocumentUpdate | DocumentDelete | DocumentActivityHistory
        | DocumentPlaceSignatures | DocumentReorderEnvelope => &["documentToken"],
        DocumentCancel | DocumentRefuse => &["documentToken", "rejectedReason"],
        DocumentAddExtraDocument => &["documentToken", "extraDocumentName"],
        DocumentAddExtraDocumentFromTemplate => &["documentToken", "extraDocumentTemplateToken"],
        DocumentCreate
        | DocumentCreateOneClick
        | DocumentGetAll
        | DocumentValidateSignatures => &[],
        SignerAdd => &["signerDocumentToken", "signerName"],
        SignerRemove | SignerUpdate | SignerGet | SignerResetAttempts => &["signerToken"],
        TemplateGetAll => &[],
        TemplateCreateDocument => &["templateToken", "signer_name"],
        TemplateCreateDocx => &["name"],
        TemplateGet | TemplateUpdate | TemplateDelete | TemplateUpdateForm => &["templateToken"],
        BackgroundCheckCreatePerson => &["personCpf"],
        BackgroundCheckCreateCompany => &["companyCnpj"],
        BackgroundCheckGet | BackgroundCheckDetails => &["checkToken"],
        PartnershipCreateAccount => &["partnerCountry", "partnerLang", "partnerCompanyName"],
        PartnershipUpdatePaymentStatus => &["clientApiToken", "paymentStatus"],
        TimestampAdd => &["timestampDocumentUrl"],
        WebhookCreate => &["webhookUrl"],
        WebhookDelete => &["webhookId"],
    }
}

pub fn check_required(kind: OperationKind, params: &Parameters) -> Result<(), ZapSignError> {
    let missing: Vec<&str> = required_parameters(kind)
        .iter()
        .copied()
        .filter(|name| !params.contains(name))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ZapSignError::invalid(format!(
            "Missing required parameter(s) for {kind}: {}",
            missing.join(", ")
        )))
    }
}

/// Reject `value` unless it is one of `allowed`.
pub fn check_option(label: &str, value: &str, allowed: &[&str]) -> Result<(), ZapSignError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    let shown: Vec<String> = allowed
        .iter()
        .map(|v| if v.is_empty() { "(empty)".to_string() } else { (*v).to_string() })
        .collect();
    Err(ZapSignError::invalid(format!(
        "Invalid {label} '{value}'. Allowed values: {}",
        shown.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_parameters_are_listed() {
        let params = Parameters::new(json!({"documentToken": "abc"}).as_object().cloned().unwrap());
        let err = check_required(OperationKind::DocumentRefuse, &params).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required parameter(s) for document.refuse: rejectedReason"
        );
        assert!(check_required(OperationKind::DocumentGet, &params).is_ok());
    }

    #[test]
    fn option_check_names_allowed_values() {
        assert!(check_option("payment status", "adimplente", PAYMENT_STATUSES).is_ok());
        let err = check_option("webhook event", "doc_exploded", WEBHOOK_EVENTS).unwrap_err();
        assert!(err.to_string().starts_with("Invalid webhook event 'doc_exploded'"));
        assert!(err.to_string().contains("(empty), doc_signed"));
    }
}
