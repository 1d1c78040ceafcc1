//! Operation-specific guidance for vendor failures.
//!
//! Some operations fail for reasons the vendor never spells out (a plan
//! without background checks answers 404, a document that does not allow
//! refusal answers 400). For those, one table maps `(operation, trigger)` to a
//! remediation text. The message shown is that text followed by a
//! "Technical details" block.

use crate::operation::OperationKind;

/// Condition under which a remediation row applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Status(u16),
}

/// One row of the table.
#[derive(Debug, Clone, Copy)]
pub struct Remediation {
    pub kind: OperationKind,
    pub trigger: Trigger,
    pub template: &'static str,
}

const REFUSE_400: &str = "Document cannot be refused (400 Bad Request).\n\n\
The document must meet these conditions:\n\
1. Its status is \"Em andamento\" (in progress)\n\
2. It was created with allow_refuse_signature enabled\n\
3. It is not completed, expired or otherwise closed\n\n\
Possible solutions:\n\
- Check that the document is still in progress\n\
- Verify the document was created with refusal enabled\n\
- Make sure the document token is valid and active";

const ONE_CLICK_400: &str = "Document creation failed (400 Bad Request).\n\n\
Common causes:\n\
1. Missing or invalid signer email address\n\
2. Invalid file format or corrupted file data\n\
3. Missing required fields (name, signers)\n\
4. File size exceeds the limit or the format is unsupported\n\n\
Please check:\n\
- Every signer has a valid email address unless blank_email is enabled\n\
- The file content and format are valid\n\
- All required fields are filled";

const EXTRA_DOC_TEMPLATE_400: &str = "Bad request while adding the extra document. Common causes:\n\
1. The template token is invalid or expired\n\
2. Template variables have invalid names or values\n\
3. Required fields are missing";

const TEMPLATE_DOCUMENT_400: &str = "Bad request while creating the document from a template. Common causes:\n\
1. The template token is invalid or expired\n\
2. The signer name is missing or invalid\n\
3. Template variables have invalid names or values\n\
4. Required fields are missing";

const CHECK_CREATE_404: &str = "Background check feature not available (404 Not Found).\n\n\
Possible causes:\n\
1. Background checks are not included in your ZapSign plan\n\
2. The feature requires additional permissions or an account upgrade\n\
3. Your account does not have access to this feature\n\n\
Contact ZapSign support to verify whether background checks are available for your account.";

const CHECK_GET_404: &str = "Background check not found (404 Not Found).\n\n\
Possible causes:\n\
1. The check token is invalid\n\
2. The background check expired or was deleted\n\
3. You do not have access to this background check\n\n\
Verify that the check token is correct (it starts with \"CHK\") and that the check was created successfully.";

const CHECK_DETAILS_404: &str = "Background check details not found (404 Not Found).\n\n\
Possible causes:\n\
1. The check token is invalid\n\
2. The background check expired or was deleted\n\
3. You do not have access to this background check\n\
4. The background check is still in progress\n\n\
Verify the check token and wait until the check status is \"completed\" before requesting details.";

const PARTNER_ACCOUNT_400: &str = "Partner account creation failed (400 Bad Request).\n\n\
Common causes:\n\
1. Missing required fields (country, lang, company_name)\n\
2. Invalid email format\n\
3. Invalid country or language code\n\
4. Phone number format does not match the country";

const PARTNER_ACCOUNT_403: &str = "Partner account creation failed (403 Forbidden).\n\n\
Possible causes:\n\
1. Your account does not have partner permissions\n\
2. Your plan does not support partner features\n\
3. The request came from another partner account\n\n\
Contact ZapSign support to enable partner features on your account.";

const PAYMENT_STATUS_400: &str = "Payment status update failed (400 Bad Request).\n\n\
Common causes:\n\
1. Invalid client API token\n\
2. Payment status is not \"adimplente\" or \"inadimplente\"\n\
3. Missing required fields";

const PAYMENT_STATUS_403: &str = "Payment status update failed (403 Forbidden).\n\n\
Possible causes:\n\
1. Your account does not have partner permissions\n\
2. The client account is not part of your partner network\n\
3. Invalid authentication token";

const TIMESTAMP_402: &str = "Timestamp addition failed (402 Payment Required).\n\n\
This feature requires a plan that includes timestamps. \
Contact ZapSign support to add it to your plan.";

const TIMESTAMP_400: &str = "Timestamp addition failed (400 Bad Request).\n\n\
Common causes:\n\
1. The document URL is invalid or not publicly accessible\n\
2. The document is not a PDF or DOCX\n\
3. The document is larger than 10MB";

pub const REMEDIATIONS: &[Remediation] = &[
    Remediation {
        kind: OperationKind::DocumentRefuse,
        trigger: Trigger::Status(400),
        template: REFUSE_400,
    },
    Remediation {
        kind: OperationKind::DocumentCreateOneClick,
        trigger: Trigger::Status(400),
        template: ONE_CLICK_400,
    },
    Remediation {
        kind: OperationKind::DocumentAddExtraDocumentFromTemplate,
        trigger: Trigger::Status(400),
        template: EXTRA_DOC_TEMPLATE_400,
    },
    Remediation {
        kind: OperationKind::TemplateCreateDocument,
        trigger: Trigger::Status(400),
        template: TEMPLATE_DOCUMENT_400,
    },
    Remediation {
        kind: OperationKind::BackgroundCheckCreatePerson,
        trigger: Trigger::Status(404),
        template: CHECK_CREATE_404,
    },
    Remediation {
        kind: OperationKind::BackgroundCheckCreateCompany,
        trigger: Trigger::Status(404),
        template: CHECK_CREATE_404,
    },
    Remediation {
        kind: OperationKind::BackgroundCheckGet,
        trigger: Trigger::Status(404),
        template: CHECK_GET_404,
    },
    Remediation {
        kind: OperationKind::BackgroundCheckDetails,
        trigger: Trigger::Status(404),
        template: CHECK_DETAILS_404,
    },
    Remediation {
        kind: OperationKind::PartnershipCreateAccount,
        trigger: Trigger::Status(400),
        template: PARTNER_ACCOUNT_400,
    },
    Remediation {
        kind: OperationKind::PartnershipCreateAccount,
        trigger: Trigger::Status(403),
        template: PARTNER_ACCOUNT_403,
    },
    Remediation {
        kind: OperationKind::PartnershipUpdatePaymentStatus,
        trigger: Trigger::Status(400),
        template: PAYMENT_STATUS_400,
    },
    Remediation {
        kind: OperationKind::PartnershipUpdatePaymentStatus,
        trigger: Trigger::Status(403),
        template: PAYMENT_STATUS_403,
    },
    Remediation {
        kind: OperationKind::TimestampAdd,
        trigger: Trigger::Status(402),
        template: TIMESTAMP_402,
    },
    Remediation {
        kind: OperationKind::TimestampAdd,
        trigger: Trigger::Status(400),
        template: TIMESTAMP_400,
    },
];

pub fn lookup(kind: OperationKind, status: u16) -> Option<&'static Remediation> {
    REMEDIATIONS
        .iter()
        .find(|row| row.kind == kind && row.trigger == Trigger::Status(status))
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        _ => "Error",
    }
}

impl Remediation {
    /// Full message: the template, then endpoint, status and any
    /// handler-supplied details.
    pub fn render(&self, endpoint: &str, status: u16, details: &[(&str, String)]) -> String {
        let mut message = format!(
            "{}\n\nTechnical details:\n- API Endpoint: {endpoint}\n- Status: {status} ({})",
            self.template,
            reason_phrase(status)
        );
        for (label, value) in details {
            message.push_str(&format!("\n- {label}: {value}"));
        }
        message
    }
}
