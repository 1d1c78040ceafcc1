use serde_json::{Map, Value};

use super::{Api, PreparedCall};
use crate::config::mask_token;
use crate::descriptor::{check_option, LANGUAGES, PARTNER_COUNTRIES, PAYMENT_STATUSES};
use crate::error::ZapSignError;
use crate::http::{HttpMethod, HttpRequest};
use crate::mappers::DEFAULT_PHONE_COUNTRY;
use crate::operation::OperationRequest;

pub(super) fn create_account(
    api: &Api,
    request: &OperationRequest,
) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let country = params.required("partnerCountry", "Country is required for a partner account.")?;
    check_option("country", &country, PARTNER_COUNTRIES)?;
    let lang = params.required("partnerLang", "Language is required for a partner account.")?;
    check_option("language", &lang, LANGUAGES)?;
    let company = params.required(
        "partnerCompanyName",
        "Company name is required for a partner account.",
    )?;

    let mut body = Map::new();
    body.insert("country".to_string(), Value::String(country.clone()));
    body.insert("lang".to_string(), Value::String(lang.clone()));
    body.insert("company_name".to_string(), Value::String(company.clone()));
    if let Some(email) = params.non_empty("partnerEmail") {
        body.insert("email".to_string(), Value::String(email));
    }
    if let Some(phone) = params.non_empty("partnerPhoneNumber") {
        body.insert("phone_number".to_string(), Value::String(phone));
        body.insert(
            "phone_country".to_string(),
            Value::String(params.string_or("partnerPhoneCountry", DEFAULT_PHONE_COUNTRY)),
        );
    }

    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Post, api.url("/api/v1/partner/company/"))
            .with_json(Value::Object(body)),
    )
    .with_detail("Company Name", company)
    .with_detail("Country", country)
    .with_detail("Language", lang))
}

pub(super) fn update_payment_status(
    api: &Api,
    request: &OperationRequest,
) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let client_token = params.required("clientApiToken", "Client API Token is required.")?;
    let status = params.required("paymentStatus", "Payment Status is required.")?;
    check_option("payment status", &status, PAYMENT_STATUSES)?;

    let mut body = Map::new();
    body.insert("client_api_token".to_string(), Value::String(client_token.clone()));
    body.insert("payment_status".to_string(), Value::String(status.clone()));
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Post, api.url("/api/v1/partner/update-payment-status/"))
            .with_json(Value::Object(body)),
    )
    .with_detail("Client API Token", mask_token(&client_token))
    .with_detail("Payment Status", status))
}
