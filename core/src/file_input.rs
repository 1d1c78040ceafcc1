//! Document file input: uploaded binary, inline base64, public URL or
//! Markdown text, normalized into the body keys the vendor expects.

use std::collections::BTreeMap;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{Map, Value};

use crate::error::ZapSignError;
use crate::http::{HttpMethod, HttpRequest};
use crate::params::{BinaryData, Parameters};

pub const PDF_MIME: &str = "application/pdf";
pub const OCTET_STREAM_MIME: &str = "application/octet-stream";
pub const DEFAULT_BINARY_PROPERTY: &str = "data";

const EXTENSION_MIME_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("ppt", "application/vnd.ms-powerpoint"),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    ("txt", "text/plain"),
    ("rtf", "application/rtf"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("tiff", "image/tiff"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("xml", "application/xml"),
    ("json", "application/json"),
];

/// MIME type for a file extension; unknown or missing extensions map to
/// `application/octet-stream`.
pub fn mime_from_extension(extension: Option<&str>) -> &'static str {
    let Some(ext) = extension else {
        return OCTET_STREAM_MIME;
    };
    let ext = ext.to_ascii_lowercase();
    EXTENSION_MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(OCTET_STREAM_MIME)
}

/// MIME type inferred from the last path segment of a URL.
pub fn mime_from_url(raw: &str) -> &'static str {
    let path = match url::Url::parse(raw) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => raw.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    let file_name = path.rsplit('/').next().unwrap_or_default();
    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext);
    mime_from_extension(extension)
}

/// Whether a MIME type selects the `*_docx` body keys.
pub fn is_docx_mime(mime: &str) -> bool {
    mime != PDF_MIME && (mime.contains("word") || mime.contains("document"))
}

fn key_for(prefix: &str, mime: &str) -> String {
    if is_docx_mime(mime) {
        format!("{prefix}_docx")
    } else {
        format!("{prefix}_pdf")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileInputType {
    File,
    Base64,
    Url,
    Markdown,
}

impl FromStr for FileInputType {
    type Err = ZapSignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "file" | "binary" => Ok(FileInputType::File),
            "base64" => Ok(FileInputType::Base64),
            "url" => Ok(FileInputType::Url),
            "markdown" => Ok(FileInputType::Markdown),
            _ => Err(ZapSignError::invalid("Invalid file input type selected.")),
        }
    }
}

/// A resolved document source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Base64 { content: String, mime_type: String },
    Url { url: String, mime_type: String },
    Markdown { text: String },
}

impl DocumentSource {
    /// Read the source selected by `fileInputType` from the item.
    pub fn resolve(
        params: &Parameters,
        binary: &BTreeMap<String, BinaryData>,
    ) -> Result<Self, ZapSignError> {
        let input_type: FileInputType = params.string_or("fileInputType", "file").parse()?;
        match input_type {
            FileInputType::File => {
                let property = params.string_or("binaryPropertyName", DEFAULT_BINARY_PROPERTY);
                let data = binary_property(binary, &property)?;
                let bytes = decode_base64(&data.data, &property)?;
                Ok(DocumentSource::Base64 {
                    content: STANDARD.encode(bytes),
                    mime_type: data.mime_type.clone().unwrap_or_else(|| PDF_MIME.to_string()),
                })
            }
            FileInputType::Base64 => {
                let content = params.required(
                    "base64Content",
                    "Base64 Content is required when the file input type is Base64.",
                )?;
                Ok(DocumentSource::Base64 {
                    content,
                    mime_type: params.string_or("fileMimeType", PDF_MIME),
                })
            }
            FileInputType::Url => {
                let url = params.required(
                    "fileUrl",
                    "File URL is required when the file input type is Public Link.",
                )?;
                if url::Url::parse(&url).is_err() {
                    return Err(ZapSignError::invalid(format!(
                        "File URL '{url}' is not a valid absolute URL."
                    )));
                }
                let mime_type = mime_from_url(&url).to_string();
                Ok(DocumentSource::Url { url, mime_type })
            }
            FileInputType::Markdown => Ok(DocumentSource::Markdown {
                text: params.required(
                    "markdownText",
                    "Markdown Text is required when the file input type is Markdown.",
                )?,
            }),
        }
    }

    /// Reachability check issued before the upload request for URL sources.
    pub fn probe(&self) -> Option<HttpRequest> {
        match self {
            DocumentSource::Url { url, .. } => Some(HttpRequest::new(HttpMethod::Get, url.clone())),
            _ => None,
        }
    }

    /// Insert the body key for this source (`base64_pdf`, `url_docx`,
    /// `markdown_text`...).
    pub fn apply(&self, body: &mut Map<String, Value>) {
        match self {
            DocumentSource::Base64 { content, mime_type } => {
                body.insert(key_for("base64", mime_type), Value::String(content.clone()));
            }
            DocumentSource::Url { url, mime_type } => {
                body.insert(key_for("url", mime_type), Value::String(url.clone()));
            }
            DocumentSource::Markdown { text } => {
                body.insert("markdown_text".to_string(), Value::String(text.clone()));
            }
        }
    }
}

pub(crate) fn binary_property<'a>(
    binary: &'a BTreeMap<String, BinaryData>,
    property: &str,
) -> Result<&'a BinaryData, ZapSignError> {
    binary.get(property).ok_or_else(|| {
        ZapSignError::invalid(format!(
            "No binary data found in property '{property}' of the input item."
        ))
    })
}

pub(crate) fn decode_base64(data: &str, property: &str) -> Result<Vec<u8>, ZapSignError> {
    let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(compact).map_err(|_| {
        ZapSignError::invalid(format!(
            "Binary property '{property}' does not contain valid base64 data."
        ))
    })
}
