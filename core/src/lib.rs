//! Client core for the ZapSign e-signature API.
//!
//! # Overview
//! Resolves workflow input items (`resource` + `operation` + parameters) to
//! ZapSign endpoints, builds the vendor's request bodies, and turns responses
//! into output records with readable error messages.
//!
//! # Design
//! - Request building is pure. Handlers produce a `PreparedCall` and never
//!   touch the network; the only I/O seam is the `Transport` trait.
//! - `ZapSignClient` holds configuration only. `prepare` and `parse` can be
//!   driven by a host that does its own I/O; `execute` and
//!   `executor::execute_batch` run the round trip over a `Transport`.
//! - Vendor failures are normalized once into `ApiError` and classified;
//!   a per-operation table adds remediation text for known failure modes.
//! - `UreqTransport` (feature `blocking`, on by default) is the stock
//!   transport. It attaches the bearer token only to API requests.

pub mod client;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod executor;
pub mod file_input;
pub mod handlers;
pub mod http;
pub mod mappers;
pub mod operation;
pub mod params;
pub mod payload;
pub mod remediation;
pub mod transport;

pub use client::ZapSignClient;
pub use config::{ClientConfig, ConfigError, Credentials, Environment};
pub use error::{ApiError, ApiErrorKind, ZapSignError};
pub use executor::{execute_batch, BatchError, ExecutionOptions};
pub use handlers::PreparedCall;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use operation::{InputItem, OperationKind, OperationRequest};
pub use params::BinaryData;
pub use transport::{Transport, TransportError};

#[cfg(feature = "blocking")]
pub use transport::UreqTransport;
