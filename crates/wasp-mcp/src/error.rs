// SPDX-License-Identifier: Apache-2.0

//! Error conversion from wasp-core errors to MCP errors.

use rmcp::model::{ErrorCode, ErrorData};
use wasp_core::WaspError;

/// Convert `WaspError` into a typed MCP error based on error variant.
///
/// Maps error variants to appropriate MCP error codes:
/// - `Validation` -> `INVALID_PARAMS`
/// - `NoScannersAvailable`, `ScannerUnavailable` -> `INVALID_REQUEST`
/// - All others -> `INTERNAL_ERROR`
pub fn wasp_error_to_mcp(err: &WaspError) -> ErrorData {
    let code = match err {
        WaspError::Validation { .. } => ErrorCode::INVALID_PARAMS,
        WaspError::NoScannersAvailable | WaspError::ScannerUnavailable { .. } => {
            ErrorCode::INVALID_REQUEST
        }
        _ => ErrorCode::INTERNAL_ERROR,
    };

    match code {
        ErrorCode::INVALID_PARAMS => ErrorData::invalid_params(err.to_string(), None),
        ErrorCode::INVALID_REQUEST => ErrorData::invalid_request(err.to_string(), None),
        _ => ErrorData::internal_error(err.to_string(), None),
    }
}

/// Convert any error implementing Display into an MCP internal error.
pub fn generic_to_mcp_error<E: std::fmt::Display>(err: E) -> ErrorData {
    ErrorData::internal_error(err.to_string(), None)
}
