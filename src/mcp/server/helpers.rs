// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Map a bridge failure onto the MCP error surface.
///
/// Remote errors keep their sandbox `code` in the detail payload; transport
/// failures (no connection, timeout, disconnect) are host-local and never
/// reached the sandbox.
fn bridge_error(err: BridgeError) -> ErrorData {
    match err {
        BridgeError::NotConnected => ErrorData::internal_error(
            "no live sandbox connection; open the scene plugin and retry",
            Some(serde_json::json!({ "code": "connection" })),
        ),
        BridgeError::Timeout { timeout } => ErrorData::internal_error(
            format!("sandbox did not respond within {timeout:?}"),
            Some(serde_json::json!({ "code": "timeout" })),
        ),
        BridgeError::Disconnected => ErrorData::internal_error(
            "sandbox disconnected before responding",
            Some(serde_json::json!({ "code": "disconnected" })),
        ),
        BridgeError::Remote { code, message } => {
            let detail = Some(serde_json::json!({ "code": code }));
            match code.as_str() {
                "not_found" => ErrorData::resource_not_found(message, detail),
                "invalid_params" | "invalid_payload" => ErrorData::invalid_params(message, detail),
                "unsupported_operation" => ErrorData::invalid_request(message, detail),
                _ => ErrorData::internal_error(message, detail),
            }
        }
    }
}

fn decode_result<T: DeserializeOwned>(method: &str, result: Value) -> Result<T, ErrorData> {
    serde_json::from_value(result).map_err(|err| {
        ErrorData::internal_error(
            format!("sandbox returned an unexpected shape for {method}: {err}"),
            None,
        )
    })
}
