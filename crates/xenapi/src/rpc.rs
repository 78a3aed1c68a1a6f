use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, trace};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};

/// JSON-RPC 2.0 transport to a xapi `/jsonrpc` endpoint.
pub struct RpcClient {
    agent: Client,
    endpoint: Url,
    next_id: AtomicU64,
}

#[derive(Serialize, Debug)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a [Value],
    id: u64,
}

#[derive(Deserialize, Debug)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcFault>,
}

#[derive(Deserialize, Debug)]
struct RpcFault {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl RpcClient {
    pub fn new(url: Url) -> Result<RpcClient> {
        let endpoint = url.join("jsonrpc")?;
        Ok(RpcClient {
            agent: Client::new(),
            endpoint,
            next_id: AtomicU64::new(1),
        })
    }

    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> Result<T> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params: &params,
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
        };
        debug!("calling {} on {}", method, self.endpoint);
        trace!("request: {}", serde_json::to_string(&request)?);
        let response = self
            .agent
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        let response: RpcResponse = response.json().await?;
        if let Some(fault) = response.error {
            return Err(decode_fault(fault));
        }
        let Some(result) = response.result else {
            return Err(Error::ResponseMalformed);
        };
        trace!("result of {}: {}", method, result);
        Ok(serde_json::from_value(result)?)
    }
}

/// xapi carries its `ErrorDescription` string array in the JSON-RPC error
/// data field. Anything else is reported as a plain rpc fault.
fn decode_fault(fault: RpcFault) -> Error {
    if let Some(data) = fault.data {
        if let Ok(description) = serde_json::from_value::<Vec<String>>(data) {
            return Error::Api(description);
        }
    }
    Error::Rpc {
        code: fault.code,
        message: fault.message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_envelope_shape() {
        let params = vec![json!("OpaqueRef:session"), json!("bond0")];
        let request = RpcRequest {
            jsonrpc: "2.0",
            method: "PIF.get_network",
            params: &params,
            id: 7,
        };
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(
            encoded,
            json!({
                "jsonrpc": "2.0",
                "method": "PIF.get_network",
                "params": ["OpaqueRef:session", "bond0"],
                "id": 7,
            })
        );
    }

    #[test]
    fn success_response_decodes_result() {
        let response: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","result":"OpaqueRef:vm","id":1}"#).unwrap();
        assert!(response.error.is_none());
        assert_eq!(response.result, Some(json!("OpaqueRef:vm")));
    }

    #[test]
    fn xapi_fault_decodes_to_api_error() {
        let response: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","error":{"code":-32500,"message":"Server error",
                "data":["SESSION_AUTHENTICATION_FAILED","root","auth failed"]},"id":1}"#,
        )
        .unwrap();
        let error = decode_fault(response.error.unwrap());
        assert_eq!(error.api_code(), Some("SESSION_AUTHENTICATION_FAILED"));
    }

    #[test]
    fn plain_fault_decodes_to_rpc_error() {
        let fault = RpcFault {
            code: -32601,
            message: "method not found".to_string(),
            data: None,
        };
        match decode_fault(fault) {
            Error::Rpc { code, message } => {
                assert_eq!(code, -32601);
                assert_eq!(message, "method not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
