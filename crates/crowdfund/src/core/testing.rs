//! Scripted JSON-RPC node for unit tests

use serde_json::{json, Value};
use std::collections::HashMap;
use wiremock::{matchers::method, Mock, MockServer, Request, Respond, ResponseTemplate};

/// Answers JSON-RPC requests from a fixed table, echoing the request id
///
/// Keys are method names. `eth_call` is keyed as `eth_call:<selector>` so
/// different contract functions can return different data.
pub struct RpcResponder {
	results: HashMap<String, Value>,
}

impl RpcResponder {
	fn key_for(body: &Value) -> String {
		let method = body["method"].as_str().unwrap_or_default();
		if method != "eth_call" {
			return method.to_string();
		}

		let tx = &body["params"][0];
		let input = tx["input"]
			.as_str()
			.or_else(|| tx["data"].as_str())
			.unwrap_or_default();
		let selector: String = input.trim_start_matches("0x").chars().take(8).collect();
		format!("eth_call:0x{}", selector.to_lowercase())
	}
}

impl Respond for RpcResponder {
	fn respond(&self, request: &Request) -> ResponseTemplate {
		let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
		let id = body["id"].clone();
		let key = Self::key_for(&body);

		let response = match self.results.get(&key) {
			Some(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
			None => json!({
				"jsonrpc": "2.0",
				"id": id,
				"error": {"code": -32601, "message": format!("no scripted result for {key}")}
			}),
		};
		ResponseTemplate::new(200).set_body_json(response)
	}
}

/// Start a mock node answering `results`
pub async fn mock_node(results: Vec<(String, Value)>) -> MockServer {
	let server = MockServer::start().await;
	let results = results.into_iter().collect();

	Mock::given(method("POST"))
		.respond_with(RpcResponder { results })
		.mount(&server)
		.await;

	server
}

/// Hex-encoded `eth_call` key for a function signature
pub fn call_key(signature: &str) -> String {
	let selector = alloy_primitives::keccak256(signature.as_bytes());
	format!("eth_call:0x{}", hex::encode(&selector[..4]))
}
