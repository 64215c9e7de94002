//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use contact_core::{
    ApiError, ContactClient, ContactRequest, EmailReceipt, HttpMethod, HttpResponse,
    OutboundEmail, ProviderClient, SubmitOutcome,
};

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn str_field(v: &serde_json::Value, key: &str) -> String {
    v[key].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Provider send
// ---------------------------------------------------------------------------

#[test]
fn provider_send_test_vectors() {
    let raw = include_str!("../../test-vectors/provider_send.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let base_url = vectors["base_url"].as_str().unwrap();
    let c = ProviderClient::new(base_url, vectors["api_key"].as_str().unwrap());
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let email = OutboundEmail {
            from: str_field(input, "from"),
            to: str_field(input, "to"),
            reply_to: input["reply_to"].as_str().map(str::to_string),
            subject: str_field(input, "subject"),
            html: str_field(input, "html"),
        };
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_send(&email).unwrap();
        let method = parse_method(expected_req["method"].as_str().unwrap());
        assert_eq!(req.method, method, "{name}: method");
        let url = format!("{base_url}{}", expected_req["path"].as_str().unwrap());
        assert_eq!(req.url, url, "{name}: url");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let req_body: serde_json::Value =
            serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");

        // Verify parse
        let result = c.parse_send(simulated(case));
        if let Some(expected_error) = case.get("expected_error") {
            match result.unwrap_err() {
                ApiError::Provider { status, message } => {
                    let expected_status = expected_error["status"].as_u64().unwrap();
                    assert_eq!(u64::from(status), expected_status, "{name}: status");
                    let expected_message = expected_error["message"].as_str().unwrap();
                    assert_eq!(message, expected_message, "{name}: message");
                }
                other => panic!("{name}: unexpected error {other:?}"),
            }
        } else {
            let receipt = result.unwrap();
            let expected: EmailReceipt =
                serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(receipt, expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Relay submit
// ---------------------------------------------------------------------------

#[test]
fn contact_submit_test_vectors() {
    let raw = include_str!("../../test-vectors/contact_submit.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let endpoint = vectors["endpoint"].as_str().unwrap();
    let c = ContactClient::new(endpoint);

    let req = c
        .build_submit(&ContactRequest::new("Ada", "ada@example.com", "Hello"))
        .unwrap();
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.url, endpoint);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = c.parse_submit(simulated(case));

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert!(matches!(err, ApiError::Rejected { .. }), "{name}: expected Rejected");
            assert_eq!(err.to_string(), expected_error.as_str().unwrap(), "{name}: error text");
        } else {
            let expected = match case["expected_outcome"].as_str().unwrap() {
                "Delivered" => SubmitOutcome::Delivered,
                "PartialSuccess" => SubmitOutcome::PartialSuccess,
                other => panic!("{name}: unknown expected_outcome: {other}"),
            };
            assert_eq!(result.unwrap(), expected, "{name}: outcome");
        }
    }
}
