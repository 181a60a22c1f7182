use serde_json::json;
use wiremock::matchers::{
    body_json, body_partial_json, body_string_contains, header, header_regex, method, path,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use havona_client::auth::PasswordGrant;
use havona_client::rest::trades::TradeFields;
use havona_client::{DocumentType, ExtractionMode, HavonaClient, HavonaError, PersistenceStatus};

fn build_client(server: &MockServer) -> HavonaClient {
    HavonaClient::from_token(server.uri(), "test-token").unwrap()
}

#[tokio::test]
async fn test_list_trades() {
    let server = MockServer::start().await;
    let response = json!({
        "data": {
            "queryTradeContract": [
                {
                    "id": "0x1",
                    "contractNo": "TC-001",
                    "status": "ACTIVE",
                    "contractType": "SPOT",
                    "sellerId": "seller-1",
                    "buyerId": "buyer-1",
                    "blockchainPersistence": {
                        "status": "CONFIRMED",
                        "txHash": "0xabc",
                        "blockNumber": 1042,
                        "attemptCount": 1
                    }
                },
                { "id": "0x2", "contractNo": "TC-002", "status": "DRAFT", "blockchainPersistence": null }
            ]
        }
    });

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({ "variables": { "first": 5 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let trades = client.trades().list(5, None).await.unwrap();

    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].contract_no, "TC-001");
    assert_eq!(trades[0].blockchain_status, Some(PersistenceStatus::Confirmed));
    assert_eq!(trades[0].block_number, Some(1042));
    assert_eq!(trades[0].extra_str("buyerId"), Some("buyer-1"));
    assert!(trades[1].blockchain_status.is_none());
}

#[tokio::test]
async fn test_list_trades_keeps_records_with_odd_persistence() {
    let server = MockServer::start().await;
    let response = json!({
        "data": {
            "queryTradeContract": [
                { "id": "0x1", "contractNo": "TC-001", "status": "ACTIVE" },
                {
                    "id": "0x2",
                    "contractNo": "TC-002",
                    "status": "ACTIVE",
                    "blockchainPersistence": { "status": 7, "blockNumber": "0x2a" },
                    "block_number": -1
                },
                {
                    "id": "0x3",
                    "contractNo": "TC-003",
                    "status": "DRAFT",
                    "blockchainPersistence": { "status": "PENDING", "blockNumber": "99" }
                }
            ]
        }
    });

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let trades = client.trades().list(10, None).await.unwrap();

    assert_eq!(trades.len(), 3);
    assert_eq!(trades[1].contract_no, "TC-002");
    assert!(trades[1].blockchain_status.is_none());
    assert!(trades[1].block_number.is_none());
    assert_eq!(trades[1].extra["block_number"], -1);
    assert_eq!(trades[2].blockchain_status, Some(PersistenceStatus::Pending));
    assert_eq!(trades[2].block_number, Some(99));
}

#[tokio::test]
async fn test_list_trades_null_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "queryTradeContract": null } })),
        )
        .mount(&server)
        .await;

    let client = build_client(&server);
    let trades = client.trades().list(10, Some("id status")).await.unwrap();
    assert!(trades.is_empty());
}

#[tokio::test]
async fn test_get_trade() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "id": "0x9" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "getTradeContract": { "id": "0x9", "contractNo": "TC-9", "status": "ACTIVE" } }
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let trade = client.trades().get("0x9", None).await.unwrap();
    assert_eq!(trade.id, "0x9");
    assert_eq!(trade.status, "ACTIVE");
}

#[tokio::test]
async fn test_get_trade_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "getTradeContract": null } })),
        )
        .mount(&server)
        .await;

    let client = build_client(&server);
    let err = client.trades().get("missing", None).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("TradeContract 'missing' not found"));
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn test_graphql_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Cannot query field \"bogus\"" }]
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let err = client.graphql("query { bogus }", None).await.unwrap_err();

    match err {
        HavonaError::GraphQl(graphql) => {
            assert_eq!(graphql.errors.len(), 1);
            assert_eq!(graphql.messages(), vec!["Cannot query field \"bogus\"".to_string()]);
        }
        other => panic!("expected GraphQl error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_graphql_empty_variables_omitted_and_missing_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_json(json!({ "query": "query { x }" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let data = client.graphql("query { x }", Some(json!({}))).await.unwrap();
    assert_eq!(data, json!({}));
}

#[tokio::test]
async fn test_create_trade_writes_through_dynamic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dynamic"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "type": "TradeContract",
            "contractNo": "TC-2026-001",
            "status": "DRAFT",
            "unitPrice": "82.50",
            "commodity": "Crude Oil"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "0xnew",
            "contractNo": "TC-2026-001",
            "status": "DRAFT",
            "blockchain_status": "PENDING"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let fields = TradeFields::new()
        .contract_no("TC-2026-001")
        .status("DRAFT")
        .set("unit_price", "82.50")
        .set("commodity", "Crude Oil");
    let trade = client.trades().create(fields).await.unwrap();

    assert_eq!(trade.id, "0xnew");
    assert_eq!(trade.blockchain_status, Some(PersistenceStatus::Pending));
}

#[tokio::test]
async fn test_update_trade_sets_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dynamic"))
        .and(body_json(json!({ "type": "TradeContract", "id": "0x1", "status": "ACTIVE" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "0x1", "status": "ACTIVE" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let record = client
        .trades()
        .update("0x1", TradeFields::new().status("ACTIVE"))
        .await
        .unwrap();
    assert_eq!(record["status"], "ACTIVE");
}

#[tokio::test]
async fn test_write_payload_type_wins() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dynamic"))
        .and(body_json(json!({ "type": "ETRDocument", "documentType": "BILL_OF_LADING" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "0xdoc" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let mut payload = serde_json::Map::new();
    payload.insert("type".into(), json!("ETRDocument"));
    payload.insert("documentType".into(), json!("BILL_OF_LADING"));
    let record = client.write("TradeContract", payload).await.unwrap();
    assert_eq!(record["id"], "0xdoc");
}

#[tokio::test]
async fn test_assign_book() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/trades/0x1/book"))
        .and(body_json(json!({ "book": "Physical Oil" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let result = client.trades().assign_book("0x1", "Physical Oil").await.unwrap();
    assert_eq!(result["ok"], true);
}

#[tokio::test]
async fn test_status_classification() {
    let cases = [
        (400, "bad input"),
        (401, "expired"),
        (403, "nope"),
        (404, "gone"),
        (422, "contractNo required"),
        (500, "boom"),
        (502, "bad gateway"),
    ];

    for (status, body) in cases {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/blockchain/status"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let client = build_client(&server);
        let err = client.blockchain().status().await.unwrap_err();

        assert_eq!(err.status_code(), Some(status), "status {status}");
        assert_eq!(err.response_body(), Some(body));
        match status {
            401 => {
                assert!(matches!(err, HavonaError::Auth(_)));
                assert!(err.to_string().contains("Authentication failed"));
            }
            403 => {
                assert!(matches!(err, HavonaError::Auth(_)));
                assert!(err.to_string().contains("Forbidden: insufficient permissions"));
            }
            404 => assert!(matches!(err, HavonaError::NotFound(_))),
            400 | 422 => assert!(matches!(err, HavonaError::Validation(_))),
            _ => {
                assert!(matches!(err, HavonaError::Api(_)));
                assert!(err.to_string().contains("Request failed"));
            }
        }
    }
}

#[tokio::test]
async fn test_error_body_truncated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agents/status"))
        .respond_with(ResponseTemplate::new(500).set_body_string("e".repeat(2000)))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let err = client.agents().status().await.unwrap_err();
    assert_eq!(err.response_body().unwrap().len(), 500);
}

#[tokio::test]
async fn test_invalid_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/blockchain/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let err = client.blockchain().status().await.unwrap_err();

    match err {
        HavonaError::InvalidResponse(message) => assert!(message.contains("maintenance")),
        other => panic!("expected InvalidResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn test_extract_bytes_sends_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/etr/extract"))
        .and(header("authorization", "Bearer test-token"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains("name=\"document_type\""))
        .and(body_string_contains("COMMERCIAL_INVOICE"))
        .and(body_string_contains("name=\"mode\""))
        .and(body_string_contains("filename=\"invoice.pdf\""))
        .and(body_string_contains("application/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documentType": "COMMERCIAL_INVOICE",
            "confidence": 0.91,
            "extractedData": {
                "invoiceNumber": "INV-7",
                "contractNo": "TC-7",
                "total_value": 125000
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let result = client
        .documents()
        .extract_bytes(
            "invoice.pdf",
            b"%PDF-1.4 fake".to_vec(),
            DocumentType::CommercialInvoice,
            ExtractionMode::Native,
        )
        .await
        .unwrap();

    assert_eq!(result.document_type, "COMMERCIAL_INVOICE");
    assert_eq!(result.confidence, Some(0.91));
    assert_eq!(result.fields["invoiceNumber"], "INV-7");

    let trade_fields = result.to_trade_fields();
    assert_eq!(trade_fields.get("contractNo").unwrap(), "TC-7");
    assert_eq!(trade_fields.get("totalValue").unwrap(), 125000);
}

#[tokio::test]
async fn test_extract_trade_guesses_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/blotting/extract-pdf"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("filename=\"blotter.csv\""))
        .and(body_string_contains("text/csv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "source": "excel",
            "commodity": "Wheat",
            "quantity": 5000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = std::env::temp_dir().join(format!("havona-client-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let file = dir.join("blotter.csv");
    std::fs::write(&file, "commodity,quantity\nWheat,5000\n").unwrap();

    let client = build_client(&server);
    let result = client.documents().extract_trade(&file).await.unwrap();

    assert_eq!(result.document_type, "unknown");
    assert_eq!(result.source.as_deref(), Some("excel"));
    assert_eq!(result.fields.len(), 2);
    assert_eq!(result.fields["commodity"], "Wheat");

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_extract_missing_file_is_io_error() {
    let server = MockServer::start().await;
    let client = build_client(&server);

    let err = client
        .etrs()
        .extract(
            "/nonexistent/havona/bol.pdf",
            DocumentType::BillOfLading,
            ExtractionMode::Text,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HavonaError::Io(_)));
}

#[tokio::test]
async fn test_supported_types_wrapped_and_bare() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/etr/types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "types": [
                { "id": "COMMERCIAL_INVOICE", "name": "Commercial Invoice" },
                { "id": "BILL_OF_LADING", "name": "Bill of Lading", "description": "Carrier receipt" }
            ]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/etr/types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "CERTIFICATE_OF_ORIGIN", "name": "Certificate of Origin" }
        ])))
        .mount(&server)
        .await;

    let client = build_client(&server);

    let types = client.documents().supported_types().await.unwrap();
    assert_eq!(types.len(), 2);
    assert_eq!(types[1].description.as_deref(), Some("Carrier receipt"));

    let types = client.etrs().types().await.unwrap();
    assert_eq!(types.len(), 1);
    assert_eq!(
        DocumentType::from(types[0].id.as_str()),
        DocumentType::CertificateOfOrigin
    );
}

#[tokio::test]
async fn test_agents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "agents": [
                { "id": 1, "name": "Blotter", "agentType": "blotting", "wallet": "0xa" },
                { "id": 2, "name": "Checker", "type": "compliance", "agentWallet": "0xb" }
            ],
            "total": 2
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/agents/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2, "name": "Checker", "type": "compliance", "tokenURI": "ipfs://checker"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/agents/2/reputation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalFeedback": 12, "averageScore": 4.5, "breakdown": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/agents/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "connected": true, "contractAddress": "0xregistry", "totalAgents": 2
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);

    let agents = client.agents().list().await.unwrap();
    assert_eq!(agents.len(), 2);
    assert_eq!(agents[1].agent_type, "compliance");
    assert_eq!(agents[1].wallet.as_deref(), Some("0xb"));

    let agent = client.agents().get(2).await.unwrap();
    assert_eq!(agent.metadata_uri.as_deref(), Some("ipfs://checker"));

    let reputation = client.agents().reputation(2).await.unwrap();
    assert_eq!(reputation.agent_id, 2);
    assert_eq!(reputation.total_feedback, 12);
    assert_eq!(reputation.average_score, Some(4.5));

    let status = client.agents().status().await.unwrap();
    assert!(status.connected);
    assert_eq!(status.total_agents, 2);
}

#[tokio::test]
async fn test_agents_list_without_chain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "agents": null, "error": "offline" })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    assert!(client.agents().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_blockchain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/blockchain/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "connected": true,
            "chain_id": 23295,
            "network": "sapphire-testnet",
            "contract_address": "0xcontract",
            "blockHeight": 99
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/blockchain/persistence/0x1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recordId": "0x1",
            "status": "CONFIRMED",
            "txHash": "0xtx",
            "blockNumber": 1042,
            "attemptCount": 1,
            "createdAt": "2026-03-01T10:00:00Z"
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);

    let status = client.blockchain().status().await.unwrap();
    assert!(status.connected);
    assert_eq!(status.chain_id, Some(23295));
    assert_eq!(status.contract_address.as_deref(), Some("0xcontract"));
    assert_eq!(status.extra["blockHeight"], 99);

    let raw = client.blockchain().raw_status().await.unwrap();
    assert_eq!(raw["network"], "sapphire-testnet");

    let record = client.blockchain().persistence("0x1").await.unwrap();
    assert_eq!(record.status, PersistenceStatus::Confirmed);
    assert_eq!(record.block_number, Some(1042));
    assert_eq!(record.attempt_count, 1);
}

#[tokio::test]
async fn test_password_client_fetches_token_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "issued-jwt",
            "expires_in": 86400
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/blockchain/status"))
        .and(header("authorization", "Bearer issued-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "connected": true })))
        .expect(2)
        .mount(&server)
        .await;

    let grant = PasswordGrant::new(
        server.uri(),
        "https://api.havona.test",
        "spa-client",
        "trader@example.com",
        "hunter2",
    );
    let client = HavonaClient::from_credentials(server.uri(), grant).unwrap();

    assert!(client.blockchain().status().await.unwrap().connected);
    assert!(client.blockchain().status().await.unwrap().connected);
    assert!(client.token_cache().has_valid_token().await);
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "revoked" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/agents"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid_token" })))
        .expect(1)
        .mount(&server)
        .await;

    let grant = PasswordGrant::new(
        server.uri(),
        "https://api.havona.test",
        "spa-client",
        "trader@example.com",
        "hunter2",
    );
    let client = HavonaClient::from_credentials(server.uri(), grant).unwrap();

    let err = client.agents().list().await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(err.status_code(), Some(401));
}

#[tokio::test]
async fn test_identity_failure_skips_platform_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid_grant" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/blockchain/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "connected": true })))
        .expect(0)
        .mount(&server)
        .await;

    let grant = PasswordGrant::new(
        server.uri(),
        "https://api.havona.test",
        "spa-client",
        "trader@example.com",
        "wrong",
    );
    let client = HavonaClient::from_credentials(server.uri(), grant).unwrap();

    let err = client.blockchain().status().await.unwrap_err();
    assert!(err.is_auth());
    assert!(err.response_body().unwrap().contains("invalid_grant"));
}
