mod common;

use common::{args, config, path, write};
use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use witsync_cli::commands::entity::handle_entity;
use witsync_core::api::{CliError, MirrorFile};

const PRODUCTS: &str = r#"[
    {"name": "Gold Foil", "erp_id": 1, "isActive": true},
    {"name": "Acrylic Sign", "erp_id": 2, "isActive": true}
]"#;

const PRODUCT_MIRROR: &str = r#"{
    "name": "product",
    "roles": ["product"],
    "lookups": ["free-text", "keywords"],
    "keywords": [
        {"keyword": "Gold Foil", "synonyms": ["Gold Foil", "gold foil"]},
        {"keyword": "Banner", "synonyms": ["Banner"]}
    ]
}"#;

#[tokio::test]
async fn sync_then_force_upload_sends_the_synced_document() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("mylarAiQuotes.products.json"), PRODUCTS);
    write(&dir.path().join("entities/product.json"), PRODUCT_MIRROR);

    let mut server = Server::new_async().await;
    let cfg = config(dir.path(), &server.url());

    assert_eq!(handle_entity(&cfg, &args(&["product", "sync"])).await.unwrap(), 0);

    let mirror = MirrorFile::new(dir.path().join("entities/product.json"));
    let doc = mirror.load().unwrap();
    assert_eq!(doc.keyword_names(), vec!["Gold Foil", "Acrylic Sign"]);
    // untouched entries keep their synonyms
    assert_eq!(doc.keywords[0].synonyms, vec!["Gold Foil", "gold foil"]);
    assert_eq!(
        doc.keywords[1].synonyms,
        vec!["Acrylic Sign", "acrylic sign"]
    );

    let payload = serde_json::to_value(&doc).unwrap();
    let delete = server
        .mock("DELETE", path("/entities/product"))
        .match_header("authorization", "Bearer test-token")
        .with_status(404)
        .with_body(r#"{"error":"not found","code":"not-found"}"#)
        .create_async()
        .await;
    let post = server
        .mock("POST", path("/entities"))
        .match_body(Matcher::Json(payload.clone()))
        .with_status(409)
        .with_body(r#"{"error":"entity exists"}"#)
        .create_async()
        .await;
    let put = server
        .mock("PUT", path("/entities/product"))
        .match_body(Matcher::Json(payload))
        .with_status(200)
        .with_body(r#"{"name":"product"}"#)
        .create_async()
        .await;

    let code = handle_entity(&cfg, &args(&["product", "force-upload"]))
        .await
        .unwrap();
    assert_eq!(code, 0);
    delete.assert_async().await;
    post.assert_async().await;
    put.assert_async().await;
}

#[tokio::test]
async fn compare_and_clean_leave_unmanaged_fields_alone() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("mylarAiQuotes.products.json"), PRODUCTS);
    write(
        &dir.path().join("entities/product.json"),
        r#"{"id": "1234", "name": "product", "roles": ["product"], "lookups": ["keywords"],
            "keywords": [{"keyword": "Banner", "synonyms": ["Banner"]}]}"#,
    );
    let cfg = config(dir.path(), "http://127.0.0.1:9");

    assert_eq!(handle_entity(&cfg, &args(&["product", "check"])).await.unwrap(), 0);
    assert_eq!(handle_entity(&cfg, &args(&["product", "clean"])).await.unwrap(), 0);

    let raw = std::fs::read_to_string(dir.path().join("entities/product.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["id"], "1234");
    assert_eq!(value["keywords"], serde_json::json!([]));
    assert!(raw.contains("\n    \"keywords\""));
    assert!(raw.ends_with('\n'));
}

#[tokio::test]
async fn api_failure_surfaces_as_api_error() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("entities/quantities.json"), r#"{"name": "quantities", "keywords": []}"#);

    let mut server = Server::new_async().await;
    let _get = server
        .mock("GET", path("/entities/quantities"))
        .with_status(401)
        .with_body(r#"{"error":"Bad auth, check token/params","code":"no-auth"}"#)
        .create_async()
        .await;

    let cfg = config(dir.path(), &server.url());
    let err = handle_entity(&cfg, &args(&["quantities", "import"]))
        .await
        .unwrap_err();
    match err {
        CliError::Api(api) => assert_eq!(api.status(), Some(401)),
        other => panic!("expected api error, got {other:?}"),
    }
}
