mod common;

use common::{config, path, write};
use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use serde_json::json;
use witsync_cli::commands::import::run_import_all;
use witsync_plugins::wit::WitClient;

#[tokio::test]
async fn import_all_uploads_every_directory_in_order() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("entities/finishes.json"),
        r#"{"name": "finishes", "roles": ["finishes"], "lookups": ["keywords"], "keywords": []}"#,
    );
    write(&dir.path().join("intents/get_quote.json"), r#"{"name": "get_quote"}"#);
    write(
        &dir.path().join("utterances/quotes.json"),
        r#"{"utterances": [
            {"text": "price for 100 stickers", "intent": "get_quote", "entities": [], "traits": []},
            {"text": "no intent"},
            {"text": "200 labels please", "intent": "get_quote", "entities": [], "traits": []}
        ]}"#,
    );

    let mut server = Server::new_async().await;
    let get_entity = server
        .mock("GET", path("/entities/finishes"))
        .with_status(200)
        .with_body(r#"{"name":"finishes"}"#)
        .create_async()
        .await;
    let put_entity = server
        .mock("PUT", path("/entities/finishes"))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let delete_intent = server
        .mock("DELETE", path("/intents/get_quote"))
        .with_status(200)
        .with_body(r#"{"deleted":"get_quote"}"#)
        .create_async()
        .await;
    let create_intent = server
        .mock("POST", path("/intents"))
        .match_body(Matcher::Json(json!({"name": "get_quote"})))
        .with_status(200)
        .with_body(r#"{"name":"get_quote"}"#)
        .create_async()
        .await;
    let intent_lookup = server
        .mock("GET", path("/intents/get_quote"))
        .with_status(200)
        .with_body(r#"{"name":"get_quote"}"#)
        .create_async()
        .await;
    let utterances = server
        .mock("POST", path("/utterances"))
        .with_status(200)
        .with_body(r#"{"sent":true,"n":1}"#)
        .expect(2)
        .create_async()
        .await;

    let cfg = config(dir.path(), &server.url());
    let client = WitClient::from_config(&cfg.wit).unwrap();
    let code = run_import_all(&cfg, &client).await.unwrap();

    // one utterance was invalid
    assert_eq!(code, 1);
    get_entity.assert_async().await;
    put_entity.assert_async().await;
    delete_intent.assert_async().await;
    create_intent.assert_async().await;
    intent_lookup.assert_async().await;
    utterances.assert_async().await;
}
