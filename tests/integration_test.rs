//! Integration tests for the storefront crate
//!
//! The storefront server is stood in for by wiremock; on-disk storage
//! backends run in temporary directories.

use serde_json::json;
use std::sync::Arc;
use storefront::cart::{CountBadge, NoticeBoard};
use storefront::chat::{ChatEntry, Sender};
use storefront::storage::{FileSystemStorage, InMemoryStorage, SqliteStorage};
use storefront::{
    ApiError, CartStore, ChatOutcome, ChatPanel, KeyValueStorage, Product, ProductId,
    RecommendationsPanel, StorefrontApi, StorefrontClient,
};
use tempfile::tempdir;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_cart_round_trip_through_filesystem() {
    let dir = tempdir().unwrap();

    {
        let storage = Arc::new(FileSystemStorage::new(dir.path()).unwrap());
        let mut store = CartStore::open(storage);
        store.add_item(Product::new(1, "Oxford shirt", 10.0)).unwrap();
        store.add_item(Product::new(1, "Oxford shirt", 10.0)).unwrap();
        store.add_item(Product::new(2, "Socks", 5.0)).unwrap();
    }

    let storage = Arc::new(FileSystemStorage::new(dir.path()).unwrap());
    let badge = Arc::new(CountBadge::new());
    let store = CartStore::builder(storage).view(badge.clone()).open();

    assert_eq!(store.items().len(), 2);
    assert_eq!(store.get(&ProductId::Number(1)).unwrap().quantity, 2);
    assert_eq!(store.total(), 25.0);
    assert_eq!(badge.text(), "3");
}

#[test]
fn test_cart_round_trip_through_sqlite() {
    let dir = tempdir().unwrap();

    {
        let mut store = CartStore::open(Arc::new(SqliteStorage::open(dir.path()).unwrap()));
        store.add_item(Product::new("sku-9", "Cap", 30.0)).unwrap();
        store.update_quantity(&ProductId::from("sku-9"), 4).unwrap();
    }

    let store = CartStore::open(Arc::new(SqliteStorage::open(dir.path()).unwrap()));
    assert_eq!(store.item_count(), 4);
    assert_eq!(store.total(), 120.0);
}

#[test]
fn test_corrupted_file_yields_empty_cart() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("cart.json"), "[{\"id\": 1, \"name\": ").unwrap();

    let storage = Arc::new(FileSystemStorage::new(dir.path()).unwrap());
    let mut store = CartStore::open(storage.clone());
    assert!(store.is_empty());

    // The next mutation overwrites the corrupted value
    store.add_item(Product::new(3, "Belt", 40.0)).unwrap();
    let json = storage.get_item("cart").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value, json!([{"id": 3, "name": "Belt", "price": 40.0, "quantity": 1}]));
}

#[test]
fn test_add_then_remove_updates_badge_and_notices() {
    let badge = Arc::new(CountBadge::new());
    let board = Arc::new(NoticeBoard::new());
    let mut store = CartStore::builder(Arc::new(InMemoryStorage::new()))
        .view(badge.clone())
        .notifier(board.clone())
        .added_message("Added to cart")
        .open();

    for _ in 0..3 {
        store.add_item(Product::new(8, "Scarf", 12.0)).unwrap();
    }
    assert_eq!(badge.text(), "3");

    store.remove_item(&ProductId::Number(8)).unwrap();
    assert_eq!(badge.text(), "0");

    let notices = board.active();
    assert_eq!(notices.len(), 3);
    assert!(notices.iter().all(|n| n.message == "Added to cart"));
}

#[tokio::test]
async fn test_recommendations_are_fetched_and_rendered() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recommend/5"))
        .and(query_param("limit", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "product_id": 5,
            "recommendations": [
                {"id": 6, "name": "Denim jacket", "price": 350.0, "thumbnail_url": "https://cdn/6.png", "category": "jacket"},
                {"id": 7, "name": "Chinos", "price": 180.5, "thumbnail_url": null}
            ],
            "count": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(StorefrontClient::new(&server.uri()).unwrap());
    let panel = RecommendationsPanel::new(client).with_limit(Some(4));

    let cards = panel.load(&ProductId::Number(5)).await.unwrap();

    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].href, "/product/6");
    assert_eq!(cards[0].image_url, "https://cdn/6.png");
    assert_eq!(cards[1].image_url, "/static/images/placeholder.png");
    assert_eq!(cards[1].price_label, "180.5 ر.س");
}

#[tokio::test]
async fn test_missing_recommendation_list_renders_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recommend/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"product_id": 5})))
        .mount(&server)
        .await;

    let client = Arc::new(StorefrontClient::new(&server.uri()).unwrap());
    let cards = RecommendationsPanel::new(client)
        .load(&ProductId::Number(5))
        .await
        .unwrap();

    assert!(cards.is_empty());
}

#[tokio::test]
async fn test_recommendation_failures_are_typed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recommend/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recommend/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = StorefrontClient::new(&server.uri()).unwrap();

    let err = client.recommendations(&ProductId::Number(1), None).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));

    let err = client.recommendations(&ProductId::Number(2), None).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_trending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/trending"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "trending": [{"id": 1, "name": "Tee", "price": 90.0}],
            "count": 1
        })))
        .mount(&server)
        .await;

    let client = Arc::new(StorefrontClient::new(&server.uri()).unwrap());
    let cards = RecommendationsPanel::new(client)
        .with_limit(Some(2))
        .load_trending()
        .await
        .unwrap();

    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].title, "Tee");
}

#[tokio::test]
async fn test_chat_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({"message": "Do you have linen shirts?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Yes, three colours."})))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(StorefrontClient::new(&server.uri()).unwrap());
    let mut panel = ChatPanel::new(client);

    let outcome = panel.submit("Do you have linen shirts?\n").await.unwrap();

    assert!(matches!(outcome, ChatOutcome::Replied(ref r) if r == "Yes, three colours."));
    assert_eq!(panel.typing_indicators(), 0);
    assert_eq!(
        panel.transcript().last(),
        Some(&ChatEntry::Message {
            sender: Sender::Assistant,
            text: "Yes, three colours.".to_string()
        })
    );
}

#[tokio::test]
async fn test_chat_failure_shows_one_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Message is required"})))
        .mount(&server)
        .await;

    let client = Arc::new(StorefrontClient::new(&server.uri()).unwrap());
    let mut panel = ChatPanel::new(client).with_fallback_message("Something went wrong");

    let outcome = panel.submit("hello").await.unwrap();

    assert!(matches!(outcome, ChatOutcome::Failed(ApiError::Status { status: 400, .. })));
    assert_eq!(panel.typing_indicators(), 0);
    assert_eq!(
        panel
            .messages()
            .filter(|(_, text)| *text == "Something went wrong")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_chat_unreachable_server_falls_back() {
    // Nothing listens on the discard port
    let client = Arc::new(StorefrontClient::new("http://127.0.0.1:9").unwrap());
    let mut panel = ChatPanel::new(client).with_fallback_message("offline");

    let outcome = panel.submit("anyone there?").await.unwrap();

    assert!(matches!(outcome, ChatOutcome::Failed(ApiError::Transport(_))));
    let messages: Vec<_> = panel.messages().collect();
    assert_eq!(
        messages,
        vec![(Sender::User, "anyone there?"), (Sender::Assistant, "offline")]
    );
}

#[tokio::test]
async fn test_recommended_product_goes_into_cart() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recommend/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recommendations": [{"id": 2, "name": "Loafers", "price": 420.0}]
        })))
        .mount(&server)
        .await;

    let client = StorefrontClient::new(&server.uri()).unwrap();
    let products = client.recommendations(&ProductId::Number(1), None).await.unwrap();

    let mut store = CartStore::open(Arc::new(InMemoryStorage::new()));
    for product in products {
        store.add_item(product.into()).unwrap();
    }

    assert_eq!(store.get(&ProductId::Number(2)).unwrap().name, "Loafers");
    assert_eq!(store.total(), 420.0);
}
