//! Integration tests for the HTTP cart client against a mock site

use mockito::{Matcher, Server};
use tienda::cart::{CartError, CartService, HttpCartService, ADD_FAILED_MESSAGE};
use tienda::catalog::{CatalogService, HttpCatalogService, ItemId, SearchOptions};
use tienda::config::Config;
use tienda::session::StoreSession;

fn session(server: &Server, cookies: &[&str]) -> StoreSession {
    let config = Config {
        site_base_url: server.url(),
        api_base_url: format!("{}/api/", server.url()),
        cookies: cookies.iter().map(|c| c.to_string()).collect(),
        ..Config::default()
    };
    StoreSession::new(&config).expect("session should build")
}

#[tokio::test]
async fn test_add_posts_with_script_and_csrf_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/cart/add/7/")
        .match_header("x-requested-with", "XMLHttpRequest")
        .match_header("x-csrftoken", "abc123")
        .match_header("cookie", Matcher::Regex("csrftoken=abc123".into()))
        .with_status(200)
        .with_body(r#"{"ok": true}"#)
        .create_async()
        .await;

    let cart = HttpCartService::new(session(&server, &["csrftoken=abc123"]), "csrftoken");
    cart.add(&ItemId::new("7").unwrap())
        .await
        .expect("add should succeed");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_add_sends_no_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/cart/add/7/")
        .match_body("")
        .with_status(204)
        .create_async()
        .await;

    let cart = HttpCartService::new(session(&server, &["csrftoken=abc123"]), "csrftoken");
    assert!(cart.add(&ItemId::new("7").unwrap()).await.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rejected_add_uses_fixed_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/cart/add/7/")
        .with_status(403)
        .with_body("CSRF verification failed.")
        .create_async()
        .await;

    let cart = HttpCartService::new(session(&server, &[]), "csrftoken");
    let err = cart.add(&ItemId::new("7").unwrap()).await.unwrap_err();

    assert!(matches!(err, CartError::AddFailed { status: 403 }), "got {err:?}");
    assert_eq!(err.to_string(), ADD_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_token_set_by_site_is_used_on_next_add() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/productos/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("set-cookie", "csrftoken=rotated; Path=/")
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;
    let add = server
        .mock("POST", "/cart/add/3/")
        .match_header("x-csrftoken", "rotated")
        .with_status(200)
        .create_async()
        .await;

    let session = session(&server, &["csrftoken=old"]);
    let catalog = HttpCatalogService::new(&session, format!("{}/api/", server.url()));
    catalog.browse(&SearchOptions::default()).await.unwrap();

    assert_eq!(session.cookie("csrftoken").as_deref(), Some("rotated"));

    let cart = HttpCartService::new(session, "csrftoken");
    cart.add(&ItemId::new("3").unwrap()).await.unwrap();
    add.assert_async().await;
}

#[tokio::test]
async fn test_identifier_with_path_characters_stays_in_cart_endpoint() {
    let mut server = Server::new_async().await;
    let escaped = server
        .mock("POST", "/cart/add/a%2Fb%3Fc/")
        .with_status(200)
        .create_async()
        .await;
    let elsewhere = server
        .mock("POST", Matcher::Regex("^/(admin|cart/add/a/)".into()))
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    let cart = HttpCartService::new(session(&server, &["csrftoken=abc123"]), "csrftoken");
    cart.add(&ItemId::new("a/b?c").unwrap()).await.unwrap();

    escaped.assert_async().await;
    elsewhere.assert_async().await;
}
