use super::*;
use crate::models::MediaKind;
use mockito::Matcher;
use serde_json::json;

fn client_for(server: &mockito::Server) -> OriginClient {
    OriginClient::new(server.url(), Duration::from_secs(5))
}

fn listing_response() -> serde_json::Value {
    json!({
        "success": true,
        "items": [
            {
                "id": 101,
                "title": "First Film",
                "poster": "https://img.example/1.jpg",
                "rating": 7.5,
                "year": "2024",
                "type": "movie",
                "genre": "Drama",
                "detailPath": "/film/first-film"
            },
            {
                "id": "102",
                "title": "Second Show",
                "poster": "https://img.example/2.jpg",
                "rating": "8.0",
                "year": 2023,
                "type": "tv",
                "genre": ["Crime", "Thriller"],
                "detailPath": "/series/second-show"
            }
        ],
        "page": 1,
        "hasMore": true
    })
}

#[tokio::test]
async fn fetch_category_parses_a_lenient_listing() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("action".into(), "trending".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing_response().to_string())
        .create_async()
        .await;

    let listing = client_for(&server).fetch_category("trending", 2).await;

    assert!(listing.success);
    assert!(listing.has_more);
    assert_eq!(listing.items.len(), 2);
    assert_eq!(listing.items[0].id, "101");
    assert_eq!(listing.items[0].rating, "7.5");
    assert_eq!(listing.items[1].kind, MediaKind::Series);
    assert_eq!(listing.items[1].genre, "Crime, Thriller");
    mock.assert_async().await;
}

#[tokio::test]
async fn server_error_degrades_to_the_empty_page() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_status(500)
        .create_async()
        .await;

    let listing = client_for(&server).fetch_category("trending", 1).await;
    assert_eq!(listing, CatalogPage::empty());
}

#[tokio::test]
async fn malformed_json_degrades_to_the_empty_page() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let listing = client_for(&server).search("anything").await;
    assert_eq!(listing, CatalogPage::empty());
}

#[tokio::test]
async fn aliased_category_goes_out_as_a_search() {
    let mut server = mockito::Server::new_async().await;
    let as_category = server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded(
            "action".into(),
            actions::HOLLYWOOD_MOVIES.into(),
        ))
        .expect(0)
        .create_async()
        .await;
    let as_search = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("action".into(), "search".into()),
            Matcher::UrlEncoded("q".into(), "hollywood".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing_response().to_string())
        .expect(1)
        .create_async()
        .await;

    let listing = client_for(&server)
        .fetch_category(actions::HOLLYWOOD_MOVIES, 1)
        .await;

    assert!(listing.success);
    as_category.assert_async().await;
    as_search.assert_async().await;
}

#[tokio::test]
async fn detail_record_is_located_and_normalized() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("action".into(), "detail".into()),
            Matcher::UrlEncoded("detailPath".into(), "/film/first-film".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "data": {
                    "name": "First Film",
                    "thumb": "https://img.example/1.jpg",
                    "synopsis": "A film.",
                    "embed_url": "https://embed.example/first-film"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let record = client_for(&server).get_detail("/film/first-film").await;
    let record = record.expect("detail should be present");
    assert_eq!(record.title, "First Film");
    assert_eq!(record.player_url, "https://embed.example/first-film");
    assert_eq!(record.kind, MediaKind::Movie);
}

#[tokio::test]
async fn detail_envelope_keys_resolve_in_priority_order() {
    // `item` is null here, so `items[0]` must win over `result`.
    let payload = json!({
        "success": true,
        "item": null,
        "items": [{"title": "From Items"}],
        "result": {"title": "From Result"}
    });
    let located = locate_detail_item(&payload).expect("an envelope key should match");
    assert_eq!(located.get("title").unwrap(), "From Items");

    let payload = json!({"success": true, "result": {"title": "From Result"}});
    let located = locate_detail_item(&payload).unwrap();
    assert_eq!(located.get("title").unwrap(), "From Result");

    let payload = json!({"success": true});
    assert!(locate_detail_item(&payload).is_none());
}

#[tokio::test]
async fn unsuccessful_detail_response_is_none() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"success": false}).to_string())
        .create_async()
        .await;

    assert!(client_for(&server).get_detail("/film/missing").await.is_none());
}

#[tokio::test]
async fn detail_transport_error_is_none() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_status(502)
        .create_async()
        .await;

    assert!(client_for(&server).get_detail("/film/any").await.is_none());
}
