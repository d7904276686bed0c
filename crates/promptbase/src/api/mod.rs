mod page;
mod prompts;

use std::fmt::Display;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use promptbase_core::Gateway;

use crate::render::PageRenderer;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub pages: Arc<PageRenderer>,
}

pub fn create_router(gateway: Arc<Gateway>) -> Result<Router, minijinja::Error> {
    let state = AppState {
        gateway,
        pages: Arc::new(PageRenderer::new()?),
    };

    Ok(Router::new()
        .route("/", get(page::show))
        .route("/prompts", post(page::create))
        .route("/prompts/{id}", post(page::edit))
        .route("/prompts/{id}/delete", post(page::delete))
        .route("/prompts/{id}/favorite", post(page::toggle_favorite))
        .route("/api/prompts", get(prompts::list_prompts))
        .route("/api/prompts/{id}", get(prompts::get_prompt))
        .route("/api/prompts/{id}/template", get(prompts::get_template))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Store and rendering failures are not recovered; they end the interaction.
fn internal_error<E: Display>(err: E) -> (StatusCode, String) {
    tracing::error!("request failed: {}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use promptbase_core::{ADDED_MESSAGE, MISSING_FIELDS_MESSAGE, UPDATED_MESSAGE};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> (Arc<Gateway>, Router) {
        let gateway = Arc::new(Gateway::open_in_memory().unwrap());
        let router = create_router(gateway.clone()).unwrap();
        (gateway, router)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_index_renders_empty_page() {
        let (_, router) = app();

        let (status, html) = send(&router, get_request("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<h1>PromptBase</h1>"));
        assert!(html.contains("Favorites First"));
    }

    #[tokio::test]
    async fn test_create_prompt() {
        let (gateway, router) = app();

        let (status, html) = send(
            &router,
            form_post("/prompts", "title=Greeting&prompt=Hello%2C+%7Bname%7D%21"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(ADDED_MESSAGE));
        assert!(html.contains("Greeting (Created: "));

        let stored = gateway
            .prompts()
            .unwrap()
            .search("", Default::default())
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].prompt, "Hello, {name}!");
        assert!(!stored[0].is_favorite);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_fields() {
        let (gateway, router) = app();

        let (status, html) = send(&router, form_post("/prompts", "title=&prompt=body")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(MISSING_FIELDS_MESSAGE));
        assert!(html.contains("notice error"));

        let (_, html) = send(&router, form_post("/prompts", "title=Only+title")).await;
        assert!(html.contains(MISSING_FIELDS_MESSAGE));
        // The rejected input is shown again
        assert!(html.contains("value=\"Only title\""));

        assert_eq!(gateway.prompts().unwrap().count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_edit_prompt() {
        let (gateway, router) = app();
        let id = gateway
            .prompts()
            .unwrap()
            .insert("Greeting", "Hello", false)
            .unwrap();

        let (_, html) = send(&router, get_request(&format!("/?edit={}", id))).await;
        assert!(html.contains(&format!("id=\"prompt_form_{}\"", id)));

        let (status, html) = send(
            &router,
            form_post(
                &format!("/prompts/{}?search=&sort=favorites-first", id),
                "title=Greeting&prompt=Hello&is_favorite=on",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(UPDATED_MESSAGE));
        assert!(!html.contains(&format!("id=\"prompt_form_{}\"", id)));

        let stored = gateway.prompts().unwrap().fetch_one(id).unwrap().unwrap();
        assert!(stored.is_favorite);
    }

    #[tokio::test]
    async fn test_edit_rejection_keeps_editor_open() {
        let (gateway, router) = app();
        let id = gateway
            .prompts()
            .unwrap()
            .insert("Greeting", "Hello", false)
            .unwrap();

        let (_, html) = send(
            &router,
            form_post(&format!("/prompts/{}", id), "title=Greeting&prompt="),
        )
        .await;
        assert!(html.contains(MISSING_FIELDS_MESSAGE));
        assert!(html.contains(&format!("id=\"prompt_form_{}\"", id)));

        let stored = gateway.prompts().unwrap().fetch_one(id).unwrap().unwrap();
        assert_eq!(stored.prompt, "Hello");
    }

    #[tokio::test]
    async fn test_delete_and_toggle() {
        let (gateway, router) = app();
        let id = gateway
            .prompts()
            .unwrap()
            .insert("Doomed", "body", false)
            .unwrap();

        let (status, _) = send(&router, form_post(&format!("/prompts/{}/favorite", id), "")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(gateway.prompts().unwrap().fetch_one(id).unwrap().unwrap().is_favorite);

        let (status, html) = send(&router, form_post(&format!("/prompts/{}/delete", id), "")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!html.contains("Doomed"));
        assert!(gateway.prompts().unwrap().fetch_one(id).unwrap().is_none());

        // Acting on a row that is already gone is silent
        let (status, _) = send(&router, form_post(&format!("/prompts/{}/delete", id), "")).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&router, form_post(&format!("/prompts/{}/favorite", id), "")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_template_for_missing_row_shows_nothing() {
        let (_, router) = app();

        let (status, html) = send(&router, get_request("/?template=42")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!html.contains("Copy and paste this template"));
    }

    #[tokio::test]
    async fn test_empty_row_ids_open_nothing() {
        let (gateway, router) = app();
        let id = gateway
            .prompts()
            .unwrap()
            .insert("Greeting", "Hello", false)
            .unwrap();

        let (status, html) = send(&router, get_request("/?search=&sort=newest&edit=&template=")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Greeting (Created: "));
        assert!(!html.contains(&format!("id=\"prompt_form_{}\"", id)));
        assert!(!html.contains("Copy and paste this template"));

        let (status, _) = send(&router, get_request("/?edit=abc&template=%20")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&router, form_post("/prompts?edit=", "title=New&prompt=Body")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(gateway.prompts().unwrap().count().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unknown_sort_falls_back() {
        let (_, router) = app();

        let (status, html) = send(&router, get_request("/?sort=created_at%3B+DROP")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("value=\"newest\" selected"));
    }

    #[tokio::test]
    async fn test_api_list_and_get() {
        let (gateway, router) = app();
        let store = gateway.prompts().unwrap();
        store.insert("A", "first", false).unwrap();
        let b = store.insert("B", "second", true).unwrap();
        store.insert("C", "third", false).unwrap();
        drop(store);

        let (status, body) = send(&router, get_request("/api/prompts?sort=favorites-first")).await;
        assert_eq!(status, StatusCode::OK);
        let list: Value = serde_json::from_str(&body).unwrap();
        let titles: Vec<&str> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["B", "C", "A"]);

        let (_, body) = send(&router, get_request("/api/prompts?search=SEC")).await;
        let list: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, body) = send(&router, get_request(&format!("/api/prompts/{}", b))).await;
        assert_eq!(status, StatusCode::OK);
        let prompt: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(prompt["isFavorite"], true);

        let (status, _) = send(&router, get_request("/api/prompts/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_api_template() {
        let (gateway, router) = app();
        let id = gateway
            .prompts()
            .unwrap()
            .insert("Greeting", "Hello, {name}!", false)
            .unwrap();

        let (status, body) =
            send(&router, get_request(&format!("/api/prompts/{}/template", id))).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["template"], "Title: Greeting\n---\nContent: Hello, {name}!");

        let (status, _) = send(&router, get_request("/api/prompts/999/template")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
