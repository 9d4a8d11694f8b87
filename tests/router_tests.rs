mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use common::*;
use property_portal::{
    MemoryRepository, MockStorageService,
    models::{Blog, CATEGORY_LUXURY, CATEGORY_TRENDING, Career, Developer, Property, Task},
    repository::Repository,
};
use uuid::Uuid;

fn listing(name: &str, about: &str, categories: &[&str]) -> Property {
    let mut property = Property {
        id: Uuid::new_v4(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        ..Property::default()
    };
    property.details.name = name.to_string();
    property.details.about = about.to_string();
    property.details.location = "Pune".to_string();
    property
}

// --- Public pages ---

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::new();
    let response = app.send(get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn home_filters_by_category() {
    let app = TestApp::new();
    app.repo
        .create_property(listing("Skyline Towers", "", &[CATEGORY_TRENDING]))
        .await
        .unwrap();
    app.repo
        .create_property(listing("Palm Residency", "", &[CATEGORY_LUXURY]))
        .await
        .unwrap();

    let response = app.send(get("/?categories=Trending")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Skyline Towers"));
    assert!(!body.contains("Palm Residency"));
    assert!(body.contains("Pune (2)"), "location summary covers every listing");
}

#[tokio::test]
async fn home_fails_with_500_when_repository_is_down() {
    let app = TestApp::with(MemoryRepository::new_failing(), MockStorageService::new());
    let response = app.send(get("/")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Server Error");
}

#[tokio::test]
async fn property_detail_distinguishes_invalid_and_missing_ids() {
    let app = TestApp::new();

    let response = app.send(get("/property/not-an-id")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid property ID");

    let response = app.send(get(&format!("/property/{}", Uuid::new_v4()))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Property not found");
}

#[tokio::test]
async fn property_detail_renders_developer() {
    let app = TestApp::new();
    let developer = app
        .repo
        .create_developer(Developer {
            id: Uuid::new_v4(),
            name: "Kumar Builders".to_string(),
            ..Developer::default()
        })
        .await
        .unwrap();
    let mut property = listing("Riverside", "", &[]);
    property.developer = Some(developer.id);
    let property = app.repo.create_property(property).await.unwrap();

    let response = app.send(get(&format!("/property/{}", property.id))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Riverside"));
    assert!(body.contains("Kumar Builders"));
}

#[tokio::test]
async fn location_page_decodes_path() {
    let app = TestApp::new();
    let mut property = listing("Harbour View", "", &[]);
    property.details.location = "Navi Mumbai".to_string();
    app.repo.create_property(property).await.unwrap();

    let response = app.send(get("/properties/location/Navi%20Mumbai")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Harbour View"));
}

#[tokio::test]
async fn unknown_developer_and_blog_are_404() {
    let app = TestApp::new();
    let response = app.send(get(&format!("/developer/{}", Uuid::new_v4()))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.send(get("/blogdetails/garbage")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Blog not found");
}

#[tokio::test]
async fn static_pages_render() {
    let app = TestApp::new();
    for path in ["/about", "/contact", "/term", "/policy", "/career", "/trending", "/developers"] {
        let response = app.send(get(path)).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", path);
    }
}

// --- Search & JSON ---

#[tokio::test]
async fn search_matches_name_or_about_and_strips_tags() {
    let app = TestApp::new();
    app.repo
        .create_property(listing("Sky Villas", "", &[]))
        .await
        .unwrap();
    app.repo
        .create_property(listing("Green Acres", "Villas near the sky line", &[]))
        .await
        .unwrap();
    app.repo
        .create_property(listing("Lake Homes", "", &[]))
        .await
        .unwrap();

    let response = app.send(get("/search?q=%3Cb%3EVILLAS%3C%2Fb%3E")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let hits: Vec<Property> = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(hits.len(), 2);

    let response = app.send(get("/search")).await;
    let all: Vec<Property> = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn search_failure_is_json_500() {
    let app = TestApp::with(MemoryRepository::new_failing(), MockStorageService::new());
    let response = app.send(get("/search?q=x")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(response).await,
        r#"{"error":"Internal Server Error"}"#
    );
}

#[tokio::test]
async fn list_icons_returns_names_or_500() {
    let app = TestApp::with(
        MemoryRepository::new(),
        MockStorageService::with_listing(&["bed.svg", "pool.svg"]),
    );
    let response = app.send(get("/list-icons")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, r#"["bed.svg","pool.svg"]"#);

    let app = TestApp::with(MemoryRepository::new(), MockStorageService::new_failing());
    let response = app.send(get("/list-icons")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Error reading directory.");
}

#[tokio::test]
async fn openapi_document_lists_json_endpoints() {
    let app = TestApp::new();
    let response = app.send(get("/api-docs/openapi.json")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("/search"));
    assert!(body.contains("/add-user"));
}

// --- Leads ---

#[tokio::test]
async fn add_user_accepts_json() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/add-user")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"name":"Asha","email":"asha@example.com","number":"9820000000"}"#,
        ))
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        body_text(response).await,
        r#"{"message":"User successfully saved!"}"#
    );
    assert_eq!(app.repo.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn add_user_rejects_missing_fields() {
    let app = TestApp::new();
    let response = app
        .send(form_post("/add-user", "name=Asha&email=asha%40example.com", None))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "All fields are required");
    assert!(app.repo.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn add_user_get_explains_usage() {
    let app = TestApp::new();
    let response = app.send(get("/add-user")).await;
    assert_eq!(body_text(response).await, "Please submit the form via POST.");
}

// --- Admin gate ---

#[tokio::test]
async fn admin_routes_require_session() {
    let app = TestApp::new();
    for path in ["/admin", "/add", "/addDev", "/addTest", "/new", "/career-form"] {
        let response = app.send(get(path)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", path);
        assert!(body_text(response).await.contains("Access code"));
    }
}

#[tokio::test]
async fn forged_session_cookie_is_ignored() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/admin")
        .header(header::COOKIE, "portal_session=not.a.token")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn verify_code_rejects_wrong_code() {
    let app = TestApp::new();
    let response = app.send(form_post("/verify-code", "code=0000", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(body_text(response).await, "Unauthorized");
}

#[tokio::test]
async fn verify_code_opens_admin_session() {
    let app = TestApp::new();
    let response = app.send(form_post("/verify-code", "code=9671", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("portal_session="));
    assert!(set_cookie.contains("HttpOnly"));

    let cookie = set_cookie.split(';').next().unwrap().to_string();
    let request = Request::builder()
        .uri("/admin")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Dashboard"));
}

#[tokio::test]
async fn logout_clears_cookie() {
    let app = TestApp::new();
    let response = app.send(admin_get("/logout")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(set_cookie.starts_with("portal_session="));
}

// --- Admin dashboard ---

#[tokio::test]
async fn dashboard_shows_counts_and_applies_filters() {
    let repo = MemoryRepository::new()
        .with_tasks(vec![Task {
            id: Uuid::new_v4(),
            title: "Call the bank".to_string(),
            status: "open".to_string(),
            ..Task::default()
        }])
        .await;
    let app = TestApp::with(repo, MockStorageService::new());
    let mut ready = listing("Ready Homes", "", &[]);
    ready.details.status = "Ready".to_string();
    let mut launch = listing("Launch Homes", "", &[]);
    launch.details.status = "New Launch".to_string();
    app.repo.create_property(ready).await.unwrap();
    app.repo.create_property(launch).await.unwrap();

    let response = app.send(admin_get("/admin?status=Ready")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Projects: 1"));
    assert!(body.contains("Ready Homes"));
    assert!(!body.contains("Launch Homes"));
    assert!(body.contains("Call the bank"));
}

#[tokio::test]
async fn dashboard_renders_empty_when_repository_is_down() {
    let app = TestApp::with(MemoryRepository::new_failing(), MockStorageService::new());
    let response = app.send(admin_get("/admin")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Projects: 0"));
}

#[tokio::test]
async fn delete_entry_removes_from_owning_collection() {
    let app = TestApp::new();
    let blog = app
        .repo
        .create_blog(Blog {
            id: Uuid::new_v4(),
            heading: "Market update".to_string(),
            ..Blog::default()
        })
        .await
        .unwrap();

    let uri = format!("/admin/delete/{}", blog.id);
    let response = app.send(admin_request("POST", &uri)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");
    assert!(app.repo.list_blogs().await.unwrap().is_empty());

    let response = app.send(admin_request("POST", &uri)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_text(response).await,
        "The entry with the given ID was not found in any collection."
    );
}

// --- Careers ---

#[tokio::test]
async fn career_create_requires_admin() {
    let app = TestApp::new();
    let body = "role=Sales+Manager&experience=3+years&location=Pune";

    let response = app.send(form_post("/career", body, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.send(form_post("/career", body, Some(admin_cookie()))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/career");

    let response = app.send(get("/career")).await;
    assert!(body_text(response).await.contains("Sales Manager"));
}

#[tokio::test]
async fn career_delete_redirects() {
    let app = TestApp::new();
    let career = app
        .repo
        .create_career(Career {
            id: Uuid::new_v4(),
            role: "Architect".to_string(),
            ..Career::default()
        })
        .await
        .unwrap();

    let response = app
        .send(admin_request("DELETE", &format!("/career/{}", career.id)))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/career");
    assert!(app.repo.list_careers().await.unwrap().is_empty());
}
