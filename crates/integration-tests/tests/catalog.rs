//! Public catalog: offers, rankings, product detail and the affiliate
//! redirect.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, Utc};
use reqwest::{StatusCode, header::LOCATION};
use serde_json::{Value, json};

use fitova_core::{OfferId, ProductId, TestimonialId};
use fitova_integration_tests::{TestApp, envelope};
use fitova_storefront::db::memory::Operation;
use fitova_storefront::models::{Offer, ProductRanking, Testimonial};

fn offer(title: &str) -> Offer {
    Offer {
        id: OfferId::generate(),
        title: title.to_string(),
        description: None,
        code: Some("FIT10".to_string()),
        discount_percent: Some(10),
        image_url: None,
        link_url: None,
        is_active: true,
        valid_from: None,
        valid_to: None,
        max_uses: None,
        current_uses: 0,
        created_at: Utc::now(),
    }
}

fn slugs(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn offers_hide_expired_future_used_up_and_inactive() {
    let app = TestApp::spawn().await;
    let now = Utc::now();

    app.store.seed_offer(offer("open ended")).await;
    app.store
        .seed_offer(Offer {
            valid_from: Some(now - Duration::days(1)),
            valid_to: Some(now + Duration::days(1)),
            max_uses: Some(100),
            current_uses: 99,
            ..offer("in window")
        })
        .await;
    app.store
        .seed_offer(Offer {
            valid_to: Some(now - Duration::minutes(1)),
            ..offer("expired")
        })
        .await;
    app.store
        .seed_offer(Offer {
            valid_from: Some(now + Duration::days(2)),
            ..offer("not started")
        })
        .await;
    app.store
        .seed_offer(Offer {
            max_uses: Some(50),
            current_uses: 50,
            ..offer("used up")
        })
        .await;
    app.store
        .seed_offer(Offer {
            is_active: false,
            ..offer("switched off")
        })
        .await;

    let body = envelope(app.get("/api/offers").await).await;
    let mut titles: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["title"].as_str().unwrap().to_string())
        .collect();
    titles.sort();

    assert_eq!(titles, ["in window", "open ended"]);
}

#[tokio::test]
async fn offers_failure_is_a_server_error() {
    let app = TestApp::spawn().await;
    app.store.fail(Operation::ActiveOffers);

    let response = app.get("/api/offers").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        envelope(response).await,
        json!({ "success": false, "error": "Internal server error" })
    );
}

#[tokio::test]
async fn trending_follows_ranking_order() {
    let app = TestApp::spawn().await;
    let a = app.seed_product("a-line-skirt", "https://partner.example/a").await;
    let b = app.seed_product("bomber-jacket", "https://partner.example/b").await;
    let c = app.seed_product("cargo-pants", "https://partner.example/c").await;
    app.store
        .set_ranking(ProductRanking::Trending, vec![c, a, b])
        .await;

    let body = envelope(app.get("/api/products/trending").await).await;

    assert_eq!(
        slugs(&body),
        ["cargo-pants", "a-line-skirt", "bomber-jacket"]
    );
}

#[tokio::test]
async fn best_sellers_degrade_to_empty_without_batch_fetch() {
    let app = TestApp::spawn().await;
    app.seed_product("a-line-skirt", "https://partner.example/a").await;
    app.store.fail(Operation::RankProducts);

    let response = app.get("/api/products/best-sellers").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(envelope(response).await["data"], json!([]));
    assert_eq!(app.store.calls(Operation::ProductsByIds), 0);
}

#[tokio::test]
async fn product_detail_and_missing_product() {
    let app = TestApp::spawn().await;
    app.seed_product("linen-shirt", "https://partner.example/linen").await;

    let body = envelope(app.get("/api/products/linen-shirt").await).await;
    assert_eq!(body["data"]["slug"], "linen-shirt");

    let response = app.get("/api/products/no-such-thing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(envelope(response).await["success"], false);
}

#[tokio::test]
async fn affiliate_redirect_counts_click() {
    let app = TestApp::spawn().await;
    let id = app
        .seed_product("linen-shirt", "https://partner.example/linen?ref=fitova")
        .await;

    let response = app.get(&format!("/go/{id}")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[LOCATION],
        "https://partner.example/linen?ref=fitova"
    );
    let body = envelope(app.get("/api/products/linen-shirt").await).await;
    assert_eq!(body["data"]["click_count"], 1);
}

#[tokio::test]
async fn affiliate_redirect_unknown_product() {
    let app = TestApp::spawn().await;

    let response = app.get(&format!("/go/{}", ProductId::generate())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/go/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(envelope(response).await["success"], false);
}

#[tokio::test]
async fn testimonials_limit_and_degrade() {
    let app = TestApp::spawn().await;
    for (i, name) in ["Lina", "Omar", "Sara"].into_iter().enumerate() {
        app.store
            .seed_testimonial(Testimonial {
                id: TestimonialId::generate(),
                name: name.to_string(),
                role: None,
                quote: "Found my favourite coat here.".to_string(),
                rating: 5,
                avatar_url: None,
                is_visible: true,
                sort_order: i32::try_from(i).unwrap(),
                created_at: Utc::now(),
            })
            .await;
    }

    let body = envelope(app.get("/api/testimonials?limit=2").await).await;
    let names: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Lina", "Omar"]);

    app.store.fail(Operation::Testimonials);
    let response = app.get("/api/testimonials").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(envelope(response).await["data"], json!([]));
}
