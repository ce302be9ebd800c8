//! Seller profile settings tests.

mod common;

use common::{invoice_payload, TestApp};

#[tokio::test]
async fn settings_start_with_seeded_defaults() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let settings: serde_json::Value = client
        .get(format!("{}/settings", app.address))
        .send()
        .await
        .expect("Failed to fetch settings")
        .json()
        .await
        .expect("Invalid body");

    assert_eq!(
        settings["profile"]["company_name"],
        "شرکت کارا خدمات پوراطمینان"
    );
    assert_eq!(settings["profile"]["bank_name"], "سپه");
    assert_eq!(settings["profile"]["default_currency"], "ریال");

    let currencies = settings["currencies"].as_array().expect("Expected array");
    assert_eq!(currencies.len(), 5);
    assert!(currencies.contains(&serde_json::json!("تومان")));
}

#[tokio::test]
async fn update_settings_overwrites_known_keys_and_ignores_unknown() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let updated: serde_json::Value = client
        .put(format!("{}/settings", app.address))
        .json(&serde_json::json!({
            "company_name": "فروشگاه نو",
            "default_currency": "تومان",
            "bogus_key": "ignored"
        }))
        .send()
        .await
        .expect("Failed to update settings")
        .json()
        .await
        .expect("Invalid body");

    assert_eq!(updated["profile"]["company_name"], "فروشگاه نو");
    assert_eq!(updated["profile"]["default_currency"], "تومان");
    // Untouched keys keep their values.
    assert_eq!(updated["profile"]["bank_name"], "سپه");

    // The change is persisted, not just echoed.
    let fetched: serde_json::Value = client
        .get(format!("{}/settings", app.address))
        .send()
        .await
        .expect("Failed to fetch settings")
        .json()
        .await
        .expect("Invalid body");
    assert_eq!(fetched["profile"]["company_name"], "فروشگاه نو");
}

#[tokio::test]
async fn updated_profile_feeds_rendered_documents() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    client
        .put(format!("{}/settings", app.address))
        .json(&serde_json::json!({ "company_name": "فروشگاه نو" }))
        .send()
        .await
        .expect("Failed to update settings");

    let created: serde_json::Value = client
        .post(format!("{}/invoices", app.address))
        .json(&invoice_payload("CSS-2025-0001", "علی رضایی"))
        .send()
        .await
        .expect("Failed to create invoice")
        .json()
        .await
        .expect("Invalid body");
    let id = created["id"].as_i64().unwrap();

    let html = client
        .get(format!("{}/invoices/{}/document", app.address, id))
        .send()
        .await
        .expect("Failed to fetch document")
        .text()
        .await
        .expect("Invalid body");

    assert!(html.contains("فروشگاه نو"));
    assert!(!html.contains("شرکت کارا خدمات پوراطمینان"));
}
