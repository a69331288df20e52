use anyhow::Result;
use email_registry::database::EmailBmc;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::helpers::{error_detail, TestApp};

#[tokio::test]
async fn emails_create_then_get_returns_the_same_email() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .email_post(&json!({ "email_name": "john.doe@example.com" }))
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    let id = created["id"].as_i64().expect("id is an integer");
    assert_eq!(created["email_name"], "john.doe@example.com");

    let res = app.email_get(id).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await?;
    assert_eq!(fetched, json!({ "id": id, "email_name": "john.doe@example.com" }));

    let email_name: String = sqlx::query_scalar("SELECT email_name FROM emails WHERE id = $1")
        .bind(id)
        .fetch_one(app.dm.db())
        .await?;
    assert_eq!(email_name, "john.doe@example.com");

    Ok(())
}

#[tokio::test]
async fn emails_list_returns_all_records_in_id_order() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.emails_list().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!([]));

    let first = app.email_create("a@x.com").await?;
    let second = app.email_create("b@y.com").await?;

    let listed: Value = app.emails_list().await?.json().await?;
    assert_eq!(
        listed,
        json!([
            { "id": first, "email_name": "a@x.com" },
            { "id": second, "email_name": "b@y.com" },
        ])
    );

    Ok(())
}

#[tokio::test]
async fn emails_create_duplicate_is_409_and_store_is_unchanged() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.email_create("le_guin@gmail.com").await?;

    // The domain is normalized, so this is the same address.
    for duplicate in ["le_guin@gmail.com", "le_guin@GMAIL.com", " le_guin@gmail.com "] {
        let res = app.email_post(&json!({ "email_name": duplicate })).await?;
        assert_eq!(res.status(), StatusCode::CONFLICT, "payload: {duplicate}");
        assert_eq!(error_detail(res).await?, "Email already registered");
    }

    assert_eq!(EmailBmc::count(&app.dm).await?, 1);

    Ok(())
}

#[tokio::test]
async fn emails_invalid_payloads_are_422_and_never_stored() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.email_create("valid@example.com").await?;

    let cases = [
        (json!({ "email_name": "not an email" }), "Embedded space"),
        (json!({ "email_name": "ursuladomain.com" }), "Missing @"),
        (json!({ "email_name": "ursula@domain" }), "Missing domain dot"),
        (json!({ "email_name": "" }), "Empty email"),
        (json!({ "email_name": 42 }), "Not a string"),
        (json!({}), "Empty json"),
    ];

    for (body, description) in cases {
        let res = app.email_post(&body).await?;
        assert_eq!(
            res.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "POST did not return 422 for: {description}"
        );

        let res = app.email_put(id, &body).await?;
        assert_eq!(
            res.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "PUT did not return 422 for: {description}"
        );
    }

    assert_eq!(EmailBmc::count(&app.dm).await?, 1);
    let record = EmailBmc::get(&app.dm, id).await?;
    assert_eq!(record.email_name, "valid@example.com");

    Ok(())
}

#[tokio::test]
async fn emails_get_unknown_id_is_404() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.email_get(999).await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_detail(res).await?, "Email not found");

    Ok(())
}

#[tokio::test]
async fn emails_update_replaces_email_and_keeps_id() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.email_create("old@example.com").await?;

    let res = app
        .email_put(id, &json!({ "email_name": "new@example.com" }))
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await?.is_empty());

    let fetched: Value = app.email_get(id).await?.json().await?;
    assert_eq!(fetched, json!({ "id": id, "email_name": "new@example.com" }));

    // Writing the same value again is not a conflict with itself.
    let res = app
        .email_put(id, &json!({ "email_name": "new@example.com" }))
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    Ok(())
}

#[tokio::test]
async fn emails_update_to_taken_email_is_409_and_record_unchanged() -> Result<()> {
    let app = TestApp::spawn().await?;
    let a = app.email_create("a@x.com").await?;
    app.email_create("b@y.com").await?;

    let res = app.email_put(a, &json!({ "email_name": "b@y.com" })).await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(error_detail(res).await?, "Email already registered");

    let record = EmailBmc::get(&app.dm, a).await?;
    assert_eq!(record.email_name, "a@x.com");

    Ok(())
}

#[tokio::test]
async fn emails_update_unknown_id_is_404() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .email_put(12345, &json!({ "email_name": "nobody@example.com" }))
        .await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn emails_delete_then_get_is_404() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.email_create("gone@example.com").await?;

    let res = app.email_delete(id).await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app.email_get(id).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.email_delete(id).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn emails_ids_are_not_reused_after_delete() -> Result<()> {
    let app = TestApp::spawn().await?;
    let first = app.email_create("first@example.com").await?;
    app.email_delete(first).await?;

    let second = app.email_create("first@example.com").await?;

    assert!(second > first);

    Ok(())
}

#[tokio::test]
async fn emails_concurrent_create_of_same_email_has_one_winner() -> Result<()> {
    let app = TestApp::spawn().await?;

    for round in 0..5 {
        let body = json!({ "email_name": format!("race{round}@example.com") });
        let (a, b) = tokio::join!(app.email_post(&body), app.email_post(&body));
        let mut statuses = [a?.status(), b?.status()];
        statuses.sort();

        assert_eq!(
            statuses,
            [StatusCode::CREATED, StatusCode::CONFLICT],
            "round {round}"
        );
    }

    assert_eq!(EmailBmc::count(&app.dm).await?, 5);

    Ok(())
}

#[tokio::test]
async fn emails_concurrent_update_to_same_email_has_one_winner() -> Result<()> {
    let app = TestApp::spawn().await?;

    for round in 0..5 {
        let a = app.email_create(&format!("a{round}@example.com")).await?;
        let b = app.email_create(&format!("b{round}@example.com")).await?;

        let body = json!({ "email_name": format!("taken{round}@example.com") });
        let (res_a, res_b) = tokio::join!(app.email_put(a, &body), app.email_put(b, &body));
        let mut statuses = [res_a?.status(), res_b?.status()];
        statuses.sort();

        assert_eq!(
            statuses,
            [StatusCode::NO_CONTENT, StatusCode::CONFLICT],
            "round {round}"
        );

        let winners: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM emails WHERE email_name = $1")
            .bind(format!("taken{round}@example.com"))
            .fetch_one(app.dm.db())
            .await?;
        assert_eq!(winners, 1, "round {round}");
    }

    assert_eq!(EmailBmc::count(&app.dm).await?, 10);

    Ok(())
}
