mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{FixtureSource, TestServer, PASSWORD};

#[tokio::test]
async fn login_returns_token_matching_stored_user() -> Result<()> {
    let server = TestServer::start(FixtureSource::offline()).await?;

    for (username, role, department) in [
        ("manager", "MANAGER", Value::Null),
        ("leader_prs", "LEADER", json!("PRESSING")),
        ("op_prs_01", "OPERATOR", json!("PRESSING")),
    ] {
        let res = server.login(username, PASSWORD).await?;
        assert_eq!(res.status(), StatusCode::OK, "login as {}", username);

        let body = res.json::<Value>().await?;
        assert_eq!(body["role"], role);
        assert_eq!(body["department"], department);

        let claims = server.keys.verify(body["token"].as_str().unwrap())?;
        assert_eq!(claims.role, role);
        assert_eq!(claims.username, username);
        assert_eq!(claims.department.map(Value::from).unwrap_or(Value::Null), department);
        assert_eq!(claims.exp, claims.iat + 86_400);
    }
    Ok(())
}

#[tokio::test]
async fn unknown_user_and_wrong_password_look_the_same() -> Result<()> {
    let server = TestServer::start(FixtureSource::offline()).await?;

    let unknown = server.login("nobody", PASSWORD).await?;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown_body = unknown.json::<Value>().await?;

    let wrong = server.login("manager", "not-the-password").await?;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let wrong_body = wrong.json::<Value>().await?;

    assert_eq!(unknown_body, wrong_body);
    assert!(unknown_body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn missing_password_is_bad_request() -> Result<()> {
    let server = TestServer::start(FixtureSource::offline()).await?;

    let res = server
        .client
        .post(format!("{}/login", server.base_url))
        .json(&json!({ "username": "manager" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["password"].is_string());
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_bad_request() -> Result<()> {
    let server = TestServer::start(FixtureSource::offline()).await?;

    let res = server
        .client
        .post(format!("{}/login", server.base_url))
        .header("content-type", "application/json")
        .body("{\"username\": ")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.json::<Value>().await?["error"].is_string());
    Ok(())
}
