mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

use besq_chart_api::auth::{Claims, JwtKeys, Role, TOKEN_TTL_SECS};
use common::{FixtureSource, TestServer, PASSWORD};

const MANAGER: &str = "/api/chart/manager?tanggal=2026-02-09";
const PROCESS: &str = "/api/chart/process?tanggal=2026-02-09";
const MACHINE: &str = "/api/chart/machine?tanggal=2026-02-09&no_mc=M-101";
const MACHINES: &str = "/api/chart/machines?tanggal=2026-02-09";

#[tokio::test]
async fn allow_lists_per_endpoint() -> Result<()> {
    let server = TestServer::start(FixtureSource::factory_day()).await?;

    let matrix = [
        (MANAGER, [true, false, false]),
        (PROCESS, [true, true, false]),
        (MACHINE, [true, true, true]),
        (MACHINES, [true, true, true]),
    ];

    for (path, allowed) in matrix {
        for (role, allowed) in [Role::Manager, Role::Leader, Role::Operator].into_iter().zip(allowed) {
            let res = server.get(path, Some(&server.token_for(role))).await?;
            let expected = if allowed { StatusCode::OK } else { StatusCode::FORBIDDEN };
            assert_eq!(res.status(), expected, "{} as {}", path, role);
        }
    }
    Ok(())
}

#[tokio::test]
async fn login_token_opens_the_manager_chart() -> Result<()> {
    let server = TestServer::start(FixtureSource::factory_day()).await?;

    let body = server.login("manager", PASSWORD).await?.json::<Value>().await?;
    let token = body["token"].as_str().unwrap().to_string();

    let res = server.get(MANAGER, Some(&token)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn missing_or_malformed_token_is_unauthorized() -> Result<()> {
    let server = TestServer::start(FixtureSource::factory_day()).await?;

    let res = server.get(MACHINES, None).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.json::<Value>().await?["error"].is_string());

    let res = server.get(MACHINES, Some("not.a.jwt")).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server
        .client
        .get(format!("{}{}", server.base_url, MACHINES))
        .header("authorization", server.token_for(Role::Manager))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "token without Bearer scheme");
    Ok(())
}

#[tokio::test]
async fn expired_token_is_unauthorized_for_any_role() -> Result<()> {
    let server = TestServer::start(FixtureSource::factory_day()).await?;
    let issued = chrono::Utc::now().timestamp() - TOKEN_TTL_SECS - 1;

    for role in [Role::Manager, Role::Leader, Role::Operator] {
        let token = server
            .keys
            .sign(&Claims::issued_at(1, role, None, "old".to_string(), issued))?;
        let res = server.get(MACHINES, Some(&token)).await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "expired {} token", role);
    }
    Ok(())
}

#[tokio::test]
async fn token_signed_with_another_secret_is_unauthorized() -> Result<()> {
    let server = TestServer::start(FixtureSource::factory_day()).await?;

    let forged = JwtKeys::from_secret(b"guessed-secret").sign(&Claims::new(1, Role::Manager, None, "eve".to_string()))?;
    let res = server.get(MANAGER, Some(&forged)).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unavailable_source_answers_503_before_auth() -> Result<()> {
    let server = TestServer::start(FixtureSource::offline()).await?;

    for path in [MANAGER, PROCESS, MACHINE, MACHINES] {
        let res = server.get(path, None).await?;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE, "{} without token", path);

        let res = server.get(path, Some(&server.token_for(Role::Manager))).await?;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE, "{} as manager", path);
        let body = res.json::<Value>().await?;
        assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    }

    // Login does not depend on the production database
    let res = server.login("op_prs_01", PASSWORD).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
