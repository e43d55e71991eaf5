mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn health_reports_degraded_database() -> Result<()> {
    let server = common::start_server().await?;

    let res = reqwest::get(server.url("/health")).await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["status"], "degraded");
    Ok(())
}

#[tokio::test]
async fn root_describes_service() -> Result<()> {
    let server = common::start_server().await?;

    let res = reqwest::get(server.url("/")).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "SPPD API");
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_bearer_token() -> Result<()> {
    let server = common::start_server().await?;
    let client = reqwest::Client::new();

    for path in ["/v1/auth/profile", "/v1/users", "/v1/bpd", "/v1/master/bidang", "/v1/report/rekap-bidang"] {
        let res = client.get(server.url(path)).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{}", path);

        let body = res.json::<Value>().await?;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
    Ok(())
}

#[tokio::test]
async fn forged_token_is_rejected() -> Result<()> {
    let server = common::start_server().await?;

    let res = reqwest::Client::new()
        .get(server.url("/v1/auth/profile"))
        .bearer_auth("eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJ4In0.invalid")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
