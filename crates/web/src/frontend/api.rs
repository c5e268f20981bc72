//! HTTP calls made by the frontend.

use anyhow::Context;

use timeportal_auth::LoginResponse;

use crate::browser::page_origin;
use crate::config::WebConfig;
use crate::login::LoginRequest;

/// Post credentials to the login service.
///
/// Rejections come back as `success: false` bodies and are returned as-is;
/// only transport and decoding failures are errors here.
pub async fn login(config: &WebConfig, request: &LoginRequest) -> anyhow::Result<LoginResponse> {
    let origin = page_origin().context("could not determine the page origin")?;
    let url = config.login_url(&origin)?;

    let response = reqwest::Client::new()
        .post(url.as_str())
        .json(request)
        .send()
        .await
        .context("could not reach the login service")?;

    response
        .json::<LoginResponse>()
        .await
        .context("login service returned an unexpected response")
}
