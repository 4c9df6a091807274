//! HTTP calls to the server API.

use reqwest::{StatusCode, Url};

use crate::{
    dto::{ApiResponse, LoginDto},
    error::ClientError,
};

/// Log in and return the issued token.
///
/// `admin` selects the admin login endpoint.
pub async fn login(
    http: &reqwest::Client,
    base_url: &str,
    username: &str,
    password: &str,
    admin: bool,
) -> Result<String, ClientError> {
    let path = if admin {
        "/api/admin/login"
    } else {
        "/api/user/login"
    };
    let endpoint = Url::parse(base_url)
        .and_then(|base| base.join(path))
        .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

    let response = http
        .post(endpoint)
        .form(&[("username", username), ("password", password)])
        .send()
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    let status = response.status();
    let body: ApiResponse<LoginDto> = response
        .json()
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    match (status, body.data) {
        (StatusCode::OK, Some(login)) => {
            tracing::info!("Logged in as '{}'", login.username);
            Ok(login.token)
        }
        _ => Err(ClientError::LoginFailed(format!(
            "{} - {}",
            body.code, body.message
        ))),
    }
}

/// Build the room WebSocket URL from the HTTP base URL.
///
/// `http` maps to `ws` and `https` to `wss`; the room id and token are encoded.
pub fn room_url(base_url: &str, room_id: &str, token: &str) -> Result<String, ClientError> {
    let mut url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(ClientError::InvalidUrl(format!("unsupported scheme '{}'", other))),
    };
    url.set_scheme(scheme)
        .map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;

    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend(["ws", "room", room_id]);
    url.query_pairs_mut().clear().append_pair("token", token);

    Ok(url.into())
}
