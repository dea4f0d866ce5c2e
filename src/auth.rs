use crate::error::SetupError;
use std::{path::Path, time::Duration};
use tame_oauth::gcp::{self, TokenProvider};

/// Read/write access to every file the service account can see
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Reads a service account key document and prepares a token provider for it
pub fn load_service_account(path: &Path) -> Result<gcp::ServiceAccountProvider, SetupError> {
    let key_data = std::fs::read(path).map_err(|source| SetupError::ReadCredentials {
        path: path.to_owned(),
        source,
    })?;

    let info = gcp::ServiceAccountInfo::deserialize(key_data).map_err(SetupError::Credentials)?;
    gcp::ServiceAccountProvider::new(info).map_err(SetupError::Credentials)
}

pub async fn get_bearer_token<P>(
    tp: &P,
    client: &reqwest::Client,
    scopes: &[&str],
) -> Result<http::header::HeaderValue, SetupError>
where
    P: TokenProvider,
{
    match tp.get_token(scopes).map_err(SetupError::Credentials)? {
        gcp::TokenOrRequest::Token(tok) => tok.try_into().map_err(SetupError::Token),
        gcp::TokenOrRequest::Request {
            request,
            scope_hash,
            ..
        } => {
            let (parts, body) = request.into_parts();
            let uri = parts.uri.to_string();

            tracing::debug!(%uri, "requesting access token");

            // The token exchange is always a POST
            let res = client
                .post(&uri)
                .headers(parts.headers)
                .body(body)
                .send()
                .await
                .map_err(SetupError::TokenRequest)?;

            let code = res.status();

            let mut builder = http::Response::builder()
                .status(code)
                .version(res.version());

            if let Some(headers) = builder.headers_mut() {
                headers.extend(
                    res.headers()
                        .into_iter()
                        .map(|(k, v)| (k.clone(), v.clone())),
                );
            }

            let buffer = res.bytes().await.map_err(SetupError::TokenRequest)?;

            if !code.is_success() {
                return Err(SetupError::TokenRejected {
                    status: code,
                    body: String::from_utf8_lossy(&buffer).into_owned(),
                });
            }

            let response = builder.body(buffer).map_err(SetupError::TokenResponse)?;

            tp.parse_token_response(scope_hash, response)
                .and_then(TryInto::try_into)
                .map_err(SetupError::Token)
        }
    }
}

/// Builds the single authenticated client every operation borrows
pub async fn connect(
    credentials: &Path,
    timeout: Option<Duration>,
) -> Result<reqwest::Client, SetupError> {
    let tp = load_service_account(credentials)?;

    let builder = || {
        let builder = reqwest::Client::builder();
        match timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    };

    let token_client = builder().build().map_err(SetupError::Client)?;
    let mut auth_token = get_bearer_token(&tp, &token_client, &[DRIVE_SCOPE]).await?;
    auth_token.set_sensitive(true);

    let hm = {
        let mut hm = reqwest::header::HeaderMap::new();
        hm.insert(http::header::AUTHORIZATION, auth_token);
        hm
    };

    builder()
        .default_headers(hm)
        .build()
        .map_err(SetupError::Client)
}
