//! Request plumbing shared by every Discord API wrapper.

use super::auth::AuthHeader;
use super::error::DiscordError;
use crate::dispatch::executor::{Attempt, TransportFault};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// The base URL of the Discord API.
pub const API_BASE: &str = "https://discord.com/api/v10";

/// Idle keep-alive connections retained per host. Sized to comfortably
/// exceed the largest batch size, so socket acquisition never gates a
/// batch.
const POOL_MAX_IDLE: usize = 500;

/// A reusable client that holds a connection pool internally, as per
/// [reqwest::Client].
///
/// The base URL is injectable so tests can point the client at a local
/// mock server.
#[derive(Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    base_url: String,
}

impl DiscordClient {
    pub fn new(base_url: String) -> Self {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(POOL_MAX_IDLE)
            .pool_idle_timeout(Duration::from_secs(120))
            .timeout(Duration::from_secs(15))
            .build()
            // Only fails if TLS backend initialisation fails, in which
            // case no request could ever be sent anyway.
            .expect("Failed to construct HTTP client");

        DiscordClient { http, base_url }
    }

    /// Create a GET request to any Discord API endpoint, handling
    /// authentication.
    pub fn get<T: ToString>(&self, path: T, auth: &AuthHeader) -> reqwest::RequestBuilder {
        self.http
            .get(self.base_url.clone() + &path.to_string())
            .header(reqwest::header::AUTHORIZATION, auth.0.clone())
    }

    /// Create a POST request to any Discord API endpoint, handling
    /// authentication.
    pub fn post<T: ToString>(&self, path: T, auth: &AuthHeader) -> reqwest::RequestBuilder {
        self.http
            .post(self.base_url.clone() + &path.to_string())
            .header(reqwest::header::AUTHORIZATION, auth.0.clone())
    }

    /// Create a DELETE request to any Discord API endpoint, handling
    /// authentication.
    pub fn delete<T: ToString>(&self, path: T, auth: &AuthHeader) -> reqwest::RequestBuilder {
        self.http
            .delete(self.base_url.clone() + &path.to_string())
            .header(reqwest::header::AUTHORIZATION, auth.0.clone())
    }
}

/// Discord's universal error body for unsuccessful requests.
///
/// ```json
/// {
///     "code": 50013,
///     "message": "Missing Permissions"
/// }
/// ```
#[derive(Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// The body attached to HTTP 429 responses. `retry_after` is in possibly
/// fractional seconds.
#[derive(Deserialize)]
pub struct RateLimitBody {
    pub retry_after: f64,
}

/// Classify a response into the dispatcher's retry contract, decoding the
/// body of successful responses as JSON.
pub async fn classify_json<T: DeserializeOwned>(
    res: reqwest::Response,
) -> Result<Attempt<T>, TransportFault> {
    let status = res.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Ok(Attempt::RateLimited {
            retry_after: rate_limit_hint(res).await,
        });
    }

    if status.is_success() {
        return Ok(Attempt::Completed(res.json().await?));
    }

    Ok(rejected(res).await)
}

/// As [classify_json], for operations whose success responses carry no
/// body worth decoding (e.g. 204 on delete).
pub async fn classify_empty(res: reqwest::Response) -> Result<Attempt<()>, TransportFault> {
    let status = res.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Ok(Attempt::RateLimited {
            retry_after: rate_limit_hint(res).await,
        });
    }

    if status.is_success() {
        return Ok(Attempt::Completed(()));
    }

    Ok(rejected(res).await)
}

/// Extract the server's retry-after hint. A missing or malformed hint
/// means an immediate retry, as good a guess as any.
async fn rate_limit_hint(res: reqwest::Response) -> Duration {
    let secs = res
        .json::<RateLimitBody>()
        .await
        .map(|b| b.retry_after)
        .unwrap_or(0.0);

    // NaN and negatives collapse to zero; the dispatcher applies its own
    // cap on top, but from_secs_f64 must not overflow first.
    Duration::from_secs_f64(secs.max(0.0).min(3600.0))
}

async fn rejected<T>(res: reqwest::Response) -> Attempt<T> {
    Attempt::Rejected {
        status: res.status().as_u16(),
        message: res.json::<ErrorBody>().await.ok().map(|b| b.message),
    }
}

/// Turn a non-2xx response into a [DiscordError], salvaging the API's
/// diagnostic message when the body parses.
pub async fn error_from_response(res: reqwest::Response) -> DiscordError {
    let status = res.status().as_u16();
    let message = res.json::<ErrorBody>().await.ok().map(|b| b.message);

    DiscordError::APIResponseError { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn server() -> mockito::ServerGuard {
        mockito::Server::new_async().await
    }

    fn auth() -> AuthHeader {
        AuthHeader("Bot xyz".to_owned())
    }

    #[tokio::test]
    async fn test_auth_header_attached() {
        let mut srv = server().await;

        let mock = srv
            .mock("GET", "/anything")
            .match_header("authorization", "Bot xyz")
            .with_body("{}")
            .create_async()
            .await;

        let client = DiscordClient::new(srv.url());
        let res = client.get("/anything", &auth()).send().await.unwrap();

        mock.assert_async().await;
        assert!(res.status().is_success());
    }

    #[tokio::test]
    async fn test_classify_429_parses_fractional_hint() {
        let mut srv = server().await;

        let mock = srv
            .mock("POST", "/limited")
            .with_status(429)
            .with_body(r#"{"retry_after": 0.01, "global": false}"#)
            .create_async()
            .await;

        let client = DiscordClient::new(srv.url());
        let res = client.post("/limited", &auth()).send().await.unwrap();
        let attempt = classify_empty(res).await.unwrap();

        mock.assert_async().await;
        match attempt {
            Attempt::RateLimited { retry_after } => {
                assert_eq!(retry_after, Duration::from_millis(10));
            }
            other => panic!("expected rate limit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_classify_429_without_hint_retries_immediately() {
        let mut srv = server().await;

        let mock = srv
            .mock("POST", "/limited")
            .with_status(429)
            .with_body("not json")
            .create_async()
            .await;

        let client = DiscordClient::new(srv.url());
        let res = client.post("/limited", &auth()).send().await.unwrap();
        let attempt = classify_empty(res).await.unwrap();

        mock.assert_async().await;
        match attempt {
            Attempt::RateLimited { retry_after } => assert_eq!(retry_after, Duration::ZERO),
            other => panic!("expected rate limit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_classify_rejection_salvages_message() {
        let mut srv = server().await;

        let mock = srv
            .mock("POST", "/forbidden")
            .with_status(403)
            .with_body(r#"{"code": 50013, "message": "Missing Permissions"}"#)
            .create_async()
            .await;

        let client = DiscordClient::new(srv.url());
        let res = client.post("/forbidden", &auth()).send().await.unwrap();
        let attempt = classify_empty(res).await.unwrap();

        mock.assert_async().await;
        match attempt {
            Attempt::Rejected { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message.as_deref(), Some("Missing Permissions"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }
}
