//! HTTPS oracle protocol.

pub(crate) mod security;

use super::OracleProtocol;
use crate::payloads::{OracleResponseCode, MAX_RESULT_SIZE};
use crate::settings::OracleSettings;
use async_trait::async_trait;
use futures::StreamExt;
use security::is_internal_host;

/// Redirects are never followed blindly; each hop re-enters the SSRF guard.
const MAX_REDIRECTS: usize = 2;

/// HTTPS fetcher with SSRF guarding, content-type allowlisting and a single
/// wall-clock budget per request.
#[derive(Clone)]
pub struct OracleHttpsProtocol {
    client: reqwest::Client,
}

/// Where a response points next, if anywhere.
enum Redirect {
    None,
    To(url::Url),
    Invalid,
}

/// A `Content-Type` header split into its media type and charset parameter.
struct MediaType {
    essence: String,
    charset: Option<String>,
}

impl MediaType {
    fn from_headers(headers: &reqwest::header::HeaderMap) -> Option<Self> {
        let raw = headers.get(reqwest::header::CONTENT_TYPE)?.to_str().ok()?;
        let mut parts = raw.split(';').map(str::trim);
        let essence = parts.next()?.to_string();
        let charset = parts
            .find_map(|part| part.strip_prefix("charset="))
            .map(|value| value.trim().to_ascii_lowercase());
        Some(Self { essence, charset })
    }

    fn is_utf8(&self) -> bool {
        match self.charset.as_deref() {
            None | Some("utf-8") | Some("utf8") => true,
            Some(_) => false,
        }
    }
}

impl OracleHttpsProtocol {
    pub fn new() -> Self {
        let version = env!("CARGO_PKG_VERSION");
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(format!("NeoOracleService/{}", version))
            .build()
            .expect("failed to build oracle http client");
        Self { client }
    }

    /// Rejects targets that resolve to internal addresses. A DNS failure is
    /// indistinguishable from an unreachable host and reports as a timeout.
    async fn guard_target(
        &self,
        settings: &OracleSettings,
        target: &url::Url,
    ) -> Result<(), OracleResponseCode> {
        if settings.allow_private_host {
            return Ok(());
        }
        match is_internal_host(target).await {
            Ok(false) => Ok(()),
            Ok(true) => Err(OracleResponseCode::Forbidden),
            Err(_) => Err(OracleResponseCode::Timeout),
        }
    }

    /// Issues one GET with the whole remaining budget attached.
    async fn fetch(
        &self,
        settings: &OracleSettings,
        target: &url::Url,
    ) -> Result<reqwest::Response, OracleResponseCode> {
        self.client
            .get(target.clone())
            .timeout(settings.https.timeout)
            .header(
                reqwest::header::ACCEPT,
                settings.allowed_content_types.join(", "),
            )
            .send()
            .await
            .map_err(|_| OracleResponseCode::Timeout)
    }

    /// Maps a non-redirect response to its oracle outcome.
    async fn read_response(
        &self,
        settings: &OracleSettings,
        response: reqwest::Response,
    ) -> (OracleResponseCode, String) {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return (OracleResponseCode::NotFound, String::new());
        }
        if status == reqwest::StatusCode::FORBIDDEN {
            return (OracleResponseCode::Forbidden, String::new());
        }
        if !status.is_success() {
            return (OracleResponseCode::Error, status.to_string());
        }

        let Some(media_type) = MediaType::from_headers(response.headers()) else {
            return (OracleResponseCode::Error, String::new());
        };
        if !settings.is_content_type_allowed(&media_type.essence) {
            return (OracleResponseCode::ProtocolNotSupported, String::new());
        }
        if !media_type.is_utf8() {
            return (OracleResponseCode::Error, String::new());
        }

        match read_body_capped(response).await {
            Ok(text) => (OracleResponseCode::Success, text),
            Err(code) => (code, String::new()),
        }
    }
}

impl Default for OracleHttpsProtocol {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OracleProtocol for OracleHttpsProtocol {
    async fn process(
        &self,
        settings: &OracleSettings,
        uri: url::Url,
    ) -> (OracleResponseCode, String) {
        let mut target = uri;
        let mut hops = 0;
        loop {
            if let Err(code) = self.guard_target(settings, &target).await {
                return (code, String::new());
            }
            let response = match self.fetch(settings, &target).await {
                Ok(response) => response,
                Err(code) => return (code, String::new()),
            };
            match redirect_target(&response) {
                Redirect::None => return self.read_response(settings, response).await,
                Redirect::To(next) if hops < MAX_REDIRECTS => {
                    hops += 1;
                    target = next;
                }
                Redirect::To(_) | Redirect::Invalid => {
                    return (OracleResponseCode::Timeout, String::new())
                }
            }
        }
    }
}

fn redirect_target(response: &reqwest::Response) -> Redirect {
    let Some(location) = response.headers().get(reqwest::header::LOCATION) else {
        return Redirect::None;
    };
    location
        .to_str()
        .ok()
        .and_then(|value| url::Url::parse(value).ok())
        .map_or(Redirect::Invalid, Redirect::To)
}

/// Streams the body, refusing anything past the on-chain result cap early.
async fn read_body_capped(response: reqwest::Response) -> Result<String, OracleResponseCode> {
    if let Some(declared) = response.content_length() {
        if declared as usize > MAX_RESULT_SIZE {
            return Err(OracleResponseCode::ResponseTooLarge);
        }
    }

    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|_| OracleResponseCode::Error)?;
        if body.len() + chunk.len() > MAX_RESULT_SIZE {
            return Err(OracleResponseCode::ResponseTooLarge);
        }
        body.extend_from_slice(&chunk);
    }

    String::from_utf8(body).map_err(|_| OracleResponseCode::Error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::ProtocolRegistry;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}/", addr)
    }

    fn test_settings() -> OracleSettings {
        OracleSettings {
            allow_private_host: true,
            ..OracleSettings::default()
        }
    }

    // The fetcher itself is scheme-agnostic; plain HTTP against a local
    // listener exercises the same status/header/body paths.
    fn http_protocol() -> OracleHttpsProtocol {
        OracleHttpsProtocol::new()
    }

    #[tokio::test]
    async fn success_returns_body() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 15\r\n\r\n{\"price\": 42.5}",
        )
        .await;
        let (code, body) = http_protocol()
            .process(&test_settings(), url::Url::parse(&url).unwrap())
            .await;
        assert_eq!(code, OracleResponseCode::Success);
        assert_eq!(body, "{\"price\": 42.5}");
    }

    #[tokio::test]
    async fn not_found_maps_to_not_found() {
        let url = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n").await;
        let (code, _) = http_protocol()
            .process(&test_settings(), url::Url::parse(&url).unwrap())
            .await;
        assert_eq!(code, OracleResponseCode::NotFound);
    }

    #[tokio::test]
    async fn disallowed_content_type_is_rejected() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 2\r\n\r\nhi",
        )
        .await;
        let (code, _) = http_protocol()
            .process(&test_settings(), url::Url::parse(&url).unwrap())
            .await;
        assert_eq!(code, OracleResponseCode::ProtocolNotSupported);
    }

    #[tokio::test]
    async fn non_utf8_charset_is_an_error() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json; charset=latin-1\r\nContent-Length: 2\r\n\r\nhi",
        )
        .await;
        let (code, _) = http_protocol()
            .process(&test_settings(), url::Url::parse(&url).unwrap())
            .await;
        assert_eq!(code, OracleResponseCode::Error);
    }

    #[tokio::test]
    async fn server_error_maps_to_error() {
        let url =
            serve_once("HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\n\r\n").await;
        let (code, _) = http_protocol()
            .process(&test_settings(), url::Url::parse(&url).unwrap())
            .await;
        assert_eq!(code, OracleResponseCode::Error);
    }

    #[tokio::test]
    async fn private_host_is_forbidden_by_default() {
        let settings = OracleSettings::default();
        let (code, _) = http_protocol()
            .process(
                &settings,
                url::Url::parse("http://127.0.0.1:1/never-reached").unwrap(),
            )
            .await;
        assert_eq!(code, OracleResponseCode::Forbidden);
    }

    #[tokio::test]
    async fn unparsable_redirect_times_out() {
        let url = serve_once(
            "HTTP/1.1 302 Found\r\nLocation: not a url\r\nContent-Length: 0\r\n\r\n",
        )
        .await;
        let (code, _) = http_protocol()
            .process(&test_settings(), url::Url::parse(&url).unwrap())
            .await;
        assert_eq!(code, OracleResponseCode::Timeout);
    }

    #[tokio::test]
    async fn stalled_server_times_out() {
        // Listener accepts but never responds; budget expires.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _held = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let mut settings = test_settings();
        settings.https.timeout = Duration::from_millis(200);
        let url = url::Url::parse(&format!("http://{}/", addr)).unwrap();
        let (code, _) = http_protocol().process(&settings, url).await;
        assert_eq!(code, OracleResponseCode::Timeout);
    }

    #[test]
    fn media_type_parsing() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            "application/json; charset=UTF-8".parse().unwrap(),
        );
        let media_type = MediaType::from_headers(&headers).unwrap();
        assert_eq!(media_type.essence, "application/json");
        assert!(media_type.is_utf8());

        headers.insert(
            reqwest::header::CONTENT_TYPE,
            "text/plain;charset=latin-1".parse().unwrap(),
        );
        let media_type = MediaType::from_headers(&headers).unwrap();
        assert_eq!(media_type.essence, "text/plain");
        assert!(!media_type.is_utf8());

        assert!(MediaType::from_headers(&reqwest::header::HeaderMap::new()).is_none());
    }

    #[test]
    fn registry_serves_https_protocol() {
        assert!(ProtocolRegistry::new().get("https").is_some());
    }
}
