use crate::console::config::ConsoleConfig;
use aec_core::eval::{BannerReply, Evaluator, StatementReply, StatementRequest, TransportError};
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use url::Url;

pub const STATEMENT_PATH: &str = "console/statement";
pub const BANNER_PATH: &str = "console/banner";

#[derive(Clone)]
pub struct HttpEvaluator {
    http: Client,
    statement_url: Url,
    banner_url: Url,
}

impl HttpEvaluator {
    pub fn new(cfg: &ConsoleConfig) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let mut builder = Client::builder()
            .default_headers(headers)
            .use_rustls_tls()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(2)
            .timeout(cfg.timeout);
        if let Some(p) = &cfg.proxy {
            builder = builder.proxy(reqwest::Proxy::all(p)?);
        }
        let http = builder.build()?;
        let statement_url = endpoint(&cfg.base_url, STATEMENT_PATH)?;
        let banner_url = endpoint(&cfg.base_url, BANNER_PATH)?;
        info!(target: "remote", "console endpoint {}", statement_url);
        Ok(Self {
            http,
            statement_url,
            banner_url,
        })
    }

    async fn read_json<T: DeserializeOwned>(
        resp: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T, TransportError> {
        let resp = resp.map_err(map_reqwest_err)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.ok();
            return Err(map_status_err(status, body));
        }
        let body = resp.text().await.map_err(map_reqwest_err)?;
        decode(&body)
    }
}

#[allow(async_fn_in_trait)]
impl Evaluator for HttpEvaluator {
    async fn statement(&self, req: &StatementRequest) -> Result<StatementReply, TransportError> {
        let started = Instant::now();
        debug!(target: "remote", "POST {} session={} code_len={}", self.statement_url, req.session, req.code.len());
        let resp = self
            .http
            .post(self.statement_url.clone())
            .form(&req.form())
            .send()
            .await;
        let out = Self::read_json::<StatementReply>(resp).await;
        match &out {
            Ok(r) => debug!(target: "remote", "statement ok continuing={} in {:?}", r.continuing, started.elapsed()),
            Err(e) => error!(target: "remote", "statement failed after {:?}: {}", started.elapsed(), e),
        }
        out
    }

    async fn banner(&self) -> Result<BannerReply, TransportError> {
        debug!(target: "remote", "GET {}", self.banner_url);
        let resp = self.http.get(self.banner_url.clone()).send().await;
        Self::read_json(resp).await
    }
}

/// Resolve `path` under `base`, treating `base` as a directory even when it
/// lacks a trailing slash.
pub fn endpoint(base: &str, path: &str) -> Result<Url, url::ParseError> {
    let mut base = base.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base)?.join(path)
}

pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, TransportError> {
    serde_json::from_str(body).map_err(|e| TransportError::ParseError(e.to_string()))
}

fn map_reqwest_err(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(e.to_string())
    } else if e.is_decode() {
        TransportError::ParseError(e.to_string())
    } else {
        TransportError::Error(e.to_string())
    }
}

fn map_status_err(status: StatusCode, body: Option<String>) -> TransportError {
    match status {
        StatusCode::NOT_MODIFIED => TransportError::NotModified,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            TransportError::Timeout(status.as_u16().to_string())
        }
        _ => TransportError::Error(format!("{} {}", status.as_u16(), body.unwrap_or_default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path() {
        let u = endpoint("http://localhost:8080", STATEMENT_PATH).unwrap();
        assert_eq!(u.as_str(), "http://localhost:8080/console/statement");
        let u = endpoint("https://app.example.com/tools", BANNER_PATH).unwrap();
        assert_eq!(u.as_str(), "https://app.example.com/tools/console/banner");
        let u = endpoint("https://app.example.com/tools/", BANNER_PATH).unwrap();
        assert_eq!(u.as_str(), "https://app.example.com/tools/console/banner");
    }

    #[test]
    fn endpoint_rejects_garbage() {
        assert!(endpoint("not a url", STATEMENT_PATH).is_err());
    }

    #[test]
    fn statuses_map_to_transport_errors() {
        assert_eq!(
            map_status_err(StatusCode::NOT_MODIFIED, None),
            TransportError::NotModified
        );
        assert!(matches!(
            map_status_err(StatusCode::GATEWAY_TIMEOUT, None),
            TransportError::Timeout(_)
        ));
        match map_status_err(StatusCode::INTERNAL_SERVER_ERROR, Some("boom".into())) {
            TransportError::Error(s) => assert_eq!(s, "500 boom"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        let r: Result<BannerReply, _> = decode("<html>oops</html>");
        assert!(matches!(r, Err(TransportError::ParseError(_))));
        let b: BannerReply = decode(r#"{"banner":"Python 2.5.2"}"#).unwrap();
        assert_eq!(b.banner, "Python 2.5.2");
    }

    #[test]
    fn statement_body_decodes_into_reply() {
        let body = r#"{"in":"<pre>x = 1\n</pre>","out":"","result":"1"}"#;
        let r: StatementReply = decode(body).unwrap();
        assert_eq!(r.input, "<pre>x = 1\n</pre>");
        assert_eq!(r.output, "");
        assert!(r.continuing);
    }

    #[test]
    fn client_builds_from_default_config() {
        let c = HttpEvaluator::new(&ConsoleConfig::default()).unwrap();
        assert_eq!(c.banner_url.path(), "/console/banner");
    }
}
