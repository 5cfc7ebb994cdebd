//! In-process HTTP server and probe context for tests.
//!
//! Routes:
//! - `/ok` answers 200
//! - `/status/<code>` answers `<code>`
//! - `/slow/<ms>` answers 200 after sleeping `<ms>` milliseconds
//! - `/redirect` answers 302 pointing at `/ok`
//! - `/loop` answers 302 pointing at itself
//! - `/user-agent` answers 200 with the request's User-Agent as body
//!
//! `spawn_truncating_server` answers every connection with a status line and a
//! body shorter than its Content-Length, then hangs up.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{LOCATION, USER_AGENT};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use reqwest::Client;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use trust_dns_resolver::TokioAsyncResolver;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};

use crate::config::app_config::{http_client_builder, parse_settings};
use crate::probe::ProbeContext;

pub async fn spawn_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service_fn(respond))
                    .await;
            });
        }
    });

    addr
}

fn status(code: StatusCode) -> Response<Full<Bytes>> {
    Response::builder()
        .status(code)
        .body(Full::new(Bytes::from(code.to_string())))
        .unwrap()
}

fn redirect(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(LOCATION, location)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

async fn respond(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path().to_string();
    let mut segments = path.trim_start_matches('/').split('/');

    let response = match (segments.next(), segments.next()) {
        (Some("ok"), _) => status(StatusCode::OK),
        (Some("status"), Some(code)) => status(
            code.parse::<u16>()
                .ok()
                .and_then(|c| StatusCode::from_u16(c).ok())
                .unwrap_or(StatusCode::BAD_REQUEST),
        ),
        (Some("slow"), Some(ms)) => {
            let ms = ms.parse::<u64>().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(ms)).await;
            status(StatusCode::OK)
        }
        (Some("redirect"), _) => redirect("/ok"),
        (Some("loop"), _) => redirect("/loop"),
        (Some("user-agent"), _) => {
            let agent = req
                .headers()
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            Response::new(Full::new(Bytes::from(agent)))
        }
        _ => status(StatusCode::NOT_FOUND),
    };
    Ok(response)
}

pub async fn spawn_truncating_server(code: u16, reason: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = [0u8; 1024];
                let _ = stream.read(&mut request).await;
                let head = format!("HTTP/1.1 {code} {reason}\r\nContent-Length: 100\r\n\r\nabc");
                let _ = stream.write_all(head.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    addr
}

/// The production client configuration with `MaxRedirects` set to `max_redirects`,
/// minus any configured proxy so loopback test traffic stays local.
pub fn http_client(max_redirects: u32) -> Client {
    let mut settings = parse_settings("Version: test").unwrap();
    settings.max_redirects = max_redirects;
    http_client_builder(&settings).no_proxy().build().unwrap()
}

pub fn probe_context() -> ProbeContext {
    ProbeContext {
        http: http_client(10),
        resolver: TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default()),
    }
}
