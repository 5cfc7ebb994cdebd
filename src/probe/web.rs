use std::time::{Duration, Instant};

use reqwest::Client;
use url::Url;

use super::{RawOutcome, TIMED_OUT, root_cause};

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        TIMED_OUT.to_string()
    } else {
        root_cause(err)
    }
}

/// Issue one GET against `url` and download the response body, all within `deadline`.
/// Any status code counts as a response; deciding what passes is left to the classifier.
/// A body that breaks off after the status line is a `WebHttpError` carrying that status.
pub async fn execute(url: &str, client: &Client, deadline: Duration) -> RawOutcome {
    let parsed_url = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            return RawOutcome::WebTransportError {
                message: format!("Invalid URL: {e}"),
            };
        }
    };

    let start = Instant::now();
    let response = match client.get(parsed_url).timeout(deadline).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("GET {url} failed after {:?}: {e}", start.elapsed());
            return RawOutcome::WebTransportError {
                message: describe(&e),
            };
        }
    };

    let status_code = response.status().as_u16();
    let outcome = match response.bytes().await {
        Ok(_) => RawOutcome::WebOk { status_code },
        Err(e) => RawOutcome::WebHttpError {
            status_code,
            message: describe(&e),
        },
    };

    tracing::debug!("GET {url} -> {status_code} in {:?}", start.elapsed());
    outcome
}
