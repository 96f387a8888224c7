//! Newline-delimited JSON transport over stdin/stdout.
//!
//! Every line on stdin is one [`Request`]. Every line on stdout is either a
//! runtime [`Event`](runtime::Event) or a rejection of a request.

use anyhow::{Context, Result};
use game_core::GameError;
use runtime::{Request, Runtime, RuntimeError};
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Writes queued lines to `out` until every sender is gone.
pub fn spawn_writer<W>(mut out: W, mut lines: mpsc::Receiver<String>) -> JoinHandle<Result<()>>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(line) = lines.recv().await {
            out.write_all(line.as_bytes()).await?;
            out.write_all(b"\n").await?;
            out.flush().await?;
        }
        Ok(())
    })
}

/// Forwards every published event to the writer as a JSON line.
pub fn forward_events(runtime: &Runtime, lines: mpsc::Sender<String>) -> Vec<JoinHandle<()>> {
    runtime
        .subscribe_all()
        .into_iter()
        .map(|(topic, mut rx)| {
            let lines = lines.clone();
            tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(event) => match serde_json::to_string(&event) {
                            Ok(line) => {
                                if lines.send(line).await.is_err() {
                                    break;
                                }
                            }
                            Err(err) => error!(?topic, "Failed to encode event: {err}"),
                        },
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(?topic, skipped, "event writer fell behind, events dropped");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            })
        })
        .collect()
}

/// Reads requests until `input` is exhausted.
pub async fn serve<R>(runtime: &Runtime, input: R, lines: mpsc::Sender<String>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut input = input.lines();
    while let Some(line) = input.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(err) => {
                warn!("Malformed request: {err}");
                let rejection = json!({
                    "type": "Rejected",
                    "code": "MALFORMED_REQUEST",
                    "message": err.to_string(),
                });
                let _ = lines.send(rejection.to_string()).await;
                continue;
            }
        };

        let match_id = request.match_id().to_owned();
        match runtime.dispatch(request).await {
            Ok(reply) => debug!(%match_id, ?reply, "request accepted"),
            Err(err) => {
                let _ = lines.send(rejection_line(&match_id, &err)).await;
            }
        }
    }
    Ok(())
}

fn rejection_line(match_id: &str, err: &RuntimeError) -> String {
    json!({
        "type": "Rejected",
        "matchId": match_id,
        "code": err.error_code(),
        "severity": err.severity().as_str(),
        "message": err.to_string(),
    })
    .to_string()
}
