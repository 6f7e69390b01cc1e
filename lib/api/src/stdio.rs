//! Newline-delimited JSON-RPC over stdin/stdout.

use crate::handler::Dispatcher;
use std::future::Future;
use std::io::BufRead;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Lines buffered between the stdin thread and the dispatch loop
const LINE_BUFFER: usize = 64;

pub struct StdioServer;

impl StdioServer {
    /// Serve on the process's stdin/stdout until EOF or Ctrl-C
    pub async fn start(dispatcher: Dispatcher) -> std::io::Result<()> {
        let lines = spawn_stdin_reader()?;
        let writer = tokio::io::stdout();
        let shutdown = async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
            }
        };
        serve(&dispatcher, lines, writer, shutdown).await
    }
}

/// Read stdin on a plain thread and forward every line.
///
/// The thread is detached; a pending blocking read never holds up runtime
/// shutdown or process exit.
fn spawn_stdin_reader() -> std::io::Result<mpsc::Receiver<std::io::Result<String>>> {
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    std::thread::Builder::new()
        .name("entcmp-stdin".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// One message per line in, one response per line out.
///
/// Blank lines are skipped and notifications produce no output. Returns
/// when the line source closes or `shutdown` resolves.
pub async fn serve<W, S>(
    dispatcher: &Dispatcher,
    mut lines: mpsc::Receiver<std::io::Result<String>>,
    mut writer: W,
    shutdown: S,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    info!("Server ready, waiting for requests on stdin");

    loop {
        let line = tokio::select! {
            _ = &mut shutdown => break,
            line = lines.recv() => line,
        };

        let line = match line {
            Some(Ok(line)) => line,
            None => {
                info!("stdin closed");
                break;
            }
            Some(Err(e)) => {
                error!("Error reading stdin: {}", e);
                return Err(e);
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        debug!("Received: {} bytes", line.len());

        let Some(response) = dispatcher.handle_line(&line).await else {
            continue;
        };

        let mut payload = serde_json::to_string(&response)?;
        payload.push('\n');
        writer.write_all(payload.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}
