//! Endpoint that answers with a bare status line
//!
//! wiremock always writes canonical reason phrases. A real endpoint reports
//! some protocol errors only in the status line (`HTTP/1.1 400 RDF datasets
//! not allowed`, empty body), so this server writes the line itself.

use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::mock::Scope;

/// Largest request head read before answering
const MAX_HEAD_BYTES: usize = 64 * 1024;

/// Answers every request with `HTTP/1.1 <status> <reason>` and no body
pub struct StatusLineEndpoint {
    addr: SocketAddr,
    scope: Scope,
    task: JoinHandle<()>,
}

impl StatusLineEndpoint {
    pub async fn start(scope: Scope, status: u16, reason: &str) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let response = format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        );

        let task = tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let response = response.clone();
                tokio::spawn(async move {
                    let _ = answer(socket, response.as_bytes()).await;
                });
            }
        });

        Ok(Self { addr, scope, task })
    }

    /// Full endpoint URL (server address plus scope path)
    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, self.scope.path())
    }
}

impl Drop for StatusLineEndpoint {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn answer(mut socket: TcpStream, response: &[u8]) -> io::Result<()> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") && head.len() < MAX_HEAD_BYTES {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    socket.write_all(response).await?;
    socket.shutdown().await
}
