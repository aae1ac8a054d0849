//! Keep-alive web server.
//!
//! A single static page keeps the hosting process alive. Runs on its own
//! task so the chat loop and the server never block each other.

use std::net::SocketAddr;

use axum::{response::Html, routing::get, Router};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const PAGE: &str = r#"<html>
  <body style="font-family:Verdana;text-align:center;background:#696969;">
    <h1>Meowie is awake!</h1>
    <p style="font-size:23px">mew mew mew</p>
    <footer>
      <hr style="background-color:black">
      <p>komi!!!</p>
    </footer>
  </body>
</html>"#;

async fn home() -> Html<&'static str> {
    Html(PAGE)
}

fn router() -> Router {
    Router::new().route("/", get(home))
}

/// Handle to the running keep-alive server
pub struct KeepAlive {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl KeepAlive {
    /// Bind and serve on a dedicated task
    pub fn spawn(addr: SocketAddr) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let server = axum::Server::bind(&addr)
                .serve(router().into_make_service())
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                });

            tracing::info!("keep-alive server listening on {}", addr);

            if let Err(err) = server.await {
                tracing::error!("keep-alive server failed: {}", err);
            }
        });

        Self {
            shutdown: shutdown_tx,
            task,
        }
    }

    /// Stop accepting connections and wait for the server to wind down
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        let _ = self.task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn home_serves_the_static_page() {
        let Html(body) = home().await;

        assert!(body.contains("Meowie"));
        assert!(body.starts_with("<html>"));
    }

    #[test]
    fn router_builds() {
        let _ = router();
    }
}
