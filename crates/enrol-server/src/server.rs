//! The HTTP accept loop.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use enrol_client::HttpRegistrationApi;

use crate::app::App;
use crate::config::Config;
use crate::error::Result;

/// Serves `app` on `listener` until `shutdown` completes.
///
/// Connections already accepted are left to finish on their own.
pub async fn serve<F>(app: Arc<App>, listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let sweeper = spawn_sweeper(Arc::clone(&app));

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(err) => {
                    sweeper.abort();
                    return Err(err.into());
                }
            },
            () = &mut shutdown => {
                info!("shutting down");
                sweeper.abort();
                return Ok(());
            }
        };
        debug!(%peer, "connection accepted");

        let io = TokioIo::new(stream);
        let app = Arc::clone(&app);
        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let app = Arc::clone(&app);
                async move { Ok::<_, Infallible>(app.handle(req).await) }
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                warn!(%peer, error = %err, "error serving connection");
            }
        });
    }
}

/// Drops idle sessions in the background, twice per idle timeout.
fn spawn_sweeper(app: Arc<App>) -> tokio::task::JoinHandle<()> {
    let period = (app.config().session_idle_timeout / 2).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval(period);
        ticks.tick().await;
        loop {
            ticks.tick().await;
            let removed = app.sessions().sweep().await;
            if removed > 0 {
                debug!(removed, "swept idle sessions");
            }
        }
    })
}

/// Builds the HTTP client, binds the listener and serves until Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    let api = HttpRegistrationApi::new(config.endpoints.clone(), config.request_timeout)?;
    let listener = TcpListener::bind(config.listen).await?;
    info!(
        address = %listener.local_addr()?,
        departments = %config.endpoints.departments_url,
        users = %config.endpoints.users_url,
        locale = config.locale.code(),
        "registration form listening"
    );

    let app = Arc::new(App::new(config, Arc::new(api)));
    serve(app, listener, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    })
    .await
}
