//! HTTP adapter: a tiny_http server in front of a [`RequestHandler`].
//!
//! Requests are accepted on the calling thread and handled on a tokio
//! runtime, so a slow render only stalls its own request.

mod lifecycle;
mod response;

use crate::{
    config::KilnConfig,
    log,
    site::{HandlerOptions, Method, Request, RequestHandler},
};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tiny_http::Server;

/// Load the configured source and serve it until Ctrl+C.
pub fn serve(config: &KilnConfig) -> Result<()> {
    let site = super::load_site(config)?;
    let handler = site.handle_request(HandlerOptions::default());

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    lifecycle::register_shutdown(Arc::clone(&server))?;

    log!("serve"; "http://{}", addr);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    run_request_loop(&server, &runtime, &handler);

    runtime.shutdown_timeout(Duration::from_secs(2));
    Ok(())
}

fn run_request_loop(server: &Server, runtime: &tokio::runtime::Runtime, handler: &RequestHandler) {
    for request in server.incoming_requests() {
        let handler = handler.clone();
        runtime.spawn(async move {
            let incoming = Request::new(Method::parse(request.method().as_str()), request.url());
            let result = handler.handle(&incoming).await;
            let sent =
                tokio::task::spawn_blocking(move || response::respond(request, result)).await;
            match sent {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log!("serve"; "request error: {e}"),
                Err(e) => log!("serve"; "request task failed: {e}"),
            }
        });
    }
}
