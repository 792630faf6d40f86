//! The server value: configuration, routes and the live connection registry.
//!
//! A server runs on a single thread. [`Server::serve`] drives an accept loop
//! inside a [`LocalSet`]; every accepted socket becomes a local task running
//! the [`Connection`](crate::http::connection::Connection) state machine.
//! Shared state is only touched from that thread, so it sits in
//! `Rc`/`RefCell` rather than behind locks. Handlers run inline on that
//! thread and must not block.
//!
//! # Example
//!
//! ```no_run
//! use beacon::config::Config;
//! use beacon::server::Server;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut server = Server::new(Config::default());
//!     server.get("/user/*", |req, res| {
//!         res.write(format!("user {}", req.arg(0).unwrap_or("?")));
//!     });
//!     server.start()
//! }
//! ```

pub mod listener;
pub mod registry;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::LocalSet;
use tracing::{debug, info};

use crate::config::Config;
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::router::{Handler, Router};
use registry::{ClientId, ClientRegistry};

/// State shared by the accept loop and every connection of one server.
pub(crate) struct ServerContext {
    pub(crate) config: Config,
    pub(crate) router: Router,
    pub(crate) clients: RefCell<ClientRegistry>,
    /// Signalled whenever a connection leaves the registry.
    pub(crate) slot_freed: Notify,
}

impl ServerContext {
    fn new(config: Config, router: Router) -> Self {
        Self {
            config,
            router,
            clients: RefCell::new(ClientRegistry::new()),
            slot_freed: Notify::new(),
        }
    }

    pub(crate) fn client_count(&self) -> usize {
        self.clients.borrow().len()
    }

    pub(crate) fn release(&self, id: ClientId) {
        let removed = self.clients.borrow_mut().remove(id);
        if removed.is_some() {
            debug!(id, "Removing client");
            self.slot_freed.notify_one();
        }
    }

    /// Aborts every live connection and empties the registry.
    pub(crate) fn release_all(&self) -> usize {
        let clients = self.clients.borrow_mut().drain();
        for client in &clients {
            client.abort();
        }
        clients.len()
    }
}

/// Stops a running server from any thread.
#[derive(Clone, Debug)]
pub struct ShutdownHandle {
    notify: Arc<Notify>,
}

impl ShutdownHandle {
    /// Stops accepting, closes every live connection and releases the routes.
    /// Calling it before the server starts makes it stop right away.
    pub fn shutdown(&self) {
        self.notify.notify_one();
    }
}

pub struct Server {
    config: Config,
    router: Router,
    shutdown: Arc<Notify>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            router: Router::new(),
            shutdown: Arc::new(Notify::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Registers `handler` for `method` and `pattern`. Use `*` for a
    /// wildcard segment, e.g. `/user/*/edit`.
    pub fn route<H>(&mut self, method: Method, pattern: &str, handler: H) -> &mut Self
    where
        H: Handler + 'static,
    {
        self.router.add(method, pattern, handler);
        self
    }

    pub fn get<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&Request, &mut Response) + 'static,
    {
        self.route(Method::GET, pattern, handler)
    }

    pub fn post<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&Request, &mut Response) + 'static,
    {
        self.route(Method::POST, pattern, handler)
    }

    pub fn put<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&Request, &mut Response) + 'static,
    {
        self.route(Method::PUT, pattern, handler)
    }

    pub fn patch<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&Request, &mut Response) + 'static,
    {
        self.route(Method::PATCH, pattern, handler)
    }

    pub fn delete<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&Request, &mut Response) + 'static,
    {
        self.route(Method::DELETE, pattern, handler)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            notify: Arc::clone(&self.shutdown),
        }
    }

    /// Binds the configured `host:port`.
    pub async fn bind(&self) -> anyhow::Result<TcpListener> {
        let addr = self.config.listen_addr();
        TcpListener::bind(&addr)
            .await
            .with_context(|| format!("could not listen on {addr}"))
    }

    /// Serves connections from `listener` until the shutdown handle fires.
    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        let addr = listener
            .local_addr()
            .context("failed to read listener address")?;
        info!(%addr, routes = self.router.len(), "Starting server");

        let Server {
            config,
            router,
            shutdown,
        } = self;
        let context = Rc::new(ServerContext::new(config, router));

        let local = LocalSet::new();
        local
            .run_until(listener::run(context, listener, shutdown))
            .await;
        Ok(())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Runs the server on the calling thread until it is stopped.
    pub fn start(self) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to build the event loop")?;
        runtime.block_on(self.run())
    }
}
