//! The serving loop.

use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::signal;

use crate::device::{DeviceState, FileStore, Restart};
use crate::parser::{BoundedBuf, JsonCodec, Request, parse_request_line, read_line, skip_headers};
use crate::server::actions::{ActionEffect, ActionRegistry};
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::handler::ThingResources;
use crate::server::response::{AfterReply, Emitter, Reply};
use crate::server::router::Router;

/// The per-request buffers, allocated once and reused for every connection.
#[derive(Debug)]
pub struct RequestBuffers {
    pub line: BoundedBuf,
    pub method: BoundedBuf,
    pub path: BoundedBuf,
}

impl RequestBuffers {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            line: BoundedBuf::with_capacity(config.line_capacity),
            method: BoundedBuf::with_capacity(config.method_capacity),
            path: BoundedBuf::with_capacity(config.path_capacity),
        }
    }
}

/// How a connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A response was written and the connection closed.
    Responded,
    /// The connection was closed without writing anything.
    Closed,
    /// A response was written, the connection closed, and the device must restart.
    Restart,
}

/// A Web of Things server for a single Thing.
///
/// Connections are served strictly one at a time: each is read, routed,
/// answered and closed before the next is accepted.
pub struct WotServer<F, D, R> {
    /// The server configuration.
    pub config: ServerConfig,
    router: Router,
    resources: ThingResources<F, D>,
    buffers: RequestBuffers,
    emitter: Emitter,
    restart: R,
}

impl<F, D, R> WotServer<F, D, R>
where
    F: FileStore,
    D: DeviceState,
    R: Restart,
{
    /// Create a server; all buffers are sized here from `config`.
    pub fn new(config: ServerConfig, store: F, device: D, restart: R) -> Self {
        let resources = ThingResources::new(store, device, JsonCodec::new(config.json_capacity))
            .with_properties(config.properties.iter().cloned())
            .with_portal(config.portal);

        Self {
            router: Router::new(&config.thing_name),
            buffers: RequestBuffers::new(&config),
            emitter: Emitter::new(config.line_capacity),
            resources,
            restart,
            config,
        }
    }

    /// Register an additional action under `name`.
    pub fn add_action<A>(&mut self, name: impl Into<String>, action: A) -> &mut Self
    where
        A: FnMut(&mut dyn DeviceState) -> ActionEffect + 'static,
    {
        self.resources.actions_mut().register(name, action);
        self
    }

    pub fn actions_mut(&mut self) -> &mut ActionRegistry {
        self.resources.actions_mut()
    }

    pub fn device(&self) -> &D {
        self.resources.device()
    }

    pub fn device_mut(&mut self) -> &mut D {
        self.resources.device_mut()
    }

    /// Log the registered endpoints.
    fn display_server_info(&self) {
        info!("Thing {} endpoints:", self.config.thing_name);
        for endpoint in self.router.endpoints() {
            info!("  {endpoint}");
        }
        for property in self.resources.properties() {
            info!("  property {}", property.name);
        }
        for action in self.resources.action_registry().names() {
            info!("  action {action}");
        }
    }

    /// Bind the configured address and serve until Ctrl+C.
    pub async fn run(mut self) -> Result<(), Error> {
        self.display_server_info();

        let listener = TcpListener::bind(self.config.addr).await?;
        info!("Server listening on http://{addr}", addr = self.config.addr);

        let shutdown = signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                signalled = &mut shutdown => {
                    match signalled {
                        Ok(()) => info!("Received Ctrl+C, shutting down"),
                        Err(e) => error!("Error setting up Ctrl+C handler: {e}; shutting down"),
                    }
                    break;
                }

                accepted = listener.accept() => {
                    match accepted {
                        Ok((socket, addr)) => {
                            debug!("New connection from {addr}");
                            self.serve_connection(socket).await;
                        }
                        Err(e) => {
                            error!("Error accepting connection: {e}");
                            tokio::time::sleep(Duration::from_millis(100)).await;
                        }
                    }
                }
            }
        }

        info!("Server shutdown complete");
        Ok(())
    }

    /// Serve one connection to completion and close it.
    ///
    /// If the request asked for a restart, the restart primitive is invoked
    /// after the connection is closed and this call never returns.
    pub async fn serve_connection<S>(&mut self, mut socket: S)
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let read_timeout = self.config.read_timeout;
        let handled = match read_timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, self.handle_connection(&mut socket)).await {
                    Ok(handled) => handled,
                    Err(_) => {
                        warn!("Connection timed out after {limit:?}, closing");
                        Ok(Outcome::Closed)
                    }
                }
            }
            None => self.handle_connection(&mut socket).await,
        };
        drop(socket);

        match handled {
            Ok(Outcome::Restart) => self.restart.trigger_restart(),
            Ok(outcome) => debug!("Closing connection ({outcome:?})"),
            Err(e) => error!("Error handling connection: {e}"),
        }
    }

    /// Read, route and answer a single request.
    ///
    /// Returns `Ok(Outcome::Closed)` without writing anything when the request
    /// line does not carry both a method and a path.
    pub async fn handle_connection<S>(&mut self, socket: &mut S) -> Result<Outcome, Error>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let Self {
            router,
            resources,
            buffers,
            emitter,
            ..
        } = self;
        let RequestBuffers { line, method, path } = buffers;
        let mut stream = BufReader::new(socket);

        read_line(&mut stream, line).await?;
        if let Err(e) = parse_request_line(line.as_bytes(), method, path) {
            warn!("HTTP req parsing: {e}; closing connection");
            stream.shutdown().await?;
            return Ok(Outcome::Closed);
        }

        let request = Request::new(method.as_str(), path.as_str());
        debug!("HTTP Method: {}", request.method);
        debug!("Request Path: {}", request.path);

        skip_headers(&mut stream, line).await?;

        let route = router.route(request.path);
        let reply = match resources.dispatch(route, &request, &mut stream).await {
            Ok(Some(reply)) => reply,
            Ok(None) => {
                stream.shutdown().await?;
                return Ok(Outcome::Closed);
            }
            Err(e) => match e.status() {
                Some(status) => {
                    warn!("{} {}: {e}; sending {}", request.method, request.path, status.as_u16());
                    Reply::new(status)
                }
                None => return Err(e),
            },
        };

        let after = emitter.send(&mut stream, reply).await?;
        stream.shutdown().await?;

        Ok(match after {
            AfterReply::Close => Outcome::Responded,
            AfterReply::Restart => {
                info!("System is going down!");
                Outcome::Restart
            }
        })
    }
}
