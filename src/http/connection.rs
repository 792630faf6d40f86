use std::io;
use std::net::SocketAddr;
use std::rc::Weak;

use anyhow::Context;
use bytes::{BufMut, BytesMut};
use tokio::net::TcpStream;
use tracing::{debug, error, info};

use crate::http::parser::parse_request;
use crate::http::response::{Response, StatusCode};
use crate::http::static_files::StaticFile;
use crate::http::writer::ResponseWriter;
use crate::server::ServerContext;

/// Most bytes taken from the socket per read readiness event.
pub const READ_CHUNK: usize = 16 * 1024;

pub struct Connection {
    peer: SocketAddr,
    stream: TcpStream,
    buffer: BytesMut,
    state: ConnectionState,
    server: Weak<ServerContext>,
}

enum ConnectionState {
    Accepted,
    Reading,
    Processing,
    Writing(ResponseWriter),
    Closed,
}

impl Connection {
    pub(crate) fn new(stream: TcpStream, peer: SocketAddr, server: Weak<ServerContext>) -> Self {
        Self {
            peer,
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::Accepted,
            server,
        }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Drives the connection until the response is flushed or the client
    /// goes away. The socket closes when the connection is dropped.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let current = std::mem::replace(&mut self.state, ConnectionState::Closed);
            self.state = match current {
                ConnectionState::Accepted => {
                    info!("Accept connection");
                    ConnectionState::Reading
                }

                ConnectionState::Reading => self.read_once().await?,

                ConnectionState::Processing => {
                    let response = self.process().await;
                    ConnectionState::Writing(ResponseWriter::new(&response))
                }

                ConnectionState::Writing(mut writer) => {
                    if self.write_once(&mut writer).await? {
                        ConnectionState::Closed
                    } else {
                        ConnectionState::Writing(writer)
                    }
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    /// Waits for read readiness and performs one non-blocking read.
    async fn read_once(&mut self) -> anyhow::Result<ConnectionState> {
        self.stream
            .readable()
            .await
            .context("failed to wait for read readiness")?;

        self.buffer.reserve(READ_CHUNK);
        let mut chunk = (&mut self.buffer).limit(READ_CHUNK);
        match self.stream.try_read_buf(&mut chunk) {
            Ok(0) => {
                info!("Client closed connection");
                Ok(ConnectionState::Closed)
            }
            Ok(n) => {
                debug!(bytes = n, buffered = self.buffer.len(), "Read from client");
                let Some(server) = self.server.upgrade() else {
                    return Ok(ConnectionState::Closed);
                };
                if self.buffer.len() > server.config.max_body_size {
                    info!(size = self.buffer.len(), "Body size exceeded");
                    return Ok(ConnectionState::Closed);
                }
                Ok(ConnectionState::Processing)
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(ConnectionState::Reading),
            Err(e) if e.kind() == io::ErrorKind::ConnectionReset => {
                info!("Connection reset by peer");
                Ok(ConnectionState::Closed)
            }
            Err(e) => Err(anyhow::Error::new(e).context("error reading from client")),
        }
    }

    /// Waits for write readiness and performs one non-blocking write.
    /// Returns `true` once the connection is done writing.
    async fn write_once(&mut self, writer: &mut ResponseWriter) -> anyhow::Result<bool> {
        self.stream
            .writable()
            .await
            .context("failed to wait for write readiness")?;

        match self.stream.try_write(writer.remaining()) {
            Ok(0) => Err(anyhow::anyhow!("connection closed while writing")),
            Ok(n) => {
                writer.advance(n);
                debug!(written = writer.written(), total = writer.len(), "Wrote to client");
                Ok(writer.is_complete())
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(false),
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::ConnectionReset => {
                info!("Connection reset by peer while writing");
                Ok(true)
            }
            Err(e) => Err(anyhow::Error::new(e).context("error writing to socket")),
        }
    }

    /// Turns the buffered bytes into a finalized response: handler, then
    /// static file, then 404.
    async fn process(&mut self) -> Response {
        let raw = self.buffer.split().freeze();
        debug!("Request:\n{}", String::from_utf8_lossy(&raw));

        let mut request = match parse_request(&raw) {
            Ok(request) => request,
            Err(e) => {
                error!("Invalid request: {}", e);
                return Response::with_status(StatusCode::BadRequest);
            }
        };

        let mut response = Response::new();
        let Some(server) = self.server.upgrade() else {
            response.set_status(StatusCode::InternalServerError);
            return response;
        };

        if let Some(handler) = server.router.find(&mut request) {
            handler.handle(&request, &mut response);
        } else if let Some(file) = find_static(&server, &request.path).await {
            file.read_into(&mut response).await;
        } else {
            response.set_status(StatusCode::NotFound);
        }

        response.finalize();
        debug!(
            code = response.code,
            body = response.body.len(),
            method = %request.method,
            path = %request.path,
            "Response ready"
        );
        response
    }
}

async fn find_static(server: &ServerContext, path: &str) -> Option<StaticFile> {
    let root = server.config.static_root.as_deref()?;
    StaticFile::open(root, path).await
}
