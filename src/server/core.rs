use log::{error, info, warn};
use std::collections::HashSet;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::config::ServerConfig;
use crate::protocol::responses::{READY, SERVICE_UNAVAILABLE, format_response};
use crate::server::session::handle_client;
use crate::storage::StorageService;

pub struct Server {
    client_registry: Arc<Mutex<HashSet<SocketAddr>>>,
    listener: TcpListener,
    config: Arc<ServerConfig>,
    service: Arc<StorageService>,
}

impl Server {
    /// Binds the listener. Port 0 picks a free port, see `local_addr`.
    pub async fn bind(config: ServerConfig, service: Arc<StorageService>) -> io::Result<Self> {
        let socket = config.socket();
        let listener = TcpListener::bind(&socket).await.map_err(|e| {
            error!("Failed to bind to {}: {}", socket, e);
            e
        })?;
        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            client_registry: Arc::new(Mutex::new(HashSet::new())),
            listener,
            config: Arc::new(config),
            service,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn start(&self) {
        info!(
            "Serving storage root {} (max {} clients)",
            self.service.root().display(),
            self.config.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let client_registry = Arc::clone(&self.client_registry);
                    let config = Arc::clone(&self.config);
                    let service = Arc::clone(&self.service);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_new_client(stream, addr, client_registry, config, service).await
                        {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Greets and registers a client, then hands it to the session loop.
async fn handle_new_client(
    mut stream: TcpStream,
    client_addr: SocketAddr,
    client_registry: Arc<Mutex<HashSet<SocketAddr>>>,
    config: Arc<ServerConfig>,
    service: Arc<StorageService>,
) -> io::Result<()> {
    {
        let mut clients = client_registry.lock().await;
        if clients.len() >= config.max_clients {
            stream
                .write_all(
                    format_response(SERVICE_UNAVAILABLE, "Too many connections. Try again later.")
                        .as_bytes(),
                )
                .await?;
            return Ok(());
        }
        clients.insert(client_addr);
        info!(
            "Accepted client: {} ({}/{} clients)",
            client_addr,
            clients.len(),
            config.max_clients
        );
    }

    let greeting = stream
        .write_all(format_response(READY, "Gallery storage ready").as_bytes())
        .await;

    let result = match greeting {
        Ok(()) => handle_client(stream, client_addr, &config, service).await,
        Err(e) => Err(e),
    };

    client_registry.lock().await.remove(&client_addr);
    info!("Client {} disconnected", client_addr);
    result
}
