use tokio::sync::OnceCell;

use std::{sync::Arc, time::Duration};

use iroh::Endpoint;
use sea_orm::DatabaseConnection;
use zel_core::{prelude::RpcServerBuilder, protocol::RpcClient, IrohBundle};

use crate::service::{
    courses::{CoursesClient, CoursesServer, CoursesService},
    reference::{ReferenceCodes, ReferenceService},
    students::{StudentsClient, StudentsServer, StudentsService},
};

pub mod config;
pub mod content;
pub mod entity;
pub mod error;
pub mod ids;
pub mod models;
pub mod service;
pub mod slug;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_utils;

static KAPUA_CORE: OnceCell<Arc<KapuaCore>> = OnceCell::const_new();
static ALPN: &[u8] = b"kapua::0.1.0";

/// The process wide core, started on first use.
pub async fn core() -> Result<Arc<KapuaCore>, Box<dyn std::error::Error>> {
    let core = KAPUA_CORE
        .get_or_try_init(|| async move { KapuaCore::start().await.map(Arc::new) })
        .await?;
    Ok(core.clone())
}

/// Main runtime handle for Kapua.
pub struct KapuaCore {
    pub config: config::KapuaConfig,

    pub db: DatabaseConnection,

    /// Server bundle that accepts inbound RPC traffic.
    pub server: IrohBundle,

    /// Client-side endpoint used to connect to the local server.
    pub client_endpoint: Endpoint,

    /// Typed clients for the local server.
    pub students: StudentsClient,
    pub courses: CoursesClient,
}

impl KapuaCore {
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        let config = config::get_or_init().await?;
        Self::start_with(config).await
    }

    pub async fn start_with(config: config::KapuaConfig) -> Result<Self, Box<dyn std::error::Error>> {
        tracing::debug!(?config, "starting kapua core");
        // ----------------
        // Server endpoint
        // ----------------
        let mut server_builder = IrohBundle::builder(Some(config.secret_key.clone())).await?;
        let server_endpoint = server_builder.endpoint().clone();

        // DB + migrations
        let db = models::open_or_create_db(&config).await?;
        models::migrate_up(&db).await?;

        if let Some(path) = &config.reference_codes {
            let codes = ReferenceCodes::load(path).await?;
            ReferenceService::new(db.clone())._import(codes).await?;
        }

        let students_service = StudentsService::new(db.clone());
        let courses_service = CoursesService::new(db.clone());

        // Register RPC servers
        let rpc_server_builder = RpcServerBuilder::new(ALPN, server_endpoint.clone());

        let rpc_server_builder = students_service.register_service(rpc_server_builder);
        let rpc_server_builder = courses_service.register_service(rpc_server_builder);

        let rpc_server = rpc_server_builder.build();

        let server = server_builder.accept(ALPN, rpc_server).finish().await;

        server.wait_online().await;

        // ----------------
        // Client endpoint
        // ----------------
        let client_endpoint = Endpoint::builder()
            .secret_key(config.client_secret_key.clone())
            .alpns(vec![ALPN.to_vec()])
            .bind()
            .await?;

        client_endpoint.online().await;

        // Connect client endpoint -> server endpoint, one connection per typed client
        let conn = client_endpoint
            .connect(server.endpoint.addr(), ALPN)
            .await?;
        let students = StudentsClient::new(RpcClient::new(conn).await?);

        let conn = client_endpoint
            .connect(server.endpoint.addr(), ALPN)
            .await?;
        let courses = CoursesClient::new(RpcClient::new(conn).await?);

        tracing::info!(alpn = %String::from_utf8_lossy(ALPN), "kapua core online");

        Ok(Self {
            config,
            db,
            server,
            client_endpoint,
            students,
            courses,
        })
    }

    pub async fn shutdown(self) -> Result<(), Box<dyn std::error::Error>> {
        // Close client endpoint
        self.client_endpoint.close().await;

        // Shutdown server bundle
        self.server.shutdown(Duration::from_secs(5)).await?;
        tracing::info!("kapua core stopped");
        Ok(())
    }
}

pub mod prelude {
    pub use super::ids;
    pub use super::entity;
    pub use super::models;

    pub use super::service;

    pub use super::error;

    pub use super::config;

    pub use super::content::{ContentKind, ContentObject, ContentRef};

    pub use zel_core;
}
