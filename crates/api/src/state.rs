use std::sync::Arc;

use featmgr_db::stores::{
    AssociationStore, EntityGateway, InMemoryCatalog, OrphanFinder, PgCatalog, ProductLookup,
};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub catalog: Catalog,
}

/// The store interfaces the services run against.
#[derive(Clone)]
pub struct Catalog {
    pub associations: Arc<dyn AssociationStore>,
    pub products: Arc<dyn ProductLookup>,
    pub orphans: Arc<dyn OrphanFinder>,
    pub entities: Arc<dyn EntityGateway>,
}

impl Catalog {
    /// Serve every interface from one backend.
    pub fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: AssociationStore + ProductLookup + OrphanFinder + EntityGateway + 'static,
    {
        Self {
            associations: store.clone(),
            products: store.clone(),
            orphans: store.clone(),
            entities: store,
        }
    }

    pub fn postgres(catalog: PgCatalog) -> Self {
        Self::from_shared(Arc::new(catalog))
    }

    pub fn in_memory(catalog: Arc<InMemoryCatalog>) -> Self {
        Self::from_shared(catalog)
    }
}
