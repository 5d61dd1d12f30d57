//! Business logic services

pub mod auth;
pub mod catalog;
pub mod rents;
pub mod transaction_client;
pub mod transactions;
pub mod users;

use std::sync::Arc;

use crate::{config::AuthConfig, repository::Repository};

use transaction_client::TransactionClient;

/// Container for the library service's services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub rents: rents::RentsService,
}

impl Services {
    /// Create all services with the given repository and transaction client
    pub fn new(
        repository: Repository,
        auth_config: &AuthConfig,
        transactions: Arc<dyn TransactionClient>,
    ) -> Self {
        let auth = auth::AuthService::new(auth_config);
        Self {
            users: users::UsersService::new(repository.clone(), auth.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            rents: rents::RentsService::new(repository, transactions),
            auth,
        }
    }
}
