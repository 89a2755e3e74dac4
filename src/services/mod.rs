//! Business logic services

pub mod acquisition;
pub mod catalog;
pub mod shelf;
pub mod users;

use std::sync::Arc;

use crate::{
    config::{AuthConfig, OpacConfig},
    error::AppResult,
    opac::OpacClient,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub shelf: shelf::ShelfService,
    pub acquisition: acquisition::AcquisitionService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        opac_config: &OpacConfig,
    ) -> AppResult<Self> {
        let opac_client = Arc::new(OpacClient::new(opac_config)?);
        let acquisition = acquisition::AcquisitionService::new(
            Arc::new(repository.books.clone()),
            opac_client,
        );

        Ok(Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            shelf: shelf::ShelfService::new(repository, acquisition.clone()),
            acquisition,
        })
    }
}
