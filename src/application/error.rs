use thiserror::Error;

use crate::{
    application::access::AccessError, cache::CacheError, config::LoadError,
    infra::error::InfraError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
}
