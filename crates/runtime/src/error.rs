//! Errors surfaced by session operations.

use ledger_core::{ConfigError, ErrorSeverity, LedgerError};
use thiserror::Error;

pub use crate::repository::RepositoryError;
use crate::repository::{ActorId, ItemId};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Content(#[from] anyhow::Error),

    #[error("character {0} not found")]
    CharacterNotFound(ActorId),

    #[error("social club {0} not found")]
    ClubNotFound(ActorId),

    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    #[error("{item} is not owned by {owner}")]
    NotOwned { owner: ActorId, item: ItemId },

    #[error("{item} is a {found}, expected a {expected}")]
    ItemKindMismatch {
        item: ItemId,
        expected: &'static str,
        found: &'static str,
    },

    #[error("no catalog entry named '{0}'")]
    UnknownCatalogEntry(String),
}

impl LedgerError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config(error) => error.severity(),
            Self::Repository(_) | Self::Content(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Repository(_) => "RUNTIME_REPOSITORY",
            Self::Config(error) => error.error_code(),
            Self::Content(_) => "RUNTIME_CONTENT",
            Self::CharacterNotFound(_) => "RUNTIME_CHARACTER_NOT_FOUND",
            Self::ClubNotFound(_) => "RUNTIME_CLUB_NOT_FOUND",
            Self::ItemNotFound(_) => "RUNTIME_ITEM_NOT_FOUND",
            Self::NotOwned { .. } => "RUNTIME_NOT_OWNED",
            Self::ItemKindMismatch { .. } => "RUNTIME_ITEM_KIND_MISMATCH",
            Self::UnknownCatalogEntry(_) => "RUNTIME_UNKNOWN_CATALOG_ENTRY",
        }
    }
}
