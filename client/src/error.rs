//! Error handling for the Bodega admin client
//!
//! `ClientError` covers talking to the inventory API; `ViewError` is what the
//! hosting view renders, with messages in English and Spanish.

use serde::Serialize;
use shared::{InvalidStockRecordError, NodeRef, SubLocationId, WarehouseId};
use thiserror::Error;

/// Errors raised while calling the inventory API
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Session expired or token rejected")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// 4xx other than 401/404: validation or conflict
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode {resource} response: {message}")]
    Decode { resource: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Whether repeating the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Server { .. } | ClientError::Transport(_)
        )
    }
}

/// Result type alias for API calls
pub type ClientResult<T> = Result<T, ClientError>;

/// Which mutation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Create,
    Rename,
    ToggleActive,
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationKind::Create => write!(f, "create"),
            MutationKind::Rename => write!(f, "rename"),
            MutationKind::ToggleActive => write!(f, "toggle"),
        }
    }
}

/// Errors surfaced to the view hosting the navigator
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Failed to load {target}: {source}")]
    FetchFailure {
        target: NodeRef,
        #[source]
        source: ClientError,
    },

    #[error("Failed to {kind} sub-location: {source}")]
    MutationFailure {
        kind: MutationKind,
        #[source]
        source: ClientError,
    },

    #[error(transparent)]
    InvalidStockRecord(#[from] InvalidStockRecordError),

    #[error("Sub-location {node} does not belong to warehouse {warehouse}")]
    ForeignSubLocation {
        node: SubLocationId,
        warehouse: WarehouseId,
    },
}

/// Renderable error description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_es: String,
    /// Whether the view should offer a retry
    pub retryable: bool,
}

impl ViewError {
    /// Describe the error for display
    pub fn detail(&self) -> ErrorDetail {
        let (code, message_en, message_es, retryable) = match self {
            ViewError::FetchFailure {
                source: ClientError::Unauthorized,
                ..
            }
            | ViewError::MutationFailure {
                source: ClientError::Unauthorized,
                ..
            } => (
                "UNAUTHORIZED",
                "Your session has expired. Please sign in again".to_string(),
                "Tu sesión ha expirado. Inicia sesión nuevamente".to_string(),
                false,
            ),
            ViewError::FetchFailure { target, source } => (
                "FETCH_FAILURE",
                format!("Could not load {}: {}", target, source),
                match target {
                    NodeRef::Root => "No se pudieron cargar las ubicaciones de la bodega".to_string(),
                    NodeRef::Node(id) => format!("No se pudo cargar la ubicación {}", id),
                },
                source.is_retryable(),
            ),
            ViewError::MutationFailure { kind, source } => (
                "MUTATION_FAILURE",
                format!("Could not {} the sub-location: {}", kind, source),
                match (kind, source) {
                    (_, ClientError::Rejected { message, .. }) => {
                        format!("La operación fue rechazada: {}", message)
                    }
                    (MutationKind::Create, _) => "Error al crear la ubicación".to_string(),
                    (MutationKind::Rename, _) => "Error al actualizar la ubicación".to_string(),
                    (MutationKind::ToggleActive, _) => {
                        "Error al cambiar el estado de la ubicación".to_string()
                    }
                },
                source.is_retryable(),
            ),
            ViewError::InvalidStockRecord(err) => (
                "INVALID_STOCK_RECORD",
                err.to_string(),
                format!(
                    "El inventario del material {} tiene una cantidad inválida",
                    err.material_id
                ),
                false,
            ),
            ViewError::ForeignSubLocation { node, warehouse } => (
                "FOREIGN_SUB_LOCATION",
                self.to_string(),
                format!("La ubicación {} no pertenece a la bodega {}", node, warehouse),
                false,
            ),
        };

        ErrorDetail {
            code: code.to_string(),
            message_en,
            message_es,
            retryable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{InvalidQuantity, MaterialId};

    #[test]
    fn test_fetch_failure_detail_is_retryable() {
        let err = ViewError::FetchFailure {
            target: NodeRef::Node(SubLocationId(4)),
            source: ClientError::Server {
                status: 502,
                message: "bad gateway".to_string(),
            },
        };
        let detail = err.detail();

        assert_eq!(detail.code, "FETCH_FAILURE");
        assert!(detail.retryable);
        assert!(detail.message_es.contains('4'));
    }

    #[test]
    fn test_local_and_decode_failures_are_not_retryable() {
        let blank_name = ViewError::MutationFailure {
            kind: MutationKind::Create,
            source: ClientError::Validation("El nombre es obligatorio".to_string()),
        };
        let garbled = ViewError::FetchFailure {
            target: NodeRef::Root,
            source: ClientError::Decode {
                resource: "stock".to_string(),
                message: "expected value".to_string(),
            },
        };
        let rejected = ViewError::MutationFailure {
            kind: MutationKind::Rename,
            source: ClientError::Rejected {
                status: 400,
                message: "nombre: ya existe".to_string(),
            },
        };

        assert!(!blank_name.detail().retryable);
        assert!(!garbled.detail().retryable);
        assert!(!rejected.detail().retryable);
        assert_eq!(garbled.detail().code, "FETCH_FAILURE");
    }

    #[test]
    fn test_unauthorized_is_reported_as_session_problem() {
        let err = ViewError::MutationFailure {
            kind: MutationKind::Create,
            source: ClientError::Unauthorized,
        };
        assert_eq!(err.detail().code, "UNAUTHORIZED");
        assert!(!err.detail().retryable);
    }

    #[test]
    fn test_rejected_mutation_shows_server_message() {
        let err = ViewError::MutationFailure {
            kind: MutationKind::Rename,
            source: ClientError::Rejected {
                status: 400,
                message: "nombre: ya existe".to_string(),
            },
        };
        assert!(err.detail().message_es.contains("ya existe"));
    }

    #[test]
    fn test_invalid_stock_record_detail() {
        let err = ViewError::from(InvalidStockRecordError {
            material_id: MaterialId(9),
            reason: InvalidQuantity::NotNumeric("x".to_string()),
        });
        let detail = err.detail();
        assert_eq!(detail.code, "INVALID_STOCK_RECORD");
        assert!(!detail.retryable);
    }

    #[test]
    fn test_retryable_client_errors() {
        assert!(ClientError::Server { status: 500, message: String::new() }.is_retryable());
        assert!(!ClientError::Unauthorized.is_retryable());
        assert!(!ClientError::Validation("x".to_string()).is_retryable());
    }
}
