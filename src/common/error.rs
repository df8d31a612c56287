use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Nenhuma carga selecionada")]
    NoLoadsSelected,

    #[error("Veículo {0} não encontrado")]
    VehicleNotFound(Uuid),

    #[error("Veículo {0} está inativo")]
    VehicleInactive(Uuid),

    #[error("Carga {0} não encontrada")]
    LoadNotFound(Uuid),

    #[error("Lançamento {0} não encontrado")]
    EntryNotFound(Uuid),

    #[error("Lançamento {0} já foi excluído")]
    EntryAlreadyDeleted(Uuid),

    #[error("Parâmetro {0} não encontrado")]
    ParameterNotFound(Uuid),

    #[error("Edição sem motivo")]
    MissingJustificationOnEdit,

    #[error("Exclusão sem motivo")]
    MissingDeletionReason,

    #[error("Alteração de carga sem motivo")]
    MissingEditReason,

    #[error("Sem faixa de preço para {city} / {vehicle_type}")]
    MissingPricingTier { city: String, vehicle_type: String },

    #[error("Já existe tabela de taxas para a cidade {0}")]
    DuplicateFeeSchedule(String),

    #[error("Já existe faixa de preço para {city} / {vehicle_type}")]
    DuplicatePricingTier { city: String, vehicle_type: String },

    #[error("Cargas lançadas por outro operador durante o cálculo")]
    LoadsClaimedConcurrently,

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::NoLoadsSelected => (
                StatusCode::BAD_REQUEST,
                "Selecione ao menos uma carga para calcular o frete.".to_string(),
            ),
            AppError::VehicleNotFound(_)
            | AppError::LoadNotFound(_)
            | AppError::EntryNotFound(_)
            | AppError::ParameterNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::VehicleInactive(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Apenas veículos ativos podem receber lançamentos.".to_string(),
            ),
            AppError::EntryAlreadyDeleted(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::MissingJustificationOnEdit => (
                StatusCode::BAD_REQUEST,
                "Informe o motivo da alteração do lançamento.".to_string(),
            ),
            AppError::MissingDeletionReason => (
                StatusCode::BAD_REQUEST,
                "Informe o motivo da exclusão.".to_string(),
            ),
            AppError::MissingEditReason => (
                StatusCode::BAD_REQUEST,
                "Informe o motivo da alteração da carga.".to_string(),
            ),
            AppError::MissingPricingTier { city, vehicle_type } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Não há valor cadastrado para {vehicle_type} em {city} (nem em \"Qualquer\")."),
            ),
            AppError::DuplicateFeeSchedule(_) | AppError::DuplicatePricingTier { .. } => {
                (StatusCode::CONFLICT, self.to_string())
            }
            AppError::LoadsClaimedConcurrently => (
                StatusCode::CONFLICT,
                "Uma ou mais cargas acabaram de ser lançadas. Recalcule o lançamento.".to_string(),
            ),

            // Banco e erros inesperados viram 500; o detalhe fica só no log.
            e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_errors_map_to_client_statuses() {
        let cases = [
            (AppError::NoLoadsSelected, StatusCode::BAD_REQUEST),
            (AppError::MissingJustificationOnEdit, StatusCode::BAD_REQUEST),
            (AppError::MissingDeletionReason, StatusCode::BAD_REQUEST),
            (AppError::EntryNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (AppError::EntryAlreadyDeleted(Uuid::nil()), StatusCode::CONFLICT),
            (AppError::VehicleInactive(Uuid::nil()), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::LoadsClaimedConcurrently, StatusCode::CONFLICT),
            (
                AppError::DuplicatePricingTier { city: "Betim".into(), vehicle_type: "Toco".into() },
                StatusCode::CONFLICT,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn database_errors_are_hidden_behind_500() {
        let response = AppError::DatabaseError(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
