use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::{AnimalPayload, AnimalResponse, CuidadoPayload, CuidadoResponse, Mensagem};
use tracing::info;

use crate::domain::{AnimalService, CuidadoService, ServiceError};

/// Application state containing both repository services
#[derive(Clone)]
pub struct AppState {
    pub animais: AnimalService,
    pub cuidados: CuidadoService,
}

impl AppState {
    pub fn new(animais: AnimalService, cuidados: CuidadoService) -> Self {
        Self { animais, cuidados }
    }
}

/// Translate repository outcomes into HTTP responses. Absence maps to 404
/// rather than a success-shaped body; invalid input maps to 400.
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, mensagem) = match self {
            ServiceError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServiceError::Storage(e) => {
                tracing::error!("Storage failure: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro ao acessar o banco de dados".to_string(),
                )
            }
        };
        (status, Json(Mensagem::new(mensagem))).into_response()
    }
}

/// Axum handler function for GET /
pub async fn home() -> impl IntoResponse {
    Json(Mensagem::new("API do Zoológico funcionando!"))
}

/// Axum handler function for GET /animais
pub async fn list_animais(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("GET /animais");
    Ok(Json(state.animais.list_all().await?))
}

/// Axum handler function for GET /animais/:id
pub async fn get_animal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("GET /animais/{}", id);
    Ok(Json(state.animais.get_by_id(id).await?))
}

/// Axum handler function for POST /animais
pub async fn create_animal(
    State(state): State<AppState>,
    Json(payload): Json<AnimalPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("POST /animais - nome: {}", payload.nome);

    let animal = state.animais.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(AnimalResponse {
            mensagem: "Animal criado com sucesso".to_string(),
            animal,
        }),
    ))
}

/// Axum handler function for PUT /animais/:id
pub async fn update_animal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AnimalPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("PUT /animais/{}", id);

    let animal = state.animais.update(id, payload).await?;
    Ok(Json(AnimalResponse {
        mensagem: "Animal atualizado com sucesso".to_string(),
        animal,
    }))
}

/// Axum handler function for DELETE /animais/:id
pub async fn delete_animal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("DELETE /animais/{}", id);

    state.animais.delete(id).await?;
    Ok(Json(Mensagem::new("Animal removido com sucesso")))
}

/// Axum handler function for GET /cuidados
pub async fn list_cuidados(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("GET /cuidados");
    Ok(Json(state.cuidados.list_all().await?))
}

/// Axum handler function for GET /cuidados/:id
pub async fn get_cuidado(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("GET /cuidados/{}", id);
    Ok(Json(state.cuidados.get_by_id(id).await?))
}

/// Axum handler function for POST /cuidados
pub async fn create_cuidado(
    State(state): State<AppState>,
    Json(payload): Json<CuidadoPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("POST /cuidados - animal_id: {}", payload.animal_id);

    let cuidado = state.cuidados.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CuidadoResponse {
            mensagem: "Cuidado criado com sucesso".to_string(),
            cuidado,
        }),
    ))
}

/// Axum handler function for PUT /cuidados/:id
pub async fn update_cuidado(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CuidadoPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("PUT /cuidados/{}", id);

    let cuidado = state.cuidados.update(id, payload).await?;
    Ok(Json(CuidadoResponse {
        mensagem: "Cuidado atualizado com sucesso".to_string(),
        cuidado,
    }))
}

/// Axum handler function for DELETE /cuidados/:id
pub async fn delete_cuidado(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("DELETE /cuidados/{}", id);

    state.cuidados.delete(id).await?;
    Ok(Json(Mensagem::new("Cuidado removido com sucesso")))
}
