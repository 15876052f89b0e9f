use crate::db::{self, DbConnection};
use shared::{Animal, AnimalPayload, Cuidado, CuidadoPayload};
use thiserror::Error;
use tracing::info;

/// Outcome taxonomy for repository operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or referentially invalid input, detected before persisting
    #[error("{0}")]
    Validation(String),
    /// The operation targets an id with no stored record
    #[error("{0}")]
    NotFound(String),
    /// The durable store could not be reached or failed mid-operation
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

fn animal_not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("Animal {} não encontrado", id))
}

fn cuidado_not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("Cuidado {} não encontrado", id))
}

fn unknown_animal(id: i64) -> ServiceError {
    ServiceError::Validation(format!("animal_id {} desconhecido", id))
}

/// CRUD over animal records. Every operation runs in one storage session.
#[derive(Clone)]
pub struct AnimalService {
    db: DbConnection,
}

impl AnimalService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// List all animals in storage order, each with its care events.
    pub async fn list_all(&self) -> ServiceResult<Vec<Animal>> {
        let mut tx = self.db.session().await?;
        Ok(db::fetch_all_animals(&mut tx).await?)
    }

    /// Fetch one animal with its care events.
    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Animal> {
        let mut tx = self.db.session().await?;
        db::fetch_animal(&mut tx, id)
            .await?
            .ok_or_else(|| animal_not_found(id))
    }

    /// Persist a new animal and return it with its assigned id.
    pub async fn create(&self, payload: AnimalPayload) -> ServiceResult<Animal> {
        validate_nome(&payload.nome)?;

        let mut tx = self.db.session().await?;
        let animal = db::insert_animal(&mut tx, payload).await?;
        tx.commit().await?;

        info!("Created animal {} ({})", animal.id, animal.nome);
        Ok(animal)
    }

    /// Replace all content fields of an animal; id and care events stay.
    pub async fn update(&self, id: i64, payload: AnimalPayload) -> ServiceResult<Animal> {
        validate_nome(&payload.nome)?;

        let mut tx = self.db.session().await?;
        if !db::update_animal(&mut tx, id, &payload).await? {
            return Err(animal_not_found(id));
        }
        let animal = db::fetch_animal(&mut tx, id)
            .await?
            .ok_or_else(|| animal_not_found(id))?;
        tx.commit().await?;

        info!("Updated animal {}", id);
        Ok(animal)
    }

    /// Remove an animal and, in the same session, its care events.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let mut tx = self.db.session().await?;
        if !db::delete_animal(&mut tx, id).await? {
            return Err(animal_not_found(id));
        }
        tx.commit().await?;

        info!("Deleted animal {} and its cuidados", id);
        Ok(())
    }
}

fn validate_nome(nome: &str) -> ServiceResult<()> {
    if nome.trim().is_empty() {
        return Err(ServiceError::Validation(
            "nome não pode ser vazio".to_string(),
        ));
    }
    Ok(())
}

/// CRUD over care events. Writes re-check the animal reference inside the
/// same session as the write, so an unknown animal_id is rejected before
/// anything is persisted.
#[derive(Clone)]
pub struct CuidadoService {
    db: DbConnection,
}

impl CuidadoService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list_all(&self) -> ServiceResult<Vec<Cuidado>> {
        let mut tx = self.db.session().await?;
        Ok(db::fetch_all_cuidados(&mut tx).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Cuidado> {
        let mut tx = self.db.session().await?;
        db::fetch_cuidado(&mut tx, id)
            .await?
            .ok_or_else(|| cuidado_not_found(id))
    }

    pub async fn create(&self, payload: CuidadoPayload) -> ServiceResult<Cuidado> {
        let mut tx = self.db.session().await?;
        if !db::animal_exists(&mut tx, payload.animal_id).await? {
            return Err(unknown_animal(payload.animal_id));
        }
        let cuidado = db::insert_cuidado(&mut tx, payload).await?;
        tx.commit().await?;

        info!("Created cuidado {} for animal {}", cuidado.id, cuidado.animal_id);
        Ok(cuidado)
    }

    pub async fn update(&self, id: i64, payload: CuidadoPayload) -> ServiceResult<Cuidado> {
        let mut tx = self.db.session().await?;
        if !db::animal_exists(&mut tx, payload.animal_id).await? {
            return Err(unknown_animal(payload.animal_id));
        }
        if !db::update_cuidado(&mut tx, id, &payload).await? {
            return Err(cuidado_not_found(id));
        }
        tx.commit().await?;

        info!("Updated cuidado {}", id);
        Ok(payload.into_cuidado(id))
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let mut tx = self.db.session().await?;
        if !db::delete_cuidado(&mut tx, id).await? {
            return Err(cuidado_not_found(id));
        }
        tx.commit().await?;

        info!("Deleted cuidado {}", id);
        Ok(())
    }
}
