use anyhow::Result;
use chrono::NaiveDate;
use shared::{Animal, AnimalPayload, Cuidado, CuidadoPayload};
use sqlx::sqlite::SqliteRow;
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::sync::Arc;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:zoo.db";

/// DbConnection manages the storage lifecycle: pool ownership, schema
/// setup and per-operation sessions.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        // Connect to the database
        let pool = SqlitePool::connect(url).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize the standard database
    pub async fn init() -> Result<Self> {
        Self::new(DATABASE_URL).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema. Idempotent: running against an
    /// already-initialized store is a no-op.
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS animal (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nome TEXT NOT NULL,
                descricao TEXT NOT NULL,
                data_nascimento DATE NOT NULL,
                especie TEXT NOT NULL,
                habitat TEXT NOT NULL,
                pais_origem TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cuidado (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nome TEXT NOT NULL,
                descricao TEXT NOT NULL,
                data DATE NOT NULL,
                animal_id INTEGER NOT NULL REFERENCES animal(id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Open a scoped session for one operation. Commit on success; if the
    /// transaction is dropped on any other exit path it rolls back and the
    /// connection returns to the pool.
    pub async fn session(&self) -> Result<Transaction<'_, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }
}

fn row_to_cuidado(row: &SqliteRow) -> Cuidado {
    Cuidado {
        id: row.get("id"),
        nome: row.get("nome"),
        descricao: row.get("descricao"),
        data: row.get::<NaiveDate, _>("data"),
        animal_id: row.get("animal_id"),
    }
}

fn row_to_animal(row: &SqliteRow) -> Animal {
    Animal {
        id: row.get("id"),
        nome: row.get("nome"),
        descricao: row.get("descricao"),
        data_nascimento: row.get::<NaiveDate, _>("data_nascimento"),
        especie: row.get("especie"),
        habitat: row.get("habitat"),
        pais_origem: row.get("pais_origem"),
        cuidados: Vec::new(),
    }
}

/// Insert a new animal and return the stored record with its assigned id.
pub async fn insert_animal(
    conn: &mut SqliteConnection,
    payload: AnimalPayload,
) -> Result<Animal, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO animal (nome, descricao, data_nascimento, especie, habitat, pais_origem) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&payload.nome)
    .bind(&payload.descricao)
    .bind(payload.data_nascimento)
    .bind(&payload.especie)
    .bind(&payload.habitat)
    .bind(&payload.pais_origem)
    .execute(&mut *conn)
    .await?;

    Ok(payload.into_animal(result.last_insert_rowid()))
}

/// Fetch one animal with its care events, or None if the id is unknown.
pub async fn fetch_animal(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Animal>, sqlx::Error> {
    let row = sqlx::query("SELECT * FROM animal WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => {
            let mut animal = row_to_animal(&row);
            animal.cuidados = fetch_cuidados_for(conn, id).await?;
            Ok(Some(animal))
        }
        None => Ok(None),
    }
}

/// Fetch all animals in storage order, each with its care events.
pub async fn fetch_all_animals(conn: &mut SqliteConnection) -> Result<Vec<Animal>, sqlx::Error> {
    let rows = sqlx::query("SELECT * FROM animal")
        .fetch_all(&mut *conn)
        .await?;
    let mut animais: Vec<Animal> = rows.iter().map(row_to_animal).collect();

    let cuidado_rows = sqlx::query("SELECT * FROM cuidado ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;
    for row in &cuidado_rows {
        let cuidado = row_to_cuidado(row);
        if let Some(animal) = animais.iter_mut().find(|a| a.id == cuidado.animal_id) {
            animal.cuidados.push(cuidado);
        }
    }

    Ok(animais)
}

/// Replace all content fields of an animal. Returns false if the id is
/// unknown; the id and the animal's care events are left untouched.
pub async fn update_animal(
    conn: &mut SqliteConnection,
    id: i64,
    payload: &AnimalPayload,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE animal SET nome = ?, descricao = ?, data_nascimento = ?, \
         especie = ?, habitat = ?, pais_origem = ? WHERE id = ?",
    )
    .bind(&payload.nome)
    .bind(&payload.descricao)
    .bind(payload.data_nascimento)
    .bind(&payload.especie)
    .bind(&payload.habitat)
    .bind(&payload.pais_origem)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete an animal together with its care events. Returns false if the
/// id is unknown.
pub async fn delete_animal(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM animal WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query("DELETE FROM cuidado WHERE animal_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(true)
}

/// Check whether an animal id references a stored record.
pub async fn animal_exists(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT 1 FROM animal WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

async fn fetch_cuidados_for(
    conn: &mut SqliteConnection,
    animal_id: i64,
) -> Result<Vec<Cuidado>, sqlx::Error> {
    let rows = sqlx::query("SELECT * FROM cuidado WHERE animal_id = ? ORDER BY id")
        .bind(animal_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows.iter().map(row_to_cuidado).collect())
}

/// Insert a new care event and return the stored record with its assigned
/// id. The caller is responsible for having checked the animal reference
/// inside the same session.
pub async fn insert_cuidado(
    conn: &mut SqliteConnection,
    payload: CuidadoPayload,
) -> Result<Cuidado, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO cuidado (nome, descricao, data, animal_id) VALUES (?, ?, ?, ?)",
    )
    .bind(&payload.nome)
    .bind(&payload.descricao)
    .bind(payload.data)
    .bind(payload.animal_id)
    .execute(&mut *conn)
    .await?;

    Ok(payload.into_cuidado(result.last_insert_rowid()))
}

/// Fetch one care event, or None if the id is unknown.
pub async fn fetch_cuidado(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Cuidado>, sqlx::Error> {
    let row = sqlx::query("SELECT * FROM cuidado WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.as_ref().map(row_to_cuidado))
}

/// Fetch all care events in storage order.
pub async fn fetch_all_cuidados(conn: &mut SqliteConnection) -> Result<Vec<Cuidado>, sqlx::Error> {
    let rows = sqlx::query("SELECT * FROM cuidado")
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows.iter().map(row_to_cuidado).collect())
}

/// Replace all content fields of a care event. Returns false if the id is
/// unknown.
pub async fn update_cuidado(
    conn: &mut SqliteConnection,
    id: i64,
    payload: &CuidadoPayload,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE cuidado SET nome = ?, descricao = ?, data = ?, animal_id = ? WHERE id = ?",
    )
    .bind(&payload.nome)
    .bind(&payload.descricao)
    .bind(payload.data)
    .bind(payload.animal_id)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a care event. Returns false if the id is unknown.
pub async fn delete_cuidado(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cuidado WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
