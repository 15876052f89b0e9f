use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A zoo animal together with the care events recorded for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    /// Assigned by the server on insert, never changes afterwards
    pub id: i64,
    /// Animal's name (never empty)
    pub nome: String,
    /// Free text description
    pub descricao: String,
    /// Birth date
    pub data_nascimento: NaiveDate,
    /// Species
    pub especie: String,
    /// Habitat category
    pub habitat: String,
    /// Country of origin
    pub pais_origem: String,
    /// Care events owned by this animal, derived from storage (not a column)
    #[serde(default)]
    pub cuidados: Vec<Cuidado>,
}

/// A single care event, owned by exactly one animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cuidado {
    /// Assigned by the server on insert
    pub id: i64,
    /// Short label for the care action
    pub nome: String,
    /// Free text description
    pub descricao: String,
    /// Date the care took place
    pub data: NaiveDate,
    /// Id of the owning animal
    pub animal_id: i64,
}

/// Request body for creating or fully replacing an animal.
/// Carries no id; the server assigns one on create and keeps it on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalPayload {
    pub nome: String,
    pub descricao: String,
    pub data_nascimento: NaiveDate,
    pub especie: String,
    pub habitat: String,
    pub pais_origem: String,
}

impl AnimalPayload {
    /// Build the stored record for this payload under the given id.
    /// A fresh record starts with no care events.
    pub fn into_animal(self, id: i64) -> Animal {
        Animal {
            id,
            nome: self.nome,
            descricao: self.descricao,
            data_nascimento: self.data_nascimento,
            especie: self.especie,
            habitat: self.habitat,
            pais_origem: self.pais_origem,
            cuidados: Vec::new(),
        }
    }
}

/// Request body for creating or fully replacing a care event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuidadoPayload {
    pub nome: String,
    pub descricao: String,
    pub data: NaiveDate,
    pub animal_id: i64,
}

impl CuidadoPayload {
    /// Build the stored record for this payload under the given id.
    pub fn into_cuidado(self, id: i64) -> Cuidado {
        Cuidado {
            id,
            nome: self.nome,
            descricao: self.descricao,
            data: self.data,
            animal_id: self.animal_id,
        }
    }
}

/// Response for animal create/update: confirmation message plus the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalResponse {
    pub mensagem: String,
    pub animal: Animal,
}

/// Response for cuidado create/update: confirmation message plus the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuidadoResponse {
    pub mensagem: String,
    pub cuidado: Cuidado,
}

/// Plain message body used for the liveness route, deletes and errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mensagem {
    pub mensagem: String,
}

impl Mensagem {
    pub fn new(mensagem: impl Into<String>) -> Self {
        Self {
            mensagem: mensagem.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leo_payload() -> AnimalPayload {
        AnimalPayload {
            nome: "Leo".to_string(),
            descricao: "lion".to_string(),
            data_nascimento: NaiveDate::from_ymd_opt(2018, 5, 1).unwrap(),
            especie: "Panthera leo".to_string(),
            habitat: "savanna".to_string(),
            pais_origem: "Kenya".to_string(),
        }
    }

    #[test]
    fn test_into_animal_assigns_id_and_starts_without_cuidados() {
        let animal = leo_payload().into_animal(1);

        assert_eq!(animal.id, 1);
        assert_eq!(animal.nome, "Leo");
        assert_eq!(animal.especie, "Panthera leo");
        assert!(animal.cuidados.is_empty());
    }

    #[test]
    fn test_animal_payload_deserializes_from_api_body() {
        let body = r#"{
            "nome": "Leo",
            "descricao": "lion",
            "data_nascimento": "2018-05-01",
            "especie": "Panthera leo",
            "habitat": "savanna",
            "pais_origem": "Kenya"
        }"#;

        let payload: AnimalPayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload, leo_payload());
    }

    #[test]
    fn test_animal_payload_rejects_invalid_date() {
        // 2018-02-30 is not a real calendar date
        let body = r#"{
            "nome": "Leo",
            "descricao": "lion",
            "data_nascimento": "2018-02-30",
            "especie": "Panthera leo",
            "habitat": "savanna",
            "pais_origem": "Kenya"
        }"#;

        assert!(serde_json::from_str::<AnimalPayload>(body).is_err());
    }

    #[test]
    fn test_animal_payload_rejects_missing_field() {
        let body = r#"{"nome": "Leo", "descricao": "lion"}"#;
        assert!(serde_json::from_str::<AnimalPayload>(body).is_err());
    }

    #[test]
    fn test_into_cuidado_keeps_owning_animal() {
        let payload = CuidadoPayload {
            nome: "feeding".to_string(),
            descricao: "raw meat".to_string(),
            data: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            animal_id: 1,
        };

        let cuidado = payload.into_cuidado(7);
        assert_eq!(cuidado.id, 7);
        assert_eq!(cuidado.animal_id, 1);
    }

    #[test]
    fn test_animal_serializes_date_as_iso_string() {
        let animal = leo_payload().into_animal(1);
        let json = serde_json::to_value(&animal).unwrap();

        assert_eq!(json["data_nascimento"], "2018-05-01");
        assert_eq!(json["cuidados"], serde_json::json!([]));
    }
}
