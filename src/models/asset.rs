// src/models/asset.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::common::error::AppError;

// --- Ativo (imóvel) ---
// Os campos NUMERIC viajam como string decimal no JSON.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: Uuid,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    #[schema(example = "Residential")]
    pub asset_type: String,
    #[schema(example = "Available")]
    pub status: String,
    #[schema(example = "For Sale")]
    pub listing_type: String,
    pub is_featured: bool,

    pub description: Option<String>,
    pub acquisition_date: Option<DateTime<Utc>>,
    pub purchase_price: Option<Decimal>,
    pub current_valuation: Option<Decimal>,

    pub address: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,

    pub land_size: Option<Decimal>,
    pub building_size: Option<Decimal>,
    pub units: Option<i32>,
    pub floors: Option<i32>,
    pub year_built: Option<i32>,
    pub condition_rating: Option<i32>,

    pub rental_income: Option<Decimal>,
    pub operating_cost: Option<Decimal>,

    // [{ url, type, name }]
    pub media: Value,
    pub attachments: Value,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
}

// Entrada de mídia/anexo, usada apenas para documentação.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MediaItem {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: Option<String>,
}

// Como cada campo vindo do cliente deve ser convertido
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    RequiredText,
    Text,
    Boolean,
    Timestamp,
    Decimal,
    Integer,
    JsonArray,
}

#[derive(Debug)]
pub struct AssetField {
    pub key: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

const fn field(key: &'static str, column: &'static str, kind: FieldKind) -> AssetField {
    AssetField { key, column, kind }
}

/// Campos graváveis pelo cliente. `id`, `createdAt`, `updatedAt` e
/// `isDeleted` ficam de fora e são descartados se enviados.
pub const ASSET_FIELDS: &[AssetField] = &[
    field("name", "name", FieldKind::RequiredText),
    field("type", "type", FieldKind::RequiredText),
    field("status", "status", FieldKind::RequiredText),
    field("listingType", "listing_type", FieldKind::RequiredText),
    field("isFeatured", "is_featured", FieldKind::Boolean),
    field("description", "description", FieldKind::Text),
    field("acquisitionDate", "acquisition_date", FieldKind::Timestamp),
    field("purchasePrice", "purchase_price", FieldKind::Decimal),
    field("currentValuation", "current_valuation", FieldKind::Decimal),
    field("address", "address", FieldKind::Text),
    field("latitude", "latitude", FieldKind::Decimal),
    field("longitude", "longitude", FieldKind::Decimal),
    field("city", "city", FieldKind::Text),
    field("state", "state", FieldKind::Text),
    field("country", "country", FieldKind::Text),
    field("landSize", "land_size", FieldKind::Decimal),
    field("buildingSize", "building_size", FieldKind::Decimal),
    field("units", "units", FieldKind::Integer),
    field("floors", "floors", FieldKind::Integer),
    field("yearBuilt", "year_built", FieldKind::Integer),
    field("conditionRating", "condition_rating", FieldKind::Integer),
    field("rentalIncome", "rental_income", FieldKind::Decimal),
    field("operatingCost", "operating_cost", FieldKind::Decimal),
    field("media", "media", FieldKind::JsonArray),
    field("attachments", "attachments", FieldKind::JsonArray),
];

// Valor já convertido, pronto para o bind no SQL
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(Option<String>),
    Boolean(bool),
    Timestamp(Option<DateTime<Utc>>),
    Decimal(Option<Decimal>),
    Integer(Option<i32>),
    Json(Value),
}

/// Alterações de um ativo, já saneadas e convertidas coluna a coluna.
#[derive(Debug, Default)]
pub struct AssetChanges {
    values: Vec<(&'static AssetField, ColumnValue)>,
}

impl AssetChanges {
    /// Converte o corpo JSON do cliente. Chaves desconhecidas são ignoradas;
    /// qualquer valor inconvertível vira erro de validação no campo.
    pub fn from_json(body: Value) -> Result<Self, AppError> {
        let Value::Object(map) = body else {
            return Err(AppError::MissingFields("Request body must be a JSON object"));
        };
        Self::from_map(map)
    }

    fn from_map(mut map: Map<String, Value>) -> Result<Self, AppError> {
        let mut values = Vec::new();
        let mut errors = ValidationErrors::new();

        for field in ASSET_FIELDS {
            let Some(raw) = map.remove(field.key) else {
                continue;
            };
            match coerce(field, raw) {
                Ok(value) => values.push((field, value)),
                Err(err) => errors.add(field.key, err),
            }
        }

        if !errors.is_empty() {
            return Err(AppError::ValidationError(errors));
        }
        Ok(Self { values })
    }

    /// Criação exige `name` e `type`.
    pub fn require_for_create(&self) -> Result<(), AppError> {
        if self.get("name").is_none() || self.get("type").is_none() {
            return Err(AppError::MissingFields("Name and Type are required"));
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ColumnValue> {
        self.values
            .iter()
            .find(|(field, _)| field.key == key)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // Nomes dos campos alterados (sem os valores), para a auditoria
    pub fn changed_fields(&self) -> Vec<&'static str> {
        self.values.iter().map(|(field, _)| field.key).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ColumnValue)> + '_ {
        self.values.iter().map(|(field, value)| (field.column, value))
    }
}

fn invalid(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn is_blank(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn coerce(field: &AssetField, raw: Value) -> Result<ColumnValue, ValidationError> {
    match field.kind {
        FieldKind::RequiredText => match raw {
            Value::String(s) if !s.trim().is_empty() => Ok(ColumnValue::Text(Some(s))),
            _ => Err(invalid(
                "required",
                format!("{} must be a non-empty string", field.key),
            )),
        },
        FieldKind::Text => match raw {
            Value::Null => Ok(ColumnValue::Text(None)),
            Value::String(s) => Ok(ColumnValue::Text(Some(s))),
            Value::Number(n) => Ok(ColumnValue::Text(Some(n.to_string()))),
            _ => Err(invalid("text", format!("{} must be a string", field.key))),
        },
        FieldKind::Boolean => match raw {
            Value::Null => Ok(ColumnValue::Boolean(false)),
            Value::Bool(b) => Ok(ColumnValue::Boolean(b)),
            Value::String(s) if s == "true" || s == "false" => Ok(ColumnValue::Boolean(s == "true")),
            _ => Err(invalid("boolean", format!("{} must be a boolean", field.key))),
        },
        FieldKind::Timestamp => {
            if is_blank(&raw) {
                return Ok(ColumnValue::Timestamp(None));
            }
            raw.as_str()
                .and_then(parse_timestamp)
                .map(|ts| ColumnValue::Timestamp(Some(ts)))
                .ok_or_else(|| invalid("date", format!("{} must be a date", field.key)))
        }
        FieldKind::Decimal => {
            if is_blank(&raw) {
                return Ok(ColumnValue::Decimal(None));
            }
            parse_decimal(&raw)
                .map(|d| ColumnValue::Decimal(Some(d)))
                .ok_or_else(|| invalid("numeric", format!("{} must be numeric", field.key)))
        }
        FieldKind::Integer => {
            if is_blank(&raw) {
                return Ok(ColumnValue::Integer(None));
            }
            parse_integer(&raw)
                .map(|i| ColumnValue::Integer(Some(i)))
                .ok_or_else(|| invalid("integer", format!("{} must be a whole number", field.key)))
        }
        FieldKind::JsonArray => match raw {
            Value::Null => Ok(ColumnValue::Json(Value::Array(Vec::new()))),
            Value::Array(items) => Ok(ColumnValue::Json(Value::Array(items))),
            _ => Err(invalid("array", format!("{} must be an array", field.key))),
        },
    }
}

fn parse_decimal(raw: &Value) -> Option<Decimal> {
    let text = match raw {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn parse_integer(raw: &Value) -> Option<i32> {
    match raw {
        Value::Number(n) => n.as_i64().and_then(|i| i32::try_from(i).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

// --- Filtros de listagem ---
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AssetListQuery {
    /// Igualdade exata; "All" desativa o filtro
    pub status: Option<String>,
    /// Igualdade exata; "All" desativa o filtro
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    /// Busca sem distinção de maiúsculas em nome, endereço ou cidade
    pub search: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct AssetFilter {
    pub status: Option<String>,
    pub asset_type: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

fn active_filter(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "All")
}

impl From<AssetListQuery> for AssetFilter {
    fn from(query: AssetListQuery) -> Self {
        Self {
            status: active_filter(query.status),
            asset_type: active_filter(query.asset_type),
            search: query.search.filter(|s| !s.trim().is_empty()),
            limit: None,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct GetAssetQuery {
    /// Apenas administradores: retorna também ativos excluídos logicamente
    pub include_deleted: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteAssetQuery {
    /// "true" para exclusão definitiva (somente admin)
    pub force: Option<String>,
}

impl DeleteAssetQuery {
    pub fn is_forced(&self) -> bool {
        self.force.as_deref() == Some("true")
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    #[test]
    fn empty_and_null_numeric_fields_become_null() {
        let changes = AssetChanges::from_json(json!({
            "purchasePrice": "",
            "currentValuation": null,
            "rentalIncome": "   ",
            "yearBuilt": "",
            "units": null,
        }))
        .unwrap();

        assert_eq!(changes.get("purchasePrice"), Some(&ColumnValue::Decimal(None)));
        assert_eq!(changes.get("currentValuation"), Some(&ColumnValue::Decimal(None)));
        assert_eq!(changes.get("rentalIncome"), Some(&ColumnValue::Decimal(None)));
        assert_eq!(changes.get("yearBuilt"), Some(&ColumnValue::Integer(None)));
        assert_eq!(changes.get("units"), Some(&ColumnValue::Integer(None)));
    }

    #[test]
    fn numeric_strings_and_numbers_are_coerced() {
        let changes = AssetChanges::from_json(json!({
            "purchasePrice": "125000000.50",
            "latitude": 6.4281,
            "landSize": "1.2e3",
            "floors": "3",
            "units": 12,
        }))
        .unwrap();

        assert_eq!(
            changes.get("purchasePrice"),
            Some(&ColumnValue::Decimal(Some(dec("125000000.50"))))
        );
        assert_eq!(changes.get("latitude"), Some(&ColumnValue::Decimal(Some(dec("6.4281")))));
        assert_eq!(changes.get("landSize"), Some(&ColumnValue::Decimal(Some(dec("1200")))));
        assert_eq!(changes.get("floors"), Some(&ColumnValue::Integer(Some(3))));
        assert_eq!(changes.get("units"), Some(&ColumnValue::Integer(Some(12))));
    }

    #[test]
    fn garbage_numbers_are_rejected_per_field() {
        let err = AssetChanges::from_json(json!({
            "purchasePrice": "NaN-ish",
            "floors": 2.5,
            "name": "Ok",
        }))
        .unwrap_err();

        match err {
            AppError::ValidationError(errors) => {
                let fields = errors.field_errors();
                assert!(fields.contains_key("purchasePrice"));
                assert!(fields.contains_key("floors"));
                assert!(!fields.contains_key("name"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn server_managed_and_unknown_keys_are_dropped() {
        let changes = AssetChanges::from_json(json!({
            "id": "7f1c7a4e-1111-4c3c-9e4a-000000000000",
            "createdAt": "2020-01-01T00:00:00Z",
            "updatedAt": "2020-01-01T00:00:00Z",
            "isDeleted": true,
            "somethingElse": 1,
            "city": "Lagos",
        }))
        .unwrap();

        assert_eq!(changes.changed_fields(), vec!["city"]);
    }

    #[test]
    fn create_requires_name_and_type() {
        let changes = AssetChanges::from_json(json!({ "name": "Lekki Villa" })).unwrap();
        assert!(matches!(
            changes.require_for_create(),
            Err(AppError::MissingFields(_))
        ));

        let changes = AssetChanges::from_json(json!({
            "name": "Lekki Villa",
            "type": "Residential",
        }))
        .unwrap();
        assert!(changes.require_for_create().is_ok());
    }

    #[test]
    fn blank_required_text_is_rejected() {
        let err = AssetChanges::from_json(json!({ "name": "  " })).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn dates_accept_rfc3339_and_plain_days() {
        let changes = AssetChanges::from_json(json!({ "acquisitionDate": "2021-03-04" })).unwrap();
        let Some(ColumnValue::Timestamp(Some(ts))) = changes.get("acquisitionDate") else {
            panic!("expected a timestamp");
        };
        assert_eq!(ts.to_rfc3339(), "2021-03-04T00:00:00+00:00");

        let changes =
            AssetChanges::from_json(json!({ "acquisitionDate": "2021-03-04T10:00:00+01:00" }))
                .unwrap();
        let Some(ColumnValue::Timestamp(Some(ts))) = changes.get("acquisitionDate") else {
            panic!("expected a timestamp");
        };
        assert_eq!(ts.to_rfc3339(), "2021-03-04T09:00:00+00:00");
    }

    #[test]
    fn media_null_resets_to_empty_list() {
        let changes = AssetChanges::from_json(json!({ "media": null })).unwrap();
        assert_eq!(changes.get("media"), Some(&ColumnValue::Json(json!([]))));

        let err = AssetChanges::from_json(json!({ "attachments": "doc.pdf" })).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        assert!(matches!(
            AssetChanges::from_json(json!(["name"])),
            Err(AppError::MissingFields(_))
        ));
    }

    #[test]
    fn all_is_not_a_filter() {
        let filter = AssetFilter::from(AssetListQuery {
            status: Some("All".into()),
            asset_type: Some("Commercial".into()),
            search: Some(" ".into()),
        });
        assert_eq!(filter.status, None);
        assert_eq!(filter.asset_type.as_deref(), Some("Commercial"));
        assert_eq!(filter.search, None);
    }

    #[test]
    fn only_literal_true_forces_deletion() {
        assert!(DeleteAssetQuery { force: Some("true".into()) }.is_forced());
        assert!(!DeleteAssetQuery { force: Some("1".into()) }.is_forced());
        assert!(!DeleteAssetQuery { force: None }.is_forced());
    }
}
