// src/common/serde_utils.rs

//! Deserializadores tolerantes para os dados gravados pelo console.
//!
//! As coleções antigas guardam datas como `"2025-03-05"`, como timestamp
//! completo (`"2025-03-05T14:00:00.000Z"`) ou como string vazia quando o
//! campo do formulário ficou em branco.

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};
use serde::{
    de::{value::StrDeserializer, DeserializeOwned, IntoDeserializer},
    Deserialize, Deserializer, Serialize, Serializer,
};

pub(crate) fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Data de pagamento como foi gravada: dia de calendário puro ou instante
/// completo. Instantes só viram dia quando se escolhe o fuso.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarDate {
    Day(NaiveDate),
    Instant(DateTime<Utc>),
}

impl CalendarDate {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(CalendarDate::Day(day));
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| CalendarDate::Instant(dt.with_timezone(&Utc)))
    }

    /// Dia no calendário de `offset`; datas simples não são deslocadas.
    pub fn local_date(&self, offset: FixedOffset) -> NaiveDate {
        match self {
            CalendarDate::Day(day) => *day,
            CalendarDate::Instant(at) => at.with_timezone(&offset).date_naive(),
        }
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(day: NaiveDate) -> Self {
        CalendarDate::Day(day)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CalendarDate::Day(day) => serializer.collect_str(&day.format("%Y-%m-%d")),
            CalendarDate::Instant(at) => {
                serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
        }
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CalendarDate::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("data inválida: {raw:?}")))
    }
}

/// Data opcional: `null`, ausente ou `""` viram `None`.
pub fn optional_calendar_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_calendar_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("data inválida: {s:?}"))),
    }
}

/// Filtro de listagem: ausente, `""` ou `"all"` significam "sem filtro".
pub fn all_or<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => {
            let de: StrDeserializer<'_, D::Error> = value.into_deserializer();
            T::deserialize(de).map(Some)
        }
    }
}
