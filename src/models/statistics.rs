// src/models/statistics.rs

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const MONTH_NAMES: [&str; 12] = [
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio",
    "Julio", "Agosto", "Septiembre", "Octubre", "Noviembre", "Diciembre",
];

// Abreviações do es-ES ("sept" inclusive)
pub const SHORT_MONTH_NAMES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

// 1. Período (mês 0-11 + ano), nunca persistido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub month: u32,
    pub year: i32,
}

impl Period {
    /// Retorna `None` se o mês estiver fora de 0..=11.
    pub fn new(month: u32, year: i32) -> Option<Self> {
        (month < 12).then_some(Self { month, year })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self { month: date.month0(), year: date.year() }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month0() == self.month && date.year() == self.year
    }

    /// Mês anterior; janeiro volta para dezembro do ano anterior.
    pub fn previous(&self) -> Self {
        if self.month == 0 {
            Self { month: 11, year: self.year - 1 }
        } else {
            Self { month: self.month - 1, year: self.year }
        }
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month as usize % 12]
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

// 2. Barra do gráfico "Órdenes por día"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartEntry {
    pub day: String,
    pub sales: u32,
}

// 3. Indicadores de um período
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub total_sales: Decimal,
    pub total_orders: usize,
    pub completed_orders: usize,
    pub avg_order_value: Decimal,
    pub chart_data: Vec<ChartEntry>,
    pub orders_per_day: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeltaBadge {
    pub label: String,
    pub trend: Trend,
}

// Variação percentual; sem badge quando a variação é exatamente zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricDelta {
    pub change: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<DeltaBadge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodDeltas {
    pub total_orders: MetricDelta,
    pub orders_per_day: MetricDelta,
    pub completed_orders: MetricDelta,
    pub avg_order_value: MetricDelta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodView {
    pub month: u32,
    pub year: i32,
    pub label: String,
    pub stats: PeriodStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub period1: PeriodView,
    pub period2: PeriodView,
    pub deltas: PeriodDeltas,
}

// 4. Documento exportado ("Exportar Datos")
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPeriod {
    pub month: &'static str,
    pub year: i32,
    pub stats: PeriodStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    pub period1: ReportPeriod,
    pub period2: ReportPeriod,
    pub generated_at: String,
}

// 5. Painel do provedor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyOrders {
    pub month: &'static str,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialsByType {
    #[serde(rename = "type")]
    pub kind: crate::models::inventory::MaterialKind,
    pub count: usize,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatistics {
    pub total_orders: usize,
    pub completed_orders: usize,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    pub pending_orders: usize,
    pub orders_by_month: Vec<MonthlyOrders>,
    pub materials_by_type: Vec<MaterialsByType>,
}

// --- Query ---

// Parâmetros ausentes usam o mês corrente (período 1) e o anterior (período 2).
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonQuery {
    #[validate(range(max = 11, message = "El mes debe estar entre 0 y 11"))]
    pub month1: Option<u32>,
    #[validate(range(min = 1970, max = 9999))]
    pub year1: Option<i32>,
    #[validate(range(max = 11, message = "El mes debe estar entre 0 y 11"))]
    pub month2: Option<u32>,
    #[validate(range(min = 1970, max = 9999))]
    pub year2: Option<i32>,
}
