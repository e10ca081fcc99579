// src/services/statistics_service.rs

//! Motor de estatísticas do laboratório.
//!
//! Tudo aqui é função pura sobre cópias (snapshots) das coleções: o serviço
//! lê ordens e pagamentos uma única vez por requisição e repassa as fatias
//! para as funções de cálculo, que não fazem I/O nem guardam estado.

use std::sync::Arc;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, SecondsFormat, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::{
    common::{error::AppError, money::saturating_sum},
    db::{MaterialRepository, OrderRepository, PaymentRepository},
    models::{
        auth::CurrentUser,
        finance::Payment,
        inventory::Material,
        operations::{Order, OrderStatus},
        statistics::{
            ChartEntry, DeltaBadge, MaterialsByType, MetricDelta, MonthlyOrders, Period,
            PeriodComparison, PeriodDeltas, PeriodStats, PeriodView, ProviderStatistics,
            ReportPeriod, StatisticsReport, Trend, SHORT_MONTH_NAMES,
        },
    },
};

/// O gráfico sempre tem 31 barras, mesmo em meses mais curtos.
pub const CHART_DAYS: usize = 31;

/// Divisor fixo de "órdenes por día", independente do tamanho do mês.
pub const ORDERS_PER_DAY_DIVISOR: f64 = 30.0;

fn utc() -> FixedOffset {
    Utc.fix()
}

fn local_date(at: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    at.with_timezone(&offset).date_naive()
}

// =============================================================================
//  1. INDICADORES DE UM PERÍODO
// =============================================================================

pub fn compute_period_stats(orders: &[Order], payments: &[Payment], period: Period) -> PeriodStats {
    compute_period_stats_at(orders, payments, period, utc())
}

/// Igual a [`compute_period_stats`], avaliando o calendário das ordens no fuso `offset`.
pub fn compute_period_stats_at(
    orders: &[Order],
    payments: &[Payment],
    period: Period,
    offset: FixedOffset,
) -> PeriodStats {
    let period_order_dates: Vec<(NaiveDate, OrderStatus)> = orders
        .iter()
        .map(|o| (local_date(o.created_at, offset), o.status))
        .filter(|(date, _)| period.contains(*date))
        .collect();

    let total_sales = saturating_sum(
        payments
            .iter()
            .filter(|p| period.contains(p.payment_date.local_date(offset)))
            .map(|p| p.amount),
    );

    let total_orders = period_order_dates.len();
    let completed_orders = period_order_dates
        .iter()
        .filter(|(_, status)| *status == OrderStatus::Completed)
        .count();

    // Divide por total de ordens (e não pelas completadas), como no console.
    let avg_order_value = if total_orders > 0 {
        total_sales / Decimal::from(total_orders)
    } else {
        Decimal::ZERO
    };

    let mut per_day = [0u32; CHART_DAYS];
    for (date, _) in &period_order_dates {
        per_day[date.day0() as usize] += 1;
    }

    let chart_data = per_day
        .iter()
        .enumerate()
        .map(|(i, &count)| ChartEntry {
            day: (i + 1).to_string(),
            sales: count,
        })
        .collect();

    PeriodStats {
        total_sales,
        total_orders,
        completed_orders,
        avg_order_value,
        chart_data,
        orders_per_day: total_orders as f64 / ORDERS_PER_DAY_DIVISOR,
    }
}

// =============================================================================
//  2. VARIAÇÃO ENTRE PERÍODOS
// =============================================================================

// Math.round: .5 arredonda em direção a +infinito (-2.5 -> -2).
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn percent_change(current: f64, previous: f64) -> i64 {
    if previous == 0.0 {
        return if current > 0.0 { 100 } else { 0 };
    }
    round_half_up((current - previous) / previous * 100.0)
}

pub fn metric_delta(current: f64, previous: f64) -> MetricDelta {
    let change = percent_change(current, previous);
    let badge = match change.signum() {
        1 => Some(DeltaBadge {
            label: format!("+{change}%"),
            trend: Trend::Up,
        }),
        -1 => Some(DeltaBadge {
            label: format!("{change}%"),
            trend: Trend::Down,
        }),
        _ => None,
    };
    MetricDelta { change, badge }
}

fn as_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

pub fn period_deltas(current: &PeriodStats, previous: &PeriodStats) -> PeriodDeltas {
    PeriodDeltas {
        total_orders: metric_delta(current.total_orders as f64, previous.total_orders as f64),
        orders_per_day: metric_delta(current.orders_per_day, previous.orders_per_day),
        completed_orders: metric_delta(
            current.completed_orders as f64,
            previous.completed_orders as f64,
        ),
        avg_order_value: metric_delta(
            as_f64(current.avg_order_value),
            as_f64(previous.avg_order_value),
        ),
    }
}

pub fn compare_periods(
    orders: &[Order],
    payments: &[Payment],
    period1: Period,
    period2: Period,
    offset: FixedOffset,
) -> PeriodComparison {
    let stats1 = compute_period_stats_at(orders, payments, period1, offset);
    let stats2 = compute_period_stats_at(orders, payments, period2, offset);
    let deltas = period_deltas(&stats1, &stats2);

    PeriodComparison {
        period1: PeriodView {
            month: period1.month,
            year: period1.year,
            label: period1.label(),
            stats: stats1,
        },
        period2: PeriodView {
            month: period2.month,
            year: period2.year,
            label: period2.label(),
            stats: stats2,
        },
        deltas,
    }
}

// =============================================================================
//  3. EXPORTAÇÃO
// =============================================================================

pub fn build_report(comparison: PeriodComparison, generated_at: DateTime<Utc>) -> StatisticsReport {
    let month_name = |view: &PeriodView| {
        Period::new(view.month, view.year)
            .map(|p| p.month_name())
            .unwrap_or_default()
    };

    StatisticsReport {
        period1: ReportPeriod {
            month: month_name(&comparison.period1),
            year: comparison.period1.year,
            stats: comparison.period1.stats,
        },
        period2: ReportPeriod {
            month: month_name(&comparison.period2),
            year: comparison.period2.year,
            stats: comparison.period2.stats,
        },
        generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

pub fn report_file_name(generated_at: DateTime<Utc>) -> String {
    format!("reporte-estadisticas-{}.json", generated_at.format("%Y-%m-%d"))
}

// =============================================================================
//  4. PAINEL DO PROVEDOR
// =============================================================================

fn is_completed_or_delivered(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Completed | OrderStatus::Delivered)
}

pub fn provider_statistics(
    orders: &[Order],
    materials: &[Material],
    provider: &CurrentUser,
    offset: FixedOffset,
) -> ProviderStatistics {
    let own_orders: Vec<&Order> = orders
        .iter()
        .filter(|o| o.provider_name == provider.name)
        .collect();

    let total_orders = own_orders.len();
    let finished: Vec<&&Order> = own_orders
        .iter()
        .filter(|o| is_completed_or_delivered(o.status))
        .collect();
    let completed_orders = finished.len();
    let total_revenue = saturating_sum(finished.iter().map(|o| o.total_amount));

    let average_order_value = if completed_orders > 0 {
        total_revenue / Decimal::from(completed_orders)
    } else {
        Decimal::ZERO
    };

    let pending_orders = own_orders
        .iter()
        .filter(|o| matches!(o.status, OrderStatus::Pending | OrderStatus::InProcess))
        .count();

    // Agrupa pelo rótulo curto do mês, na ordem em que aparece.
    let mut orders_by_month: Vec<MonthlyOrders> = Vec::new();
    for order in &own_orders {
        let month = SHORT_MONTH_NAMES[local_date(order.created_at, offset).month0() as usize];
        match orders_by_month.iter_mut().find(|m| m.month == month) {
            Some(entry) => entry.orders += 1,
            None => orders_by_month.push(MonthlyOrders { month, orders: 1 }),
        }
    }

    let mut materials_by_type: Vec<MaterialsByType> = Vec::new();
    for material in materials.iter().filter(|m| m.provider_id == provider.id) {
        match materials_by_type.iter_mut().find(|t| t.kind == material.kind) {
            Some(entry) => {
                entry.count += 1;
                entry.value = entry.value.saturating_add(material.stock_value());
            }
            None => materials_by_type.push(MaterialsByType {
                kind: material.kind,
                count: 1,
                value: material.stock_value(),
            }),
        }
    }

    ProviderStatistics {
        total_orders,
        completed_orders,
        total_revenue,
        average_order_value,
        pending_orders,
        orders_by_month,
        materials_by_type,
    }
}

// =============================================================================
//  SERVIÇO
// =============================================================================

#[derive(Clone)]
pub struct StatisticsService {
    orders: Arc<dyn OrderRepository>,
    payments: Arc<dyn PaymentRepository>,
    materials: Arc<dyn MaterialRepository>,
    offset: FixedOffset,
}

impl StatisticsService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        payments: Arc<dyn PaymentRepository>,
        materials: Arc<dyn MaterialRepository>,
        offset: FixedOffset,
    ) -> Self {
        Self { orders, payments, materials, offset }
    }

    /// Mês corrente e mês anterior, no calendário local.
    pub fn default_periods(&self, now: DateTime<Utc>) -> (Period, Period) {
        let current = Period::containing(local_date(now, self.offset));
        (current, current.previous())
    }

    pub async fn compare(&self, period1: Period, period2: Period) -> Result<PeriodComparison, AppError> {
        let orders = self.orders.snapshot().await?;
        let payments = self.payments.snapshot().await?;

        tracing::debug!(
            "📊 Comparando {} x {} ({} ordens, {} pagamentos)",
            period1.label(),
            period2.label(),
            orders.len(),
            payments.len()
        );

        Ok(compare_periods(&orders, &payments, period1, period2, self.offset))
    }

    /// Monta o relatório e o nome do arquivo para download.
    pub async fn export(
        &self,
        period1: Period,
        period2: Period,
        generated_at: DateTime<Utc>,
    ) -> Result<(String, StatisticsReport), AppError> {
        let comparison = self.compare(period1, period2).await?;
        let report = build_report(comparison, generated_at);
        Ok((report_file_name(generated_at), report))
    }

    pub async fn for_provider(&self, provider: &CurrentUser) -> Result<ProviderStatistics, AppError> {
        let orders = self.orders.snapshot().await?;
        let materials = self.materials.snapshot().await?;
        Ok(provider_statistics(&orders, &materials, provider, self.offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        auth::Role,
        finance::PaymentMethod,
        inventory::MaterialKind,
        operations::OpticalFormula,
    };
    use crate::common::serde_utils::CalendarDate;
    use chrono::TimeZone;

    fn order(id: &str, created_at: DateTime<Utc>, status: OrderStatus, total: i64) -> Order {
        Order {
            id: id.to_string(),
            order_number: format!("ORD-{id}"),
            provider_id: "prov-1".to_string(),
            provider_name: "Laboratorio Vision".to_string(),
            client_name: "Cliente".to_string(),
            client_document: String::new(),
            optical_formula: OpticalFormula::default(),
            lens_type: "monofocal".to_string(),
            treatment: String::new(),
            total_amount: Decimal::from(total),
            estimated_date: None,
            estimated_delivery_date: None,
            delivered_at: None,
            observations: String::new(),
            status,
            created_at,
        }
    }

    fn payment(date: NaiveDate, amount: i64) -> Payment {
        Payment {
            id: format!("pay-{date}-{amount}"),
            order_id: "o-1".to_string(),
            order_number: "ORD-o-1".to_string(),
            provider_name: "Laboratorio Vision".to_string(),
            amount: Decimal::from(amount),
            payment_method: PaymentMethod::Efectivo,
            reference: String::new(),
            payment_date: date.into(),
            receipt_url: None,
            created_at: Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap(),
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
    }

    fn march_2025() -> Period {
        Period::new(2, 2025).unwrap()
    }

    #[test]
    fn empty_period_is_all_zeros_with_a_full_chart() {
        let stats = compute_period_stats(&[], &[], march_2025());

        assert_eq!(stats.total_sales, Decimal::ZERO);
        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.completed_orders, 0);
        assert_eq!(stats.avg_order_value, Decimal::ZERO);
        assert_eq!(stats.orders_per_day, 0.0);
        assert_eq!(stats.chart_data.len(), 31);
        assert!(stats.chart_data.iter().all(|e| e.sales == 0));
        assert_eq!(stats.chart_data[0].day, "1");
        assert_eq!(stats.chart_data[30].day, "31");
    }

    #[test]
    fn march_scenario() {
        let orders = vec![
            order("a", at(2025, 3, 5), OrderStatus::Completed, 100),
            order("b", at(2025, 3, 5), OrderStatus::Pending, 50),
        ];
        let payments = vec![payment(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(), 100)];

        let stats = compute_period_stats(&orders, &payments, march_2025());

        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.completed_orders, 1);
        assert_eq!(stats.total_sales, Decimal::from(100));
        assert_eq!(stats.avg_order_value, Decimal::from(50));
        assert_eq!(stats.chart_data[4].sales, 2);
        assert!((stats.orders_per_day - 2.0 / 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn other_months_and_years_are_ignored() {
        let orders = vec![
            order("a", at(2025, 3, 1), OrderStatus::Completed, 10),
            order("b", at(2024, 3, 1), OrderStatus::Completed, 10),
            order("c", at(2025, 4, 1), OrderStatus::Completed, 10),
        ];
        let payments = vec![
            payment(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(), 40),
            payment(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(), 999),
        ];

        let stats = compute_period_stats(&orders, &payments, march_2025());

        assert_eq!(stats.total_orders, 1);
        assert_eq!(stats.total_sales, Decimal::from(40));
    }

    #[test]
    fn chart_total_matches_order_count() {
        let orders: Vec<Order> = (1..=28)
            .map(|d| order(&d.to_string(), at(2025, 2, d), OrderStatus::Pending, 1))
            .chain(std::iter::once(order("x", at(2025, 2, 14), OrderStatus::Pending, 1)))
            .collect();
        let february = Period::new(1, 2025).unwrap();

        let stats = compute_period_stats(&orders, &[], february);

        let charted: u32 = stats.chart_data.iter().map(|e| e.sales).sum();
        assert_eq!(charted as usize, stats.total_orders);
        assert_eq!(stats.chart_data[13].sales, 2);
        // Dias 29-31 não existem em fevereiro de 2025 e ficam zerados.
        assert!(stats.chart_data[28..].iter().all(|e| e.sales == 0));
    }

    #[test]
    fn local_offset_moves_orders_across_month_boundaries() {
        // 1º de abril 02:00 UTC ainda é 31 de março em UTC-5.
        let orders = vec![order("a", Utc.with_ymd_and_hms(2025, 4, 1, 2, 0, 0).unwrap(), OrderStatus::Pending, 1)];
        let bogota = FixedOffset::west_opt(5 * 3600).unwrap();

        let stats = compute_period_stats_at(&orders, &[], march_2025(), bogota);

        assert_eq!(stats.total_orders, 1);
        assert_eq!(stats.chart_data[30].sales, 1);
        assert_eq!(compute_period_stats(&orders, &[], march_2025()).total_orders, 0);
    }

    #[test]
    fn computation_is_idempotent() {
        let orders = vec![order("a", at(2025, 3, 9), OrderStatus::Completed, 75)];
        let payments = vec![payment(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(), 33)];

        let first = compute_period_stats(&orders, &payments, march_2025());
        let second = compute_period_stats(&orders, &payments, march_2025());

        assert_eq!(first, second);
        assert_eq!(first.orders_per_day.to_bits(), second.orders_per_day.to_bits());
    }

    #[test]
    fn percent_change_rules() {
        assert_eq!(percent_change(5.0, 0.0), 100);
        assert_eq!(percent_change(0.0, 0.0), 0);
        assert_eq!(percent_change(150.0, 100.0), 50);
        assert_eq!(percent_change(50.0, 100.0), -50);
        assert_eq!(percent_change(10.0, 8.0), 25);
    }

    #[test]
    fn percent_change_rounds_halves_upwards() {
        // -12.5% -> -12, 12.5% -> 13
        assert_eq!(percent_change(7.0, 8.0), -12);
        assert_eq!(percent_change(9.0, 8.0), 13);
    }

    #[test]
    fn badge_is_hidden_when_nothing_changed() {
        let up = metric_delta(10.0, 8.0);
        assert_eq!(up.badge.as_ref().map(|b| b.label.as_str()), Some("+25%"));
        assert_eq!(up.badge.map(|b| b.trend), Some(Trend::Up));

        let down = metric_delta(50.0, 100.0);
        assert_eq!(down.badge.map(|b| b.label), Some("-50%".to_string()));

        assert_eq!(metric_delta(0.0, 0.0).badge, None);
        assert_eq!(metric_delta(7.0, 7.0).badge, None);
    }

    #[test]
    fn report_uses_month_names_and_dated_file_name() {
        let orders = vec![order("a", at(2025, 3, 5), OrderStatus::Completed, 100)];
        let comparison = compare_periods(
            &orders,
            &[],
            march_2025(),
            march_2025().previous(),
            utc(),
        );
        let generated_at = Utc.with_ymd_and_hms(2025, 4, 2, 8, 30, 0).unwrap();

        let report = build_report(comparison, generated_at);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["period1"]["month"], "Marzo");
        assert_eq!(json["period2"]["month"], "Febrero");
        assert_eq!(json["period1"]["stats"]["totalOrders"], 1);
        assert_eq!(json["generatedAt"], "2025-04-02T08:30:00.000Z");
        assert_eq!(report_file_name(generated_at), "reporte-estadisticas-2025-04-02.json");
    }

    #[test]
    fn provider_panel_counts_only_own_orders_and_materials() {
        let mut foreign = order("z", at(2025, 3, 1), OrderStatus::Completed, 500);
        foreign.provider_name = "Otro".to_string();
        let orders = vec![
            order("a", at(2025, 3, 1), OrderStatus::Completed, 100),
            order("b", at(2025, 3, 2), OrderStatus::Delivered, 50),
            order("c", at(2025, 4, 2), OrderStatus::InProcess, 70),
            order("d", at(2025, 4, 3), OrderStatus::Cancelled, 20),
            foreign,
        ];
        let lens = |id: &str, provider: &str, kind, price: i64, stock| Material {
            id: id.to_string(),
            name: id.to_string(),
            kind,
            price: Decimal::from(price),
            stock,
            description: String::new(),
            provider_id: provider.to_string(),
            provider_name: String::new(),
            created_at: at(2025, 1, 1),
        };
        let materials = vec![
            lens("m1", "prov-1", MaterialKind::Lente, 10, 3),
            lens("m2", "prov-1", MaterialKind::Armazon, 20, 1),
            lens("m3", "prov-1", MaterialKind::Lente, 5, 2),
            lens("m4", "prov-2", MaterialKind::Lente, 1000, 1),
        ];
        let provider = CurrentUser {
            id: "prov-1".to_string(),
            name: "Laboratorio Vision".to_string(),
            role: Role::Proveedor,
        };

        let stats = provider_statistics(&orders, &materials, &provider, utc());

        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.completed_orders, 2);
        assert_eq!(stats.total_revenue, Decimal::from(150));
        assert_eq!(stats.average_order_value, Decimal::from(75));
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(
            stats.orders_by_month,
            vec![
                MonthlyOrders { month: "mar", orders: 2 },
                MonthlyOrders { month: "abr", orders: 2 },
            ]
        );
        assert_eq!(stats.materials_by_type.len(), 2);
        assert_eq!(stats.materials_by_type[0].kind, MaterialKind::Lente);
        assert_eq!(stats.materials_by_type[0].count, 2);
        assert_eq!(stats.materials_by_type[0].value, Decimal::from(40));
    }

    #[test]
    fn provider_without_finished_orders_has_zero_average() {
        let orders = vec![order("a", at(2025, 3, 1), OrderStatus::Pending, 100)];
        let provider = CurrentUser {
            id: "prov-1".to_string(),
            name: "Laboratorio Vision".to_string(),
            role: Role::Proveedor,
        };

        let stats = provider_statistics(&orders, &[], &provider, utc());

        assert_eq!(stats.average_order_value, Decimal::ZERO);
        assert_eq!(stats.total_revenue, Decimal::ZERO);
    }

    #[test]
    fn oversized_stored_values_saturate() {
        let provider = CurrentUser {
            id: "prov-1".to_string(),
            name: "Laboratorio Vision".to_string(),
            role: Role::Proveedor,
        };
        let huge = Material {
            id: "m1".to_string(),
            name: "Lente".to_string(),
            kind: MaterialKind::Lente,
            price: Decimal::from(10_000_000_000_000_000_000u64),
            stock: i64::MAX,
            description: String::new(),
            provider_id: "prov-1".to_string(),
            provider_name: String::new(),
            created_at: at(2025, 1, 1),
        };
        let materials = vec![huge.clone(), Material { id: "m2".to_string(), ..huge }];
        let mut big = order("a", at(2025, 3, 1), OrderStatus::Completed, 0);
        big.total_amount = Decimal::MAX;
        let orders = vec![big.clone(), Order { id: "b".to_string(), ..big }];

        let stats = provider_statistics(&orders, &materials, &provider, utc());
        assert_eq!(stats.materials_by_type[0].value, Decimal::MAX);
        assert_eq!(stats.total_revenue, Decimal::MAX);

        let mut payments = vec![payment(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(), 0); 2];
        for p in &mut payments {
            p.amount = Decimal::MAX;
        }
        let period = compute_period_stats(&[], &payments, march_2025());
        assert_eq!(period.total_sales, Decimal::MAX);
    }

    #[test]
    fn timestamp_payments_are_bucketed_in_the_report_offset() {
        let mut late = payment(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(), 60);
        late.payment_date = CalendarDate::parse("2025-04-01T02:00:00.000Z").unwrap();
        let bogota = FixedOffset::west_opt(5 * 3600).unwrap();

        let local = compute_period_stats_at(&[], &[late.clone()], march_2025(), bogota);
        assert_eq!(local.total_sales, Decimal::from(60));

        let in_utc = compute_period_stats(&[], &[late], march_2025());
        assert_eq!(in_utc.total_sales, Decimal::ZERO);
    }
}
