// src/common/money.rs

//! Valores monetários. Dados gravados podem vir de fora da API, então as
//! agregações saturam em vez de estourar.

use rust_decimal::Decimal;

/// Maior valor aceito em preços, montantes e totais de ordem.
pub fn max_amount() -> Decimal {
    Decimal::from(1_000_000_000_000i64)
}

/// `true` se `value` está em `[0, max_amount()]`.
pub fn is_accepted_amount(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= max_amount()
}

pub fn saturating_sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, value| acc.saturating_add(value))
}
