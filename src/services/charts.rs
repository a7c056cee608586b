// src/services/charts.rs
//
// Funções puras: agregados -> instruções declarativas de gráfico/texto.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{
    booking::RoomStatistic,
    dashboard::{BarChartSpec, ChartBar, ValueFormat},
};

const NBSP: char = '\u{a0}';

// Agrupa de três em três dígitos, da direita para a esquerda.
fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut groups: Vec<&str> = Vec::with_capacity(digits.len() / 3 + 1);
    let mut end = digits.len();
    while end > 3 {
        groups.push(&digits[end - 3..end]);
        end -= 3;
    }
    groups.push(&digits[..end]);
    groups.reverse();
    groups.join(&NBSP.to_string())
}

/// Contagem com separador de milhar (padrão en-ZA, espaço não separável).
pub fn format_count(value: i64) -> String {
    let grouped = group_thousands(u128::from(value.unsigned_abs()));
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Rand sul-africano sem casas decimais: `R 1 235`.
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    // Escala zero depois do arredondamento: a mantissa é o valor inteiro
    let grouped = group_thousands(rounded.mantissa().unsigned_abs());
    format!("{}R{}{}", if negative { "-" } else { "" }, NBSP, grouped)
}

/// "37.5%", ou "No data" quando o percentual não existe.
pub fn format_percentage(value: Option<Decimal>) -> String {
    match value {
        Some(p) => format!("{}%", p.round_dp(1).normalize()),
        None => "No data".to_string(),
    }
}

pub fn room_popularity_chart(stats: &[RoomStatistic]) -> BarChartSpec {
    BarChartSpec {
        id: "room-popularity".to_string(),
        title: "Room Popularity".to_string(),
        x_key: "roomType".to_string(),
        y_key: "totalBookings".to_string(),
        value_format: ValueFormat::Count,
        bars: stats
            .iter()
            .map(|s| ChartBar {
                label: s.room_type.clone(),
                value: Decimal::from(s.total_bookings),
                display: format!("{} bookings", format_count(s.total_bookings)),
            })
            .collect(),
    }
}

pub fn average_rate_chart(stats: &[RoomStatistic]) -> BarChartSpec {
    BarChartSpec {
        id: "average-rate".to_string(),
        title: "Average Rate per Room".to_string(),
        x_key: "roomType".to_string(),
        y_key: "avgRate".to_string(),
        value_format: ValueFormat::CurrencyZar,
        bars: stats
            .iter()
            .map(|s| ChartBar {
                label: s.room_type.clone(),
                value: s.avg_rate,
                display: format_currency(s.avg_rate),
            })
            .collect(),
    }
}
