// src/services/aggregation.rs

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::{
    common::error::AggregationError,
    models::booking::{BookingRow, BookingSource, RawRevenueRow, RoomStatistic, SourceBreakdown, SourceCount},
};

/// `part / whole * 100`. Denominador zero é erro, nunca NaN.
pub fn percentage(part: i64, whole: i64) -> Result<Decimal, AggregationError> {
    Decimal::from(part)
        .checked_div(Decimal::from(whole))
        .map(|ratio| ratio * Decimal::ONE_HUNDRED)
        .ok_or(AggregationError::DivisionByZero)
}

/// Variação percentual de `previous` para `current`.
pub fn percentage_change(previous: i64, current: i64) -> Result<Decimal, AggregationError> {
    let delta = current
        .checked_sub(previous)
        .ok_or(AggregationError::Overflow { previous, current })?;
    percentage(delta, previous)
}

/// Valida as linhas cruas e calcula as estatísticas por tipo de quarto.
pub fn aggregate_revenue_rows(rows: Vec<RawRevenueRow>) -> Result<Vec<RoomStatistic>, AggregationError> {
    let bookings = rows
        .into_iter()
        .enumerate()
        .map(|(i, raw)| BookingRow::from_raw(i, raw))
        .collect::<Result<Vec<_>, _>>()?;

    compute_room_statistics(&bookings)
}

/// Uma passada: conta as reservas por tipo e soma `receita / noites` de cada uma.
/// No fim, a média é a soma dividida pela contagem (média das diárias,
/// não receita total / noites totais).
pub fn compute_room_statistics(rows: &[BookingRow]) -> Result<Vec<RoomStatistic>, AggregationError> {
    let mut acc: BTreeMap<&str, (i64, Decimal)> = BTreeMap::new();

    for (i, row) in rows.iter().enumerate() {
        if row.nights <= 0 {
            return Err(AggregationError::InvalidNights {
                row: i,
                room_type: row.room_type.clone(),
                nights: row.nights,
            });
        }

        let nightly_rate = row
            .revenue
            .checked_div(Decimal::from(row.nights))
            .ok_or(AggregationError::DivisionByZero)?;

        let entry = acc.entry(row.room_type.as_str()).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += nightly_rate;
    }

    acc.into_iter()
        .map(|(room_type, (count, rate_sum))| {
            let avg_rate = rate_sum
                .checked_div(Decimal::from(count))
                .ok_or(AggregationError::DivisionByZero)?;
            Ok(RoomStatistic {
                room_type: room_type.to_string(),
                total_bookings: count,
                avg_rate,
            })
        })
        .collect()
}

/// Divide o total do período entre a origem externa e as reservas diretas.
///
/// - total zero: percentuais `None` e `has_data = false`;
/// - origem externa maior que o total: `direct` fica negativo e `consistent = false`.
pub fn compute_source_breakdown(total_bookings: i64, source_name: &str, source_bookings: i64) -> SourceBreakdown {
    let direct_bookings = total_bookings - source_bookings;
    let consistent = direct_bookings >= 0;

    if !consistent {
        tracing::warn!(
            "⚠️ '{}' tem {} reservas, acima do total do período ({})",
            source_name,
            source_bookings,
            total_bookings
        );
    }

    let (source_percentage, direct_percentage) = match percentage(source_bookings, total_bookings) {
        // Complemento garante que as duas fatias somam exatamente 100.
        Ok(p) => (Some(p), Some(Decimal::ONE_HUNDRED - p)),
        Err(AggregationError::DivisionByZero) => (None, None),
        Err(e) => {
            tracing::warn!("Percentual indisponível: {}", e);
            (None, None)
        }
    };

    SourceBreakdown {
        total_bookings,
        external: SourceCount {
            source: BookingSource::External.display_name(source_name),
            count: source_bookings,
            percentage: source_percentage,
        },
        direct: SourceCount {
            source: BookingSource::Direct.display_name(source_name),
            count: direct_bookings,
            percentage: direct_percentage,
        },
        has_data: source_percentage.is_some(),
        consistent,
    }
}
