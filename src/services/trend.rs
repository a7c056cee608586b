// src/services/trend.rs

use rust_decimal::Decimal;

use crate::models::dashboard::{TrendDirection, TrendIndicator, TrendTone};

impl TrendIndicator {
    /// A seta sempre segue o sinal real; a cor depende de `invert`
    /// (ex: taxa de cancelamento, onde cair é bom).
    /// Zero não é positivo: seta para baixo e tom desfavorável.
    pub fn from_trend(trend: Decimal, invert: bool) -> Self {
        let favorable = if invert {
            trend < Decimal::ZERO
        } else {
            trend > Decimal::ZERO
        };

        let direction = if trend > Decimal::ZERO {
            TrendDirection::Up
        } else {
            TrendDirection::Down
        };

        Self {
            direction,
            tone: if favorable {
                TrendTone::Favorable
            } else {
                TrendTone::Unfavorable
            },
            magnitude: trend.abs(),
        }
    }
}
