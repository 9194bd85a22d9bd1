//! Declarative weight tables and the one scorer that evaluates them.

use crate::signals::{ProjectSignals, Signal};

/// `points` go to `target` whenever `signal` holds.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Weight<T> {
    pub signal: Signal,
    pub target: T,
    pub points: i32,
}

pub(crate) const fn w<T>(signal: Signal, target: T, points: i32) -> Weight<T> {
    Weight {
        signal,
        target,
        points,
    }
}

/// Sum the table for every target, in `targets` order.
pub(crate) fn score<T: Copy + PartialEq>(
    targets: &[T],
    table: &[Weight<T>],
    signals: &ProjectSignals,
) -> Vec<(T, i32)> {
    targets
        .iter()
        .map(|&target| {
            let total = table
                .iter()
                .filter(|weight| weight.target == target && signals.flag(weight.signal))
                .map(|weight| weight.points)
                .sum();
            (target, total)
        })
        .collect()
}

/// Two-decimal rounding applied to every confidence leaving the engine.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, crate::MAX_CONFIDENCE)
}
