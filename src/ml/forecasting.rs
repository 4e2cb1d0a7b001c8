//! Weekly sales forecasting.
//!
//! Fits an additive model (linear trend + weekly and yearly Fourier
//! seasonality) to a dated sales series and predicts a fixed number of
//! future weekly periods. The fit is a ridge-regularized least-squares
//! solve over the observed points, so short or irregular series are
//! handled by the regularization rather than by gap-filling.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;

/// One observed point of the sales series.
///
/// Wire field names match the historical dataset headers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalesRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Weekly_Sales")]
    pub weekly_sales: f64,
}

/// One predicted point of the forecast.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    /// Predicted value, rounded to 2 decimal places.
    pub predicted_sales: f64,
}

/// Forecast granularity: one period is one week.
const PERIOD_DAYS: i64 = 7;

/// Fourier harmonics per seasonal component.
const WEEKLY_HARMONICS: usize = 2;
const YEARLY_HARMONICS: usize = 3;

const WEEKLY_PERIOD_DAYS: f64 = 7.0;
const YEARLY_PERIOD_DAYS: f64 = 365.25;

/// Ridge penalty keeping the normal equations well-conditioned even when
/// the series is shorter than the parameter count.
const RIDGE_LAMBDA: f64 = 1e-4;

/// Forecast `days` future weekly periods from a dated sales series.
///
/// The series is re-sorted by date internally; duplicate dates are not
/// deduplicated and flow into the fit as repeated observations.
///
/// # Errors
///
/// - `ValidationError` if the series is empty, `days` is zero, or `days`
///   reaches past the representable date range.
/// - `ModelError` if the series has fewer than 2 distinct dates, in which
///   case the trend is unidentifiable and the model cannot fit.
pub fn forecast_sales(records: &[SalesRecord], days: u32) -> Result<Vec<ForecastPoint>, ServiceError> {
    if records.is_empty() {
        return Err(ServiceError::ValidationError(
            "forecast requires a non-empty sales history".to_string(),
        ));
    }
    if days == 0 {
        return Err(ServiceError::ValidationError(
            "days must be at least 1".to_string(),
        ));
    }

    let mut series: Vec<&SalesRecord> = records.iter().collect();
    series.sort_by_key(|r| r.date);

    let origin = series[0].date;
    let last = series[series.len() - 1].date;

    let mut distinct_dates = 1usize;
    for pair in series.windows(2) {
        if pair[0].date != pair[1].date {
            distinct_dates += 1;
        }
    }
    if distinct_dates < 2 {
        return Err(ServiceError::ModelError(format!(
            "cannot fit forecast model: series has {} distinct date(s), need at least 2",
            distinct_dates
        )));
    }

    // The farthest forecast date must stay representable; checking it up
    // front also rejects horizons too large to materialize.
    if last
        .checked_add_signed(Duration::days(i64::from(days) * PERIOD_DAYS))
        .is_none()
    {
        return Err(ServiceError::ValidationError(format!(
            "days is too large: {} weekly periods extend past the supported date range",
            days
        )));
    }

    // Design matrix rows over days-since-origin, one row per observation.
    let rows: Vec<Vec<f64>> = series
        .iter()
        .map(|r| feature_row((r.date - origin).num_days() as f64))
        .collect();
    let targets: Vec<f64> = series.iter().map(|r| r.weekly_sales).collect();

    let coefficients = ridge_fit(&rows, &targets)?;

    let mut forecast = Vec::with_capacity(days as usize);
    for step in 1..=i64::from(days) {
        let date = last + Duration::days(step * PERIOD_DAYS);
        let t = (date - origin).num_days() as f64;
        let predicted = dot(&feature_row(t), &coefficients);
        forecast.push(ForecastPoint {
            date,
            predicted_sales: round2(predicted),
        });
    }

    Ok(forecast)
}

/// Round to exactly 2 decimal places, matching the published contract.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Feature row for an observation `t` days past the series origin:
/// intercept, linear trend, then sin/cos pairs for each harmonic of the
/// weekly and yearly periods.
fn feature_row(t: f64) -> Vec<f64> {
    let mut row = Vec::with_capacity(2 + 2 * (WEEKLY_HARMONICS + YEARLY_HARMONICS));
    row.push(1.0);
    row.push(t / WEEKLY_PERIOD_DAYS);
    for k in 1..=WEEKLY_HARMONICS {
        let angle = 2.0 * std::f64::consts::PI * (k as f64) * t / WEEKLY_PERIOD_DAYS;
        row.push(angle.sin());
        row.push(angle.cos());
    }
    for k in 1..=YEARLY_HARMONICS {
        let angle = 2.0 * std::f64::consts::PI * (k as f64) * t / YEARLY_PERIOD_DAYS;
        row.push(angle.sin());
        row.push(angle.cos());
    }
    row
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Solve the ridge-regularized normal equations `(XᵀX + λI) β = Xᵀy` by
/// Gaussian elimination with partial pivoting.
fn ridge_fit(rows: &[Vec<f64>], targets: &[f64]) -> Result<Vec<f64>, ServiceError> {
    let p = rows[0].len();

    let mut gram = vec![vec![0.0; p]; p];
    let mut moment = vec![0.0; p];
    for (row, &y) in rows.iter().zip(targets.iter()) {
        for i in 0..p {
            moment[i] += row[i] * y;
            for j in 0..p {
                gram[i][j] += row[i] * row[j];
            }
        }
    }
    for (i, row) in gram.iter_mut().enumerate() {
        row[i] += RIDGE_LAMBDA;
    }

    solve(&mut gram, &mut moment).ok_or_else(|| {
        ServiceError::ModelError("forecast model fit failed: singular normal equations".to_string())
    })
}

fn solve(a: &mut [Vec<f64>], b: &mut [f64]) -> Option<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| {
            a[i][col]
                .abs()
                .partial_cmp(&a[j][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot][col].abs() < f64::EPSILON {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut acc = b[row];
        for col in (row + 1)..n {
            acc -= a[row][col] * x[col];
        }
        x[row] = acc / a[row][row];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, sales: f64) -> SalesRecord {
        SalesRecord {
            date: date.parse().expect("valid test date"),
            weekly_sales: sales,
        }
    }

    #[test]
    fn forecast_returns_requested_number_of_points() {
        let series = vec![
            record("2024-01-01", 100.0),
            record("2024-01-08", 110.0),
            record("2024-01-15", 105.0),
            record("2024-01-22", 120.0),
        ];

        let forecast = forecast_sales(&series, 4).expect("fit succeeds");
        assert_eq!(forecast.len(), 4);
    }

    #[test]
    fn forecast_dates_are_weekly_and_strictly_increasing() {
        let series = vec![
            record("2024-01-01", 100.0),
            record("2024-01-08", 110.0),
            record("2024-01-15", 105.0),
        ];

        let forecast = forecast_sales(&series, 3).expect("fit succeeds");
        assert_eq!(forecast[0].date, "2024-01-22".parse::<NaiveDate>().unwrap());
        for pair in forecast.windows(2) {
            assert_eq!((pair[1].date - pair[0].date).num_days(), 7);
        }
    }

    #[test]
    fn two_point_series_forecasts_one_period_ahead() {
        // Worked example from the API contract.
        let series = vec![record("2024-01-01", 100.0), record("2024-01-08", 110.0)];

        let forecast = forecast_sales(&series, 1).expect("fit succeeds");
        assert_eq!(forecast.len(), 1);
        assert!(forecast[0].date > "2024-01-08".parse::<NaiveDate>().unwrap());
    }

    #[test]
    fn unsorted_input_is_reordered_before_fitting() {
        let sorted = vec![
            record("2024-01-01", 100.0),
            record("2024-01-08", 110.0),
            record("2024-01-15", 120.0),
        ];
        let shuffled = vec![sorted[2].clone(), sorted[0].clone(), sorted[1].clone()];

        let a = forecast_sales(&sorted, 2).expect("fit succeeds");
        let b = forecast_sales(&shuffled, 2).expect("fit succeeds");
        assert_eq!(a[0].date, b[0].date);
        assert_eq!(a[0].predicted_sales, b[0].predicted_sales);
    }

    #[test]
    fn values_are_rounded_to_two_decimals() {
        let series = vec![
            record("2024-01-01", 100.37),
            record("2024-01-08", 111.19),
            record("2024-01-15", 104.55),
        ];

        let forecast = forecast_sales(&series, 5).expect("fit succeeds");
        for point in forecast {
            let scaled = point.predicted_sales * 100.0;
            assert!(
                (scaled - scaled.round()).abs() < 1e-9,
                "value {} not rounded to 2 decimals",
                point.predicted_sales
            );
        }
    }

    #[test]
    fn rising_trend_forecasts_above_series_start() {
        let series: Vec<SalesRecord> = (0..20)
            .map(|week| SalesRecord {
                date: "2024-01-01".parse::<NaiveDate>().unwrap() + Duration::days(7 * week),
                weekly_sales: 100.0 + 5.0 * week as f64,
            })
            .collect();

        let forecast = forecast_sales(&series, 3).expect("fit succeeds");
        for point in forecast {
            assert!(point.predicted_sales > 100.0);
        }
    }

    #[test]
    fn empty_series_is_a_validation_error() {
        let err = forecast_sales(&[], 7).unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn zero_horizon_is_a_validation_error() {
        let series = vec![record("2024-01-01", 100.0), record("2024-01-08", 110.0)];
        let err = forecast_sales(&series, 0).unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn oversized_horizon_is_a_validation_error() {
        let series = vec![record("2024-01-01", 100.0), record("2024-01-08", 110.0)];
        let err = forecast_sales(&series, u32::MAX).unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn single_distinct_date_cannot_fit() {
        // Duplicate dates are kept, but one distinct timestamp has no trend.
        let series = vec![record("2024-01-01", 100.0), record("2024-01-01", 110.0)];
        let err = forecast_sales(&series, 1).unwrap_err();
        assert!(matches!(err, ServiceError::ModelError(_)));
    }

    #[test]
    fn round2_keeps_two_decimal_places() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(10.0 / 3.0), 3.33);
    }
}
