//! Evaluation of measures on a date grid.

use strata_core::types::{Date, Period};
use strata_curves::{Curve, PiecewiseCurve};

use crate::context::EvaluationContext;
use crate::contracts::{CurveQuery, ForwardPeriod, Grid, Measure, PointError, Series};
use crate::error::{EngineError, EngineResult};

/// Grid and series for one curve.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    /// Resolved grid, in request order.
    pub grid_dates: Vec<Date>,
    /// One series per measure.
    pub series: Vec<Series>,
    /// First failure per failed grid point.
    pub point_errors: Vec<PointError>,
}

/// Runs queries against built curves.
#[derive(Debug, Clone, Copy)]
pub struct CurveQueryEngine<'a> {
    context: &'a EvaluationContext,
}

impl<'a> CurveQueryEngine<'a> {
    /// Engine using the defaults and limits of `context`.
    #[must_use]
    pub fn new(context: &'a EvaluationContext) -> Self {
        Self { context }
    }

    /// Evaluates `query` on `curve`.
    ///
    /// A failing grid point leaves `None` in every series and is reported
    /// once. With `strict_queries` set the first failing point fails the
    /// whole result instead.
    pub fn evaluate(&self, curve: &PiecewiseCurve, query: &CurveQuery) -> EngineResult<QueryResult> {
        let grid_dates = self.grid(curve, &query.grid)?;
        let mut series: Vec<Series> = query
            .measures
            .iter()
            .map(|measure| Series {
                measure: *measure,
                values: Vec::with_capacity(grid_dates.len()),
            })
            .collect();
        let mut point_errors = Vec::new();

        for (index, &date) in grid_dates.iter().enumerate() {
            let mut first_error: Option<EngineError> = None;
            for s in &mut series {
                match Self::measure(curve, &s.measure, date) {
                    Ok(value) => s.values.push(Some(value)),
                    Err(e) => {
                        s.values.push(None);
                        first_error.get_or_insert(e);
                    }
                }
            }
            if let Some(e) = first_error {
                if self.context.config.strict_queries {
                    return Err(e);
                }
                tracing::trace!(index, date = %date, error = %e, "grid point failed");
                point_errors.push(PointError {
                    index,
                    date,
                    error: e.info(),
                });
            }
        }

        Ok(QueryResult {
            grid_dates,
            series,
            point_errors,
        })
    }

    /// Dates of `grid` for `curve`.
    pub fn grid(&self, curve: &PiecewiseCurve, grid: &Grid) -> EngineResult<Vec<Date>> {
        match grid {
            Grid::Dates { dates } => Ok(dates.clone()),
            Grid::Tenors {
                tenors,
                calendar,
                convention,
                end_of_month,
            } => {
                let reference = curve.reference_date();
                let calendar = self.context.calendar_or_default(*calendar);
                let convention = self.context.convention_or_default(*convention);
                tenors
                    .iter()
                    .map(|tenor| {
                        if tenor.is_zero() {
                            Ok(reference)
                        } else {
                            Ok(calendar.advance(reference, *tenor, convention, *end_of_month)?)
                        }
                    })
                    .collect()
            }
            Grid::Range { start, end, step } => self.range(*start, *end, *step),
        }
    }

    fn range(&self, start: Date, end: Date, step: Period) -> EngineResult<Vec<Date>> {
        if step.length() <= 0 {
            return Err(EngineError::invalid_input(format!(
                "range step {step} must be positive"
            )));
        }
        if end < start {
            return Err(EngineError::invalid_input(format!(
                "range end {end} is before start {start}"
            )));
        }

        let cap = self.context.config.max_range_points;
        let mut dates = Vec::new();
        let mut k: i32 = 0;
        loop {
            // offsets from the start, so month ends do not drift
            let date = Period::new(step.length() * k, step.unit()).add_to(start)?;
            if date > end {
                break;
            }
            if dates.len() == cap {
                return Err(EngineError::invalid_input(format!(
                    "range {start} .. {end} by {step} exceeds {cap} points"
                )));
            }
            dates.push(date);
            k += 1;
        }
        Ok(dates)
    }

    fn measure(curve: &PiecewiseCurve, measure: &Measure, date: Date) -> EngineResult<f64> {
        let value = match measure {
            Measure::Discount => curve.discount(date)?,
            Measure::Zero {
                day_counter,
                compounding,
                frequency,
            } => curve
                .zero_rate(
                    date,
                    day_counter.unwrap_or_else(|| curve.day_counter()),
                    *compounding,
                    *frequency,
                )?
                .rate(),
            Measure::Forward {
                period: ForwardPeriod::Instantaneous,
                ..
            } => curve.instantaneous_forward(date)?,
            Measure::Forward {
                period: ForwardPeriod::Tenor(tenor),
                day_counter,
                compounding,
                frequency,
            } => {
                let end = tenor.add_to(date)?;
                curve
                    .forward_rate(
                        date,
                        end,
                        day_counter.unwrap_or_else(|| curve.day_counter()),
                        *compounding,
                        *frequency,
                    )?
                    .rate()
            }
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::contracts::BatchRequest;
    use crate::error::ErrorKind;
    use approx::assert_relative_eq;
    use serde_json::json;
    use strata_core::types::{Compounding, Frequency};
    use strata_curves::CurveSettings;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn context(config: EngineConfig) -> EvaluationContext {
        let request: BatchRequest =
            serde_json::from_value(json!({ "as_of_date": "2024-01-02", "curves": [] })).unwrap();
        EvaluationContext::from_request(&request, config).unwrap()
    }

    /// 3% continuously compounded out to 2034, no extrapolation.
    fn curve() -> PiecewiseCurve {
        let settings = CurveSettings::new(d(2024, 1, 2)).with_extrapolation(false);
        let far = d(2034, 1, 2);
        PiecewiseCurve::new(settings, &[(far, (-0.03 * settings.time(far)).exp())]).unwrap()
    }

    fn query(value: serde_json::Value) -> CurveQuery {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_dates_grid_and_measures() {
        let ctx = context(EngineConfig::default());
        let engine = CurveQueryEngine::new(&ctx);
        let result = engine
            .evaluate(
                &curve(),
                &query(json!({
                    "grid": { "type": "dates", "dates": ["2025-01-02", "2024-01-02"] },
                    "measures": [
                        { "measure": "discount" },
                        { "measure": "zero" },
                        { "measure": "forward", "period": "instantaneous" },
                        { "measure": "forward", "period": "1Y", "compounding": "Continuous" }
                    ]
                })),
            )
            .unwrap();

        assert_eq!(result.grid_dates, vec![d(2025, 1, 2), d(2024, 1, 2)]);
        assert!(result.point_errors.is_empty());
        let df = result.series[0].values[0].unwrap();
        assert_relative_eq!(df, (-0.03 * 366.0 / 365.0_f64).exp(), epsilon = 1e-12);
        assert_eq!(result.series[0].values[1], Some(1.0));
        for s in &result.series[1..] {
            for v in &s.values {
                assert_relative_eq!(v.unwrap(), 0.03, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_tenor_grid_zero_tenor_is_reference() {
        let ctx = context(EngineConfig::default());
        let engine = CurveQueryEngine::new(&ctx);
        let grid: Grid = serde_json::from_value(json!({
            "type": "tenors", "tenors": ["0D", "6M", "1Y"]
        }))
        .unwrap();

        let dates = engine.grid(&curve(), &grid).unwrap();
        assert_eq!(dates, vec![d(2024, 1, 2), d(2024, 7, 2), d(2025, 1, 2)]);
    }

    #[test]
    fn test_range_grid() {
        let ctx = context(EngineConfig::default());
        let engine = CurveQueryEngine::new(&ctx);
        let grid = Grid::Range {
            start: d(2024, 1, 31),
            end: d(2024, 5, 31),
            step: Period::months(1),
        };
        let dates = engine.grid(&curve(), &grid).unwrap();
        assert_eq!(
            dates,
            vec![
                d(2024, 1, 31),
                d(2024, 2, 29),
                d(2024, 3, 31),
                d(2024, 4, 30),
                d(2024, 5, 31)
            ]
        );

        let bad = Grid::Range {
            start: d(2024, 1, 31),
            end: d(2024, 5, 31),
            step: Period::days(0),
        };
        assert_eq!(
            engine.grid(&curve(), &bad).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_range_cap() {
        let config = EngineConfig {
            max_range_points: 10,
            ..EngineConfig::default()
        };
        let ctx = context(config);
        let engine = CurveQueryEngine::new(&ctx);
        let grid = Grid::Range {
            start: d(2024, 1, 2),
            end: d(2024, 1, 11),
            step: Period::days(1),
        };
        assert_eq!(engine.grid(&curve(), &grid).unwrap().len(), 10);

        let grid = Grid::Range {
            start: d(2024, 1, 2),
            end: d(2024, 1, 12),
            step: Period::days(1),
        };
        assert!(engine.grid(&curve(), &grid).is_err());
    }

    #[test]
    fn test_point_errors_are_isolated() {
        let ctx = context(EngineConfig::default());
        let engine = CurveQueryEngine::new(&ctx);
        let q = query(json!({
            "grid": { "type": "dates", "dates": ["2023-12-29", "2026-01-02", "2040-01-02"] },
            "measures": [{ "measure": "discount" }, { "measure": "zero" }]
        }));

        let result = engine.evaluate(&curve(), &q).unwrap();
        assert_eq!(result.series[0].values[0], None);
        assert!(result.series[0].values[1].is_some());
        assert_eq!(result.series[1].values[2], None);
        assert_eq!(result.point_errors.len(), 2);
        assert_eq!(result.point_errors[0].index, 0);
        assert_eq!(result.point_errors[1].index, 2);
        assert!(result
            .point_errors
            .iter()
            .all(|p| p.error.kind == ErrorKind::QueryOutOfRange));
    }

    #[test]
    fn test_strict_mode_fails_whole_result() {
        let config = EngineConfig {
            strict_queries: true,
            ..EngineConfig::default()
        };
        let ctx = context(config);
        let engine = CurveQueryEngine::new(&ctx);
        let q = query(json!({
            "grid": { "type": "dates", "dates": ["2026-01-02", "2040-01-02"] },
            "measures": [{ "measure": "discount" }]
        }));

        let err = engine.evaluate(&curve(), &q).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QueryOutOfRange);
    }

    #[test]
    fn test_zero_conventions() {
        let ctx = context(EngineConfig::default());
        let engine = CurveQueryEngine::new(&ctx);
        let q = CurveQuery {
            grid: Grid::Dates {
                dates: vec![d(2029, 1, 2)],
            },
            measures: vec![Measure::Zero {
                day_counter: None,
                compounding: Compounding::Compounded,
                frequency: Frequency::Annual,
            }],
        };
        let result = engine.evaluate(&curve(), &q).unwrap();
        assert_relative_eq!(
            result.series[0].values[0].unwrap(),
            0.03_f64.exp() - 1.0,
            epsilon = 1e-10
        );
    }
}
