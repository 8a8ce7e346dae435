//! Treasury Curve Batch Example
//!
//! Builds a US Treasury discount curve from three deposits and five
//! coupon bonds, then reads discount factors, zero rates and 6M forwards
//! off a yearly grid.
//!
//! Market Data: September 15, 2008
//!
//! | Instrument | Maturity   | Coupon  | Quote      |
//! |------------|------------|---------|------------|
//! | Deposit    | 3M         |         | 0.96%      |
//! | Deposit    | 6M         |         | 1.45%      |
//! | Deposit    | 1Y         |         | 1.94%      |
//! | Bond       | 2010-08-31 | 2.375%  | 100.390625 |
//! | Bond       | 2011-08-31 | 4.625%  | 106.21875  |
//! | Bond       | 2013-08-31 | 3.125%  | 100.59375  |
//! | Bond       | 2018-08-15 | 4.000%  | 101.6875   |
//! | Bond       | 2038-05-15 | 4.500%  | 102.140625 |
//!
//! Run with: RUST_LOG=strata_engine=debug cargo run --example bond_curve

use anyhow::{bail, Context};
use serde_json::{json, Value};
use strata_engine::prelude::*;
use tracing_subscriber::EnvFilter;

fn bond(issue: &str, maturity: &str, coupon: f64, price: f64) -> Value {
    json!({
        "type": "bond", "price": price, "settlement_days": 3, "coupon_rate": coupon,
        "issue_date": issue,
        "schedule": {
            "effective_date": issue, "termination_date": maturity,
            "calendar": "UnitedStatesGovernmentBond"
        }
    })
}

fn deposit(tenor: &str, rate: f64) -> Value {
    json!({
        "type": "deposit", "rate": rate, "tenor": tenor, "fixing_days": 3,
        "end_of_month": true, "day_counter": "Act365Fixed"
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let request: BatchRequest = serde_json::from_value(json!({
        "as_of_date": "2008-09-15",
        "curves": [{
            "spec": {
                "id": "USD_TSY",
                "reference_date": "2008-09-18",
                "day_counter": "ActActIsda",
                "helpers": [
                    deposit("3M", 0.0096),
                    deposit("6M", 0.0145),
                    deposit("1Y", 0.0194),
                    bond("2005-03-15", "2010-08-31", 0.02375, 100.390625),
                    bond("2005-06-15", "2011-08-31", 0.04625, 106.21875),
                    bond("2006-06-30", "2013-08-31", 0.03125, 100.59375),
                    bond("2002-11-15", "2018-08-15", 0.04, 101.6875),
                    bond("1987-05-15", "2038-05-15", 0.045, 102.140625)
                ]
            },
            "query": {
                "grid": { "type": "range", "start": "2009-09-18", "end": "2038-09-18", "step": "1Y" },
                "measures": [
                    { "measure": "discount" },
                    { "measure": "zero", "compounding": "Compounded", "frequency": "Semiannual" },
                    { "measure": "forward", "period": "6M" }
                ]
            }
        }]
    }))
    .context("malformed request")?;

    let runner = BatchRunner::new(EngineConfig::default())?;
    let outcome = runner.run(&request)?;
    let result = outcome
        .response()
        .result("USD_TSY")
        .context("no result for USD_TSY")?;
    if let Some(error) = &result.error {
        bail!("USD_TSY failed: {} ({})", error.message, error.kind.code());
    }

    println!("===========================================");
    println!("  US Treasury Curve, 2008-09-15");
    println!("===========================================\n");
    println!("Pillars:");
    for date in &result.pillar_dates {
        println!("  {date}");
    }

    println!("\n{:<12} {:>10} {:>10} {:>10}", "Date", "DF", "Zero", "Fwd 6M");
    println!("{}", "-".repeat(45));
    for (i, date) in result.grid_dates.iter().enumerate() {
        let cell = |series: usize, scale: f64| {
            result.series[series].values[i]
                .map_or_else(|| "n/a".to_string(), |v| format!("{:.6}", v * scale))
        };
        println!(
            "{:<12} {:>10} {:>10} {:>10}",
            date.to_string(),
            cell(0, 1.0),
            cell(1, 100.0),
            cell(2, 100.0)
        );
    }

    for point in &result.point_errors {
        println!("point {} ({}): {}", point.index, point.date, point.error.message);
    }
    Ok(())
}
