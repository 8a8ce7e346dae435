//! The September 2008 Treasury curve, submitted as a JSON batch.

use approx::assert_relative_eq;
use serde_json::{json, Value};
use strata_core::prelude::*;
use strata_curves::prelude::*;
use strata_engine::prelude::*;

fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

fn deposit(tenor: &str) -> Value {
    json!({
        "type": "deposit", "quote_id": format!("DEPO_{tenor}"), "tenor": tenor,
        "fixing_days": 3, "calendar": "TARGET", "convention": "ModifiedFollowing",
        "end_of_month": true, "day_counter": "Act365Fixed"
    })
}

fn bond(id: &str, issue: &str, maturity: &str, coupon: f64) -> Value {
    json!({
        "type": "bond", "quote_id": id, "settlement_days": 3, "coupon_rate": coupon,
        "day_counter": "ActActIcma", "payment_convention": "Unadjusted", "issue_date": issue,
        "schedule": {
            "effective_date": issue, "termination_date": maturity, "frequency": "Semiannual",
            "calendar": "UnitedStatesGovernmentBond", "convention": "Unadjusted",
            "termination_convention": "Unadjusted", "rule": "Backward"
        }
    })
}

fn request() -> BatchRequest {
    serde_json::from_value(json!({
        "as_of_date": "2008-09-15",
        "quotes": [
            { "id": "DEPO_3M", "value": 0.0096 },
            { "id": "DEPO_6M", "value": 0.0145 },
            { "id": "DEPO_1Y", "value": 0.0194 },
            { "id": "T_2010", "value": 100.390625 },
            { "id": "T_2011", "value": 106.21875 },
            { "id": "T_2013", "value": 100.59375 },
            { "id": "T_2018", "value": 101.6875 },
            { "id": "T_2038", "value": 102.140625 }
        ],
        "curves": [{
            "spec": {
                "id": "USD_TSY",
                "reference_date": "2008-09-18",
                "day_counter": "ActActIsda",
                "bootstrap_trait": "Discount",
                "interpolation": "LogLinear",
                "helpers": [
                    deposit("3M"),
                    deposit("6M"),
                    deposit("1Y"),
                    bond("T_2010", "2005-03-15", "2010-08-31", 0.02375),
                    bond("T_2011", "2005-06-15", "2011-08-31", 0.04625),
                    bond("T_2013", "2006-06-30", "2013-08-31", 0.03125),
                    bond("T_2018", "2002-11-15", "2018-08-15", 0.04),
                    bond("T_2038", "1987-05-15", "2038-05-15", 0.045)
                ]
            },
            "query": {
                "grid": { "type": "dates", "dates": ["2010-08-31", "2038-05-15"] },
                "measures": [{ "measure": "discount" }]
            }
        }]
    }))
    .unwrap()
}

#[test]
fn test_textbook_curve_through_the_engine() {
    let outcome = BatchRunner::new(EngineConfig::default())
        .unwrap()
        .run(&request())
        .unwrap();
    let result = outcome.response().result("USD_TSY").unwrap();
    assert!(result.is_ok(), "{:?}", result.error);
    assert_eq!(result.reference_date, Some(d(2008, 9, 18)));
    assert_eq!(result.pillar_dates.len(), 8);
    assert_eq!(result.pillar_dates[3], d(2010, 8, 31));

    let dfs = &result.series[0].values;
    assert_relative_eq!(dfs[0].unwrap(), 0.958714, epsilon = 5e-6);
    assert_relative_eq!(dfs[1].unwrap(), 0.260189, epsilon = 5e-6);
}

#[test]
fn test_held_out_bond_prices_off_engine_curve() {
    let outcome = BatchRunner::new(EngineConfig::default())
        .unwrap()
        .run(&request())
        .unwrap();
    let curve = outcome.curve("USD_TSY").unwrap();

    let schedule = ScheduleBuilder::new(d(2007, 5, 15), d(2017, 5, 15))
        .frequency(Frequency::Semiannual)
        .calendar(CalendarId::UnitedStatesGovernmentBond)
        .convention(BusinessDayConvention::Unadjusted)
        .termination_convention(BusinessDayConvention::Unadjusted)
        .rule(DateGeneration::Backward)
        .build()
        .unwrap();
    let bond = FixedRateBond::new(
        &schedule,
        0.045,
        DayCountConvention::ActActIcma,
        BusinessDayConvention::ModifiedFollowing,
        100.0,
        100.0,
    )
    .unwrap()
    .with_issue_date(d(2007, 5, 15));

    let npv = bond.npv(curve.as_ref(), curve.reference_date()).unwrap();
    assert!((npv - 107.67).abs() < 1e-2, "npv {npv}");
}

#[test]
fn test_solvers_agree_on_pillars() {
    let brent = BatchRunner::new(EngineConfig::default())
        .unwrap()
        .run(&request())
        .unwrap();
    let newton = BatchRunner::new(EngineConfig {
        solver: SolverKind::Newton,
        ..EngineConfig::default()
    })
    .unwrap()
    .run(&request())
    .unwrap();

    let a = brent.curve("USD_TSY").unwrap();
    let b = newton.curve("USD_TSY").unwrap();
    for (x, y) in a.node_discounts().iter().zip(b.node_discounts()) {
        assert_relative_eq!(*x, *y, epsilon = 1e-9);
    }
}
