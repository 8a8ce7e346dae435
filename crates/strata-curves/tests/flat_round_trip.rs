//! Bootstrapping quotes implied by a flat curve gives the flat curve back.
//!
//! Only combinations whose interpolation reproduces a flat zero curve
//! exactly are expected to return it; the rest must still reprice every
//! instrument.

use approx::assert_relative_eq;
use proptest::prelude::*;
use strata_core::prelude::*;
use strata_curves::prelude::*;

fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

fn reference() -> Date {
    d(2024, 1, 2)
}

fn flat(rate: f64) -> PiecewiseCurve {
    let settings = CurveSettings::new(reference());
    let far = d(2074, 1, 2);
    PiecewiseCurve::new(settings, &[(far, (-rate * settings.time(far)).exp())]).unwrap()
}

fn schedule(start: Date, end: Date, frequency: Frequency) -> Schedule {
    ScheduleBuilder::new(start, end)
        .frequency(frequency)
        .calendar(CalendarId::Target)
        .convention(BusinessDayConvention::ModifiedFollowing)
        .build()
        .unwrap()
}

/// Deposits, a FRA and swaps quoted at their par rates on `market`.
fn quoted_on(market: &PiecewiseCurve) -> Vec<CalibrationInstrument> {
    let target = CalendarId::Target.calendar();
    let spot = target.add_business_days(reference(), 2);
    let mf = BusinessDayConvention::ModifiedFollowing;
    let at = |tenor: &str| target.advance(spot, tenor.parse().unwrap(), mf, false).unwrap();

    let mut out: Vec<CalibrationInstrument> = Vec::new();
    for tenor in ["1M", "3M", "6M"] {
        let unquoted = Deposit::new(spot, at(tenor), 0.0);
        let rate = unquoted.implied_quote(market).unwrap();
        out.push(Deposit::new(spot, at(tenor), rate).into());
    }

    let unquoted = Fra::new(at("6M"), at("1Y"), 0.0);
    out.push(Fra::new(at("6M"), at("1Y"), unquoted.implied_quote(market).unwrap()).into());

    for tenor in ["2Y", "5Y", "10Y", "30Y"] {
        let fixed = schedule(spot, at(tenor), Frequency::Annual);
        let float = schedule(spot, at(tenor), Frequency::Semiannual);
        let build = |rate: f64| {
            Swap::new(
                rate,
                &fixed,
                DayCountConvention::Thirty360European,
                &float,
                DayCountConvention::Act360,
            )
            .unwrap()
        };
        let rate = build(0.0).implied_quote(market).unwrap();
        out.push(build(rate).into());
    }
    out
}

fn interpolation_is_exact_on_flat(settings: &CurveSettings) -> bool {
    match settings.bootstrap_trait {
        BootstrapTrait::Discount => matches!(
            settings.interpolation,
            InterpolationScheme::LogLinear | InterpolationScheme::LogCubic
        ),
        BootstrapTrait::ZeroRate | BootstrapTrait::ForwardRate => true,
    }
}

fn zero(curve: &PiecewiseCurve, date: Date) -> f64 {
    curve
        .zero_rate(
            date,
            DayCountConvention::Act365Fixed,
            Compounding::Continuous,
            Frequency::Annual,
        )
        .unwrap()
        .rate()
}

fn check_round_trip(rate: f64) {
    let market = flat(rate);
    let instruments = quoted_on(&market);

    for bootstrap_trait in BootstrapTrait::all() {
        for scheme in InterpolationScheme::all() {
            let settings = CurveSettings::new(reference())
                .with_trait(*bootstrap_trait)
                .with_interpolation(*scheme);
            if settings.validate().is_err() {
                continue;
            }
            let curve = Bootstrapper::default()
                .bootstrap("FLAT", settings, instruments.clone())
                .unwrap();

            for instrument in &instruments {
                let implied = instrument.implied_quote(&curve).unwrap();
                assert_relative_eq!(implied, instrument.quote(), epsilon = 1e-8);
            }
            if !interpolation_is_exact_on_flat(&settings) {
                continue;
            }
            for pillar in curve.pillar_dates() {
                assert_relative_eq!(zero(&curve, *pillar), rate, epsilon = 1e-6);
            }
            for months in [2, 9, 18, 40, 90, 200] {
                let date = reference().add_months(months).unwrap();
                assert_relative_eq!(zero(&curve, date), rate, epsilon = 1e-6);
            }
        }
    }
}

#[test]
fn test_thirteen_combinations_supported() {
    let supported = BootstrapTrait::all()
        .iter()
        .flat_map(|t| InterpolationScheme::all().iter().map(move |s| (*t, *s)))
        .filter(|(t, s)| t.supports(*s))
        .count();
    assert_eq!(supported, 13);
}

#[test]
fn test_round_trip_at_four_percent() {
    check_round_trip(0.04);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn prop_flat_round_trip(rate in 0.002f64..0.09) {
        check_round_trip(rate);
    }
}
