use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use salary_advance_core::advance::{self, DecisionReason};
use salary_advance_core::error::AdvanceError;
use salary_advance_core::salary::{self, PayFrequency};
use salary_advance_core::types::round_money;

// ===========================================================================
// Salary normalization
// ===========================================================================

const SALARIES: [Decimal; 6] = [
    dec!(0.01),
    dec!(250),
    dec!(999.99),
    dec!(4000),
    dec!(12345.67),
    dec!(250000),
];

#[test]
fn test_monthly_is_identity() {
    for g in SALARIES {
        assert_eq!(salary::normalize(g, "Monthly").unwrap(), g);
    }
}

#[test]
fn test_annually_divides_by_twelve() {
    for g in SALARIES {
        assert_eq!(salary::normalize(g, "Annually").unwrap(), g / dec!(12));
    }
}

#[test]
fn test_monthly_annual_round_trip() {
    for g in SALARIES {
        let monthly = salary::normalize(g, "Monthly").unwrap() * dec!(12);
        let annual = salary::normalize(g * dec!(12), "Annually").unwrap() * dec!(12);
        assert!(
            (monthly - annual).abs() < dec!(0.000001),
            "round trip drifted for {g}: {monthly} vs {annual}"
        );
    }
}

#[test]
fn test_weekly_scenario() {
    // 500 * 52 / 12 = 2166.67
    let monthly = salary::normalize(dec!(500), "Weekly").unwrap();
    assert_eq!(round_money(monthly), dec!(2166.67));
    let decision = advance::evaluate(monthly, dec!(0)).unwrap();
    assert!(decision.eligible);
    assert_eq!(decision.max_advance, dec!(1083.33));
}

#[test]
fn test_bi_weekly_is_half_of_weekly_rate() {
    let weekly = salary::normalize(dec!(1000), "Weekly").unwrap();
    let bi_weekly = salary::normalize(dec!(2000), "Bi-Weekly").unwrap();
    assert!((weekly - bi_weekly).abs() < dec!(0.000001));
}

#[test]
fn test_daily_is_invalid_frequency() {
    let err = salary::normalize(dec!(100), "Daily").unwrap_err();
    assert!(matches!(err, AdvanceError::InvalidFrequency(ref v) if v == "Daily"));
}

#[test]
fn test_salary_too_large_to_annualise_is_invalid_input() {
    for freq in ["Weekly", "Bi-Weekly"] {
        let err = salary::normalize(Decimal::MAX, freq).unwrap_err();
        assert!(
            matches!(err, AdvanceError::InvalidInput { ref field, .. } if field == "gross_salary"),
            "unexpected error for {freq}: {err}"
        );
    }
    assert_eq!(salary::normalize(Decimal::MAX, "Monthly").unwrap(), Decimal::MAX);
    assert!(salary::normalize(Decimal::MAX, "Annually").is_ok());
}

#[test]
fn test_frequency_display_round_trips() {
    for f in PayFrequency::ALL {
        assert_eq!(f.to_string().parse::<PayFrequency>().unwrap(), f);
    }
}

// ===========================================================================
// Advance evaluation
// ===========================================================================

#[test]
fn test_scenario_fee_clamped_to_fifty() {
    // 1500 * 5% = 75, clamped to 50
    let d = advance::evaluate(dec!(4000), dec!(1500)).unwrap();
    assert!(d.eligible);
    assert_eq!(d.max_advance, dec!(2000.00));
    assert_eq!(d.approved_amount, dec!(1500.00));
    assert_eq!(d.fee, dec!(50.00));
}

#[test]
fn test_scenario_fee_floor() {
    // 100 * 5% = 5, raised to 10
    let d = advance::evaluate(dec!(4000), dec!(100)).unwrap();
    assert_eq!(d.fee, dec!(10.00));
}

#[test]
fn test_below_threshold_always_ineligible() {
    for salary in [dec!(0), dec!(1), dec!(500), dec!(999.99)] {
        for requested in [dec!(0), dec!(10), dec!(400), dec!(5000)] {
            let d = advance::evaluate(salary, requested).unwrap();
            assert!(!d.eligible);
            assert_eq!(d.approved_amount, Decimal::ZERO);
            assert_eq!(d.fee, Decimal::ZERO);
            assert_eq!(d.reason, DecisionReason::BelowMinimumSalary);
        }
    }
}

#[test]
fn test_over_cap_approves_nothing() {
    for salary in [dec!(1000), dec!(2500), dec!(8000)] {
        let requested = salary * dec!(0.5) + dec!(0.01);
        let d = advance::evaluate(salary, requested).unwrap();
        assert!(d.eligible);
        assert_eq!(d.approved_amount, Decimal::ZERO);
        assert_eq!(d.fee, Decimal::ZERO);
    }
}

#[test]
fn test_approved_fee_band() {
    let salary = dec!(10000);
    let mut requested = dec!(1);
    while requested <= dec!(5000) {
        let d = advance::evaluate(salary, requested).unwrap();
        assert_eq!(d.approved_amount, requested);
        assert!(
            d.fee >= dec!(10.0) && d.fee <= dec!(50.0),
            "fee {} out of band for {}",
            d.fee,
            requested
        );
        requested += dec!(37.5);
    }
}

#[test]
fn test_approval_is_all_or_nothing() {
    for requested in [dec!(0.5), dec!(250), dec!(1999.99), dec!(2000), dec!(2000.01)] {
        let d = advance::evaluate(dec!(4000), requested).unwrap();
        assert!(d.approved_amount.is_zero() || d.approved_amount == requested);
        assert!(d.fee.is_zero() || !d.approved_amount.is_zero());
    }
}
