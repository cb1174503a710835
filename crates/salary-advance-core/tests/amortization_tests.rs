use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use salary_advance_core::amortization::{self, LoanTerms};
use salary_advance_core::error::AdvanceError;

// ===========================================================================
// Total repayable
// ===========================================================================

#[test]
fn test_compound_known_answer() {
    // 10000 * (1 + 0.05/12)^12
    let total = amortization::total_repayable(dec!(10000), dec!(5), 12).unwrap();
    assert_eq!(total, dec!(10511.62));
}

#[test]
fn test_compound_grows_with_term() {
    let short = amortization::total_repayable(dec!(5000), dec!(7.5), 6).unwrap();
    let long = amortization::total_repayable(dec!(5000), dec!(7.5), 36).unwrap();
    assert!(short > dec!(5000));
    assert!(long > short);
}

#[test]
fn test_zero_rate_returns_principal() {
    let total = amortization::total_repayable(dec!(1234.56), Decimal::ZERO, 48).unwrap();
    assert_eq!(total, dec!(1234.56));
}

#[test]
fn test_non_positive_term_is_invalid_term() {
    assert!(matches!(
        amortization::total_repayable(dec!(1000), dec!(5), 0),
        Err(AdvanceError::InvalidTerm(0))
    ));
}

#[test]
fn test_non_positive_principal_is_invalid_parameters() {
    assert!(matches!(
        amortization::total_repayable(dec!(-5), dec!(5), 12),
        Err(AdvanceError::InvalidLoanParameters { .. })
    ));
}

// ===========================================================================
// Schedule
// ===========================================================================

fn assert_schedule_properties(principal: Decimal, rate: Decimal, term: i64) {
    let rows = amortization::schedule(principal, rate, term).unwrap();
    assert_eq!(rows.len() as i64, term);

    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.month as usize, i + 1, "months must be sequential");
        assert!(row.remaining_balance >= Decimal::ZERO);
        assert!(row.interest_paid >= Decimal::ZERO);
    }

    let last = rows.last().unwrap();
    assert_eq!(last.remaining_balance, Decimal::ZERO);

    let principal_sum: Decimal = rows.iter().map(|r| r.principal_paid).sum();
    let epsilon = dec!(0.005) * Decimal::from(term);
    assert!(
        (principal_sum - principal).abs() <= epsilon,
        "principal paid {principal_sum} vs {principal} (term {term}, rate {rate})"
    );
}

#[test]
fn test_schedule_properties_across_terms() {
    assert_schedule_properties(dec!(10000), dec!(5), 12);
    assert_schedule_properties(dec!(250000), dec!(6.5), 360);
    assert_schedule_properties(dec!(3000), dec!(19.99), 24);
    assert_schedule_properties(dec!(999.99), dec!(0), 7);
    assert_schedule_properties(dec!(50), dec!(3), 1);
}

#[test]
fn test_balance_declines_monotonically() {
    let rows = amortization::schedule(dec!(20000), dec!(8), 60).unwrap();
    for pair in rows.windows(2) {
        assert!(pair[1].remaining_balance < pair[0].remaining_balance);
    }
}

#[test]
fn test_interest_share_falls_over_time() {
    let rows = amortization::schedule(dec!(20000), dec!(8), 60).unwrap();
    assert!(rows[0].interest_paid > rows[59].interest_paid);
    assert!(rows[0].principal_paid < rows[58].principal_paid);
}

#[test]
fn test_level_payment_except_final_month() {
    let rows = amortization::schedule(dec!(10000), dec!(5), 12).unwrap();
    let payment = rows[0].payment;
    for row in &rows[..11] {
        assert_eq!(row.payment, payment);
    }
    assert!((rows[11].payment - payment).abs() < dec!(1));
}

#[test]
fn test_loan_terms_delegate() {
    let terms = LoanTerms {
        principal: dec!(10000),
        annual_rate_percent: dec!(5),
        term_months: 12,
    };
    assert_eq!(terms.total_repayable().unwrap(), dec!(10511.62));
    assert_eq!(terms.schedule().unwrap().len(), 12);
}

#[test]
fn test_schedule_bad_term_is_invalid_parameters() {
    assert!(matches!(
        amortization::schedule(dec!(1000), dec!(5), -1),
        Err(AdvanceError::InvalidLoanParameters { .. })
    ));
}

// ===========================================================================
// Loan analysis
// ===========================================================================

#[test]
fn test_analysis_without_schedule_accepts_long_terms() {
    let terms = LoanTerms {
        principal: dec!(1000),
        annual_rate_percent: Decimal::ZERO,
        term_months: 1500,
    };
    let out = amortization::analyze_loan(&terms, false).unwrap();
    assert_eq!(out.result.total_repayable, dec!(1000));
    assert_eq!(
        out.result.total_repayable,
        amortization::total_repayable(dec!(1000), Decimal::ZERO, 1500).unwrap()
    );
    assert!(out.result.schedule.is_none());

    assert!(matches!(
        amortization::analyze_loan(&terms, true),
        Err(AdvanceError::InvalidLoanParameters { .. })
    ));
}

#[test]
fn test_payment_rounding_to_zero_is_flagged() {
    let terms = LoanTerms {
        principal: dec!(0.05),
        annual_rate_percent: dec!(5),
        term_months: 12,
    };
    let out = amortization::analyze_loan(&terms, true).unwrap();
    assert_eq!(out.result.monthly_payment, Decimal::ZERO);
    assert!(out.warnings.iter().any(|w| w.contains("rounds to 0.00")));

    let rows = out.result.schedule.unwrap();
    assert_eq!(rows.len(), 12);
    assert!(rows[..11].iter().all(|r| r.payment.is_zero()));
    assert!(rows[11].payment >= dec!(0.05));
    assert_eq!(rows[11].remaining_balance, Decimal::ZERO);
}
