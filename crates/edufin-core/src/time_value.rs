use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::EduFinError;
use crate::types::{Money, Rate};
use crate::EduFinResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_IRR_ITERATIONS: u32 = 100;

/// Net Present Value of a series of cash flows
pub fn npv(rate: Rate, cash_flows: &[Money]) -> EduFinResult<Money> {
    if rate <= dec!(-1) {
        return Err(EduFinError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    let mut result = Decimal::ZERO;
    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount *= one_plus_r;
        }
        if discount.is_zero() {
            return Err(EduFinError::DivisionByZero {
                context: format!("NPV discount factor at period {t}"),
            });
        }
        result += cf / discount;
    }

    Ok(result)
}

/// Internal Rate of Return using Newton-Raphson.
///
/// Discount factors are accumulated by iterative multiplication to avoid
/// precision drift from `powd`. Sign-invariant vectors (no positive or no
/// negative flow) cannot cross zero and fail fast as non-convergent.
pub fn irr(cash_flows: &[Money], guess: Rate) -> EduFinResult<Rate> {
    if cash_flows.len() < 2 {
        return Err(EduFinError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    let has_positive = cash_flows.iter().any(|cf| *cf > Decimal::ZERO);
    let has_negative = cash_flows.iter().any(|cf| *cf < Decimal::ZERO);
    if !has_positive || !has_negative {
        return Err(EduFinError::ConvergenceFailure {
            function: "IRR".into(),
            iterations: 0,
            last_delta: cash_flows.iter().sum(),
        });
    }

    let mut rate = guess;

    for i in 0..MAX_IRR_ITERATIONS {
        let mut npv_val = Decimal::ZERO;
        let mut dnpv = Decimal::ZERO;
        let one_plus_r = Decimal::ONE + rate;
        let mut discount = Decimal::ONE; // (1+r)^0
        let mut overflow = false;

        for (t, cf) in cash_flows.iter().enumerate() {
            if discount.is_zero() {
                break;
            }

            match cf.checked_div(discount) {
                Some(term) => npv_val += term,
                None => {
                    overflow = true;
                    break;
                }
            }

            if t > 0 {
                let t_dec = Decimal::from(t as i64);
                let denom = match discount.checked_mul(one_plus_r) {
                    Some(d) => d,
                    None => {
                        overflow = true;
                        break;
                    }
                };
                if !denom.is_zero() {
                    match t_dec.checked_mul(*cf).and_then(|n| n.checked_div(denom)) {
                        Some(term) => dnpv -= term,
                        None => {
                            overflow = true;
                            break;
                        }
                    }
                }
            }

            discount = match discount.checked_mul(one_plus_r) {
                Some(d) => d,
                None => {
                    overflow = true;
                    break;
                }
            };
        }

        // If overflow occurred, adjust rate towards zero and retry
        if overflow {
            rate /= dec!(2);
            continue;
        }

        if npv_val.abs() < CONVERGENCE_THRESHOLD {
            return Ok(rate);
        }

        if dnpv.is_zero() {
            return Err(EduFinError::ConvergenceFailure {
                function: "IRR".into(),
                iterations: i,
                last_delta: npv_val,
            });
        }

        rate -= npv_val / dnpv;

        // Guard against divergence
        if rate < dec!(-0.99) {
            rate = dec!(-0.99);
        } else if rate > dec!(10.0) {
            rate = dec!(10.0);
        }
    }

    Err(EduFinError::ConvergenceFailure {
        function: "IRR".into(),
        iterations: MAX_IRR_ITERATIONS,
        last_delta: npv(rate, cash_flows).unwrap_or(Decimal::MAX),
    })
}
