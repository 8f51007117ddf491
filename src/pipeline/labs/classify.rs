use crate::models::{Flag, NumericValue, ReferenceInterval};

/// Flag a value against its reference interval.
///
/// Pure and total. Interval edges count as normal (`Range` compares with
/// strict `<`/`>`). Only the magnitude is compared; an inequality qualifier
/// on the value does not shift the comparison.
pub fn classify(value: Option<&NumericValue>, reference: &ReferenceInterval) -> Flag {
    let Some(value) = value else {
        return Flag::Indeterminate;
    };
    let v = value.magnitude;
    if !v.is_finite() {
        return Flag::Indeterminate;
    }

    match *reference {
        ReferenceInterval::Range { low, high } => {
            if v < low {
                Flag::Low
            } else if v > high {
                Flag::High
            } else {
                Flag::Normal
            }
        }
        ReferenceInterval::UpperBound { high } => {
            if v <= high {
                Flag::Normal
            } else {
                Flag::High
            }
        }
        ReferenceInterval::LowerBound { low } => {
            if v >= low {
                Flag::Normal
            } else {
                Flag::Low
            }
        }
        ReferenceInterval::Unknown => Flag::Indeterminate,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn reference() -> impl Strategy<Value = ReferenceInterval> {
        prop_oneof![
            (-1e6f64..1e6, -1e6f64..1e6).prop_map(|(a, b)| ReferenceInterval::Range {
                low: a.min(b),
                high: a.max(b),
            }),
            (-1e6f64..1e6).prop_map(|high| ReferenceInterval::UpperBound { high }),
            (-1e6f64..1e6).prop_map(|low| ReferenceInterval::LowerBound { low }),
            Just(ReferenceInterval::Unknown),
        ]
    }

    proptest! {
        #[test]
        fn classify_is_pure(x in proptest::num::f64::ANY, r in reference()) {
            let value = NumericValue::exact(x);
            prop_assert_eq!(classify(Some(&value), &r), classify(Some(&value), &r));
        }

        #[test]
        fn values_inside_a_range_are_normal(
            a in -1e6f64..1e6,
            b in -1e6f64..1e6,
            t in 0.0f64..=1.0,
        ) {
            let (low, high) = (a.min(b), a.max(b));
            let x = (low + (high - low) * t).clamp(low, high);
            let r = ReferenceInterval::Range { low, high };
            prop_assert_eq!(classify(Some(&NumericValue::exact(x)), &r), Flag::Normal);
        }
    }
}
