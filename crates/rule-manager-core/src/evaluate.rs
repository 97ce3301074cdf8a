//! Threshold rule evaluation

mod sealed {
    pub trait Sealed {}
}

/// Orderable numeric types accepted by [`evaluate_rule`].
///
/// Sealed: implemented for the primitive integer and float types only, so
/// non-numeric operands are rejected by the type checker instead of being
/// coerced.
pub trait Numeric: sealed::Sealed + PartialOrd + Copy {}

macro_rules! impl_numeric {
    ($($t:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}
            impl Numeric for $t {}
        )*
    };
}

impl_numeric!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// Return `true` when `value` meets or exceeds `threshold`.
///
/// Uses the native ordering of `T`. For floats that means IEEE-754
/// comparison: anything involving NaN is `false`.
pub fn evaluate_rule<T: Numeric>(value: T, threshold: T) -> bool {
    value >= threshold
}
