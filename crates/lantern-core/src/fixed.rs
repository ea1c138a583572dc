use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
pub type Fixed64 = I32F32;

/// Milliseconds on the session clock. Display delays are expressed in these.
pub type Millis = u64;

/// Convert an f64 to Fixed64. Use only for initialization, never per action.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_round_trips_through_fixed() {
        let p = f64_to_fixed64(0.8);
        assert!((p.to_num::<f64>() - 0.8).abs() < 1e-9);
        assert!(f64_to_fixed64(1.0) == Fixed64::from_num(1));
    }
}
