//! Cost units and sentinel identifiers shared by every search component.

/// Integer edge cost. Cell distances are scaled by [`ONE`].
pub type Cost = u32;

/// Address of a cell inside a padded grid.
pub type PaddedId = u32;

/// Cost of one cardinal step.
pub const ONE: Cost = 10_000;

/// Cost of one diagonal step, `ONE * sqrt(2)` truncated.
pub const ROOT_TWO: Cost = 14_142;

/// Distance reported for queries with no path.
pub const UNREACHABLE: Cost = Cost::MAX;

/// An id that never names a cell. Jumping towards it disables goal
/// interception.
pub const INVALID_ID: PaddedId = PaddedId::MAX;

/// Convert a scaled cost into grid units; [`UNREACHABLE`] becomes infinity.
pub fn cost_to_f64(cost: Cost) -> f64 {
    if cost == UNREACHABLE {
        f64::INFINITY
    } else {
        f64::from(cost) / f64::from(ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_conversion() {
        assert_eq!(cost_to_f64(3 * ONE), 3.0);
        assert!((cost_to_f64(ROOT_TWO) - 1.4142).abs() < 1e-9);
        assert!(cost_to_f64(UNREACHABLE).is_infinite());
    }
}
