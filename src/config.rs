/// Tunables for the layout algorithms that have no natural home in a [Style](crate::Style).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// The maximum number of candidate heights [ColumnBox](crate::ColumnBox) tries while
    /// balancing its columns before settling on the best height found so far.
    ///
    /// Defaults to `40`.
    pub balance_max_tries: usize,

    /// Column balancing stops once the smallest height known to fit and the largest
    /// height known not to fit are closer than this.
    ///
    /// Defaults to `10.0`.
    pub balance_tolerance: f32,

    /// The width of a tab character, in multiples of the width of a space.
    ///
    /// Defaults to `4`.
    pub tab_size: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            balance_max_tries: 40,
            balance_tolerance: 10.0,
            tab_size: 4,
        }
    }
}
