//! Pro-rata allocation of a transaction total across line items.
//!
//! The new-transaction form weights each line by market value times
//! quantity and previews the split live; the allocated line totals travel
//! with the create request.

/// Distribute `total_cents` across `weights` proportionally.
///
/// Uses largest-remainder rounding: floor every proportional share, then
/// hand the remaining cents to the largest fractional remainders, earlier
/// lines first on ties. The result always sums to exactly `total_cents`,
/// and each share is within one cent of its exact proportional value.
///
/// Negative weights count as zero; if every weight is zero the split is
/// equal. An empty slice yields an empty result.
pub fn allocate_pro_rata(total_cents: i64, weights: &[i64]) -> Vec<i64> {
    if weights.is_empty() {
        return Vec::new();
    }

    let mut effective: Vec<i64> = weights.iter().map(|w| (*w).max(0)).collect();
    if effective.iter().all(|w| *w == 0) {
        effective.fill(1);
    }
    let weight_sum: i128 = effective.iter().map(|w| i128::from(*w)).sum();

    let mut shares: Vec<i64> = Vec::with_capacity(effective.len());
    let mut remainders: Vec<(usize, i128)> = Vec::with_capacity(effective.len());
    for (index, weight) in effective.iter().enumerate() {
        let numerator = i128::from(total_cents) * i128::from(*weight);
        shares.push((numerator.div_euclid(weight_sum)) as i64);
        remainders.push((index, numerator.rem_euclid(weight_sum)));
    }

    let allocated: i64 = shares.iter().sum();
    let mut leftover = total_cents - allocated;
    remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (index, _) in remainders {
        if leftover == 0 {
            break;
        }
        shares[index] += 1;
        leftover -= 1;
    }
    shares
}

#[cfg(test)]
mod allocation_tests {
    use super::*;

    #[test]
    fn empty_weights_yield_empty_split() {
        assert!(allocate_pro_rata(1000, &[]).is_empty());
    }

    #[test]
    fn single_line_takes_the_total() {
        assert_eq!(allocate_pro_rata(999, &[17]), vec![999]);
    }

    #[test]
    fn exact_proportions_split_cleanly() {
        assert_eq!(allocate_pro_rata(300, &[1, 1, 1]), vec![100, 100, 100]);
        assert_eq!(allocate_pro_rata(900, &[2, 1]), vec![600, 300]);
    }

    #[test]
    fn remainder_goes_to_largest_fraction_first() {
        // Exact shares: 33.333..., 33.333..., 33.333... -> first line wins the
        // extra cent on the three-way tie.
        assert_eq!(allocate_pro_rata(100, &[1, 1, 1]), vec![34, 33, 33]);

        // Exact shares: 16.666..., 83.333... -> the first line has the larger
        // fractional part.
        assert_eq!(allocate_pro_rata(100, &[1, 5]), vec![17, 83]);
    }

    #[test]
    fn all_zero_weights_fall_back_to_equal_split() {
        assert_eq!(allocate_pro_rata(100, &[0, 0, 0]), vec![34, 33, 33]);
    }

    #[test]
    fn negative_weights_count_as_zero() {
        assert_eq!(allocate_pro_rata(100, &[-5, 1]), vec![0, 100]);
    }

    #[test]
    fn negative_total_still_sums_exactly() {
        let shares = allocate_pro_rata(-101, &[1, 1]);
        assert_eq!(shares.iter().sum::<i64>(), -101);
        assert_eq!(shares, vec![-50, -51]);
    }

    #[test]
    fn sums_exactly_across_many_cases() {
        let weight_sets: [&[i64]; 6] = [
            &[1],
            &[1, 2, 3],
            &[7, 11, 13, 17],
            &[100, 1],
            &[3, 3, 3, 3, 3, 3, 3],
            &[999_999, 1, 1],
        ];
        for total in [0, 1, 7, 99, 100, 101, 12_345, 1_000_000] {
            for weights in weight_sets {
                let shares = allocate_pro_rata(total, weights);
                assert_eq!(
                    shares.iter().sum::<i64>(),
                    total,
                    "total {total} weights {weights:?}"
                );
            }
        }
    }

    #[test]
    fn shares_stay_within_one_cent_of_exact() {
        let weights = [7, 11, 13, 17];
        let total = 12_345;
        let weight_sum: i64 = weights.iter().sum();
        let shares = allocate_pro_rata(total, &weights);
        for (share, weight) in shares.iter().zip(weights) {
            let exact = total as f64 * weight as f64 / weight_sum as f64;
            assert!(
                (*share as f64 - exact).abs() < 1.0,
                "share {share} vs exact {exact}"
            );
        }
    }
}
