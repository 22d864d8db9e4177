use ndarray::{s, Array2, LinalgScalar};

/// Reduces the leading `pivot_cols` columns of `array` to reduced row echelon
/// form, applying the same row operations to the remaining columns.
///
/// Returns the pivot column of each of the leading rows. The number of pivots
/// is the rank of the leading columns; the rows below it are zero in those
/// columns.
pub fn gauss_reduction<A: LinalgScalar + PartialEq>(
    array: &mut Array2<A>,
    pivot_cols: usize,
) -> Vec<usize> {
    let (n, m) = array.dim();
    let mut pivots = Vec::with_capacity(n.min(pivot_cols));

    for j in 0..pivot_cols.min(m) {
        let rank = pivots.len();
        if rank == n {
            break;
        }
        // Find non-zero element in current column
        let Some(k) = array
            .slice(s![rank.., j])
            .iter()
            .position(|x| !x.is_zero())
            .map(|t| rank + t)
        else {
            // free column
            continue;
        };

        if k != rank {
            for t in j..m {
                array.swap([rank, t], [k, t]);
            }
        }

        // Make a 1 by dividing
        let x = array[[rank, j]];
        if !x.is_one() {
            for t in j..m {
                array[[rank, t]] = array[[rank, t]] / x;
            }
        }

        // Clear the column in every other row
        for t in (0..n).filter(|&t| t != rank) {
            let x = array[[t, j]];
            if !x.is_zero() {
                for u in j..m {
                    array[[t, u]] = array[[t, u]] - x * array[[rank, u]];
                }
            }
        }

        pivots.push(j);
    }

    pivots
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gf2::GF2;
    use ndarray::arr2;
    use num_traits::{One, Zero};

    #[test]
    fn gauss() {
        let i = GF2::one();
        let o = GF2::zero();
        let mut a = arr2(&[
            [i, o, i, i, i, o, i, o, i],
            [i, i, o, o, i, i, o, i, o],
            [i, i, i, o, o, i, i, o, i],
        ]);
        assert_eq!(gauss_reduction(&mut a, 3), [0, 1, 2]);
        let expected = arr2(&[
            [i, o, o, i, o, o, o, i, o],
            [o, i, o, i, i, i, o, o, o],
            [o, o, i, o, i, o, i, i, i],
        ]);
        assert_eq!(&a, &expected);
    }

    #[test]
    fn rank_deficient() {
        let i = GF2::one();
        let o = GF2::zero();
        // third row is the sum of the first two
        let mut a = arr2(&[
            [i, i, o, i, o],
            [o, i, i, o, i],
            [i, o, i, i, i],
        ]);
        assert_eq!(gauss_reduction(&mut a, 3), [0, 1]);
        let expected = arr2(&[
            [i, o, i, i, i],
            [o, i, i, o, i],
            [o, o, o, o, o],
        ]);
        assert_eq!(&a, &expected);
    }
}
