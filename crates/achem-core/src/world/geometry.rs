//! Square-grid geometry: distances, bond crossing, enzyme range edges
//!
//! Pure functions over integer coordinates. Grid bounds are applied by
//! [`super::SquareMap`], which wraps these for `Location`s.

use glam::IVec2;

/// Chebyshev distance: one step in any of the 8 directions costs 1
pub fn chebyshev(a: IVec2, b: IVec2) -> i32 {
    let d = (a - b).abs();
    d.x.max(d.y)
}

/// Exact slope of a segment. Vertical segments get their own variant instead
/// of a division by zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slope {
    Vertical,
    /// Reduced fraction rise/run with run > 0
    Finite { rise: i32, run: i32 },
}

impl Slope {
    pub fn between(a: IVec2, b: IVec2) -> Self {
        let d = b - a;
        if d.x == 0 {
            return Slope::Vertical;
        }
        let g = gcd(d.x.abs(), d.y.abs());
        let sign = d.x.signum();
        Slope::Finite {
            rise: d.y / g * sign,
            run: d.x.abs() / g,
        }
    }
}

fn gcd(mut a: i32, mut b: i32) -> i32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Whether the coordinate ranges of two segments overlap along one axis.
///
/// Ranges that only touch at an end do not count. A zero-width range (the
/// segment is perpendicular to this axis) must sit strictly inside the other.
fn interwoven(a: (i32, i32), b: (i32, i32)) -> bool {
    let (a_lo, a_hi) = (a.0.min(a.1), a.0.max(a.1));
    let (b_lo, b_hi) = (b.0.min(b.1), b.0.max(b.1));

    if a_lo == a_hi {
        return b_lo < a_lo && a_lo < b_hi;
    }
    if b_lo == b_hi {
        return a_lo < b_lo && b_lo < a_hi;
    }
    a_lo.max(b_lo) < a_hi.min(b_hi)
}

/// Whether bond segment (a1, a2) crosses bond segment (b1, b2).
///
/// Approximation valid for short grid bonds (length <= 2): the segments cross
/// when their ranges interweave on both axes and they are not parallel.
pub fn crossed(a1: IVec2, a2: IVec2, b1: IVec2, b2: IVec2) -> bool {
    interwoven((a1.x, a2.x), (b1.x, b2.x))
        && interwoven((a1.y, a2.y), (b1.y, b2.y))
        && Slope::between(a1, a2) != Slope::between(b1, b2)
}

/// Cells that enter the square range of radius `range` around an atom moving
/// one step from `start` to `end`: the leading column and/or row of the ring
/// at distance `range` from `end`. The shared corner of a diagonal move is
/// listed once. Not clipped to any grid.
pub fn newly_in_range(start: IVec2, end: IVec2, range: i32) -> Vec<IVec2> {
    let step_x = (end.x - start.x).signum();
    let step_y = (end.y - start.y).signum();
    let mut cells = Vec::new();

    if step_x != 0 {
        let x = end.x + step_x * range;
        for y in end.y - range..=end.y + range {
            cells.push(IVec2::new(x, y));
        }
    }

    if step_y != 0 {
        let y = end.y + step_y * range;
        let corner_x = end.x + step_x * range;
        for x in end.x - range..=end.x + range {
            if step_x != 0 && x == corner_x {
                continue;
            }
            cells.push(IVec2::new(x, y));
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: i32, y: i32) -> IVec2 {
        IVec2::new(x, y)
    }

    #[test]
    fn test_chebyshev_symmetric() {
        for (a, b) in [(v(0, 0), v(3, 1)), (v(5, 5), v(2, 9)), (v(1, 1), v(1, 1))] {
            assert_eq!(chebyshev(a, b), chebyshev(b, a));
        }
        assert_eq!(chebyshev(v(0, 0), v(3, 1)), 3);
        assert_eq!(chebyshev(v(4, 4), v(4, 4)), 0);
        assert_eq!(chebyshev(v(0, 0), v(1, 1)), 1);
    }

    #[test]
    fn test_slope_reduction() {
        assert_eq!(Slope::between(v(0, 0), v(0, 2)), Slope::Vertical);
        assert_eq!(Slope::between(v(0, 0), v(2, 0)), Slope::between(v(5, 3), v(4, 3)));
        assert_eq!(
            Slope::between(v(0, 0), v(2, 2)),
            Slope::Finite { rise: 1, run: 1 }
        );
        // Direction does not matter
        assert_eq!(Slope::between(v(2, 1), v(0, 0)), Slope::between(v(0, 0), v(2, 1)));
    }

    #[test]
    fn test_diagonal_x_crosses() {
        assert!(crossed(v(0, 0), v(1, 1), v(1, 0), v(0, 1)));
    }

    #[test]
    fn test_plus_crosses() {
        assert!(crossed(v(0, 1), v(2, 1), v(1, 0), v(1, 2)));
    }

    #[test]
    fn test_parallel_never_crosses() {
        assert!(!crossed(v(0, 0), v(1, 1), v(1, 0), v(2, 1)));
        assert!(!crossed(v(0, 0), v(0, 2), v(0, 1), v(0, 2)));
    }

    #[test]
    fn test_touching_ranges_do_not_cross() {
        // Share only the x = 1 column boundary
        assert!(!crossed(v(0, 0), v(1, 0), v(1, 1), v(2, 0)));
    }

    #[test]
    fn test_knight_bond_crossing_vertical() {
        assert!(crossed(v(0, 0), v(2, 1), v(1, 0), v(1, 1)));
    }

    #[test]
    fn test_crossed_commutative_exhaustive() {
        let cells: Vec<IVec2> = (0..3).flat_map(|x| (0..3).map(move |y| v(x, y))).collect();
        for &a1 in &cells {
            for &a2 in &cells {
                if a1 == a2 {
                    continue;
                }
                for &b1 in &cells {
                    for &b2 in &cells {
                        if b1 == b2 {
                            continue;
                        }
                        assert_eq!(
                            crossed(a1, a2, b1, b2),
                            crossed(b1, b2, a1, a2),
                            "{a1} {a2} vs {b1} {b2}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_no_axis_overlap_never_crosses() {
        // Disjoint on X
        assert!(!crossed(v(0, 0), v(1, 1), v(3, 0), v(4, 1)));
        // Disjoint on Y
        assert!(!crossed(v(0, 0), v(2, 1), v(0, 3), v(2, 2)));
    }

    #[test]
    fn test_newly_in_range_orthogonal() {
        let start = v(10, 10);
        let end = v(11, 10);
        let cells = newly_in_range(start, end, 2);

        assert_eq!(cells.len(), 5);
        for cell in &cells {
            assert_eq!(cell.x, 13);
            assert_eq!(chebyshev(*cell, end), 2);
            assert!(chebyshev(*cell, start) > 2);
        }
    }

    #[test]
    fn test_newly_in_range_diagonal_counts_corner_once() {
        let start = v(10, 10);
        let end = v(9, 11);
        let range = 3;
        let cells = newly_in_range(start, end, range);

        // Column of 2r+1 plus row of 2r+1 minus the shared corner
        assert_eq!(cells.len(), (4 * range + 1) as usize);
        let corner = v(9 - range, 11 + range);
        assert_eq!(cells.iter().filter(|&&c| c == corner).count(), 1);
        for cell in &cells {
            assert_eq!(chebyshev(*cell, end), range);
            assert!(chebyshev(*cell, start) > range);
        }
    }

    #[test]
    fn test_newly_in_range_no_movement() {
        assert!(newly_in_range(v(4, 4), v(4, 4), 3).is_empty());
    }
}
