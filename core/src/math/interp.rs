/// Piecewise-linear interpolation of `(xp, fp)` at each point of `grid`.
///
/// `xp` must be strictly increasing and `grid` ascending. Points outside the observed
/// range take the nearest end value.
pub fn interp_sorted(grid: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    debug_assert_eq!(xp.len(), fp.len());
    let (Some(&first_x), Some(&last_x)) = (xp.first(), xp.last()) else {
        return vec![f64::NAN; grid.len()];
    };

    let mut out = Vec::with_capacity(grid.len());
    let mut upper = 1;
    for &x in grid {
        if x <= first_x {
            out.push(fp[0]);
            continue;
        }
        if x >= last_x {
            out.push(fp[fp.len() - 1]);
            continue;
        }
        while xp[upper] < x {
            upper += 1;
        }
        if xp[upper] == x {
            out.push(fp[upper]);
            continue;
        }
        let lower = upper - 1;
        let span = xp[upper] - xp[lower];
        let weight = (x - xp[lower]) / span;
        out.push(fp[lower] + weight * (fp[upper] - fp[lower]));
    }
    out
}
