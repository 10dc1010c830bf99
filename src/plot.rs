//! ASCII load chart for terminal output.
//!
//! Fixed-size grid, deterministic output:
//! - baseline series: `.`
//! - simulated series: `*`
//! - both on the same cell: `#`

const BASELINE: char = '.';
const SIMULATED: char = '*';
const OVERLAP: char = '#';

/// Renders baseline and simulated series sharing one x axis (interval index).
///
/// Series may differ in length; each is spread over the full width.
pub fn render_load_chart(
    baseline: &[f64],
    simulated: &[f64],
    unit: &str,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(baseline.iter().chain(simulated)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    draw_series(&mut grid, baseline, y_min, y_max, |cell| {
        if cell == ' ' { BASELINE } else { cell }
    });
    draw_series(&mut grid, simulated, y_min, y_max, |cell| match cell {
        BASELINE | OVERLAP => OVERLAP,
        _ => SIMULATED,
    });

    let n = baseline.len().max(simulated.len());
    let mut out = format!("Load: {n} intervals | y=[{y_min:.2}, {y_max:.2}] {unit}\n");
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn y_range<'a>(values: impl Iterator<Item = &'a f64>) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &y in values.filter(|y| y.is_finite()) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() {
        Some((min_y - 0.5, min_y + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // top row is the maximum
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_series(
    grid: &mut [Vec<char>],
    series: &[f64],
    y_min: f64,
    y_max: f64,
    mark: impl Fn(char) -> char,
) {
    let height = grid.len();
    let width = grid[0].len();
    let mut prev: Option<(usize, usize)> = None;
    for (i, &y) in series.iter().enumerate() {
        if !y.is_finite() {
            prev = None;
            continue;
        }
        let x = map_x(i, series.len(), width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, (x0, y0), (x, row), &mark),
            None => grid[row][x] = mark(grid[row][x]),
        }
        prev = Some((x, row));
    }
}

/// Integer line drawing (Bresenham).
fn draw_line(
    grid: &mut [Vec<char>],
    from: (usize, usize),
    to: (usize, usize),
    mark: &impl Fn(char) -> char,
) {
    let (mut x0, mut y0) = (from.0 as isize, from.1 as isize);
    let (x1, y1) = (to.0 as isize, to.1 as isize);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        let cell = &mut grid[y0 as usize][x0 as usize];
        *cell = mark(*cell);

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
