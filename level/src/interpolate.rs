//! Expansion of traced pixel routes into dense real-space paths.

use sneaky_doctor_core::{GridCell, RealPosition};

/// Expands a pixel route into one real position per real unit travelled.
///
/// Every pair of consecutive cells contributes `block_size` positions stepping
/// from the first cell towards the second; the last cell is appended once, so
/// a route of `n` cells yields `(n - 1) * block_size + 1` positions.
#[must_use]
pub fn interpolate(cells: &[GridCell], block_size: i32) -> Vec<RealPosition> {
    let Some(last) = cells.last() else {
        return Vec::new();
    };

    let mut positions = Vec::with_capacity((cells.len() - 1) * block_size as usize + 1);
    for pair in cells.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        debug_assert!(
            from.is_adjacent_to(to) || from == to,
            "route cells {from:?} and {to:?} are not adjacent"
        );
        let step_x = axis_step(from.column(), to.column());
        let step_y = axis_step(from.row(), to.row());
        let origin = from.to_real(block_size);
        positions.extend((0..block_size).map(|n| origin.offset(step_x * n, step_y * n)));
    }
    positions.push(last.to_real(block_size));
    positions
}

fn axis_step(from: u32, to: u32) -> i32 {
    (i64::from(to) - i64::from(from)).signum() as i32
}
