//! Position derivation from signal flags.
//!
//! Two independent forward-filled state machines: the short side holds values
//! in {-1, 0}, the long side in {0, 1}. The first bar is forced to 0 on both
//! sides regardless of any flags there. When an enter and an exit flag fire on
//! the same bar, the exit wins. The position is the elementwise sum of the two
//! sides; simultaneously active long and short states therefore cancel to 0
//! instead of raising a conflict.

use crate::domain::signal::SignalFlags;

pub fn resolve_positions(flags: &SignalFlags) -> Vec<i32> {
    let n = flags.len();
    let mut positions = Vec::with_capacity(n);
    let mut short = 0i32;
    let mut long = 0i32;

    for i in 0..n {
        if i > 0 {
            if flags.short_enter[i] {
                short = -1;
            }
            if flags.short_exit[i] {
                short = 0;
            }
            if flags.long_enter[i] {
                long = 1;
            }
            if flags.long_exit[i] {
                long = 0;
            }
        }
        positions.push(short + long);
    }

    positions
}
