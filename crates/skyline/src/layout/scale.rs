//! Conversion to rendering units.

use crate::layout::LayoutContext;

/// Scales footprints and ground positions of every box. Heights and elevations are untouched.
pub(super) fn apply_scale(context: &mut LayoutContext<'_>) {
    let scale = context.dimensions().scale;
    for (_, layout) in context.city_mut().iter_mut() {
        layout.set_position(layout.position().scale(scale));
        layout.set_size(layout.size().scale(scale));
    }
}
