//! Binary space partition packing of container children.
//!
//! Each container lays out its direct children on the ground plane. The
//! children are placed, widest first, into a canvas large enough for the
//! worst case (all children side by side in both directions). The canvas is a
//! tree of [`LayoutSegment`]s: placing a rectangle into a free segment splits
//! it into the placed rectangle, a strip to its right and a strip below it.
//!
//! A rectangle may fit into several free segments. The search visits both
//! remainder strips of every used segment, tentatively splitting wherever the
//! rectangle fits, keeps the candidate that grows the layout least and undoes
//! the split of the rejected one.
//!
//! The container's own footprint is the bounding box of what was actually
//! placed, not the worst-case canvas, plus label space on the x axis.

use std::cmp::Ordering;

use log::{trace, warn};

use skyline_core::{
    geometry::{Point, Rect, Size},
    structure::{Application, Component},
};

use crate::{
    error::SkylineError,
    layout::{ChildRef, LayoutContext},
};

/// Widths closer than this are considered equal when ordering children.
const WIDTH_RESOLUTION: f32 = 1e-5;

/// Index of a segment within a [`SegmentArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SegmentId(usize);

/// A rectangular region of the packing canvas.
///
/// An unused segment is always a leaf; a used one has been split and its
/// remaining free space lives in its children.
#[derive(Debug, Clone)]
struct LayoutSegment {
    lower_child: Option<SegmentId>,
    upper_right_child: Option<SegmentId>,
    start_x: f32,
    start_z: f32,
    width: f32,
    height: f32,
    used: bool,
}

impl LayoutSegment {
    fn free(start_x: f32, start_z: f32, width: f32, height: f32) -> Self {
        Self {
            lower_child: None,
            upper_right_child: None,
            start_x,
            start_z,
            width,
            height,
            used: false,
        }
    }

    fn fits(&self, size: Size) -> bool {
        Size::new(self.width, self.height).contains(size)
    }
}

/// A tentatively placed rectangle.
///
/// `split` is the segment that was split to make room for it; undoing that
/// split releases the rectangle again.
#[derive(Debug, Clone, Copy)]
struct Placement {
    rect: Rect,
    split: SegmentId,
}

/// Owns every segment of a single packing call.
///
/// Segments detached by [`SegmentArena::undo`] go on a free list and are
/// reused, so rejected trial splits do not grow the arena.
#[derive(Debug)]
struct SegmentArena {
    segments: Vec<LayoutSegment>,
    free: Vec<SegmentId>,
}

impl SegmentArena {
    const ROOT: SegmentId = SegmentId(0);

    /// Creates an arena whose root segment covers `canvas`.
    fn new(canvas: Size) -> Self {
        Self {
            segments: vec![LayoutSegment::free(0.0, 0.0, canvas.width(), canvas.depth())],
            free: Vec::new(),
        }
    }

    fn segment(&self, id: SegmentId) -> &LayoutSegment {
        &self.segments[id.0]
    }

    fn segment_mut(&mut self, id: SegmentId) -> &mut LayoutSegment {
        &mut self.segments[id.0]
    }

    fn alloc(&mut self, segment: LayoutSegment) -> SegmentId {
        if let Some(id) = self.free.pop() {
            *self.segment_mut(id) = segment;
            return id;
        }
        self.segments.push(segment);
        SegmentId(self.segments.len() - 1)
    }

    /// Places a rectangle of `size` anywhere on the canvas.
    fn insert(&mut self, size: Size) -> Option<Rect> {
        self.insert_fitting(Self::ROOT, size)
            .map(|placement| placement.rect)
    }

    fn insert_fitting(&mut self, id: SegmentId, size: Size) -> Option<Placement> {
        let segment = self.segment(id);
        if !segment.used && segment.fits(size) {
            return Some(self.split(id, size));
        }

        let (upper_right, lower) = (segment.upper_right_child, segment.lower_child);
        let from_upper = upper_right.and_then(|child| self.insert_fitting(child, size));
        let from_lower = lower.and_then(|child| self.insert_fitting(child, size));

        match (from_upper, from_lower) {
            (None, lower) => lower,
            (upper, None) => upper,
            (Some(upper), Some(lower)) => {
                // Prefer the candidate that keeps the layout more compact.
                if upper.rect.max_x() <= lower.rect.max_z() {
                    self.undo(lower.split);
                    Some(upper)
                } else {
                    self.undo(upper.split);
                    Some(lower)
                }
            }
        }
    }

    /// Splits the free segment `id` into the placed rectangle and up to two remainders.
    fn split(&mut self, id: SegmentId, size: Size) -> Placement {
        let segment = self.segment(id).clone();

        let upper_right = LayoutSegment::free(
            segment.start_x + size.width(),
            segment.start_z,
            segment.width - size.width(),
            size.depth(),
        );
        let lower = LayoutSegment::free(
            segment.start_x,
            segment.start_z + size.depth(),
            segment.width,
            segment.height - size.depth(),
        );

        let upper_right = (upper_right.width > 0.0).then(|| self.alloc(upper_right));
        let lower = (lower.height > 0.0).then(|| self.alloc(lower));

        let segment_mut = self.segment_mut(id);
        segment_mut.upper_right_child = upper_right;
        segment_mut.lower_child = lower;
        segment_mut.used = true;

        Placement {
            rect: Rect::new(Point::new(segment.start_x, segment.start_z), size),
            split: id,
        }
    }

    /// Reverts the split of `id`, making it a free leaf again.
    ///
    /// The detached children are leaves created by that split and are
    /// returned to the free list.
    fn undo(&mut self, id: SegmentId) {
        let segment = self.segment_mut(id);
        segment.used = false;
        let children = [segment.upper_right_child.take(), segment.lower_child.take()];
        self.free.extend(children.into_iter().flatten());
    }
}

/// Packs every container of the application, innermost first.
pub(super) fn pack_application(
    application: &Application,
    context: &mut LayoutContext<'_>,
) -> Result<(), SkylineError> {
    for package in &application.packages {
        pack_component(package, context)?;
    }

    let children: Vec<_> = application
        .packages
        .iter()
        .map(ChildRef::Package)
        .collect();
    let size = pack_children(&children, context)?;
    context.layout_mut(&application.id)?.set_size(size);

    trace!(
        container = application.name,
        children = children.len(),
        width = size.width(),
        depth = size.depth();
        "Packed application"
    );
    Ok(())
}

fn pack_component(
    component: &Component,
    context: &mut LayoutContext<'_>,
) -> Result<(), SkylineError> {
    for package in &component.sub_packages {
        pack_component(package, context)?;
    }

    let children = ChildRef::children_of(component);
    let size = pack_children(&children, context)?;
    context.layout_mut(&component.id)?.set_size(size);

    trace!(
        container = component.name,
        children = children.len(),
        width = size.width(),
        depth = size.depth();
        "Packed package"
    );
    Ok(())
}

/// Orders children widest first, equal widths by name.
fn compare_children(a: &(ChildRef<'_>, Size), b: &(ChildRef<'_>, Size)) -> Ordering {
    let width_key = |size: Size| (size.width() / WIDTH_RESOLUTION).round() as i64;
    width_key(b.1)
        .cmp(&width_key(a.1))
        .then_with(|| a.0.name().cmp(b.0.name()))
}

/// Places `children` relative to their container and returns the container footprint.
///
/// Child positions are written to the context as offsets from the container's
/// top-left corner.
fn pack_children(
    children: &[ChildRef<'_>],
    context: &mut LayoutContext<'_>,
) -> Result<Size, SkylineError> {
    let inset = context.dimensions().inset_space;

    if children.is_empty() {
        return Ok(Size::new(inset, inset));
    }

    let mut entries = children
        .iter()
        .map(|&child| Ok((child, context.layout(child.id())?.size())))
        .collect::<Result<Vec<_>, SkylineError>>()?;
    entries.sort_by(compare_children);

    let canvas = entries.iter().fold(Size::default(), |canvas, (_, size)| {
        let padded = size.add_inset(inset);
        Size::new(canvas.width() + padded.width(), canvas.depth() + padded.depth())
    });
    let mut arena = SegmentArena::new(canvas);

    let (mut max_x, mut max_z) = (0.0_f32, 0.0_f32);
    for (child, size) in &entries {
        let placed = arena.insert(size.add_inset(inset));
        let layout = context.layout_mut(child.id())?;
        layout.position_y = 0.0;

        match placed {
            Some(rect) => {
                // Inside the padding on both axes, shifted right once more for the label.
                layout.set_position(rect.origin().add_point(Point::new(2.0 * inset, inset)));
                max_x = max_x.max(rect.max_x());
                max_z = max_z.max(rect.max_z());
            }
            None => {
                warn!(child = child.name(), width = size.width(), depth = size.depth(); "Child does not fit");
                layout.set_position(Point::default());
            }
        }
    }

    Ok(Size::new(max_x + inset, max_z))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use skyline_core::{identifier::Id, structure::Class};

    use super::*;
    use crate::config::Dimensions;

    fn square(edge: f32) -> Size {
        Size::new(edge, edge)
    }

    #[test]
    fn test_first_rectangle_goes_to_origin() {
        let mut arena = SegmentArena::new(square(20.0));
        let rect = arena.insert(square(10.0)).unwrap();
        assert_approx_eq!(f32, rect.min_x(), 0.0);
        assert_approx_eq!(f32, rect.min_z(), 0.0);
    }

    #[test]
    fn test_equal_squares_go_side_by_side() {
        let mut arena = SegmentArena::new(square(20.0));
        let first = arena.insert(square(10.0)).unwrap();
        let second = arena.insert(square(10.0)).unwrap();

        assert!(!first.intersects(second));
        assert_approx_eq!(f32, second.min_x(), 10.0);
        assert_approx_eq!(f32, second.min_z(), 0.0);
    }

    #[test]
    fn test_rejected_candidate_is_released() {
        let mut arena = SegmentArena::new(square(30.0));
        let rects: Vec<_> = (0..9).map(|_| arena.insert(square(10.0)).unwrap()).collect();

        // Nine squares fill the 3x3 canvas exactly once each.
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(*b), "{a:?} overlaps {b:?}");
            }
        }
        assert!(arena.insert(square(10.0)).is_none());
    }

    #[test]
    fn test_oversized_rectangle_does_not_fit() {
        let mut arena = SegmentArena::new(Size::new(10.0, 5.0));
        assert!(arena.insert(Size::new(10.5, 1.0)).is_none());
        assert!(arena.insert(Size::new(10.0, 5.0)).is_some());
    }

    #[test]
    fn test_undo_restores_leaf() {
        let mut arena = SegmentArena::new(square(20.0));
        let placement = arena.insert_fitting(SegmentArena::ROOT, square(5.0)).unwrap();
        arena.undo(placement.split);

        let root = arena.segment(SegmentArena::ROOT);
        assert!(!root.used);
        assert!(root.upper_right_child.is_none());
        assert!(root.lower_child.is_none());
    }

    #[test]
    fn test_undone_segments_are_reused() {
        let mut arena = SegmentArena::new(square(20.0));
        let placement = arena.insert_fitting(SegmentArena::ROOT, square(5.0)).unwrap();
        let len = arena.segments.len();

        arena.undo(placement.split);
        assert_eq!(arena.free.len(), 2);

        arena.insert(square(5.0)).unwrap();
        assert!(arena.free.is_empty());
        assert_eq!(arena.segments.len(), len);
    }

    #[test]
    fn test_every_segment_is_live_or_free() {
        let mut arena = SegmentArena::new(square(30.0));
        for _ in 0..9 {
            arena.insert(square(10.0)).unwrap();
        }

        let mut live = 0;
        let mut pending = vec![SegmentArena::ROOT];
        while let Some(id) = pending.pop() {
            assert!(!arena.free.contains(&id), "{id:?} is both live and free");
            live += 1;
            let segment = arena.segment(id);
            pending.extend(segment.upper_right_child);
            pending.extend(segment.lower_child);
        }
        assert_eq!(live + arena.free.len(), arena.segments.len());
    }

    fn package_with_classes(names: &[&str]) -> Component {
        names.iter().fold(Component::new("k-pkg", "pkg"), |package, name| {
            package.with_class(Class::new(format!("k-{name}").as_str(), *name))
        })
    }

    fn packed_context<'d>(package: &Component, dimensions: &'d Dimensions) -> LayoutContext<'d> {
        let mut context = LayoutContext::new(dimensions, package.classes.len() + 1);
        context.seed(&package.id).unwrap();
        for class in &package.classes {
            context.seed(&class.id).unwrap();
            context
                .layout_mut(&class.id)
                .unwrap()
                .set_size(square(dimensions.class_width));
        }
        pack_component(package, &mut context).unwrap();
        context
    }

    #[test]
    fn test_two_classes_side_by_side() {
        let package = package_with_classes(&["Beta", "Alpha"]);
        let dimensions = Dimensions::default();
        let context = packed_context(&package, &dimensions);

        // Equal widths are ordered by name, so Alpha is placed first.
        let alpha = context.layout(&Id::new("k-Alpha")).unwrap();
        let beta = context.layout(&Id::new("k-Beta")).unwrap();
        assert_approx_eq!(f32, alpha.position_x, 8.0);
        assert_approx_eq!(f32, alpha.position_z, 4.0);
        assert_approx_eq!(f32, beta.position_x, 18.0);
        assert_approx_eq!(f32, beta.position_z, 4.0);

        let package_box = context.layout(&Id::new("k-pkg")).unwrap();
        assert_approx_eq!(f32, package_box.width, 24.0);
        assert_approx_eq!(f32, package_box.depth, 10.0);
    }

    #[test]
    fn test_empty_package_gets_label_footprint() {
        let package = Component::new("k-empty", "empty");
        let dimensions = Dimensions::default();
        let context = packed_context(&package, &dimensions);

        let package_box = context.layout(&Id::new("k-empty")).unwrap();
        assert_approx_eq!(f32, package_box.width, 4.0);
        assert_approx_eq!(f32, package_box.depth, 4.0);
    }

    #[test]
    fn test_wider_children_first() {
        let dimensions = Dimensions::default();
        let package = Component::new("k-mixed", "mixed")
            .with_class(Class::new("k-small", "Small"))
            .with_sub_package(Component::new("k-wide", "Wide"));

        let mut context = LayoutContext::new(&dimensions, 3);
        for id in ["k-mixed", "k-small", "k-wide"] {
            context.seed(&Id::new(id)).unwrap();
        }
        context
            .layout_mut(&Id::new("k-small"))
            .unwrap()
            .set_size(square(2.0));

        pack_component(&package, &mut context).unwrap();

        // The empty sub-package is 4 wide after its own packing and goes first.
        let wide = context.layout(&Id::new("k-wide")).unwrap();
        assert_approx_eq!(f32, wide.width, 4.0);
        assert_approx_eq!(f32, wide.position_x, 8.0);
        assert_approx_eq!(f32, wide.position_z, 4.0);

        // Either right of or below the wide cell, which is 12 x 12 with padding.
        let small = context.layout(&Id::new("k-small")).unwrap();
        assert!(small.position_x >= 20.0 || small.position_z >= 16.0);
    }
}
