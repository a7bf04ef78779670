//! Absolute positions.
//!
//! After packing, every child position is an offset from its container's
//! corner. This pass walks the tree from the application down and adds each
//! container's absolute position to its children. Every level of nesting is
//! lifted by one opened-component height.

use skyline_core::{
    geometry::Point,
    identifier::Id,
    structure::{Application, Component},
};

use crate::{error::SkylineError, layout::LayoutContext};

/// Absolute placement of a container that its children are resolved against.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    corner: Point,
    elevation: f32,
}

/// Resolves the absolute position of every entity below `application`.
pub(super) fn resolve_application(
    application: &Application,
    context: &mut LayoutContext<'_>,
) -> Result<(), SkylineError> {
    let root = context.layout(&application.id)?;
    let anchor = Anchor {
        corner: root.position(),
        elevation: root.position_y,
    };

    for package in &application.packages {
        resolve_component(package, anchor, context)?;
    }
    Ok(())
}

fn resolve_component(
    component: &Component,
    parent: Anchor,
    context: &mut LayoutContext<'_>,
) -> Result<(), SkylineError> {
    let anchor = resolve_child(&component.id, parent, context)?;

    for class in &component.classes {
        resolve_child(&class.id, anchor, context)?;
    }
    for package in &component.sub_packages {
        resolve_component(package, anchor, context)?;
    }
    Ok(())
}

/// Moves `id` from parent-relative to absolute coordinates and returns its anchor.
fn resolve_child(
    id: &Id,
    parent: Anchor,
    context: &mut LayoutContext<'_>,
) -> Result<Anchor, SkylineError> {
    let step = context.dimensions().opened_component_height;
    let layout = context.layout_mut(id)?;

    layout.set_position(layout.position().add_point(parent.corner));
    layout.position_y = parent.elevation + step;

    Ok(Anchor {
        corner: layout.position(),
        elevation: layout.position_y,
    })
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use skyline_core::structure::Class;

    use super::*;
    use crate::config::Dimensions;

    fn two_level_application() -> Application {
        Application::new("r-app", "app").with_package(
            Component::new("r-outer", "outer")
                .with_class(Class::new("r-c1", "C1"))
                .with_sub_package(
                    Component::new("r-inner", "inner").with_class(Class::new("r-c2", "C2")),
                ),
        )
    }

    fn set_local(context: &mut LayoutContext<'_>, id: &str, x: f32, z: f32) {
        context
            .layout_mut(&Id::new(id))
            .unwrap()
            .set_position(Point::new(x, z));
    }

    #[test]
    fn test_offsets_accumulate() {
        let app = two_level_application();
        let dimensions = Dimensions::default();
        let mut context = LayoutContext::new(&dimensions, 5);
        for id in ["r-app", "r-outer", "r-c1", "r-inner", "r-c2"] {
            context.seed(&Id::new(id)).unwrap();
        }
        set_local(&mut context, "r-outer", 8.0, 4.0);
        set_local(&mut context, "r-c1", 8.0, 4.0);
        set_local(&mut context, "r-inner", 18.0, 4.0);
        set_local(&mut context, "r-c2", 8.0, 4.0);

        resolve_application(&app, &mut context).unwrap();

        let outer = context.layout(&Id::new("r-outer")).unwrap();
        assert_approx_eq!(f32, outer.position_x, 8.0);
        assert_approx_eq!(f32, outer.position_z, 4.0);
        assert_approx_eq!(f32, outer.position_y, 1.5);

        let c1 = context.layout(&Id::new("r-c1")).unwrap();
        assert_approx_eq!(f32, c1.position_x, 16.0);
        assert_approx_eq!(f32, c1.position_z, 8.0);
        assert_approx_eq!(f32, c1.position_y, 3.0);

        let c2 = context.layout(&Id::new("r-c2")).unwrap();
        assert_approx_eq!(f32, c2.position_x, 34.0);
        assert_approx_eq!(f32, c2.position_z, 12.0);
        assert_approx_eq!(f32, c2.position_y, 4.5);
    }

    #[test]
    fn test_missing_entry_is_an_error() {
        let app = two_level_application();
        let dimensions = Dimensions::default();
        let mut context = LayoutContext::new(&dimensions, 2);
        context.seed(&Id::new("r-app")).unwrap();
        context.seed(&Id::new("r-outer")).unwrap();

        let result = resolve_application(&app, &mut context);
        assert!(
            matches!(&result, Err(SkylineError::MissingLayout(id)) if *id == "r-c1"),
            "unexpected result: {result:?}"
        );
    }
}
