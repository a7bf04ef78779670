//! Initial boxes before packing.
//!
//! Classes get their fixed footprint here. Containers get their height from
//! their children, while their footprint stays unknown until the packer has
//! arranged their children.

use skyline_core::structure::{Application, Component};

use crate::{error::SkylineError, layout::LayoutContext};

/// Footprint marker for containers that have not been packed yet.
pub(super) const UNSIZED: f32 = -1.0;

/// Creates an empty entry for every entity reachable from `application`.
pub(super) fn seed_application(
    application: &Application,
    context: &mut LayoutContext<'_>,
) -> Result<(), SkylineError> {
    context.seed(&application.id)?;
    for package in &application.packages {
        seed_component(package, context)?;
    }
    Ok(())
}

fn seed_component(
    component: &Component,
    context: &mut LayoutContext<'_>,
) -> Result<(), SkylineError> {
    context.seed(&component.id)?;
    for class in &component.classes {
        context.seed(&class.id)?;
    }
    for package in &component.sub_packages {
        seed_component(package, context)?;
    }
    Ok(())
}

/// Initializes every box bottom-up. Class heights must already be set.
pub(super) fn init_application(
    application: &Application,
    context: &mut LayoutContext<'_>,
) -> Result<(), SkylineError> {
    for package in &application.packages {
        init_component(package, context)?;
    }

    let height = context.dimensions().opened_component_height;
    let layout = context.layout_mut(&application.id)?;
    layout.height = height;
    layout.width = UNSIZED;
    layout.depth = UNSIZED;
    Ok(())
}

fn init_component(
    component: &Component,
    context: &mut LayoutContext<'_>,
) -> Result<(), SkylineError> {
    for package in &component.sub_packages {
        init_component(package, context)?;
    }

    let class_width = context.dimensions().class_width;
    for class in &component.classes {
        let layout = context.layout_mut(&class.id)?;
        layout.width = class_width;
        layout.depth = class_width;
    }

    let height = component_height(component, context)?;
    let layout = context.layout_mut(&component.id)?;
    layout.height = height;
    layout.width = UNSIZED;
    layout.depth = UNSIZED;
    Ok(())
}

/// Height of a package: its tallest child, at least one floor, plus a margin.
fn component_height(
    component: &Component,
    context: &LayoutContext<'_>,
) -> Result<f32, SkylineError> {
    let dimensions = context.dimensions();
    let child_ids = component
        .classes
        .iter()
        .map(|class| &class.id)
        .chain(component.sub_packages.iter().map(|package| &package.id));

    let mut tallest = dimensions.floor_height;
    for id in child_ids {
        tallest = tallest.max(context.layout(id)?.height);
    }
    Ok(tallest + dimensions.container_height_margin)
}
