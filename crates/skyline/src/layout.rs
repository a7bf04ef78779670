//! City layout computation.
//!
//! A layout is computed in a fixed sequence of passes over the structure tree:
//!
//! 1. [`boxes::seed_application`] creates one entry per entity.
//! 2. [`height::apply_class_heights`] derives class heights from trace data.
//! 3. [`boxes::init_application`] sets class footprints and container heights.
//! 4. [`packer::pack_application`] arranges children inside each container, bottom-up.
//! 5. [`position::resolve_application`] turns relative offsets into absolute positions, top-down.
//! 6. [`scale::apply_scale`] converts footprints and ground positions to rendering units.
//!
//! Every pass reads the tree and updates a shared [`LayoutContext`]; nothing
//! survives a call to [`compute`].

mod boxes;
mod height;
mod packer;
mod position;
mod scale;

pub use height::{Categories, CategoryStrategy, count_instances};

use log::{debug, info};

use skyline_core::{
    city::{CityLayout, ComponentLayout},
    identifier::Id,
    structure::{Application, Class, Component},
    trace::Trace,
};

use crate::{
    config::{Dimensions, LayoutConfig},
    error::SkylineError,
};

/// Mutable state threaded through the layout passes.
#[derive(Debug)]
pub(crate) struct LayoutContext<'c> {
    city: CityLayout,
    dimensions: &'c Dimensions,
}

impl<'c> LayoutContext<'c> {
    pub(crate) fn new(dimensions: &'c Dimensions, capacity: usize) -> Self {
        Self {
            city: CityLayout::with_capacity(capacity),
            dimensions,
        }
    }

    pub(crate) fn dimensions(&self) -> &'c Dimensions {
        self.dimensions
    }

    /// Creates the entry for `id`. Each id may be seeded only once.
    pub(crate) fn seed(&mut self, id: &Id) -> Result<(), SkylineError> {
        if self.city.contains(id) {
            return Err(SkylineError::DuplicateId(id.clone()));
        }
        self.city.insert(id.clone(), ComponentLayout::default());
        Ok(())
    }

    pub(crate) fn layout(&self, id: &Id) -> Result<&ComponentLayout, SkylineError> {
        self.city
            .get(id)
            .ok_or_else(|| SkylineError::MissingLayout(id.clone()))
    }

    pub(crate) fn layout_mut(&mut self, id: &Id) -> Result<&mut ComponentLayout, SkylineError> {
        self.city
            .get_mut(id)
            .ok_or_else(|| SkylineError::MissingLayout(id.clone()))
    }

    pub(crate) fn city_mut(&mut self) -> &mut CityLayout {
        &mut self.city
    }

    pub(crate) fn into_city(self) -> CityLayout {
        self.city
    }
}

/// A direct child of a container, as seen by the packing and positioning passes.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ChildRef<'a> {
    Class(&'a Class),
    Package(&'a Component),
}

impl<'a> ChildRef<'a> {
    pub(crate) fn id(self) -> &'a Id {
        match self {
            Self::Class(class) => &class.id,
            Self::Package(package) => &package.id,
        }
    }

    pub(crate) fn name(self) -> &'a str {
        match self {
            Self::Class(class) => &class.name,
            Self::Package(package) => &package.name,
        }
    }

    /// Classes of a package followed by its sub-packages.
    pub(crate) fn children_of(component: &'a Component) -> Vec<Self> {
        component
            .classes
            .iter()
            .map(Self::Class)
            .chain(component.sub_packages.iter().map(Self::Package))
            .collect()
    }
}

/// Runs every layout pass for `application` and returns the finished layout.
///
/// # Errors
///
/// Returns [`SkylineError::DuplicateId`] when an id occurs twice in the tree and
/// [`SkylineError::MissingLayout`] when a pass reaches an entity that was never seeded.
pub(crate) fn compute(
    application: &Application,
    traces: &[Trace],
    config: &LayoutConfig,
) -> Result<CityLayout, SkylineError> {
    let entity_count = application.entity_count();
    info!(
        application = application.name,
        entities = entity_count,
        traces = traces.len();
        "Computing city layout"
    );

    let mut context = LayoutContext::new(config.dimensions(), entity_count);

    boxes::seed_application(application, &mut context)?;
    height::apply_class_heights(application, traces, config.category_strategy(), &mut context)?;
    debug!(strategy:? = config.category_strategy(); "Class heights assigned");

    boxes::init_application(application, &mut context)?;
    packer::pack_application(application, &mut context)?;
    debug!("Containers packed");

    position::resolve_application(application, &mut context)?;
    scale::apply_scale(&mut context);

    let city = context.into_city();
    info!(boxes = city.len(); "City layout computed");
    Ok(city)
}
