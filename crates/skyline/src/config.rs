//! Configuration types for Skyline layouts.
//!
//! This module provides configuration structures that control how a city
//! layout is computed. All types implement [`serde::Deserialize`] for
//! flexible loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration root.
//! - [`LayoutConfig`] - Selects the [`CategoryStrategy`] and the [`Dimensions`].
//! - [`Dimensions`] - Sizes, paddings and unit conversion used by the passes.
//!
//! # Example
//!
//! ```
//! # use skyline::{CategoryStrategy, config::AppConfig};
//! // Use default configuration
//! let config = AppConfig::default();
//! assert_eq!(config.layout().category_strategy(), CategoryStrategy::Threshold);
//! assert_eq!(config.layout().dimensions().inset_space, 4.0);
//! ```

use serde::Deserialize;

use crate::layout::CategoryStrategy;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout configuration.
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }
}

/// Layout pass configuration.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LayoutConfig {
    /// How class instance counts are bucketed into height categories.
    #[serde(default)]
    category_strategy: CategoryStrategy,

    /// Sizes and paddings.
    #[serde(default)]
    dimensions: Dimensions,
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    ///
    /// # Arguments
    ///
    /// * `category_strategy` - Bucketing used by the height calculation.
    /// * `dimensions` - Sizes and paddings used by every pass.
    pub fn new(category_strategy: CategoryStrategy, dimensions: Dimensions) -> Self {
        Self {
            category_strategy,
            dimensions,
        }
    }

    /// Returns the [`CategoryStrategy`] for class heights.
    pub fn category_strategy(&self) -> CategoryStrategy {
        self.category_strategy
    }

    /// Returns the [`Dimensions`].
    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }
}

/// Sizes, paddings and the final unit conversion.
///
/// Fields missing from a configuration file keep their default value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    /// Footprint edge length of every class.
    pub class_width: f32,
    /// Height of a class in category 0.
    pub class_height_default: f32,
    /// Extra height per category step.
    pub class_height_step: f32,
    /// Minimum height of a package, one story.
    pub floor_height: f32,
    /// Added on top of the tallest child of a package.
    pub container_height_margin: f32,
    /// Padding around every packed rectangle.
    pub inset_space: f32,
    /// Elevation added per level of nesting, also the application height.
    pub opened_component_height: f32,
    /// Uniform factor applied to positions and footprints at the end.
    pub scale: f32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            class_width: 2.0,
            class_height_default: 1.5,
            class_height_step: 1.5,
            floor_height: 0.75 * 4.0,
            container_height_margin: 0.1,
            inset_space: 4.0,
            opened_component_height: 1.5,
            scale: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_default_dimensions() {
        let dimensions = Dimensions::default();
        assert_approx_eq!(f32, dimensions.floor_height, 3.0);
        assert_approx_eq!(f32, dimensions.class_width, 2.0);
        assert_approx_eq!(f32, dimensions.scale, 0.5);
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [layout]
            category_strategy = "linear"

            [layout.dimensions]
            inset_space = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.layout().category_strategy(), CategoryStrategy::Linear);
        assert_approx_eq!(f32, config.layout().dimensions().inset_space, 2.0);
        assert_approx_eq!(f32, config.layout().dimensions().class_width, 2.0);
    }

    #[test]
    fn test_deserialize_empty_toml() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(
            config.layout().category_strategy(),
            CategoryStrategy::Threshold
        );
        assert_eq!(config.layout().dimensions(), &Dimensions::default());
    }
}
