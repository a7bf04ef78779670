//! Class heights from observed instantiations.
//!
//! Every span in a trace that hits a constructor counts as one instantiation
//! of the class owning that constructor. The counts of all classes are then
//! bucketed into a handful of discrete categories, and the category of a class
//! decides how tall its building is.

use std::collections::HashMap;

use log::trace;
use serde::{Deserialize, Serialize};

use skyline_core::{identifier::Id, structure::Application, trace::Trace};

use crate::{error::SkylineError, layout::LayoutContext};

/// Top category values of the linear scale, indexed by band.
const LINEAR_SCALE: [f32; 5] = [0.0, 1.5, 2.5, 4.0, 6.5];

/// How instance counts are bucketed into height categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStrategy {
    /// Counts 0 and 1 are categories 0 and 1; larger counts fall into three
    /// equal-width bands up to the largest count, categories 2 to 4.
    #[default]
    Threshold,
    /// Non-zero counts fall into four equal-width bands up to the second
    /// largest count, mapped onto `0, 1.5, 2.5, 4.0, 6.5`. Counts above the
    /// second largest land in the top category.
    Linear,
}

impl CategoryStrategy {
    /// Computes the category of every distinct value in `counts`.
    pub fn categories(self, counts: &[u64]) -> Categories {
        let levels = match self {
            Self::Threshold => threshold_levels(counts),
            Self::Linear => linear_levels(counts),
        };
        Categories { levels }
    }
}

/// Category lookup produced by [`CategoryStrategy::categories`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Categories {
    levels: HashMap<u64, f32>,
}

impl Categories {
    /// Returns the category for `count`, or 0 when `count` was not part of the input.
    pub fn level(&self, count: u64) -> f32 {
        self.levels.get(&count).copied().unwrap_or_default()
    }
}

fn threshold_levels(counts: &[u64]) -> HashMap<u64, f32> {
    let max = counts
        .iter()
        .copied()
        .filter(|&count| count > 1)
        .max()
        .unwrap_or(1);
    let step = max as f32 / 3.0;
    let (t1, t2) = (step, step * 2.0);

    counts
        .iter()
        .map(|&count| {
            let level = match count {
                0 => 0.0,
                1 => 1.0,
                _ if count as f32 <= t1 => 2.0,
                _ if count as f32 <= t2 => 3.0,
                _ => 4.0,
            };
            (count, level)
        })
        .collect()
}

fn linear_levels(counts: &[u64]) -> HashMap<u64, f32> {
    let mut non_zero: Vec<u64> = counts.iter().copied().filter(|&count| count != 0).collect();
    non_zero.sort_unstable();

    // The running maximum only moves on strictly larger values, so the value it
    // leaves behind is the largest distinct count below the maximum.
    let (mut max, mut second_max) = (1, 1);
    for &count in &non_zero {
        if count > max {
            second_max = max;
            max = count;
        }
    }

    let step = second_max as f32 / 4.0;
    let thresholds = [step, step * 2.0, step * 3.0];

    counts
        .iter()
        .map(|&count| {
            let band = if count == 0 {
                0
            } else {
                1 + thresholds
                    .iter()
                    .take_while(|&&threshold| count as f32 > threshold)
                    .count()
            };
            (count, LINEAR_SCALE[band])
        })
        .collect()
}

/// Counts instantiations per class: the structure's own `instance_count` plus
/// every span whose hash code belongs to a constructor of that class.
///
/// When several methods share a hash code, the last one in tree order wins.
/// Hash codes that match no method are ignored.
pub fn count_instances(application: &Application, traces: &[Trace]) -> HashMap<Id, u64> {
    let classes = application.classes();

    let mut methods_by_hash = HashMap::new();
    for class in &classes {
        for method in &class.methods {
            methods_by_hash.insert(method.hash_code.as_str(), (&class.id, method.is_constructor()));
        }
    }

    let mut counts: HashMap<Id, u64> = classes
        .iter()
        .map(|class| (class.id.clone(), class.instance_count))
        .collect();

    for hash_code in traces.iter().flat_map(Trace::hash_codes) {
        if let Some(&(class_id, true)) = methods_by_hash.get(hash_code) {
            if let Some(count) = counts.get_mut(class_id) {
                *count += 1;
            }
        }
    }

    counts
}

/// Sets the height of every class entry in `context`.
pub(super) fn apply_class_heights(
    application: &Application,
    traces: &[Trace],
    strategy: CategoryStrategy,
    context: &mut LayoutContext<'_>,
) -> Result<(), SkylineError> {
    let dimensions = context.dimensions();
    let counts = count_instances(application, traces);

    let classes = application.classes();
    let class_counts: Vec<u64> = classes
        .iter()
        .map(|class| counts.get(&class.id).copied().unwrap_or_default())
        .collect();
    let categories = strategy.categories(&class_counts);

    for (class, &count) in classes.iter().zip(&class_counts) {
        let level = categories.level(count);
        let layout = context.layout_mut(&class.id)?;
        layout.height = dimensions.class_height_default + dimensions.class_height_step * level;
        trace!(class = class.name, instances = count, level; "Class height");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use skyline_core::{
        structure::{Class, Component, Method},
        trace::Span,
    };

    use super::*;

    #[test]
    fn test_threshold_small_values() {
        let categories = CategoryStrategy::Threshold.categories(&[0, 1, 0, 1]);
        assert_approx_eq!(f32, categories.level(0), 0.0);
        assert_approx_eq!(f32, categories.level(1), 1.0);
    }

    #[test]
    fn test_threshold_bands() {
        let categories = CategoryStrategy::Threshold.categories(&[0, 1, 2, 10, 20, 30]);
        // Bands of width 10 up to 30.
        assert_approx_eq!(f32, categories.level(2), 2.0);
        assert_approx_eq!(f32, categories.level(10), 2.0);
        assert_approx_eq!(f32, categories.level(20), 3.0);
        assert_approx_eq!(f32, categories.level(30), 4.0);
    }

    #[test]
    fn test_threshold_single_outlier() {
        let mut counts = vec![0; 9];
        counts.push(50);
        let categories = CategoryStrategy::Threshold.categories(&counts);
        assert_approx_eq!(f32, categories.level(50), 4.0);
        assert_approx_eq!(f32, categories.level(0), 0.0);
    }

    #[test]
    fn test_threshold_empty() {
        let categories = CategoryStrategy::Threshold.categories(&[]);
        assert_approx_eq!(f32, categories.level(7), 0.0);
    }

    #[test]
    fn test_linear_excludes_maximum_from_band_width() {
        // Second largest is 8, so bands are 2 wide and 100 is far above them.
        let categories = CategoryStrategy::Linear.categories(&[0, 1, 2, 3, 5, 8, 100]);
        assert_approx_eq!(f32, categories.level(0), 0.0);
        assert_approx_eq!(f32, categories.level(1), 1.5);
        assert_approx_eq!(f32, categories.level(2), 1.5);
        assert_approx_eq!(f32, categories.level(3), 2.5);
        assert_approx_eq!(f32, categories.level(5), 4.0);
        assert_approx_eq!(f32, categories.level(8), 6.5);
        assert_approx_eq!(f32, categories.level(100), 6.5);
    }

    #[test]
    fn test_linear_all_zero() {
        let categories = CategoryStrategy::Linear.categories(&[0, 0, 0]);
        assert_approx_eq!(f32, categories.level(0), 0.0);
    }

    #[test]
    fn test_linear_single_value() {
        // Without a second distinct value the band width falls back to 1 / 4.
        let categories = CategoryStrategy::Linear.categories(&[0, 40]);
        assert_approx_eq!(f32, categories.level(40), 6.5);
    }

    fn traced_application() -> Application {
        Application::new("h-app", "traced").with_package(
            Component::new("h-pkg", "core")
                .with_class(
                    Class::new("h-a", "A")
                        .with_method(Method::constructor("a-init"))
                        .with_method(Method::new("run", "a-run")),
                )
                .with_class(Class::new("h-b", "B").with_method(Method::constructor("b-init"))),
        )
    }

    #[test]
    fn test_count_instances_only_constructors() {
        let app = traced_application();
        let traces = vec![
            Trace::new(vec![
                Span::for_method("a-init"),
                Span::for_method("a-run"),
                Span::for_method("a-init"),
            ]),
            Trace::new(vec![Span::for_method("b-init"), Span::for_method("unknown")]),
        ];

        let counts = count_instances(&app, &traces);
        assert_eq!(counts[&Id::new("h-a")], 2);
        assert_eq!(counts[&Id::new("h-b")], 1);
    }

    #[test]
    fn test_count_instances_starts_from_structure_count() {
        let mut app = traced_application();
        app.packages[0].classes[1].instance_count = 5;

        let traces = vec![Trace::new(vec![Span::for_method("b-init")])];
        let counts = count_instances(&app, &traces);
        assert_eq!(counts[&Id::new("h-a")], 0);
        assert_eq!(counts[&Id::new("h-b")], 6);
    }
}
