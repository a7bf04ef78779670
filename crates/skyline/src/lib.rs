//! Skyline - box layouts for software-city visualizations.
//!
//! Turns an application's package/class structure and its observed runtime
//! traces into a non-overlapping 3D layout: every application, package and
//! class gets a footprint, a height and an absolute position. Packages and
//! the application become city blocks, classes become buildings whose height
//! reflects how often they were instantiated.

pub mod config;
pub mod worker;

mod error;
mod layout;

pub use skyline_core::{city, geometry, identifier, structure, trace};

pub use error::SkylineError;
pub use layout::{Categories, CategoryStrategy, count_instances};

use log::{debug, info, trace};

use city::CityLayout;
use config::AppConfig;
use structure::Application;
use trace::Trace;
use worker::LayoutRequest;

/// Computes the city layout of `application` with the default configuration.
///
/// The result holds one box per entity reachable from `application`. Calling
/// this twice with the same input yields identical layouts.
///
/// # Errors
///
/// Returns [`SkylineError`] when the structure tree is inconsistent, for example
/// when an id occurs more than once.
///
/// # Examples
///
/// ```rust
/// use skyline::{
///     compute_layout,
///     structure::{Application, Class, Component},
/// };
///
/// let application = Application::new("app", "shop").with_package(
///     Component::new("pkg", "net.shop").with_class(Class::new("cart", "Cart")),
/// );
///
/// let city = compute_layout(&application, &[]).expect("Failed to compute layout");
/// assert_eq!(city.len(), 3);
/// ```
pub fn compute_layout(
    application: &Application,
    traces: &[Trace],
) -> Result<CityLayout, SkylineError> {
    LayoutBuilder::default().compute(application, traces)
}

/// Builder for reading layout requests and computing city layouts.
///
/// # Examples
///
/// ```rust
/// use skyline::{LayoutBuilder, config::AppConfig};
///
/// let source = r#"{
///     "structure": { "id": "app", "name": "shop", "packages": [] },
///     "dynamic": []
/// }"#;
///
/// let builder = LayoutBuilder::new(AppConfig::default());
/// let request = builder.parse_request(source).expect("Failed to parse");
/// let city = builder.compute_request(&request).expect("Failed to compute");
/// assert_eq!(city.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    config: AppConfig,
}

impl LayoutBuilder {
    /// Create a new layout builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration including the height strategy and dimensions
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration used by this builder.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON layout request document.
    ///
    /// The document carries the structure tree under `structure` and the
    /// traces under `dynamic`.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::Parse`] with the source attached if the document
    /// is not a valid request.
    pub fn parse_request(&self, source: &str) -> Result<LayoutRequest, SkylineError> {
        info!("Parsing layout request");

        let request: LayoutRequest = serde_json::from_str(source)
            .map_err(|err| SkylineError::new_parse_error(err, source))?;

        debug!(
            application = request.structure.name,
            traces = request.dynamic.len();
            "Layout request parsed successfully"
        );
        Ok(request)
    }

    /// Compute the city layout of `application` from the given traces.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError`] for inconsistent structure trees.
    pub fn compute(
        &self,
        application: &Application,
        traces: &[Trace],
    ) -> Result<CityLayout, SkylineError> {
        let city = layout::compute(application, traces, self.config.layout())?;
        trace!(city:?; "Computed city layout");
        Ok(city)
    }

    /// Compute the city layout for a parsed request.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError`] for inconsistent structure trees.
    pub fn compute_request(&self, request: &LayoutRequest) -> Result<CityLayout, SkylineError> {
        self.compute(&request.structure, &request.dynamic)
    }
}
