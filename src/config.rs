//! Configuration for a single conversion.
//!
//! Everything the pipeline needs beyond the input itself lives in
//! [`ConversionConfig`], built via its [`ConversionConfigBuilder`]. Keeping
//! the knobs in one struct makes it trivial to share a config across
//! conversions and to log why two runs produced different outputs.

use crate::error::ConvertError;
use crate::geometry::GeometryMode;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Configuration for a conversion.
///
/// Built via [`ConversionConfig::builder()`] or
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pixelswitch::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .scale(4.0)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Default)]
pub struct ConversionConfig {
    /// How output dimensions are computed. Default: [`GeometryMode::Natural`].
    ///
    /// Only honoured for vector sources; raster conversions always keep the
    /// source's natural dimensions regardless of this field.
    pub geometry: GeometryMode,

    /// Optional per-stage progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("geometry", &self.geometry)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn geometry(mut self, mode: GeometryMode) -> Self {
        self.config.geometry = mode;
        self
    }

    /// Shorthand for [`GeometryMode::Scale`].
    pub fn scale(mut self, k: f64) -> Self {
        self.config.geometry = GeometryMode::Scale(k);
        self
    }

    /// Shorthand for [`GeometryMode::Width`].
    pub fn width(mut self, w: u32) -> Self {
        self.config.geometry = GeometryMode::Width(w);
        self
    }

    /// Shorthand for [`GeometryMode::Height`].
    pub fn height(mut self, h: u32) -> Self {
        self.config.geometry = GeometryMode::Height(h);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(Arc::clone(&cb));
        self
    }

    /// Build the configuration, validating the geometry request.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        match self.config.geometry {
            GeometryMode::Scale(k) if !k.is_finite() || k <= 0.0 => {
                Err(ConvertError::InvalidScale { value: k })
            }
            GeometryMode::Width(0) => Err(ConvertError::NonPositiveDimension { axis: "width" }),
            GeometryMode::Height(0) => Err(ConvertError::NonPositiveDimension { axis: "height" }),
            GeometryMode::Exact { width: 0, .. } => {
                Err(ConvertError::NonPositiveDimension { axis: "width" })
            }
            GeometryMode::Exact { height: 0, .. } => {
                Err(ConvertError::NonPositiveDimension { axis: "height" })
            }
            _ => Ok(self.config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry_is_natural() {
        let config = ConversionConfig::default();
        assert_eq!(config.geometry, GeometryMode::Natural);
        assert!(config.progress_callback.is_none());
    }

    #[test]
    fn builder_sets_scale() {
        let config = ConversionConfig::builder().scale(8.0).build().unwrap();
        assert_eq!(config.geometry, GeometryMode::Scale(8.0));
    }

    #[test]
    fn builder_rejects_bad_geometry() {
        assert!(ConversionConfig::builder().scale(0.0).build().is_err());
        assert!(ConversionConfig::builder().scale(f64::NAN).build().is_err());
        assert!(ConversionConfig::builder().width(0).build().is_err());
        assert!(ConversionConfig::builder()
            .geometry(GeometryMode::Exact { width: 5, height: 0 })
            .build()
            .is_err());
    }

    #[test]
    fn debug_hides_callback() {
        use crate::progress::NoopProgressCallback;

        let config = ConversionConfig::builder()
            .progress_callback(Arc::new(NoopProgressCallback))
            .build()
            .unwrap();
        let s = format!("{config:?}");
        assert!(s.contains("<dyn callback>"));
    }
}
