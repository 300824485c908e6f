//! The `prism` Python module: config queries, transforms and pixel
//! processing for pipeline scripting.
//!
//! ```python
//! import prism
//! cfg = prism.Config.current()
//! p = cfg.processor(prism.ColorSpaceTransform("lin", "srgb"))
//! pixels = p.apply(pixels, channels=4)
//! ```

use std::path::Path;
use std::sync::Arc;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use prism_color::{Context, Direction, Transform};

fn to_py_err(err: prism_color::Error) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn parse_direction(direction: &str) -> PyResult<Direction> {
    match direction {
        "forward" => Ok(Direction::Forward),
        "inverse" => Ok(Direction::Inverse),
        other => Err(PyValueError::new_err(format!(
            "direction must be 'forward' or 'inverse', got {:?}",
            other
        ))),
    }
}

// ============================================================================
// Transforms
// ============================================================================

/// A conversion between two color spaces; either may be a role name.
#[pyclass(name = "ColorSpaceTransform")]
#[derive(Clone)]
struct PyColorSpaceTransform {
    inner: Transform,
}

#[pymethods]
impl PyColorSpaceTransform {
    #[new]
    #[pyo3(signature = (src, dst, direction = "forward"))]
    fn new(src: &str, dst: &str, direction: &str) -> PyResult<Self> {
        Ok(Self {
            inner: Transform::color_space(src, dst).with_direction(parse_direction(direction)?),
        })
    }
}

/// A conversion onto (or back from) a display/view pair.
#[pyclass(name = "DisplayViewTransform")]
#[derive(Clone)]
struct PyDisplayViewTransform {
    inner: Transform,
}

#[pymethods]
impl PyDisplayViewTransform {
    #[new]
    #[pyo3(signature = (src, display, view, direction = "forward"))]
    fn new(src: &str, display: &str, view: &str, direction: &str) -> PyResult<Self> {
        Ok(Self {
            inner: Transform::display_view(src, display, view)
                .with_direction(parse_direction(direction)?),
        })
    }
}

/// A LUT file applied directly; the source may use `$VAR` references.
#[pyclass(name = "FileTransform")]
#[derive(Clone)]
struct PyFileTransform {
    inner: Transform,
}

#[pymethods]
impl PyFileTransform {
    #[new]
    #[pyo3(signature = (src, direction = "forward"))]
    fn new(src: &str, direction: &str) -> PyResult<Self> {
        Ok(Self {
            inner: Transform::file(src).with_direction(parse_direction(direction)?),
        })
    }
}

fn extract_transform(obj: &Bound<'_, PyAny>) -> PyResult<Transform> {
    if let Ok(t) = obj.extract::<PyColorSpaceTransform>() {
        return Ok(t.inner);
    }
    if let Ok(t) = obj.extract::<PyDisplayViewTransform>() {
        return Ok(t.inner);
    }
    if let Ok(t) = obj.extract::<PyFileTransform>() {
        return Ok(t.inner);
    }
    Err(PyValueError::new_err("expected a prism transform object"))
}

// ============================================================================
// Config and processor
// ============================================================================

#[pyclass(name = "Config")]
struct PyConfig {
    inner: Arc<prism_color::Config>,
}

#[pymethods]
impl PyConfig {
    /// The process-wide config; loads `$PRISM` or falls back to the
    /// built-in raw config.
    #[staticmethod]
    fn current() -> PyResult<Self> {
        Ok(Self {
            inner: prism_color::Config::current().map_err(to_py_err)?,
        })
    }

    #[staticmethod]
    fn from_file(path: &str) -> PyResult<Self> {
        let config = prism_color::Config::from_file(Path::new(path)).map_err(to_py_err)?;
        Ok(Self {
            inner: Arc::new(config),
        })
    }

    #[staticmethod]
    fn from_yaml(text: &str) -> PyResult<Self> {
        let config = prism_color::Config::from_yaml(text).map_err(to_py_err)?;
        Ok(Self {
            inner: Arc::new(config),
        })
    }

    /// Makes this config the process-wide one.
    fn make_current(&self) {
        prism_color::Config::set_current(Arc::clone(&self.inner));
    }

    #[getter]
    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn color_space_names(&self) -> Vec<String> {
        self.inner
            .color_space_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn roles(&self) -> Vec<(String, String)> {
        self.inner
            .roles
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn displays(&self) -> Vec<String> {
        self.inner.active_display_names()
    }

    fn views(&self, display: &str) -> PyResult<Vec<String>> {
        self.inner.view_names(display).map_err(to_py_err)
    }

    fn default_display(&self) -> PyResult<String> {
        self.inner.default_display().map_err(to_py_err)
    }

    fn default_view(&self, display: &str) -> PyResult<String> {
        self.inner.default_view(display).map_err(to_py_err)
    }

    fn processor(&self, transform: &Bound<'_, PyAny>) -> PyResult<PyProcessor> {
        let transform = extract_transform(transform)?;
        let context = Context::new(&self.inner);
        let processor = self
            .inner
            .processor(&context, &transform)
            .map_err(to_py_err)?;
        Ok(PyProcessor { inner: processor })
    }
}

#[pyclass(name = "Processor")]
struct PyProcessor {
    inner: prism_color::Processor,
}

#[pymethods]
impl PyProcessor {
    fn is_noop(&self) -> bool {
        self.inner.is_noop()
    }

    /// Applies the pipeline to packed pixels and returns the result.
    /// `channels` is 3 or 4; alpha passes through.
    #[pyo3(signature = (pixels, channels = 4))]
    fn apply(&self, mut pixels: Vec<f32>, channels: usize) -> PyResult<Vec<f32>> {
        self.inner
            .apply(&mut pixels, channels)
            .map_err(to_py_err)?;
        Ok(pixels)
    }

    /// Applies the pipeline to a single RGB triple.
    fn apply_rgb(&self, rgb: (f32, f32, f32)) -> (f32, f32, f32) {
        let mut v = [rgb.0, rgb.1, rgb.2];
        self.inner.apply_rgb(&mut v);
        (v[0], v[1], v[2])
    }
}

#[pymodule]
fn prism(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyConfig>()?;
    m.add_class::<PyProcessor>()?;
    m.add_class::<PyColorSpaceTransform>()?;
    m.add_class::<PyDisplayViewTransform>()?;
    m.add_class::<PyFileTransform>()?;
    Ok(())
}
