//! Python bindings for the Sable grammar.

use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use tree_sitter_sable::LanguageFn;

/// A loaded Sable language handle.
#[pyclass(frozen, name = "Language", module = "tree_sitter_sable")]
struct PyLanguage {
    inner: tree_sitter_sable::Language,
}

#[pymethods]
impl PyLanguage {
    #[getter]
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    #[getter]
    fn abi_version(&self) -> u32 {
        self.inner.abi_version()
    }

    #[getter]
    fn node_kind_count(&self) -> usize {
        self.inner.node_kind_count()
    }

    #[getter]
    fn field_count(&self) -> usize {
        self.inner.field_count()
    }

    fn node_kind_for_id(&self, id: u16) -> Option<&'static str> {
        self.inner.node_kind_for_id(id)
    }

    fn node_kind_is_named(&self, id: u16) -> bool {
        self.inner.node_kind_is_named(id)
    }

    fn node_kind_is_visible(&self, id: u16) -> bool {
        self.inner.node_kind_is_visible(id)
    }

    fn id_for_node_kind(&self, kind: &str, named: bool) -> u16 {
        self.inner.id_for_node_kind(kind, named)
    }

    fn field_name_for_id(&self, id: u16) -> Option<&'static str> {
        self.inner.field_name_for_id(id)
    }

    fn __repr__(&self) -> String {
        format!(
            "<Language name={:?} abi_version={}>",
            self.inner.name(),
            self.inner.abi_version()
        )
    }
}

/// Loads the Sable language, raising `RuntimeError` when the tables are unusable.
#[pyfunction]
fn language() -> PyResult<PyLanguage> {
    load(tree_sitter_sable::LANGUAGE)
}

fn load(language: LanguageFn) -> PyResult<PyLanguage> {
    tree_sitter_sable::load_and_check(language)
        .map(|inner| PyLanguage { inner })
        .map_err(|err| PyRuntimeError::new_err(err.to_string()))
}

/// The node-types listing as a JSON string.
#[pyfunction]
fn node_types() -> String {
    tree_sitter_sable::NODE_TYPES.clone()
}

#[pymodule]
fn _binding(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyLanguage>()?;
    m.add_function(wrap_pyfunction!(language, m)?)?;
    m.add_function(wrap_pyfunction!(node_types, m)?)?;
    Ok(())
}

#[cfg(all(test, feature = "test-python"))]
mod tests {
    use super::*;

    #[test]
    fn test_module_loads_sable() {
        Python::with_gil(|py| {
            let module = PyModule::new(py, "_binding").unwrap();
            _binding(&module).unwrap();

            let language = module.getattr("language").unwrap().call0().unwrap();
            let name: String = language.getattr("name").unwrap().extract().unwrap();
            assert_eq!(name, "sable");
            let abi: u32 = language.getattr("abi_version").unwrap().extract().unwrap();
            assert_eq!(abi, 15);
            let root: u16 = language
                .call_method1("id_for_node_kind", ("source_file", true))
                .unwrap()
                .extract()
                .unwrap();
            assert_eq!(root, 2);

            let types: String = module.getattr("node_types").unwrap().call0().unwrap().extract().unwrap();
            assert!(types.contains("source_file"));
        });
    }

    #[test]
    fn test_missing_tables_raise_runtime_error() {
        Python::with_gil(|py| {
            let Err(err) = load(LanguageFn::from_fn(|| None)) else {
                panic!("loading without tables succeeded");
            };
            assert!(err.is_instance_of::<PyRuntimeError>(py));
            assert!(err
                .value(py)
                .to_string()
                .starts_with("Error loading Sable grammar"));
        });
    }
}
