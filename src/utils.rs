//! Conversion helpers between Python objects and the crate's `ndarray`
//! inputs. Only compiled with the `python-bindings` feature.
//!
//! Data crosses the boundary as slices and shapes, never as `numpy`'s
//! re-exported `ndarray` types, so the crate's `ndarray` version is
//! independent of the one `numpy` resolves to.

#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods,        // .readonly()
    PyReadonlyArray1,
    PyReadonlyArray2,
    PyUntypedArrayMethods, // .shape(), .is_c_contiguous()
};

/// Borrow a 1-D float64 array from a numpy array, a pandas Series, or a
/// Python sequence, copying only when the input is not already a contiguous
/// float64 array.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Owned copy of a 1-D float64 input.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vector<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<Array1<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    Ok(Array1::from(arr.as_slice()?.to_vec()))
}

/// Owned copy of a 2-D float64 input (numpy array, DataFrame, or nested
/// sequences). NaN entries are kept as missing-value markers.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        if let Some(matrix) = c_contiguous_matrix(&arr_ro)? {
            return Ok(matrix);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            if let Some(matrix) = c_contiguous_matrix(&frame_ro)? {
                return Ok(matrix);
            }
        }
        return nested_rows_matrix(&obj);
    }

    nested_rows_matrix(raw_data)
}

/// Copy of a C-contiguous 2-D array; `None` for any other memory order.
#[cfg(feature = "python-bindings")]
fn c_contiguous_matrix(arr: &PyReadonlyArray2<'_, f64>) -> PyResult<Option<Array2<f64>>> {
    if !arr.is_c_contiguous() {
        return Ok(None);
    }
    let shape = arr.shape();
    let (n_rows, n_cols) = (shape[0], shape[1]);
    let flat = arr.as_slice()?.to_vec();
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map(Some)
        .map_err(|err| PyTypeError::new_err(err.to_string()))
}

/// Row-major copy through nested Python sequences (`tolist()` for arrays).
#[cfg(feature = "python-bindings")]
fn nested_rows_matrix(raw_data: &Bound<'_, PyAny>) -> PyResult<Array2<f64>> {
    let source = match raw_data.call_method0("tolist") {
        Ok(list) => list,
        Err(_) => raw_data.clone(),
    };
    let rows: Vec<Vec<f64>> = source.extract().map_err(|_| {
        PyTypeError::new_err("expected a 2-D numpy.ndarray, pandas.DataFrame, or nested sequence")
    })?;
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != n_cols) {
        return Err(PyTypeError::new_err("all rows must have the same length"));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|err| PyTypeError::new_err(err.to_string()))
}

/// Row-major nested `Vec` copy of a matrix, for returning to Python.
#[cfg(feature = "python-bindings")]
pub fn matrix_to_rows(matrix: &Array2<f64>) -> Vec<Vec<f64>> {
    matrix.rows().into_iter().map(|row| row.to_vec()).collect()
}
