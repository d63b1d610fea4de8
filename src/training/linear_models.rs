//! Ordinary least squares regression

use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Lower-triangular Cholesky factor of a symmetric positive-definite matrix
fn cholesky(a: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    let mut l = Array2::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }

            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }
    Some(l)
}

/// Solve `A x = b` for symmetric `A`, retrying once with a tiny ridge when `A`
/// is not positive definite
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    let l = cholesky(a).or_else(|| {
        // Floor keeps an all-zero system (every feature constant) solvable
        let ridge = (1e-8 * a.diag().iter().map(|v| v.abs()).sum::<f64>() / n.max(1) as f64).max(1e-12);
        let mut a_reg = a.clone();
        for k in 0..n {
            a_reg[[k, k]] += ridge;
        }
        cholesky(&a_reg)
    })?;

    // L y = b
    let mut y = Array1::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * y[j];
        }
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // L^T x = y
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Gauss-Jordan elimination with partial pivoting
fn gauss_jordan_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut aug = Array2::zeros((n, n + 1));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = a[[i, j]];
        }
        aug[[i, n]] = b[i];
    }

    for col in 0..n {
        let mut max_row = col;
        for row in col + 1..n {
            if aug[[row, col]].abs() > aug[[max_row, col]].abs() {
                max_row = row;
            }
        }
        if max_row != col {
            for j in 0..=n {
                aug.swap([col, j], [max_row, j]);
            }
        }

        if aug[[col, col]].abs() < 1e-12 {
            return None;
        }

        let pivot = aug[[col, col]];
        for j in 0..=n {
            aug[[col, j]] /= pivot;
        }
        for row in 0..n {
            if row != col {
                let factor = aug[[row, col]];
                for j in 0..=n {
                    aug[[row, j]] -= factor * aug[[col, j]];
                }
            }
        }
    }

    Some(aug.column(n).to_owned())
}

/// Linear regression fitted by the normal equations `(X^T X) w = X^T y`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Fitted coefficients, one per feature
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept
    pub intercept: Option<f64>,
    /// Whether to fit intercept
    pub fit_intercept: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
        }
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    pub fn n_features(&self) -> Option<usize> {
        self.coefficients.as_ref().map(|c| c.len())
    }

    /// Fit the model to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(PipelineError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(PipelineError::Training("no training rows".to_string()));
        }

        // Centering removes the intercept from the system
        let (x_work, y_work, x_mean, y_mean) = match (x.mean_axis(Axis(0)), y.mean()) {
            (Some(x_mean), Some(y_mean)) if self.fit_intercept => {
                let xc = x - &x_mean.clone().insert_axis(Axis(0));
                let yc = y - y_mean;
                (xc, yc, Some(x_mean), y_mean)
            }
            _ => (x.clone(), y.clone(), None, 0.0),
        };

        let xtx = x_work.t().dot(&x_work);
        let xty = x_work.t().dot(&y_work);
        let coefficients = cholesky_solve(&xtx, &xty)
            .or_else(|| gauss_jordan_solve(&xtx, &xty))
            .ok_or_else(|| {
                PipelineError::Computation("Matrix is singular, cannot solve least squares".to_string())
            })?;

        let intercept = match &x_mean {
            Some(x_mean) => y_mean - coefficients.dot(x_mean),
            None => 0.0,
        };

        self.coefficients = Some(coefficients);
        self.intercept = Some(intercept);
        Ok(self)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self.coefficients.as_ref().ok_or(PipelineError::ModelNotFitted)?;
        if x.ncols() != coefficients.len() {
            return Err(PipelineError::ShapeError {
                expected: format!("{} features", coefficients.len()),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok(x.dot(coefficients) + self.intercept.unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_linear_regression_simple() {
        // y = 2*x1 + 3*x2 + 1
        let x = array![[1.0, 1.0], [2.0, 1.0], [1.0, 2.0], [2.0, 2.0], [3.0, 1.0], [1.0, 3.0]];
        let y = array![6.0, 8.0, 9.0, 11.0, 10.0, 12.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients.as_ref().unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-8);
        assert!((coef[1] - 3.0).abs() < 1e-8);
        assert!((model.intercept.unwrap() - 1.0).abs() < 1e-8);

        let pred = model.predict(&array![[4.0, 4.0]]).unwrap();
        assert!((pred[0] - 21.0).abs() < 1e-8);
    }

    #[test]
    fn test_without_intercept() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![2.0, 4.0, 6.0];

        let mut model = LinearRegression::new().with_fit_intercept(false);
        model.fit(&x, &y).unwrap();
        assert!((model.coefficients.as_ref().unwrap()[0] - 2.0).abs() < 1e-10);
        assert_eq!(model.intercept, Some(0.0));
    }

    #[test]
    fn test_collinear_features_still_fit() {
        // second column duplicates the first
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();
        let pred = model.predict(&x).unwrap();
        for (p, t) in pred.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-3);
        }
    }

    #[test]
    fn test_constant_features_predict_target_mean() {
        let x = array![[1.0, 5.0], [1.0, 5.0], [1.0, 5.0]];
        let y = array![1.0, 2.0, 3.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();
        let coef = model.coefficients.as_ref().unwrap();
        assert!(coef.iter().all(|c| c.abs() < 1e-12));
        assert!((model.intercept.unwrap() - 2.0).abs() < 1e-12);

        let pred = model.predict(&array![[4.0, -1.0]]).unwrap();
        assert!((pred[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_gauss_jordan() {
        let a = array![[0.0, 2.0], [3.0, 1.0]];
        let b = array![4.0, 5.0];
        let x = gauss_jordan_solve(&a, &b).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_predict_before_fit() {
        let model = LinearRegression::new();
        assert!(matches!(
            model.predict(&array![[1.0]]),
            Err(PipelineError::ModelNotFitted)
        ));
    }

    #[test]
    fn test_wrong_feature_count() {
        let mut model = LinearRegression::new();
        model.fit(&array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]], &array![1.0, 2.0, 3.0]).unwrap();
        assert!(matches!(
            model.predict(&array![[1.0]]),
            Err(PipelineError::ShapeError { .. })
        ));
    }
}
