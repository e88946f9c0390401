//! Small dense linear algebra for the per-arm ridge statistics.
//!
//! Dimensions are tiny (at most 16), so everything is row-major `Vec<f64>`
//! with a Cholesky factorisation for solves. The factorisation refuses
//! matrices that are not numerically positive definite instead of
//! returning garbage.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Pivot magnitude below which a factorisation is rejected.
const MIN_PIVOT: f64 = 1e-12;

/// Square matrix, row-major. Serialized as nested arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SquareMatrix {
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self { n, data }
    }

    /// Build from nested rows; `None` if the rows are not square.
    #[must_use]
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let n = rows.len();
        if rows.iter().any(|row| row.len() != n) {
            return None;
        }
        let data = rows.iter().flatten().copied().collect();
        Some(Self { n, data })
    }

    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.n.max(1)).map(<[f64]>::to_vec).collect()
    }

    #[must_use]
    pub const fn dim(&self) -> usize {
        self.n
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    #[must_use]
    pub fn trace(&self) -> f64 {
        (0..self.n).map(|i| self.get(i, i)).sum()
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    #[must_use]
    pub fn is_symmetric(&self, tol: f64) -> bool {
        (0..self.n).all(|i| (0..i).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tol))
    }

    /// `self += x xᵀ`
    pub fn add_outer(&mut self, x: &[f64]) {
        debug_assert_eq!(x.len(), self.n);
        for (i, xi) in x.iter().enumerate() {
            let row = &mut self.data[i * self.n..(i + 1) * self.n];
            for (cell, xj) in row.iter_mut().zip(x) {
                *cell += xi * xj;
            }
        }
    }

    /// `y = self · x`
    #[must_use]
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        self.data
            .chunks(self.n.max(1))
            .map(|row| dot(row, x))
            .collect()
    }

    #[must_use]
    pub fn cholesky(&self) -> Option<Cholesky> {
        Cholesky::factor(self)
    }
}

/// Lower-triangular factor `L` with `A = L Lᵀ`.
#[derive(Debug, Clone)]
pub struct Cholesky {
    n: usize,
    l: Vec<f64>,
}

impl Cholesky {
    fn factor(a: &SquareMatrix) -> Option<Self> {
        let n = a.n;
        let mut l = vec![0.0; n * n];

        for i in 0..n {
            for j in 0..=i {
                let mut sum = a.get(i, j);
                for k in 0..j {
                    sum -= l[i * n + k] * l[j * n + k];
                }
                if i == j {
                    if !sum.is_finite() || sum <= MIN_PIVOT {
                        return None;
                    }
                    l[i * n + j] = sum.sqrt();
                } else {
                    l[i * n + j] = sum / l[j * n + j];
                }
            }
        }

        Some(Self { n, l })
    }

    /// Solve `A x = b`.
    #[must_use]
    pub fn solve(&self, b: &[f64]) -> Vec<f64> {
        let n = self.n;

        // Forward substitution: L y = b
        let mut y = vec![0.0; n];
        for i in 0..n {
            let mut sum = b[i];
            for j in 0..i {
                sum -= self.l[i * n + j] * y[j];
            }
            y[i] = sum / self.l[i * n + i];
        }

        // Backward substitution: Lᵀ x = y
        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut sum = y[i];
            for j in (i + 1)..n {
                sum -= self.l[j * n + i] * x[j];
            }
            x[i] = sum / self.l[i * n + i];
        }

        x
    }

    /// `xᵀ A⁻¹ x`, computed as `‖L⁻¹ x‖²` so it is never negative.
    #[must_use]
    pub fn inverse_quadratic_form(&self, x: &[f64]) -> f64 {
        let n = self.n;
        let mut y = vec![0.0; n];
        for i in 0..n {
            let mut sum = x[i];
            for j in 0..i {
                sum -= self.l[i * n + j] * y[j];
            }
            y[i] = sum / self.l[i * n + i];
        }
        dot(&y, &y)
    }

    /// Explicit inverse, column by column.
    #[must_use]
    pub fn inverse(&self) -> SquareMatrix {
        let n = self.n;
        let mut data = vec![0.0; n * n];
        let mut e = vec![0.0; n];
        for col in 0..n {
            e.iter_mut().for_each(|v| *v = 0.0);
            e[col] = 1.0;
            for (row, value) in self.solve(&e).into_iter().enumerate() {
                data[row * n + col] = value;
            }
        }
        SquareMatrix { n, data }
    }
}

#[must_use]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl Serialize for SquareMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_rows().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SquareMatrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<f64>>::deserialize(deserializer)?;
        Self::from_rows(&rows)
            .ok_or_else(|| serde::de::Error::custom("matrix rows must form a square"))
    }
}
