// src/models/model.rs
/// Scalar SDE `dX = drift(X, t) dt + diffusion(X, t) dW`
pub trait SDEModel {
    fn drift(&self, x: f64, t: f64) -> f64;
    fn diffusion(&self, x: f64, t: f64) -> f64;
}
