pub mod brent;
pub mod euler_maruyama;
pub mod nelder_mead;
