pub mod api;
pub mod viewers;
