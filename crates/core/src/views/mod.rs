pub mod density;
pub mod frame;
pub mod time_grid;

pub use density::{DensityMark, density_marks, render_density};
pub use frame::render_frame;
pub use time_grid::render_time_grid;
