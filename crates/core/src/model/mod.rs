pub mod lane;
pub mod session;
pub mod sub_trace;
pub mod time_range;
pub mod trace;
pub mod trace_file;

pub use lane::{Lane, lane_color};
pub use session::{LoadedTrace, build_lanes, lanes_time_bounds};
pub use sub_trace::{FilteredTrace, SubTrace};
pub use time_range::TimeRange;
pub use trace::{Trace, index_span_len};
pub use trace_file::{DEFAULT_IN_MEMORY_LIMIT, LoadOptions, TraceFile, TraceFileError};
