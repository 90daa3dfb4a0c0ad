pub mod selection;
pub mod trace_view;
pub mod viewport;

pub use selection::{
    Hover, LaneSpan, ListedEvent, SelectedEvents, Selection, SelectionState,
    collect_selected_events,
};
pub use trace_view::{InputResponse, TraceView};
pub use viewport::Viewport;
