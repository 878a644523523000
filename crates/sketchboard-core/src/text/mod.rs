//! Text measurement and the in-canvas text editor.

mod metrics;
mod session;

pub use metrics::{
    ApproximateMeasurer, FontSpec, TextMeasurer, TextMetrics, coordinate_to_index,
    index_to_coordinate, index_to_line_col, line_col_to_index, measure_text,
};
pub use session::{CursorBlink, EditOverlay, TextEditSession, TextEditState, TextSelection};
