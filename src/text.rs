/// Greedy line breaking that stands in for a host layout pass.
pub mod line_break;

pub use line_break::{LineBreakConfig, WrapStyle, break_lines};
