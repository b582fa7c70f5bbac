pub mod formatter;

pub use formatter::{
    format_history_table, format_index_tier, format_rubrics, format_score_detail, format_verification,
    should_use_colors,
};
