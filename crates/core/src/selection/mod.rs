//! Selection configuration and its compilation into query fragments.

mod compiler;
mod params;
mod types;

pub use compiler::QueryFragment;
pub use params::{
    parse_from_params, parse_id_list, ReviewParams, SELECTION_TEXT_LIST, SELECTION_WORD_LIST,
};
pub use types::{QuizDirection, ReviewType, Selection, SelectionConfig, SelectionKind};
