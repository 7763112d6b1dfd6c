pub mod app_state;
pub mod comparison_state;
pub mod date_state;
pub mod text_buffer;

pub use app_state::AppState;
pub use comparison_state::{ComparisonState, ResourceRow};
pub use date_state::DateInputState;
pub use text_buffer::TextBuffer;
