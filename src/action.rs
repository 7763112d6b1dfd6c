/// Central action enum — all state mutations flow through here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Lifecycle
    Quit,
    Tick,
    Resize,

    // Date fields
    FocusNextField,
    FocusPrevField,
    SetToday,

    // Field editor
    StartEdit,
    ConfirmEdit,
    CancelEdit,
    EditChar(char),
    EditBackspace,
    EditDeleteWord,
    EditLeft,
    EditRight,
    EditHome,
    EditEnd,

    // Comparison
    Refresh,
    CopyLink,

    // Result table
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollToTop,
    ScrollToBottom,
}
