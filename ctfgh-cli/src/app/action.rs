/// User actions that can be performed in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the row cursor up
    MoveUp,
    /// Move the row cursor down
    MoveDown,
    NextPage,
    PrevPage,
    /// Switch to next view
    NextView,
    /// Switch to previous view
    PrevView,
    /// Flip the checkbox of the focused row
    ToggleSelect,
    /// Select every item matching the filter
    SelectAll,
    ClearSelection,
    /// Open the search input
    StartSearch,
    SearchInput(char),
    SearchBackspace,
    /// Close the search input, keeping the filter
    SearchSubmit,
    /// Close the search input and drop the filter
    SearchCancel,
    /// Esc while browsing: drop the filter
    ClearFilter,
    /// Persist the remote selection
    SaveSelection,
    ImportFocused,
    ImportSelected,
    DeleteFocused,
    DeleteSelected,
    /// Cycle keep / sync_only / full
    CycleDeleteMode,
    ExportFocused,
    /// ZIP of the selected challenges
    ExportSelected,
    /// Download the challenge JSON template
    DownloadTemplate,
    LinkInstallation,
    /// Re-fetch the current view
    Reload,
    ShowHelp,
    HideHelp,
    /// Accept the confirmation dialog
    Confirm,
    /// Decline the confirmation dialog
    Cancel,
    /// Dismiss a report or notice
    CloseDialog,
    /// Quit the application
    Quit,
    /// No action (for tick events)
    Tick,
}
