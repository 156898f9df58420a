use std::collections::VecDeque;
use std::path::PathBuf;

use crossbeam_channel::Receiver;
use ctfgh_core::{
    BatchController, BatchKind, BatchPlan, BatchSummary, BusyFlag, Challenge, CtfghError,
    DeleteMode, DeleteRepos, ExportChallenges, ImportRepos, ItemKey, ListState, Listed,
    RemoteRepo, SavedRepo,
};
use tracing::{debug, info, warn};

use super::worker::{Worker, WorkerEvent};
use crate::config::Settings;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Browsing a list
    Browsing,
    /// Showing help overlay
    Help,
    /// Typing into the search input
    Search,
    /// Batch confirmation dialog
    Confirm,
    /// Batch in progress with progress overlay
    Running,
    /// Per-item outcomes of the last batch
    Report,
    /// Result of a one-shot action
    Notice,
}

/// Which collection is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    RemoteRepos,
    SavedRepos,
    Challenges,
}

impl ViewMode {
    pub fn title(&self) -> &'static str {
        match self {
            ViewMode::RemoteRepos => "GitHub",
            ViewMode::SavedRepos => "Saved",
            ViewMode::Challenges => "Challenges",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ViewMode::RemoteRepos => ViewMode::SavedRepos,
            ViewMode::SavedRepos => ViewMode::Challenges,
            ViewMode::Challenges => ViewMode::RemoteRepos,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ViewMode::RemoteRepos => ViewMode::Challenges,
            ViewMode::SavedRepos => ViewMode::RemoteRepos,
            ViewMode::Challenges => ViewMode::SavedRepos,
        }
    }

    pub const ALL: [ViewMode; 3] = [
        ViewMode::RemoteRepos,
        ViewMode::SavedRepos,
        ViewMode::Challenges,
    ];
}

/// Fetch status of one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Message shown in the notice dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            is_error: true,
        }
    }
}

/// What the confirmation dialog is about to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirm {
    pub title: String,
    pub lines: Vec<String>,
    /// Shown in red under the item list
    pub warning: Option<String>,
}

/// Run `$body` against the list of the active view
macro_rules! with_list {
    ($state:expr, $list:ident => $body:expr) => {
        match $state.view_mode {
            ViewMode::RemoteRepos => {
                let $list = &$state.remote;
                $body
            }
            ViewMode::SavedRepos => {
                let $list = &$state.saved;
                $body
            }
            ViewMode::Challenges => {
                let $list = &$state.challenges;
                $body
            }
        }
    };
}

macro_rules! with_list_mut {
    ($state:expr, $list:ident => $body:expr) => {
        match $state.view_mode {
            ViewMode::RemoteRepos => {
                let $list = &mut $state.remote;
                $body
            }
            ViewMode::SavedRepos => {
                let $list = &mut $state.saved;
                $body
            }
            ViewMode::Challenges => {
                let $list = &mut $state.challenges;
                $body
            }
        }
    };
}

/// Application state
pub struct AppState {
    /// Current mode
    pub mode: AppMode,
    /// Current view
    pub view_mode: ViewMode,
    /// CTFd root URL, for the header
    pub server_url: String,
    pub remote: ListState<RemoteRepo>,
    pub saved: ListState<SavedRepo>,
    pub challenges: ListState<Challenge>,
    pub remote_load: LoadState,
    pub saved_load: LoadState,
    pub challenges_load: LoadState,
    /// Sent with every import
    pub delete_mode: DeleteMode,
    /// Where exports and the template are written
    pub download_dir: PathBuf,
    pub batch: BatchController,
    /// Shared by batches and archive export
    pub busy: BusyFlag,
    /// Dialog text for the batch awaiting confirmation
    pub pending: Option<PendingConfirm>,
    /// Last batch summary, shown in the report dialog
    pub report: Option<BatchSummary>,
    /// First visible line of the report
    pub report_scroll: usize,
    /// One-shot results waiting to be shown
    pub notices: VecDeque<Notice>,
    /// Search input buffer
    pub search_input: String,
    /// Whether app should quit
    pub should_quit: bool,
    /// Spinner frame for animation
    pub spinner_frame: usize,
    worker: Worker,
    receiver: Receiver<WorkerEvent>,
}

impl AppState {
    pub fn new(settings: &Settings, worker: Worker, receiver: Receiver<WorkerEvent>) -> Self {
        let busy = BusyFlag::new();
        Self {
            mode: AppMode::Browsing,
            view_mode: ViewMode::RemoteRepos,
            server_url: worker.client().base_url().to_string(),
            remote: ListState::new(settings.pages.remote_repos),
            saved: ListState::new(settings.pages.saved_repos),
            challenges: ListState::new(settings.pages.challenges),
            remote_load: LoadState::Idle,
            saved_load: LoadState::Idle,
            challenges_load: LoadState::Idle,
            delete_mode: settings.delete_mode,
            download_dir: settings.download_dir.clone(),
            batch: BatchController::new(busy.clone()),
            busy,
            pending: None,
            report: None,
            report_scroll: 0,
            notices: VecDeque::new(),
            search_input: String::new(),
            should_quit: false,
            spinner_frame: 0,
            worker,
            receiver,
        }
    }

    /// Fetch every collection
    pub fn load_all(&mut self) {
        self.remote_load = LoadState::Loading;
        self.saved_load = LoadState::Loading;
        self.challenges_load = LoadState::Loading;
        self.worker.fetch_remote_repos();
        self.worker.fetch_saved_repos();
        self.worker.fetch_challenges();
    }

    /// Re-fetch the active view
    pub fn reload(&mut self) {
        match self.view_mode {
            ViewMode::RemoteRepos => {
                self.remote_load = LoadState::Loading;
                self.worker.fetch_remote_repos();
            }
            ViewMode::SavedRepos => {
                self.saved_load = LoadState::Loading;
                self.worker.fetch_saved_repos();
            }
            ViewMode::Challenges => {
                self.challenges_load = LoadState::Loading;
                self.worker.fetch_challenges();
            }
        }
    }

    pub fn load_state(&self, view: ViewMode) -> &LoadState {
        match view {
            ViewMode::RemoteRepos => &self.remote_load,
            ViewMode::SavedRepos => &self.saved_load,
            ViewMode::Challenges => &self.challenges_load,
        }
    }

    /// Advance spinner animation
    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % 10;
    }

    /// Drain finished background requests
    pub fn poll_worker(&mut self) {
        while let Ok(event) = self.receiver.try_recv() {
            self.apply_event(event);
        }
    }

    pub fn apply_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::RemoteRepos(result) => {
                self.remote_load = loaded(result, "remote repositories", |repos| {
                    self.remote.replace(repos)
                });
            }
            WorkerEvent::SavedRepos(result) => {
                self.saved_load =
                    loaded(result, "saved repositories", |repos| self.saved.replace(repos));
            }
            WorkerEvent::Challenges(result) => {
                self.challenges_load =
                    loaded(result, "challenges", |items| self.challenges.replace(items));
            }
            WorkerEvent::Notice { title, result } => {
                let notice = match result {
                    Ok(message) => Notice::info(title, message),
                    Err(e) => {
                        warn!(action = title, error = %e, "action failed");
                        Notice::error(title, e.to_string())
                    }
                };
                self.push_notice(notice);
            }
        }
    }

    /// Queue a notice; shown right away unless another dialog is open
    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push_back(notice);
        if self.mode == AppMode::Browsing {
            self.mode = AppMode::Notice;
        }
    }

    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    /// Track the running batch and open the report when it ends
    pub fn poll_batch(&mut self) {
        if let Some(summary) = self.batch.poll() {
            info!(summary = %summary.headline(), "batch report ready");
            log_report(&summary);
            self.report = Some(summary);
            self.report_scroll = 0;
            self.mode = AppMode::Report;
        } else if self.mode == AppMode::Running && self.batch.is_idle() {
            self.return_to_browsing();
        }
    }

    /// Dismiss the report or the front notice, then show the next queued notice
    pub fn close_dialog(&mut self) {
        match self.mode {
            AppMode::Report => self.report = None,
            AppMode::Notice => {
                self.notices.pop_front();
            }
            _ => return,
        }
        self.return_to_browsing();
    }

    /// Leave an overlay, showing the next queued notice if there is one
    fn return_to_browsing(&mut self) {
        self.mode = if self.notices.is_empty() {
            AppMode::Browsing
        } else {
            AppMode::Notice
        };
    }

    // --- Navigation ---

    pub fn move_up(&mut self) {
        if self.mode == AppMode::Report {
            self.report_scroll = self.report_scroll.saturating_sub(1);
            return;
        }
        with_list_mut!(self, list => list.focus_up());
    }

    pub fn move_down(&mut self) {
        if self.mode == AppMode::Report {
            let last = self
                .report
                .as_ref()
                .map_or(0, |summary| summary.lines().len().saturating_sub(1));
            self.report_scroll = (self.report_scroll + 1).min(last);
            return;
        }
        with_list_mut!(self, list => list.focus_down());
    }

    pub fn next_page(&mut self) {
        with_list_mut!(self, list => list.next_page());
    }

    pub fn prev_page(&mut self) {
        with_list_mut!(self, list => list.prev_page());
    }

    /// Switch to next view
    pub fn next_view(&mut self) {
        self.view_mode = self.view_mode.next();
    }

    /// Switch to previous view
    pub fn prev_view(&mut self) {
        self.view_mode = self.view_mode.prev();
    }

    // --- Selection ---

    pub fn toggle_select(&mut self) {
        with_list_mut!(self, list => list.flip_focused());
    }

    pub fn select_all(&mut self) {
        with_list_mut!(self, list => list.select_all());
    }

    pub fn clear_selection(&mut self) {
        with_list_mut!(self, list => list.clear_selection());
    }

    /// Number of selected items in the active view
    pub fn selection_count(&self) -> usize {
        with_list!(self, list => list.selection().len())
    }

    /// Filter text of the active view
    pub fn filter(&self) -> &str {
        with_list!(self, list => list.filter())
    }

    // --- Search ---

    pub fn start_search(&mut self) {
        self.search_input = self.filter().to_string();
        self.mode = AppMode::Search;
    }

    pub fn search_input(&mut self, c: char) {
        self.search_input.push(c);
        self.apply_search();
    }

    pub fn search_backspace(&mut self) {
        self.search_input.pop();
        self.apply_search();
    }

    fn apply_search(&mut self) {
        let text = self.search_input.clone();
        with_list_mut!(self, list => list.set_filter(text));
    }

    pub fn search_submit(&mut self) {
        self.return_to_browsing();
    }

    pub fn search_cancel(&mut self) {
        self.search_input.clear();
        self.apply_search();
        self.return_to_browsing();
    }

    /// Esc while browsing
    pub fn clear_filter(&mut self) {
        if !self.filter().is_empty() {
            self.search_input.clear();
            self.apply_search();
        }
    }

    // --- One-shot actions ---

    pub fn save_selection(&mut self) {
        if self.view_mode != ViewMode::RemoteRepos {
            return;
        }
        let repos: Vec<RemoteRepo> = self.remote.selected_items().into_iter().cloned().collect();
        if repos.is_empty() {
            self.push_notice(Notice::error("Save selection", "No repositories selected"));
            return;
        }
        info!(count = repos.len(), "saving repository selection");
        self.worker.save_selection(repos);
    }

    pub fn link_installation(&mut self) {
        self.worker.link_installation();
    }

    pub fn download_template(&mut self) {
        if self.view_mode == ViewMode::Challenges {
            self.worker.download_example(self.download_dir.clone());
        }
    }

    pub fn cycle_delete_mode(&mut self) {
        if self.view_mode == ViewMode::SavedRepos {
            self.delete_mode = self.delete_mode.next();
            debug!(mode = %self.delete_mode, "delete mode changed");
        }
    }

    /// ZIP of the selected challenges; silently ignored while busy
    pub fn export_selected(&mut self) {
        if self.view_mode != ViewMode::Challenges {
            return;
        }
        let ids: Vec<u64> = self
            .challenges
            .selected_items()
            .iter()
            .map(|c| c.id)
            .collect();
        if ids.is_empty() {
            self.push_notice(Notice::error("Export archive", "No challenges selected"));
            return;
        }
        let Some(permit) = self.busy.try_acquire() else {
            debug!("archive export ignored, busy");
            return;
        };
        info!(count = ids.len(), "exporting challenge archive");
        self.challenges_load = LoadState::Loading;
        self.worker.export_archive(permit, ids, self.download_dir.clone());
    }

    // --- Batches ---

    /// Focused item as a one-item batch
    fn focused_entry<T: Listed>(list: &ListState<T>) -> Vec<(ItemKey, String)> {
        list.focused()
            .map(|item| vec![(item.key(), item.display_name().to_string())])
            .unwrap_or_default()
    }

    fn selected_entries<T: Listed>(list: &ListState<T>) -> Vec<(ItemKey, String)> {
        list.selected_items()
            .iter()
            .map(|item| (item.key(), item.display_name().to_string()))
            .collect()
    }

    pub fn import(&mut self, focused_only: bool) {
        if self.view_mode != ViewMode::SavedRepos {
            return;
        }
        let entries = if focused_only {
            Self::focused_entry(&self.saved)
        } else {
            Self::selected_entries(&self.saved)
        };
        if entries.is_empty() {
            if !focused_only {
                self.push_notice(Notice::error(
                    "Import",
                    "No repositories selected. Select at least one repository to import.",
                ));
            }
            return;
        }
        let op = ImportRepos::new(self.worker.client().clone(), self.delete_mode);
        let warning = (self.delete_mode == DeleteMode::Full)
            .then(|| "Challenges removed from the repository will be deleted.".to_string());
        let title = format!("Import {} repositor{}?", entries.len(), plural_y(entries.len()));
        let extra = vec![format!("Delete mode: {}", self.delete_mode)];
        let worker = self.worker.clone();
        self.request_batch(
            BatchPlan::new(BatchKind::Import, entries),
            op,
            move || {
                worker.fetch_saved_repos_now();
                worker.fetch_challenges_now();
            },
            title,
            extra,
            warning,
        );
    }

    pub fn delete(&mut self, focused_only: bool) {
        if self.view_mode != ViewMode::SavedRepos {
            return;
        }
        let entries = if focused_only {
            Self::focused_entry(&self.saved)
        } else {
            Self::selected_entries(&self.saved)
        };
        if entries.is_empty() {
            if !focused_only {
                self.push_notice(Notice::error("Delete", "No repositories selected"));
            }
            return;
        }
        let op = DeleteRepos::new(self.worker.client().clone());
        let title = format!(
            "Delete {} saved repositor{}?",
            entries.len(),
            plural_y(entries.len())
        );
        let worker = self.worker.clone();
        self.request_batch(
            BatchPlan::new(BatchKind::Delete, entries),
            op,
            move || {
                worker.fetch_saved_repos_now();
                worker.fetch_challenges_now();
            },
            title,
            Vec::new(),
            None,
        );
    }

    /// Save the focused challenge as JSON
    pub fn export_focused(&mut self) {
        if self.view_mode != ViewMode::Challenges {
            return;
        }
        let Some(challenge) = self.challenges.focused() else {
            return;
        };
        let warning = (!challenge.imported).then(|| {
            "This challenge was not imported from GitHub. UUID fields will be generated during export."
                .to_string()
        });
        let entries = vec![(challenge.key(), challenge.name.clone())];
        let op = ExportChallenges::new(self.worker.client().clone(), self.download_dir.clone());
        let extra = vec![format!("Into: {}", self.download_dir.display())];
        let worker = self.worker.clone();
        self.request_batch(
            BatchPlan::new(BatchKind::Export, entries),
            op,
            move || worker.fetch_challenges_now(),
            "Export challenge?".to_string(),
            extra,
            warning,
        );
    }

    fn request_batch<O, R>(
        &mut self,
        plan: BatchPlan,
        op: O,
        refresh: R,
        title: String,
        extra: Vec<String>,
        warning: Option<String>,
    ) where
        O: ctfgh_core::BatchOperation + 'static,
        R: FnOnce() + Send + 'static,
    {
        let mut lines: Vec<String> = plan.labels().take(5).map(str::to_string).collect();
        if plan.len() > 5 {
            lines.push(format!("...and {} more", plan.len() - 5));
        }
        lines.extend(extra);

        if self.batch.request(plan, op, refresh) {
            self.pending = Some(PendingConfirm {
                title,
                lines,
                warning,
            });
            self.mode = AppMode::Confirm;
        }
    }

    /// Operator accepted the dialog
    pub fn confirm(&mut self) {
        self.pending = None;
        if self.batch.confirm() {
            self.mode = AppMode::Running;
        } else {
            self.return_to_browsing();
        }
    }

    /// Operator declined: nothing was sent, nothing changes
    pub fn cancel(&mut self) {
        self.batch.decline();
        self.pending = None;
        self.return_to_browsing();
    }

    // --- Misc ---

    /// Show help overlay
    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
    }

    /// Hide help overlay
    pub fn hide_help(&mut self) {
        self.return_to_browsing();
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

/// Every report line goes to the log, failures and file errors at warn
fn log_report(summary: &BatchSummary) {
    for outcome in &summary.outcomes {
        if outcome.success {
            info!(kind = %summary.kind, item = %outcome.label, "{}", outcome.message);
        } else {
            warn!(kind = %summary.kind, item = %outcome.label, "{}", outcome.message);
        }
        for err in &outcome.errors {
            warn!(kind = %summary.kind, item = %outcome.label, file = %err.file, "{}", err.error);
        }
    }
}

fn plural_y(n: usize) -> &'static str {
    if n == 1 { "y" } else { "ies" }
}

/// Apply a fetch result, returning the new load state
fn loaded<T>(
    result: Result<Vec<T>, CtfghError>,
    what: &str,
    replace: impl FnOnce(Vec<T>),
) -> LoadState {
    match result {
        Ok(items) => {
            debug!(what, count = items.len(), "collection loaded");
            replace(items);
            LoadState::Loaded
        }
        Err(e) => {
            warn!(what, error = %e, "fetch failed");
            LoadState::Failed(e.to_string())
        }
    }
}
