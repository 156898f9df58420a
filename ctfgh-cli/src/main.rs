mod app;
mod config;
mod logging;
mod tui;
mod ui;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ctfgh_core::{DeleteMode, ItemKey, ListState, Listed, SyncClient};
use ratatui::{
    Frame, Terminal, backend::CrosstermBackend, buffer::Buffer, style::Style, widgets::Widget,
};
use tracing::info;

use app::{Action, AppMode, AppState, LoadState, ViewMode, Worker};
use config::{Overrides, Settings};
use tui::{AppEvent, EventHandler, handle_key};
use ui::{
    AppLayout, BatchProgressView, ConfirmView, Footer, Header, HelpView, ItemList, NoticeView,
    Pager, ReportView, RowColumns, Theme,
};

/// CTFGH - terminal admin client for the CTFd GitHub backup plugin
#[derive(Parser, Debug)]
#[command(name = "ctfgh")]
#[command(about = "Browse, save, import and export CTFd challenges backed by GitHub")]
#[command(version)]
struct Args {
    /// CTFd root URL
    #[arg(long, env = "CTFGH_URL")]
    url: Option<String>,

    /// Admin `session` cookie value
    #[arg(long, env = "CTFGH_SESSION", hide_env_values = true)]
    session: Option<String>,

    /// CSRF nonce; scraped from the admin page when omitted
    #[arg(long, env = "CTFGH_CSRF_TOKEN", hide_env_values = true)]
    csrf_token: Option<String>,

    /// Directory for exported challenges and the template
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// What imports do with challenges removed upstream: keep, sync_only or full
    #[arg(long, value_name = "MODE")]
    delete_mode: Option<DeleteMode>,

    /// Read only this config file instead of the platform and local ones
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            url: self.url.clone(),
            session: self.session.clone(),
            csrf_token: self.csrf_token.clone(),
            timeout_secs: self.timeout,
            delete_mode: self.delete_mode,
            download_dir: self.download_dir.clone(),
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let _log_guard = logging::init_logging();

    let file = config::load_config(args.config.as_deref())?;
    let settings = Settings::resolve(args.overrides(), file)?;
    let client = SyncClient::new(settings.client.clone())?;
    info!(url = client.base_url(), "starting");

    // Restore the terminal before the panic report is printed
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        hook(panic);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app
    let result = run_app(&mut terminal, &settings, client);

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;

    info!("exiting");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &Settings,
    client: SyncClient,
) -> Result<()> {
    let theme = Theme::default();
    let (worker, receiver) = Worker::new(Arc::new(client));
    let mut state = AppState::new(settings, worker, receiver);
    let event_handler = EventHandler::new(50); // 50ms tick rate

    state.load_all();

    loop {
        // Results of background requests and batch progress
        state.poll_worker();
        state.poll_batch();

        terminal.draw(|frame| draw(frame, &state, &theme))?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                let action = handle_key(key, state.mode);
                handle_action(&mut state, action);
            }
            AppEvent::Resize => {
                // Terminal will redraw on next loop
            }
            AppEvent::Tick => {
                state.tick_spinner();
            }
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let area = frame.area();
    let layout = AppLayout::new(area);
    let buf = frame.buffer_mut();

    // Background
    buf.set_style(area, Style::default().bg(theme.bg));

    Header::new(state, theme).render(layout.header, buf);

    let in_flight = state
        .batch
        .progress()
        .and_then(|p| p.in_flight.as_ref().map(|key| (key, p.kind.progress_label())));

    match state.view_mode {
        ViewMode::RemoteRepos => {
            render_list(&state.remote, &state.remote_load, in_flight, theme, &layout, buf)
        }
        ViewMode::SavedRepos => {
            render_list(&state.saved, &state.saved_load, in_flight, theme, &layout, buf)
        }
        ViewMode::Challenges => render_list(
            &state.challenges,
            &state.challenges_load,
            in_flight,
            theme,
            &layout,
            buf,
        ),
    }

    match state.mode {
        AppMode::Browsing | AppMode::Search => {}
        AppMode::Help => HelpView::new(theme).render(area, buf),
        AppMode::Confirm => {
            if let Some(pending) = &state.pending {
                ConfirmView::new(pending, theme).render(area, buf);
            }
        }
        AppMode::Running => {
            if let Some(progress) = state.batch.progress() {
                BatchProgressView::new(progress, state.batch.phase(), state.spinner_frame, theme)
                    .render(area, buf);
            }
        }
        AppMode::Report => {
            if let Some(summary) = &state.report {
                ReportView::new(summary, theme)
                    .scroll(state.report_scroll)
                    .render(area, buf);
            }
        }
        AppMode::Notice => {
            if let Some(notice) = state.current_notice() {
                NoticeView::new(notice, theme).render(area, buf);
            }
        }
    }

    Footer::new(state, theme).render(layout.footer, buf);
}

fn render_list<T: Listed + RowColumns>(
    list: &ListState<T>,
    load: &LoadState,
    in_flight: Option<(&ItemKey, &'static str)>,
    theme: &Theme,
    layout: &AppLayout,
    buf: &mut Buffer,
) {
    let view = list.view();
    Pager::new(&view, theme).render(layout.pager, buf);
    ItemList::new(&view, load, list.filter(), theme)
        .with_in_flight(in_flight)
        .render(layout.list, buf);
}

fn handle_action(state: &mut AppState, action: Action) {
    match action {
        Action::MoveUp => state.move_up(),
        Action::MoveDown => state.move_down(),
        Action::NextPage => state.next_page(),
        Action::PrevPage => state.prev_page(),
        Action::NextView => state.next_view(),
        Action::PrevView => state.prev_view(),
        Action::ToggleSelect => state.toggle_select(),
        Action::SelectAll => state.select_all(),
        Action::ClearSelection => state.clear_selection(),
        Action::StartSearch => state.start_search(),
        Action::SearchInput(c) => state.search_input(c),
        Action::SearchBackspace => state.search_backspace(),
        Action::SearchSubmit => state.search_submit(),
        Action::SearchCancel => state.search_cancel(),
        Action::ClearFilter => state.clear_filter(),
        Action::SaveSelection => state.save_selection(),
        Action::ImportFocused => state.import(true),
        Action::ImportSelected => state.import(false),
        Action::DeleteFocused => state.delete(true),
        Action::DeleteSelected => state.delete(false),
        Action::CycleDeleteMode => state.cycle_delete_mode(),
        Action::ExportFocused => state.export_focused(),
        Action::ExportSelected => state.export_selected(),
        Action::DownloadTemplate => state.download_template(),
        Action::LinkInstallation => state.link_installation(),
        Action::Reload => state.reload(),
        Action::ShowHelp => state.show_help(),
        Action::HideHelp => state.hide_help(),
        Action::Confirm => state.confirm(),
        Action::Cancel => state.cancel(),
        Action::CloseDialog => state.close_dialog(),
        Action::Quit => state.quit(),
        Action::Tick => {}
    }
}
