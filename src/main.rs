use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use hostex_calendar::app::{self, App, FetchOutcome, FetchRequest};
use hostex_calendar::booking::ReservationSource;
use hostex_calendar::event::{self, Action};
use hostex_calendar::render::{Renderer, TextRenderer};
use hostex_calendar::{cli, components, config, theme, tui};
use ratatui::layout::{Constraint, Layout, Rect};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = cli::Cli::parse();
    let log_path = cli::init_tracing(cli.verbose)?;
    let config = config::Config::load(cli.config.as_deref())?;
    theme::init(config.theme.clone().into_theme());

    let source = config
        .build_source(cli.file.clone())
        .wrap_err("setting up the reservation source")?;
    info!(mode = ?source.mode(), log = ?log_path, "starting");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let mut app = App::new(cli.month, config.window_past_days, config.window_future_days);

    if cli.print {
        return print_month(&runtime, &source, &mut app);
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_fetch(&runtime, &source, app.request_fetch(), tx.clone());

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app, &runtime, &source, &tx, &mut rx);
    tui::restore()?;
    result
}

fn print_month(runtime: &Runtime, source: &ReservationSource, app: &mut App) -> Result<()> {
    let request = app.request_fetch();
    let result = runtime
        .block_on(source.fetch(request.window))
        .map_err(|e| e.to_string());
    app.apply_fetch(FetchOutcome {
        generation: request.generation,
        window: request.window,
        result,
    });
    if let app::LoadState::Failed(err) = &app.load_state {
        return Err(eyre!("failed to load bookings: {err}"));
    }

    let mut renderer = TextRenderer::default();
    renderer.render(&app.layout());
    print!("{}", renderer.into_string());
    Ok(())
}

fn spawn_fetch(
    runtime: &Runtime,
    source: &ReservationSource,
    request: FetchRequest,
    tx: UnboundedSender<FetchOutcome>,
) {
    let source = source.clone();
    runtime.spawn(async move {
        let result = source
            .fetch(request.window)
            .await
            .map_err(|e| e.to_string());
        let _ = tx.send(FetchOutcome {
            generation: request.generation,
            window: request.window,
            result,
        });
    });
}

fn run(
    terminal: &mut tui::Tui,
    app: &mut App,
    runtime: &Runtime,
    source: &ReservationSource,
    tx: &UnboundedSender<FetchOutcome>,
    rx: &mut UnboundedReceiver<FetchOutcome>,
) -> Result<()> {
    while app.running {
        while let Ok(outcome) = rx.try_recv() {
            app.apply_fetch(outcome);
        }

        terminal.draw(|frame| draw(frame, app))?;

        let Some(key) = event::next_key_event(Duration::from_millis(100))? else {
            continue;
        };
        // Clear status message on any key
        app.status_message = None;

        let Some(action) = event::action_for(key) else {
            continue;
        };
        debug!(?action, "key action");

        // Help overlay takes priority
        if app.show_help {
            if matches!(action, Action::Close | Action::ToggleHelp) {
                app.show_help = false;
            } else if action == Action::Quit {
                app.running = false;
            }
            continue;
        }

        // Detail popup takes priority
        if app.detail.is_some() {
            match action {
                Action::Close | Action::ShowDetail => app.close_detail(),
                Action::Quit => app.running = false,
                _ => {}
            }
            continue;
        }

        if let Some(request) = handle_action(app, action) {
            spawn_fetch(runtime, source, request, tx.clone());
        }
    }

    Ok(())
}

fn handle_action(app: &mut App, action: Action) -> Option<FetchRequest> {
    match action {
        Action::Quit => {
            app.running = false;
            None
        }
        Action::PrevDay => app.prev_day(),
        Action::NextDay => app.next_day(),
        Action::PrevWeek => app.prev_week(),
        Action::NextWeek => app.next_week(),
        Action::PrevMonth => app.prev_month(),
        Action::NextMonth => app.next_month(),
        Action::Today => app.go_to_today(),
        Action::NextBooking => {
            app.cursor_down();
            None
        }
        Action::ShowDetail => {
            app.show_detail();
            None
        }
        Action::Close => None,
        Action::Reload => {
            app.status_message = Some("Reloading bookings".to_string());
            Some(app.request_fetch())
        }
        Action::ToggleHelp => {
            app.show_help = true;
            None
        }
    }
}

fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    // Main layout: content + status bar
    let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
    let content = rows[0];

    let (month_area, day_area) = if content.width >= 100 {
        let cols = Layout::horizontal([Constraint::Min(60), Constraint::Length(44)]).split(content);
        (cols[0], cols[1])
    } else {
        let parts = Layout::vertical([Constraint::Min(10), Constraint::Length(8)]).split(content);
        (parts[0], parts[1])
    };

    let layout = app.layout();
    components::MonthView::new(frame.buffer_mut(), month_area, app.selected_date, app.today)
        .render(&layout);

    let day_bookings = app.day_bookings();
    components::DayView::render(
        frame,
        day_area,
        app.selected_date,
        &day_bookings,
        app.day_cursor,
        &app.load_state,
    );

    if let Some(booking) = app.detail_booking() {
        components::day_view::render_detail_popup(frame, area, booking);
    }

    if app.show_help {
        render_help(frame, area);
    }

    components::StatusBar::render(frame, rows[1], app);
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_w = area.width.clamp(30, 52).min(area.width);
    let popup_h = area.height.clamp(12, 20).min(area.height);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let entry = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {keys:<10}"), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Navigation", section_style)),
        entry("h/l", "Previous/next day"),
        entry("k/j", "Previous/next week"),
        entry("[/]", "Previous/next month"),
        entry("t, Home", "Jump to today"),
        Line::from(""),
        Line::from(Span::styled("Bookings", section_style)),
        entry("Tab", "Next booking on the day"),
        entry("Enter", "Booking details"),
        entry("r", "Reload / retry"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  q", key_style),
            Span::styled(" / ", theme::DIM_STYLE),
            Span::styled("Esc     ", key_style),
            Span::raw("Quit / close popup"),
        ]),
    ];

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
