//! Signup - schema-driven form demo
//!
//! One form, bound to a shared forms store through a logging middleware:
//! - Field edits dispatch `SET_SCHEMA_FORM_DATA` into the form's slice
//! - Enter validates every field and only submits when all pass
//! - Submissions flow back to the app as actions on its own store
//!
//! Keys: Tab/Shift-Tab = move, Space = toggle, Enter = submit, Esc = quit

mod fields;
mod renderer;

use std::cell::RefCell;
use std::error::Error;
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use form_dispatch::prelude::*;
use form_dispatch::spawn_event_poller;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem},
    Terminal,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::fields::{checkbox, text_field};
use crate::renderer::SignupRenderer;

const BUNDLED_DEFINITION: &str = include_str!("../signup.json");

#[derive(Parser, Debug)]
#[command(name = "signup", about = "Schema-driven signup form")]
struct Args {
    /// Form definition JSON (defaults to the bundled signup form)
    #[arg(short, long)]
    definition: Option<PathBuf>,

    /// Write logs to this file; logging is off otherwise
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "debug")]
    log_level: String,
}

// ============================================================================
// App state - what happened to the form
// ============================================================================

#[derive(Default)]
struct AppState {
    submissions: Vec<CleanModel>,
}

#[derive(Action, Clone, Debug)]
#[action(screaming)]
enum AppAction {
    SubmitDidSucceed(CleanModel),
    Quit,
}

fn reducer(state: &mut AppState, action: AppAction) -> bool {
    match action {
        AppAction::SubmitDidSucceed(clean) => {
            state.submissions.push(clean);
            true
        }
        AppAction::Quit => false,
    }
}

fn components() -> ComponentMap {
    ComponentMap::new()
        .with("string", text_field)
        .with("integer", text_field)
        .with("number", text_field)
        .with("boolean", checkbox)
}

fn init_logging(args: &Args) -> Result<(), Box<dyn Error>> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str())),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn is_quit(event: &EventKind) -> bool {
    event.key().is_some_and(|key| {
        key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    })
}

fn submissions_panel(state: &AppState) -> List<'static> {
    let items: Vec<ListItem> = state
        .submissions
        .iter()
        .map(|clean| ListItem::new(Value::Object(clean.clone()).to_string()))
        .collect();
    List::new(items).block(
        Block::default()
            .title(format!(" Submissions ({}) ", state.submissions.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let definition = match &args.definition {
        Some(path) => FormDefinition::from_json(&fs::read_to_string(path)?)?,
        None => FormDefinition::from_json(BUNDLED_DEFINITION)?,
    };
    tracing::info!(form = %definition.id, "Starting signup demo");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, definition).await;

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    for clean in result? {
        println!("{}", serde_json::to_string_pretty(&Value::Object(clean))?);
    }
    Ok(())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    definition: FormDefinition,
) -> Result<Vec<CleanModel>, Box<dyn Error>> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let mut app = Store::new(AppState::default(), reducer);

    // Forms store shared by every mounted form
    let forms = Rc::new(RefCell::new(StoreWithMiddleware::new(
        FormsState::default(),
        forms_reducer,
        LoggingMiddleware::new(),
    )));

    let submit_tx = action_tx.clone();
    let props = definition
        .into_builder()
        .component_map(components())
        .on_submit(move |clean| {
            let _ = submit_tx.send(AppAction::SubmitDidSucceed(clean));
        })
        .build()?;
    let mut form = FormController::mount(props, Rc::clone(&forms));
    let mut renderer = SignupRenderer::new();

    // Event poller
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<EventKind>();
    let cancel_token = CancellationToken::new();
    let _handle = spawn_event_poller(
        event_tx,
        Duration::from_millis(10),
        Duration::from_millis(16),
        cancel_token.clone(),
    );

    let mut should_render = true;

    loop {
        if should_render {
            terminal.draw(|frame| {
                let [form_area, side] =
                    Layout::horizontal([Constraint::Fill(3), Constraint::Fill(2)])
                        .areas(frame.area());
                form.render(&mut renderer, frame, form_area);
                frame.render_widget(submissions_panel(app.state()), side);
            })?;
            should_render = false;
        }

        tokio::select! {
            Some(event) = event_rx.recv() => {
                if is_quit(&event) {
                    let _ = action_tx.send(AppAction::Quit);
                } else {
                    form.handle_event(&mut renderer, &event);
                    // Focus and status live in the renderer, so redraw on any input
                    should_render = true;
                }
            }

            Some(action) = action_rx.recv() => {
                if matches!(action, AppAction::Quit) {
                    break;
                }
                should_render |= app.dispatch(action);
            }

            else => break,
        }
    }

    cancel_token.cancel();
    form.unmount();
    tracing::info!(slices = forms.borrow().state().len(), "Signup demo finished");

    Ok(std::mem::take(&mut app.state_mut().submissions))
}
