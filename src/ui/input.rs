//! Keyboard input handling.
//!
//! Overlays capture input first (help, then the category picker). Otherwise
//! keys are resolved through the keybinding registry in the context of the
//! focused panel.

use crate::app::{App, AppEvent, FetchReason, Focus};
use crate::board::{CategoryChoice, Direction, VoteState};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::spawn_catalog_fetch;
use super::Action;

fn focus_to_context(focus: Focus) -> KbContext {
    match focus {
        Focus::Movies => KbContext::MovieList,
        Focus::Tokens => KbContext::Tokens,
    }
}

/// Main input dispatch function.
pub(super) async fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    if app.picker.is_some() {
        return Ok(handle_picker_input(app, code, modifiers));
    }

    handle_board_input(app, code, modifiers, event_tx).await
}

/// Help overlay: j/k scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

fn handle_picker_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Picker)
    {
        Some(KbAction::NavDown) => app.nav_down(),
        Some(KbAction::NavUp) => app.nav_up(),
        Some(KbAction::Select) => {
            app.confirm_picker();
            let label = app.movies.selection().category().label().to_string();
            app.set_status(format!("Category: {}", label));
        }
        Some(KbAction::Back) => app.close_picker(),
        _ => {}
    }
    Action::Continue
}

async fn handle_board_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // A page number being typed owns Enter and Esc; any other key drops it.
    if app.page_entry.is_some() {
        match code {
            KeyCode::Enter => {
                app.commit_page_entry();
                return Ok(Action::Continue);
            }
            KeyCode::Esc => {
                app.page_entry = None;
                app.status_message = None;
                return Ok(Action::Continue);
            }
            KeyCode::Char('0'..='9') => {}
            _ => app.page_entry = None,
        }
    }

    let context = focus_to_context(app.focus);
    let Some(action) = app.keybindings.action_for_key(code, modifiers, context) else {
        // Unbound digits type a page number.
        if let KeyCode::Char(c) = code {
            if let Some(digit) = c.to_digit(10) {
                app.push_page_digit(digit as usize);
            }
        }
        return Ok(Action::Continue);
    };

    match action {
        KbAction::Quit => return Ok(Action::Quit),
        KbAction::Back => app.focus = Focus::Movies,
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::CycleFocus => app.cycle_focus(),
        KbAction::Like => rate(app, Direction::Up).await?,
        KbAction::Dislike => rate(app, Direction::Down).await?,
        KbAction::DeleteMovie => {
            if let Some(removed) = app.delete_selected().await? {
                app.set_status(format!("Deleted \"{}\"", removed.title));
            }
        }
        KbAction::RemoveToken => {
            if let Some(token) = app.remove_selected_token() {
                app.set_status(format!("Removed {}", token));
            }
        }
        KbAction::PickCategory => {
            if app.movies.movies().is_empty() {
                app.set_status("No movies loaded");
            } else {
                app.open_picker();
            }
        }
        KbAction::ShowAll => {
            app.select_category(CategoryChoice::All);
            app.set_status("Showing all categories");
        }
        KbAction::CyclePageSize => {
            let size = app.cycle_page_size();
            app.set_status(format!("{} movies per page", size));
        }
        KbAction::PrevPage => {
            app.previous_page();
        }
        KbAction::NextPage => {
            app.next_page();
        }
        KbAction::ResetMovies => {
            spawn_catalog_fetch(app, FetchReason::Reset, event_tx);
        }
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        KbAction::Select => {}
    }

    Ok(Action::Continue)
}

async fn rate(app: &mut App, direction: Direction) -> Result<()> {
    if let Some((title, state)) = app.rate_selected(direction).await? {
        let msg = match state {
            VoteState::Liked => format!("Liked \"{}\"", title),
            VoteState::Disliked => format!("Disliked \"{}\"", title),
            VoteState::Neutral => format!("Vote removed from \"{}\"", title),
        };
        app.set_status(msg);
    }
    Ok(())
}
