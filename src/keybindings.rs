//! Keybinding registry: maps actions to key events with config overrides.
//!
//! Dispatch is data-driven so users can remap any action from config.toml.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    CycleFocus,
    Back,
    Select,
    Like,
    Dislike,
    DeleteMovie,
    RemoveToken,
    PickCategory,
    ShowAll,
    CyclePageSize,
    PrevPage,
    NextPage,
    ResetMovies,
    CycleTheme,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Navigate down",
            Self::NavUp => "Navigate up",
            Self::CycleFocus => "Switch between movies and tokens",
            Self::Back => "Go back / dismiss",
            Self::Select => "Confirm selection",
            Self::Like => "Like movie (again to undo)",
            Self::Dislike => "Dislike movie (again to undo)",
            Self::DeleteMovie => "Delete movie",
            Self::RemoveToken => "Remove category token",
            Self::PickCategory => "Pick a category",
            Self::ShowAll => "Show all categories",
            Self::CyclePageSize => "Cycle page size (4/8/12)",
            Self::PrevPage => "Previous page",
            Self::NextPage => "Next page",
            Self::ResetMovies => "Reset movies from catalog",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context. Determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    MovieList,
    Tokens,
    Picker,
}

impl Context {
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::MovieList => "Movie list",
            Self::Tokens => "Category tokens",
            Self::Picker => "Category picker",
        }
    }
}

// ============================================================================
// Keys
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Read a key from its config spelling: a single character, a name from
    /// [`NAMED_KEYS`] (case-insensitive), `F1`..`F12`, or `Ctrl+<char>`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if let Some(rest) = text.strip_prefix("Ctrl+") {
            return single_char(rest.trim()).map(Self::ctrl);
        }
        if let Some(&(_, code)) = NAMED_KEYS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(text))
        {
            return Some(Self::plain(code));
        }
        if let Some(n) = text
            .strip_prefix(['F', 'f'])
            .and_then(|digits| digits.parse::<u8>().ok())
        {
            return (1..=12).contains(&n).then_some(Self::plain(KeyCode::F(n)));
        }
        single_char(text).map(Self::char)
    }
}

impl std::fmt::Display for KeySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("Ctrl+")?;
        }
        if let Some((name, _)) = NAMED_KEYS.iter().find(|(_, code)| *code == self.code) {
            return f.write_str(name);
        }
        match self.code {
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::F(n) => write!(f, "F{}", n),
            _ => f.write_str("?"),
        }
    }
}

/// Names accepted in config, first spelling wins when displaying.
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("Space", KeyCode::Char(' ')),
    ("Enter", KeyCode::Enter),
    ("Return", KeyCode::Enter),
    ("Esc", KeyCode::Esc),
    ("Escape", KeyCode::Esc),
    ("Tab", KeyCode::Tab),
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("Backspace", KeyCode::Backspace),
    ("Delete", KeyCode::Delete),
    ("Del", KeyCode::Delete),
];

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Config names for each action. Matching ignores case.
const ACTION_NAMES: &[(&str, Action)] = &[
    ("quit", Action::Quit),
    ("nav_down", Action::NavDown),
    ("down", Action::NavDown),
    ("nav_up", Action::NavUp),
    ("up", Action::NavUp),
    ("cycle_focus", Action::CycleFocus),
    ("focus", Action::CycleFocus),
    ("back", Action::Back),
    ("select", Action::Select),
    ("like", Action::Like),
    ("thumbs_up", Action::Like),
    ("dislike", Action::Dislike),
    ("thumbs_down", Action::Dislike),
    ("delete_movie", Action::DeleteMovie),
    ("delete", Action::DeleteMovie),
    ("remove_token", Action::RemoveToken),
    ("pick_category", Action::PickCategory),
    ("category", Action::PickCategory),
    ("show_all", Action::ShowAll),
    ("cycle_page_size", Action::CyclePageSize),
    ("page_size", Action::CyclePageSize),
    ("prev_page", Action::PrevPage),
    ("previous_page", Action::PrevPage),
    ("next_page", Action::NextPage),
    ("reset_movies", Action::ResetMovies),
    ("reset", Action::ResetMovies),
    ("cycle_theme", Action::CycleTheme),
    ("theme", Action::CycleTheme),
    ("show_help", Action::ShowHelp),
    ("help", Action::ShowHelp),
];

impl Action {
    pub fn from_config_name(name: &str) -> Option<Self> {
        ACTION_NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
            .map(|&(_, action)| action)
    }
}

// ============================================================================
// Default Bindings
// ============================================================================

const DEFAULT_BINDINGS: &[(Context, KeySpec, Action)] = &[
    (Context::Global, KeySpec::char('q'), Action::Quit),
    (Context::Global, KeySpec::char('j'), Action::NavDown),
    (Context::Global, KeySpec::plain(KeyCode::Down), Action::NavDown),
    (Context::Global, KeySpec::char('k'), Action::NavUp),
    (Context::Global, KeySpec::plain(KeyCode::Up), Action::NavUp),
    (Context::Global, KeySpec::plain(KeyCode::Tab), Action::CycleFocus),
    (Context::Global, KeySpec::plain(KeyCode::Esc), Action::Back),
    (Context::Global, KeySpec::char('c'), Action::PickCategory),
    (Context::Global, KeySpec::char('a'), Action::ShowAll),
    (Context::Global, KeySpec::char('p'), Action::CyclePageSize),
    (Context::Global, KeySpec::char('h'), Action::PrevPage),
    (Context::Global, KeySpec::plain(KeyCode::Left), Action::PrevPage),
    (Context::Global, KeySpec::char('['), Action::PrevPage),
    (Context::Global, KeySpec::char('l'), Action::NextPage),
    (Context::Global, KeySpec::plain(KeyCode::Right), Action::NextPage),
    (Context::Global, KeySpec::char(']'), Action::NextPage),
    (Context::Global, KeySpec::char('R'), Action::ResetMovies),
    (Context::Global, KeySpec::char('T'), Action::CycleTheme),
    (Context::Global, KeySpec::char('?'), Action::ShowHelp),
    // Movie list
    (Context::MovieList, KeySpec::char('+'), Action::Like),
    (Context::MovieList, KeySpec::char('='), Action::Like),
    (Context::MovieList, KeySpec::char('-'), Action::Dislike),
    (Context::MovieList, KeySpec::char('d'), Action::DeleteMovie),
    (Context::MovieList, KeySpec::plain(KeyCode::Delete), Action::DeleteMovie),
    // Token list
    (Context::Tokens, KeySpec::char('x'), Action::RemoveToken),
    (Context::Tokens, KeySpec::char('d'), Action::RemoveToken),
    (Context::Tokens, KeySpec::plain(KeyCode::Enter), Action::RemoveToken),
    (Context::Tokens, KeySpec::plain(KeyCode::Delete), Action::RemoveToken),
    // Category picker overlay
    (Context::Picker, KeySpec::plain(KeyCode::Enter), Action::Select),
    (Context::Picker, KeySpec::plain(KeyCode::Esc), Action::Back),
    (Context::Picker, KeySpec::char('q'), Action::Back),
];

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts; lookups
/// fall back to [`Context::Global`].
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// Insertion order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::with_capacity(DEFAULT_BINDINGS.len()),
        };
        for &(context, key, action) in DEFAULT_BINDINGS {
            registry.bind(context, key, action);
        }
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        if let Some(previous) = self.lookup.insert((context, key), action) {
            // The key now belongs to `action`; drop the stale help entry.
            self.bindings
                .retain(|(c, k, a)| !(*c == context && *k == key && *a == previous));
        }
        self.bindings.push((context, key, action));
    }

    /// Rebind actions from the `[keybindings]` config table
    /// (`action name -> key`).
    ///
    /// The new key takes over every context the action had a default in, and
    /// the old keys stop working. Entries that cannot be used come back as
    /// warnings for the caller to log.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (name, key_text) in overrides {
            let (action, key) = match (Action::from_config_name(name), KeySpec::parse(key_text)) {
                (Some(action), Some(key)) => (action, key),
                (None, _) => {
                    warnings.push(format!("keybindings.{}: no such action", name));
                    continue;
                }
                (Some(_), None) => {
                    warnings.push(format!(
                        "keybindings.{}: cannot understand key \"{}\"",
                        name, key_text
                    ));
                    continue;
                }
            };

            let mut contexts = Vec::new();
            for &(ctx, _, bound) in &self.bindings {
                if bound == action && !contexts.contains(&ctx) {
                    contexts.push(ctx);
                }
            }
            self.lookup.retain(|_, bound| *bound != action);
            self.bindings.retain(|&(_, _, bound)| bound != action);
            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::debug!(?action, %key, "Rebound action");
        }

        warnings
    }

    /// Look up the action for a given key in a given context.
    ///
    /// Tries the specific context first, then falls back to Global. The picker
    /// overlay is modal and only falls back for navigation.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        // Shifted characters arrive as the shifted char plus SHIFT.
        let modifiers = match code {
            KeyCode::Char(_) => modifiers - KeyModifiers::SHIFT,
            _ => modifiers,
        };
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context == Context::Global {
            return None;
        }

        let global = self.lookup.get(&(Context::Global, key)).copied()?;
        match (context, global) {
            (Context::Picker, Action::NavUp | Action::NavDown) => Some(global),
            (Context::Picker, _) => None,
            _ => Some(global),
        }
    }

    /// All bindings for the help screen, as
    /// (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|&(ctx, key, action)| (ctx, key.to_string(), action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
