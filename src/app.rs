//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that routes key events to the top modal or the focused pane, applies
//! Actions to the view-model and drains finished background jobs on every tick.

use crate::action::{Action, ItemRef};
use crate::component::Component;
use crate::components::{
    calculate_main_layout, draw_toasts, GalleryComponent, HelpDialog, HistoryComponent,
    PromptComponent, QuitDialog, ResultComponent, SubscribeDialog,
};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::ui::Focus;
use crate::model::{Gallery, GenerationFlow, HistoryStrip, ToastStack};
use crate::services::{
    copy_url, share_command, Clipboard, GenerationBackend, JobMessage, JobRunner,
};
use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::sync::Arc;
use std::time::Instant;

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    pub config: Config,

    /// Submission state, last result and last error
    pub flow: GenerationFlow,

    /// Session gallery
    pub gallery: Gallery,

    /// Recent generations
    pub history: HistoryStrip,

    /// Transient notifications
    pub toasts: ToastStack,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Pane receiving key input
    pub focus: Focus,

    /// Background job runner
    pub job_runner: JobRunner,

    /// Target for copied URLs
    clipboard: Box<dyn Clipboard>,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub prompt: PromptComponent,
    pub result_view: ResultComponent,
    pub gallery_view: GalleryComponent,
    pub history_view: HistoryComponent,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
    pub subscribe_dialog: SubscribeDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create a new App instance
    pub fn new(
        config: Config,
        backend: Arc<dyn GenerationBackend>,
        clipboard: Box<dyn Clipboard>,
    ) -> App {
        let mut app = App {
            config,
            flow: GenerationFlow::new(),
            gallery: Gallery::new(),
            history: HistoryStrip::new(),
            toasts: ToastStack::new(),
            modals: ModalStack::new(),
            focus: Focus::Prompt,
            job_runner: JobRunner::new(backend),
            clipboard,
            should_quit: false,
            // Components
            prompt: PromptComponent::new(),
            result_view: ResultComponent::new(),
            gallery_view: GalleryComponent::new(),
            history_view: HistoryComponent::new(),
            quit_dialog: QuitDialog::default(),
            help_dialog: HelpDialog::default(),
            subscribe_dialog: SubscribeDialog,
        };
        app.sync_views();
        app
    }

    /// Push view-model state into the components
    fn sync_views(&mut self) {
        self.prompt.focused = self.focus == Focus::Prompt;
        self.result_view.focused = self.focus == Focus::Result;
        self.gallery_view.focused = self.focus == Focus::Gallery;
        self.history_view.focused = self.focus == Focus::History;

        self.prompt.loading = self.flow.elapsed();
        self.result_view.set_state(
            self.flow.result.as_ref(),
            self.flow.error.as_deref(),
            self.flow.is_loading(),
        );
        self.gallery_view.sync(&self.gallery);
        self.history_view.sync(&self.history);
        self.quit_dialog.unsaved_images = self.gallery.len();
    }

    /// Image locator and prompt of an item
    fn item_image(&self, item: ItemRef) -> Option<(String, String)> {
        match item {
            ItemRef::Result => self
                .flow
                .result
                .as_ref()
                .map(|r| (r.image_url.clone(), r.prompt.clone())),
            ItemRef::Tile(id) => self
                .gallery
                .get(id)
                .map(|t| (t.image_url.clone(), t.prompt.clone())),
            ItemRef::History(index) => self
                .history
                .get(index)
                .map(|h| (h.image_url.clone(), h.prompt.clone())),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Generation
    // ─────────────────────────────────────────────────────────────────────────

    fn submit_prompt(&mut self) {
        let prompt = self.prompt.input.clone();
        match self.flow.submit(&prompt) {
            Ok((ticket, request)) => {
                log::info!(
                    "Submitting generation {:?} ({} chars)",
                    ticket,
                    request.prompt.chars().count()
                );
                self.job_runner.spawn_generation(ticket, request);
            }
            // The flow shows validation errors in the result pane
            Err(e) if e.is_validation() => {
                log::debug!("Prompt rejected: {}", e);
            }
            Err(e) => {
                log::debug!("Submission rejected: {}", e);
                self.toasts.info(e.to_string());
            }
        }
    }

    /// Drain finished background jobs
    fn poll_jobs(&mut self) {
        for message in self.job_runner.poll() {
            self.handle_job_message(message);
        }
    }

    fn handle_job_message(&mut self, message: JobMessage) {
        match message {
            JobMessage::Generated { ticket, outcome } => {
                if let Err(e) = &outcome {
                    log::warn!("Generation {:?} failed: {}", ticket, e);
                }
                if let Some(result) = self.flow.complete(ticket, outcome) {
                    log::info!("Generation {:?} produced {}", ticket, result.image_url);
                    self.gallery
                        .add(result.image_url.clone(), result.prompt.clone(), Local::now());
                    self.history
                        .push(result.image_url.clone(), result.prompt.clone());

                    self.sync_views();
                    self.result_view.expect_preview(&result.image_url);
                    self.job_runner.spawn_preview(result.image_url);
                }
            }
            JobMessage::Downloaded { outcome } => match outcome {
                Ok(path) => {
                    log::info!("Saved image to {}", path.display());
                    self.toasts
                        .success(format!("Image saved to {}", path.display()));
                }
                Err(e) => {
                    log::warn!("Download failed: {}", e);
                    self.toasts.error(e);
                }
            },
            JobMessage::Shared { url, outcome } => match outcome {
                Ok(()) => {
                    log::info!("Shared {}", url);
                    self.toasts.success("Image shared");
                }
                Err(e) => {
                    log::warn!("Sharing {} failed: {}", url, e);
                    self.toasts.error(e);
                }
            },
            JobMessage::Preview { image_url, outcome } => {
                if let Err(e) = &outcome {
                    log::warn!("Preview of {} failed: {}", image_url, e);
                }
                if !self.result_view.apply_preview(&image_url, outcome) {
                    log::debug!("Dropped preview for {}", image_url);
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Item Actions
    // ─────────────────────────────────────────────────────────────────────────

    fn download(&mut self, item: ItemRef) {
        let Some((locator, prompt)) = self.item_image(item) else {
            return;
        };
        let dir = self.config.download_dir_path();
        log::info!("Downloading {} into {}", locator, dir.display());
        self.toasts.info("Downloading image...");
        self.job_runner.spawn_download(locator, prompt, dir);
    }

    fn share(&mut self, item: ItemRef) {
        let Some((locator, _)) = self.item_image(item) else {
            return;
        };
        let url = match self.job_runner.backend().resolve(&locator) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("Cannot share {}: {}", locator, e);
                self.toasts.error(format!("Error sharing: {}", e));
                return;
            }
        };

        if let Some(command) = share_command(self.config.share_command.as_deref()) {
            log::info!("Sharing {} with '{}'", url, command);
            let command = command.to_string();
            self.job_runner.spawn_share(command, url);
            return;
        }

        match copy_url(&url, self.clipboard.as_mut()) {
            Ok(()) => self.toasts.success("Image URL copied to clipboard"),
            Err(e) => {
                log::warn!("Copying {} failed: {}", url, e);
                self.toasts.error(e.to_string());
            }
        }
    }

    fn save_to_gallery(&mut self) {
        let Some(result) = self.flow.result.clone() else {
            return;
        };
        self.gallery.add(result.image_url, result.prompt, Local::now());
        self.toasts.success("Image saved to gallery");
    }

    fn generate_similar(&mut self, item: ItemRef) {
        if let Some((_, prompt)) = self.item_image(item) {
            self.prompt.set_input(&prompt);
            self.focus = Focus::Prompt;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        log::info!(
            "Backend {}, downloads go to {}",
            self.config.backend_url,
            self.config.download_dir_path().display()
        );
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(modal) = self.modals.top().cloned() {
            return self.handle_modal_key_event(&modal, key);
        }

        // Keys that work in every pane
        let global = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::OpenQuitDialog)
            }
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::BackTab => Some(Action::FocusPrev),
            KeyCode::F(1) => Some(Action::OpenHelp),
            _ => None,
        };
        if global.is_some() {
            return Ok(global);
        }

        if self.focus == Focus::Prompt {
            return self.prompt.handle_key_event(key);
        }

        // Keys shared by the panes without text input
        let shared = match key.code {
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('t') => Some(Action::ToggleTheme),
            KeyCode::Char('n') => Some(Action::OpenSubscribe),
            KeyCode::Char('i') | KeyCode::Char('/') => Some(Action::FocusPrompt),
            _ => None,
        };
        if shared.is_some() {
            return Ok(shared);
        }

        match self.focus {
            Focus::Result => self.result_view.handle_key_event(key),
            Focus::Gallery => self.gallery_view.handle_key_event(key),
            Focus::History => self.history_view.handle_key_event(key),
            Focus::Prompt => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let mut follow_up = None;

        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                self.poll_jobs();
                let now = Instant::now();
                let removed = self.gallery.sweep(now);
                if removed > 0 {
                    log::debug!("Removed {} gallery tile(s)", removed);
                }
                self.toasts.tick(now);
                self.prompt.loading = self.flow.elapsed();
                self.prompt.update(Action::Tick)?;
            }
            Action::Resize(_, _) => {}
            Action::ForceQuit => {
                log::info!("Quitting");
                self.should_quit = true;
            }

            // ─────────────────────────────────────────────────────────────────
            // Focus
            // ─────────────────────────────────────────────────────────────────
            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusPrev => self.focus = self.focus.previous(),
            Action::FocusPrompt => self.focus = Focus::Prompt,

            // ─────────────────────────────────────────────────────────────────
            // Prompt
            // ─────────────────────────────────────────────────────────────────
            Action::PromptInput(_) | Action::PromptBackspace | Action::PromptClear => {
                self.prompt.update(action)?;
            }
            Action::PromptPaste(text) => {
                if let Some(Modal::Subscribe { email }) = self.modals.top_mut() {
                    email.push_str(text.trim());
                } else if self.modals.is_empty() {
                    self.focus = Focus::Prompt;
                    self.prompt.update(Action::PromptPaste(text))?;
                }
            }
            Action::SubmitPrompt => self.submit_prompt(),

            // ─────────────────────────────────────────────────────────────────
            // Navigation
            // ─────────────────────────────────────────────────────────────────
            Action::NextItem | Action::PrevItem => match self.focus {
                Focus::Gallery => {
                    self.gallery_view.update(action)?;
                }
                Focus::History => {
                    self.history_view.update(action)?;
                }
                Focus::Prompt | Focus::Result => {}
            },

            // ─────────────────────────────────────────────────────────────────
            // Gallery Filter
            // ─────────────────────────────────────────────────────────────────
            Action::NextFilter => {
                let filter = self.gallery_view.filter.next();
                self.gallery_view.set_filter(filter, &self.gallery);
            }
            Action::PrevFilter => {
                let filter = self.gallery_view.filter.previous();
                self.gallery_view.set_filter(filter, &self.gallery);
            }
            Action::SetFilter(filter) => {
                self.gallery_view.set_filter(filter, &self.gallery);
            }

            // ─────────────────────────────────────────────────────────────────
            // Item Actions
            // ─────────────────────────────────────────────────────────────────
            Action::Download(item) => self.download(item),
            Action::Share(item) => self.share(item),
            Action::SaveToGallery => self.save_to_gallery(),
            Action::GenerateSimilar(item) => self.generate_similar(item),
            Action::DeleteTile(id) => {
                if self.gallery.begin_remove(id, Instant::now()) {
                    log::info!("Removing gallery tile {}", id);
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => self.modals.push(Modal::QuitConfirm),
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::OpenSubscribe => self.modals.push(Modal::Subscribe {
                email: String::new(),
            }),
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => match self.modals.top().cloned() {
                Some(Modal::QuitConfirm) => follow_up = Some(Action::ForceQuit),
                Some(Modal::Subscribe { email }) => follow_up = Some(Action::Subscribe(email)),
                Some(Modal::Help) | None => {
                    self.modals.pop();
                }
            },
            Action::Subscribe(email) => {
                if !email.is_empty() {
                    log::info!("Newsletter subscription submitted");
                    self.toasts.success("Thanks for subscribing!");
                    if let Some(Modal::Subscribe { email }) = self.modals.top_mut() {
                        email.clear();
                    }
                    self.modals.pop();
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Misc
            // ─────────────────────────────────────────────────────────────────
            Action::ToggleTheme => self.toasts.info("Dark mode is the only available theme"),
        }

        self.sync_views();
        Ok(follow_up)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = calculate_main_layout(area);

        self.prompt.draw(frame, layout.prompt)?;
        self.result_view.draw(frame, layout.result)?;
        self.gallery_view.draw_filters(frame, layout.filters);
        self.gallery_view.draw(frame, layout.gallery)?;
        self.history_view.draw(frame, layout.history)?;
        self.render_status_bar(frame, layout.status);
        self.render_help_bar(frame, layout.help);

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }

        draw_toasts(frame, area, &self.toasts, Instant::now());
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
            Modal::Subscribe { .. } => {
                let action = match key.code {
                    KeyCode::Esc => Some(Action::CloseModal),
                    KeyCode::Enter => Some(Action::ConfirmModal),
                    KeyCode::Backspace => {
                        if let Some(Modal::Subscribe { email }) = self.modals.top_mut() {
                            email.pop();
                        }
                        None
                    }
                    KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                        if let Some(Modal::Subscribe { email }) = self.modals.top_mut() {
                            email.push(c);
                        }
                        None
                    }
                    _ => None,
                };
                Ok(action)
            }
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::Help => self.help_dialog.draw(frame, area)?,
            Modal::Subscribe { email } => self.subscribe_dialog.draw_with_email(frame, area, email),
        }
        Ok(())
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                " PromptPix ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                format!(" {} ", self.focus.name()),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                self.config.backend_url.clone(),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!(
                    "  {} in gallery · {} recent",
                    self.gallery.len(),
                    self.history.len()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ];

        if self.flow.is_loading() {
            spans.push(Span::styled(
                "  generating...",
                Style::default().fg(Color::Yellow),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_bar(&self, frame: &mut Frame, area: Rect) {
        let key = |k: &'static str, color: Color| {
            Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
        };

        let mut spans = match self.focus {
            Focus::Prompt => vec![
                key(" Enter ", Color::Green),
                Span::raw("Generate "),
                key(" Ctrl+u ", Color::Cyan),
                Span::raw("Clear "),
                key(" Esc ", Color::Yellow),
                Span::raw("Leave prompt "),
            ],
            Focus::Result => vec![
                key(" d ", Color::Green),
                Span::raw("Download "),
                key(" s ", Color::Cyan),
                Span::raw("Share "),
                key(" a ", Color::Yellow),
                Span::raw("Save "),
                key(" g ", Color::Magenta),
                Span::raw("Similar "),
            ],
            Focus::Gallery => vec![
                key(" j/k ", Color::Cyan),
                Span::raw("Select "),
                key(" f/F ", Color::Cyan),
                Span::raw("Filter "),
                key(" d ", Color::Green),
                Span::raw("Download "),
                key(" s ", Color::Cyan),
                Span::raw("Share "),
                key(" x ", Color::Red),
                Span::raw("Delete "),
                key(" g ", Color::Magenta),
                Span::raw("Similar "),
            ],
            Focus::History => vec![
                key(" h/l ", Color::Cyan),
                Span::raw("Select "),
                key(" d ", Color::Green),
                Span::raw("Download "),
                key(" s ", Color::Cyan),
                Span::raw("Share "),
                key(" g ", Color::Magenta),
                Span::raw("Similar "),
            ],
        };

        spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        spans.push(key(" Tab ", Color::White));
        spans.push(Span::raw("Focus "));
        if self.focus == Focus::Prompt {
            spans.push(key(" F1 ", Color::White));
        } else {
            spans.push(key(" ? ", Color::White));
        }
        spans.push(Span::raw("Help"));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DownloadError, GenerationError};
    use crate::model::GenerationRequest;
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    /// Backend answering every prompt with `/static/images/<n>.png`
    #[derive(Default)]
    struct FakeBackend {
        calls: AtomicUsize,
        delay: Duration,
    }

    impl GenerationBackend for FakeBackend {
        fn generate(&self, request: &GenerationRequest) -> std::result::Result<String, GenerationError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(self.delay);
            if request.prompt.contains("fail") {
                return Err(GenerationError::Request("GPU on fire".into()));
            }
            Ok(format!("/static/images/{}.png", n))
        }

        fn fetch_image(&self, _locator: &str) -> std::result::Result<Vec<u8>, DownloadError> {
            Ok(b"not really a png".to_vec())
        }

        fn resolve(&self, locator: &str) -> std::result::Result<String, DownloadError> {
            Ok(format!("http://backend{}", locator))
        }
    }

    #[derive(Clone, Default)]
    struct SharedClipboard(Rc<RefCell<Vec<String>>>);

    impl Clipboard for SharedClipboard {
        fn copy(&mut self, text: &str) -> io::Result<()> {
            self.0.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn app_with(backend: Arc<FakeBackend>) -> (App, SharedClipboard) {
        let clipboard = SharedClipboard::default();
        let app = App::new(Config::default(), backend, Box::new(clipboard.clone()));
        (app, clipboard)
    }

    fn type_prompt(app: &mut App, text: &str) {
        app.update(Action::PromptClear).unwrap();
        for c in text.chars() {
            app.update(Action::PromptInput(c)).unwrap();
        }
    }

    /// Tick until `done` holds or five seconds pass
    fn tick_until(app: &mut App, done: impl Fn(&App) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(app) && Instant::now() < deadline {
            app.update(Action::Tick).unwrap();
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn generate(app: &mut App, prompt: &str) {
        type_prompt(app, prompt);
        app.update(Action::SubmitPrompt).unwrap();
        tick_until(app, |app| !app.flow.is_loading());
    }

    fn toast_messages(app: &App) -> Vec<String> {
        app.toasts.iter().map(|t| t.message.clone()).collect()
    }

    #[test]
    fn test_blank_prompt_never_reaches_backend() {
        let backend = Arc::new(FakeBackend::default());
        let (mut app, _) = app_with(backend.clone());

        type_prompt(&mut app, "   ");
        app.update(Action::SubmitPrompt).unwrap();

        assert!(!app.flow.is_loading());
        assert_eq!(
            app.flow.error.as_deref(),
            Some("Please enter a prompt for the image generation")
        );
        thread::sleep(Duration::from_millis(20));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_success_updates_result_gallery_and_history() {
        let backend = Arc::new(FakeBackend::default());
        let (mut app, _) = app_with(backend);

        generate(&mut app, "a red fox in the snow");

        let result = app.flow.result.clone().unwrap();
        assert_eq!(result.image_url, "/static/images/0.png");
        assert_eq!(result.prompt, "a red fox in the snow");

        let tile = app.gallery.iter().next().unwrap();
        assert_eq!(tile.image_url, result.image_url);
        assert_eq!(tile.prompt, result.prompt);

        let entry = app.history.get(0).unwrap();
        assert_eq!(entry.image_url, result.image_url);
        assert_eq!(entry.prompt, result.prompt);

        // The prompt stays in the input
        assert_eq!(app.prompt.input, "a red fox in the snow");
    }

    #[test]
    fn test_blank_submit_keeps_last_result_actionable() {
        let backend = Arc::new(FakeBackend::default());
        let (mut app, clipboard) = app_with(backend.clone());
        generate(&mut app, "a red fox in the snow");

        type_prompt(&mut app, "");
        app.update(Action::SubmitPrompt).unwrap();
        assert!(app.flow.error.is_some());
        assert_eq!(
            app.flow.result.as_ref().map(|r| r.prompt.as_str()),
            Some("a red fox in the snow")
        );

        app.update(Action::FocusNext).unwrap();
        assert_eq!(app.focus, Focus::Result);
        let s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
        let action = app.handle_key_event(s).unwrap();
        assert_eq!(action, Some(Action::Share(ItemRef::Result)));
        app.update(Action::Share(ItemRef::Result)).unwrap();
        assert_eq!(
            *clipboard.0.borrow(),
            vec!["http://backend/static/images/0.png".to_string()]
        );
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_share_command_does_not_block_updates() {
        let backend = Arc::new(FakeBackend::default());
        let (mut app, clipboard) = app_with(backend);
        app.config.share_command = Some("sh -c sleep${IFS}1".into());
        generate(&mut app, "a lighthouse");

        let started = Instant::now();
        app.update(Action::Share(ItemRef::Result)).unwrap();
        assert!(started.elapsed() < Duration::from_millis(500));
        assert!(!toast_messages(&app).contains(&"Image shared".to_string()));

        tick_until(&mut app, |app| {
            toast_messages(app).contains(&"Image shared".to_string())
        });
        assert!(toast_messages(&app).contains(&"Image shared".to_string()));
        assert!(clipboard.0.borrow().is_empty());
    }

    #[test]
    fn test_failure_shows_server_message() {
        let backend = Arc::new(FakeBackend::default());
        let (mut app, _) = app_with(backend);

        generate(&mut app, "please fail");

        assert_eq!(app.flow.error.as_deref(), Some("GPU on fire"));
        assert!(app.flow.result.is_none());
        assert!(app.gallery.shows_placeholder());
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_history_keeps_newest_six() {
        let backend = Arc::new(FakeBackend::default());
        let (mut app, _) = app_with(backend);

        for i in 0..7 {
            generate(&mut app, &format!("prompt {}", i));
        }

        assert_eq!(app.history.len(), 6);
        let prompts: Vec<&str> = app.history.iter().map(|h| h.prompt.as_str()).collect();
        assert_eq!(
            prompts,
            vec!["prompt 6", "prompt 5", "prompt 4", "prompt 3", "prompt 2", "prompt 1"]
        );
        assert_eq!(app.gallery.len(), 7);
    }

    #[test]
    fn test_second_submit_while_busy_is_rejected() {
        let backend = Arc::new(FakeBackend {
            delay: Duration::from_millis(200),
            ..Default::default()
        });
        let (mut app, _) = app_with(backend.clone());

        type_prompt(&mut app, "a slow landscape");
        app.update(Action::SubmitPrompt).unwrap();
        app.update(Action::SubmitPrompt).unwrap();

        assert!(app.flow.is_loading());
        assert!(toast_messages(&app).contains(&"A generation is already in progress".to_string()));

        tick_until(&mut app, |app| !app.flow.is_loading());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.gallery.len(), 1);
    }

    #[test]
    fn test_deleting_last_tile_shows_placeholder() {
        let backend = Arc::new(FakeBackend::default());
        let (mut app, _) = app_with(backend);
        generate(&mut app, "abstract shapes");

        let id = app.gallery.iter().next().unwrap().id;
        app.update(Action::DeleteTile(id)).unwrap();
        assert!(app.gallery.get(id).unwrap().is_removing());
        assert!(!app.gallery.shows_placeholder());

        thread::sleep(Duration::from_millis(550));
        app.update(Action::Tick).unwrap();
        assert!(app.gallery.shows_placeholder());

        app.update(Action::SaveToGallery).unwrap();
        assert!(!app.gallery.shows_placeholder());
    }

    #[test]
    fn test_save_to_gallery_allows_duplicates() {
        let backend = Arc::new(FakeBackend::default());
        let (mut app, _) = app_with(backend);
        generate(&mut app, "a lighthouse");

        app.update(Action::SaveToGallery).unwrap();
        assert_eq!(app.gallery.len(), 2);
        assert!(toast_messages(&app).contains(&"Image saved to gallery".to_string()));
    }

    #[test]
    fn test_share_copies_absolute_url() {
        let backend = Arc::new(FakeBackend::default());
        let (mut app, clipboard) = app_with(backend);
        generate(&mut app, "a lighthouse");

        app.update(Action::Share(ItemRef::Result)).unwrap();
        assert_eq!(
            *clipboard.0.borrow(),
            vec!["http://backend/static/images/0.png".to_string()]
        );
        assert!(toast_messages(&app).contains(&"Image URL copied to clipboard".to_string()));
    }

    #[test]
    fn test_generate_similar_fills_prompt_without_submitting() {
        let backend = Arc::new(FakeBackend::default());
        let (mut app, _) = app_with(backend.clone());
        generate(&mut app, "portrait of a robot");
        type_prompt(&mut app, "something else");
        app.focus = Focus::History;

        app.update(Action::GenerateSimilar(ItemRef::History(0))).unwrap();

        assert_eq!(app.prompt.input, "portrait of a robot");
        assert_eq!(app.focus, Focus::Prompt);
        assert!(!app.flow.is_loading());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_download_writes_into_download_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::default());
        let (mut app, _) = app_with(backend);
        app.config.download_dir = Some(tmp.path().to_path_buf());
        generate(&mut app, "a red fox");

        app.update(Action::Download(ItemRef::Result)).unwrap();
        tick_until(&mut app, |app| {
            toast_messages(app).iter().any(|m| m.starts_with("Image saved to"))
        });

        let files: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_filter_does_not_touch_gallery() {
        let backend = Arc::new(FakeBackend::default());
        let (mut app, _) = app_with(backend);
        generate(&mut app, "mountain landscape");
        generate(&mut app, "a blue cube");

        app.update(Action::SetFilter(crate::model::GalleryFilter::Only(
            crate::model::Category::Landscape,
        )))
        .unwrap();
        assert_eq!(app.gallery_view.visible_count(), 1);
        assert_eq!(app.gallery.len(), 2);
    }

    #[test]
    fn test_keys_reach_prompt_until_focus_moves() {
        let backend = Arc::new(FakeBackend::default());
        let (mut app, _) = app_with(backend);
        let press = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);

        assert_eq!(
            app.handle_key_event(press('q')).unwrap(),
            Some(Action::PromptInput('q'))
        );

        app.update(Action::FocusNext).unwrap();
        assert_eq!(app.focus, Focus::Result);
        assert_eq!(
            app.handle_key_event(press('q')).unwrap(),
            Some(Action::OpenQuitDialog)
        );
        assert_eq!(
            app.handle_key_event(press('t')).unwrap(),
            Some(Action::ToggleTheme)
        );
    }

    #[test]
    fn test_quit_dialog_confirm() {
        let backend = Arc::new(FakeBackend::default());
        let (mut app, _) = app_with(backend);

        app.update(Action::OpenQuitDialog).unwrap();
        let follow_up = app.update(Action::ConfirmModal).unwrap();
        assert_eq!(follow_up, Some(Action::ForceQuit));
        app.update(Action::ForceQuit).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_subscribe_requires_email() {
        let backend = Arc::new(FakeBackend::default());
        let (mut app, _) = app_with(backend);

        app.update(Action::OpenSubscribe).unwrap();
        let follow_up = app.update(Action::ConfirmModal).unwrap();
        app.update(follow_up.unwrap()).unwrap();
        assert!(app.toasts.is_empty());
        assert!(!app.modals.is_empty());

        for c in "me@example.com".chars() {
            let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
            assert_eq!(app.handle_key_event(key).unwrap(), None);
        }
        let follow_up = app.update(Action::ConfirmModal).unwrap();
        assert_eq!(follow_up, Some(Action::Subscribe("me@example.com".into())));
        app.update(follow_up.unwrap()).unwrap();

        assert_eq!(toast_messages(&app), vec!["Thanks for subscribing!".to_string()]);
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_theme_toggle_toast() {
        let backend = Arc::new(FakeBackend::default());
        let (mut app, _) = app_with(backend);
        app.update(Action::ToggleTheme).unwrap();
        assert_eq!(
            toast_messages(&app),
            vec!["Dark mode is the only available theme".to_string()]
        );
    }
}
