//! Trailing-edge debouncing of filter edits.
//!
//! Raw edits flow into a [`Debouncer`]; only the last value of a burst comes
//! out, one window after the burst ends. [`GalleryController`] owns the
//! filter state and puts the debouncer between user edits and the resolved
//! filters the gallery reads.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{sleep, Instant};

use archive_core::{defaults, Rarity, SearchFilters};

use crate::reconciler::{GalleryView, ViewReconciler};

enum Command<T> {
    Push(T),
    Flush(T),
}

/// Trailing-edge coalescing stage backed by a Tokio task.
///
/// - `push` stores the value and restarts the window
/// - `flush` emits immediately and discards anything pending
/// - dropping the debouncer emits the pending value, then closes the output
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<Command<T>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Start the stage. Must be called within a Tokio runtime.
    pub fn new(window: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        tokio::spawn(run(rx, out_tx, window));
        (Self { tx }, out_rx)
    }

    pub fn push(&self, value: T) {
        let _ = self.tx.send(Command::Push(value));
    }

    pub fn flush(&self, value: T) {
        let _ = self.tx.send(Command::Flush(value));
    }
}

async fn run<T>(
    mut rx: mpsc::UnboundedReceiver<Command<T>>,
    out: mpsc::UnboundedSender<T>,
    window: Duration,
) {
    let mut pending: Option<T> = None;
    let timer = sleep(window);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            command = rx.recv() => match command {
                Some(Command::Push(value)) => {
                    pending = Some(value);
                    timer.as_mut().reset(Instant::now() + window);
                }
                Some(Command::Flush(value)) => {
                    pending = None;
                    if out.send(value).is_err() {
                        break;
                    }
                }
                None => {
                    if let Some(value) = pending.take() {
                        let _ = out.send(value);
                    }
                    break;
                }
            },
            () = &mut timer, if pending.is_some() => {
                if let Some(value) = pending.take() {
                    if out.send(value).is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// One user edit to the filter panel.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEdit {
    Keyword(String),
    ToggleRarity(Rarity),
    MinRating(f64),
    StyleTag(String),
    DominantColor(String),
    ClearAll,
}

/// Owns the gallery's filter state.
///
/// Edits update the draft immediately and reach the resolved filters
/// through the debouncer; clearing all filters bypasses the window.
pub struct GalleryController {
    draft: SearchFilters,
    debouncer: Debouncer<SearchFilters>,
    resolved: watch::Receiver<SearchFilters>,
    reconciler: ViewReconciler,
}

impl GalleryController {
    pub fn new(reconciler: ViewReconciler) -> Self {
        Self::with_window(reconciler, defaults::debounce_window())
    }

    /// Must be called within a Tokio runtime.
    pub fn with_window(reconciler: ViewReconciler, window: Duration) -> Self {
        let (debouncer, mut output) = Debouncer::new(window);
        let (tx, resolved) = watch::channel(SearchFilters::default());

        tokio::spawn(async move {
            while let Some(next) = output.recv().await {
                let changed = tx.send_if_modified(|current| {
                    if *current == next {
                        false
                    } else {
                        *current = next;
                        true
                    }
                });
                if changed {
                    tracing::debug!(
                        active_filters = tx.borrow().active_count(),
                        "Filters resolved"
                    );
                }
            }
        });

        Self {
            draft: SearchFilters::default(),
            debouncer,
            resolved,
            reconciler,
        }
    }

    pub fn apply(&mut self, edit: FilterEdit) -> &SearchFilters {
        match edit {
            FilterEdit::Keyword(text) => self.draft.set_keyword(&text),
            FilterEdit::ToggleRarity(rarity) => self.draft.toggle_rarity(rarity),
            FilterEdit::MinRating(value) => self.draft.set_min_rating(value),
            FilterEdit::StyleTag(tag) => self.draft.set_style_tag(&tag),
            FilterEdit::DominantColor(color) => self.draft.set_dominant_color(&color),
            FilterEdit::ClearAll => {
                self.draft.clear();
                self.debouncer.flush(self.draft.clone());
                return &self.draft;
            }
        }
        self.debouncer.push(self.draft.clone());
        &self.draft
    }

    /// Filters as edited, ahead of the debounce window.
    pub fn draft(&self) -> &SearchFilters {
        &self.draft
    }

    /// Watch the resolved filters.
    pub fn resolved(&self) -> watch::Receiver<SearchFilters> {
        self.resolved.clone()
    }

    pub fn current(&self) -> SearchFilters {
        self.resolved.borrow().clone()
    }

    pub fn reconciler(&self) -> &ViewReconciler {
        &self.reconciler
    }

    /// Reconciled gallery for the resolved filters.
    pub async fn view(&self) -> GalleryView {
        self.reconciler.reconcile(&self.current()).await
    }
}
