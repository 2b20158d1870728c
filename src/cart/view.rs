//! Cart rendering and transient notices
//!
//! Information Hiding:
//! - The store only knows "render this count" and "show this message"
//! - Where the count is drawn and how notices animate is up to the implementor

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const NOTICE_ENTER: Duration = Duration::from_millis(300);
pub const NOTICE_EXIT: Duration = Duration::from_millis(300);
pub const NOTICE_VISIBLE: Duration = Duration::from_millis(2000);

/// Display target for the cart item count
pub trait CartView: Send + Sync {
    fn render(&self, item_count: u64);
}

/// Sink for short user-facing messages
///
/// Implementations must not panic or block; a notice is cosmetic.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// An absent display target renders nothing
impl<V: CartView> CartView for Option<V> {
    fn render(&self, item_count: u64) {
        if let Some(view) = self {
            view.render(item_count);
        }
    }
}

impl<V: CartView + ?Sized> CartView for Arc<V> {
    fn render(&self, item_count: u64) {
        (**self).render(item_count)
    }
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, message: &str) {
        (**self).notify(message)
    }
}

/// Renders and notifies nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

impl CartView for Detached {
    fn render(&self, _item_count: u64) {}
}

impl Notifier for Detached {
    fn notify(&self, _message: &str) {}
}

/// Counter element holding the last rendered text
#[derive(Debug, Default)]
pub struct CountBadge {
    text: Mutex<String>,
    renders: Mutex<usize>,
}

impl CountBadge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.text.lock().map(|t| t.clone()).unwrap_or_default()
    }

    /// How many times the badge has been refreshed
    pub fn render_count(&self) -> usize {
        self.renders.lock().map(|r| *r).unwrap_or_default()
    }
}

impl CartView for CountBadge {
    fn render(&self, item_count: u64) {
        if let Ok(mut text) = self.text.lock() {
            *text = item_count.to_string();
        }
        if let Ok(mut renders) = self.renders.lock() {
            *renders += 1;
        }
    }
}

/// Where a notice is in its enter / hold / exit animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticePhase {
    /// Sliding in; progress in per-mille
    Entering(u16),
    Visible,
    /// Sliding out; progress in per-mille
    Exiting(u16),
    Dismissed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub posted_at: Instant,
    pub visible_for: Duration,
}

impl Notice {
    pub fn new(message: impl Into<String>, posted_at: Instant) -> Self {
        Self {
            message: message.into(),
            posted_at,
            visible_for: NOTICE_VISIBLE,
        }
    }

    pub fn with_duration(mut self, visible_for: Duration) -> Self {
        self.visible_for = visible_for;
        self
    }

    /// The exit animation starts once `visible_for` has elapsed
    pub fn phase_at(&self, now: Instant) -> NoticePhase {
        let elapsed = now.saturating_duration_since(self.posted_at);

        if elapsed < NOTICE_ENTER {
            NoticePhase::Entering(per_mille(elapsed, NOTICE_ENTER))
        } else if elapsed < self.visible_for {
            NoticePhase::Visible
        } else if elapsed < self.visible_for + NOTICE_EXIT {
            NoticePhase::Exiting(per_mille(elapsed - self.visible_for, NOTICE_EXIT))
        } else {
            NoticePhase::Dismissed
        }
    }

    pub fn is_dismissed_at(&self, now: Instant) -> bool {
        self.phase_at(now) == NoticePhase::Dismissed
    }
}

fn per_mille(part: Duration, whole: Duration) -> u16 {
    ((part.as_micros() * 1000) / whole.as_micros().max(1)).min(1000) as u16
}

/// Notifier that keeps posted notices until they have animated out
#[derive(Debug)]
pub struct NoticeBoard {
    notices: Mutex<Vec<Notice>>,
    visible_for: Duration,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::with_duration(NOTICE_VISIBLE)
    }

    pub fn with_duration(visible_for: Duration) -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
            visible_for,
        }
    }

    pub fn post_at(&self, message: &str, now: Instant) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.retain(|n| !n.is_dismissed_at(now));
            notices.push(Notice::new(message, now).with_duration(self.visible_for));
        }
    }

    /// Notices still on screen at `now`, oldest first
    pub fn active_at(&self, now: Instant) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| {
                notices
                    .iter()
                    .filter(|n| !n.is_dismissed_at(now))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn active(&self) -> Vec<Notice> {
        self.active_at(Instant::now())
    }

    /// Every notice ever posted and not yet pruned
    pub fn history(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NoticeBoard {
    fn notify(&self, message: &str) {
        tracing::debug!("[NoticeBoard] {}", message);
        self.post_at(message, Instant::now());
    }
}
