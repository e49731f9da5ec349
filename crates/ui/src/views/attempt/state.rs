use std::cell::Cell;
use std::rc::Rc;

use dioxus::prelude::*;
use services::attempt::AttemptSession;

/// Signals shared by the attempt view and the tasks it spawns.
///
/// Submissions run on tasks that outlive the view; they check `is_mounted`
/// before touching any signal.
#[derive(Clone)]
pub struct AttemptViewState {
    pub session: Signal<Option<AttemptSession>>,
    pub current: Signal<usize>,
    pub warning: Signal<bool>,
    pub notice: Signal<Option<String>>,
    pub confirm: Signal<Option<String>>,
    pub submitting: Signal<bool>,
    mounted: Rc<Cell<bool>>,
}

impl AttemptViewState {
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    pub(super) fn unmount(&self) {
        self.mounted.set(false);
    }

    pub(super) fn show_notice(&self, message: String) {
        if self.is_mounted() {
            let mut notice = self.notice;
            notice.set(Some(message));
        }
    }

    pub(super) fn show_session(&self, session: Option<AttemptSession>) {
        if self.is_mounted() {
            let mut slot = self.session;
            slot.set(session);
        }
    }
}

pub fn use_attempt_state() -> AttemptViewState {
    let session = use_signal(|| None::<AttemptSession>);
    let current = use_signal(|| 0usize);
    let warning = use_signal(|| false);
    let notice = use_signal(|| None::<String>);
    let confirm = use_signal(|| None::<String>);
    let submitting = use_signal(|| false);
    let mounted = use_hook(|| Rc::new(Cell::new(true)));

    AttemptViewState {
        session,
        current,
        warning,
        notice,
        confirm,
        submitting,
        mounted,
    }
}
