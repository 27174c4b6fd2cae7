//! Lifecycle hooks
//!
//! Every hook invocation is isolated: an `Err` return or a panic inside the
//! hook is logged and turned into a [`HookFailure`], and the caller carries on
//! with the rest of the frame.

use crate::error::{HookFailure, HookKind};
use std::any::Any;
use std::error::Error;
use std::panic::{self, AssertUnwindSafe};

/// Return type of fallible hooks
pub type HookResult = Result<(), Box<dyn Error>>;

/// A motion lifecycle callback
pub type Hook = Box<dyn FnMut() -> HookResult>;

/// Entity render callback, receives the animation time in ms
pub type RenderHook = Box<dyn FnMut(f64) -> HookResult>;

/// Wrap an infallible closure as a hook
pub fn hook<F: FnMut() + 'static>(mut f: F) -> Hook {
    Box::new(move || {
        f();
        Ok(())
    })
}

/// Run a hook body, catching both errors and panics
pub(crate) fn invoke<F>(kind: HookKind, f: F) -> Option<HookFailure>
where
    F: FnOnce() -> HookResult,
{
    let message = match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => return None,
        Ok(Err(err)) => err.to_string(),
        Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
    };

    tracing::warn!(hook = kind.name(), error = %message, "animation hook failed");
    Some(HookFailure {
        hook: kind,
        message,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

/// The four optional motion callbacks
#[derive(Default)]
pub struct MotionHooks {
    pub on_start: Option<Hook>,
    pub on_repeat: Option<Hook>,
    pub on_finish: Option<Hook>,
    pub on_draw: Option<Hook>,
}

impl MotionHooks {
    /// Fire one hook. Missing hooks are no-ops.
    pub(crate) fn fire(&mut self, kind: HookKind) -> Option<HookFailure> {
        let slot = match kind {
            HookKind::Start => &mut self.on_start,
            HookKind::Repeat => &mut self.on_repeat,
            HookKind::Finish => &mut self.on_finish,
            HookKind::Draw => &mut self.on_draw,
            HookKind::Render => return None,
        };
        let hook = slot.as_mut()?;
        invoke(kind, || hook())
    }
}
