use crate::access::{Access, AccessGate};
use crate::app::AppState;
use crate::models::session::Session;
use leptos::*;
use leptos_router::{use_location, Redirect};

/// What a gated route shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView {
    /// Session not restored yet, so nothing is decided. This is all the server
    /// ever renders.
    Pending,
    Content,
    Redirect(String),
}

pub fn gate_view(ready: bool, gate: &AccessGate, path: &str, session: Option<&Session>) -> GateView {
    if !ready {
        return GateView::Pending;
    }
    match gate.check(path, session) {
        Access::Allow => GateView::Content,
        Access::RedirectToLogin(to) | Access::RedirectToPricing(to) => GateView::Redirect(to),
    }
}

/// Renders `children` only when the access gate allows the current path.
#[component]
pub fn Gate(children: ChildrenFn) -> impl IntoView {
    let state = expect_context::<AppState>();
    let location = use_location();

    move || {
        let path = location.pathname.get();
        let session = state.session.get();
        let decision = state.config.with(|config| {
            gate_view(state.ready.get(), &config.access_gate, &path, session.as_ref())
        });
        match decision {
            GateView::Pending => view! { <p class="gate-pending">{ "Checking your plan..." }</p> }.into_view(),
            GateView::Content => children().into_view(),
            GateView::Redirect(to) => view! { <Redirect path=to/> }.into_view(),
        }
    }
}
