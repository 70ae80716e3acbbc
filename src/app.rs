/// Main application entry point for TutorHub.
/// Builds the per-session services around browser storage and wires the pages
/// of the tutoring marketplace behind the access gate.
use crate::components::{
    gate::Gate, plagiarism_checker::PlagiarismChecker, report_form::ReportForm,
    review_form::ReviewForm, reviews_list::ReviewsList,
};
use crate::config::ClientConfig;
use crate::models::report::TargetType;
use crate::models::session::{clear_session, load_session, save_session, Session, SubscriptionTier};
use crate::services::Services;
use crate::storage::{client_storage, ClientStorage};
use leptos::ev::SubmitEvent;
use leptos::logging::{error, log};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use uuid::Uuid;

/// Shared state handed to every view through context.
#[derive(Clone, Copy)]
pub struct AppState {
    pub services: StoredValue<Services<ClientStorage>>,
    pub storage: StoredValue<ClientStorage>,
    pub session: RwSignal<Option<Session>>,
    pub config: RwSignal<ClientConfig>,
    /// Fired after every store mutation so derived views re-read.
    pub revision: Trigger,
    /// False until [`AppState::restore`] has run in the browser. The server
    /// never sees the cached session, so it never gets past this.
    pub ready: RwSignal<bool>,
}

impl AppState {
    pub fn new(storage: ClientStorage, config: ClientConfig) -> Self {
        let services = Services::open(storage.clone()).unwrap_or_else(|err| {
            error!("[STORE] Could not read saved data, keeping changes in memory: {}", err);
            Services::detached(storage.clone())
        });
        Self {
            services: store_value(services),
            storage: store_value(storage),
            session: create_rw_signal(None),
            config: create_rw_signal(config),
            revision: create_trigger(),
            ready: create_rw_signal(false),
        }
    }

    /// Applies the server's settings and picks up the cached session.
    pub fn restore(&self, config: ClientConfig) {
        let session = self.storage.with_value(|storage| load_session(storage)).unwrap_or_else(|err| {
            error!("[SESSION] Could not read cached session: {}", err);
            None
        });
        self.config.set(config);
        self.session.set(session);
        self.ready.set(true);
    }

    pub fn bump(&self) {
        self.revision.notify();
    }

    pub fn sign_in(&self, session: Session) {
        let saved = self.storage.with_value(|storage| save_session(storage, &session));
        if let Err(err) = saved {
            error!("[SESSION] Could not cache session: {}", err);
        }
        log!("[SESSION] Signed in {} ({})", session.user_id, session.tier.label());
        self.session.set(Some(session));
    }

    pub fn sign_out(&self) {
        let cleared = self.storage.with_value(|storage| clear_session(storage));
        if let Err(err) = cleared {
            error!("[SESSION] Could not clear session: {}", err);
        }
        self.session.set(None);
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    // Provided by the server per request; absent in the browser.
    let server_config = use_context::<ClientConfig>();
    let state = AppState::new(client_storage(), server_config.clone().unwrap_or_default());
    provide_context(state);

    // Serialized into the page on the server, read back during hydration.
    let settings = create_resource(
        || (),
        move |_| {
            let config = server_config.clone();
            async move { config.unwrap_or_default() }
        },
    );
    // Effects only run in the browser, after hydration.
    create_effect(move |_| {
        if let Some(config) = settings.get() {
            state.restore(config);
        }
    });

    view! {
        <Title text="TutorHub"/>
        <Router>
            <nav>
                <A href="/">{ "Home" }</A>
                <A href="/integrity">{ "Integrity" }</A>
                <A href="/pricing">{ "Pricing" }</A>
                {move || match state.session.get() {
                    Some(session) => view! {
                        <span class="session">{ format!("{} ({})", session.name, session.tier.label()) }</span>
                        <button on:click=move |_| state.sign_out()>{ "Log out" }</button>
                    }.into_view(),
                    None => view! { <A href="/login">{ "Log in" }</A> }.into_view(),
                }}
            </nav>
            <main>
                <Routes>
                    <Route path="/" view=HomePage/>
                    <Route path="/login" view=LoginPage/>
                    <Route path="/pricing" view=PricingPage/>
                    <Route path="/tutors/:id" view=|| view! { <Gate><TutorPage/></Gate> }/>
                    <Route path="/integrity" view=|| view! { <Gate><IntegrityPage/></Gate> }/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn HomePage() -> impl IntoView {
    view! {
        <h1>{ "TutorHub" }</h1>
        <p>{ "Find a peer tutor, leave a review, and check your work before you hand it in." }</p>
        <ul>
            <li><A href="/tutors/demo-tutor">{ "Browse a tutor profile" }</A></li>
            <li><A href="/integrity">{ "Run an originality check" }</A></li>
        </ul>
    }
}

#[component]
fn LoginPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let query = use_query_map();
    let navigate = use_navigate();
    let (name, set_name) = create_signal(String::new());
    let (email, set_email) = create_signal(String::new());
    let (tier, set_tier) = create_signal(SubscriptionTier::Free);
    let (message, set_message) = create_signal(None::<String>);

    let handle_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let (name, email) = (name.get_untracked(), email.get_untracked());
        if name.trim().is_empty() || email.trim().is_empty() {
            set_message.set(Some("Please enter your name and email".to_string()));
            return;
        }
        state.sign_in(Session {
            user_id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            tier: tier.get_untracked(),
        });

        // Only follow same-site redirects.
        let target = query
            .with_untracked(|q| q.get("redirect").cloned())
            .filter(|path| path.starts_with('/') && !path.starts_with("//"))
            .unwrap_or_else(|| "/".to_string());
        navigate(&target, Default::default());
    };

    view! {
        <form class="login-form" on:submit=handle_submit>
            <h2>{ "Log in" }</h2>
            <input type="text" placeholder="Name" on:input=move |e| set_name.set(event_target_value(&e)) />
            <input type="email" placeholder="Email" on:input=move |e| set_email.set(event_target_value(&e)) />
            <select on:change=move |e| {
                let selected = match event_target_value(&e).as_str() {
                    "premium" => SubscriptionTier::Premium,
                    "enterprise" => SubscriptionTier::Enterprise,
                    _ => SubscriptionTier::Free,
                };
                set_tier.set(selected);
            }>
                <option value="free">{ "Free" }</option>
                <option value="premium">{ "Premium" }</option>
                <option value="enterprise">{ "Enterprise" }</option>
            </select>
            <button type="submit">{ "Log in" }</button>
            {move || message.get().map(|text| view! { <p class="form-message">{ text }</p> })}
        </form>
    }
}

#[component]
fn PricingPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    view! {
        <h2>{ "Pricing" }</h2>
        <p>{ "Tutor profiles, the integrity tools and the whiteboard need a Premium or Enterprise plan." }</p>
        <ul>
            <li>{ "Free: browse the marketplace" }</li>
            <li>{ "Premium: book tutors, reviews, originality checks" }</li>
            <li>{ "Enterprise: everything in Premium for a whole school" }</li>
        </ul>
        {move || state.session.get().map(|session| view! {
            <p>{ format!("Your current plan: {}", session.tier.label()) }</p>
        })}
    }
}

#[component]
fn TutorPage() -> impl IntoView {
    let params = use_params_map();
    let tutor_id = move || params.with(|p| p.get("id").cloned().unwrap_or_default());

    move || {
        let tutor_id = tutor_id();
        let service_id = format!("tutoring-{tutor_id}");
        view! {
            <h2>{ format!("Tutor {}", tutor_id) }</h2>
            <ReviewsList provider_id=tutor_id.clone()/>
            <ReviewForm service_id=service_id provider_id=tutor_id.clone()/>
            <ReportForm target_type=TargetType::User target_id=tutor_id/>
        }
    }
}

#[component]
fn IntegrityPage() -> impl IntoView {
    let query = use_query_map();
    let service_id = move || {
        query.with(|q| q.get("service").cloned().unwrap_or_else(|| "general".to_string()))
    };

    move || {
        let service_id = service_id();
        view! {
            <h2>{ "Academic Integrity" }</h2>
            <PlagiarismChecker service_id=service_id.clone()/>
            <ReportForm target_type=TargetType::Service target_id=service_id/>
        }
    }
}
