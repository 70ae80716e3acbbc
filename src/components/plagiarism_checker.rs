use crate::app::AppState;
use crate::models::plagiarism::PlagiarismResult;
use crate::services::plagiarism::validate_scan_input;
use crate::utils::leptos_owner::with_owner_safe;
use gloo_timers::future::TimeoutFuture;
use leptos::*;

/// Paste-and-scan originality check. The verdict is shown after a simulated
/// scan delay.
#[component]
pub fn PlagiarismChecker(#[prop(into)] service_id: String) -> impl IntoView {
    let state = expect_context::<AppState>();
    let owner = Owner::current();
    let (text, set_text) = create_signal(String::new());
    let (scanning, set_scanning) = create_signal(false);
    let (result, set_result) = create_signal(None::<PlagiarismResult>);
    let (error, set_error) = create_signal(None::<String>);

    let run_scan = move |_| {
        let input = text.get_untracked();
        if let Err(err) = validate_scan_input(&input) {
            set_error.set(Some(err.to_string()));
            return;
        }
        set_error.set(None);
        set_result.set(None);
        set_scanning.set(true);

        let service_id = service_id.clone();
        let delay_ms = state.config.with_untracked(|config| config.scan_delay_ms);
        spawn_local(async move {
            TimeoutFuture::new(delay_ms).await;
            with_owner_safe(owner, "plagiarism scan", move || {
                let verdict = state
                    .services
                    .try_update_value(|services| services.plagiarism.check_plagiarism(&service_id, &input));
                set_result.set(verdict);
                set_scanning.set(false);
                state.bump();
            });
        });
    };

    view! {
        <div class="plagiarism-checker">
            <h3>{ "Originality Check" }</h3>
            <textarea
                placeholder="Paste your assignment text here"
                prop:value=text
                on:input=move |e| set_text.set(event_target_value(&e))
            />
            <button on:click=run_scan disabled=scanning>
                {move || if scanning.get() { "Scanning..." } else { "Check Originality" }}
            </button>
            {move || error.get().map(|message| view! { <p class="form-message">{ message }</p> })}
            {move || result.get().map(|result| view! {
                <div class="scan-result">
                    <p class="score">{ format!("Originality score: {}%", result.originality_score) }</p>
                    <ul>
                        {result.matches.into_iter().map(|found| view! {
                            <li>
                                <q>{ found.text }</q>
                                { format!(" {}% similar", found.similarity) }
                                { found.source.map(|source| format!(" ({})", source)) }
                            </li>
                        }).collect::<Vec<_>>()}
                    </ul>
                </div>
            })}
        </div>
    }
}
