use crate::app::AppState;
use crate::models::report::{ReportDraft, TargetType, REPORT_REASONS};
use leptos::ev::SubmitEvent;
use leptos::logging::warn;
use leptos::*;

#[component]
pub fn ReportForm(target_type: TargetType, #[prop(into)] target_id: String) -> impl IntoView {
    let state = expect_context::<AppState>();
    let (reason, set_reason) = create_signal(String::new());
    let (details, set_details) = create_signal(String::new());
    let (message, set_message) = create_signal(None::<String>);

    let handle_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let draft = ReportDraft {
            target_id: target_id.clone(),
            target_type,
            reason: reason.get_untracked(),
            details: details.get_untracked(),
        };
        let session = state.session.get_untracked();

        match state
            .services
            .try_update_value(|services| services.reports.submit_report(session.as_ref(), draft))
        {
            Some(Ok(_)) => {
                set_reason.set(String::new());
                set_details.set(String::new());
                set_message.set(Some("Report submitted. Our team will take a look.".to_string()));
                state.bump();
            }
            Some(Err(err)) => set_message.set(Some(err.to_string())),
            None => warn!("[REPORTS] Services disposed before the report was saved"),
        }
    };

    view! {
        <form class="report-form" on:submit=handle_submit>
            <h3>{ "Report a Violation" }</h3>
            <select prop:value=reason on:change=move |e| set_reason.set(event_target_value(&e))>
                <option value="">{ "Select a reason" }</option>
                {REPORT_REASONS.iter().map(|(value, label)| view! {
                    <option value=*value>{ *label }</option>
                }).collect::<Vec<_>>()}
            </select>
            <textarea
                placeholder="Add any details that help us review this"
                prop:value=details
                on:input=move |e| set_details.set(event_target_value(&e))
            />
            <button type="submit">{ "Submit Report" }</button>
            {move || message.get().map(|text| view! { <p class="form-message">{ text }</p> })}
        </form>
    }
}
