use crate::app::AppState;
use crate::models::review::ReviewDraft;
use leptos::ev::SubmitEvent;
use leptos::logging::warn;
use leptos::*;

/// Form for rating a tutoring service. Submits through the review store with
/// the current session.
#[component]
pub fn ReviewForm(#[prop(into)] service_id: String, #[prop(into)] provider_id: String) -> impl IntoView {
    let state = expect_context::<AppState>();
    let (rating, set_rating) = create_signal(5u8); // Default rating to 5
    let (comment, set_comment) = create_signal(String::new());
    let (message, set_message) = create_signal(None::<String>);

    let handle_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let draft = ReviewDraft {
            service_id: service_id.clone(),
            provider_id: provider_id.clone(),
            rating: rating.get_untracked(),
            comment: comment.get_untracked(),
        };
        let session = state.session.get_untracked();

        match state
            .services
            .try_update_value(|services| services.reviews.add_review(session.as_ref(), draft))
        {
            Some(Ok(_)) => {
                set_comment.set(String::new());
                set_rating.set(5);
                set_message.set(Some("Thanks for your review!".to_string()));
                state.bump();
            }
            Some(Err(err)) => set_message.set(Some(err.to_string())),
            None => warn!("[REVIEWS] Services disposed before the review was saved"),
        }
    };

    view! {
        <form class="review-form" on:submit=handle_submit>
            <h3>{ "Write a Review" }</h3>
            <label>
                { "Rating (1-5)" }
                <select on:change=move |e| set_rating.set(event_target_value(&e).parse::<u8>().unwrap_or(5))>
                    {(1..=5u8).rev().map(|value| view! {
                        <option value=value.to_string() selected=move || rating.get() == value>
                            { "★".repeat(value as usize) }
                        </option>
                    }).collect::<Vec<_>>()}
                </select>
            </label>
            <textarea
                placeholder="How was the session?"
                prop:value=comment
                on:input=move |e| set_comment.set(event_target_value(&e))
            />
            <button type="submit">{ "Submit Review" }</button>
            {move || message.get().map(|text| view! { <p class="form-message">{ text }</p> })}
        </form>
    }
}
