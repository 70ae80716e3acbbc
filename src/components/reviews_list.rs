use crate::app::AppState;
use crate::models::review::Review;
use crate::store::newest_first;
use leptos::*;

/// Reviews received by one provider, newest first, with their average.
#[component]
pub fn ReviewsList(#[prop(into)] provider_id: String) -> impl IntoView {
    let state = expect_context::<AppState>();
    let provider = provider_id.clone();

    let reviews = move || {
        state.revision.track();
        state
            .services
            .with_value(|services| {
                newest_first(services.reviews.get_user_reviews(&provider))
                    .into_iter()
                    .cloned()
                    .collect::<Vec<Review>>()
            })
    };
    let average = move || {
        state.revision.track();
        state
            .services
            .with_value(|services| services.reviews.get_average_rating(&provider_id))
    };

    view! {
        <div class="reviews">
            <h3>{ "Reviews" }</h3>
            <p class="average">{move || format!("Average rating: {:.1} / 5", average())}</p>
            <ul>
                {move || {
                    let reviews = reviews();
                    if reviews.is_empty() {
                        view! { <li class="empty">{ "No reviews yet" }</li> }.into_view()
                    } else {
                        reviews.into_iter().map(|review| {
                            view! {
                                <li>
                                    <strong>{ format!("{}/5", review.rating) }</strong>
                                    " - " { review.comment }
                                    <small>{ review.created_at.format("%Y-%m-%d").to_string() }</small>
                                </li>
                            }
                        }).collect_view()
                    }
                }}
            </ul>
        </div>
    }
}
