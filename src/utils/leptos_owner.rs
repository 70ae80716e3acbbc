use leptos::Owner;

/// Runs `f` under `owner`, typically one captured when a component was
/// created and used again after an `.await`. If the owner is gone (the
/// component was unmounted meanwhile) logs and returns None.
pub fn with_owner_safe<F, R>(owner: Option<Owner>, log_context: &str, f: F) -> Option<R>
where
    F: FnOnce() -> R,
{
    if let Some(owner) = owner {
        leptos::try_with_owner(owner, f).ok()
    } else {
        leptos::logging::log!("[OWNER] No Leptos owner in context: {}", log_context);
        None
    }
}
