/// What a payment-processor webhook event means for the subscription mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionAction {
    /// Create or overwrite the subscription row
    Upsert,
    /// Mark the subscription canceled
    Cancel,
    /// Acknowledge and do nothing
    Ignore,
}

/// Map a Stripe event type to the action taken against local state.
///
/// `checkout.session.completed` is deliberately ignored; the subscription
/// lifecycle events carry the authoritative state.
pub fn action_for_event(event_type: &str) -> SubscriptionAction {
    match event_type {
        "customer.subscription.created" | "customer.subscription.updated" => {
            SubscriptionAction::Upsert
        }
        "customer.subscription.deleted" => SubscriptionAction::Cancel,
        _ => SubscriptionAction::Ignore,
    }
}
