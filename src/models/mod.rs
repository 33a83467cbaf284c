// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    DiscoverCard, MatchRecord, Message, Profile, ProfileName, Subscription, SwipeKind,
    SwipeRecord, VerificationRequest, VerificationStatus,
};
pub use requests::{
    SendMessageRequest, SwipeRequest, UpdateProfileRequest, VerificationDecisionRequest,
};
pub use responses::{
    ActionResponse, CheckoutSessionResponse, DiscoverResponse, ErrorResponse, HealthResponse,
    MessagesResponse, RewindResponse, RewindStatusResponse, SwipeResponse,
    VerificationRequestsResponse,
};
