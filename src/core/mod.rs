//! Authenticated access to the prediction and interface services.

pub mod auth;
pub mod client;
pub mod credential;
pub mod gateway;
pub mod http;
pub mod logging;
pub mod models;
pub mod service;
pub mod status;
pub mod validator;
pub mod workflow;

pub use auth::Authenticator;
pub use client::{InterfaceClient, PredictionClient, ServiceClient};
pub use credential::{Credential, CredentialStore, ScopedCredentialStore, SessionStorage};
pub use gateway::{GatewayState, RequestGateway};
pub use http::RawResponse;
pub use models::{
    DisplayedPrediction, InterfaceRequest, InterfaceResult, LotContext, PredictionRequest,
    PredictionResult,
};
pub use service::{ServiceConfig, ServiceKind};
pub use status::OperationStatus;
pub use validator::{InterfaceValidator, PredictionValidator, ResponseValidator};
pub use workflow::PredictionWorkflow;
