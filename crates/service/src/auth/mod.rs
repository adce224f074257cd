//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login and token handling live here; the web layer only
//! extracts an [`domain::AuthContext`] and passes it on.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod token;
pub mod repo;

pub use domain::{AuthContext, Role};
pub use errors::AuthError;
pub use service::AuthService;
pub use token::TokenIssuer;
