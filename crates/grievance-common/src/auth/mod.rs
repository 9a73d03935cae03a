//! Bearer token verification for identity-provider issued tokens

mod jwt;

pub use jwt::{Claims, JwtService};
