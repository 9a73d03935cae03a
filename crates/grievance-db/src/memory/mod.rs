//! In-process repositories
//!
//! Selected with `DATABASE_URL=memory://`. State lives behind a single
//! `RwLock`, so a version check and the write it guards happen under one
//! write lock and a grievance never diverges from its history.

mod grievance;
mod ward;

pub use grievance::InMemoryGrievanceRepository;
pub use ward::{InMemoryWardRepository, WardSeedError};
