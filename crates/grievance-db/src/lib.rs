//! # grievance-db
//!
//! Storage layer implementing the repository traits from `grievance-core`.
//!
//! ## Overview
//!
//! Two backends are provided:
//!
//! - PostgreSQL via SQLx: connection pool, migrations, `FromRow` models,
//!   entity <-> model mappers, and `Pg*Repository` implementations
//! - In-process: `InMemory*Repository` implementations used with
//!   `DATABASE_URL=memory://` and by service tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use grievance_db::{create_pool, PgGrievanceRepository, PoolSettings};
//! use grievance_core::traits::GrievanceRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = PoolSettings::new("postgres://localhost/grievances");
//!     let pool = create_pool(&settings).await?;
//!     let grievances = PgGrievanceRepository::new(pool);
//!
//!     grievances.ping().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{InMemoryGrievanceRepository, InMemoryWardRepository, WardSeedError};
pub use pool::{create_pool, run_migrations, PgPool, PoolSettings};
pub use repositories::{PgGrievanceRepository, PgWardRepository};
