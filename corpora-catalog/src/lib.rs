//! Relational catalog store (spec §4.2, C2): tenants, documents, refresh
//! tokens, verification records, usage metrics, and rate-limit counters.
//! Every tenant-scoped query carries a `tenant_id` predicate — there is no
//! global read path.

pub mod documents;
pub mod error;
pub mod models;
pub mod pool;
pub mod rate_limit;
pub mod refresh_tokens;
pub mod tenants;
pub mod verification;

pub use documents::{DocumentFilter, DocumentRepo, DocumentStats, NewDocument};
pub use models::{EmailVerificationRow, RefreshTokenRow, Tenant, TenantConfig, TenantStatus};
pub use pool::{build_pool, run_migrations, CatalogConfig};
pub use rate_limit::RateLimitRepo;
pub use refresh_tokens::RefreshTokenRepo;
pub use tenants::{NewTenant, TenantRepo};
pub use verification::{EmailVerificationRepo, VerifyOutcome};

pub mod usage;
pub use usage::UsageRepo;
