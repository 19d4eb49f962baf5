//! Access control policies and RLS-style security

pub mod context;
pub mod policies;

pub use context::{RequestMetadata, SecurityContext, SecurityContextBuilder};
pub use policies::{
    AccessControlPolicy, AccessDecision, EnhancedSecurityManager, OperationContext, SecurityFilter, 
    SecurityPolicy, TenantAccessControlPolicy, VectorAccessPolicy, VectorSecurityManager,
};
