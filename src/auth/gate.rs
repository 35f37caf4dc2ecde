// Authorization predicates applied before any transition mutates state
//
// Each predicate either allows, denies (Unauthorized) or fails to evaluate
// (Context) when the principal carries no usable identity.

use tracing::{info, Span};

use super::Principal;
use crate::errors::WorkflowError;

/// Allow when the principal owns the record.
///
/// `owner` is the owner id of the stored intake or business case; `None`
/// means the record does not exist yet and only the identity is checked.
pub fn authorize_requester<P: Principal + ?Sized>(
    span: &Span,
    principal: &P,
    owner: Option<&str>,
    operation: &'static str,
) -> Result<(), WorkflowError> {
    if !principal.allows_access() || principal.id().is_empty() {
        info!(parent: span, authorized = false, operation, "unable to get user id from context");
        return Err(WorkflowError::Context {
            operation: "get",
            object: "user id",
        });
    }

    match owner {
        Some(owner) if owner != principal.id() => {
            info!(
                parent: span,
                authorized = false,
                operation,
                user = %principal.id(),
                owner,
                "unauthorized attempt to change record"
            );
            Err(WorkflowError::Unauthorized { operation })
        }
        _ => {
            info!(parent: span, authorized = true, operation, user = %principal.id(), "user authorized");
            Ok(())
        }
    }
}

/// Allow when the principal holds the reviewer capability
pub fn authorize_reviewer<P: Principal + ?Sized>(
    span: &Span,
    principal: &P,
    operation: &'static str,
) -> Result<(), WorkflowError> {
    if principal.id().is_empty() {
        return Err(WorkflowError::Context {
            operation: "get",
            object: "user id",
        });
    }
    if !principal.is_reviewer() {
        info!(
            parent: span,
            authorized = false,
            operation,
            user = %principal.id(),
            "reviewer capability missing"
        );
        return Err(WorkflowError::Unauthorized { operation });
    }
    info!(parent: span, authorized = true, operation, user = %principal.id(), "reviewer authorized");
    Ok(())
}
