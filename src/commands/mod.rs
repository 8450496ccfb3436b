pub mod extract;
pub mod info;
pub mod merge;
pub mod pages;
pub mod remove;
pub mod reorder;
pub mod rotate;
pub mod split;

use crate::page_range::Rejection;

/// Surface what the permissive parser dropped without failing the command.
pub(crate) fn warn_rejected(rejected: &[Rejection]) {
    for rejection in rejected {
        eprintln!("warning: {:?}: {}", rejection.token, rejection.reason);
    }
}
