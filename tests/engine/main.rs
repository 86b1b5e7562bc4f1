//! Engine behavior through the public facade: QuerySet semantics, paging,
//! blocking/async equivalence and cancellation.

mod common;

mod dual_mode;
mod manager;
mod pagination;
mod properties;
mod queryset;
