//! Table-driven resource definitions.
//!
//! Each resource pairs a static [`ResourceDefinition`] (path, flags, query
//! shape) with a [`ResourceView`] that projects records into rows. Commands
//! look resources up by CLI noun through [`find_resource`].

mod broker_commitments;
mod brokers;
pub mod definition;
mod memberships;
mod objectives;
mod projects;
mod prompters;
mod view;
pub mod write;

pub use broker_commitments::{BROKER_COMMITMENTS, BrokerCommitmentRow, BrokerCommitments};
pub use brokers::{BROKERS, BrokerRow, Brokers};
pub use definition::{
    Action, AttrKind, AttributeSpec, FieldSet, FilterSpec, QueryShape, RelationshipSpec,
    RelationshipTarget, ResourceDefinition,
};
pub use memberships::{MEMBERSHIPS, MembershipRow, Memberships, membership_kind};
pub use objectives::{OBJECTIVES, ObjectiveRow, Objectives};
pub use projects::{PROJECTS, ProjectRow, Projects};
pub use prompters::{PROMPTERS, PrompterRow, Prompters};
pub use view::{ResourceHandler, ResourceView};
pub use write::{FieldValue, FieldValues, WriteBody, WriteMode, build_write_body};

/// Every resource the CLI exposes, in help order.
pub const RESOURCES: &[&dyn ResourceHandler] = &[
    &BrokerCommitments,
    &Brokers,
    &Memberships,
    &Objectives,
    &Projects,
    &Prompters,
];

/// Resource with CLI noun `name`.
pub fn find_resource(name: &str) -> Option<&'static dyn ResourceHandler> {
    RESOURCES
        .iter()
        .copied()
        .find(|handler| handler.definition().name == name)
}
