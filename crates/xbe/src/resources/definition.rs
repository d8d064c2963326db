//! Static description of a JSON:API resource and its CLI flags.

use crate::api::Query;

/// Commands a resource supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    Show,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Show => "show",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// True for actions under `xbe view`.
    pub fn is_read(&self) -> bool {
        matches!(self, Action::List | Action::Show)
    }
}

/// Read-only actions.
pub const READ_ONLY: &[Action] = &[Action::List, Action::Show];

/// Every action.
pub const FULL_CRUD: &[Action] = &[
    Action::List,
    Action::Show,
    Action::Create,
    Action::Update,
    Action::Delete,
];

/// `fields[kind]=a,b` sparse fieldset entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSet {
    pub kind: &'static str,
    pub fields: &'static [&'static str],
}

/// Includes and sparse fieldsets sent with a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryShape {
    pub include: &'static [&'static str],
    pub fields: &'static [FieldSet],
}

impl QueryShape {
    pub const EMPTY: QueryShape = QueryShape {
        include: &[],
        fields: &[],
    };

    /// Add `include` and `fields[...]` to `query`.
    pub fn apply(&self, query: &mut Query) {
        query.include(self.include);
        for set in self.fields {
            query.fields(set.kind, set.fields);
        }
    }
}

/// `--flag value` on `list` mapped to `filter[param]=value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub flag: &'static str,
    pub param: &'static str,
    pub help: &'static str,
}

/// How an attribute flag's text is turned into JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    String,
    /// `true` or `false`.
    Bool,
    Int,
    Float,
    /// `YYYY-MM-DD`.
    Date,
    /// Comma-separated list sent as an array.
    List,
    /// Raw JSON value.
    Json,
}

/// `--flag value` on create/update mapped to an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    pub flag: &'static str,
    pub attribute: &'static str,
    pub kind: AttrKind,
    pub help: &'static str,
}

/// Type of the resource a relationship flag points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipTarget {
    /// Always this JSON:API type; the flag value is the ID.
    Fixed(&'static str),
    /// Caller-chosen type given as `Type|ID`.
    Polymorphic,
}

/// `--flag id` on create/update mapped to a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipSpec {
    pub flag: &'static str,
    pub name: &'static str,
    pub target: RelationshipTarget,
    pub help: &'static str,
}

pub(crate) const fn filter(
    flag: &'static str,
    param: &'static str,
    help: &'static str,
) -> FilterSpec {
    FilterSpec { flag, param, help }
}

/// Filter whose query parameter matches the flag name.
pub(crate) const fn same_filter(flag: &'static str, help: &'static str) -> FilterSpec {
    FilterSpec {
        flag,
        param: flag,
        help,
    }
}

pub(crate) const fn attribute(
    flag: &'static str,
    attribute: &'static str,
    kind: AttrKind,
    help: &'static str,
) -> AttributeSpec {
    AttributeSpec {
        flag,
        attribute,
        kind,
        help,
    }
}

/// Attribute whose name matches the flag name.
pub(crate) const fn same_attribute(
    flag: &'static str,
    kind: AttrKind,
    help: &'static str,
) -> AttributeSpec {
    AttributeSpec {
        flag,
        attribute: flag,
        kind,
        help,
    }
}

/// Relationship named like its flag, pointing at `kind`.
pub(crate) const fn to_one(
    flag: &'static str,
    kind: &'static str,
    help: &'static str,
) -> RelationshipSpec {
    RelationshipSpec {
        flag,
        name: flag,
        target: RelationshipTarget::Fixed(kind),
        help,
    }
}

/// Relationship named like its flag, given as `Type|ID`.
pub(crate) const fn polymorphic(flag: &'static str, help: &'static str) -> RelationshipSpec {
    RelationshipSpec {
        flag,
        name: flag,
        target: RelationshipTarget::Polymorphic,
        help,
    }
}

/// One resource noun, e.g. `brokers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDefinition {
    /// CLI noun.
    pub name: &'static str,
    /// JSON:API type.
    pub kind: &'static str,
    /// Human label for one record, e.g. `broker commitment`.
    pub singular: &'static str,
    /// Human label for many records, used in `No <plural> found.`.
    pub plural: &'static str,
    pub about: &'static str,
    pub actions: &'static [Action],
    pub list: QueryShape,
    pub show: QueryShape,
    /// `sort` sent by `list` when `--sort` is not given.
    pub default_sort: Option<&'static str>,
    pub filters: &'static [FilterSpec],
    pub attributes: &'static [AttributeSpec],
    pub relationships: &'static [RelationshipSpec],
    /// Flags that must be set on create.
    pub required_on_create: &'static [&'static str],
    /// Flags accepted on create but not on update.
    pub create_only: &'static [&'static str],
    /// Create needs at least one attribute or relationship flag.
    pub create_requires_any: bool,
    /// Records live under per-subtype endpoints; updates and deletes look the type up first.
    pub polymorphic: bool,
}

impl ResourceDefinition {
    /// Collection path, e.g. `/v1/brokers`.
    pub fn path(&self) -> String {
        format!("/v1/{}", self.kind)
    }

    /// Member path, e.g. `/v1/brokers/12`.
    pub fn member_path(&self, id: &str) -> String {
        format!("/v1/{}/{}", self.kind, id)
    }

    pub fn supports(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    pub fn filter(&self, flag: &str) -> Option<&'static FilterSpec> {
        self.filters.iter().find(|f| f.flag == flag)
    }

    pub fn attribute(&self, flag: &str) -> Option<&'static AttributeSpec> {
        self.attributes.iter().find(|a| a.flag == flag)
    }

    pub fn relationship(&self, flag: &str) -> Option<&'static RelationshipSpec> {
        self.relationships.iter().find(|r| r.flag == flag)
    }

    /// Every create flag name, attributes first.
    pub fn write_flags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes
            .iter()
            .map(|a| a.flag)
            .chain(self.relationships.iter().map(|r| r.flag))
    }

    pub fn is_create_only(&self, flag: &str) -> bool {
        self.create_only.iter().any(|f| *f == flag)
    }

    /// Flags accepted by `action`: every write flag on create, all but the
    /// create-only ones on update.
    pub fn flags_for(&self, action: Action) -> impl Iterator<Item = &'static str> + '_ {
        self.write_flags()
            .filter(move |flag| action != Action::Update || !self.is_create_only(flag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGETS: ResourceDefinition = ResourceDefinition {
        name: "widgets",
        kind: "widgets",
        singular: "widget",
        plural: "widgets",
        about: "Widgets",
        actions: READ_ONLY,
        list: QueryShape {
            include: &["owner"],
            fields: &[
                FieldSet {
                    kind: "widgets",
                    fields: &["name", "owner"],
                },
                FieldSet {
                    kind: "users",
                    fields: &["name"],
                },
            ],
        },
        show: QueryShape::EMPTY,
        default_sort: None,
        filters: &[FilterSpec {
            flag: "owner",
            param: "owner",
            help: "Filter by owner ID",
        }],
        attributes: &[],
        relationships: &[],
        required_on_create: &[],
        create_only: &[],
        create_requires_any: false,
        polymorphic: false,
    };

    #[test]
    fn test_paths_and_lookup() {
        assert_eq!(WIDGETS.path(), "/v1/widgets");
        assert_eq!(WIDGETS.member_path("3"), "/v1/widgets/3");
        assert!(WIDGETS.supports(Action::Show));
        assert!(!WIDGETS.supports(Action::Delete));
        assert_eq!(WIDGETS.filter("owner").unwrap().param, "owner");
        assert!(WIDGETS.filter("nope").is_none());
    }

    #[test]
    fn test_query_shape_apply() {
        let mut query = Query::new();
        WIDGETS.list.apply(&mut query);
        assert_eq!(query.get("include"), Some("owner"));
        assert_eq!(query.get("fields[widgets]"), Some("name,owner"));
        assert_eq!(query.get("fields[users]"), Some("name"));

        let mut empty = Query::new();
        QueryShape::EMPTY.apply(&mut empty);
        assert!(empty.is_empty());
    }
}
