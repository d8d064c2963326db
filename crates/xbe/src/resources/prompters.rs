//! Prompters: named sets of AI prompt templates.

use serde::Serialize;

use crate::jsonapi::attrs::{opt_bool_attr, trimmed_attr};
use crate::jsonapi::{IdentityMap, Resource};
use crate::render::{Details, Table};

use super::definition::{
    AttrKind, AttributeSpec, FULL_CRUD, QueryShape, ResourceDefinition, same_attribute,
    same_filter,
};
use super::view::ResourceView;

/// Prompt template attributes, with their detail labels.
const TEMPLATES: &[(&str, &str)] = &[
    (
        "release-note-guess-has-navigation-instructions-prompt-template",
        "Release Note Navigation Instructions",
    ),
    (
        "release-note-headline-suggestions-prompt-template",
        "Release Note Headline Suggestions",
    ),
    (
        "release-note-glossary-term-suggestions-prompt-template",
        "Release Note Glossary Term Suggestions",
    ),
    (
        "jpp-safety-risks-suggestion-suggestion-prompt-template",
        "JPP Safety Risks Suggestion",
    ),
    (
        "jpp-safety-risk-comm-suggestion-suggestion-prompt-template",
        "JPP Safety Risk Communication Suggestion",
    ),
    (
        "incident-headline-suggestion-suggestion-prompt-template",
        "Incident Headline Suggestion",
    ),
    (
        "glossary-term-definition-suggestions-prompt-template",
        "Glossary Term Definition Suggestions",
    ),
    ("condensable-condense-prompt-template", "Condense"),
    ("answer-answer-prompt-template", "Answer"),
    ("action-item-summary-prompt-template", "Action Item Summary"),
];

const fn template(flag: &'static str, help: &'static str) -> AttributeSpec {
    same_attribute(flag, AttrKind::String, help)
}

pub const PROMPTERS: ResourceDefinition = ResourceDefinition {
    name: "prompters",
    kind: "prompters",
    singular: "prompter",
    plural: "prompters",
    about: "AI prompt template sets",
    actions: FULL_CRUD,
    list: QueryShape::EMPTY,
    show: QueryShape::EMPTY,
    default_sort: None,
    filters: &[
        same_filter("name", "Filter by name"),
        same_filter("is-active", "Filter by active status (true/false)"),
    ],
    attributes: &[
        same_attribute("name", AttrKind::String, "Prompter name"),
        same_attribute("is-active", AttrKind::Bool, "Set as active (true/false)"),
        template(
            "release-note-guess-has-navigation-instructions-prompt-template",
            "Template for release note navigation instructions",
        ),
        template(
            "release-note-headline-suggestions-prompt-template",
            "Template for release note headline suggestions",
        ),
        template(
            "release-note-glossary-term-suggestions-prompt-template",
            "Template for release note glossary term suggestions",
        ),
        template(
            "jpp-safety-risks-suggestion-suggestion-prompt-template",
            "Template for JPP safety risks suggestions",
        ),
        template(
            "jpp-safety-risk-comm-suggestion-suggestion-prompt-template",
            "Template for JPP safety risk communication suggestions",
        ),
        template(
            "incident-headline-suggestion-suggestion-prompt-template",
            "Template for incident headline suggestions",
        ),
        template(
            "glossary-term-definition-suggestions-prompt-template",
            "Template for glossary term definition suggestions",
        ),
        template(
            "condensable-condense-prompt-template",
            "Template for content condensation",
        ),
        template("answer-answer-prompt-template", "Template for answer generation"),
        template(
            "action-item-summary-prompt-template",
            "Template for action item summaries",
        ),
    ],
    relationships: &[],
    required_on_create: &[],
    create_only: &[],
    create_requires_any: true,
    polymorphic: false,
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct PrompterRow {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Templates that are set, keyed by attribute name.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<(String, String)>,
}

pub struct Prompters;

impl ResourceView for Prompters {
    type Row = PrompterRow;

    fn definition(&self) -> &'static ResourceDefinition {
        &PROMPTERS
    }

    fn build_row(&self, resource: &Resource, _included: &IdentityMap<'_>) -> PrompterRow {
        let attrs = &resource.attributes;
        PrompterRow {
            id: resource.id.clone(),
            name: trimmed_attr(attrs, "name"),
            is_active: opt_bool_attr(attrs, "is-active"),
            templates: TEMPLATES
                .iter()
                .map(|(key, _)| (key.to_string(), trimmed_attr(attrs, key)))
                .filter(|(_, text)| !text.is_empty())
                .collect(),
        }
    }

    fn table(&self, rows: &[PrompterRow]) -> Table {
        let mut table = Table::new().column("ID").truncated("NAME", 40).column("ACTIVE");
        for row in rows {
            let active = match row.is_active {
                Some(true) => "yes",
                Some(false) => "no",
                None => "",
            };
            table.add_row([row.id.as_str(), row.name.as_str(), active]);
        }
        table
    }

    fn details(&self, row: &PrompterRow) -> Details {
        let mut details = Details::new();
        details
            .field("ID", &row.id)
            .field("Name", &row.name)
            .flag("Active", row.is_active)
            .section("Templates");
        for (key, label) in TEMPLATES {
            if let Some((_, text)) = row.templates.iter().find(|(k, _)| k == key) {
                details.field(label, text);
            }
        }
        details
    }

    fn label(&self, row: &PrompterRow) -> String {
        row.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonapi::Document;

    #[test]
    fn test_templates_keep_definition_order() {
        let doc = Document::parse(
            r#"{"data": {"type": "prompters", "id": "2",
                "attributes": {
                    "name": "Default",
                    "is-active": true,
                    "answer-answer-prompt-template": "Answer {{question}}",
                    "condensable-condense-prompt-template": "Condense {{text}}",
                    "action-item-summary-prompt-template": ""
                }}}"#,
        )
        .unwrap();
        let row = Prompters.build_row(doc.single().unwrap(), &doc.identity_map());
        assert_eq!(row.templates.len(), 2);
        assert_eq!(row.templates[0].0, "condensable-condense-prompt-template");

        assert_eq!(
            ResourceView::details(&Prompters, &row).to_text(),
            "ID: 2\nName: Default\nActive: yes\n\nTemplates:\n  Condense: Condense {{text}}\n  Answer: Answer {{question}}\n"
        );
        assert_eq!(
            Prompters.table(&[row]).to_text(),
            "ID  NAME     ACTIVE\n2   Default  yes\n"
        );
    }

    #[test]
    fn test_every_template_is_a_write_flag() {
        for (key, _) in TEMPLATES {
            assert!(PROMPTERS.attribute(key).is_some(), "missing {}", key);
        }
    }
}
