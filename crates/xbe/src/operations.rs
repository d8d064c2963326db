//! Command operations: one request (or two) per call, rendered to a writer.
//!
//! Every operation validates its input before touching the network, so a
//! validation error never leaves a request behind.

use std::io::Write;

use tracing::debug;

use crate::api::{ApiClient, Query};
use crate::error::{Result, XbeError};
use crate::jsonapi::Document;
use crate::render::sparse::{parse_fields, sparse_object, sparse_table};
use crate::render::{OutputMode, Table, write_json};
use crate::resources::{Action, FieldValues, ResourceHandler, WriteMode, build_write_body};
use crate::summary::{
    ColumnSelection, SummaryDefinition, SummaryOptions, SummaryOutput, SummaryRequest,
    SummaryTable, format_value, raw_value,
};

/// Page size sent by `list` when `--limit` is not given.
pub const DEFAULT_LIMIT: u32 = 50;

/// Flags accepted by `list`.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub sort: Option<String>,
    /// Filter flag values keyed by flag name.
    pub filters: Vec<(String, String)>,
    /// Raw `--fields` value.
    pub fields: Option<String>,
    pub output: OutputMode,
}

/// How a summary result is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryFormat {
    #[default]
    Table,
    Json {
        omit_null: bool,
    },
    Csv,
}

fn ensure_supported(handler: &dyn ResourceHandler, action: Action) -> Result<()> {
    let definition = handler.definition();
    if definition.supports(action) {
        Ok(())
    } else {
        Err(XbeError::validation(format!(
            "{} does not support {}",
            definition.name,
            action.as_str()
        )))
    }
}

fn requested_fields(raw: Option<&str>) -> Option<Vec<String>> {
    raw.map(parse_fields).filter(|fields| !fields.is_empty())
}

fn set_sparse_fields(query: &mut Query, kind: &str, fields: &[String]) {
    let names: Vec<&str> = fields.iter().map(String::as_str).collect();
    query.fields(kind, &names);
}

fn labelled(verb: &str, singular: &str, id: &str, label: &str) -> String {
    if label.is_empty() {
        format!("{} {} {}", verb, singular, id)
    } else {
        format!("{} {} {} ({})", verb, singular, id, label)
    }
}

/// Build the `list` query for `handler`.
pub fn list_query(handler: &dyn ResourceHandler, options: &ListOptions) -> Result<Query> {
    let definition = handler.definition();
    let mut query = Query::new();
    definition.list.apply(&mut query);

    if let Some(fields) = requested_fields(options.fields.as_deref()) {
        set_sparse_fields(&mut query, definition.kind, &fields);
    }

    query.page(
        options.limit.unwrap_or(DEFAULT_LIMIT),
        options.offset.unwrap_or(0),
    );

    match options.sort.as_deref().map(str::trim) {
        Some(sort) if !sort.is_empty() => {
            query.set("sort", sort);
        }
        _ => {
            if let Some(sort) = definition.default_sort {
                query.set("sort", sort);
            }
        }
    }

    for (flag, value) in &options.filters {
        let spec = definition.filter(flag).ok_or_else(|| {
            XbeError::validation(format!("unknown filter --{} for {}", flag, definition.name))
        })?;
        query.filter(spec.param, value);
    }

    Ok(query)
}

/// `view <resource> list`.
pub fn list(
    client: &dyn ApiClient,
    handler: &dyn ResourceHandler,
    options: &ListOptions,
    out: &mut dyn Write,
) -> Result<()> {
    ensure_supported(handler, Action::List)?;
    let definition = handler.definition();
    let query = list_query(handler, options)?;

    let response = client.get(&definition.path(), &query)?;
    let doc = Document::parse(&response.body)?;
    let resources = doc.list()?;
    debug!(resource = definition.name, count = resources.len(), "listed");

    if let Some(fields) = requested_fields(options.fields.as_deref()) {
        if options.output.json {
            let objects: Vec<_> = resources.iter().map(|r| sparse_object(r, &fields)).collect();
            return write_json(out, &objects, options.output.omit_null);
        }
        if resources.is_empty() {
            writeln!(out, "No {} found.", definition.plural)?;
            return Ok(());
        }
        sparse_table(resources, &fields).render(out)?;
        return Ok(());
    }

    let included = doc.identity_map();
    if options.output.json {
        let rows = handler.rows_json(resources, &included)?;
        return write_json(out, &rows, options.output.omit_null);
    }

    if resources.is_empty() {
        writeln!(out, "No {} found.", definition.plural)?;
        return Ok(());
    }
    handler.list_table(resources, &included).render(out)?;
    Ok(())
}

/// `view <resource> show <id>`.
pub fn show(
    client: &dyn ApiClient,
    handler: &dyn ResourceHandler,
    id: &str,
    fields: Option<&str>,
    output: OutputMode,
    out: &mut dyn Write,
) -> Result<()> {
    ensure_supported(handler, Action::Show)?;
    let definition = handler.definition();
    let id = required_id(id)?;

    let mut query = Query::new();
    definition.show.apply(&mut query);
    let fields = requested_fields(fields);
    if let Some(fields) = &fields {
        set_sparse_fields(&mut query, definition.kind, fields);
    }

    let response = client.get(&definition.member_path(id), &query)?;
    let doc = Document::parse(&response.body)?;
    let resource = doc.single()?;

    if let Some(fields) = fields {
        let object = sparse_object(resource, &fields);
        if output.json {
            return write_json(out, &object, output.omit_null);
        }
        sparse_table(std::slice::from_ref(resource), &fields).render(out)?;
        return Ok(());
    }

    let included = doc.identity_map();
    if output.json {
        let row = handler.row_json(resource, &included)?;
        return write_json(out, &row, output.omit_null);
    }
    handler.details(resource, &included).render(out)?;
    Ok(())
}

fn required_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(XbeError::validation("id is required"));
    }
    Ok(id)
}

/// `do <resource> create`.
pub fn create(
    client: &dyn ApiClient,
    handler: &dyn ResourceHandler,
    values: &FieldValues,
    output: OutputMode,
    out: &mut dyn Write,
) -> Result<()> {
    ensure_supported(handler, Action::Create)?;
    let definition = handler.definition();

    handler.validate_create(values)?;
    let body = build_write_body(definition, values, WriteMode::Create)?;
    let kind = handler.create_kind(&body.linked);

    let response = client.post(&format!("/v1/{}", kind), &body.document(&kind, None))?;
    let doc = Document::parse(&response.body)?;
    let resource = doc.single()?;
    let included = doc.identity_map();

    if output.json {
        let row = handler.row_json(resource, &included)?;
        return write_json(out, &row, output.omit_null);
    }
    let label = handler.label(resource, &included);
    writeln!(
        out,
        "{}",
        labelled("Created", definition.singular, &resource.id, &label)
    )?;
    Ok(())
}

/// `do <resource> update <id>`.
///
/// Polymorphic resources are fetched first so the PATCH goes to the
/// record's concrete type.
pub fn update(
    client: &dyn ApiClient,
    handler: &dyn ResourceHandler,
    id: &str,
    values: &FieldValues,
    output: OutputMode,
    out: &mut dyn Write,
) -> Result<()> {
    ensure_supported(handler, Action::Update)?;
    let definition = handler.definition();
    let id = required_id(id)?;
    let body = build_write_body(definition, values, WriteMode::Update)?;

    let kind = if definition.polymorphic {
        let response = client.get(&definition.member_path(id), &Query::new())?;
        let current = Document::parse(&response.body)?;
        let kind = current.single()?.kind.clone();
        debug!(id, kind = %kind, "resolved record type");
        kind
    } else {
        definition.kind.to_string()
    };

    let response = client.patch(
        &format!("/v1/{}/{}", kind, id),
        &body.document(&kind, Some(id)),
    )?;
    let doc = Document::parse(&response.body)?;
    let resource = doc.single()?;
    let included = doc.identity_map();

    if output.json {
        let row = handler.row_json(resource, &included)?;
        return write_json(out, &row, output.omit_null);
    }
    let label = handler.label(resource, &included);
    writeln!(
        out,
        "{}",
        labelled("Updated", definition.singular, &resource.id, &label)
    )?;
    Ok(())
}

/// `do <resource> delete <id>`.
///
/// Fetches the record for its label, then deletes it. Polymorphic records
/// are deleted under their concrete type. The two requests are not
/// transactional.
pub fn delete(
    client: &dyn ApiClient,
    handler: &dyn ResourceHandler,
    id: &str,
    confirm: bool,
    output: OutputMode,
    out: &mut dyn Write,
) -> Result<()> {
    ensure_supported(handler, Action::Delete)?;
    let definition = handler.definition();
    if !confirm {
        return Err(XbeError::validation(format!(
            "--confirm is required to delete a {}",
            definition.singular
        )));
    }
    let id = required_id(id)?;

    let mut query = Query::new();
    definition.show.apply(&mut query);
    let path = definition.member_path(id);
    let response = client.get(&path, &query)?;
    let doc = Document::parse(&response.body)?;
    let resource = doc.single()?;
    let included = doc.identity_map();

    let delete_path = if definition.polymorphic {
        format!("/v1/{}/{}", resource.kind, id)
    } else {
        path
    };
    client.delete(&delete_path)?;

    if output.json {
        let row = handler.row_json(resource, &included)?;
        return write_json(out, &row, output.omit_null);
    }
    let label = handler.label(resource, &included);
    writeln!(
        out,
        "{}",
        labelled("Deleted", definition.singular, id, &label)
    )?;
    Ok(())
}

/// `summarize <summary> create`.
pub fn summarize(
    client: &dyn ApiClient,
    definition: &SummaryDefinition,
    options: &SummaryOptions,
    format: SummaryFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let request = SummaryRequest::build(definition, options)?;

    let response = client.post_with_query(&definition.path(), &request.query, &request.body)?;
    let doc = Document::parse(&response.body)?;
    let result = SummaryTable::from_attributes(&doc.single()?.attributes);
    debug!(
        summary = definition.name,
        headers = result.headers.len(),
        rows = result.values.len(),
        "summary received"
    );

    let selected = result.select(
        definition,
        ColumnSelection {
            group_by: &request.group_by,
            metrics: &request.metrics,
            all_metrics: request.all_metrics,
        },
    );

    match format {
        SummaryFormat::Json { omit_null } => {
            write_json(out, &SummaryOutput::from(selected), omit_null)
        }
        SummaryFormat::Csv => write_summary_csv(&selected, out),
        SummaryFormat::Table => write_summary_table(definition, &selected, out),
    }
}

fn write_summary_table(
    definition: &SummaryDefinition,
    table: &SummaryTable,
    out: &mut dyn Write,
) -> Result<()> {
    if table.headers.is_empty() {
        writeln!(out, "No headers returned.")?;
        return Ok(());
    }
    if table.is_empty() {
        writeln!(out, "No {} data found.", definition.title)?;
        return Ok(());
    }

    let mut rendered = Table::with_headers(table.headers.iter().cloned());
    for row in &table.values {
        rendered.add_row(
            table
                .headers
                .iter()
                .zip(row)
                .map(|(header, value)| format_value(header, value)),
        );
    }
    rendered.render(out)?;
    Ok(())
}

fn write_summary_csv(table: &SummaryTable, out: &mut dyn Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&table.headers)?;
    for row in &table.values {
        let cells: Vec<String> = (0..table.headers.len())
            .map(|i| row.get(i).map(raw_value).unwrap_or_default())
            .collect();
        writer.write_record(&cells)?;
    }
    writer.flush()?;
    Ok(())
}
