//! `xbe view <resource> list|show`.

use std::io;

use clap::ArgMatches;
use xbe::operations::{self, ListOptions};
use xbe::resources::{ResourceDefinition, ResourceHandler};
use xbe::{Result, XbeError, find_resource};

use super::{LazyClient, parse_args, subcommand};
use crate::cli::{ConnectionArgs, FieldsArgs, OutputArgs, PageArgs};

pub fn run(matches: &ArgMatches) -> Result<()> {
    let (name, resource) = subcommand(matches, "a resource")?;
    let handler = find_resource(name)
        .ok_or_else(|| XbeError::validation(format!("unknown resource {}", name)))?;

    match subcommand(resource, "an action")? {
        ("list", m) => list(handler, m),
        ("show", m) => show(handler, m),
        (other, _) => Err(XbeError::validation(format!(
            "{} does not support {}",
            name, other
        ))),
    }
}

/// Filter flags that were given, keyed by flag name.
fn filters(definition: &ResourceDefinition, matches: &ArgMatches) -> Vec<(String, String)> {
    definition
        .filters
        .iter()
        .filter_map(|filter| {
            matches
                .get_one::<String>(filter.flag)
                .map(|value| (filter.flag.to_string(), value.clone()))
        })
        .collect()
}

fn list(handler: &dyn ResourceHandler, matches: &ArgMatches) -> Result<()> {
    let connection: ConnectionArgs = parse_args(matches)?;
    let output: OutputArgs = parse_args(matches)?;
    let page: PageArgs = parse_args(matches)?;

    let options = ListOptions {
        limit: page.limit,
        offset: page.offset,
        sort: page.sort,
        filters: filters(handler.definition(), matches),
        fields: page.fields.fields,
        output: output.mode(),
    };

    let client = LazyClient::new(connection);
    let stdout = io::stdout();
    operations::list(&client, handler, &options, &mut stdout.lock())
}

fn show(handler: &dyn ResourceHandler, matches: &ArgMatches) -> Result<()> {
    let connection: ConnectionArgs = parse_args(matches)?;
    let output: OutputArgs = parse_args(matches)?;
    let fields: FieldsArgs = parse_args(matches)?;
    let id = matches
        .get_one::<String>("id")
        .map(String::as_str)
        .unwrap_or_default();

    let client = LazyClient::new(connection);
    let stdout = io::stdout();
    operations::show(
        &client,
        handler,
        id,
        fields.fields.as_deref(),
        output.mode(),
        &mut stdout.lock(),
    )
}
