//! `xbe do <resource> create|update|delete`.

use std::io;

use clap::ArgMatches;
use xbe::operations;
use xbe::resources::{Action, FieldValue, FieldValues, ResourceDefinition};
use xbe::{Result, XbeError, find_resource};

use super::{LazyClient, parse_args, subcommand};
use crate::cli::{ConnectionArgs, OutputArgs};

pub fn run(matches: &ArgMatches) -> Result<()> {
    let (name, resource) = subcommand(matches, "a resource")?;
    let handler = find_resource(name)
        .ok_or_else(|| XbeError::validation(format!("unknown resource {}", name)))?;

    let (action, m) = subcommand(resource, "an action")?;
    let connection: ConnectionArgs = parse_args(m)?;
    let output: OutputArgs = parse_args(m)?;
    // `create` has no id argument.
    let id = m
        .try_get_one::<String>("id")
        .ok()
        .flatten()
        .map(String::as_str)
        .unwrap_or_default();

    let client = LazyClient::new(connection);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match action {
        "create" => {
            let values = field_values(handler.definition(), Action::Create, m);
            operations::create(&client, handler, &values, output.mode(), &mut out)
        }
        "update" => {
            let values = field_values(handler.definition(), Action::Update, m);
            operations::update(&client, handler, id, &values, output.mode(), &mut out)
        }
        "delete" => {
            let confirm = m.get_flag("confirm");
            operations::delete(&client, handler, id, confirm, output.mode(), &mut out)
        }
        other => Err(XbeError::validation(format!(
            "{} does not support {}",
            name, other
        ))),
    }
}

/// Write flags accepted by `action` as given: absent, empty, or set.
fn field_values(
    definition: &ResourceDefinition,
    action: Action,
    matches: &ArgMatches,
) -> FieldValues {
    let mut values = FieldValues::new();
    for flag in definition.flags_for(action) {
        if let Some(raw) = matches.get_one::<String>(flag) {
            values.insert(flag, FieldValue::from_text(raw));
        }
    }
    values
}
