//! `xbe summarize <summary> create`.

use std::io;

use clap::ArgMatches;
use xbe::operations::{self, SummaryFormat};
use xbe::summary::{SummaryDefinition, SummaryOptions};
use xbe::{Result, XbeError, find_summary};

use super::{LazyClient, parse_args, subcommand};
use crate::cli::{ConnectionArgs, OutputArgs, SummaryArgs};

pub fn run(matches: &ArgMatches) -> Result<()> {
    let (name, summary) = subcommand(matches, "a summary")?;
    let definition = find_summary(name)
        .ok_or_else(|| XbeError::validation(format!("unknown summary {}", name)))?;

    match subcommand(summary, "an action")? {
        ("create", m) => create(definition, m),
        (other, _) => Err(XbeError::validation(format!(
            "{} does not support {}",
            name, other
        ))),
    }
}

fn optional_string(matches: &ArgMatches, id: &str) -> Option<String> {
    matches.try_get_one::<String>(id).ok().flatten().cloned()
}

/// Combine the shared summary flags with the per-summary ones.
fn summary_options(definition: &SummaryDefinition, args: SummaryArgs, matches: &ArgMatches) -> SummaryOptions {
    SummaryOptions {
        start_on: optional_string(matches, "start-on"),
        end_on: optional_string(matches, "end-on"),
        group_by: args.group_by,
        sort: args.sort,
        limit: args.limit,
        metrics: args.metrics,
        metric: args.metric,
        all_metrics: args.all_metrics,
        filters_json: args.filters,
        filter: args.filter,
        min_transactions: matches
            .try_get_one::<u32>("min-transactions")
            .ok()
            .flatten()
            .copied(),
        optional_features: definition
            .feature_flags
            .iter()
            .filter(|feature| matches.get_flag(feature.flag))
            .map(|feature| feature.feature.to_string())
            .collect(),
    }
}

fn create(definition: &'static SummaryDefinition, matches: &ArgMatches) -> Result<()> {
    let connection: ConnectionArgs = parse_args(matches)?;
    let output: OutputArgs = parse_args(matches)?;
    let args: SummaryArgs = parse_args(matches)?;

    let format = if args.csv {
        SummaryFormat::Csv
    } else if output.json {
        SummaryFormat::Json {
            omit_null: output.omit_null,
        }
    } else {
        SummaryFormat::Table
    };
    let options = summary_options(definition, args, matches);

    let client = LazyClient::new(connection);
    let stdout = io::stdout();
    operations::summarize(&client, definition, &options, format, &mut stdout.lock())
}
