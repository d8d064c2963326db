//! CLI argument definitions using clap.
//!
//! The top level and the shared flag groups are clap derives. Resource and
//! summary subcommands are generated from the library's definition tables,
//! so adding a resource there adds its commands here.

use clap::{Arg, ArgAction, Args, Command, CommandFactory, Parser};
use xbe::OutputMode;
use xbe::resources::{Action, RESOURCES, RelationshipTarget, ResourceDefinition};
use xbe::summary::{SUMMARIES, SummaryDefinition};

/// xbe: command-line client for the XBE platform
#[derive(Parser, Debug)]
#[command(name = "xbe")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Where requests go and how they authenticate.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// API base URL (default: XBE_BASE_URL, config file, then production)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// API token (default: XBE_TOKEN, XBE_API_TOKEN, then config file)
    #[arg(long)]
    pub token: Option<String>,

    /// Disable auth token lookup
    #[arg(long)]
    pub no_auth: bool,
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputArgs {
    /// Output JSON
    #[arg(long)]
    pub json: bool,

    /// Omit null values in JSON output
    #[arg(long)]
    pub omit_null: bool,
}

impl OutputArgs {
    pub fn mode(&self) -> OutputMode {
        OutputMode {
            json: self.json,
            omit_null: self.omit_null,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct FieldsArgs {
    /// Sparse fieldset: comma-separated attributes to return
    #[arg(long, value_name = "FIELDS")]
    pub fields: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Page size (default 50)
    #[arg(long)]
    pub limit: Option<u32>,

    /// Page offset
    #[arg(long)]
    pub offset: Option<u32>,

    /// Sort order, e.g. name or -created-at
    #[arg(long)]
    pub sort: Option<String>,

    #[command(flatten)]
    pub fields: FieldsArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SummaryArgs {
    /// Group-by columns, comma-separated (pass "" for no grouping)
    #[arg(long, value_name = "COLUMNS")]
    pub group_by: Option<String>,

    /// Sort terms, comma-separated column[:asc|desc]
    #[arg(long)]
    pub sort: Option<String>,

    /// Maximum rows to return
    #[arg(long)]
    pub limit: Option<u32>,

    /// Metrics to show, comma-separated
    #[arg(long)]
    pub metrics: Option<String>,

    /// Metric to show (repeatable)
    #[arg(long)]
    pub metric: Vec<String>,

    /// Show every metric column
    #[arg(long)]
    pub all_metrics: bool,

    /// Filters as a JSON object
    #[arg(long, value_name = "JSON")]
    pub filters: Option<String>,

    /// Filter as key=value (repeatable, overrides --filters)
    #[arg(long, value_name = "KEY=VALUE")]
    pub filter: Vec<String>,

    /// Output CSV
    #[arg(long, conflicts_with = "json")]
    pub csv: bool,
}

/// Full command tree.
pub fn command() -> Command {
    Cli::command()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(view_command())
        .subcommand(do_command())
        .subcommand(summarize_command())
}

fn common(cmd: Command) -> Command {
    OutputArgs::augment_args(ConnectionArgs::augment_args(cmd))
}

fn id_arg(singular: &str) -> Arg {
    Arg::new("id")
        .value_name("ID")
        .required(true)
        .help(format!("{} ID", singular))
}

fn view_command() -> Command {
    let mut view = Command::new("view")
        .about("Browse resources")
        .subcommand_required(true)
        .arg_required_else_help(true);

    for handler in RESOURCES {
        let def = handler.definition();
        let mut resource = Command::new(def.name)
            .about(def.about)
            .subcommand_required(true)
            .arg_required_else_help(true);
        if def.supports(Action::List) {
            resource = resource.subcommand(list_command(def));
        }
        if def.supports(Action::Show) {
            resource = resource.subcommand(show_command(def));
        }
        view = view.subcommand(resource);
    }
    view
}

fn list_command(def: &'static ResourceDefinition) -> Command {
    let cmd = PageArgs::augment_args(common(
        Command::new("list").about(format!("List {}", def.plural)),
    ));
    def.filters.iter().fold(cmd, |cmd, filter| {
        cmd.arg(
            Arg::new(filter.flag)
                .long(filter.flag)
                .value_name("VALUE")
                .help(filter.help),
        )
    })
}

fn show_command(def: &'static ResourceDefinition) -> Command {
    FieldsArgs::augment_args(common(
        Command::new("show")
            .about(format!("Show {} details", def.singular))
            .arg(id_arg(def.singular)),
    ))
}

fn do_command() -> Command {
    let mut act = Command::new("do")
        .about("Create, update and delete resources")
        .subcommand_required(true)
        .arg_required_else_help(true);

    for handler in RESOURCES {
        let def = handler.definition();
        let writes = [Action::Create, Action::Update, Action::Delete];
        if !writes.iter().any(|a| def.supports(*a)) {
            continue;
        }
        let mut resource = Command::new(def.name)
            .about(def.about)
            .subcommand_required(true)
            .arg_required_else_help(true);
        if def.supports(Action::Create) {
            resource = resource.subcommand(write_flags(
                common(Command::new("create").about(format!("Create a {}", def.singular))),
                def,
                Action::Create,
            ));
        }
        if def.supports(Action::Update) {
            resource = resource.subcommand(write_flags(
                common(
                    Command::new("update")
                        .about(format!("Update a {}", def.singular))
                        .after_help("Pass an empty value (--flag \"\") to clear a field.")
                        .arg(id_arg(def.singular)),
                ),
                def,
                Action::Update,
            ));
        }
        if def.supports(Action::Delete) {
            resource = resource.subcommand(
                common(
                    Command::new("delete")
                        .about(format!("Delete a {}", def.singular))
                        .arg(id_arg(def.singular)),
                )
                .arg(
                    Arg::new("confirm")
                        .long("confirm")
                        .action(ArgAction::SetTrue)
                        .help("Confirm deletion"),
                ),
            );
        }
        act = act.subcommand(resource);
    }
    act
}

fn write_flags(cmd: Command, def: &'static ResourceDefinition, action: Action) -> Command {
    let accepted = |flag: &str| action != Action::Update || !def.is_create_only(flag);
    let attributes = def.attributes.iter().filter(|attr| accepted(attr.flag));
    let cmd = attributes.fold(cmd, |cmd, attr| {
        cmd.arg(
            Arg::new(attr.flag)
                .long(attr.flag)
                .value_name("VALUE")
                .allow_hyphen_values(true)
                .help(attr.help),
        )
    });
    let relationships = def.relationships.iter().filter(|rel| accepted(rel.flag));
    relationships.fold(cmd, |cmd, rel| {
        let value_name = match rel.target {
            RelationshipTarget::Fixed(_) => "ID",
            RelationshipTarget::Polymorphic => "TYPE|ID",
        };
        cmd.arg(
            Arg::new(rel.flag)
                .long(rel.flag)
                .value_name(value_name)
                .help(rel.help),
        )
    })
}

fn summarize_command() -> Command {
    let mut summarize = Command::new("summarize")
        .about("Run server-side summary reports")
        .subcommand_required(true)
        .arg_required_else_help(true);

    for def in SUMMARIES {
        summarize = summarize.subcommand(
            Command::new(def.name)
                .about(def.about)
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(summary_create_command(def)),
        );
    }
    summarize
}

fn summary_create_command(def: &'static SummaryDefinition) -> Command {
    let mut cmd = SummaryArgs::augment_args(common(
        Command::new("create").about(format!("Create a {}", def.title)),
    ));
    if def.date_range {
        cmd = cmd
            .arg(
                Arg::new("start-on")
                    .long("start-on")
                    .value_name("YYYY-MM-DD")
                    .help("Start date (required)"),
            )
            .arg(
                Arg::new("end-on")
                    .long("end-on")
                    .value_name("YYYY-MM-DD")
                    .help("End date (required)"),
            );
    }
    if def.min_transactions {
        cmd = cmd.arg(
            Arg::new("min-transactions")
                .long("min-transactions")
                .value_parser(clap::value_parser!(u32))
                .help("Minimum material transaction count per row"),
        );
    }
    def.feature_flags.iter().fold(cmd, |cmd, feature| {
        cmd.arg(
            Arg::new(feature.flag)
                .long(feature.flag)
                .action(ArgAction::SetTrue)
                .help(feature.help),
        )
    })
}
