//! Built-in summary definitions.

/// Physical columns behind one group-by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupByColumns {
    pub key: &'static str,
    /// Every column the server returns for this key.
    pub all: &'static [&'static str],
    /// The subset shown by default.
    pub display: &'static [&'static str],
}

/// Boolean CLI flag that enables a server-side optional feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlag {
    pub flag: &'static str,
    pub feature: &'static str,
    pub help: &'static str,
}

/// One `summarize <name> create` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryDefinition {
    /// CLI noun, e.g. `shift-summary`.
    pub name: &'static str,
    /// JSON:API type posted to `/v1/<kind>`.
    pub kind: &'static str,
    /// Human label used in empty-result messages.
    pub title: &'static str,
    pub about: &'static str,
    /// Whether `--start-on`/`--end-on` are accepted and required.
    pub date_range: bool,
    /// Whether `--min-transactions` is accepted.
    pub min_transactions: bool,
    /// Whether selected metrics are sent as `included-metrics`.
    pub sends_metrics: bool,
    pub default_group_by: &'static [&'static str],
    pub default_sort: &'static [&'static str],
    pub default_metrics: &'static [&'static str],
    /// Metrics requested from the server under `--all-metrics`.
    pub all_metrics_request: &'static [&'static str],
    pub feature_flags: &'static [FeatureFlag],
    pub group_by: &'static [GroupByColumns],
}

impl SummaryDefinition {
    pub fn path(&self) -> String {
        format!("/v1/{}", self.kind)
    }

    pub fn group_by_columns(&self, key: &str) -> Option<&'static GroupByColumns> {
        self.group_by.iter().find(|g| g.key == key)
    }

    pub fn group_by_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.group_by.iter().map(|g| g.key)
    }
}

const fn same(key: &'static str, cols: &'static [&'static str]) -> GroupByColumns {
    GroupByColumns {
        key,
        all: cols,
        display: cols,
    }
}

const fn named(
    key: &'static str,
    all: &'static [&'static str],
    display: &'static [&'static str],
) -> GroupByColumns {
    GroupByColumns { key, all, display }
}

pub const SHIFT_SUMMARY: SummaryDefinition = SummaryDefinition {
    name: "shift-summary",
    kind: "shift-summaries",
    title: "shift summary",
    about: "Summarize shifts over a date range",
    date_range: true,
    min_transactions: false,
    sends_metrics: true,
    default_group_by: &["driver"],
    default_sort: &["shift_count:desc"],
    default_metrics: &["shift_count", "hours_sum", "tons_sum", "trip_sum"],
    all_metrics_request: &[],
    feature_flags: &[],
    group_by: &[
        same("tender_job_schedule_shift", &["tender_job_schedule_shift_id"]),
        same("date", &["date"]),
        named("broker", &["broker_id", "broker_name"], &["broker_name"]),
        named(
            "business_unit",
            &["business_unit_id", "business_unit_name"],
            &["business_unit_name"],
        ),
        same("month", &["month"]),
        same("dow", &["dow"]),
        same("start_hour", &["start_hour"]),
        same("day_or_night", &["day_or_night"]),
        same("week", &["week"]),
        same("year", &["year"]),
        named("customer", &["customer_id", "customer_name"], &["customer_name"]),
        named(
            "contractor",
            &["contractor_id", "contractor_name"],
            &["contractor_name"],
        ),
        named("trucker", &["trucker_id", "trucker_name"], &["trucker_name"]),
        named("driver", &["driver_id", "driver_name"], &["driver_name"]),
        same("job_number", &["job_number"]),
        same("raw_job_number", &["raw_job_number"]),
        same("managed", &["managed"]),
        same("expects_time_cards", &["expects_time_cards"]),
        named("planner", &["planner_id", "planner_name"], &["planner_name"]),
        same("is_stockpiling", &["is_stockpiling"]),
        same("job_site_state_code", &["job_site_state_code"]),
        same("trailer_classification", &["trailer_classification"]),
        named("trailer", &["trailer_id", "trailer_number"], &["trailer_number"]),
        same("has_trips", &["has_trips"]),
        same("driver_day", &["driver_day_id"]),
    ],
};

pub const DRIVER_DAY_SUMMARY: SummaryDefinition = SummaryDefinition {
    name: "driver-day-summary",
    kind: "driver-day-summaries",
    title: "driver day summary",
    about: "Summarize driver days",
    date_range: false,
    min_transactions: false,
    sends_metrics: true,
    default_group_by: &["driver"],
    default_sort: &["driver_day_count:desc"],
    default_metrics: &["driver_day_count", "duration_hours_sum", "shift_count_sum"],
    all_metrics_request: &[],
    feature_flags: &[],
    group_by: &[
        named("broker", &["broker_id", "broker_name"], &["broker_name"]),
        named("trucker", &["trucker_id", "trucker_name"], &["trucker_name"]),
        named("driver", &["driver_id", "driver_name"], &["driver_name"]),
        same("is_driver_assigned", &["is_driver_assigned"]),
        same("shift_count", &["shift_count"]),
        same("is_managed", &["is_managed"]),
        same("is_timecarded", &["is_timecarded"]),
        same("year", &["year"]),
        same("month", &["month"]),
        same("week", &["week"]),
        same("date", &["date"]),
        same("time_card_cost_band_50", &["time_card_cost_band_50"]),
        same("trailer_classification", &["trailer_classification"]),
    ],
};

pub const MATERIAL_TRANSACTION_SUMMARY: SummaryDefinition = SummaryDefinition {
    name: "material-transaction-summary",
    kind: "material-transaction-summaries",
    title: "material transaction summary",
    about: "Summarize material transactions",
    date_range: false,
    min_transactions: true,
    sends_metrics: true,
    default_group_by: &["material_site"],
    default_sort: &["material_transaction_count:desc"],
    default_metrics: &["material_transaction_count", "tons_sum"],
    all_metrics_request: &["material_transaction_count", "tons_sum", "tons_avg"],
    feature_flags: &[],
    group_by: &[
        same(
            "material_type_fully_qualified_name_base",
            &["material_type_fully_qualified_name_base"],
        ),
        named("broker", &["broker_id", "broker_name"], &["broker_name"]),
        named(
            "business_unit",
            &["business_unit_id", "business_unit_name"],
            &["business_unit_name"],
        ),
        named("customer", &["customer_id", "customer_name"], &["customer_name"]),
        named("trucker", &["trucker_id", "trucker_name"], &["trucker_name"]),
        same("customer_segment", &["customer_segment"]),
        same("date", &["date"]),
        same("month", &["month"]),
        same("year", &["year"]),
        same("day_of_year", &["day_of_year"]),
        same("day_of_week", &["day_of_week"]),
        same("week_of_year", &["week_of_year"]),
        same("status", &["status"]),
        same("hour", &["hour"]),
        named(
            "material_type",
            &[
                "material_type_id",
                "material_type_name",
                "material_type_display_name",
            ],
            &["material_type_name"],
        ),
        named(
            "material_site",
            &["material_site_id", "material_site_name"],
            &["material_site_name"],
        ),
        named(
            "material_supplier",
            &["material_supplier_id", "material_supplier_name"],
            &["material_supplier_name"],
        ),
        named("project", &["project_id", "project_name"], &["project_name"]),
        named(
            "job_production_plan",
            &["job_production_plan_id", "job_production_plan_name"],
            &["job_production_plan_name"],
        ),
        named("planner", &["planner_id", "planner_name"], &["planner_name"]),
        named(
            "project_manager",
            &["project_manager_id", "project_manager_name"],
            &["project_manager_name"],
        ),
        named(
            "developer",
            &["developer_id", "developer_name"],
            &["developer_name"],
        ),
        same("direction", &["direction"]),
        named("job_site", &["job_site_id", "job_site_name"], &["job_site_name"]),
        same(
            "is_material_supplier_controlled_by_broker",
            &["is_material_supplier_controlled_by_broker"],
        ),
    ],
};

pub const LANE_SUMMARY: SummaryDefinition = SummaryDefinition {
    name: "lane-summary",
    kind: "cycle-summaries",
    title: "lane summary",
    about: "Summarize hauling lanes (origin to destination cycles)",
    date_range: false,
    min_transactions: true,
    sends_metrics: false,
    default_group_by: &["origin", "destination"],
    default_sort: &["material_transaction_count:desc"],
    default_metrics: &[
        "cycle_count",
        "material_transaction_count",
        "cycle_minutes_median",
        "calculated_travel_minutes_median",
        "tons_sum",
    ],
    all_metrics_request: &[],
    feature_flags: &[
        FeatureFlag {
            flag: "include-driver-movement-durations",
            feature: "cycle_summary_include_dmd",
            help: "Enable driver movement durations",
        },
        FeatureFlag {
            flag: "use-driver-day-trip-lead-minutes",
            feature: "cycle_summary_use_driver_day_trip_lead_minutes",
            help: "Enable driver day trip lead minutes metrics",
        },
        FeatureFlag {
            flag: "beta-driver-movement-segment-durations",
            feature: "cycle_summary_beta_driver_movement_segment_durations",
            help: "Enable beta driver movement segment durations",
        },
    ],
    group_by: &[
        same("material_transaction", &["material_transaction_id"]),
        named(
            "material_type",
            &["material_type_id", "material_type_name"],
            &["material_type_name"],
        ),
        named("broker", &["broker_id", "broker_name"], &["broker_name"]),
        named("customer", &["customer_id", "customer_name"], &["customer_name"]),
        named("trucker", &["trucker_id", "trucker_name"], &["trucker_name"]),
        named("driver", &["driver_id", "driver_name"], &["driver_name"]),
        named("trailer", &["trailer_id", "trailer_number"], &["trailer_number"]),
        named(
            "job_production_plan",
            &["job_production_plan_id", "job_name", "job_number"],
            &["job_name", "job_number"],
        ),
        named("job_site", &["job_site_id", "job_site_name"], &["job_site_name"]),
        named(
            "material_supplier",
            &["material_supplier_id", "material_supplier_name"],
            &["material_supplier_name"],
        ),
        named(
            "material_site",
            &["material_site_id", "material_site_name"],
            &["material_site_name"],
        ),
        named(
            "business_unit",
            &[
                "business_unit_id",
                "business_unit_name",
                "business_unit_external_id",
            ],
            &["business_unit_name"],
        ),
        named(
            "origin",
            &[
                "origin_id",
                "origin_name",
                "origin_organization_name",
                "origin_type",
                "origin_latitude",
                "origin_longitude",
            ],
            &["origin_name"],
        ),
        named(
            "destination",
            &[
                "destination_id",
                "destination_name",
                "destination_organization_name",
                "destination_type",
                "destination_latitude",
                "destination_longitude",
            ],
            &["destination_name"],
        ),
        same("date", &["date"]),
        same("month", &["month"]),
        same("year", &["year"]),
        same("hour", &["hour"]),
    ],
};

/// Every built-in summary, in CLI order.
pub const SUMMARIES: &[SummaryDefinition] = &[
    SHIFT_SUMMARY,
    DRIVER_DAY_SUMMARY,
    MATERIAL_TRANSACTION_SUMMARY,
    LANE_SUMMARY,
];

/// Look up a summary by CLI name.
pub fn find_summary(name: &str) -> Option<&'static SummaryDefinition> {
    SUMMARIES.iter().find(|s| s.name == name)
}
