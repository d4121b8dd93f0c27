use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "helios", author, version, about = "Off-grid solar datacenter LCOE calculator", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve the LCOE for one site and sizing
    Lcoe(LcoeArgs),
    /// Sweep a sizing grid and reduce to the Pareto frontier
    Ensemble(EnsembleArgs),
}

/// Arguments for a single-case solve.
///
/// The hourly simulation needs a normalized PV profile (`--pv-profile`);
/// alternatively a pre-baked simulation trace (`--simulation-data` plus
/// `--location`) bypasses the dispatch engine entirely.
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["pv_profile", "simulation_data"]),
))]
pub struct LcoeArgs {
    /// Latitude of the datacenter, decimal degrees
    #[arg(long)]
    pub lat: f64,
    /// Longitude of the datacenter, decimal degrees
    #[arg(long = "long", allow_hyphen_values = true)]
    pub longitude: f64,

    /// Solar PV capacity in MW-DC
    #[arg(long)]
    pub solar_mw: f64,
    /// BESS power capacity in MW (4h storage)
    #[arg(long)]
    pub bess_mw: f64,
    /// Generator capacity in MW
    #[arg(long)]
    pub generator_mw: f64,
    /// Datacenter load in MW
    #[arg(long, default_value_t = 100.0)]
    pub load_mw: f64,
    /// Generator technology: gas-engine or gas-turbine
    #[arg(long, default_value = "gas-engine")]
    pub generator_type: String,
    /// BESS hours of storage
    #[arg(long, default_value_t = 4.0)]
    pub bess_hrs_storage: f64,
    /// Battery charge at the start of each operating year, MWh
    #[arg(long)]
    pub initial_soc_mwh: Option<f64>,

    /// Normalized PV profile CSV (8760 hourly values per MW-DC)
    #[arg(long)]
    pub pv_profile: Option<PathBuf>,
    /// Pre-baked simulation trace CSV; bypasses the dispatch engine
    #[arg(long, requires = "location")]
    pub simulation_data: Option<PathBuf>,
    /// Location name to select in the simulation trace
    #[arg(long, requires = "simulation_data")]
    pub location: Option<String>,

    /// Write the solved pro-forma as JSON to this path
    #[arg(long)]
    pub proforma_out: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

/// Optional overrides for every rate and assumption, kebab-case mirrors of
/// the config fields. Unset flags keep the documented defaults.
#[derive(Args, Debug, Default)]
pub struct ConfigOverrides {
    // Solar PV CAPEX, $/W
    #[arg(long, help_heading = "Solar CAPEX ($/W)")]
    pub pv_modules: Option<f64>,
    #[arg(long, help_heading = "Solar CAPEX ($/W)")]
    pub pv_inverters: Option<f64>,
    #[arg(long, help_heading = "Solar CAPEX ($/W)")]
    pub pv_racking: Option<f64>,
    #[arg(long, help_heading = "Solar CAPEX ($/W)")]
    pub pv_balance_of_system: Option<f64>,
    #[arg(long, help_heading = "Solar CAPEX ($/W)")]
    pub pv_labor: Option<f64>,

    // BESS CAPEX, $/kWh
    #[arg(long, help_heading = "BESS CAPEX ($/kWh)")]
    pub bess_units: Option<f64>,
    #[arg(long, help_heading = "BESS CAPEX ($/kWh)")]
    pub bess_balance_of_system: Option<f64>,
    #[arg(long, help_heading = "BESS CAPEX ($/kWh)")]
    pub bess_labor: Option<f64>,

    // Generator CAPEX, $/kW
    #[arg(long, help_heading = "Generator CAPEX ($/kW)")]
    pub gensets: Option<f64>,
    #[arg(long, help_heading = "Generator CAPEX ($/kW)")]
    pub gen_balance_of_system: Option<f64>,
    #[arg(long, help_heading = "Generator CAPEX ($/kW)")]
    pub gen_labor: Option<f64>,

    // System integration CAPEX, $/kW of load
    #[arg(long, help_heading = "System Integration CAPEX ($/kW)")]
    pub si_microgrid: Option<f64>,
    #[arg(long, help_heading = "System Integration CAPEX ($/kW)")]
    pub si_controls: Option<f64>,
    #[arg(long, help_heading = "System Integration CAPEX ($/kW)")]
    pub si_labor: Option<f64>,

    // Soft costs, % of hard CAPEX
    #[arg(long, help_heading = "Soft Costs (%)")]
    pub soft_costs_general_conditions: Option<f64>,
    #[arg(long, help_heading = "Soft Costs (%)")]
    pub soft_costs_epc_overhead: Option<f64>,
    #[arg(long, help_heading = "Soft Costs (%)")]
    pub soft_costs_design_engineering: Option<f64>,
    #[arg(long, help_heading = "Soft Costs (%)")]
    pub soft_costs_permitting: Option<f64>,
    #[arg(long, help_heading = "Soft Costs (%)")]
    pub soft_costs_startup: Option<f64>,
    #[arg(long, help_heading = "Soft Costs (%)")]
    pub soft_costs_insurance: Option<f64>,
    #[arg(long, help_heading = "Soft Costs (%)")]
    pub soft_costs_taxes: Option<f64>,

    // O&M
    #[arg(long, help_heading = "O&M")]
    pub fuel_price_dollar_per_mmbtu: Option<f64>,
    #[arg(long, help_heading = "O&M")]
    pub fuel_escalator_pct: Option<f64>,
    #[arg(long, help_heading = "O&M")]
    pub om_solar_fixed_dollar_per_kw: Option<f64>,
    #[arg(long, help_heading = "O&M")]
    pub om_bess_fixed_dollar_per_kw: Option<f64>,
    #[arg(long, help_heading = "O&M")]
    pub om_bos_fixed_dollar_per_kw_load: Option<f64>,
    #[arg(long, help_heading = "O&M")]
    pub om_generator_fixed_dollar_per_kw: Option<f64>,
    #[arg(long, help_heading = "O&M")]
    pub om_generator_variable_dollar_per_kwh: Option<f64>,
    #[arg(long, help_heading = "O&M")]
    pub om_soft_pct: Option<f64>,
    #[arg(long, help_heading = "O&M")]
    pub om_escalator_pct: Option<f64>,

    // Financing and tax
    #[arg(long, help_heading = "Financial")]
    pub cost_of_debt_pct: Option<f64>,
    #[arg(long, help_heading = "Financial")]
    pub cost_of_equity_pct: Option<f64>,
    #[arg(long, help_heading = "Financial")]
    pub leverage_pct: Option<f64>,
    #[arg(long, help_heading = "Financial")]
    pub debt_term_years: Option<usize>,
    #[arg(long, help_heading = "Financial")]
    pub combined_tax_rate_pct: Option<f64>,
    #[arg(long, help_heading = "Financial")]
    pub investment_tax_credit_pct: Option<f64>,
    #[arg(long, help_heading = "Financial")]
    pub construction_time_years: Option<usize>,
    /// Depreciation schedule, 20 space-separated percentages
    #[arg(long, num_args = 1.., help_heading = "Financial")]
    pub depreciation_schedule: Option<Vec<f64>>,
}

/// Arguments for an ensemble sweep at one site.
///
/// The sweep comes either from the capacity-list flags or from a YAML/JSON
/// spec file (`--spec`); the PV profile is required either way.
#[derive(Args, Debug)]
pub struct EnsembleArgs {
    /// Ensemble spec file (YAML or JSON); replaces the site and sweep flags
    #[arg(
        long,
        conflicts_with_all = ["lat", "longitude", "solar_mw", "bess_mw", "generator_mw", "load_mw", "generator_type", "threads"]
    )]
    pub spec: Option<PathBuf>,

    /// Latitude of the datacenter, decimal degrees
    #[arg(long, required_unless_present = "spec")]
    pub lat: Option<f64>,
    /// Longitude of the datacenter, decimal degrees
    #[arg(long = "long", required_unless_present = "spec", allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    /// Solar PV capacities to sweep, MW-DC (comma-separated)
    #[arg(long, value_delimiter = ',', required_unless_present = "spec")]
    pub solar_mw: Vec<f64>,
    /// BESS power capacities to sweep, MW (comma-separated)
    #[arg(long, value_delimiter = ',', required_unless_present = "spec")]
    pub bess_mw: Vec<f64>,
    /// Generator capacities to sweep, MW (comma-separated)
    #[arg(long, value_delimiter = ',', required_unless_present = "spec")]
    pub generator_mw: Vec<f64>,
    /// Datacenter load in MW (fixed across the sweep)
    #[arg(long, default_value_t = 100.0)]
    pub load_mw: f64,
    /// Generator technology: gas-engine or gas-turbine
    #[arg(long, default_value = "gas-engine")]
    pub generator_type: String,

    /// Normalized PV profile CSV (8760 hourly values per MW-DC)
    #[arg(long)]
    pub pv_profile: PathBuf,

    /// Concurrently running cases; 0 means one per CPU
    #[arg(long, default_value_t = helios_batch::DEFAULT_CONCURRENCY)]
    pub threads: usize,
    /// Directory for the raw and Pareto CSV reports
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
}
