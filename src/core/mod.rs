mod engine;
mod error;
pub mod limits;
mod store;
mod types;

pub use engine::{derived_summary, project};
pub use error::StoreError;
pub use store::{SINGLE_SCENARIO_NAME, ScenarioStore, combined_series, seed_scenarios};
pub use types::{
    CombinedSeries, DerivedSummary, HORIZON_YEARS, NamedSeries, ParameterEdit, ParameterField,
    ProjectionSeries, SERIES_LEN, Scenario, ScenarioParameters, StoreMode,
};
