use std::collections::BTreeMap;

use super::engine::{derived_summary, project};
use super::error::StoreError;
use super::limits::edit_from_raw;
use super::types::{
    CombinedSeries, DerivedSummary, HORIZON_YEARS, NamedSeries, ParameterEdit, ParameterField,
    Scenario, ScenarioParameters, StoreMode,
};

pub const SINGLE_SCENARIO_NAME: &str = "default";

/// Seed parameters for a freshly initialized store, in presentation order.
pub fn seed_scenarios(mode: StoreMode) -> Vec<(&'static str, ScenarioParameters)> {
    match mode {
        StoreMode::Single => vec![(SINGLE_SCENARIO_NAME, ScenarioParameters::default())],
        StoreMode::Quadrant => vec![
            ("Shale", ScenarioParameters::default()),
            (
                "Luke",
                ScenarioParameters {
                    start_age: 30,
                    end_age: 58,
                    annual_contribution: 12_000.0,
                    interest_rate: 6.5,
                },
            ),
            (
                "Vaughan",
                ScenarioParameters {
                    start_age: 22,
                    end_age: 58,
                    annual_contribution: 8_000.0,
                    interest_rate: 7.5,
                },
            ),
            (
                "Jake",
                ScenarioParameters {
                    start_age: 28,
                    end_age: 58,
                    annual_contribution: 15_000.0,
                    interest_rate: 6.0,
                },
            ),
        ],
    }
}

impl Scenario {
    fn seeded(name: &str, parameters: ScenarioParameters) -> Self {
        Self {
            name: name.to_string(),
            series: project(&parameters),
            parameters,
        }
    }

    pub fn summary(&self) -> DerivedSummary {
        derived_summary(&self.parameters, &self.series)
    }
}

/// Authoritative set of scenarios for one session.
///
/// Every edit goes through [`ScenarioStore::update_parameter`], which is the
/// only place a series is recomputed.
#[derive(Debug, Clone)]
pub struct ScenarioStore {
    mode: StoreMode,
    order: Vec<String>,
    scenarios: BTreeMap<String, Scenario>,
}

impl ScenarioStore {
    pub fn initialize(mode: StoreMode) -> Self {
        let seeds = seed_scenarios(mode);
        let order = seeds.iter().map(|(name, _)| name.to_string()).collect();
        let scenarios = seeds
            .into_iter()
            .map(|(name, params)| (name.to_string(), Scenario::seeded(name, params)))
            .collect();
        tracing::debug!(?mode, "scenario store initialized");
        Self {
            mode,
            order,
            scenarios,
        }
    }

    /// Discards every edit and re-seeds the store.
    pub fn reset(&mut self, mode: StoreMode) {
        *self = Self::initialize(mode);
    }

    pub fn mode(&self) -> StoreMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn scenario(&self, id: &str) -> Result<&Scenario, StoreError> {
        self.scenarios
            .get(id)
            .ok_or_else(|| StoreError::UnknownScenario(id.to_string()))
    }

    /// Scenarios in presentation order.
    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.order.iter().filter_map(|name| self.scenarios.get(name))
    }

    pub fn summary(&self, id: &str) -> Result<DerivedSummary, StoreError> {
        self.scenario(id).map(Scenario::summary)
    }

    pub fn combined(&self) -> CombinedSeries {
        combined_series(self.scenarios())
    }

    /// Applies one field edit and republishes the scenario.
    ///
    /// Raising the start age past the end age drags the end age along.
    /// Lowering the end age below the start age is refused and leaves the
    /// scenario untouched.
    pub fn update_parameter(
        &mut self,
        id: &str,
        edit: ParameterEdit,
    ) -> Result<&Scenario, StoreError> {
        let scenario = self
            .scenarios
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownScenario(id.to_string()))?;

        let parameters = apply_edit(scenario.parameters, edit)?;
        let series = project(&parameters);
        scenario.parameters = parameters;
        scenario.series = series;

        tracing::debug!(
            scenario = id,
            field = edit.field().as_str(),
            value = edit.value(),
            final_net_worth = scenario.series.final_value(),
            "scenario updated"
        );
        Ok(&*scenario)
    }

    /// Untyped form of [`ScenarioStore::update_parameter`] for hosts that
    /// carry edits as `(field, number)` pairs. No clamping is applied.
    pub fn update_field(
        &mut self,
        id: &str,
        field: ParameterField,
        value: f64,
    ) -> Result<&Scenario, StoreError> {
        let edit = edit_from_raw(field, value)?;
        self.update_parameter(id, edit)
    }
}

fn apply_edit(
    current: ScenarioParameters,
    edit: ParameterEdit,
) -> Result<ScenarioParameters, StoreError> {
    let mut next = current;
    match edit {
        ParameterEdit::StartAge(age) => {
            next.start_age = age;
            if next.end_age < age {
                next.end_age = age;
            }
        }
        ParameterEdit::EndAge(age) => {
            if age < current.start_age {
                return Err(StoreError::InvertedWindow {
                    start_age: current.start_age,
                    end_age: age,
                });
            }
            next.end_age = age;
        }
        ParameterEdit::AnnualContribution(amount) => next.annual_contribution = amount,
        ParameterEdit::InterestRate(rate) => next.interest_rate = rate,
    }
    Ok(next)
}

/// Collects each scenario's series for an overlay view.
pub fn combined_series<'a>(scenarios: impl IntoIterator<Item = &'a Scenario>) -> CombinedSeries {
    CombinedSeries {
        years: (0..=HORIZON_YEARS).collect(),
        series: scenarios
            .into_iter()
            .map(|scenario| NamedSeries {
                name: scenario.name.clone(),
                series: scenario.series.clone(),
            })
            .collect(),
    }
}
