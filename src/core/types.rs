use serde::Serialize;

/// Number of simulated years after year 0.
pub const HORIZON_YEARS: u32 = 80;

/// Number of points in a series (years 0 through `HORIZON_YEARS` inclusive).
pub const SERIES_LEN: usize = HORIZON_YEARS as usize + 1;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StoreMode {
    Single,
    Quadrant,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ParameterField {
    StartAge,
    EndAge,
    AnnualContribution,
    InterestRate,
}

impl ParameterField {
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterField::StartAge => "startAge",
            ParameterField::EndAge => "endAge",
            ParameterField::AnnualContribution => "annualContribution",
            ParameterField::InterestRate => "interestRate",
        }
    }
}

/// A replacement value for one field of [`ScenarioParameters`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ParameterEdit {
    StartAge(u32),
    EndAge(u32),
    AnnualContribution(f64),
    InterestRate(f64),
}

impl ParameterEdit {
    pub fn field(self) -> ParameterField {
        match self {
            ParameterEdit::StartAge(_) => ParameterField::StartAge,
            ParameterEdit::EndAge(_) => ParameterField::EndAge,
            ParameterEdit::AnnualContribution(_) => ParameterField::AnnualContribution,
            ParameterEdit::InterestRate(_) => ParameterField::InterestRate,
        }
    }

    pub fn value(self) -> f64 {
        match self {
            ParameterEdit::StartAge(age) | ParameterEdit::EndAge(age) => f64::from(age),
            ParameterEdit::AnnualContribution(v) | ParameterEdit::InterestRate(v) => v,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioParameters {
    pub start_age: u32,
    pub end_age: u32,
    pub annual_contribution: f64,
    /// Yearly growth in percent, e.g. 7 for 7%.
    pub interest_rate: f64,
}

impl ScenarioParameters {
    pub fn contributes_in(&self, year: u32) -> bool {
        (self.start_age..=self.end_age).contains(&year)
    }
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self {
            start_age: 25,
            end_age: 58,
            annual_contribution: 10_000.0,
            interest_rate: 7.0,
        }
    }
}

/// Net worth per simulated year, indexed 0..=`HORIZON_YEARS`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionSeries {
    values: Vec<f64>,
}

impl ProjectionSeries {
    pub(crate) fn from_values(values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), SERIES_LEN);
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn at(&self, year: u32) -> Option<f64> {
        self.values.get(year as usize).copied()
    }

    pub fn final_value(&self) -> f64 {
        self.values[SERIES_LEN - 1]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedSummary {
    pub years_of_contribution: u32,
    pub total_contributions: f64,
    pub final_net_worth: f64,
    pub growth_from_interest: f64,
}

/// A named projection whose series always matches its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub(crate) name: String,
    pub(crate) parameters: ScenarioParameters,
    pub(crate) series: ProjectionSeries,
}

impl Scenario {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &ScenarioParameters {
        &self.parameters
    }

    pub fn series(&self) -> &ProjectionSeries {
        &self.series
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSeries {
    pub name: String,
    pub series: ProjectionSeries,
}

/// Overlay of several scenarios' series, in presentation order.
///
/// Acts as a name-to-series mapping: names are unique because the store
/// keys its scenarios by name in a `BTreeMap`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedSeries {
    pub years: Vec<u32>,
    pub series: Vec<NamedSeries>,
}

impl CombinedSeries {
    pub fn get(&self, name: &str) -> Option<&ProjectionSeries> {
        self.series
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.series)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
