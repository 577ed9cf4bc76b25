use super::types::{
    DerivedSummary, HORIZON_YEARS, ProjectionSeries, SERIES_LEN, ScenarioParameters,
};

/// Projects net worth for years 0..=`HORIZON_YEARS`.
///
/// Each year the prior balance grows by `interest_rate` percent first, then
/// the year's contribution is added when the year falls inside
/// `[start_age, end_age]`. A contribution therefore starts compounding the
/// year after it is made. Inputs are never rejected; non-finite values
/// propagate through the recurrence.
pub fn project(params: &ScenarioParameters) -> ProjectionSeries {
    let growth = growth_factor(params.interest_rate);
    let mut values = Vec::with_capacity(SERIES_LEN);
    let mut net_worth = 0.0;
    values.push(net_worth);

    for year in 1..=HORIZON_YEARS {
        net_worth *= growth;
        if params.contributes_in(year) {
            net_worth += params.annual_contribution;
        }
        values.push(net_worth);
    }

    ProjectionSeries::from_values(values)
}

pub fn derived_summary(params: &ScenarioParameters, series: &ProjectionSeries) -> DerivedSummary {
    let years_of_contribution = contribution_years(params);
    let total_contributions = f64::from(years_of_contribution) * params.annual_contribution;
    let final_net_worth = series.final_value();
    DerivedSummary {
        years_of_contribution,
        total_contributions,
        final_net_worth,
        growth_from_interest: final_net_worth - total_contributions,
    }
}

fn growth_factor(interest_rate: f64) -> f64 {
    1.0 + interest_rate / 100.0
}

// Inclusive window length; an inverted window counts as zero years.
fn contribution_years(params: &ScenarioParameters) -> u32 {
    params.end_age.saturating_add(1).saturating_sub(params.start_age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_params() -> ScenarioParameters {
        ScenarioParameters {
            start_age: 25,
            end_age: 58,
            annual_contribution: 10_000.0,
            interest_rate: 7.0,
        }
    }

    #[test]
    fn project_has_horizon_plus_one_points_starting_at_zero() {
        let series = project(&sample_params());
        assert_eq!(series.len(), 81);
        assert_eq!(series.values()[0], 0.0);
        assert_eq!(series.at(80), Some(series.final_value()));
        assert_eq!(series.at(81), None);
    }

    #[test]
    fn project_first_contribution_lands_without_growth() {
        let params = ScenarioParameters {
            start_age: 1,
            ..sample_params()
        };
        let series = project(&params);
        assert_eq!(series.values()[1], 10_000.0);
        assert_approx(series.values()[2], 20_700.0);
    }

    #[test]
    fn project_is_zero_before_contribution_window() {
        let series = project(&sample_params());
        for year in 0..25 {
            assert_eq!(series.values()[year], 0.0, "year {year}");
        }
        assert_eq!(series.values()[25], 10_000.0);
        assert_approx(series.values()[26], 20_700.0);
    }

    #[test]
    fn project_last_contribution_year_is_followed_by_growth_only() {
        let series = project(&sample_params());
        let values = series.values();
        let growth = 1.0 + 7.0 / 100.0;
        assert_eq!(values[59], values[58] * growth);
        assert_eq!(values[58], values[57] * growth + 10_000.0);
    }

    #[test]
    fn project_matches_closed_form_annuity() {
        let series = project(&sample_params());
        // 34 contributions of 10k at 7%, then 22 years of growth only.
        let n = 34.0;
        let at_58 = 10_000.0 * (1.07f64.powf(n) - 1.0) / 0.07;
        let expected = at_58 * 1.07f64.powi(22);
        let rel = (series.final_value() - expected).abs() / expected;
        assert!(rel < 1e-9, "relative error {rel}");
    }

    #[test]
    fn project_with_zero_rate_sums_contributions() {
        let params = ScenarioParameters {
            interest_rate: 0.0,
            ..sample_params()
        };
        let series = project(&params);
        assert_eq!(series.final_value(), 340_000.0);
    }

    #[test]
    fn project_window_beyond_horizon_is_clipped() {
        let params = ScenarioParameters {
            start_age: 79,
            end_age: 120,
            annual_contribution: 1_000.0,
            interest_rate: 10.0,
        };
        let series = project(&params);
        assert_eq!(series.values()[79], 1_000.0);
        assert_approx(series.final_value(), 2_100.0);
    }

    #[test]
    fn project_inverted_window_never_contributes() {
        let params = ScenarioParameters {
            start_age: 40,
            end_age: 30,
            ..sample_params()
        };
        let series = project(&params);
        assert!(series.values().iter().all(|v| *v == 0.0));
        assert_eq!(derived_summary(&params, &series).years_of_contribution, 0);
    }

    #[test]
    fn project_negative_rate_decays_balance() {
        let params = ScenarioParameters {
            start_age: 1,
            end_age: 1,
            annual_contribution: 100.0,
            interest_rate: -50.0,
        };
        let series = project(&params);
        assert_eq!(series.values()[1], 100.0);
        assert_eq!(series.values()[2], 50.0);
        assert_eq!(series.values()[3], 25.0);
    }

    #[test]
    fn project_nan_contribution_poisons_series_from_window_start() {
        let params = ScenarioParameters {
            annual_contribution: f64::NAN,
            ..sample_params()
        };
        let series = project(&params);
        assert_eq!(series.values()[24], 0.0);
        assert!(series.values()[25..].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn project_nan_rate_poisons_series_after_year_zero() {
        let params = ScenarioParameters {
            interest_rate: f64::NAN,
            ..sample_params()
        };
        let series = project(&params);
        assert_eq!(series.values()[0], 0.0);
        assert!(series.values()[1..].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn derived_summary_for_default_parameters() {
        let params = sample_params();
        let series = project(&params);
        let summary = derived_summary(&params, &series);
        assert_eq!(summary.years_of_contribution, 34);
        assert_approx(summary.total_contributions, 340_000.0);
        assert_eq!(summary.final_net_worth, series.values()[80]);
        assert_eq!(
            summary.growth_from_interest,
            series.values()[80] - 340_000.0
        );
        assert!(summary.growth_from_interest > 0.0);
    }

    #[test]
    fn derived_summary_single_year_window() {
        let params = ScenarioParameters {
            start_age: 80,
            end_age: 80,
            annual_contribution: 5_000.0,
            interest_rate: 7.0,
        };
        let series = project(&params);
        let summary = derived_summary(&params, &series);
        assert_eq!(summary.years_of_contribution, 1);
        assert_eq!(summary.final_net_worth, 5_000.0);
        assert_eq!(summary.growth_from_interest, 0.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_series_shape_and_origin(
            start_age in 0u32..100,
            span in 0u32..100,
            contribution in 0u32..1_000_000,
            rate_bp in -5_000i32..5_000
        ) {
            let params = ScenarioParameters {
                start_age,
                end_age: start_age + span,
                annual_contribution: contribution as f64,
                interest_rate: rate_bp as f64 / 100.0,
            };
            let series = project(&params);
            prop_assert_eq!(series.len(), SERIES_LEN);
            prop_assert_eq!(series.values()[0], 0.0);
        }

        #[test]
        fn prop_positive_rate_is_non_decreasing(
            start_age in 0u32..85,
            span in 0u32..85,
            contribution in 0u32..1_000_000,
            rate_bp in 1u32..10_000
        ) {
            let params = ScenarioParameters {
                start_age,
                end_age: start_age + span,
                annual_contribution: contribution as f64,
                interest_rate: rate_bp as f64 / 100.0,
            };
            let series = project(&params);
            for pair in series.values().windows(2) {
                prop_assert!(pair[1] >= pair[0], "{} < {}", pair[1], pair[0]);
            }
        }

        #[test]
        fn prop_outside_window_is_growth_only(
            start_age in 0u32..85,
            span in 0u32..85,
            contribution in 0u32..1_000_000,
            rate_bp in 0u32..1_500
        ) {
            let params = ScenarioParameters {
                start_age,
                end_age: start_age + span,
                annual_contribution: contribution as f64,
                interest_rate: rate_bp as f64 / 100.0,
            };
            let series = project(&params);
            let values = series.values();
            let growth = 1.0 + params.interest_rate / 100.0;
            for year in 1..=HORIZON_YEARS {
                let idx = year as usize;
                if params.contributes_in(year) {
                    prop_assert_eq!(values[idx], values[idx - 1] * growth + params.annual_contribution);
                } else {
                    prop_assert_eq!(values[idx], values[idx - 1] * growth);
                }
            }
        }

        #[test]
        fn prop_project_is_idempotent(
            start_age in 0u32..85,
            span in 0u32..85,
            contribution in 0u32..1_000_000,
            rate_bp in -1_000i32..2_000
        ) {
            let params = ScenarioParameters {
                start_age,
                end_age: start_age + span,
                annual_contribution: contribution as f64,
                interest_rate: rate_bp as f64 / 100.0,
            };
            prop_assert_eq!(project(&params), project(&params));
        }

        #[test]
        fn prop_summary_growth_is_final_minus_contributions(
            start_age in 0u32..85,
            span in 0u32..85,
            contribution in 0u32..100_000,
            rate_bp in 0u32..1_500
        ) {
            let params = ScenarioParameters {
                start_age,
                end_age: start_age + span,
                annual_contribution: contribution as f64,
                interest_rate: rate_bp as f64 / 100.0,
            };
            let series = project(&params);
            let summary = derived_summary(&params, &series);
            prop_assert_eq!(summary.years_of_contribution, span + 1);
            prop_assert_eq!(summary.final_net_worth, series.values()[80]);
            prop_assert_eq!(
                summary.growth_from_interest,
                summary.final_net_worth - summary.total_contributions
            );
        }
    }
}
