//! Ratio Calculator
//!
//! Liquidity ratios come from balance-sheet periods. Profitability, efficiency
//! and leverage ratios walk income-statement periods and join the balance
//! sheet by identical period label; without a match, ratios that need the
//! balance sheet are simply not produced for that period.

use filing_core::stats::safe_ratio;
use filing_core::{
    AnalysisError, PeriodOutcome, Ratio, RatioFamily, RatioName, RatioReport, Statement,
    StatementPeriod, StatementSet,
};

/// All four ratio families for a statement set.
pub fn calculate_ratios(statements: &StatementSet) -> RatioReport {
    let mut report = liquidity_ratios(&statements.balance_sheet);
    for family in [
        profitability_ratios(&statements.income_statement, &statements.balance_sheet),
        efficiency_ratios(&statements.income_statement, &statements.balance_sheet),
        leverage_ratios(&statements.income_statement, &statements.balance_sheet),
    ] {
        report.periods.extend(family.periods);
    }
    report
}

/// Current, quick and cash ratio per balance-sheet period.
pub fn liquidity_ratios(balance_sheet: &Statement) -> RatioReport {
    let mut report = RatioReport::default();
    for bs in balance_sheet.periods() {
        let outcome = compute_period(RatioFamily::Liquidity, &bs.label, &[bs], || {
            let current_assets = bs.get("total_current_assets");
            let current_liabilities = bs.get("total_current_liabilities");
            let quick_assets = current_assets
                .zip(bs.get("inventory"))
                .map(|(assets, inventory)| assets - inventory);
            // Marketable securities are an optional addend; cash is required.
            let cash = bs
                .get("cash_and_cash_equivalents")
                .map(|cash| cash + bs.get("marketable_securities").unwrap_or(0.0));

            vec![
                ratio(RatioName::CurrentRatio, &bs.label, current_assets, current_liabilities),
                ratio(RatioName::QuickRatio, &bs.label, quick_assets, current_liabilities),
                ratio(RatioName::CashRatio, &bs.label, cash, current_liabilities),
            ]
        });
        report.push(RatioFamily::Liquidity, &bs.label, outcome);
    }
    report
}

/// Gross, operating and net margin per income-statement period, plus ROA and
/// ROE where the balance sheet has the same period.
pub fn profitability_ratios(income_statement: &Statement, balance_sheet: &Statement) -> RatioReport {
    let mut report = RatioReport::default();
    for is in income_statement.periods() {
        let bs = balance_sheet.period(&is.label);
        let inputs: Vec<&StatementPeriod> = std::iter::once(is).chain(bs).collect();
        let outcome = compute_period(RatioFamily::Profitability, &is.label, &inputs, || {
            let revenue = is.get("revenue");
            let net_income = is.get("net_income");

            let mut ratios = vec![
                ratio(RatioName::GrossMargin, &is.label, gross_profit(is), revenue),
                ratio(RatioName::OperatingMargin, &is.label, is.get("operating_income"), revenue),
                ratio(RatioName::NetMargin, &is.label, net_income, revenue),
            ];
            if let Some(bs) = bs {
                ratios.push(ratio(RatioName::Roa, &is.label, net_income, bs.get("total_assets")));
                ratios.push(ratio(RatioName::Roe, &is.label, net_income, bs.get("total_equity")));
            }
            ratios
        });
        report.push(RatioFamily::Profitability, &is.label, outcome);
    }
    report
}

/// Asset, inventory and receivables turnover. Needs both statements, so
/// periods without a balance-sheet match produce nothing.
pub fn efficiency_ratios(income_statement: &Statement, balance_sheet: &Statement) -> RatioReport {
    let mut report = RatioReport::default();
    for is in income_statement.periods() {
        let Some(bs) = balance_sheet.period(&is.label) else {
            tracing::debug!("No balance sheet for {}, skipping efficiency ratios", is.label);
            continue;
        };
        let outcome = compute_period(RatioFamily::Efficiency, &is.label, &[is, bs], || {
            let revenue = is.get("revenue");
            vec![
                ratio(RatioName::AssetTurnover, &is.label, revenue, bs.get("total_assets")),
                ratio(
                    RatioName::InventoryTurnover,
                    &is.label,
                    is.get("cost_of_goods_sold"),
                    bs.get("inventory"),
                ),
                ratio(
                    RatioName::ReceivablesTurnover,
                    &is.label,
                    revenue,
                    bs.get("accounts_receivable"),
                ),
            ]
        });
        report.push(RatioFamily::Efficiency, &is.label, outcome);
    }
    report
}

/// Debt-to-equity and debt-to-assets (balance-sheet match required) and
/// interest coverage (income statement only).
pub fn leverage_ratios(income_statement: &Statement, balance_sheet: &Statement) -> RatioReport {
    let mut report = RatioReport::default();
    for is in income_statement.periods() {
        let bs = balance_sheet.period(&is.label);
        let inputs: Vec<&StatementPeriod> = std::iter::once(is).chain(bs).collect();
        let outcome = compute_period(RatioFamily::Leverage, &is.label, &inputs, || {
            let mut ratios = Vec::with_capacity(3);
            if let Some(bs) = bs {
                let liabilities = bs.get("total_liabilities");
                ratios.push(ratio(RatioName::DebtToEquity, &is.label, liabilities, bs.get("total_equity")));
                ratios.push(ratio(RatioName::DebtToAssets, &is.label, liabilities, bs.get("total_assets")));
            }
            ratios.push(ratio(
                RatioName::InterestCoverage,
                &is.label,
                is.get("operating_income"),
                is.get("interest_expense"),
            ));
            ratios
        });
        report.push(RatioFamily::Leverage, &is.label, outcome);
    }
    report
}

/// Reported gross profit, else revenue minus cost of goods sold.
fn gross_profit(is: &StatementPeriod) -> Option<f64> {
    is.get("gross_profit").or_else(|| {
        is.get("revenue")
            .zip(is.get("cost_of_goods_sold"))
            .map(|(revenue, cogs)| revenue - cogs)
    })
}

/// Runs one family's computation for one period, or skips the period when its
/// inputs hold non-finite numbers.
fn compute_period<F>(
    family: RatioFamily,
    label: &str,
    inputs: &[&StatementPeriod],
    compute: F,
) -> PeriodOutcome
where
    F: FnOnce() -> Vec<Ratio>,
{
    let bad: Vec<&str> = inputs.iter().flat_map(|p| p.non_finite_items()).collect();
    if !bad.is_empty() {
        let err = AnalysisError::ComputationFailure(format!(
            "non-finite line items: {}",
            bad.join(", ")
        ));
        tracing::warn!("Skipping {:?} ratios for {}: {}", family, label, err);
        return PeriodOutcome::Skipped {
            reason: err.to_string(),
        };
    }
    PeriodOutcome::Computed { ratios: compute() }
}

fn ratio(name: RatioName, period: &str, numerator: Option<f64>, denominator: Option<f64>) -> Ratio {
    let value = match (numerator, denominator) {
        (Some(n), Some(d)) => {
            let value = safe_ratio(n, d);
            if value.is_none() {
                tracing::debug!("Zero denominator for {} in {}", name, period);
            }
            value
        }
        _ => {
            let err = AnalysisError::MissingData(format!("{} in {}", name, period));
            tracing::warn!("{}", err);
            None
        }
    };
    Ratio {
        name,
        period: period.to_string(),
        value,
    }
}
