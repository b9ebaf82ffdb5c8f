//! CLI definition and dispatch.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::TimeDelta;
use clap::{Parser, Subcommand};

use crate::adapters::binance_file_adapter::BinanceFileAdapter;
use crate::adapters::csv_file_adapter::CsvFileAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{validate_data_config, validate_strategy_config};
use crate::domain::engine::{StrategyEngine, StrategyParams};
use crate::domain::error::DcaError;
use crate::domain::money::Money;
use crate::domain::quote::Quote;
use crate::domain::transaction::Transaction;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::{ActionRow, ReportPort};
use crate::ports::stream_port::StreamPort;

#[derive(Parser, Debug)]
#[command(name = "dcabot", about = "Dollar-cost-averaging strategy simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a quote file through the strategy
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        /// Quote file; overrides [data] path from the config
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Quote file format (binance or csv); overrides [data] source
        #[arg(long)]
        source: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the derived strategy limits
    Params {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            config,
            data,
            source,
        } => run_simulate(&config, data.as_ref(), source.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Params { config } => run_params(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = DcaError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Build strategy parameters from a validated `[strategy]` section.
pub fn build_strategy_params(config: &dyn ConfigPort) -> StrategyParams {
    let currency = config
        .get_string("strategy", "currency")
        .unwrap_or_else(|| "USD".to_string());
    StrategyParams {
        symbol: config.get_string("strategy", "symbol").unwrap_or_default(),
        target_value: Money::from_major(
            config.get_double("strategy", "target_value", 0.0),
            &currency,
        ),
        single_buy_limit_perc: config.get_double("strategy", "single_buy_limit_perc", 0.10),
        single_sell_limit_perc: config.get_double("strategy", "single_sell_limit_perc", 0.10),
        total_buy_limit_perc: config.get_double("strategy", "total_buy_limit_perc", 200.0),
        min_profit_perc: config.get_double("strategy", "min_profit_perc", 200.0),
        min_transaction_span: TimeDelta::hours(config.get_int(
            "strategy",
            "min_transaction_span_hours",
            96,
        )),
        currency,
    }
}

fn build_stream(
    config: &dyn ConfigPort,
    params: &StrategyParams,
    data_override: Option<&PathBuf>,
    source_override: Option<&str>,
) -> Result<Box<dyn StreamPort>, DcaError> {
    let path = match data_override {
        Some(p) => p.clone(),
        None => config
            .get_string("data", "path")
            .map(PathBuf::from)
            .ok_or_else(|| DcaError::ConfigMissing {
                section: "data".to_string(),
                key: "path".to_string(),
            })?,
    };
    let source = source_override
        .map(str::to_string)
        .or_else(|| config.get_string("data", "source"))
        .unwrap_or_else(|| "binance".to_string());

    match source.as_str() {
        "binance" => Ok(Box::new(BinanceFileAdapter::new(
            path,
            &params.symbol,
            &params.currency,
        ))),
        "csv" => Ok(Box::new(CsvFileAdapter::new(
            path,
            &params.symbol,
            &params.currency,
        ))),
        other => Err(DcaError::ConfigInvalid {
            section: "data".to_string(),
            key: "source".to_string(),
            reason: format!("unknown source {other:?}, expected binance or csv"),
        }),
    }
}

/// Drive the engine over a quote stream, reporting one row per action.
///
/// Budget exhaustion only skips the buy at hand; the run continues so that
/// later sells can still fire. Every other error halts the stream.
pub fn run_simulation(
    engine: &mut StrategyEngine,
    stream: &dyn StreamPort,
    report: &mut dyn ReportPort,
) -> Result<(), DcaError> {
    stream.stream(&mut |quote| match engine.process(quote) {
        Ok(Some(tx)) => {
            let row = action_row(engine, quote, &tx)?;
            report.write_action(&row)
        }
        Ok(None) => Ok(()),
        Err(e @ DcaError::InsufficientBudget { .. }) => {
            log::warn!("{e}");
            Ok(())
        }
        Err(e) => Err(e),
    })
}

fn action_row(
    engine: &StrategyEngine,
    quote: &dyn Quote,
    tx: &Transaction,
) -> Result<ActionRow, DcaError> {
    let price = quote.price();
    let position = engine.position();
    Ok(ActionRow {
        date: quote.time().to_string(),
        price: price.as_major_units(),
        transaction_amount: tx.amount,
        transaction_value: tx.value.as_major_units(),
        asset_amount: position.asset_amount,
        asset_value: engine.asset_value(&price).as_major_units(),
        cash: position.cash.as_major_units(),
        total_value: engine.total_value(&price)?.as_major_units(),
        roi: engine.roi(&price)?.as_major_units(),
        roi_perc: engine.roi_perc(&price)?,
        num_buys: position.buy_count,
        amount_bought: position.buy_amount,
        value_bought: position.buy_value.as_major_units(),
        num_sells: position.sell_count,
        amount_sold: position.sell_amount,
        value_sold: position.sell_value.as_major_units(),
    })
}

fn run_simulate(
    config_path: &PathBuf,
    data_override: Option<&PathBuf>,
    source_override: Option<&str>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if data_override.is_none() {
        if let Err(e) = validate_data_config(&adapter) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    let params = build_strategy_params(&adapter);
    let stream = match build_stream(&adapter, &params, data_override, source_override) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut engine = StrategyEngine::new(params);
    let mut report = CsvReportAdapter::new(std::io::stdout());
    if let Err(e) = run_simulation(&mut engine, stream.as_ref(), &mut report) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    print_summary(&engine);
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    for check in [validate_strategy_config(&adapter), validate_data_config(&adapter)] {
        if let Err(e) = check {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }
    eprintln!("{} is valid", config_path.display());
    ExitCode::SUCCESS
}

fn run_params(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    print_summary(&StrategyEngine::new(build_strategy_params(&adapter)));
    ExitCode::SUCCESS
}

fn print_summary(engine: &StrategyEngine) {
    let params = engine.params();
    let position = engine.position();

    eprintln!();
    eprintln!("Target Value: {}", params.target_value);
    eprintln!("Min Profit: {}", engine.min_profit());
    if let Ok(v) = engine.min_sell_value() {
        eprintln!("Min Sell Value: {v}");
    }
    eprintln!("Total Buy Limit: {}", engine.total_buy_limit());
    eprintln!("Single Buy Limit: {}", engine.single_buy_limit());
    eprintln!("Single Sell Limit: {}", engine.single_sell_limit());
    eprintln!("Bought Value: {}", position.bought_value);
    eprintln!();
    eprintln!("{} amount: {:.2}", params.symbol, position.asset_amount);
    if let Some(last) = position.last_acted_quote.as_ref() {
        eprintln!("Asset Value: {}", engine.asset_value(&last.price));
        eprintln!("Cash: {}", position.cash);
        if let Ok(total) = engine.total_value(&last.price) {
            eprintln!("Total Value: {total}");
        }
        if let Ok(roi) = engine.roi(&last.price) {
            eprintln!("ROI: {roi}");
        }
        if let Ok(perc) = engine.roi_perc(&last.price) {
            eprintln!("ROI%: {:.2}%", perc * 100.0);
        }
    }
    eprintln!(
        "Transactions: {} ({} buys, {} sells)",
        position.buy_count + position.sell_count,
        position.buy_count,
        position.sell_count
    );
    eprintln!(
        "Bought: {:.4} units for {}",
        position.buy_amount, position.buy_value
    );
    eprintln!(
        "Sold: {:.4} units for {}",
        position.sell_amount, position.sell_value
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn build_params_reads_strategy_section() {
        let a = adapter(
            r#"
[strategy]
symbol = SOL
currency = USD
target_value = 1000
single_buy_limit_perc = 0.10
single_sell_limit_perc = 0.10
total_buy_limit_perc = 200
min_profit_perc = 200
min_transaction_span_hours = 96
"#,
        );
        let params = build_strategy_params(&a);
        assert_eq!(params.symbol, "SOL");
        assert_eq!(params.currency, "USD");
        assert_eq!(params.target_value, Money::new(100_000, "USD"));
        assert_eq!(params.total_buy_limit_perc, 200.0);
        assert_eq!(params.min_transaction_span, TimeDelta::hours(96));
    }

    #[test]
    fn build_params_applies_defaults() {
        let a = adapter("[strategy]\nsymbol = SOL\ntarget_value = 1000\n");
        let params = build_strategy_params(&a);
        assert_eq!(params.currency, "USD");
        assert_eq!(params.single_buy_limit_perc, 0.10);
        assert_eq!(params.single_sell_limit_perc, 0.10);
        assert_eq!(params.total_buy_limit_perc, 200.0);
        assert_eq!(params.min_profit_perc, 200.0);
        assert_eq!(params.min_transaction_span, TimeDelta::hours(96));
    }

    #[test]
    fn build_stream_rejects_unknown_source() {
        let a = adapter("[data]\nsource = ftp\npath = x\n");
        let params = build_strategy_params(&a);
        assert!(matches!(
            build_stream(&a, &params, None, None),
            Err(DcaError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn build_stream_requires_a_path() {
        let a = adapter("[data]\nsource = binance\n");
        let params = build_strategy_params(&a);
        assert!(matches!(
            build_stream(&a, &params, None, None),
            Err(DcaError::ConfigMissing { .. })
        ));
    }
}
