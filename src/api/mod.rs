use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    BreakdownChart, CalculatorSession, GrowthChart, InputFields, Projection, ProjectionResult,
    SipInputs, YearlyRecord, breakdown_chart, format_inr, format_lakhs, growth_chart, project,
    round_currency,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

/// Longest horizon accepted from the outside.
pub const MAX_YEARS: u32 = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    #[serde(alias = "amount", alias = "monthly_amount")]
    monthly_amount: Option<f64>,
    years: Option<u32>,
    #[serde(
        alias = "annualReturnPercent",
        alias = "annualReturn",
        alias = "expected_return"
    )]
    expected_return: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "sip",
    about = "SIP calculator: projected returns for a fixed monthly investment"
)]
pub struct Cli {
    #[arg(
        long,
        default_value_t = 5000.0,
        help = "Amount invested at the start of every month"
    )]
    monthly_amount: f64,
    #[arg(long, default_value_t = 10, help = "Investment period in years")]
    years: u32,
    #[arg(
        long,
        default_value_t = 12.0,
        allow_negative_numbers = true,
        help = "Expected annual return in percent, e.g. 12"
    )]
    expected_return: f64,
    #[arg(long, help = "Print the API JSON response instead of a table")]
    json: bool,
    #[arg(
        long,
        conflicts_with = "json",
        help = "Edit inputs line by line and recompute on every change"
    )]
    interactive: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormattedYear {
    year: u32,
    invested: String,
    value: String,
    gains: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormattedFigures {
    total_invested: String,
    future_value: String,
    total_gains: String,
    yearly: Vec<FormattedYear>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    inputs: SipInputs,
    result: ProjectionResult,
    yearly: Vec<YearlyRecord>,
    growth_chart: GrowthChart,
    breakdown_chart: BreakdownChart,
    formatted: FormattedFigures,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

fn build_inputs(cli: &Cli) -> Result<SipInputs, String> {
    let inputs = SipInputs {
        monthly_amount: cli.monthly_amount,
        years: cli.years,
        annual_return_percent: cli.expected_return,
    };
    validate_inputs(&inputs)?;
    Ok(inputs)
}

/// Bounds shared by every surface, checked before the engine sees the inputs.
fn validate_inputs(inputs: &SipInputs) -> Result<(), String> {
    if !inputs.monthly_amount.is_finite() || inputs.monthly_amount < 0.0 {
        return Err("--monthly-amount must be >= 0".to_string());
    }

    if inputs.years == 0 || inputs.years > MAX_YEARS {
        return Err(format!("--years must be between 1 and {MAX_YEARS}"));
    }

    if !inputs.annual_return_percent.is_finite() || inputs.annual_return_percent <= -100.0 {
        return Err("--expected-return must be > -100".to_string());
    }

    Ok(())
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/health", get(health_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "SIP calculator listening");
    info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app()).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

fn project_handler_impl(payload: ProjectPayload) -> Response {
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => {
            warn!(error = %msg, "rejected projection request");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    match project(&inputs) {
        Ok(projection) => {
            debug!(
                years = inputs.years,
                future_value = projection.result.future_value,
                "projection computed"
            );
            json_response(StatusCode::OK, build_project_response(inputs, &projection))
        }
        Err(err) => {
            warn!(%err, "projection failed");
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<SipInputs, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload)
}

fn inputs_from_payload(payload: ProjectPayload) -> Result<SipInputs, String> {
    let mut cli = default_cli();

    if let Some(v) = payload.monthly_amount {
        cli.monthly_amount = v;
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.expected_return {
        cli.expected_return = v;
    }

    build_inputs(&cli)
}

fn default_cli() -> Cli {
    Cli {
        monthly_amount: 5_000.0,
        years: 10,
        expected_return: 12.0,
        json: false,
        interactive: false,
    }
}

fn build_project_response(inputs: SipInputs, projection: &Projection) -> ProjectResponse {
    let result = projection.result;
    ProjectResponse {
        inputs,
        result,
        yearly: projection.series.clone(),
        growth_chart: growth_chart(&projection.series),
        breakdown_chart: breakdown_chart(&result),
        formatted: FormattedFigures {
            total_invested: format_inr(result.total_invested),
            future_value: format_inr(result.future_value),
            total_gains: format_inr(result.total_gains),
            yearly: projection
                .series
                .iter()
                .map(|r| FormattedYear {
                    year: r.year,
                    invested: format_inr(round_currency(r.invested)),
                    value: format_inr(round_currency(r.value)),
                    gains: format_inr(round_currency(r.gains)),
                })
                .collect(),
        },
    }
}

pub fn render_report(projection: &Projection) -> String {
    let result = projection.result;
    let mut out = String::new();
    out.push_str(&format!(
        "Total Invested: {}\n",
        format_inr(result.total_invested)
    ));
    out.push_str(&format!(
        "Future Value:   {} ({})\n",
        format_inr(result.future_value),
        format_lakhs(result.future_value as f64)
    ));
    out.push_str(&format!("Total Gains:    {}\n", format_inr(result.total_gains)));
    out.push('\n');
    out.push_str(&format!(
        "{:>4}  {:>16}  {:>16}  {:>16}\n",
        "Year", "Invested", "Value", "Gains"
    ));
    for r in &projection.series {
        out.push_str(&format!(
            "{:>4}  {:>16}  {:>16}  {:>16}\n",
            r.year,
            format_inr(round_currency(r.invested)),
            format_inr(round_currency(r.value)),
            format_inr(round_currency(r.gains)),
        ));
    }
    out
}

/// Runs the one-shot report, or the interactive loop with `--interactive`.
pub fn run_cli(raw_args: &[String]) -> Result<(), String> {
    let cli = Cli::try_parse_from(raw_args).unwrap_or_else(|e| e.exit());
    let inputs = build_inputs(&cli)?;

    if cli.interactive {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        return run_interactive(inputs, stdin.lock(), stdout.lock())
            .map_err(|e| format!("I/O error: {e}"));
    }

    let projection = project(&inputs).map_err(|e| e.to_string())?;
    if cli.json {
        let response = build_project_response(inputs, &projection);
        let json = serde_json::to_string_pretty(&response)
            .map_err(|e| format!("failed to encode response: {e}"))?;
        println!("{json}");
    } else {
        print!("{}", render_report(&projection));
    }
    Ok(())
}

const INTERACTIVE_HELP: &str = "Commands: amount <n> | years <n> | return <n> | show | quit\n\
     A field name without a value blanks that field.\n";

/// Line-oriented calculator: each edit recomputes and redraws the report.
pub fn run_interactive<R: BufRead, W: Write>(
    inputs: SipInputs,
    reader: R,
    mut writer: W,
) -> std::io::Result<()> {
    let mut session = CalculatorSession::new(inputs);
    let mut drawn_generation = session.generation();
    writer.write_all(INTERACTIVE_HELP.as_bytes())?;
    write_snapshot(&session, &mut writer)?;

    for line in reader.lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let value = parts.next();
        let mut fields = session.fields();

        let edited = match command {
            "quit" | "exit" => break,
            "show" => {
                write_snapshot(&session, &mut writer)?;
                continue;
            }
            "amount" => parse_field(value).and_then(|v| {
                fields.monthly_amount = v;
                admit(&fields).map(|()| session.set_monthly_amount(v))
            }),
            "years" => parse_field(value).and_then(|v| {
                fields.years = v;
                admit(&fields).map(|()| session.set_years(v))
            }),
            "return" => parse_field(value).and_then(|v| {
                fields.annual_return_percent = v;
                admit(&fields).map(|()| session.set_annual_return_percent(v))
            }),
            _ => Err(format!("unknown command `{command}`")),
        };

        match edited {
            // A new snapshot replaces the old report wholesale.
            Ok(_) if session.generation() != drawn_generation => {
                drawn_generation = session.generation();
                write_snapshot(&session, &mut writer)?;
            }
            Ok(_) => match session.last_error() {
                Some(err) if session.fields().complete().is_some() => {
                    writeln!(writer, "error: {err}")?
                }
                _ => writeln!(writer, "waiting for all fields")?,
            },
            Err(msg) => writeln!(writer, "error: {msg}")?,
        }
    }
    Ok(())
}

/// Rejects an edit that would complete the fields with out-of-bounds values.
fn admit(fields: &InputFields) -> Result<(), String> {
    match fields.complete() {
        Some(inputs) => validate_inputs(&inputs),
        None => Ok(()),
    }
}

fn parse_field<T: std::str::FromStr>(value: Option<&str>) -> Result<Option<T>, String> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| format!("`{raw}` is not a number")),
    }
}

fn write_snapshot<W: Write>(session: &CalculatorSession, writer: &mut W) -> std::io::Result<()> {
    match session.snapshot() {
        Some(projection) => writer.write_all(render_report(projection).as_bytes()),
        None => writeln!(writer, "no projection"),
    }
}
