//! # Iris Viewer
//!
//! Terminal charts for the Iris exercises: feature overview, a linear
//! decision plane, probability projections, a non-linear SVM surface and a
//! classifier comparison.

use std::io::{self, Stdout, Write};
use std::path::PathBuf;

use anyhow::Context;
use campus_iris::{Dataset, analysis};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

mod app;
mod camera;
mod palette;
mod telemetry;
mod views;

use app::App;
use views::Chart;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Iris classifier charts in the terminal
#[derive(Parser, Debug)]
#[command(name = "iris-viewer", version, about)]
struct Cli {
    /// Print the chart data as JSON instead of opening the viewer
    #[arg(long, global = true)]
    json: bool,

    /// Append logs to this file
    #[arg(long, env = "IRIS_LOG", global = true)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    view: View,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum View {
    /// Box plots per species and the feature scatter matrix
    Preview,
    /// Logistic-regression decision plane between setosa and versicolor
    Boundary,
    /// Class probabilities projected onto the walls of the plot box
    Probability,
    /// RBF SVM decision surface with wall projections
    Nonlinear,
    /// Logistic regression, linear SVM and Gaussian process side by side
    Comparison {
        /// Mesh step over the petal features
        #[arg(long, default_value_t = 0.05, value_parser = positive_step)]
        step: f64,
    },
}

fn positive_step(raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(step) if step > 0.0 && step.is_finite() => Ok(step),
        Ok(_) => Err("step must be a positive number".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn compute(view: View, data: &Dataset) -> anyhow::Result<Chart> {
    let chart = match view {
        View::Preview => Chart::Preview(analysis::preview(data)),
        View::Boundary => Chart::Boundary(analysis::decision_plane(data)?),
        View::Probability => Chart::Probability(analysis::probability_projection(data)?),
        View::Nonlinear => Chart::Nonlinear(analysis::nonlinear_surface(data)?),
        View::Comparison { step } => {
            Chart::Comparison(analysis::comparison_with_step(data, step)?)
        }
    };
    Ok(chart)
}

fn to_json(chart: &Chart) -> serde_json::Result<String> {
    match chart {
        Chart::Preview(p) => serde_json::to_string_pretty(p),
        Chart::Boundary(p) => serde_json::to_string_pretty(p),
        Chart::Probability(p) => serde_json::to_string_pretty(p),
        Chart::Nonlinear(s) => serde_json::to_string_pretty(s),
        Chart::Comparison(c) => serde_json::to_string_pretty(c),
    }
}

fn setup_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if let Some(path) = &cli.log {
        telemetry::init_file_telemetry(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
    }
    tracing::info!(view = ?cli.view, json = cli.json, "Starting Iris viewer");

    let data = Dataset::iris().context("loading the Iris dataset")?;
    let chart = compute(cli.view, &data).context("computing chart")?;

    if cli.json {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", to_json(&chart)?)?;
        return Ok(());
    }

    let mut terminal = setup_terminal()?;
    let mut app = App::new(chart);
    let result = app.run(&mut terminal);
    restore_terminal(&mut terminal)?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_comparison_step_must_be_positive() {
        let cli = Cli::try_parse_from(["iris-viewer", "comparison", "--step", "0.5"]).unwrap();
        assert!(matches!(cli.view, View::Comparison { step } if step == 0.5));

        assert!(Cli::try_parse_from(["iris-viewer", "comparison", "--step", "0"]).is_err());
        assert!(Cli::try_parse_from(["iris-viewer", "comparison", "--step", "x"]).is_err());
    }

    #[test]
    fn test_json_flag_is_global() {
        let cli = Cli::try_parse_from(["iris-viewer", "preview", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.view, View::Preview));
    }

    #[test]
    fn test_json_export_names_the_chart_fields() {
        let data = Dataset::iris().unwrap();
        let chart = compute(View::Boundary, &data).unwrap();
        let json: serde_json::Value = serde_json::from_str(&to_json(&chart).unwrap()).unwrap();
        assert_eq!(json["coef"].as_array().map(Vec::len), Some(3));
        assert!(json["mesh"]["xs"].is_array());
    }
}
