use clap::{Parser, Subcommand};
use pv_app::{
    AppError, AppResult, Coordinator, Outcome, SeriesKind, SettingsStore, build_plots,
    correlation_points,
};
use pv_core::TableCategory;
use pv_table::{Axis, RowFilter, SortFilterProxy, SortOrder, TablePresenter};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pv-cli")]
#[command(about = "petabvis CLI - inspect PEtab problems and their plots", long_about = None)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tables a manifest references
    Tree {
        /// Path to the PEtab YAML file
        manifest: PathBuf,
    },
    /// Print one table of the manifest
    Show {
        /// Path to the PEtab YAML file
        manifest: PathBuf,
        /// Table category (measurement, condition, observable, visualization)
        category: TableCategory,
        /// File name as listed in the manifest
        file: String,
        /// Column to sort by
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending instead of ascending
        #[arg(long, requires = "sort")]
        desc: bool,
        /// Only rows containing this text (case-insensitive)
        #[arg(long)]
        filter: Option<String>,
    },
    /// Attach a simulation table and report the reconciled columns
    Attach {
        /// Path to the PEtab YAML file
        manifest: PathBuf,
        /// Simulation table
        simulation: PathBuf,
    },
    /// Summarize the plots of the active selection
    Plots {
        /// Path to the PEtab YAML file
        manifest: PathBuf,
        /// Optional simulation table to overlay
        #[arg(short, long)]
        simulation: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let settings = match cli.settings {
        Some(path) => Some(SettingsStore::at(path)),
        None => SettingsStore::default_location(),
    };

    match cli.command {
        Commands::Tree { manifest } => cmd_tree(&manifest, settings.as_ref()),
        Commands::Show {
            manifest,
            category,
            file,
            sort,
            desc,
            filter,
        } => cmd_show(
            &manifest,
            settings.as_ref(),
            category,
            &file,
            sort.as_deref(),
            desc,
            filter,
        ),
        Commands::Attach {
            manifest,
            simulation,
        } => cmd_attach(&manifest, settings.as_ref(), &simulation),
        Commands::Plots {
            manifest,
            simulation,
        } => cmd_plots(&manifest, settings.as_ref(), simulation.as_deref()),
    }
}

fn open(manifest: &Path, settings: Option<&SettingsStore>) -> AppResult<Coordinator> {
    let mut coordinator = Coordinator::new();
    let outcome = coordinator.open_manifest(manifest)?;
    print_warnings(&outcome);

    if let Some(store) = settings
        && let Err(e) = store.remember_dir_of(manifest)
    {
        tracing::warn!(error = %e, "could not update settings");
    }
    Ok(coordinator)
}

fn print_warnings(outcome: &Outcome) {
    for warning in &outcome.warnings {
        eprintln!("warning: {}", warning);
    }
}

fn cmd_tree(manifest: &Path, settings: Option<&SettingsStore>) -> AppResult<()> {
    let coordinator = open(manifest, settings)?;

    let mut current = None;
    for leaf in coordinator.browse_registry() {
        if current != Some(leaf.key.category) {
            println!("{}", leaf.key.category.label());
            current = Some(leaf.key.category);
        }
        let marker = if coordinator.selection().is_active(&leaf.key) {
            "*"
        } else {
            " "
        };
        println!("  {} {}", marker, leaf.key.filename);
    }
    Ok(())
}

fn cmd_show(
    manifest: &Path,
    settings: Option<&SettingsStore>,
    category: TableCategory,
    file: &str,
    sort: Option<&str>,
    desc: bool,
    filter: Option<String>,
) -> AppResult<()> {
    let mut coordinator = open(manifest, settings)?;
    let table = coordinator.inspect(category, file)?;

    let mut proxy = SortFilterProxy::new(TablePresenter::new(table));
    if let Some(column) = sort {
        let index = proxy
            .source()
            .table()
            .column_index(column)
            .ok_or_else(|| AppError::precondition(format!("No column named '{}'", column)))?;
        let order = if desc {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        };
        proxy.set_sort(index, order)?;
    }
    if let Some(needle) = filter {
        proxy.set_filter(Some(RowFilter::any_column(needle)))?;
    }

    let headers: Vec<String> = (0..proxy.column_count())
        .filter_map(|c| proxy.header_label(c, Axis::Column))
        .collect();
    println!("\t{}", headers.join("\t"));
    for row in 0..proxy.row_count() {
        let label = proxy.header_label(row, Axis::Row).unwrap_or_default();
        let cells: Vec<String> = (0..proxy.column_count())
            .map(|c| proxy.cell_value(row, c))
            .collect();
        println!("{}\t{}", label, cells.join("\t"));
    }
    println!(
        "\n{} of {} rows",
        proxy.row_count(),
        proxy.source().row_count()
    );
    Ok(())
}

fn cmd_attach(
    manifest: &Path,
    settings: Option<&SettingsStore>,
    simulation: &Path,
) -> AppResult<()> {
    let mut coordinator = open(manifest, settings)?;
    let outcome = coordinator.attach_simulation(simulation)?;
    print_warnings(&outcome);

    if let Some(table) = coordinator.selection().simulation() {
        println!("✓ Attached {}", simulation.display());
        println!("  Rows: {}", table.row_count());
        println!("  Columns: {}", table.columns().join(", "));
    }
    println!(
        "  Correlated points: {}",
        correlation_points(coordinator.selection()).len()
    );
    Ok(())
}

fn cmd_plots(
    manifest: &Path,
    settings: Option<&SettingsStore>,
    simulation: Option<&Path>,
) -> AppResult<()> {
    let mut coordinator = open(manifest, settings)?;
    if let Some(simulation) = simulation {
        print_warnings(&coordinator.attach_simulation(simulation)?);
    }

    let plots = build_plots(coordinator.selection());
    for figure in &plots.figures {
        println!("{} [{}]", figure.title, figure.plot_id);
        println!(
            "  x: {} ({}), y: {} ({})",
            figure.x_label, figure.x_scale, figure.y_label, figure.y_scale
        );
        for series in &figure.series {
            let kind = match series.kind {
                SeriesKind::Measurement => "measurement",
                SeriesKind::Simulation => "simulation",
            };
            println!(
                "  - {} ({}, {} points)",
                series.label,
                kind,
                series.points.len()
            );
        }
    }
    Ok(())
}
