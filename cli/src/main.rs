//! Tagnet CLI: generate a synthetic tag collection, analyze its
//! co-occurrence graph and lay it out on a grid.

mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{ExplorerConfig, GenerationArgs, LayoutArgs};
use output::{fmt_f32, join_ids, OutputFormat, Report, Section};
use serde_json::json;
use std::path::PathBuf;
use tagnet::{generate, CoOccurrenceGraph, DistanceType, GeneratedCollection, NetworkLayout};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tagnet", version, about = "Tag co-occurrence network explorer")]
struct Cli {
    /// YAML or JSON run configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    format: OutputFormat,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a collection and list its tags and items
    Generate {
        #[command(flatten)]
        generation: GenerationArgs,
    },
    /// Build the co-occurrence graph and report distance statistics
    Analyze {
        #[command(flatten)]
        generation: GenerationArgs,

        /// Histogram bucket count
        #[arg(long)]
        bins: Option<usize>,

        /// Histogram metric: path, itemset or tagset
        #[arg(long)]
        distance: Option<DistanceType>,
    },
    /// Lay the graph out and list islands, regions, nodes and edges
    Layout {
        #[command(flatten)]
        generation: GenerationArgs,

        #[command(flatten)]
        layout: LayoutArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let mut config = ExplorerConfig::load_or_default(cli.config.as_deref())?;

    let report = match cli.command {
        Commands::Generate { generation } => {
            generation.apply(&mut config.generation);
            generate_report(&generate(&config.generation))?
        }
        Commands::Analyze { generation, bins, distance } => {
            generation.apply(&mut config.generation);
            if let Some(bins) = bins {
                config.histogram_bins = bins;
            }
            if let Some(distance) = distance {
                config.histogram_distance = distance;
            }
            let collection = generate(&config.generation);
            let graph = build_graph(&collection)?;
            analyze_report(&graph, &config)?
        }
        Commands::Layout { generation, layout } => {
            generation.apply(&mut config.generation);
            layout.apply(&mut config.layout);
            let collection = generate(&config.generation);
            let graph = build_graph(&collection)?;
            let layout = NetworkLayout::new(&graph, &collection.tags, config.layout.clone());
            layout_report(&layout)?
        }
    };

    report.print(cli.format)
}

fn build_graph(collection: &GeneratedCollection) -> Result<CoOccurrenceGraph> {
    let graph = collection.to_graph().context("failed to build co-occurrence graph")?;
    info!(lists = graph.lists_added(), unique = graph.unique_lists(), "graph built");
    Ok(graph)
}

fn generate_report(collection: &GeneratedCollection) -> Result<Report> {
    let mut summary = Section::new("Cardinality", &["cardinality", "requested", "actual"]);
    for (card, (requested, actual)) in collection
        .requested_items_by_cardinality
        .iter()
        .zip(&collection.actual_items_by_cardinality)
        .enumerate()
    {
        summary.row(vec![card.to_string(), requested.to_string(), actual.to_string()]);
    }

    let mut tags = Section::new("Tags", &["id", "name", "target", "occurs", "by cardinality"]);
    for (tag, stat) in collection.tags.iter().zip(&collection.tag_stats) {
        tags.row(vec![
            tag.id.to_string(),
            tag.name.clone(),
            stat.target.to_string(),
            stat.occurs.to_string(),
            join_ids(&stat.occurs_by_cardinality),
        ]);
    }

    let mut items = Section::new("Items", &["id", "name", "tags"]);
    for item in &collection.items {
        items.row(vec![item.id.to_string(), item.name.clone(), join_ids(&item.tag_set)]);
    }

    Ok(Report {
        json: serde_json::to_value(collection)?,
        sections: vec![summary, tags, items],
    })
}

fn analyze_report(graph: &CoOccurrenceGraph, config: &ExplorerConfig) -> Result<Report> {
    let mut stats = Section::new("Distance statistics", &["metric", "pairs", "low", "high", "mean", "std"]);
    let mut stats_json = serde_json::Map::new();
    for typ in DistanceType::ALL {
        let entry = graph.distance_stats(typ);
        stats.row(vec![
            typ.to_string(),
            entry.count.to_string(),
            fmt_f32(entry.low_bound),
            fmt_f32(entry.high_bound),
            format!("{:.4}", entry.mean),
            format!("{:.4}", entry.std),
        ]);
        stats_json.insert(typ.to_string(), serde_json::to_value(entry)?);
    }

    let histogram_title = format!("Histogram ({})", config.histogram_distance);
    let mut histogram = Section::new(&histogram_title, &["bin", "low", "high", "count", "mean", "std"]);
    let bins = graph.histogram(config.histogram_distance, config.histogram_bins);
    for bin in &bins {
        histogram.row(vec![
            bin.id.to_string(),
            fmt_f32(bin.low_bound),
            fmt_f32(bin.high_bound),
            bin.count.to_string(),
            format!("{:.4}", bin.mean),
            format!("{:.4}", bin.std),
        ]);
    }

    let islands = graph.island_stats();
    let mut island_section = Section::new(
        "Islands",
        &["id", "size", "1 adj", "2 adj", "3 adj", "4 adj", "many", "min", "max", "avg"],
    );
    for island in &islands {
        island_section.row(vec![
            island.id.to_string(),
            island.size().to_string(),
            island.num_with_1_adj.to_string(),
            island.num_with_2_adj.to_string(),
            island.num_with_3_adj.to_string(),
            island.num_with_4_adj.to_string(),
            island.num_with_many.to_string(),
            island.min_adjacent.to_string(),
            island.max_adjacent.to_string(),
            format!("{:.2}", island.avg_adjacent),
        ]);
    }

    let mut validation = Section::new("Validation", &["metric", "violations"]);
    let mut violations_json = serde_json::Map::new();
    for typ in DistanceType::ALL {
        let violations = graph.validate_distance_matrix(typ);
        validation.row(vec![typ.to_string(), violations.len().to_string()]);
        violations_json.insert(typ.to_string(), serde_json::to_value(&violations)?);
    }

    Ok(Report {
        json: json!({
            "distance_stats": stats_json,
            "histogram": { "distance": config.histogram_distance, "bins": bins },
            "islands": islands,
            "violations": violations_json,
        }),
        sections: vec![stats, histogram, island_section, validation],
    })
}

fn layout_report(layout: &NetworkLayout) -> Result<Report> {
    let snapshot = layout.cache_results();

    let mut grid = Section::new("Grid", &["width", "height", "nodes"]);
    grid.row(vec![
        snapshot.width.to_string(),
        snapshot.height.to_string(),
        layout.num_nodes().to_string(),
    ]);

    let mut islands = Section::new("Islands", &["id", "size", "x", "y", "width", "height", "regions"]);
    for island in &snapshot.islands {
        islands.row(vec![
            island.id.to_string(),
            island.size().to_string(),
            island.xpos.to_string(),
            island.ypos.to_string(),
            island.width.to_string(),
            island.height.to_string(),
            format!("{}..{}", island.min_regions, island.max_regions),
        ]);
    }

    let mut regions = Section::new("Regions", &["id", "island", "x", "y", "width", "interior", "exterior"]);
    for region in &snapshot.regions {
        regions.row(vec![
            region.id.to_string(),
            region.island_id.to_string(),
            region.xpos.to_string(),
            region.ypos.to_string(),
            region.width.to_string(),
            join_ids(&region.interior_nodes),
            join_ids(&region.exterior_nodes),
        ]);
    }

    let mut nodes = Section::new("Nodes", &["id", "name", "region", "x", "y", "interior links", "exterior links"]);
    for node in &snapshot.nodes {
        let name = layout.tag(node.id).map(|tag| tag.name.clone()).unwrap_or_default();
        nodes.row(vec![
            node.id.to_string(),
            name,
            node.region_id.to_string(),
            node.xpos.to_string(),
            node.ypos.to_string(),
            join_ids(&node.interior_links),
            join_ids(&node.exterior_links),
        ]);
    }

    let mut edges = Section::new("Edges", &["pair", "island", "regions", "from", "to"]);
    for edge in &snapshot.edges {
        edges.row(vec![
            edge.pair.to_string(),
            edge.island_id.to_string(),
            format!("{}/{}", edge.n1_region, edge.n2_region),
            format!("{},{}", edge.n1_pos.0, edge.n1_pos.1),
            format!("{},{}", edge.n2_pos.0, edge.n2_pos.1),
        ]);
    }

    Ok(Report {
        json: serde_json::to_value(snapshot)?,
        sections: vec![grid, islands, regions, nodes, edges],
    })
}
