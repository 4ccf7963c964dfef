use tagnet::{generate, DistanceType, GenerationParameters, GraphResult, NetworkLayout};
use tracing_subscriber::EnvFilter;

fn main() -> GraphResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Tagnet v{}", tagnet::version());
    println!("==========================================");
    println!();

    let parameters = GenerationParameters::default();

    // Demo 1: Generation
    println!("=== Demo 1: Synthetic Collection ===");
    let collection = generate(&parameters);
    println!("✓ Generated {} items over {} tags", collection.num_items(), collection.num_tags);
    println!("  Items by cardinality: {:?}", collection.actual_items_by_cardinality);
    println!("  Short items: {}", collection.num_short_items);
    println!("  Unused tags: {}", collection.unused_tags().count());

    // Demo 2: Analysis
    println!("\n=== Demo 2: Co-occurrence Graph ===");
    let graph = collection.to_graph()?;
    println!("✓ Added {} lists ({} unique)", graph.lists_added(), graph.unique_lists());
    for typ in DistanceType::ALL {
        let stats = graph.distance_stats(typ);
        println!(
            "  {:<8} pairs={:<6} low={:.3} high={:.3} mean={:.3} std={:.3}",
            typ, stats.count, stats.low_bound, stats.high_bound, stats.mean, stats.std
        );
    }
    let islands = graph.island_stats();
    println!("  Islands: {}", islands.len());
    let violations = graph.validate_distance_matrix(DistanceType::PathLength);
    println!("  Path length violations: {}", violations.len());

    // Demo 3: Layout
    println!("\n=== Demo 3: Network Layout ===");
    let layout = NetworkLayout::with_defaults(&graph, &collection.tags);
    println!("✓ Grid {} x {}", layout.width(), layout.height());
    println!("  Regions: {}", layout.regions().len());
    println!("  Nodes: {}", layout.nodes().len());
    println!("  Edges: {}", layout.edges().len());

    Ok(())
}
