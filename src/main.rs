//! ontograph CLI: inspect knowledge-graph subgraph snapshots.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use ontograph::access;
use ontograph::identifier::{EntityId, OntologyTypeEditionId, Timestamp, VersionedUri};
use ontograph::snapshot;
use ontograph::subgraph::{ElementRef, OntologyVertex};

#[derive(Parser)]
#[command(name = "ontograph", version, about = "Inspect knowledge-graph subgraph snapshots")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show snapshot statistics and resolve depths.
    Info {
        /// Path to a snapshot JSON file.
        snapshot: PathBuf,
    },

    /// List the root elements the snapshot's query was about.
    Roots {
        /// Path to a snapshot JSON file.
        snapshot: PathBuf,

        /// Print full elements as JSON instead of identifiers.
        #[arg(long)]
        full: bool,
    },

    /// Show the editions of an entity.
    Entity {
        /// Path to a snapshot JSON file.
        snapshot: PathBuf,

        /// Entity id (`<owner-uuid>%<entity-uuid>`).
        #[arg(long)]
        id: String,

        /// Resolve the edition effective at this RFC 3339 instant instead of
        /// listing all editions.
        #[arg(long)]
        at: Option<String>,
    },

    /// Look up an ontology type and its outgoing constraint references.
    Type {
        /// Path to a snapshot JSON file.
        snapshot: PathBuf,

        /// Versioned uri (`<base-uri>v/<version>`).
        #[arg(long)]
        uri: String,
    },

    /// Check the snapshot's integrity contract.
    Validate {
        /// Path to a snapshot JSON file.
        snapshot: PathBuf,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { snapshot } => {
            let subgraph = snapshot::load(&snapshot).into_diagnostic()?;
            println!("roots:             {}", subgraph.roots.len());
            println!("ontology vertices: {}", subgraph.vertices.ontology_len());
            println!("entity vertices:   {}", subgraph.vertices.knowledge_graph_len());
            println!("edges:             {}", subgraph.edges.len());
            println!(
                "depths:            {}",
                serde_json::to_string(&subgraph.depths).into_diagnostic()?
            );
        }

        Commands::Roots { snapshot, full } => {
            let subgraph = snapshot::load(&snapshot).into_diagnostic()?;
            if full {
                for root in access::roots(&subgraph).into_diagnostic()? {
                    let json = match root {
                        ElementRef::DataType(dt) => {
                            serde_json::to_string_pretty(dt).into_diagnostic()?
                        }
                        ElementRef::PropertyType(pt) => {
                            serde_json::to_string_pretty(pt).into_diagnostic()?
                        }
                        ElementRef::EntityType(et) => {
                            serde_json::to_string_pretty(et).into_diagnostic()?
                        }
                        ElementRef::Entity(entity) => {
                            serde_json::to_string_pretty(entity).into_diagnostic()?
                        }
                    };
                    println!("{json}");
                }
            } else {
                for root in &subgraph.roots {
                    println!("{root}");
                }
            }
        }

        Commands::Entity { snapshot, id, at } => {
            let subgraph = snapshot::load(&snapshot).into_diagnostic()?;
            let entity_id: EntityId = id.parse().into_diagnostic()?;
            match at {
                Some(at) => {
                    let timestamp: Timestamp = at.parse().into_diagnostic()?;
                    match access::entity_at_timestamp(&subgraph, &entity_id, timestamp) {
                        Some(entity) => println!(
                            "{}",
                            serde_json::to_string_pretty(entity).into_diagnostic()?
                        ),
                        None => println!("no edition of {entity_id} effective at {timestamp}"),
                    }
                }
                None => {
                    let editions = access::entity_editions(&subgraph, &entity_id);
                    if editions.is_empty() {
                        println!("entity {entity_id} not in snapshot");
                    }
                    for entity in editions {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(entity).into_diagnostic()?
                        );
                    }
                }
            }
        }

        Commands::Type { snapshot, uri } => {
            let subgraph = snapshot::load(&snapshot).into_diagnostic()?;
            let uri: VersionedUri = uri.parse().into_diagnostic()?;
            let edition_id = OntologyTypeEditionId::from(&uri);

            match subgraph.vertices.ontology_vertex(&edition_id) {
                Some(OntologyVertex::EntityType(entity_type)) => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(entity_type).into_diagnostic()?
                    );
                    for property_type_id in access::property_type_ids_referenced_by_entity_type(
                        &subgraph,
                        &edition_id,
                    ) {
                        println!("constrains properties on: {property_type_id}");
                    }
                    for link_type_id in
                        access::entity_type_ids_referenced_by_entity_type(&subgraph, &edition_id)
                    {
                        println!("constrains links on: {link_type_id}");
                    }
                }
                Some(OntologyVertex::PropertyType(property_type)) => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(property_type).into_diagnostic()?
                    );
                    for data_type_id in
                        access::data_type_ids_referenced_by_property_type(&subgraph, &edition_id)
                    {
                        println!("constrains values on: {data_type_id}");
                    }
                }
                Some(OntologyVertex::DataType(data_type)) => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(data_type).into_diagnostic()?
                    );
                }
                None => println!("type {uri} not in snapshot"),
            }
        }

        Commands::Validate { snapshot } => {
            let subgraph = snapshot::load(&snapshot).into_diagnostic()?;
            subgraph.validate().into_diagnostic()?;
            println!("ok");
        }
    }

    Ok(())
}
