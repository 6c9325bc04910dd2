//! Folio CLI: command-line interface for the portfolio graph
//!
//! Events are kept per user in a JSON store file. Every command loads the
//! user's portfolio, applies the change and saves it back.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use folio::graph::{Event, EventFilter, EventId, EventInput, GraphStore, LooseNumber, TagList};
use folio::persistence::{JsonFileStore, LoadSource, Session};
use folio::recommend::{self, Recommender, SimilarityClass};
use folio::{CanvasTransform, FolioConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio", version, about = "Folio portfolio graph CLI")]
struct Cli {
    /// JSON file holding every user's portfolio
    #[arg(long, default_value = "folio.json", global = true, env = "FOLIO_STORE")]
    store: String,

    /// Active user
    #[arg(long, default_value = "default", global = true, env = "FOLIO_USER")]
    user: String,

    /// YAML or JSON configuration file
    #[arg(long, global = true, env = "FOLIO_CONFIG")]
    config: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

/// Event fields shared by `add` and `update`
#[derive(Args)]
struct EventFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Portfolio type (project, course, competition, ...)
    #[arg(long = "type")]
    portfolio_type: Option<String>,
    #[arg(long)]
    result: Option<String>,
    #[arg(long)]
    reflection: Option<String>,
    /// Skill tags, separated by commas or spaces
    #[arg(long)]
    tags: Option<String>,
    /// Mistakes or improvement areas, separated by commas or spaces
    #[arg(long)]
    errors: Option<String>,
    #[arg(long)]
    contacts: Option<String>,
    #[arg(long)]
    budget: Option<String>,
    #[arg(long)]
    participants: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    x: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    y: Option<f64>,
}

impl EventFields {
    fn into_input(self) -> EventInput {
        EventInput {
            title: self.title,
            description: self.description,
            portfolio_type: self.portfolio_type,
            result: self.result,
            reflection: self.reflection,
            tags: self.tags.map(TagList::Text),
            errors: self.errors.map(TagList::Text),
            contacts: self.contacts,
            budget: self.budget.map(LooseNumber::Text),
            participants: self.participants.map(LooseNumber::Text),
            date: self.date,
            x: self.x,
            y: self.y,
            ..Default::default()
        }
    }
}

#[derive(Args)]
struct FilterArgs {
    /// Tag substring, case-insensitive
    #[arg(long)]
    tag: Option<String>,
    #[arg(long = "type")]
    portfolio_type: Option<String>,
    #[arg(long)]
    only_with_errors: bool,
    #[arg(long)]
    from: Option<NaiveDate>,
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    fn into_filter(self) -> EventFilter {
        EventFilter {
            tag: self.tag,
            portfolio_type: self.portfolio_type,
            only_with_errors: self.only_with_errors,
            date_from: self.from,
            date_to: self.to,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Add an event, placed around the center unless --x/--y are given
    Add(EventFields),
    /// Change fields of an event
    Update {
        id: u64,
        #[command(flatten)]
        fields: EventFields,
    },
    /// Remove an event
    Remove { id: u64 },
    /// List events, optionally filtered
    List(FilterArgs),
    /// Show one event
    Show { id: u64 },
    /// List derived connections with edge geometry
    Connections,
    /// Events most similar to one event
    Recommend {
        id: u64,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Development recommendations relative to the center
    Develop {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Similar and complementary events, next steps and an insight line
    Insights { id: u64 },
    /// Trending tags, common mistakes and top events
    Summary,
    /// Replace the user's events with the sample portfolio
    Demo,
}

struct Workspace {
    config: FolioConfig,
    graph: GraphStore,
    session: Session,
    store: JsonFileStore,
}

impl Workspace {
    fn open(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => FolioConfig::load(path).with_context(|| format!("loading config {}", path))?,
            None => FolioConfig::default(),
        };

        let mut graph = GraphStore::with_config(config.graph.clone());
        graph.ensure_center();

        let session = Session::for_user(cli.user.clone());
        let store = JsonFileStore::new(&cli.store);
        match session.load(&mut graph, &store)? {
            LoadSource::Saved(n) => tracing::debug!("Loaded {} saved events", n),
            LoadSource::Samples(n) => tracing::info!("No saved portfolio for {}, loaded {} samples", cli.user, n),
        }

        Ok(Workspace {
            config,
            graph,
            session,
            store,
        })
    }

    fn save(&mut self) -> Result<()> {
        self.session.save(&self.graph, &mut self.store)?;
        Ok(())
    }

    fn event(&self, id: u64) -> Result<&Event> {
        match self.graph.get_event(EventId::new(id)) {
            Some(event) if !event.is_center => Ok(event),
            _ => bail!("event {} not found", id),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut ws = Workspace::open(&cli)?;
    let today = chrono::Local::now().date_naive();
    let format = cli.format;

    match cli.command {
        Commands::Add(fields) => {
            let input = fields.into_input();
            let canvas = CanvasTransform::new(ws.config.canvas.clone());
            let id = ws.graph.add_event_placed(&input, &canvas, &mut rand::thread_rng())?;
            ws.save()?;
            println!("Added event {}", id.as_u64());
        }
        Commands::Update { id, fields } => {
            ws.event(id)?;
            ws.graph.update_event(EventId::new(id), &fields.into_input());
            ws.save()?;
            println!("Updated event {}", id);
        }
        Commands::Remove { id } => {
            if !ws.graph.remove_event(EventId::new(id)) {
                bail!("event {} not found", id);
            }
            ws.save()?;
            println!("Removed event {}", id);
        }
        Commands::List(filter) => {
            let visible = ws.graph.apply_filter(filter.into_filter());
            let events: Vec<&Event> = ws.graph.visible_events().collect();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&events)?),
                OutputFormat::Table => {
                    print_events(&events);
                    println!("{} of {} event(s)", visible, ws.graph.event_count());
                }
            }
        }
        Commands::Show { id } => {
            let info = ws.event(id)?.display_info();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
                OutputFormat::Table => {
                    let mut table = Table::new();
                    table.set_content_arrangement(ContentArrangement::Dynamic);
                    table.set_header(vec!["Field", "Value"]);
                    table.add_row(vec!["Title".to_string(), info.title]);
                    table.add_row(vec!["Type".to_string(), info.portfolio_type]);
                    table.add_row(vec!["Description".to_string(), info.description]);
                    table.add_row(vec!["Tags".to_string(), info.tags]);
                    table.add_row(vec!["Errors".to_string(), info.errors]);
                    table.add_row(vec!["Result".to_string(), info.result]);
                    table.add_row(vec!["Reflection".to_string(), info.reflection]);
                    table.add_row(vec!["Date".to_string(), info.date]);
                    table.add_row(vec!["Contacts".to_string(), info.contacts]);
                    table.add_row(vec!["Budget".to_string(), info.budget.to_string()]);
                    table.add_row(vec!["Participants".to_string(), info.participants.to_string()]);
                    println!("{}", table);
                }
            }
        }
        Commands::Connections => {
            let update = ws.graph.flush_frame().unwrap_or_default();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&update.geometry)?),
                OutputFormat::Table => {
                    let mut table = Table::new();
                    table.set_content_arrangement(ContentArrangement::Dynamic);
                    table.set_header(vec!["From", "To", "Kind", "Length", "Angle", "Label"]);
                    for edge in &update.geometry {
                        table.add_row(vec![
                            title_of(&ws.graph, edge.key.low),
                            title_of(&ws.graph, edge.key.high),
                            edge.key.kind.to_string(),
                            format!("{:.0}", edge.length),
                            format!("{:.1}", edge.angle_degrees),
                            edge.label.clone(),
                        ]);
                    }
                    println!("{}", table);
                    let stats = ws.graph.statistics();
                    println!(
                        "{} tag, {} error, {} center connection(s)",
                        stats.tag_connections, stats.error_connections, stats.center_connections
                    );
                }
            }
        }
        Commands::Recommend { id, limit } => {
            let target = ws.event(id)?;
            let ranked = recommend::recommendations_for(target, ws.graph.events(), limit);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ranked)?),
                OutputFormat::Table => {
                    let mut table = Table::new();
                    table.set_content_arrangement(ContentArrangement::Dynamic);
                    table.set_header(vec!["ID", "Title", "Similarity", "Class", "Tags", "Budget", "Date", "Participants"]);
                    for r in &ranked {
                        table.add_row(vec![
                            r.event.id.as_u64().to_string(),
                            r.event.title.clone(),
                            format!("{:.3}", r.similarity),
                            SimilarityClass::of(r.similarity).as_str().to_string(),
                            format!("{:.2}", r.details.tag_similarity),
                            format!("{:.2}", r.details.budget_similarity),
                            format!("{:.2}", r.details.date_similarity),
                            format!("{:.2}", r.details.participants_similarity),
                        ]);
                    }
                    println!("{}", table);
                }
            }
        }
        Commands::Develop { limit } => {
            let limit = limit.unwrap_or(ws.config.recommend.development_limit);
            let ranked =
                recommend::development_recommendations(ws.graph.events(), &ws.config.recommend, today, limit);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ranked)?),
                OutputFormat::Table => {
                    let mut table = Table::new();
                    table.set_content_arrangement(ContentArrangement::Dynamic);
                    table.set_header(vec!["ID", "Title", "Potential", "Direction"]);
                    for r in &ranked {
                        table.add_row(vec![
                            r.event.id.as_u64().to_string(),
                            r.event.title.clone(),
                            format!("{:.0}%", r.development_potential),
                            r.direction.clone(),
                        ]);
                    }
                    println!("{}", table);
                }
            }
        }
        Commands::Insights { id } => {
            ws.event(id)?;
            let recommender = Recommender::new(&ws.graph, &ws.config.recommend, today);
            let Some(insights) = recommender.for_event(EventId::new(id)) else {
                bail!("event {} not found", id);
            };
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&insights)?),
                OutputFormat::Table => {
                    println!("{}\n", insights.insight);
                    println!("Similar:");
                    for r in &insights.similar {
                        println!("  {:.3}  {}", r.similarity, r.event.title);
                    }
                    println!("Complementary:");
                    for c in &insights.complementary {
                        println!("  {}  ({})", c.event.title, c.reason);
                    }
                    println!("Next steps:");
                    for s in &insights.next_steps {
                        println!("  [{:?}] {}: {}", s.kind, s.title, s.description);
                    }
                }
            }
        }
        Commands::Summary => {
            let summary = Recommender::new(&ws.graph, &ws.config.recommend, today).summary();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                OutputFormat::Table => {
                    let mut table = Table::new();
                    table.set_content_arrangement(ContentArrangement::Dynamic);
                    table.set_header(vec!["Trending tag", "Count", "Common mistake", "Count"]);
                    let rows = summary.trending_tags.len().max(summary.common_mistakes.len());
                    for i in 0..rows {
                        let tag = summary.trending_tags.get(i);
                        let mistake = summary.common_mistakes.get(i);
                        table.add_row(vec![
                            tag.map(|t| t.tag.clone()).unwrap_or_default(),
                            tag.map(|t| t.count.to_string()).unwrap_or_default(),
                            mistake.map(|m| m.tag.clone()).unwrap_or_default(),
                            mistake.map(|m| m.count.to_string()).unwrap_or_default(),
                        ]);
                    }
                    println!("{}", table);
                    println!("Top events:");
                    for scored in &summary.top_events {
                        println!("  {:>5.1}  {}", scored.score, scored.event.title);
                    }
                }
            }
        }
        Commands::Demo => {
            ws.graph.clear_events();
            let canvas = CanvasTransform::new(ws.config.canvas.clone());
            let mut rng = rand::thread_rng();
            for input in folio::persistence::sample_events() {
                ws.graph.add_event_placed(&input, &canvas, &mut rng)?;
            }
            ws.save()?;
            println!("Loaded {} sample events", ws.graph.event_count());
        }
    }

    Ok(())
}

fn title_of(graph: &GraphStore, id: EventId) -> String {
    graph
        .get_event(id)
        .map(|e| e.title.clone())
        .unwrap_or_else(|| id.to_string())
}

fn print_events(events: &[&Event]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Title", "Type", "Tags", "Errors", "Date", "Budget", "Participants", "Position"]);
    for event in events {
        let info = event.display_info();
        table.add_row(vec![
            event.id.as_u64().to_string(),
            info.title,
            info.portfolio_type,
            info.tags,
            info.errors,
            info.date,
            info.budget.to_string(),
            info.participants.to_string(),
            format!("({:.0}, {:.0})", event.x, event.y),
        ]);
    }
    println!("{}", table);
}
