use clap::Parser;
use skillgap::cli::commands::{Cli, Commands};
use skillgap::config::Settings;
use skillgap::domain::entities::record::{Payload, PointId};
use skillgap::SkillGap;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let settings = Settings::from_env();

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).compact().init();

    let sg = match SkillGap::new(&settings).await {
        Ok(sg) => sg,
        Err(e) => {
            eprintln!("Error initializing skillgap: {e}");
            std::process::exit(1);
        }
    };

    let result = run_command(sg, cli.command).await;
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(sg: SkillGap, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Init => {
            let vectors = sg.vectors();
            let collections = vectors.collections().await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "collection": vectors.collection(),
                    "collections": collections,
                }))?
            );
        }
        Commands::Index { id, text, metadata } => {
            let payload: Payload = match metadata {
                Some(json) => serde_json::from_str(&json)?,
                None => Payload::new(),
            };
            let id = parse_id(id);
            sg.index_skill(id.clone(), &text, payload).await?;
            println!("Indexed {id}");
        }
        Commands::Search { text, limit } => {
            let hits = sg.find_similar(&text, limit).await?;
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
        Commands::DeadlineSet { roadmap_id, date } => {
            let status = sg.set_deadline(&roadmap_id, &date)?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Commands::DeadlineGet { roadmap_id } => match sg.get_deadline(&roadmap_id)? {
            Some(status) => println!("{}", serde_json::to_string_pretty(&status)?),
            None => return Err(format!("No deadline for roadmap {roadmap_id}").into()),
        },
        Commands::DeadlineDelete { roadmap_id } => {
            if sg.delete_deadline(&roadmap_id)? {
                println!("Deleted deadline for {roadmap_id}");
            } else {
                return Err(format!("No deadline for roadmap {roadmap_id}").into());
            }
        }
    }
    Ok(())
}

fn parse_id(raw: String) -> PointId {
    match raw.parse::<u64>() {
        Ok(n) => PointId::Num(n),
        Err(_) => PointId::Str(raw),
    }
}
