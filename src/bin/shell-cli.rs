use clap::{Parser, Subcommand};
use serde_json::Value;

use cardcognition::routing::{NavigationEvent, Resolution, Shell};

#[derive(Parser)]
#[command(name = "shell-cli")]
#[command(about = "Inspect the CardCognition route table and a running shell", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the route table
    Routes,
    /// Show the page rendered for a path
    Resolve { path: String },
    /// Replay a session: initial path, then paths, `back` or `forward`
    Walk {
        #[arg(required = true)]
        steps: Vec<String>,
    },
    /// Check a running server
    Status {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let shell = Shell::default();

    match cli.command {
        Commands::Routes => {
            for route in shell.routes().routes() {
                let components: Vec<_> = route.composition.iter().map(|c| c.name()).collect();
                println!("{:<8} {:<8} {}", route.name, route.path, components.join(", "));
            }
        }
        Commands::Resolve { path } => {
            print_resolution(&shell.resolve(&path));
        }
        Commands::Walk { steps } => {
            let mut steps = steps.into_iter();
            let initial = steps.next().unwrap_or_else(|| "/".to_string());
            let mut session = shell.session(&initial)?;
            print_resolution(&session.current());

            for step in steps {
                let event = match step.as_str() {
                    "back" => NavigationEvent::Back,
                    "forward" => NavigationEvent::Forward,
                    _ => NavigationEvent::Link(step),
                };
                match session.dispatch(event) {
                    Ok(resolution) => print_resolution(&resolution),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
        }
        Commands::Status { url } => {
            let res = reqwest::get(format!("{}/_shell/routes", url.trim_end_matches('/'))).await?;
            let status = res.status();
            if !status.is_success() {
                eprintln!("Error: shell returned status {}", status);
                if let Ok(text) = res.text().await {
                    eprintln!("Response: {}", text);
                }
                return Ok(());
            }
            let json: Value = res.json().await?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

fn print_resolution(resolution: &Resolution) {
    let components: Vec<_> = resolution.page.components().iter().map(|c| c.name()).collect();
    println!(
        "{} [{}] {}",
        resolution.path,
        resolution.route_label(),
        components.join(" > ")
    );
}
