use illustgen::cli::{parse_command, Command, HELP};
use illustgen::{ClientConfig, FormSession, SubmitOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_loaded = dotenv::dotenv().is_ok();

    let config = ClientConfig::from_env();
    illustgen::logger::init_with_config(config.logger_config())?;

    if env_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }
    illustgen::logger::log_config_info(&config);

    let mut session = match FormSession::from_config(&config) {
        Ok(session) => session,
        Err(e) => {
            log::error!("❌ Failed to create client: {}", e);
            return Err(e.into());
        }
    };

    log::info!("🔄 Loading styles, sizes and backend health...");
    let report = session.initialize().await;
    if !report.is_complete() {
        let failed: Vec<String> = report.failed.iter().map(|s| s.to_string()).collect();
        log::warn!("⚠️  Initial load incomplete: {}", failed.join(", "));
    }

    println!("{}", session.view());
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        match command {
            Command::Theme(theme) => session.set_theme(theme),
            Command::Style(id) => session.toggle_style(id),
            Command::Size(id) => session.select_size(id),
            Command::Purpose(id) => session.select_purpose(id),
            Command::Extra(extra) => session.set_extra_description(extra),
            Command::Submit => {
                if session.submit().await == SubmitOutcome::Disabled {
                    println!("Generate is disabled right now.");
                }
            }
            Command::Refine(instruction) => {
                if session.refine(&instruction).await == SubmitOutcome::Disabled {
                    println!("Refine is disabled right now.");
                }
            }
            Command::Lookup(id) => {
                match session.lookup_generation(&id).await {
                    Ok(record) => {
                        println!("Generation {}", record.generation_id);
                        if let Some(parent) = &record.parent_id {
                            println!("  refined from {}", parent);
                        }
                        println!("  prompt: {}", record.optimized_prompt);
                        if let Some(url) = &record.image_url {
                            println!("  image: {}", url);
                        }
                    }
                    Err(e) => println!("Lookup failed: {}", e.user_message()),
                }
                continue;
            }
            Command::History => {
                if let Err(e) = session.load_history().await {
                    println!("Could not load history: {}", e.user_message());
                }
            }
            Command::Save(path) => match session.save_image(path.as_deref()).await {
                Ok(saved) => println!("Saved {}", saved.display()),
                Err(e) => println!("Could not save image: {}", e),
            },
            Command::Show => {}
            Command::Help => {
                println!("{}", HELP);
                continue;
            }
            Command::Quit => break,
        }

        println!("{}", session.view());
    }

    log::info!("👋 Bye");
    Ok(())
}
